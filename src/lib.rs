//! sqsdeck - a terminal user interface for Amazon SQS
//!
//! Browse queues and their attributes, sample messages, create and delete
//! queues, send single or batched messages, and delete, requeue or
//! dead-letter messages in bulk.
//!
//! # Modules
//!
//! * [`config`] - Application configuration management
//! * [`gateway`] - SQS client behind the [`gateway::QueueGateway`] trait
//! * [`audit`] - Append-only record of deleted messages
//! * [`ui`] - State, reducer, task runner and rendering

/// Append-only audit log of message deletions
pub mod audit;

/// Configuration module for managing application settings
pub mod config;

/// Application constants and default values
pub mod constants;

/// Queue service access
pub mod gateway;

/// File logging setup
pub mod logger;

/// Terminal user interface components and rendering
pub mod ui;
