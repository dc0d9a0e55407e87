//! Remote queue gateway
//!
//! The rest of the application talks to the queue service only through the
//! [`QueueGateway`] trait. [`SqsGateway`] implements it over the SQS JSON
//! protocol; tests substitute an in-memory implementation.

pub mod error;
pub mod presets;
pub mod signing;
pub mod sqs;
pub mod types;
mod wire;

use async_trait::async_trait;
use std::collections::BTreeMap;

pub use error::GatewayError;
pub use presets::QueuePreset;
pub use sqs::SqsGateway;
pub use types::{Message, MessageRef, Queue, QueueConfig, QueueKind, QueueRef, RedrivePolicy, SendMessageInput};

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Request/response operations against the remote queue service
#[async_trait]
pub trait QueueGateway: Send + Sync {
    async fn list_queues(&self) -> GatewayResult<Vec<QueueRef>>;

    async fn get_queue_url(&self, name: &str) -> GatewayResult<QueueRef>;

    async fn fetch_queue_attributes(&self, queue: &QueueRef) -> GatewayResult<Queue>;

    async fn create_queue(&self, name: &str, attributes: &BTreeMap<String, String>) -> GatewayResult<QueueRef>;

    async fn delete_queue(&self, name: &str) -> GatewayResult<()>;

    async fn fetch_messages(&self, queue: &QueueRef, max_count: u32) -> GatewayResult<Vec<Message>>;

    /// Returns the id assigned to the new message
    async fn send_message(&self, queue: &QueueRef, input: &SendMessageInput) -> GatewayResult<String>;

    async fn delete_message(&self, queue: &QueueRef, receipt_handle: &str) -> GatewayResult<()>;

    async fn change_message_visibility(&self, queue: &QueueRef, receipt_handle: &str, seconds: u32)
        -> GatewayResult<()>;
}

/// Move one message to the source queue's dead-letter queue.
///
/// The copy is sent first and the original deleted afterwards, so a failure
/// in between can leave the message in both queues but never in neither.
pub async fn move_to_dead_letter_queue(
    gateway: &dyn QueueGateway,
    source: &QueueRef,
    message: &Message,
) -> GatewayResult<QueueRef> {
    let queue = gateway.fetch_queue_attributes(source).await?;
    let policy = queue
        .redrive_policy
        .ok_or_else(|| GatewayError::NoRedrivePolicy(source.name.clone()))?;
    let dlq_name = policy.dead_letter_queue_name().ok_or_else(|| {
        GatewayError::InvalidArgument(format!("invalid dead-letter ARN {}", policy.dead_letter_target_arn))
    })?;
    let dlq = gateway.get_queue_url(dlq_name).await?;

    gateway.send_message(&dlq, &SendMessageInput::from_message(message)).await?;
    gateway
        .delete_message(source, &message.receipt_handle)
        .await
        .map_err(|e| match e {
            GatewayError::Service { code, message } => GatewayError::Service {
                code,
                message: format!("copied to {} but not deleted from {}: {}", dlq.name, source.name, message),
            },
            other => other,
        })?;

    Ok(dlq)
}
