//! Core UI functionality for sqsdeck.
//!
//! This module contains the building blocks the reducer and the renderer
//! share: the page enumeration, per-screen state, events and tasks, and the
//! runtime pieces that execute tasks and poll the terminal.
//!
//! # Module Components
//!
//! - [`actions`] - Intents, result events and everything else the reducer consumes
//! - [`page`] - Page enumeration and single-level back navigation
//! - [`screen`] - Cursor, filter and multi-select state shared by every screen
//! - [`tasks`] - Deferred remote operations and timers
//! - [`task_manager`] - Executes tasks and posts their events back
//! - [`event_handler`] - Terminal input polling
//!
//! # Architecture
//!
//! 1. **Events** (key intents, timer ticks, task results) enter the reducer one at a time
//! 2. The reducer mutates state and returns **Tasks**
//! 3. The [`TaskManager`] runs each task and posts exactly one event back
//! 4. Rendering projects the current state; it never mutates it

pub mod actions;
pub mod event_handler;
pub mod page;
pub mod screen;
pub mod task_manager;
pub mod tasks;

// Re-export core types for easier access from other modules
pub use actions::{BatchId, Event, Intent, Origin, Outcome, ResultEvent, ToastId};
pub use event_handler::{EventHandler, EventType};
pub use page::{Navigation, Page};
pub use screen::{matches_filter, ScreenState};
pub use task_manager::{run_task, TaskId, TaskManager};
pub use tasks::{Operation, Task};
