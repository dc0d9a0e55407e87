use super::page::Page;
use crate::gateway::{GatewayError, Message, Queue, QueueRef};

pub type BatchId = u64;
pub type ToastId = u64;

/// Abstract user intents, independent of the key that produced them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    // List navigation
    Up,
    Down,
    Left,
    Right,
    Select,
    Open,

    // Operations
    Create,
    Delete,
    Requeue,
    MoveToDeadLetter,

    // Modes
    Filter,
    Help,
    Back,
    Quit,

    // Text entry (filter and forms)
    Char(char),
    Backspace,
    NextField,
    PrevField,
    Submit,
}

/// Where a task was dispatched from; results only apply while this still holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    pub page: Page,
    /// Queue shown on a Details-scoped page at dispatch time
    pub queue_url: Option<String>,
}

impl Origin {
    pub fn page(page: Page) -> Self {
        Self { page, queue_url: None }
    }

    pub fn queue(page: Page, queue: &QueueRef) -> Self {
        Self {
            page,
            queue_url: Some(queue.url.clone()),
        }
    }
}

/// Payload of a completed task: success value xor error
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    QueuesListed(Result<Vec<Queue>, GatewayError>),
    QueueAttributesFetched(Result<Queue, GatewayError>),
    MessagesFetched(Result<Vec<Message>, GatewayError>),
    QueueCreated(Result<QueueRef, GatewayError>),
    QueueDeleted {
        batch: BatchId,
        queue: String,
        result: Result<(), GatewayError>,
    },
    MessageSent {
        batch: BatchId,
        result: Result<String, GatewayError>,
    },
    MessageDeleted {
        batch: BatchId,
        message_id: String,
        result: Result<(), GatewayError>,
        /// Set when the deletion succeeded but could not be audited
        audit_error: Option<String>,
    },
    MessageRequeued {
        message_id: String,
        result: Result<(), GatewayError>,
    },
    MessageMoved {
        batch: BatchId,
        message_id: String,
        result: Result<QueueRef, GatewayError>,
    },
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        match self {
            Outcome::QueuesListed(result) => result.is_ok(),
            Outcome::QueueAttributesFetched(result) => result.is_ok(),
            Outcome::MessagesFetched(result) => result.is_ok(),
            Outcome::QueueCreated(result) => result.is_ok(),
            Outcome::QueueDeleted { result, .. } => result.is_ok(),
            Outcome::MessageSent { result, .. } => result.is_ok(),
            Outcome::MessageDeleted { result, .. } => result.is_ok(),
            Outcome::MessageRequeued { result, .. } => result.is_ok(),
            Outcome::MessageMoved { result, .. } => result.is_ok(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultEvent {
    pub origin: Origin,
    pub outcome: Outcome,
}

/// Everything the reducer consumes
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Intent(Intent),
    Refresh { page: Page, generation: u64 },
    Resize(u16, u16),
    Result(ResultEvent),
    ClearToast(ToastId),
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        Event::Intent(intent)
    }
}

impl From<ResultEvent> for Event {
    fn from(result: ResultEvent) -> Self {
        Event::Result(result)
    }
}
