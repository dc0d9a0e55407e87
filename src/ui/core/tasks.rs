//! Descriptions of deferred work, with arguments captured at dispatch time.

use super::actions::{BatchId, Origin, ToastId};
use super::page::Page;
use crate::gateway::{Message, MessageRef, QueueRef, SendMessageInput};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// List queues and fetch each one's attributes
    ListQueues,
    FetchQueueAttributes(QueueRef),
    FetchMessages {
        queue: QueueRef,
        max_count: u32,
    },
    CreateQueue {
        name: String,
        attributes: BTreeMap<String, String>,
    },
    DeleteQueue {
        batch: BatchId,
        queue: QueueRef,
    },
    SendMessage {
        batch: BatchId,
        queue: QueueRef,
        input: SendMessageInput,
    },
    DeleteMessage {
        batch: BatchId,
        queue: QueueRef,
        message: MessageRef,
    },
    RequeueMessage {
        queue: QueueRef,
        message: MessageRef,
    },
    MoveToDeadLetter {
        batch: BatchId,
        queue: QueueRef,
        message: Message,
    },
    /// Post a refresh tick for `page` after `after`
    ScheduleRefresh {
        page: Page,
        generation: u64,
        after: Duration,
    },
    ClearToast {
        id: ToastId,
        after: Duration,
    },
}

impl Operation {
    pub fn describe(&self) -> String {
        match self {
            Operation::ListQueues => "List queues".to_string(),
            Operation::FetchQueueAttributes(queue) => format!("Fetch attributes of {}", queue.name),
            Operation::FetchMessages { queue, max_count } => format!("Fetch {} messages from {}", max_count, queue.name),
            Operation::CreateQueue { name, .. } => format!("Create queue {name}"),
            Operation::DeleteQueue { queue, .. } => format!("Delete queue {}", queue.name),
            Operation::SendMessage { queue, .. } => format!("Send message to {}", queue.name),
            Operation::DeleteMessage { queue, message, .. } => {
                format!("Delete message {} from {}", message.id, queue.name)
            }
            Operation::RequeueMessage { queue, message } => format!("Requeue message {} on {}", message.id, queue.name),
            Operation::MoveToDeadLetter { queue, message, .. } => {
                format!("Move message {} from {} to its dead-letter queue", message.id, queue.name)
            }
            Operation::ScheduleRefresh { page, .. } => format!("Refresh timer for {page}"),
            Operation::ClearToast { id, .. } => format!("Clear toast {id}"),
        }
    }

    pub fn is_timer(&self) -> bool {
        matches!(self, Operation::ScheduleRefresh { .. } | Operation::ClearToast { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub origin: Origin,
    pub operation: Operation,
}

impl Task {
    pub fn new(origin: Origin, operation: Operation) -> Self {
        Self { origin, operation }
    }

    pub fn timer(operation: Operation) -> Self {
        let page = match &operation {
            Operation::ScheduleRefresh { page, .. } => *page,
            _ => Page::Overview,
        };
        Self {
            origin: Origin::page(page),
            operation,
        }
    }
}
