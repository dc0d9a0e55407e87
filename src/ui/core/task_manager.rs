use super::actions::{Event, Outcome, ResultEvent};
use super::tasks::{Operation, Task};
use crate::audit::AuditLog;
use crate::gateway::{move_to_dead_letter_queue, GatewayError, GatewayResult, Queue, QueueGateway};
use futures::future::join_all;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type TaskId = u64;

#[derive(Debug)]
pub struct BackgroundTask {
    pub id: TaskId,
    pub handle: JoinHandle<()>,
    pub description: String,
}

/// Runs tasks on the tokio runtime; each posts exactly one [`Event`] back.
pub struct TaskManager {
    tasks: HashMap<TaskId, BackgroundTask>,
    next_task_id: TaskId,
    event_sender: mpsc::UnboundedSender<Event>,
    gateway: Arc<dyn QueueGateway>,
    audit: AuditLog,
    deadline: Duration,
}

impl TaskManager {
    pub fn new(
        gateway: Arc<dyn QueueGateway>,
        audit: AuditLog,
        deadline: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<Event>) {
        let (tx, rx) = mpsc::unbounded_channel();

        (
            Self {
                tasks: HashMap::new(),
                next_task_id: 1,
                event_sender: tx,
                gateway,
                audit,
                deadline,
            },
            rx,
        )
    }

    /// Spawn a task in the background
    pub fn spawn(&mut self, task: Task) -> TaskId {
        let task_id = self.next_task_id;
        self.next_task_id += 1;

        let description = task.operation.describe();
        if !task.operation.is_timer() {
            log::debug!("Task {}: {}", task_id, description);
        }

        let event_sender = self.event_sender.clone();
        let gateway = Arc::clone(&self.gateway);
        let audit = self.audit.clone();
        let deadline = self.deadline;

        let handle = tokio::spawn(async move {
            let event = run_task(gateway, audit, deadline, task).await;
            // Receiver gone means the app is shutting down
            let _ = event_sender.send(event);
        });

        let task = BackgroundTask {
            id: task_id,
            handle,
            description,
        };

        self.tasks.insert(task_id, task);
        task_id
    }

    pub fn spawn_all(&mut self, tasks: impl IntoIterator<Item = Task>) {
        for task in tasks {
            self.spawn(task);
        }
    }

    /// Forget finished tasks; their events were already sent. Returns how many.
    pub fn cleanup_finished_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|_, task| !task.handle.is_finished());
        before - self.tasks.len()
    }

    /// Cancel all running tasks
    pub fn cancel_all_tasks(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.handle.abort();
        }
    }

    /// Get the number of active tasks
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        // Cancel all tasks when the manager is dropped
        self.cancel_all_tasks();
    }
}

async fn with_deadline<T, F>(deadline: Duration, call: F) -> GatewayResult<T>
where
    F: Future<Output = GatewayResult<T>>,
{
    match tokio::time::timeout(deadline, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout(deadline)),
    }
}

/// Execute one task to completion and build the single event it produces.
pub async fn run_task(gateway: Arc<dyn QueueGateway>, audit: AuditLog, deadline: Duration, task: Task) -> Event {
    let Task { origin, operation } = task;

    let outcome = match operation {
        Operation::ScheduleRefresh { page, generation, after } => {
            tokio::time::sleep(after).await;
            return Event::Refresh { page, generation };
        }
        Operation::ClearToast { id, after } => {
            tokio::time::sleep(after).await;
            return Event::ClearToast(id);
        }
        Operation::ListQueues => Outcome::QueuesListed(list_queues(gateway.as_ref(), deadline).await),
        Operation::FetchQueueAttributes(queue) => Outcome::QueueAttributesFetched(
            with_deadline(deadline, gateway.fetch_queue_attributes(&queue)).await,
        ),
        Operation::FetchMessages { queue, max_count } => {
            Outcome::MessagesFetched(with_deadline(deadline, gateway.fetch_messages(&queue, max_count)).await)
        }
        Operation::CreateQueue { name, attributes } => {
            Outcome::QueueCreated(with_deadline(deadline, gateway.create_queue(&name, &attributes)).await)
        }
        Operation::DeleteQueue { batch, queue } => Outcome::QueueDeleted {
            batch,
            result: with_deadline(deadline, gateway.delete_queue(&queue.name)).await,
            queue: queue.name,
        },
        Operation::SendMessage { batch, queue, input } => Outcome::MessageSent {
            batch,
            result: with_deadline(deadline, gateway.send_message(&queue, &input)).await,
        },
        Operation::DeleteMessage { batch, queue, message } => {
            let result = with_deadline(deadline, gateway.delete_message(&queue, &message.receipt_handle)).await;
            let audit_error = match &result {
                Ok(()) => append_audit(audit, queue.name.clone(), message.id.clone()).await,
                Err(_) => None,
            };
            Outcome::MessageDeleted {
                batch,
                message_id: message.id,
                result,
                audit_error,
            }
        }
        Operation::RequeueMessage { queue, message } => Outcome::MessageRequeued {
            result: with_deadline(
                deadline,
                gateway.change_message_visibility(&queue, &message.receipt_handle, 0),
            )
            .await,
            message_id: message.id,
        },
        Operation::MoveToDeadLetter { batch, queue, message } => Outcome::MessageMoved {
            batch,
            result: with_deadline(
                deadline,
                move_to_dead_letter_queue(gateway.as_ref(), &queue, &message),
            )
            .await,
            message_id: message.id,
        },
    };

    if let Some(error) = outcome_error(&outcome) {
        log::warn!("Task for {} failed: {}", origin.page, error);
    }

    Event::Result(ResultEvent { origin, outcome })
}

/// List queue URLs, then fetch every queue's attributes concurrently.
/// A queue whose attributes cannot be fetched is still listed by name.
async fn list_queues(gateway: &dyn QueueGateway, deadline: Duration) -> GatewayResult<Vec<Queue>> {
    let refs = with_deadline(deadline, gateway.list_queues()).await?;

    let fetches = refs
        .iter()
        .map(|queue| with_deadline(deadline, gateway.fetch_queue_attributes(queue)));
    let results = join_all(fetches).await;

    Ok(refs
        .iter()
        .zip(results)
        .map(|(queue, result)| match result {
            Ok(attributes) => attributes,
            Err(e) => {
                log::debug!("Attributes of {} unavailable: {}", queue.name, e);
                Queue::from_ref(queue)
            }
        })
        .collect())
}

/// Best-effort audit write; a failure is reported, never propagated.
async fn append_audit(audit: AuditLog, queue: String, message_id: String) -> Option<String> {
    let outcome = tokio::task::spawn_blocking(move || audit.append_deletion(&queue, &message_id)).await;
    match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => {
            log::warn!("Audit write failed: {}", e);
            Some(e.to_string())
        }
        Err(e) => {
            log::warn!("Audit task failed: {}", e);
            Some(e.to_string())
        }
    }
}

fn outcome_error(outcome: &Outcome) -> Option<&GatewayError> {
    match outcome {
        Outcome::QueuesListed(Err(e))
        | Outcome::QueueAttributesFetched(Err(e))
        | Outcome::MessagesFetched(Err(e))
        | Outcome::QueueCreated(Err(e))
        | Outcome::QueueDeleted { result: Err(e), .. }
        | Outcome::MessageSent { result: Err(e), .. }
        | Outcome::MessageDeleted { result: Err(e), .. }
        | Outcome::MessageRequeued { result: Err(e), .. }
        | Outcome::MessageMoved { result: Err(e), .. } => Some(e),
        _ => None,
    }
}
