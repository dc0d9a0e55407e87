use async_trait::async_trait;
use sqsdeck::audit::{AuditEntry, AuditLog};
use sqsdeck::gateway::{
    GatewayError, GatewayResult, Message, MessageRef, Queue, QueueGateway, QueueRef, RedrivePolicy, SendMessageInput,
};
use sqsdeck::ui::core::{run_task, Event, Intent, Operation, Origin, Outcome, Page, ResultEvent, Task, TaskManager};
use sqsdeck::ui::reducer::{reduce, start};
use sqsdeck::ui::state::{AppState, ToastKind};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

const ENDPOINT: &str = "http://localhost:4566/000000000000";
const DEADLINE: Duration = Duration::from_secs(5);

fn queue_ref(name: &str) -> QueueRef {
    QueueRef::new(name, format!("{ENDPOINT}/{name}"))
}

/// In-memory queue service
#[derive(Default)]
struct MemoryGateway {
    queues: Mutex<BTreeMap<String, Vec<Message>>>,
    dead_letter: Mutex<HashMap<String, String>>,
    broken_attributes: Vec<String>,
    failing_deletes: Vec<String>,
    stall: Option<Duration>,
    next_id: Mutex<u64>,
}

impl MemoryGateway {
    fn with_queues(names: &[&str]) -> Self {
        let gateway = Self::default();
        {
            let mut queues = gateway.queues.lock().unwrap();
            for name in names {
                queues.insert(name.to_string(), Vec::new());
            }
        }
        gateway
    }

    fn push(&self, queue: &str, id: &str, body: &str) {
        let message = Message {
            id: id.to_string(),
            body: body.to_string(),
            receipt_handle: format!("rh-{id}"),
            ..Default::default()
        };
        self.queues.lock().unwrap().entry(queue.to_string()).or_default().push(message);
    }

    fn messages(&self, queue: &str) -> Vec<String> {
        self.queues
            .lock()
            .unwrap()
            .get(queue)
            .map(|messages| messages.iter().map(|m| m.body.clone()).collect())
            .unwrap_or_default()
    }

    fn missing(name: &str) -> GatewayError {
        GatewayError::service("AWS.SimpleQueueService.NonExistentQueue", format!("{name} does not exist"))
    }

    async fn stall(&self) {
        if let Some(delay) = self.stall {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait]
impl QueueGateway for MemoryGateway {
    async fn list_queues(&self) -> GatewayResult<Vec<QueueRef>> {
        Ok(self.queues.lock().unwrap().keys().map(|name| queue_ref(name)).collect())
    }

    async fn get_queue_url(&self, name: &str) -> GatewayResult<QueueRef> {
        if self.queues.lock().unwrap().contains_key(name) {
            Ok(queue_ref(name))
        } else {
            Err(Self::missing(name))
        }
    }

    async fn fetch_queue_attributes(&self, queue: &QueueRef) -> GatewayResult<Queue> {
        if self.broken_attributes.contains(&queue.name) {
            return Err(GatewayError::Transport("connection reset".to_string()));
        }
        let queues = self.queues.lock().unwrap();
        let messages = queues.get(&queue.name).ok_or_else(|| Self::missing(&queue.name))?;
        let mut record = Queue::from_ref(queue);
        record.approximate_visible = messages.len() as u64;
        record.redrive_policy = self.dead_letter.lock().unwrap().get(&queue.name).map(|dlq| RedrivePolicy {
            dead_letter_target_arn: format!("arn:aws:sqs:us-east-1:000000000000:{dlq}"),
            max_receive_count: 3,
        });
        Ok(record)
    }

    async fn create_queue(&self, name: &str, _attributes: &BTreeMap<String, String>) -> GatewayResult<QueueRef> {
        self.queues.lock().unwrap().entry(name.to_string()).or_default();
        Ok(queue_ref(name))
    }

    async fn delete_queue(&self, name: &str) -> GatewayResult<()> {
        self.queues
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Self::missing(name))
    }

    async fn fetch_messages(&self, queue: &QueueRef, max_count: u32) -> GatewayResult<Vec<Message>> {
        self.stall().await;
        let queues = self.queues.lock().unwrap();
        let messages = queues.get(&queue.name).ok_or_else(|| Self::missing(&queue.name))?;
        Ok(messages.iter().take(max_count as usize).cloned().collect())
    }

    async fn send_message(&self, queue: &QueueRef, input: &SendMessageInput) -> GatewayResult<String> {
        let id = {
            let mut next = self.next_id.lock().unwrap();
            *next += 1;
            format!("sent-{next}")
        };
        let mut queues = self.queues.lock().unwrap();
        let messages = queues.get_mut(&queue.name).ok_or_else(|| Self::missing(&queue.name))?;
        messages.push(Message {
            id: id.clone(),
            body: input.body.clone(),
            receipt_handle: format!("rh-{id}"),
            ..Default::default()
        });
        Ok(id)
    }

    async fn delete_message(&self, queue: &QueueRef, receipt_handle: &str) -> GatewayResult<()> {
        if self.failing_deletes.iter().any(|handle| handle == receipt_handle) {
            return Err(GatewayError::service("ReceiptHandleIsInvalid", "expired"));
        }
        let mut queues = self.queues.lock().unwrap();
        let messages = queues.get_mut(&queue.name).ok_or_else(|| Self::missing(&queue.name))?;
        messages.retain(|m| m.receipt_handle != receipt_handle);
        Ok(())
    }

    async fn change_message_visibility(&self, queue: &QueueRef, _receipt_handle: &str, _seconds: u32) -> GatewayResult<()> {
        self.get_queue_url(&queue.name).await.map(|_| ())
    }
}

async fn run(gateway: &Arc<MemoryGateway>, audit: &AuditLog, task: Task) -> Event {
    let gateway: Arc<dyn QueueGateway> = gateway.clone();
    run_task(gateway, audit.clone(), DEADLINE, task).await
}

fn outcome(event: Event) -> Outcome {
    match event {
        Event::Result(ResultEvent { outcome, .. }) => outcome,
        other => panic!("expected a result event, got {other:?}"),
    }
}

fn audit_entries(dir: &TempDir) -> Vec<AuditEntry> {
    let content = std::fs::read_to_string(dir.path().join("audit.log")).unwrap_or_default();
    content.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
}

/// Run every non-timer task through the gateway and feed the results back.
async fn settle(state: &mut AppState, gateway: &Arc<MemoryGateway>, audit: &AuditLog, tasks: Vec<Task>) {
    let mut queue: Vec<Task> = tasks;
    while !queue.is_empty() {
        let mut next = Vec::new();
        for task in queue.drain(..).filter(|t| !t.operation.is_timer()) {
            let event = run(gateway, audit, task).await;
            next.extend(reduce(state, event));
        }
        queue = next;
    }
}

#[tokio::test]
async fn test_list_queues_keeps_queue_without_attributes() {
    let gateway = Arc::new(MemoryGateway {
        broken_attributes: vec!["b".to_string()],
        ..MemoryGateway::with_queues(&["a", "b"])
    });
    gateway.push("a", "m1", "hello");

    let event = run(&gateway, &AuditLog::disabled(), Task::new(Origin::page(Page::Overview), Operation::ListQueues)).await;
    let Outcome::QueuesListed(Ok(queues)) = outcome(event) else {
        panic!("expected listed queues");
    };
    assert_eq!(queues.len(), 2);
    assert_eq!(queues[0].approximate_visible, 1);
    assert_eq!(queues[1].name, "b");
    assert_eq!(queues[1].approximate_visible, 0);
}

#[tokio::test]
async fn test_result_carries_origin() {
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    let origin = Origin::queue(Page::Details, &queue_ref("orders"));
    let task = Task::new(
        origin.clone(),
        Operation::FetchMessages {
            queue: queue_ref("orders"),
            max_count: 10,
        },
    );

    match run(&gateway, &AuditLog::disabled(), task).await {
        Event::Result(result) => assert_eq!(result.origin, origin),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_call_times_out() {
    let gateway: Arc<dyn QueueGateway> = Arc::new(MemoryGateway {
        stall: Some(Duration::from_secs(60)),
        ..MemoryGateway::with_queues(&["orders"])
    });
    let task = Task::new(
        Origin::queue(Page::Details, &queue_ref("orders")),
        Operation::FetchMessages {
            queue: queue_ref("orders"),
            max_count: 10,
        },
    );

    let deadline = Duration::from_millis(50);
    let event = run_task(gateway, AuditLog::disabled(), deadline, task).await;
    assert_eq!(
        outcome(event),
        Outcome::MessagesFetched(Err(GatewayError::Timeout(deadline)))
    );
}

#[tokio::test]
async fn test_timers_post_their_events() {
    let gateway = Arc::new(MemoryGateway::default());
    let audit = AuditLog::disabled();

    let refresh = Task::timer(Operation::ScheduleRefresh {
        page: Page::Details,
        generation: 7,
        after: Duration::from_millis(1),
    });
    assert_eq!(
        run(&gateway, &audit, refresh).await,
        Event::Refresh {
            page: Page::Details,
            generation: 7
        }
    );

    let clear = Task::timer(Operation::ClearToast {
        id: 3,
        after: Duration::from_millis(1),
    });
    assert_eq!(run(&gateway, &audit, clear).await, Event::ClearToast(3));
}

#[tokio::test]
async fn test_delete_message_writes_audit_entry() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("audit.log"));
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    gateway.push("orders", "m1", "one");

    let task = Task::new(
        Origin::queue(Page::MessageDeleteConfirm, &queue_ref("orders")),
        Operation::DeleteMessage {
            batch: 1,
            queue: queue_ref("orders"),
            message: MessageRef {
                id: "m1".to_string(),
                receipt_handle: "rh-m1".to_string(),
            },
        },
    );
    let result = outcome(run(&gateway, &audit, task).await);
    assert!(matches!(
        result,
        Outcome::MessageDeleted {
            result: Ok(()),
            audit_error: None,
            ..
        }
    ));

    let entries = audit_entries(&dir);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].queue, "orders");
    assert_eq!(entries[0].message_id, "m1");
    assert!(gateway.messages("orders").is_empty());
}

#[tokio::test]
async fn test_failed_delete_is_not_audited() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("audit.log"));
    let gateway = Arc::new(MemoryGateway {
        failing_deletes: vec!["rh-m1".to_string()],
        ..MemoryGateway::with_queues(&["orders"])
    });
    gateway.push("orders", "m1", "one");

    let task = Task::new(
        Origin::queue(Page::MessageDeleteConfirm, &queue_ref("orders")),
        Operation::DeleteMessage {
            batch: 1,
            queue: queue_ref("orders"),
            message: MessageRef {
                id: "m1".to_string(),
                receipt_handle: "rh-m1".to_string(),
            },
        },
    );
    let result = outcome(run(&gateway, &audit, task).await);
    assert!(matches!(result, Outcome::MessageDeleted { result: Err(_), .. }));
    assert!(audit_entries(&dir).is_empty());
}

#[tokio::test]
async fn test_unwritable_audit_is_reported() {
    let dir = TempDir::new().unwrap();
    // A regular file where the audit directory should be
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let audit = AuditLog::new(blocker.join("audit.log"));
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    gateway.push("orders", "m1", "one");

    let task = Task::new(
        Origin::queue(Page::MessageDeleteConfirm, &queue_ref("orders")),
        Operation::DeleteMessage {
            batch: 1,
            queue: queue_ref("orders"),
            message: MessageRef {
                id: "m1".to_string(),
                receipt_handle: "rh-m1".to_string(),
            },
        },
    );
    let Outcome::MessageDeleted { result, audit_error, .. } = outcome(run(&gateway, &audit, task).await) else {
        panic!("expected MessageDeleted");
    };
    assert_eq!(result, Ok(()));
    assert!(audit_error.is_some());
}

#[tokio::test]
async fn test_move_without_redrive_policy_fails() {
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    gateway.push("orders", "m1", "one");
    let message = Message {
        id: "m1".to_string(),
        body: "one".to_string(),
        receipt_handle: "rh-m1".to_string(),
        ..Default::default()
    };

    let task = Task::new(
        Origin::queue(Page::MessageDeleteConfirm, &queue_ref("orders")),
        Operation::MoveToDeadLetter {
            batch: 1,
            queue: queue_ref("orders"),
            message,
        },
    );
    let result = outcome(run(&gateway, &AuditLog::disabled(), task).await);
    assert_eq!(
        result,
        Outcome::MessageMoved {
            batch: 1,
            message_id: "m1".to_string(),
            result: Err(GatewayError::NoRedrivePolicy("orders".to_string())),
        }
    );
    assert_eq!(gateway.messages("orders"), vec!["one"]);
}

#[tokio::test]
async fn test_move_copies_then_deletes() {
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders", "orders-dlq"]));
    gateway
        .dead_letter
        .lock()
        .unwrap()
        .insert("orders".to_string(), "orders-dlq".to_string());
    gateway.push("orders", "m1", "poison");
    let message = Message {
        id: "m1".to_string(),
        body: "poison".to_string(),
        receipt_handle: "rh-m1".to_string(),
        ..Default::default()
    };

    let task = Task::new(
        Origin::queue(Page::MessageDeleteConfirm, &queue_ref("orders")),
        Operation::MoveToDeadLetter {
            batch: 1,
            queue: queue_ref("orders"),
            message,
        },
    );
    let result = outcome(run(&gateway, &AuditLog::disabled(), task).await);
    assert!(matches!(result, Outcome::MessageMoved { result: Ok(ref dlq), .. } if dlq.name == "orders-dlq"));
    assert!(gateway.messages("orders").is_empty());
    assert_eq!(gateway.messages("orders-dlq"), vec!["poison"]);
}

#[tokio::test]
async fn test_task_manager_posts_one_event_per_task() {
    let gateway: Arc<dyn QueueGateway> = Arc::new(MemoryGateway::with_queues(&["a", "b"]));
    let (mut manager, mut rx) = TaskManager::new(gateway, AuditLog::disabled(), DEADLINE);

    manager.spawn(Task::new(Origin::page(Page::Overview), Operation::ListQueues));
    manager.spawn(Task::new(
        Origin::page(Page::DeleteConfirm),
        Operation::DeleteQueue {
            batch: 1,
            queue: queue_ref("a"),
        },
    ));

    let mut received = Vec::new();
    for _ in 0..2 {
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("event in time")
            .expect("channel open");
        received.push(event);
    }
    assert!(received
        .iter()
        .any(|e| matches!(e, Event::Result(r) if matches!(r.outcome, Outcome::QueuesListed(Ok(_))))));
    assert!(received
        .iter()
        .any(|e| matches!(e, Event::Result(r) if matches!(r.outcome, Outcome::QueueDeleted { result: Ok(()), .. }))));

    tokio::time::sleep(Duration::from_millis(20)).await;
    manager.cleanup_finished_tasks();
    assert_eq!(manager.task_count(), 0);
}

#[tokio::test]
async fn test_cancelled_timer_posts_nothing() {
    let gateway: Arc<dyn QueueGateway> = Arc::new(MemoryGateway::default());
    let (mut manager, mut rx) = TaskManager::new(gateway, AuditLog::disabled(), DEADLINE);

    manager.spawn(Task::timer(Operation::ClearToast {
        id: 1,
        after: Duration::from_secs(60),
    }));
    assert_eq!(manager.task_count(), 1);
    manager.cancel_all_tasks();
    assert_eq!(manager.task_count(), 0);
    drop(manager);

    assert_eq!(rx.recv().await, None);
}

#[tokio::test]
async fn test_bulk_delete_end_to_end() {
    let dir = TempDir::new().unwrap();
    let audit = AuditLog::new(dir.path().join("audit.log"));
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    gateway.push("orders", "m1", "one");
    gateway.push("orders", "m2", "two");

    let mut state = AppState::default();
    let tasks = start(&mut state);
    settle(&mut state, &gateway, &audit, tasks).await;
    assert_eq!(state.overview.queues.len(), 1);

    let tasks = reduce(&mut state, Event::Intent(Intent::Open));
    settle(&mut state, &gateway, &audit, tasks).await;
    assert_eq!(state.details.messages.len(), 2);

    for intent in [Intent::Select, Intent::Down, Intent::Select, Intent::Delete, Intent::Right] {
        reduce(&mut state, Event::Intent(intent));
    }
    let tasks = reduce(&mut state, Event::Intent(Intent::Open));
    settle(&mut state, &gateway, &audit, tasks).await;

    let progress = state.delete_messages.progress.as_ref().expect("progress");
    assert_eq!(progress.summary(), "2/2");
    assert_eq!(state.toast.as_ref().map(|t| t.kind), Some(ToastKind::Success));
    assert!(gateway.messages("orders").is_empty());

    let mut audited: Vec<String> = audit_entries(&dir).into_iter().map(|e| e.message_id).collect();
    audited.sort();
    assert_eq!(audited, vec!["m1", "m2"]);

    let tasks = reduce(&mut state, Event::Intent(Intent::Open));
    settle(&mut state, &gateway, &audit, tasks).await;
    assert_eq!(state.page(), Page::Details);
    assert!(state.details.messages.is_empty());
}

#[tokio::test]
async fn test_send_batch_end_to_end() {
    let gateway = Arc::new(MemoryGateway::with_queues(&["orders"]));
    let audit = AuditLog::disabled();

    let mut state = AppState::default();
    let tasks = start(&mut state);
    settle(&mut state, &gateway, &audit, tasks).await;
    let tasks = reduce(&mut state, Event::Intent(Intent::Open));
    settle(&mut state, &gateway, &audit, tasks).await;

    reduce(&mut state, Event::Intent(Intent::Create));
    for c in "first\n---\nsecond\n---\nthird".chars() {
        reduce(&mut state, Event::Intent(Intent::Char(c)));
    }
    let tasks = reduce(&mut state, Event::Intent(Intent::Submit));
    settle(&mut state, &gateway, &audit, tasks).await;

    assert_eq!(gateway.messages("orders"), vec!["first", "second", "third"]);
    assert_eq!(state.page(), Page::Details);
    assert_eq!(state.details.messages.len(), 3);
    assert!(!state.is_loading());
}
