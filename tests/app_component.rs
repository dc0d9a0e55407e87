use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{backend::TestBackend, Terminal};
use sqsdeck::audit::AuditLog;
use sqsdeck::gateway::{GatewayError, GatewayResult, Message, Queue, QueueGateway, QueueRef, SendMessageInput};
use sqsdeck::ui::core::{EventHandler, EventType, Page};
use sqsdeck::ui::{AppComponent, AppState};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Read-only gateway with a fixed set of queues and messages
struct FixedGateway {
    queues: Vec<&'static str>,
}

fn queue_ref(name: &str) -> QueueRef {
    QueueRef::new(name, format!("http://localhost:4566/000000000000/{name}"))
}

#[async_trait]
impl QueueGateway for FixedGateway {
    async fn list_queues(&self) -> GatewayResult<Vec<QueueRef>> {
        Ok(self.queues.iter().map(|name| queue_ref(name)).collect())
    }

    async fn get_queue_url(&self, name: &str) -> GatewayResult<QueueRef> {
        Ok(queue_ref(name))
    }

    async fn fetch_queue_attributes(&self, queue: &QueueRef) -> GatewayResult<Queue> {
        Ok(Queue::from_ref(queue))
    }

    async fn create_queue(&self, _name: &str, _attributes: &BTreeMap<String, String>) -> GatewayResult<QueueRef> {
        Err(GatewayError::InvalidArgument("read-only".to_string()))
    }

    async fn delete_queue(&self, _name: &str) -> GatewayResult<()> {
        Err(GatewayError::InvalidArgument("read-only".to_string()))
    }

    async fn fetch_messages(&self, _queue: &QueueRef, _max_count: u32) -> GatewayResult<Vec<Message>> {
        Ok(vec![Message {
            id: "5f1c2a9e-message".to_string(),
            body: "{\"order\":42}".to_string(),
            receipt_handle: "rh".to_string(),
            ..Default::default()
        }])
    }

    async fn send_message(&self, _queue: &QueueRef, _input: &SendMessageInput) -> GatewayResult<String> {
        Err(GatewayError::InvalidArgument("read-only".to_string()))
    }

    async fn delete_message(&self, _queue: &QueueRef, _receipt_handle: &str) -> GatewayResult<()> {
        Err(GatewayError::InvalidArgument("read-only".to_string()))
    }

    async fn change_message_visibility(&self, _queue: &QueueRef, _receipt_handle: &str, _seconds: u32) -> GatewayResult<()> {
        Ok(())
    }
}

fn app(queues: Vec<&'static str>) -> AppComponent {
    AppComponent::new(
        AppState::default(),
        Arc::new(FixedGateway { queues }),
        AuditLog::disabled(),
        Duration::from_secs(5),
    )
}

fn key(code: KeyCode) -> EventType {
    EventType::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

/// Apply the next `count` task events
async fn pump(app: &mut AppComponent, count: usize) {
    for _ in 0..count {
        let event = tokio::time::timeout(Duration::from_secs(5), app.next_background_event())
            .await
            .expect("task event in time")
            .expect("channel open");
        app.dispatch(event);
    }
}

fn screen_text(app: &AppComponent) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal.draw(|f| app.render(f, f.area())).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[tokio::test]
async fn test_overview_lists_queues() {
    let mut app = app(vec!["orders", "payments"]);
    app.start();
    assert!(app.active_task_count() >= 1);
    pump(&mut app, 1).await;

    assert_eq!(app.state().overview.queues.len(), 2);
    let text = screen_text(&app);
    assert!(text.contains("orders"));
    assert!(text.contains("payments"));
    assert!(text.contains("profile: default | region: us-east-1"));
}

#[tokio::test]
async fn test_keys_drive_navigation() {
    let mut app = app(vec!["orders", "payments"]);
    app.start();
    pump(&mut app, 1).await;

    assert!(app.handle_terminal_event(key(KeyCode::Char('j'))));
    assert_eq!(app.state().overview.screen.cursor, 1);

    assert!(app.handle_terminal_event(key(KeyCode::Enter)));
    assert_eq!(app.state().page(), Page::Details);
    pump(&mut app, 2).await;
    assert_eq!(app.state().details.messages.len(), 1);
    assert!(screen_text(&app).contains("payments"));

    assert!(app.handle_terminal_event(key(KeyCode::Esc)));
    assert_eq!(app.state().page(), Page::Overview);

    app.handle_terminal_event(key(KeyCode::Char('q')));
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_q_goes_back_before_quitting() {
    let mut app = app(vec!["orders"]);
    app.start();
    pump(&mut app, 1).await;

    app.handle_terminal_event(key(KeyCode::Enter));
    pump(&mut app, 2).await;
    app.handle_terminal_event(key(KeyCode::Enter));
    assert_eq!(app.state().page(), Page::MessageDetails);

    app.handle_terminal_event(key(KeyCode::Char('q')));
    assert_eq!(app.state().page(), Page::Details);
    assert!(!app.should_quit());

    app.handle_terminal_event(key(KeyCode::Char('/')));
    app.handle_terminal_event(key(KeyCode::Char('x')));
    app.handle_terminal_event(key(KeyCode::Enter));
    app.handle_terminal_event(key(KeyCode::Char('q')));
    assert_eq!(app.state().page(), Page::Details);
    assert_eq!(app.state().details.screen.filter, "");

    app.handle_terminal_event(key(KeyCode::Char('q')));
    assert_eq!(app.state().page(), Page::Overview);
    assert!(!app.should_quit());

    app.handle_terminal_event(key(KeyCode::Char('q')));
    assert!(app.should_quit());
}

#[tokio::test]
async fn test_help_panel_renders_on_top() {
    let mut app = app(vec!["orders"]);
    app.start();
    pump(&mut app, 1).await;

    app.handle_terminal_event(key(KeyCode::Char('?')));
    assert!(app.state().show_help);
    assert!(screen_text(&app).contains("Help"));
}

#[tokio::test]
async fn test_resize_is_recorded() {
    let mut app = app(vec![]);
    assert!(app.handle_terminal_event(EventType::Resize(120, 40)));
    assert_eq!(app.state().terminal_size, (120, 40));
    assert!(!app.handle_terminal_event(EventType::Tick));
}

#[tokio::test]
async fn test_event_handler_reports_ticks() {
    let mut event_handler = EventHandler::with_tick_rate(Duration::from_millis(5));
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(event_handler.time_since_last_render() >= Duration::from_millis(10));

    event_handler.mark_rendered();
    assert!(event_handler.time_since_last_render() < Duration::from_millis(10));
}
