use crate::audit::AuditLog;
use crate::gateway::QueueGateway;
use crate::ui::components::{
    ConfirmDialog, HelpPanel, MessageForm, MessageView, NoticeBar, QueueDetailsView, QueueForm, QueueListView,
    StatusBar,
};
use crate::ui::core::{event_handler::EventType, Event, Page, TaskManager};
use crate::ui::keys::{intent_for, InputMode};
use crate::ui::layout::LayoutManager;
use crate::ui::reducer;
use crate::ui::state::AppState;
use ratatui::{layout::Rect, Frame};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Owns the state and the task runner; feeds every event through the reducer.
pub struct AppComponent {
    state: AppState,
    task_manager: TaskManager,
    event_rx: mpsc::UnboundedReceiver<Event>,
}

impl AppComponent {
    pub fn new(state: AppState, gateway: Arc<dyn QueueGateway>, audit: AuditLog, deadline: Duration) -> Self {
        let (task_manager, event_rx) = TaskManager::new(gateway, audit, deadline);
        Self {
            state,
            task_manager,
            event_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.state.should_quit
    }

    /// Get the number of active background tasks
    pub fn active_task_count(&self) -> usize {
        self.task_manager.task_count()
    }

    /// Kick off the initial queue listing and the overview refresh timer
    pub fn start(&mut self) {
        log::info!("AppComponent: starting on {}", self.state.page());
        let tasks = reducer::start(&mut self.state);
        self.task_manager.spawn_all(tasks);
    }

    /// Reduce one event and spawn whatever it asks for
    pub fn dispatch(&mut self, event: Event) {
        let tasks = reducer::reduce(&mut self.state, event);
        if !tasks.is_empty() {
            log::debug!("AppComponent: dispatching {} task(s)", tasks.len());
        }
        self.task_manager.spawn_all(tasks);
    }

    /// Drain completed task events. Returns how many were applied.
    pub fn process_background_events(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.dispatch(event);
            processed += 1;
        }

        let cleaned = self.task_manager.cleanup_finished_tasks();
        if cleaned > 0 {
            log::debug!("Background: cleaned up {} finished tasks", cleaned);
        }
        processed
    }

    /// Wait for the next task event; used by tests driving the loop directly.
    pub async fn next_background_event(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }

    /// Route a terminal event. Returns true when something changed on screen.
    pub fn handle_terminal_event(&mut self, event: EventType) -> bool {
        match event {
            EventType::Key(key) => {
                let mode = InputMode::for_state(&self.state);
                match intent_for(key, mode) {
                    Some(intent) => {
                        log::debug!("Key {:?} in {:?} mode -> {:?}", key.code, mode, intent);
                        self.dispatch(Event::Intent(intent));
                        true
                    }
                    None => false,
                }
            }
            EventType::Resize(width, height) => {
                self.dispatch(Event::Resize(width, height));
                true
            }
            EventType::Tick | EventType::Other => false,
        }
    }

    /// Project the state onto the frame; rendering never mutates state.
    pub fn render(&self, f: &mut Frame, rect: Rect) {
        let [main, notice, status] = LayoutManager::main_layout(rect);
        let state = &self.state;

        match state.page() {
            Page::Overview => QueueListView::render(f, main, state),
            Page::Details => QueueDetailsView::render(f, main, state),
            Page::Create => {
                QueueListView::render(f, main, state);
                QueueForm::render(f, main, state);
            }
            Page::DeleteConfirm => {
                QueueListView::render(f, main, state);
                ConfirmDialog::render_queue_delete(f, main, state);
            }
            Page::MessageDetails => MessageView::render(f, main, state),
            Page::MessageCreate => {
                QueueDetailsView::render(f, main, state);
                MessageForm::render(f, main, state);
            }
            Page::MessageDeleteConfirm => {
                QueueDetailsView::render(f, main, state);
                ConfirmDialog::render_message_action(f, main, state);
            }
        }

        NoticeBar::render(f, notice, state);
        StatusBar::render(f, status, state);

        // Help goes on top of everything
        if state.show_help {
            HelpPanel::render(f, rect, state);
        }
    }
}

