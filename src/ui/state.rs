//! Application state owned by the reducer.

use super::core::{BatchId, Navigation, Page, ScreenState, ToastId};
use super::forms::{CreateQueueForm, MessageCreateForm};
use crate::config::{AwsConfig, UiConfig};
use crate::gateway::{Message, Queue, QueueRef};
use crate::ui::core::matches_filter;
use std::time::Duration;

/// Reducer settings taken from the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub refresh_interval: Duration,
    pub toast_duration: Duration,
    pub message_fetch_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl From<&UiConfig> for Settings {
    fn from(config: &UiConfig) -> Self {
        Self {
            refresh_interval: config.refresh_interval(),
            toast_duration: config.toast_duration(),
            message_fetch_count: config.message_fetch_count,
        }
    }
}

/// Profile and region the session talks to, shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub profile: String,
    pub region: String,
}

impl Default for Connection {
    fn default() -> Self {
        Self::from(&AwsConfig::default())
    }
}

impl From<&AwsConfig> for Connection {
    fn from(config: &AwsConfig) -> Self {
        Self {
            profile: config.profile.clone(),
            region: config.region.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

/// The single transient notice slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub text: String,
}

/// A blocking operation in flight; input other than Help/Quit waits for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub status: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmChoice {
    #[default]
    Abort,
    Confirm,
}

impl ConfirmChoice {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Abort => ConfirmChoice::Confirm,
            ConfirmChoice::Confirm => ConfirmChoice::Abort,
        }
    }
}

/// Per-item results of a bulk operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkProgress {
    pub batch: BatchId,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl BulkProgress {
    pub fn new(batch: BatchId, total: usize) -> Self {
        Self {
            batch,
            total,
            succeeded: 0,
            failed: 0,
            errors: Vec::new(),
        }
    }

    pub fn record(&mut self, error: Option<String>) {
        match error {
            None => self.succeeded += 1,
            Some(error) => {
                self.failed += 1;
                self.errors.push(error);
            }
        }
    }

    pub fn reported(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_done(&self) -> bool {
        self.reported() >= self.total
    }

    /// `n/m` as shown to the user
    pub fn summary(&self) -> String {
        format!("{}/{}", self.succeeded, self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverviewState {
    pub screen: ScreenState,
    pub queues: Vec<Queue>,
}

impl OverviewState {
    /// Indices into `queues` matching the filter, in display order
    pub fn visible_indices(&self) -> Vec<usize> {
        self.queues
            .iter()
            .enumerate()
            .filter(|(_, queue)| matches_filter(&self.screen.filter, &[queue.name.as_str()]))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn visible(&self) -> Vec<&Queue> {
        self.visible_indices().into_iter().map(|i| &self.queues[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible_indices().len()
    }

    pub fn cursor_queue(&self) -> Option<&Queue> {
        self.visible().get(self.screen.cursor).copied()
    }

    fn visible_keys(&self) -> Vec<String> {
        self.visible().into_iter().map(|queue| queue.url.clone()).collect()
    }

    /// Replace the list, keeping cursor and selection on the same queues.
    pub fn replace_queues(&mut self, queues: Vec<Queue>) {
        let before = self.visible_keys();
        self.queues = queues;
        let after = self.visible_keys();
        self.screen.rekey(&before, &after);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailsState {
    pub screen: ScreenState,
    pub queue_ref: Option<QueueRef>,
    pub queue: Option<Queue>,
    pub messages: Vec<Message>,
    pub attributes_loading: bool,
    pub messages_loading: bool,
}

impl DetailsState {
    pub fn visible_indices(&self) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, message)| matches_filter(&self.screen.filter, &[message.id.as_str(), message.body.as_str()]))
            .map(|(index, _)| index)
            .collect()
    }

    pub fn visible(&self) -> Vec<&Message> {
        self.visible_indices().into_iter().map(|i| &self.messages[i]).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible_indices().len()
    }

    pub fn cursor_message(&self) -> Option<&Message> {
        self.visible().get(self.screen.cursor).copied()
    }

    pub fn is_fifo(&self) -> bool {
        match (&self.queue, &self.queue_ref) {
            (Some(queue), _) => queue.is_fifo(),
            (None, Some(queue_ref)) => queue_ref.is_fifo(),
            (None, None) => false,
        }
    }

    pub fn content_based_deduplication(&self) -> bool {
        self.queue.as_ref().is_some_and(|q| q.content_based_deduplication)
    }

    fn visible_keys(&self) -> Vec<String> {
        self.visible().into_iter().map(|message| message.id.clone()).collect()
    }

    pub fn replace_messages(&mut self, messages: Vec<Message>) {
        let before = self.visible_keys();
        self.messages = messages;
        let after = self.visible_keys();
        self.screen.rekey(&before, &after);
    }

    /// Drop a message that no longer exists in the queue
    pub fn invalidate_message(&mut self, message_id: &str) {
        let before = self.visible_keys();
        self.messages.retain(|message| message.id != message_id);
        let after = self.visible_keys();
        self.screen.rekey(&before, &after);
    }

    pub fn sync_loading(&mut self) {
        self.screen.loading = self.attributes_loading || self.messages_loading;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateState {
    pub screen: ScreenState,
    pub form: CreateQueueForm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueueDeleteState {
    pub screen: ScreenState,
    pub targets: Vec<QueueRef>,
    pub choice: ConfirmChoice,
    pub progress: Option<BulkProgress>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDetailsState {
    pub screen: ScreenState,
    pub message: Option<Message>,
    /// First body line shown
    pub scroll: usize,
}

impl MessageDetailsState {
    pub fn body_lines(&self) -> usize {
        self.message.as_ref().map(|m| m.body.lines().count()).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCreateState {
    pub screen: ScreenState,
    pub form: MessageCreateForm,
    pub progress: Option<BulkProgress>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MessageAction {
    #[default]
    Delete,
    MoveToDeadLetter,
}

impl MessageAction {
    pub fn verb(self) -> &'static str {
        match self {
            MessageAction::Delete => "Delete",
            MessageAction::MoveToDeadLetter => "Move to dead-letter queue",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDeleteState {
    pub screen: ScreenState,
    pub targets: Vec<Message>,
    pub action: MessageAction,
    pub choice: ConfirmChoice,
    pub progress: Option<BulkProgress>,
    /// Deletions that succeeded but could not be written to the audit log
    pub audit_failures: Vec<String>,
}

/// Everything the reducer owns
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub nav: Navigation,
    pub overview: OverviewState,
    pub details: DetailsState,
    pub create: CreateState,
    pub delete_queues: QueueDeleteState,
    pub message_details: MessageDetailsState,
    pub message_create: MessageCreateState,
    pub delete_messages: MessageDeleteState,

    pub toast: Option<Toast>,
    pub pending: Option<PendingOperation>,
    pub show_help: bool,
    pub terminal_size: (u16, u16),
    pub should_quit: bool,

    pub settings: Settings,
    pub connection: Connection,
    /// Bumped whenever a page arms its refresh timer
    pub refresh_generation: u64,
    pub(crate) next_batch: BatchId,
    pub(crate) next_toast: ToastId,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            nav: Navigation::default(),
            overview: OverviewState::default(),
            details: DetailsState::default(),
            create: CreateState::default(),
            delete_queues: QueueDeleteState::default(),
            message_details: MessageDetailsState::default(),
            message_create: MessageCreateState::default(),
            delete_messages: MessageDeleteState::default(),
            toast: None,
            pending: None,
            show_help: false,
            terminal_size: (0, 0),
            should_quit: false,
            settings,
            connection: Connection::default(),
            refresh_generation: 0,
            next_batch: 1,
            next_toast: 1,
        }
    }

    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connection = connection;
        self
    }

    pub fn page(&self) -> Page {
        self.nav.current()
    }

    /// Global loading flag
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn status(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.status.as_str())
    }

    /// Text of the current error notice, if the slot holds one
    pub fn error(&self) -> Option<&str> {
        self.toast
            .as_ref()
            .filter(|toast| toast.kind != ToastKind::Success)
            .map(|toast| toast.text.as_str())
    }

    pub fn screen(&self, page: Page) -> &ScreenState {
        match page {
            Page::Overview => &self.overview.screen,
            Page::Details => &self.details.screen,
            Page::Create => &self.create.screen,
            Page::DeleteConfirm => &self.delete_queues.screen,
            Page::MessageDetails => &self.message_details.screen,
            Page::MessageCreate => &self.message_create.screen,
            Page::MessageDeleteConfirm => &self.delete_messages.screen,
        }
    }

    pub fn screen_mut(&mut self, page: Page) -> &mut ScreenState {
        match page {
            Page::Overview => &mut self.overview.screen,
            Page::Details => &mut self.details.screen,
            Page::Create => &mut self.create.screen,
            Page::DeleteConfirm => &mut self.delete_queues.screen,
            Page::MessageDetails => &mut self.message_details.screen,
            Page::MessageCreate => &mut self.message_create.screen,
            Page::MessageDeleteConfirm => &mut self.delete_messages.screen,
        }
    }

    /// Length of the list the page's cursor indexes
    pub fn list_len(&self, page: Page) -> usize {
        match page {
            Page::Overview => self.overview.visible_len(),
            Page::Details => self.details.visible_len(),
            _ => 0,
        }
    }

    pub(crate) fn take_batch_id(&mut self) -> BatchId {
        let id = self.next_batch;
        self.next_batch += 1;
        id
    }

    pub(crate) fn take_toast_id(&mut self) -> ToastId {
        let id = self.next_toast;
        self.next_toast += 1;
        id
    }
}
