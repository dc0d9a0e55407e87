//! The single update step: one event in, state mutated, tasks out.
//!
//! Nothing here performs I/O. Remote calls and timers are returned as
//! [`Task`]s for the task manager to run; their completions come back as
//! events through [`reduce`] like everything else.

use super::core::{Event, Intent, Operation, Origin, Outcome, Page, ResultEvent, ScreenState, Task};
use super::state::{
    AppState, BulkProgress, ConfirmChoice, CreateState, MessageAction, MessageCreateState, MessageDeleteState,
    MessageDetailsState, PendingOperation, QueueDeleteState, Toast, ToastKind,
};
use crate::constants::*;
use crate::gateway::{Message, Queue, QueueRef};

/// Tasks to run once at startup: load the overview and arm its refresh.
pub fn start(state: &mut AppState) -> Vec<Task> {
    let mut tasks = Vec::new();
    load_overview(state, &mut tasks);
    arm_refresh(state, Page::Overview, &mut tasks);
    tasks
}

/// Apply one event to `state` and return the tasks it triggers.
pub fn reduce(state: &mut AppState, event: Event) -> Vec<Task> {
    let mut tasks = Vec::new();
    match event {
        Event::Intent(intent) => on_intent(state, intent, &mut tasks),
        Event::Refresh { page, generation } => on_refresh(state, page, generation, &mut tasks),
        Event::Resize(width, height) => state.terminal_size = (width, height),
        Event::Result(result) => on_result(state, result, &mut tasks),
        Event::ClearToast(id) => {
            if state.toast.as_ref().is_some_and(|toast| toast.id == id) {
                state.toast = None;
            }
        }
    }
    tasks
}

// --- Notices, navigation and refresh ---

fn notify(state: &mut AppState, kind: ToastKind, text: impl Into<String>, tasks: &mut Vec<Task>) {
    let id = state.take_toast_id();
    state.toast = Some(Toast {
        id,
        kind,
        text: text.into(),
    });
    // Errors stay until the next navigation or notice
    if kind == ToastKind::Success {
        tasks.push(Task::timer(Operation::ClearToast {
            id,
            after: state.settings.toast_duration,
        }));
    }
}

fn fail(state: &mut AppState, page: Page, text: String, tasks: &mut Vec<Task>) {
    let screen = state.screen_mut(page);
    screen.loading = false;
    screen.error = Some(text.clone());
    notify(state, ToastKind::Error, text, tasks);
}

fn navigate(state: &mut AppState, page: Page) {
    let from = state.page();
    if !state.nav.go(page) {
        return;
    }
    state.toast = None;
    // Results of fetches still in flight for `from` will be dropped as stale
    if from.auto_refreshes() {
        if from == Page::Details {
            state.details.attributes_loading = false;
            state.details.messages_loading = false;
        }
        state.screen_mut(from).loading = false;
    }
}

/// Start a fresh timer chain for `page`; older chains die on their next tick.
fn arm_refresh(state: &mut AppState, page: Page, tasks: &mut Vec<Task>) {
    state.refresh_generation += 1;
    tasks.push(Task::timer(Operation::ScheduleRefresh {
        page,
        generation: state.refresh_generation,
        after: state.settings.refresh_interval,
    }));
}

fn on_refresh(state: &mut AppState, page: Page, generation: u64, tasks: &mut Vec<Task>) {
    if page != state.page() || generation != state.refresh_generation {
        log::debug!("Dropping refresh tick for {} (generation {})", page, generation);
        return;
    }

    if state.pending.is_none() {
        match page {
            Page::Overview if !state.overview.screen.loading => load_overview(state, tasks),
            Page::Details if !state.details.screen.loading => load_details(state, tasks),
            _ => {}
        }
    }

    tasks.push(Task::timer(Operation::ScheduleRefresh {
        page,
        generation,
        after: state.settings.refresh_interval,
    }));
}

fn load_overview(state: &mut AppState, tasks: &mut Vec<Task>) {
    state.overview.screen.loading = true;
    tasks.push(Task::new(Origin::page(Page::Overview), Operation::ListQueues));
}

fn load_details(state: &mut AppState, tasks: &mut Vec<Task>) {
    let Some(queue) = state.details.queue_ref.clone() else {
        return;
    };
    let origin = Origin::queue(Page::Details, &queue);
    state.details.attributes_loading = true;
    state.details.messages_loading = true;
    state.details.sync_loading();
    tasks.push(Task::new(origin.clone(), Operation::FetchQueueAttributes(queue.clone())));
    tasks.push(Task::new(
        origin,
        Operation::FetchMessages {
            queue,
            max_count: state.settings.message_fetch_count,
        },
    ));
}

fn enter_overview(state: &mut AppState, reload: bool, tasks: &mut Vec<Task>) {
    navigate(state, Page::Overview);
    state.overview.screen.filtering = false;
    if reload || state.overview.queues.is_empty() {
        load_overview(state, tasks);
    }
    arm_refresh(state, Page::Overview, tasks);
}

/// Open a queue from the overview; always reloads attributes and messages.
fn enter_details(state: &mut AppState, queue: Queue, tasks: &mut Vec<Task>) {
    let queue_ref = queue.queue_ref();
    let details = &mut state.details;
    details.screen.reset();
    if details.queue_ref.as_ref() != Some(&queue_ref) {
        details.messages.clear();
        details.queue = Some(queue);
        details.queue_ref = Some(queue_ref);
    }
    navigate(state, Page::Details);
    load_details(state, tasks);
    arm_refresh(state, Page::Details, tasks);
}

fn return_to_details(state: &mut AppState, reload: bool, tasks: &mut Vec<Task>) {
    navigate(state, Page::Details);
    state.details.screen.filtering = false;
    if reload {
        load_details(state, tasks);
    }
    arm_refresh(state, Page::Details, tasks);
}

// --- Intents ---

fn on_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    match intent {
        Intent::Quit => {
            state.should_quit = true;
            return;
        }
        Intent::Help => {
            state.show_help = !state.show_help;
            return;
        }
        _ => {}
    }

    if state.show_help {
        if intent == Intent::Back {
            state.show_help = false;
        }
        return;
    }

    if let Some(pending) = &state.pending {
        log::debug!("Holding {:?} while '{}' is pending", intent, pending.status);
        return;
    }

    match state.page() {
        Page::Overview => overview_intent(state, intent, tasks),
        Page::Details => details_intent(state, intent, tasks),
        Page::Create => create_intent(state, intent, tasks),
        Page::DeleteConfirm => queue_delete_intent(state, intent, tasks),
        Page::MessageDetails => message_details_intent(state, intent, tasks),
        Page::MessageCreate => message_create_intent(state, intent, tasks),
        Page::MessageDeleteConfirm => message_delete_intent(state, intent, tasks),
    }
}

/// Keystrokes while the filter is being edited; returns true if consumed.
fn filter_intent(screen: &mut ScreenState, intent: Intent) -> bool {
    if !screen.filtering {
        return false;
    }
    match intent {
        Intent::Char(c) => screen.push_filter(c),
        Intent::Backspace => screen.pop_filter(),
        Intent::Open | Intent::Submit => screen.filtering = false,
        Intent::Back => screen.clear_filter(),
        _ => return false,
    }
    true
}

/// Cursor movement and selection on list pages; returns true if consumed.
fn list_intent(state: &mut AppState, page: Page, intent: Intent) -> bool {
    let len = state.list_len(page);
    let screen = state.screen_mut(page);
    match intent {
        Intent::Up => screen.move_up(len),
        Intent::Down => screen.move_down(len),
        Intent::Select => screen.toggle_select(len),
        _ => return false,
    }
    true
}

fn overview_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    if filter_intent(&mut state.overview.screen, intent) || list_intent(state, Page::Overview, intent) {
        return;
    }

    match intent {
        Intent::Filter => state.overview.screen.filtering = true,
        Intent::Open => {
            if let Some(queue) = state.overview.cursor_queue().cloned() {
                enter_details(state, queue, tasks);
            }
        }
        Intent::Create => {
            state.create = CreateState::default();
            navigate(state, Page::Create);
        }
        Intent::Delete => {
            let targets: Vec<QueueRef> = {
                let visible = state.overview.visible();
                state
                    .overview
                    .screen
                    .targets(visible.len())
                    .into_iter()
                    .map(|index| visible[index].queue_ref())
                    .collect()
            };
            if targets.is_empty() {
                notify(state, ToastKind::Error, ERROR_NOTHING_SELECTED, tasks);
                return;
            }
            state.delete_queues = QueueDeleteState {
                targets,
                ..Default::default()
            };
            navigate(state, Page::DeleteConfirm);
        }
        Intent::Back => {
            if state.overview.screen.has_filter() {
                state.overview.screen.clear_filter();
            } else {
                state.should_quit = true;
            }
        }
        _ => {}
    }
}

/// Bulk targets on the details page: the selection, else the cursor message
fn details_targets(state: &AppState) -> Vec<Message> {
    let visible = state.details.visible();
    state
        .details
        .screen
        .targets(visible.len())
        .into_iter()
        .map(|index| visible[index].clone())
        .collect()
}

fn details_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    if filter_intent(&mut state.details.screen, intent) || list_intent(state, Page::Details, intent) {
        return;
    }

    match intent {
        Intent::Filter => state.details.screen.filtering = true,
        Intent::Open => {
            if let Some(message) = state.details.cursor_message().cloned() {
                state.message_details = MessageDetailsState {
                    message: Some(message),
                    ..Default::default()
                };
                navigate(state, Page::MessageDetails);
            }
        }
        Intent::Create => {
            state.message_create = MessageCreateState::default();
            navigate(state, Page::MessageCreate);
        }
        Intent::Delete => {
            let targets = details_targets(state);
            open_message_confirm(state, MessageAction::Delete, targets, tasks);
        }
        Intent::MoveToDeadLetter => {
            let targets = details_targets(state);
            open_message_confirm(state, MessageAction::MoveToDeadLetter, targets, tasks);
        }
        Intent::Requeue => {
            if let Some(message) = state.details.cursor_message().cloned() {
                requeue(state, Page::Details, &message, tasks);
            }
        }
        Intent::Back => {
            if state.details.screen.has_filter() {
                state.details.screen.clear_filter();
            } else {
                enter_overview(state, false, tasks);
            }
        }
        _ => {}
    }
}

fn message_details_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    let lines = state.message_details.body_lines();
    match intent {
        Intent::Up => state.message_details.scroll = state.message_details.scroll.saturating_sub(1),
        Intent::Down => {
            state.message_details.scroll = (state.message_details.scroll + 1).min(lines.saturating_sub(1));
        }
        Intent::Delete | Intent::MoveToDeadLetter => {
            let action = if intent == Intent::Delete {
                MessageAction::Delete
            } else {
                MessageAction::MoveToDeadLetter
            };
            let targets = state.message_details.message.iter().cloned().collect();
            open_message_confirm(state, action, targets, tasks);
        }
        Intent::Requeue => {
            if let Some(message) = state.message_details.message.clone() {
                requeue(state, Page::MessageDetails, &message, tasks);
            }
        }
        Intent::Back => return_to_details(state, false, tasks),
        _ => {}
    }
}

fn requeue(state: &mut AppState, page: Page, message: &Message, tasks: &mut Vec<Task>) {
    let Some(queue) = state.details.queue_ref.clone() else {
        return;
    };
    state.pending = Some(PendingOperation {
        status: STATUS_REQUEUEING_MESSAGE.to_string(),
    });
    state.screen_mut(page).loading = true;
    tasks.push(Task::new(
        Origin::queue(page, &queue),
        Operation::RequeueMessage {
            queue,
            message: message.message_ref(),
        },
    ));
}

fn create_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    let form = &mut state.create.form;
    match intent {
        Intent::Up | Intent::PrevField => form.prev_field(),
        Intent::Down | Intent::NextField => form.next_field(),
        Intent::Left => form.cycle(false),
        Intent::Right => form.cycle(true),
        Intent::Char(' ') if form.focus.is_choice() => form.cycle(true),
        Intent::Char(c) => form.insert_char(c),
        Intent::Backspace => form.backspace(),
        Intent::Submit | Intent::Open => submit_create(state, tasks),
        Intent::Back => enter_overview(state, false, tasks),
        _ => {}
    }
}

fn submit_create(state: &mut AppState, tasks: &mut Vec<Task>) {
    match state.create.form.to_config() {
        Err(error) => {
            log::debug!("Create form rejected: {}", error);
            state.create.form.error = Some(error.clone());
            state.create.screen.error = Some(error);
        }
        Ok(config) => {
            state.create.form.error = None;
            state.create.screen.error = None;
            state.create.screen.loading = true;
            state.pending = Some(PendingOperation {
                status: STATUS_CREATING_QUEUE.to_string(),
            });
            tasks.push(Task::new(
                Origin::page(Page::Create),
                Operation::CreateQueue {
                    name: config.queue_name(),
                    attributes: config.attributes(),
                },
            ));
        }
    }
}

/// Left/Right/Up/Down/Select/Tab all flip a confirm dialog's choice
fn is_choice_toggle(intent: Intent) -> bool {
    matches!(
        intent,
        Intent::Left | Intent::Right | Intent::Up | Intent::Down | Intent::Select | Intent::NextField | Intent::PrevField
    )
}

fn queue_delete_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    if state.delete_queues.progress.is_some() {
        if matches!(intent, Intent::Open | Intent::Submit | Intent::Back) {
            state.delete_queues.progress = None;
            state.overview.screen.selected.clear();
            enter_overview(state, true, tasks);
        }
        return;
    }

    match intent {
        _ if is_choice_toggle(intent) => state.delete_queues.choice = state.delete_queues.choice.toggle(),
        Intent::Open | Intent::Submit => match state.delete_queues.choice {
            ConfirmChoice::Abort => enter_overview(state, false, tasks),
            ConfirmChoice::Confirm => start_queue_delete(state, tasks),
        },
        Intent::Back => enter_overview(state, false, tasks),
        _ => {}
    }
}

fn start_queue_delete(state: &mut AppState, tasks: &mut Vec<Task>) {
    let batch = state.take_batch_id();
    let targets = state.delete_queues.targets.clone();
    state.delete_queues.progress = Some(BulkProgress::new(batch, targets.len()));
    state.delete_queues.screen.loading = true;
    state.pending = Some(PendingOperation {
        status: format!("{} (0/{})", STATUS_DELETING_QUEUES, targets.len()),
    });
    for queue in targets {
        tasks.push(Task::new(
            Origin::page(Page::DeleteConfirm),
            Operation::DeleteQueue { batch, queue },
        ));
    }
}

fn open_message_confirm(state: &mut AppState, action: MessageAction, targets: Vec<Message>, tasks: &mut Vec<Task>) {
    if targets.is_empty() {
        notify(state, ToastKind::Error, ERROR_NOTHING_SELECTED, tasks);
        return;
    }
    state.delete_messages = MessageDeleteState {
        targets,
        action,
        ..Default::default()
    };
    navigate(state, Page::MessageDeleteConfirm);
}

fn message_delete_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    if state.delete_messages.progress.is_some() {
        if matches!(intent, Intent::Open | Intent::Submit | Intent::Back) {
            state.delete_messages.progress = None;
            state.details.screen.selected.clear();
            return_to_details(state, true, tasks);
        }
        return;
    }

    let abort = |state: &mut AppState, tasks: &mut Vec<Task>| match state.nav.back_target() {
        Some(Page::MessageDetails) => navigate(state, Page::MessageDetails),
        _ => return_to_details(state, false, tasks),
    };

    match intent {
        _ if is_choice_toggle(intent) => state.delete_messages.choice = state.delete_messages.choice.toggle(),
        Intent::Open | Intent::Submit => match state.delete_messages.choice {
            ConfirmChoice::Abort => abort(state, tasks),
            ConfirmChoice::Confirm => start_message_bulk(state, tasks),
        },
        Intent::Back => abort(state, tasks),
        _ => {}
    }
}

fn start_message_bulk(state: &mut AppState, tasks: &mut Vec<Task>) {
    let Some(queue) = state.details.queue_ref.clone() else {
        return;
    };
    let batch = state.take_batch_id();
    let action = state.delete_messages.action;
    let targets = state.delete_messages.targets.clone();
    let status = match action {
        MessageAction::Delete => STATUS_DELETING_MESSAGES,
        MessageAction::MoveToDeadLetter => STATUS_MOVING_MESSAGES,
    };

    state.delete_messages.progress = Some(BulkProgress::new(batch, targets.len()));
    state.delete_messages.screen.loading = true;
    state.pending = Some(PendingOperation {
        status: format!("{} (0/{})", status, targets.len()),
    });

    let origin = Origin::queue(Page::MessageDeleteConfirm, &queue);
    for message in targets {
        let operation = match action {
            MessageAction::Delete => Operation::DeleteMessage {
                batch,
                queue: queue.clone(),
                message: message.message_ref(),
            },
            MessageAction::MoveToDeadLetter => Operation::MoveToDeadLetter {
                batch,
                queue: queue.clone(),
                message,
            },
        };
        tasks.push(Task::new(origin.clone(), operation));
    }
}

fn message_create_intent(state: &mut AppState, intent: Intent, tasks: &mut Vec<Task>) {
    let fifo = state.details.is_fifo();
    let form = &mut state.message_create.form;
    match intent {
        Intent::Up | Intent::PrevField => form.prev_field(fifo),
        Intent::Down | Intent::NextField => form.next_field(fifo),
        Intent::Char(c) => form.insert_char(c),
        Intent::Backspace => form.backspace(),
        Intent::Submit => submit_messages(state, tasks),
        Intent::Back => return_to_details(state, false, tasks),
        _ => {}
    }
}

fn submit_messages(state: &mut AppState, tasks: &mut Vec<Task>) {
    let Some(queue) = state.details.queue_ref.clone() else {
        return;
    };
    let fifo = state.details.is_fifo();
    let content_dedup = state.details.content_based_deduplication();

    match state.message_create.form.to_inputs(fifo, content_dedup) {
        Err(error) => {
            log::debug!("Message form rejected: {}", error);
            state.message_create.form.error = Some(error.clone());
            state.message_create.screen.error = Some(error);
        }
        Ok(inputs) => {
            let batch = state.take_batch_id();
            state.message_create.form.error = None;
            state.message_create.screen.error = None;
            state.message_create.screen.loading = true;
            state.message_create.progress = Some(BulkProgress::new(batch, inputs.len()));
            state.pending = Some(PendingOperation {
                status: format!("{} (0/{})", STATUS_SENDING_MESSAGES, inputs.len()),
            });

            let origin = Origin::queue(Page::MessageCreate, &queue);
            for input in inputs {
                tasks.push(Task::new(
                    origin.clone(),
                    Operation::SendMessage {
                        batch,
                        queue: queue.clone(),
                        input,
                    },
                ));
            }
        }
    }
}

// --- Results ---

/// A result applies only while its page (and queue, for queue-scoped pages)
/// is still the one on screen.
fn is_current(state: &AppState, origin: &Origin) -> bool {
    if origin.page != state.page() {
        return false;
    }
    match &origin.queue_url {
        Some(url) => state.details.queue_ref.as_ref().is_some_and(|queue| &queue.url == url),
        None => true,
    }
}

fn on_result(state: &mut AppState, result: ResultEvent, tasks: &mut Vec<Task>) {
    let ResultEvent { origin, outcome } = result;
    if !is_current(state, &origin) {
        log::debug!(
            "Dropping stale result for {} while on {} (success: {})",
            origin.page,
            state.page(),
            outcome.is_success()
        );
        return;
    }

    match outcome {
        Outcome::QueuesListed(result) => {
            state.overview.screen.loading = false;
            match result {
                Ok(queues) => {
                    state.overview.screen.error = None;
                    state.overview.replace_queues(queues);
                }
                Err(e) => fail(state, Page::Overview, format!("{ERROR_LIST_QUEUES_FAILED}: {e}"), tasks),
            }
        }
        Outcome::QueueAttributesFetched(result) => {
            state.details.attributes_loading = false;
            state.details.sync_loading();
            match result {
                Ok(queue) => state.details.queue = Some(queue),
                Err(e) => fail(state, Page::Details, format!("{ERROR_FETCH_ATTRIBUTES_FAILED}: {e}"), tasks),
            }
        }
        Outcome::MessagesFetched(result) => {
            state.details.messages_loading = false;
            state.details.sync_loading();
            match result {
                Ok(messages) => state.details.replace_messages(messages),
                Err(e) => {
                    fail(state, Page::Details, format!("{ERROR_FETCH_MESSAGES_FAILED}: {e}"), tasks);
                    state.details.sync_loading();
                }
            }
        }
        Outcome::QueueCreated(result) => {
            state.pending = None;
            state.create.screen.loading = false;
            match result {
                Ok(queue) => {
                    log::info!("Queue {} created", queue.name);
                    state.create = CreateState::default();
                    enter_overview(state, true, tasks);
                    notify(state, ToastKind::Success, format!("{SUCCESS_QUEUE_CREATED}: {}", queue.name), tasks);
                }
                Err(e) => {
                    let text = format!("{ERROR_QUEUE_CREATE_FAILED}: {e}");
                    state.create.form.error = Some(text.clone());
                    fail(state, Page::Create, text, tasks);
                }
            }
        }
        Outcome::QueueDeleted { batch, queue, result } => {
            let Some(progress) = state.delete_queues.progress.as_mut().filter(|p| p.batch == batch) else {
                return;
            };
            progress.record(result.as_ref().err().map(|e| format!("{queue}: {e}")));
            if result.is_ok() {
                let remaining = state
                    .overview
                    .queues
                    .iter()
                    .filter(|q| q.name != queue)
                    .cloned()
                    .collect();
                state.overview.replace_queues(remaining);
            }
            finish_bulk(state, Page::DeleteConfirm, SUCCESS_QUEUES_DELETED, STATUS_DELETING_QUEUES, tasks);
        }
        Outcome::MessageSent { batch, result } => {
            let Some(progress) = state.message_create.progress.as_mut().filter(|p| p.batch == batch) else {
                return;
            };
            progress.record(result.err().map(|e| e.to_string()));
            update_status(state, STATUS_SENDING_MESSAGES, Page::MessageCreate);

            let Some(progress) = state.message_create.progress.clone().filter(BulkProgress::is_done) else {
                return;
            };
            state.pending = None;
            state.message_create.screen.loading = false;
            state.message_create.progress = None;
            if progress.succeeded > 0 {
                state.message_create = MessageCreateState::default();
                return_to_details(state, true, tasks);
                let kind = if progress.failed == 0 {
                    ToastKind::Success
                } else {
                    ToastKind::Warning
                };
                notify(state, kind, format!("{SUCCESS_MESSAGES_SENT} {}", progress.summary()), tasks);
            } else {
                let text = progress.errors.first().cloned().unwrap_or_default();
                state.message_create.form.error = Some(text.clone());
                fail(state, Page::MessageCreate, text, tasks);
            }
        }
        Outcome::MessageDeleted {
            batch,
            message_id,
            result,
            audit_error,
        } => {
            let Some(progress) = state.delete_messages.progress.as_mut().filter(|p| p.batch == batch) else {
                return;
            };
            progress.record(result.as_ref().err().map(|e| format!("{message_id}: {e}")));
            if result.is_ok() {
                state.details.invalidate_message(&message_id);
            }
            if let Some(error) = audit_error {
                state.delete_messages.audit_failures.push(format!("{message_id}: {error}"));
            }
            finish_bulk(
                state,
                Page::MessageDeleteConfirm,
                SUCCESS_MESSAGES_DELETED,
                STATUS_DELETING_MESSAGES,
                tasks,
            );
        }
        Outcome::MessageMoved {
            batch,
            message_id,
            result,
        } => {
            let Some(progress) = state.delete_messages.progress.as_mut().filter(|p| p.batch == batch) else {
                return;
            };
            progress.record(result.as_ref().err().map(|e| format!("{message_id}: {e}")));
            if let Ok(dlq) = &result {
                log::info!("Moved message {} to {}", message_id, dlq.name);
                state.details.invalidate_message(&message_id);
            }
            finish_bulk(
                state,
                Page::MessageDeleteConfirm,
                SUCCESS_MESSAGES_MOVED,
                STATUS_MOVING_MESSAGES,
                tasks,
            );
        }
        Outcome::MessageRequeued { message_id, result } => {
            state.pending = None;
            state.screen_mut(origin.page).loading = false;
            match result {
                Ok(()) => {
                    state.details.invalidate_message(&message_id);
                    if origin.page == Page::MessageDetails {
                        return_to_details(state, true, tasks);
                    } else {
                        load_details(state, tasks);
                    }
                    notify(state, ToastKind::Success, SUCCESS_MESSAGE_REQUEUED, tasks);
                }
                Err(e) => fail(state, origin.page, format!("{ERROR_REQUEUE_FAILED}: {e}"), tasks),
            }
        }
    }
}

fn bulk_progress(state: &AppState, page: Page) -> Option<&BulkProgress> {
    match page {
        Page::DeleteConfirm => state.delete_queues.progress.as_ref(),
        Page::MessageDeleteConfirm => state.delete_messages.progress.as_ref(),
        Page::MessageCreate => state.message_create.progress.as_ref(),
        _ => None,
    }
}

fn update_status(state: &mut AppState, status: &str, page: Page) {
    let text = bulk_progress(state, page).map(|p| format!("{} ({}/{})", status, p.reported(), p.total));
    if let (Some(pending), Some(text)) = (state.pending.as_mut(), text) {
        pending.status = text;
    }
}

/// Once every item of a confirm-page batch reported, release the pending
/// operation and summarize. The page stays until the user acknowledges.
fn finish_bulk(state: &mut AppState, page: Page, success: &str, status: &str, tasks: &mut Vec<Task>) {
    update_status(state, status, page);
    let Some(progress) = bulk_progress(state, page).filter(|p| p.is_done()).cloned() else {
        return;
    };

    state.pending = None;
    state.screen_mut(page).loading = false;
    log::info!("{} {} ({} failed)", success, progress.summary(), progress.failed);

    let audit_failures = if page == Page::MessageDeleteConfirm {
        state.delete_messages.audit_failures.len()
    } else {
        0
    };

    if progress.failed > 0 {
        let first = progress.errors.first().cloned().unwrap_or_default();
        let text = format!("{} {}; {}", success, progress.summary(), first);
        state.screen_mut(page).error = Some(text.clone());
        notify(state, ToastKind::Error, text, tasks);
    } else if audit_failures > 0 {
        let text = format!(
            "{} {}; {} ({})",
            success,
            progress.summary(),
            ERROR_AUDIT_WRITE_FAILED,
            audit_failures
        );
        notify(state, ToastKind::Warning, text, tasks);
    } else {
        notify(state, ToastKind::Success, format!("{} {}", success, progress.summary()), tasks);
    }
}
