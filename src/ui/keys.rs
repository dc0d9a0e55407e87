//! Keyboard mapping: terminal keys to intents, per input mode.

use super::core::{Intent, Page};
use super::forms::MessageField;
use super::state::AppState;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Single-key commands
    Normal,
    /// Typing into a list filter
    Filter,
    /// Single-line form fields; Enter submits
    Form,
    /// Multi-line message body; Enter inserts a newline
    TextArea,
}

impl InputMode {
    pub fn for_state(state: &AppState) -> Self {
        if state.show_help {
            return InputMode::Normal;
        }
        match state.page() {
            Page::Overview if state.overview.screen.filtering => InputMode::Filter,
            Page::Details if state.details.screen.filtering => InputMode::Filter,
            Page::MessageCreate if state.message_create.form.focus == MessageField::Body => InputMode::TextArea,
            page if page.is_form() => InputMode::Form,
            _ => InputMode::Normal,
        }
    }
}

/// Translate a key press into an intent, if it means anything in `mode`.
pub fn intent_for(key: KeyEvent, mode: InputMode) -> Option<Intent> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global escapes work in every mode
    match key.code {
        KeyCode::Char('c') if ctrl => return Some(Intent::Quit),
        KeyCode::Char('s') if ctrl && matches!(mode, InputMode::Form | InputMode::TextArea) => {
            return Some(Intent::Submit)
        }
        KeyCode::Esc => return Some(Intent::Back),
        _ => {}
    }

    match mode {
        InputMode::Normal => normal_intent(key),
        InputMode::Filter => match key.code {
            KeyCode::Enter => Some(Intent::Open),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Up => Some(Intent::Up),
            KeyCode::Down => Some(Intent::Down),
            KeyCode::Char(c) => Some(Intent::Char(c)),
            _ => None,
        },
        InputMode::Form | InputMode::TextArea => match key.code {
            KeyCode::Enter if mode == InputMode::TextArea => Some(Intent::Char('\n')),
            KeyCode::Enter => Some(Intent::Submit),
            KeyCode::Tab => Some(Intent::NextField),
            KeyCode::BackTab => Some(Intent::PrevField),
            KeyCode::Up => Some(Intent::Up),
            KeyCode::Down => Some(Intent::Down),
            KeyCode::Left => Some(Intent::Left),
            KeyCode::Right => Some(Intent::Right),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Char(c) if !ctrl => Some(Intent::Char(c)),
            _ => None,
        },
    }
}

fn normal_intent(key: KeyEvent) -> Option<Intent> {
    let intent = match key.code {
        KeyCode::Up | KeyCode::Char('k') => Intent::Up,
        KeyCode::Down | KeyCode::Char('j') => Intent::Down,
        KeyCode::Left | KeyCode::Char('h') => Intent::Left,
        KeyCode::Right | KeyCode::Char('l') => Intent::Right,
        KeyCode::Tab => Intent::NextField,
        KeyCode::BackTab => Intent::PrevField,
        KeyCode::Char(' ') => Intent::Select,
        KeyCode::Enter => Intent::Open,
        KeyCode::Char('n') => Intent::Create,
        KeyCode::Char('d') | KeyCode::Delete => Intent::Delete,
        KeyCode::Char('r') => Intent::Requeue,
        KeyCode::Char('m') => Intent::MoveToDeadLetter,
        KeyCode::Char('/') => Intent::Filter,
        KeyCode::Char('?') => Intent::Help,
        KeyCode::Char('q') | KeyCode::Backspace => Intent::Back,
        _ => return None,
    };
    Some(intent)
}
