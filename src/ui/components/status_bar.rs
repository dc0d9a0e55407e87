//! Status bar component

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph},
    Frame,
};

use crate::ui::core::Page;
use crate::ui::state::AppState;

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Status bar component
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar: connection on the left, status or shortcuts beside it
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let connection = format!(
            " profile: {} | region: {} ",
            state.connection.profile, state.connection.region
        );
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(connection.chars().count() as u16), Constraint::Min(0)])
            .split(area);

        let (status_text, status_color) = match state.status() {
            Some(status) => (format!("{} {}", spinner_frame(), status), Color::Yellow),
            None => (
                format!("{} • {}", state.page().title(), shortcuts(state.page())),
                Color::Gray,
            ),
        };

        let connection_bar = Paragraph::new(connection).style(Style::default().fg(Color::Cyan));
        let status_bar = Paragraph::new(status_text)
            .block(Block::default())
            .alignment(Alignment::Center)
            .style(Style::default().fg(status_color));

        f.render_widget(connection_bar, chunks[0]);
        f.render_widget(status_bar, chunks[1]);
    }
}

/// Helpful shortcuts for the page on screen
fn shortcuts(page: Page) -> &'static str {
    match page {
        Page::Overview => "Enter: open • Space: select • n: new • d: delete • /: filter • ?: help • q: quit",
        Page::Details => {
            "Enter: view • Space: select • n: send • d: delete • m: to DLQ • r: requeue • /: filter • q/Esc: back"
        }
        Page::MessageDetails => "↑↓: scroll • d: delete • m: to DLQ • r: requeue • q/Esc: back",
        Page::Create | Page::MessageCreate => "Tab: next field • Esc: cancel",
        Page::DeleteConfirm | Page::MessageDeleteConfirm => "←→: choose • Enter: confirm • Esc: cancel",
    }
}

fn spinner_frame() -> &'static str {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or(0);
    SPINNER[(millis / 250 % SPINNER.len() as u128) as usize]
}
