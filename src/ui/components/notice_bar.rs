use crate::ui::state::{AppState, ToastKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

/// One-line toast slot above the status bar
pub struct NoticeBar;

impl NoticeBar {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let Some(toast) = &state.toast else {
            return;
        };
        let color = match toast.kind {
            ToastKind::Success => Color::Green,
            ToastKind::Warning => Color::Yellow,
            ToastKind::Error => Color::Red,
        };
        let notice = Paragraph::new(toast.text.clone())
            .alignment(Alignment::Center)
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(notice, area);
    }
}
