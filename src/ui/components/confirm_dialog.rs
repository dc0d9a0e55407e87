//! Confirmation dialogs for queue deletion and bulk message actions.
//!
//! Both dialogs share one shape: the affected items, an Abort/Confirm
//! choice, and once confirmed, the batch progress until every item reports.

use super::common::{create_dialog_block, create_instructions_paragraph, shortcuts};
use crate::ui::layout::LayoutManager;
use crate::ui::state::{AppState, BulkProgress, ConfirmChoice, MessageAction};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

/// At most this many target names are listed; the rest are counted
const MAX_LISTED: usize = 8;

pub struct ConfirmDialog;

impl ConfirmDialog {
    pub fn render_queue_delete(f: &mut Frame, area: Rect, state: &AppState) {
        let dialog = &state.delete_queues;
        let names: Vec<String> = dialog.targets.iter().map(|queue| queue.name.clone()).collect();
        let title = format!(" 🗑 Delete {} queue(s) ", names.len());
        Self::render_dialog(
            f,
            area,
            &title,
            "Deleting a queue removes all of its messages.",
            &names,
            dialog.choice,
            dialog.progress.as_ref(),
        );
    }

    pub fn render_message_action(f: &mut Frame, area: Rect, state: &AppState) {
        let dialog = &state.delete_messages;
        let names: Vec<String> = dialog.targets.iter().map(|message| message.id.clone()).collect();
        let title = format!(" {} {} message(s) ", dialog.action.verb(), names.len());
        let warning = match dialog.action {
            MessageAction::Delete => "Deleted messages cannot be recovered.",
            MessageAction::MoveToDeadLetter => "Messages are copied to the dead-letter queue, then deleted here.",
        };
        Self::render_dialog(
            f,
            area,
            &title,
            warning,
            &names,
            dialog.choice,
            dialog.progress.as_ref(),
        );
    }

    fn render_dialog(
        f: &mut Frame,
        area: Rect,
        title: &str,
        warning: &str,
        names: &[String],
        choice: ConfirmChoice,
        progress: Option<&BulkProgress>,
    ) {
        let listed = names.len().min(MAX_LISTED) as u16;
        let overflow = u16::from(names.len() > MAX_LISTED);
        let height = listed + overflow + 9;
        let dialog_area = LayoutManager::centered_rect_lines(60, height, area);
        f.render_widget(Clear, dialog_area);

        let block = create_dialog_block(title.to_string(), Color::Red);
        let inner = block.inner(dialog_area);
        f.render_widget(block, dialog_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let warning = Paragraph::new(warning.to_string())
            .style(Style::default().fg(Color::Yellow))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(warning, chunks[0]);

        let mut lines: Vec<Line> = names
            .iter()
            .take(MAX_LISTED)
            .map(|name| Line::from(format!("  • {name}")))
            .collect();
        if names.len() > MAX_LISTED {
            lines.push(Line::from(Span::styled(
                format!("  … and {} more", names.len() - MAX_LISTED),
                Style::default().fg(Color::DarkGray),
            )));
        }
        f.render_widget(Paragraph::new(lines).style(Style::default().fg(Color::White)), chunks[1]);

        match progress {
            None => {
                f.render_widget(choice_line(choice), chunks[2]);
                let instructions = create_instructions_paragraph(&[
                    shortcuts::ARROWS_CHOOSE,
                    shortcuts::SEPARATOR,
                    shortcuts::ENTER_CONFIRM,
                    shortcuts::SEPARATOR,
                    shortcuts::ESC_CANCEL,
                ]);
                f.render_widget(instructions, chunks[3]);
            }
            Some(progress) => {
                f.render_widget(progress_line(progress), chunks[2]);
                if progress.is_done() {
                    let instructions = create_instructions_paragraph(&[("Enter", Color::Green, " Continue")]);
                    f.render_widget(instructions, chunks[3]);
                }
            }
        }
    }
}

fn choice_line(choice: ConfirmChoice) -> Paragraph<'static> {
    let button = |label: &'static str, active: bool, color: Color| {
        let style = if active {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };
        Span::styled(format!("[ {label} ]"), style)
    };

    Paragraph::new(Line::from(vec![
        button("Abort", choice == ConfirmChoice::Abort, Color::Gray),
        Span::raw("    "),
        button("Confirm", choice == ConfirmChoice::Confirm, Color::Red),
    ]))
    .alignment(Alignment::Center)
}

fn progress_line(progress: &BulkProgress) -> Paragraph<'static> {
    let text = if progress.is_done() {
        format!("Done: {} succeeded, {} failed", progress.summary(), progress.failed)
    } else {
        format!("Working... {}/{}", progress.reported(), progress.total)
    };
    let color = match (progress.is_done(), progress.failed) {
        (false, _) => Color::Yellow,
        (true, 0) => Color::Green,
        (true, _) => Color::Red,
    };
    Paragraph::new(text)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
}
