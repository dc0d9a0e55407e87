//! Details page: queue attributes beside the sampled messages.

use super::common::{empty_message, list_title, render_filter_line, selection_marker};
use super::scrollbar_helper::ScrollbarHelper;
use crate::constants::MESSAGE_PREVIEW_CHARS;
use crate::gateway::Queue;
use crate::ui::layout::LayoutManager;
use crate::ui::state::{AppState, DetailsState};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

pub struct QueueDetailsView;

impl QueueDetailsView {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let details = &state.details;
        let [attributes_area, messages_area] = LayoutManager::details_layout(area);

        match &details.queue {
            Some(queue) => Self::render_attributes(f, attributes_area, queue, details.attributes_loading),
            None => {
                let block = Block::default().borders(Borders::ALL).title(" Queue ");
                f.render_widget(Paragraph::new("No queue selected").block(block), attributes_area);
            }
        }
        Self::render_messages(f, messages_area, details);
    }

    fn render_attributes(f: &mut Frame, area: Rect, queue: &Queue, loading: bool) {
        let title = if loading {
            format!(" {} ⟳ ", queue.name)
        } else {
            format!(" {} ", queue.name)
        };
        let lines: Vec<Line> = queue
            .attribute_rows()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(Color::Yellow)),
                    Span::raw(value),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_messages(f: &mut Frame, area: Rect, details: &DetailsState) {
        let screen = &details.screen;
        let visible = details.visible();

        let (filter_area, list_area) = LayoutManager::filter_layout(area, screen.filtering || screen.has_filter());
        if let Some(filter_area) = filter_area {
            render_filter_line(f, filter_area, screen);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(list_title("Messages", visible.len(), details.messages.len(), screen));

        if visible.is_empty() {
            let text = empty_message(screen, "No messages received. Press 'n' to send one.");
            let style = if screen.error.is_some() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            f.render_widget(Paragraph::new(text).style(style).block(block), list_area);
            return;
        }

        let (table_area, scrollbar_area) = ScrollbarHelper::calculate_areas(list_area, visible.len());
        let fifo = details.is_fifo();

        let mut header = vec!["", "Message id", "Sent", "Receives", "Size"];
        if fifo {
            header.push("Group");
        }
        header.push("Body");
        let header = Row::new(header).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows = visible.iter().enumerate().map(|(index, message)| {
            let sent = message
                .sent_at
                .map(|at| at.format("%m-%d %H:%M:%S").to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut cells = vec![
                Cell::from(selection_marker(screen.is_selected(index))),
                Cell::from(short_id(&message.id)),
                Cell::from(sent),
                Cell::from(message.receive_count.to_string()),
                Cell::from(message.body_size().to_string()),
            ];
            if fifo {
                cells.push(Cell::from(message.group_id.clone().unwrap_or_default()));
            }
            cells.push(Cell::from(message.preview(MESSAGE_PREVIEW_CHARS)));

            let style = if screen.is_selected(index) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(cells).style(style)
        });

        let mut widths = vec![
            Constraint::Length(3),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Length(7),
        ];
        if fifo {
            widths.push(Constraint::Length(10));
        }
        widths.push(Constraint::Min(10));

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

        let mut table_state = TableState::default().with_selected(Some(screen.cursor));
        f.render_stateful_widget(table, table_area, &mut table_state);

        let mut scrollbar = ScrollbarHelper::new();
        scrollbar.update_state(visible.len(), screen.cursor, Some(table_area.height.saturating_sub(3) as usize));
        scrollbar.render(f, scrollbar_area);
    }
}

/// First block of a message id; enough to tell rows apart
fn short_id(id: &str) -> String {
    id.split('-').next().unwrap_or(id).chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id_takes_first_uuid_block() {
        assert_eq!(short_id("3f2a9c1e-1111-2222-3333-444444444444"), "3f2a9c1e");
        assert_eq!(short_id("abc"), "abc");
    }
}
