//! Overview page: every queue with its message counts.

use super::common::{empty_message, list_title, render_filter_line, selection_marker};
use super::scrollbar_helper::ScrollbarHelper;
use crate::ui::layout::LayoutManager;
use crate::ui::state::AppState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

pub struct QueueListView;

impl QueueListView {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let overview = &state.overview;
        let screen = &overview.screen;
        let visible = overview.visible();

        let (filter_area, list_area) = LayoutManager::filter_layout(area, screen.filtering || screen.has_filter());
        if let Some(filter_area) = filter_area {
            render_filter_line(f, filter_area, screen);
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .title(list_title("Queues", visible.len(), overview.queues.len(), screen));

        if visible.is_empty() {
            let text = empty_message(screen, "No queues. Press 'n' to create one.");
            let style = if screen.error.is_some() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            f.render_widget(Paragraph::new(text).style(style).block(block), list_area);
            return;
        }

        let (table_area, scrollbar_area) = ScrollbarHelper::calculate_areas(list_area, visible.len());

        let header = Row::new(["", "Name", "Type", "Available", "In flight", "Delayed", "Dead-letter"])
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

        let rows = visible.iter().enumerate().map(|(index, queue)| {
            let dead_letter = queue
                .redrive_policy
                .as_ref()
                .and_then(|policy| policy.dead_letter_queue_name())
                .unwrap_or("-")
                .to_string();
            let style = if screen.is_selected(index) {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(selection_marker(screen.is_selected(index))),
                Cell::from(queue.name.clone()),
                Cell::from(queue.kind.label()),
                Cell::from(queue.approximate_visible.to_string()),
                Cell::from(queue.approximate_in_flight.to_string()),
                Cell::from(queue.approximate_delayed.to_string()),
                Cell::from(dead_letter),
            ])
            .style(style)
        });

        let widths = [
            Constraint::Length(3),
            Constraint::Min(20),
            Constraint::Length(8),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Min(12),
        ];

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
