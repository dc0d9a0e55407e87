//! Message details page: metadata on top, scrollable body below.

use super::scrollbar_helper::ScrollbarHelper;
use crate::gateway::Message;
use crate::ui::state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct MessageView;

impl MessageView {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let view = &state.message_details;
        let Some(message) = &view.message else {
            let block = Block::default().borders(Borders::ALL).title(" Message ");
            f.render_widget(Paragraph::new("No message selected").block(block), area);
            return;
        };

        let metadata = metadata_lines(message);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(metadata.len() as u16 + 2), Constraint::Min(3)])
            .split(area);

        let queue_name = state.details.queue_ref.as_ref().map(|q| q.name.as_str()).unwrap_or("-");
        let title = if view.screen.loading {
            format!(" Message in {queue_name} ⟳ ")
        } else {
            format!(" Message in {queue_name} ")
        };
        f.render_widget(
            Paragraph::new(metadata).block(Block::default().borders(Borders::ALL).title(title)),
            chunks[0],
        );

        let total = view.body_lines();
        let (body_area, scrollbar_area) = ScrollbarHelper::calculate_areas(chunks[1], total);
        let body = Paragraph::new(message.body.clone())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Body ({} bytes) ", message.body_size())),
            )
            .scroll((view.scroll.min(u16::MAX as usize) as u16, 0));
        f.render_widget(body, body_area);

        let mut scrollbar = ScrollbarHelper::new();
        scrollbar.update_state(total, view.scroll, Some(body_area.height.saturating_sub(2) as usize));
        scrollbar.render(f, scrollbar_area);
    }
}

fn metadata_lines(message: &Message) -> Vec<Line<'static>> {
    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{label:<20}"), Style::default().fg(Color::Yellow)),
            Span::raw(value),
        ])
    };
    let timestamp = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    let mut lines = vec![
        row("Message id", message.id.clone()),
        row("Sent", timestamp(message.sent_at)),
        row("First received", timestamp(message.first_received_at)),
        row("Receive count", message.receive_count.to_string()),
        row("MD5 of body", message.md5_of_body.clone()),
    ];
    if let Some(group) = &message.group_id {
        lines.push(row("Group id", group.clone()));
    }
    if let Some(dedup) = &message.deduplication_id {
        lines.push(row("Deduplication id", dedup.clone()));
    }
    if let Some(sequence) = &message.sequence_number {
        lines.push(row("Sequence number", sequence.clone()));
    }
    for (name, value) in message.extra_system_attributes() {
        lines.push(row(name, value.clone()));
    }
    for (name, value) in &message.custom_attributes {
        lines.push(row(&format!("attr:{name}"), value.clone()));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_lists_fifo_fields_only_when_present() {
        let mut message = Message {
            id: "m-1".to_string(),
            body: "hello".to_string(),
            ..Default::default()
        };
        let standard = metadata_lines(&message).len();

        message.group_id = Some("orders".to_string());
        message.sequence_number = Some("1".to_string());
        assert_eq!(metadata_lines(&message).len(), standard + 2);
    }
}
