//! Send-message dialog. Bodies separated by a `---` line go out as a batch.

use super::common::{create_dialog_block, create_input_paragraph, create_instructions_paragraph, shortcuts};
use crate::ui::forms::{split_bodies, MessageCreateForm, MessageField};
use crate::ui::layout::LayoutManager;
use crate::ui::state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

const BODY_HEIGHT: u16 = 10;

pub struct MessageForm;

impl MessageForm {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let form = &state.message_create.form;
        let fifo = state.details.is_fifo();
        let fields = MessageCreateForm::fields(fifo);
        let queue_name = state.details.queue_ref.as_ref().map(|q| q.name.as_str()).unwrap_or("-");

        let height = BODY_HEIGHT + (fields.len() as u16 - 1) * 3 + 5;
        let dialog_area = LayoutManager::centered_rect_lines(70, height, area);
        f.render_widget(Clear, dialog_area);

        let block = create_dialog_block(format!(" ✉ Send to {queue_name} "), Color::Green);
        let inner = block.inner(dialog_area);
        f.render_widget(block, dialog_area);

        let mut constraints = vec![Constraint::Length(BODY_HEIGHT)];
        constraints.extend(fields.iter().skip(1).map(|_| Constraint::Length(3)));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (index, field) in fields.iter().enumerate() {
            let focused = form.focus == *field;
            let value = match field {
                MessageField::Body => &form.body,
                MessageField::DelaySeconds => &form.delay_seconds,
                MessageField::GroupId => &form.group_id,
                MessageField::DeduplicationId => &form.deduplication_id,
            };
            let widget = create_input_paragraph(value, field.label(), focused);
            // Keep the end of a long body in view
            let widget = if *field == MessageField::Body {
                let overflow = (value.lines().count() as u16 + 1).saturating_sub(BODY_HEIGHT - 2);
                widget.scroll((overflow, 0))
            } else {
                widget
            };
            f.render_widget(widget, chunks[index]);
        }

        let next = fields.len();
        f.render_widget(body_summary(form), chunks[next]);

        if let Some(error) = &form.error {
            let error = Paragraph::new(error.clone())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            f.render_widget(error, chunks[next + 1]);
        }

        let instructions = create_instructions_paragraph(&[
            shortcuts::TAB_NEXT,
            shortcuts::SEPARATOR,
            shortcuts::CTRL_S_SUBMIT,
            shortcuts::SEPARATOR,
            shortcuts::ESC_CANCEL,
        ]);
        f.render_widget(instructions, chunks[next + 2]);
    }
}

fn body_summary(form: &MessageCreateForm) -> Paragraph<'static> {
    let count = split_bodies(&form.body).len();
    let remaining = form.bytes_remaining();
    let color = if remaining < 0 { Color::Red } else { Color::DarkGray };
    let text = format!("{count} message(s) • {remaining} bytes left • separate bodies with a '---' line");
    Paragraph::new(Line::from(text)).style(Style::default().fg(color))
}
