//! Queue creation dialog.

use super::common::{
    create_dialog_block, create_input_paragraph, create_instructions_paragraph, create_selection_paragraph,
    shortcuts,
};
use crate::ui::forms::{CreateField, CreateQueueForm};
use crate::ui::layout::LayoutManager;
use crate::ui::state::AppState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

pub struct QueueForm;

impl QueueForm {
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let form = &state.create.form;
        let fields = form.fields();

        // Three lines per field plus the error line, instructions and borders
        let height = (fields.len() as u16) * 3 + 4;
        let dialog_area = LayoutManager::centered_rect_lines(60, height, area);
        f.render_widget(Clear, dialog_area);

        let block = create_dialog_block(" ➕ Create Queue ", Color::Green);
        let inner = block.inner(dialog_area);
        f.render_widget(block, dialog_area);

        let mut constraints: Vec<Constraint> = fields.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(1));
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (index, field) in fields.iter().enumerate() {
            let focused = form.focus == *field;
            let value = field_value(form, *field, focused);
            let widget = if field.is_choice() {
                create_selection_paragraph(&value, field.label(), focused)
            } else {
                create_input_paragraph(&value, field.label(), focused)
            };
            f.render_widget(widget, chunks[index]);
        }

        if let Some(error) = &form.error {
            let error = Paragraph::new(error.clone())
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: true });
            f.render_widget(error, chunks[fields.len()]);
        }

        let instructions = create_instructions_paragraph(&[
            shortcuts::TAB_NEXT,
            shortcuts::SEPARATOR,
            shortcuts::ARROWS_CHOOSE,
            shortcuts::SEPARATOR,
            shortcuts::ENTER_SUBMIT,
            shortcuts::SEPARATOR,
            shortcuts::ESC_CANCEL,
        ]);
        f.render_widget(instructions, chunks[fields.len() + 1]);
    }
}

/// Display text for a field; unfocused empty numbers show the SQS default marker
fn field_value(form: &CreateQueueForm, field: CreateField, focused: bool) -> String {
    let or_default = |value: &str| {
        if value.is_empty() && !focused {
            "(default)".to_string()
        } else {
            value.to_string()
        }
    };
    match field {
        CreateField::Name => form.name.clone(),
        CreateField::Kind => form.kind.label().to_string(),
        CreateField::Preset => form.preset.label().to_string(),
        CreateField::VisibilityTimeout => or_default(&form.visibility_timeout),
        CreateField::RetentionPeriod => or_default(&form.retention_period),
        CreateField::DelaySeconds => or_default(&form.delay_seconds),
        CreateField::MaxMessageSize => or_default(&form.max_message_size),
        CreateField::ReceiveWaitTime => or_default(&form.receive_wait_time),
        CreateField::ContentDeduplication => if form.content_based_deduplication { "On" } else { "Off" }.to_string(),
        CreateField::DeduplicationScope => form.deduplication_scope.clone().unwrap_or_else(|| "(default)".to_string()),
        CreateField::FifoThroughputLimit => form.fifo_throughput_limit.clone().unwrap_or_else(|| "(default)".to_string()),
    }
}
