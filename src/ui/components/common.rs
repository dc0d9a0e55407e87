//! Building blocks shared by the page views and dialogs.

use crate::ui::core::ScreenState;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

/// Creates a styled main dialog block
pub fn create_dialog_block(title: impl Into<String>, theme_color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title.into())
        .title_style(Style::default().fg(theme_color).add_modifier(Modifier::BOLD))
        .style(Style::default().fg(theme_color))
}

/// Creates an input field block; the focused field shows a cursor
pub fn create_input_paragraph(value: &str, field_title: &str, focused: bool) -> Paragraph<'static> {
    let display = if focused {
        format!("{value}█")
    } else {
        value.to_string()
    };
    let border_color = if focused { Color::Cyan } else { Color::Gray };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {field_title} "))
        .title_style(Style::default().fg(Color::White))
        .style(Style::default().fg(border_color));

    Paragraph::new(display)
        .block(input_block)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: false })
}

/// Creates a choice field showing `◀ value ▶`
pub fn create_selection_paragraph(value: &str, field_title: &str, focused: bool) -> Paragraph<'static> {
    let border_color = if focused { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {field_title} "))
        .title_style(Style::default().fg(Color::White))
        .style(Style::default().fg(border_color));

    let text = if focused {
        format!("◀ {value} ▶")
    } else {
        value.to_string()
    };
    Paragraph::new(text).block(block).style(Style::default().fg(Color::White))
}

/// Instruction shortcut definition: (key, color, description)
pub type InstructionShortcut = (&'static str, Color, &'static str);

/// Creates a paragraph with color-coded instruction shortcuts
pub fn create_instructions_paragraph(instructions: &[InstructionShortcut]) -> Paragraph<'static> {
    let mut instruction_text = Vec::new();
    for (key, color, desc) in instructions {
        instruction_text.push(Span::styled(
            *key,
            Style::default().fg(*color).add_modifier(Modifier::BOLD),
        ));
        instruction_text.push(Span::styled(*desc, Style::default().fg(Color::Gray)));
    }

    Paragraph::new(Line::from(instruction_text)).alignment(Alignment::Center)
}

/// Common instruction shortcuts used across dialogs
pub mod shortcuts {
    use super::*;

    pub const SEPARATOR: InstructionShortcut = (" • ", Color::Gray, "");
    pub const ESC_CANCEL: InstructionShortcut = ("Esc", Color::Red, " Cancel");
    pub const TAB_NEXT: InstructionShortcut = ("Tab", Color::Cyan, " Next field");
    pub const ENTER_SUBMIT: InstructionShortcut = ("Enter", Color::Green, " Submit");
    pub const CTRL_S_SUBMIT: InstructionShortcut = ("Ctrl+S", Color::Green, " Send");
    pub const ARROWS_CHOOSE: InstructionShortcut = ("←/→", Color::Cyan, " Choose");
    pub const ENTER_CONFIRM: InstructionShortcut = ("Enter", Color::Green, " Confirm");
}

/// List title with item counts and a loading marker
pub fn list_title(label: &str, visible: usize, total: usize, screen: &ScreenState) -> String {
    let mut title = if visible == total {
        format!(" {label} ({total}) ")
    } else {
        format!(" {label} ({visible}/{total}) ")
    };
    if !screen.selected.is_empty() {
        title.push_str(&format!("[{} selected] ", screen.selected.len()));
    }
    if screen.loading {
        title.push_str("⟳ ");
    }
    title
}

/// The `/filter` line above a list; shown while editing or when non-empty
pub fn render_filter_line(f: &mut Frame, area: Rect, screen: &ScreenState) {
    let cursor = if screen.filtering { "█" } else { "" };
    let style = if screen.filtering {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let line = Line::from(vec![
        Span::styled("/", style.add_modifier(Modifier::BOLD)),
        Span::styled(format!("{}{}", screen.filter, cursor), style),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Placeholder shown in place of an empty list
pub fn empty_message(screen: &ScreenState, when_empty: &str) -> String {
    if let Some(error) = &screen.error {
        error.clone()
    } else if screen.loading {
        "Loading...".to_string()
    } else if screen.has_filter() {
        format!("Nothing matches '{}'", screen.filter)
    } else {
        when_empty.to_string()
    }
}

/// Row marker for multi-select lists
pub fn selection_marker(selected: bool) -> &'static str {
    if selected {
        "[x]"
    } else {
        "[ ]"
    }
}
