//! Help panel component

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::core::Page;
use crate::ui::layout::LayoutManager;
use crate::ui::state::AppState;

const GENERAL: &str = "
NAVIGATION
----------
j/k, ↑/↓    Move the cursor
Enter       Open / confirm
Esc, q      Back, cancel, or clear the filter; quits from Queues
Ctrl+C      Quit from anywhere
?           Toggle this panel
";

const LISTS: &str = "
LISTS
-----
Space       Select / unselect row (bulk actions)
/           Filter rows; Enter keeps it, Esc clears it
";

const QUEUES: &str = "
QUEUES
------
Enter       Open queue details
n           Create queue
d           Delete selected queues (or the one under the cursor)
";

const MESSAGES: &str = "
MESSAGES
--------
Enter       Show message
n           Send message(s); separate bodies with '---'
d           Delete selected messages
m           Move selected messages to the dead-letter queue
r           Return message to the queue immediately
";

const MESSAGE: &str = "
MESSAGE
-------
j/k         Scroll the body
d           Delete this message
m           Move it to the dead-letter queue
r           Return it to the queue immediately
";

const FORMS: &str = "
FORMS
-----
Tab         Next field (Shift+Tab: previous)
←/→, Space  Change a choice field
Enter       Submit (newline in a message body)
Ctrl+S      Submit from any field
";

const CONFIRM: &str = "
CONFIRM
-------
←/→, Tab    Switch between Abort and Confirm
Enter       Apply the choice; after completion, go back
";

const FOOTER: &str = "
Lists refresh automatically while Overview or Details is open.
Deleted messages are recorded in the audit log.

Press 'Esc' or '?' to close this help panel
";

/// Bindings relevant to `page`, general navigation first
fn help_text(page: Page) -> String {
    let sections: &[&str] = match page {
        Page::Overview => &[GENERAL, LISTS, QUEUES],
        Page::Details => &[GENERAL, LISTS, MESSAGES],
        Page::MessageDetails => &[GENERAL, MESSAGE],
        Page::Create | Page::MessageCreate => &[GENERAL, FORMS],
        Page::DeleteConfirm | Page::MessageDeleteConfirm => &[GENERAL, CONFIRM],
    };
    let mut text = String::from("\nSQSDECK - Amazon SQS Terminal Manager\n=====================================\n");
    for section in sections {
        text.push_str(section);
    }
    text.push_str(FOOTER);
    text
}

/// Help panel component
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel
    pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
        let (help_width, help_height) = LayoutManager::help_panel_dimensions(area.width, area.height);
        let help_area = LayoutManager::centered_rect(help_width, help_height, area);
        f.render_widget(Clear, help_area);

        let help_paragraph = Paragraph::new(help_text(state.page()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" ❓ Help - {} ", state.page().title()))
                    .title_alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            )
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: false });
        f.render_widget(help_paragraph, help_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_follows_page() {
        assert!(help_text(Page::Overview).contains("Create queue"));
        assert!(!help_text(Page::Overview).contains("dead-letter"));
        assert!(help_text(Page::Details).contains("dead-letter"));
        assert!(help_text(Page::Create).contains("Ctrl+S"));
        assert!(help_text(Page::MessageDeleteConfirm).contains("Abort"));
        assert!(help_text(Page::Details).contains("Ctrl+C      Quit"));
    }
}
