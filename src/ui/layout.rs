//! Layout management and calculations

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Manages layout calculations and constraints for the UI
pub struct LayoutManager;

impl LayoutManager {
    /// Split the screen into the page area, a notice line and the status bar
    #[must_use]
    pub fn main_layout(area: Rect) -> [Rect; 3] {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1), Constraint::Length(1)])
            .split(area);
        [chunks[0], chunks[1], chunks[2]]
    }

    /// Queue details: attribute panel on the left, message table on the right
    #[must_use]
    pub fn details_layout(area: Rect) -> [Rect; 2] {
        let attributes_width = std::cmp::min(area.width / 3, 48);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(attributes_width), Constraint::Min(0)])
            .split(area);
        [chunks[0], chunks[1]]
    }

    /// Split a list page into an optional one-line filter bar and the list
    #[must_use]
    pub fn filter_layout(area: Rect, show_filter: bool) -> (Option<Rect>, Rect) {
        if !show_filter {
            return (None, area);
        }
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(area);
        (Some(chunks[0]), chunks[1])
    }

    /// Calculate a centered rectangle within the given area
    #[must_use]
    pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Calculate a centered rectangle with percentage width and fixed line height
    #[must_use]
    pub fn centered_rect_lines(percent_x: u16, height_lines: u16, r: Rect) -> Rect {
        let popup_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height_lines),
                Constraint::Min(0),
            ])
            .split(r);

        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ])
            .split(popup_layout[1])[1]
    }

    /// Calculate help panel dimensions based on screen size
    #[must_use]
    pub fn help_panel_dimensions(screen_width: u16, screen_height: u16) -> (u16, u16) {
        let help_width = if screen_width < 80 { 90 } else { 70 };
        let help_height = if screen_height < 40 { 90 } else { 70 };
        (help_width, help_height)
    }

    /// First row to show so that `cursor` stays inside a viewport of `height` rows
    #[must_use]
    pub fn scroll_offset(cursor: usize, height: usize) -> usize {
        if height == 0 {
            return 0;
        }
        cursor.saturating_sub(height - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_main_layout_reserves_two_bottom_lines() {
        let [main, notice, status] = LayoutManager::main_layout(Rect::new(0, 0, 80, 24));
        assert_eq!(main.height, 22);
        assert_eq!(notice.y, 22);
        assert_eq!(status.y, 23);
        assert_eq!(status.height, 1);
    }

    #[test]
    fn test_centered_rect_lines_is_centered() {
        let area = LayoutManager::centered_rect_lines(50, 10, Rect::new(0, 0, 100, 40));
        assert_eq!(area.height, 10);
        assert_eq!(area.width, 50);
        assert_eq!(area.x, 25);
    }

    #[test]
    fn test_scroll_offset_keeps_cursor_visible() {
        assert_eq!(LayoutManager::scroll_offset(0, 10), 0);
        assert_eq!(LayoutManager::scroll_offset(9, 10), 0);
        assert_eq!(LayoutManager::scroll_offset(15, 10), 6);
        assert_eq!(LayoutManager::scroll_offset(3, 0), 0);
    }
}
