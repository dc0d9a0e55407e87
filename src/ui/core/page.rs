//! Pages and single-level back navigation.

use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Page {
    #[default]
    Overview,
    Details,
    Create,
    DeleteConfirm,
    MessageDetails,
    MessageCreate,
    MessageDeleteConfirm,
}

impl Page {
    /// Where "back" leads when no usable previous page is recorded
    pub fn parent(self) -> Option<Page> {
        match self {
            Page::Overview => None,
            Page::Details | Page::Create | Page::DeleteConfirm => Some(Page::Overview),
            Page::MessageDetails | Page::MessageCreate | Page::MessageDeleteConfirm => Some(Page::Details),
        }
    }

    /// Pages that own a refresh timer
    pub fn auto_refreshes(self) -> bool {
        matches!(self, Page::Overview | Page::Details)
    }

    /// Pages whose keys are typed into a form
    pub fn is_form(self) -> bool {
        matches!(self, Page::Create | Page::MessageCreate)
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Overview => "Queues",
            Page::Details => "Queue details",
            Page::Create => "Create queue",
            Page::DeleteConfirm => "Delete queues",
            Page::MessageDetails => "Message",
            Page::MessageCreate => "Send message",
            Page::MessageDeleteConfirm => "Delete messages",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Current page plus the page it was entered from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigation {
    current: Page,
    previous: Option<Page>,
}

impl Navigation {
    pub fn current(&self) -> Page {
        self.current
    }

    pub fn previous(&self) -> Option<Page> {
        self.previous
    }

    /// Move to `page`, remembering the page we came from.
    ///
    /// Returns false when `page` is already current.
    pub fn go(&mut self, page: Page) -> bool {
        if self.current == page {
            return false;
        }
        log::debug!("Navigation: {} -> {}", self.current, page);
        self.previous = Some(self.current);
        self.current = page;
        true
    }

    /// The page "back" should return to: the recorded previous page when it
    /// is an ancestor-or-sibling entry point, else the structural parent.
    pub fn back_target(&self) -> Option<Page> {
        match (self.current, self.previous) {
            (Page::MessageDeleteConfirm, Some(Page::MessageDetails)) => Some(Page::MessageDetails),
            (current, _) => current.parent(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_page_is_overview() {
        let nav = Navigation::default();
        assert_eq!(nav.current(), Page::Overview);
        assert_eq!(nav.previous(), None);
        assert_eq!(nav.back_target(), None);
    }

    #[test]
    fn test_go_records_previous() {
        let mut nav = Navigation::default();
        assert!(nav.go(Page::Details));
        assert!(nav.go(Page::MessageDetails));
        assert_eq!(nav.previous(), Some(Page::Details));
        assert!(!nav.go(Page::MessageDetails));
    }

    #[test]
    fn test_page_kinds() {
        assert!(Page::Overview.auto_refreshes());
        assert!(Page::Details.auto_refreshes());
        assert!(!Page::MessageDetails.auto_refreshes());
        assert!(Page::Create.is_form());
        assert!(!Page::DeleteConfirm.is_form());
    }

    #[test]
    fn test_message_delete_returns_to_invoking_page() {
        let mut nav = Navigation::default();
        nav.go(Page::Details);
        nav.go(Page::MessageDeleteConfirm);
        assert_eq!(nav.back_target(), Some(Page::Details));

        nav.go(Page::Details);
        nav.go(Page::MessageDetails);
        nav.go(Page::MessageDeleteConfirm);
        assert_eq!(nav.back_target(), Some(Page::MessageDetails));
    }
}
