//! Page views, dialogs and bars. Each renders straight from `AppState`.

pub mod common;
pub mod confirm_dialog;
pub mod help_panel;
pub mod message_form;
pub mod message_view;
pub mod notice_bar;
pub mod queue_details;
pub mod queue_form;
pub mod queue_list;
pub mod scrollbar_helper;
pub mod status_bar;

// Component exports
pub use confirm_dialog::ConfirmDialog;
pub use help_panel::HelpPanel;
pub use message_form::MessageForm;
pub use message_view::MessageView;
pub use notice_bar::NoticeBar;
pub use queue_details::QueueDetailsView;
pub use queue_form::QueueForm;
pub use queue_list::QueueListView;
pub use status_bar::StatusBar;
