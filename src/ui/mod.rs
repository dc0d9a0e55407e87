//! UI module for sqsdeck
//!
//! State, the reducer that updates it, key mapping, and the components that
//! render it. All remote work leaves through tasks and returns as events.

pub mod app_component;
pub mod components;
pub mod core;
pub mod forms;
pub mod keys;
pub mod layout;
pub mod reducer;
pub mod renderer;
pub mod state;

pub use app_component::AppComponent;
pub use layout::LayoutManager;
pub use reducer::{reduce, start};
pub use renderer::run_app;
pub use state::{AppState, Connection, Settings};
