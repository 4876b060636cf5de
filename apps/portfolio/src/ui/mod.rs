// Headless UI layer: the event vocabulary, the transient notifier and the app
// that dispatches events to the rest of the crate.

pub mod app;
pub mod events;
pub mod notify;

pub use app::{App, View};
pub use events::{next_line_lossy, UiEvent};
