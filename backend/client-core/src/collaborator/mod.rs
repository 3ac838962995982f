//! Outward-facing collaborators the access layer drives but does not own.

pub mod navigate;
pub mod notify;
pub mod recording;

pub use navigate::{LogNavigator, Navigator};
pub use notify::{LogNotifier, NoticeKind, Notifier};
pub use recording::{RecordingNavigator, RecordingNotifier};
