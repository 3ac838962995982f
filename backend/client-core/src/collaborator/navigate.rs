use log::warn;

/// Full application navigation. Only used when the session expires.
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str);
}

/// Navigator for hosts without a navigable UI.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn redirect_to(&self, path: &str) {
        warn!("Session expired, redirecting to {path}");
    }
}
