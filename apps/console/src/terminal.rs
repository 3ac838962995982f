//! Terminal renditions of the access layer's UI collaborators.

use client_core::collaborator::{Navigator, NoticeKind, Notifier};

use log::{error, info};

/// Prints notices to stderr, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NoticeKind, text: &str) {
        match kind {
            NoticeKind::Success => info!("{text}"),
            NoticeKind::Error => error!("{text}"),
        }
        eprintln!("{}", notice_line(kind, text));
    }
}

pub fn notice_line(kind: NoticeKind, text: &str) -> String {
    format!("{kind}: {text}")
}

/// A CLI cannot navigate; it tells the user how to get back in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect_to(&self, path: &str) {
        info!("Session expired, login page is {path}");
        eprintln!("{}", relogin_hint());
    }
}

pub fn relogin_hint() -> &'static str {
    "Your session has ended. Run `console login <username>` to sign in again."
}
