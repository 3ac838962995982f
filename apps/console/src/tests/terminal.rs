use crate::terminal::{notice_line, relogin_hint};

use client_core::collaborator::NoticeKind;

#[test]
fn given_error_notice_when_formatted_then_prefixed_with_kind() {
    assert_eq!(notice_line(NoticeKind::Error, "fail"), "error: fail");
    assert_eq!(notice_line(NoticeKind::Success, "saved"), "success: saved");
}

#[test]
fn given_expired_session_then_hint_names_login_command() {
    assert!(relogin_hint().contains("console login"));
}
