//! Fixed mapping from HTTP status to user message and side effect.

use common::HttpStatusCode;

pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired, please log in again";

/// Extra action a status triggers beyond notifying the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    None,
    /// Wipe credential and cached profile, then navigate to login.
    ExpireSession,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRule {
    pub status: u16,
    pub message: &'static str,
    /// Use the body's `message` when the server sent one.
    pub prefer_body_message: bool,
    pub side_effect: SideEffect,
}

/// What the classifier does for one failed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResolution {
    pub message: String,
    pub side_effect: SideEffect,
}

const STANDARD_RULES: [StatusRule; 7] = [
    StatusRule {
        status: 401,
        message: SESSION_EXPIRED_MESSAGE,
        prefer_body_message: false,
        side_effect: SideEffect::ExpireSession,
    },
    StatusRule {
        status: 403,
        message: "Permission denied",
        prefer_body_message: false,
        side_effect: SideEffect::None,
    },
    StatusRule {
        status: 404,
        message: "The requested resource does not exist",
        prefer_body_message: false,
        side_effect: SideEffect::None,
    },
    StatusRule {
        status: 422,
        message: "Invalid request parameters",
        prefer_body_message: true,
        side_effect: SideEffect::None,
    },
    StatusRule {
        status: 500,
        message: "Internal server error, please try again later",
        prefer_body_message: false,
        side_effect: SideEffect::None,
    },
    StatusRule {
        status: 502,
        message: "Bad gateway, please try again later",
        prefer_body_message: false,
        side_effect: SideEffect::None,
    },
    StatusRule {
        status: 503,
        message: "Service temporarily unavailable, please try again later",
        prefer_body_message: false,
        side_effect: SideEffect::None,
    },
];

#[derive(Debug, Clone)]
pub struct StatusTable {
    rules: Vec<StatusRule>,
}

impl Default for StatusTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl StatusTable {
    pub fn standard() -> Self {
        Self {
            rules: STANDARD_RULES.to_vec(),
        }
    }

    /// Replace or add the rule for `rule.status`.
    pub fn with_rule(mut self, rule: StatusRule) -> Self {
        self.rules.retain(|r| r.status != rule.status);
        self.rules.push(rule);
        self
    }

    pub fn rule(&self, status: HttpStatusCode) -> Option<&StatusRule> {
        self.rules.iter().find(|r| r.status == status.0)
    }

    /// Unmapped statuses fall back to the body message, then `Request failed (<status>)`.
    pub fn resolve(&self, status: HttpStatusCode, body_message: Option<&str>) -> StatusResolution {
        match self.rule(status) {
            Some(rule) => {
                let message = match (rule.prefer_body_message, body_message) {
                    (true, Some(body)) => body.to_string(),
                    _ => rule.message.to_string(),
                };
                StatusResolution {
                    message,
                    side_effect: rule.side_effect,
                }
            }
            None => StatusResolution {
                message: body_message
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Request failed ({status})")),
                side_effect: SideEffect::None,
            },
        }
    }
}
