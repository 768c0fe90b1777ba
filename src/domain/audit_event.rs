//! Audit event model.

use serde::Serialize;

/// What the user did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Shorten,
    Follow,
}

/// One audit record, serialized as
/// `{"ts": 1700000000, "action": "shorten", "user_id": "...", "url": "..."}`.
///
/// Created in HTTP handlers and sent to the audit worker over a bounded
/// channel (see [`crate::domain::audit_worker`]).
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    /// Unix timestamp in seconds.
    pub ts: i64,
    pub action: AuditAction,
    pub user_id: Option<String>,
    /// The original URL involved.
    pub url: String,
}

impl AuditEvent {
    /// Creates an event stamped with the current time.
    pub fn new(action: AuditAction, user_id: Option<String>, url: String) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp(),
            action,
            user_id,
            url,
        }
    }

    pub fn shorten(user_id: &str, url: &str) -> Self {
        Self::new(AuditAction::Shorten, Some(user_id.to_string()), url.to_string())
    }

    pub fn follow(user_id: Option<&str>, url: &str) -> Self {
        Self::new(
            AuditAction::Follow,
            user_id.map(|s| s.to_string()),
            url.to_string(),
        )
    }
}
