//! Audit observer that emits `tracing` events.

use async_trait::async_trait;
use tracing::info;

use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_worker::AuditObserver;

/// Logs every event at `INFO` under the `audit` target.
pub struct LogObserver;

#[async_trait]
impl AuditObserver for LogObserver {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, event: &AuditEvent) -> anyhow::Result<()> {
        info!(
            target: "audit",
            ts = event.ts,
            action = ?event.action,
            user_id = event.user_id.as_deref(),
            url = %event.url,
            "audit event"
        );
        Ok(())
    }
}
