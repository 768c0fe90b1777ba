//! Fire-and-forget audit pipeline.
//!
//! Handlers call [`AuditPublisher::publish`], which never blocks: events go
//! into a bounded channel and are dropped when it is full. A single
//! [`run_audit_worker`] task drains the channel and hands every event to
//! each registered [`AuditObserver`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, warn};

use crate::domain::audit_event::AuditEvent;

/// A sink for audit events.
///
/// # Implementations
///
/// - [`crate::infrastructure::audit::FileObserver`] - JSON lines appended to a file
/// - [`crate::infrastructure::audit::LogObserver`] - `tracing` events
/// - [`crate::infrastructure::audit::HttpObserver`] - JSON POSTed to a remote collector
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditObserver: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Records one event. Errors are logged by the worker and otherwise ignored.
    async fn notify(&self, event: &AuditEvent) -> anyhow::Result<()>;
}

/// Cloneable handle used by handlers to emit audit events.
#[derive(Clone)]
pub struct AuditPublisher {
    tx: mpsc::Sender<AuditEvent>,
}

impl AuditPublisher {
    pub fn new(tx: mpsc::Sender<AuditEvent>) -> Self {
        Self { tx }
    }

    /// Queues `event` without waiting. Dropped if the queue is full.
    pub fn publish(&self, event: AuditEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                warn!("audit queue full, dropping event");
                metrics::counter!("audit_events_dropped_total").increment(1);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("audit worker stopped, dropping event");
            }
        }
    }
}

/// Drains `rx` until every sender is dropped, notifying each observer in turn.
pub async fn run_audit_worker(
    mut rx: mpsc::Receiver<AuditEvent>,
    observers: Vec<Arc<dyn AuditObserver>>,
) {
    while let Some(event) = rx.recv().await {
        for observer in &observers {
            if let Err(e) = observer.notify(&event).await {
                warn!(observer = observer.name(), error = %e, "audit observer failed");
            }
        }
    }

    debug!("audit worker stopped");
}
