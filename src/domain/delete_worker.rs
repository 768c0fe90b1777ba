//! Background soft-delete fan-out.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, warn};

use crate::domain::repositories::UrlRepository;

/// Batch size and deadline for a delete job.
#[derive(Debug, Clone, Copy)]
pub struct DeleteWorkerConfig {
    /// Codes per `delete_batch` call.
    pub batch_size: usize,
    /// Upper bound on the whole job. Batches still running are aborted.
    pub deadline: Duration,
}

impl Default for DeleteWorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            deadline: Duration::from_secs(30),
        }
    }
}

/// Spawns a detached task that soft-deletes `codes` owned by `owner_id`.
///
/// The codes are split into batches of `config.batch_size`; every batch runs
/// as its own task in a [`JoinSet`] and issues one
/// [`UrlRepository::delete_batch`] call. A failed batch is logged and counted
/// in `delete_batch_failures_total` but is not retried and does not cancel
/// its siblings. When `config.deadline` elapses the remaining batches are
/// aborted.
///
/// The returned handle may be awaited, aborted, or dropped. Dropping it does
/// not stop the job.
pub fn spawn_delete_job<R>(
    repository: Arc<R>,
    codes: Vec<String>,
    owner_id: String,
    config: DeleteWorkerConfig,
) -> JoinHandle<()>
where
    R: UrlRepository + ?Sized + 'static,
{
    tokio::spawn(async move {
        let total = codes.len();
        let mut batches = JoinSet::new();

        for chunk in codes.chunks(config.batch_size.max(1)) {
            let repository = Arc::clone(&repository);
            let owner_id = owner_id.clone();
            let batch = chunk.to_vec();

            batches.spawn(async move {
                let result = repository.delete_batch(&batch, &owner_id).await;
                (batch, result)
            });
        }

        debug!(owner_id = %owner_id, total, batches = batches.len(), "delete job started");

        let drain = async {
            while let Some(joined) = batches.join_next().await {
                match joined {
                    Ok((_, Ok(()))) => {}
                    Ok((batch, Err(e))) => {
                        error!(owner_id = %owner_id, codes = ?batch, error = %e, "delete batch failed");
                        metrics::counter!("delete_batch_failures_total").increment(1);
                    }
                    Err(e) => {
                        error!(owner_id = %owner_id, error = %e, "delete batch task panicked");
                        metrics::counter!("delete_batch_failures_total").increment(1);
                    }
                }
            }
        };

        if tokio::time::timeout(config.deadline, drain).await.is_err() {
            warn!(
                owner_id = %owner_id,
                remaining = batches.len(),
                "delete job deadline reached, aborting remaining batches"
            );
            batches.abort_all();
            return;
        }

        info!(owner_id = %owner_id, total, "delete job finished");
    })
}
