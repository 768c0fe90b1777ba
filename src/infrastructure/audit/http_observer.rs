//! Audit observer that POSTs events to a remote collector.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_worker::AuditObserver;

/// Per-request timeout for the collector.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends every event as a JSON body to `url`.
///
/// A 4xx/5xx answer from the collector is logged but not treated as a
/// failure. Transport errors are returned to the worker.
pub struct HttpObserver {
    url: String,
    client: Client,
}

impl HttpObserver {
    /// Creates an observer for `url` with a [`REQUEST_TIMEOUT`] client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build audit HTTP client")?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AuditObserver for HttpObserver {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn notify(&self, event: &AuditEvent) -> anyhow::Result<()> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .with_context(|| format!("Failed to send audit event to {}", self.url))?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            warn!(url = %self.url, status = status.as_u16(), "audit collector returned error status");
        }

        Ok(())
    }
}
