//! Shared state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AuthService, ShortenerService};
use crate::domain::allocator::Allocator;
use crate::domain::audit_worker::AuditPublisher;

#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortenerService<Allocator>>,
    pub auth_service: Arc<AuthService>,
    pub audit: AuditPublisher,
    base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        shortener: Arc<ShortenerService<Allocator>>,
        auth_service: Arc<AuthService>,
        audit: AuditPublisher,
        base_url: &str,
    ) -> Self {
        Self {
            shortener,
            auth_service,
            audit,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Joins the configured base URL and `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}
