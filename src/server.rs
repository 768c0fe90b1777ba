//! HTTP server initialization and runtime setup.
//!
//! Selects the storage backend, starts the audit worker, and runs the Axum
//! server until a shutdown signal arrives.

use crate::application::services::{AuthService, ShortenerService};
use crate::config::{Config, StorageKind, mask_connection_string};
use crate::domain::allocator::Allocator;
use crate::domain::audit_worker::{AuditObserver, AuditPublisher, run_audit_worker};
use crate::domain::repositories::UrlStorage;
use crate::infrastructure::audit::{FileObserver, HttpObserver, LogObserver};
use crate::infrastructure::persistence::{FileStorage, MemoryStorage, PgStorage};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Opens the configured storage backend.
///
/// For PostgreSQL this connects the pool and applies `migrations/`.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn open_storage(config: &Config) -> Result<Arc<dyn UrlStorage>> {
    let storage: Arc<dyn UrlStorage> = match config.storage() {
        StorageKind::Postgres(dsn) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .connect(&dsn)
                .await
                .with_context(|| {
                    format!("Failed to connect to {}", mask_connection_string(&dsn))
                })?;
            tracing::info!("Connected to database");

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;

            Arc::new(PgStorage::new(Arc::new(pool)))
        }
        StorageKind::File(path) => {
            tracing::info!("Using file storage at {}", path.display());
            Arc::new(FileStorage::new(path))
        }
        StorageKind::Memory => {
            tracing::info!("Using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
    };

    Ok(storage)
}

/// Starts the audit worker and returns the publisher handlers use.
///
/// The log observer is always registered; the file and HTTP observers only
/// when `AUDIT_FILE` / `AUDIT_URL` are set.
///
/// # Errors
///
/// Returns an error if the audit HTTP client cannot be built.
pub fn spawn_audit_worker(config: &Config) -> Result<AuditPublisher> {
    let mut observers: Vec<Arc<dyn AuditObserver>> = vec![Arc::new(LogObserver)];
    if let Some(path) = &config.audit_file {
        observers.push(Arc::new(FileObserver::new(path)));
    }
    if let Some(url) = &config.audit_url {
        observers.push(Arc::new(HttpObserver::new(url.as_str())?));
    }

    let observers_len = observers.len();
    let (tx, rx) = mpsc::channel(config.audit_queue_capacity);
    tokio::spawn(run_audit_worker(rx, observers));
    tracing::info!(observers = observers_len, "Audit worker started");

    Ok(AuditPublisher::new(tx))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (PostgreSQL, file, or memory)
/// - Allocator, seeded from existing records
/// - Background audit worker
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Storage cannot be opened or loaded
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = open_storage(&config).await?;
    let allocator = Allocator::new(storage)
        .await
        .context("Failed to load existing records")?;

    let shortener = ShortenerService::new(Arc::new(allocator), config.delete_worker());
    let auth_service = match &config.cookie_secret {
        Some(secret) => AuthService::new(secret.clone()),
        None => AuthService::ephemeral(),
    };
    let audit = spawn_audit_worker(&config)?;

    let state = AppState::new(
        Arc::new(shortener),
        Arc::new(auth_service),
        audit,
        &config.base_url,
    );

    let app = app_router(state);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
