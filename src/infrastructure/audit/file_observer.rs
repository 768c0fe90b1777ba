//! Audit observer that appends JSON lines to a file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::audit_event::AuditEvent;
use crate::domain::audit_worker::AuditObserver;

/// Appends one JSON document per line to `path`.
///
/// The file is opened in append mode for every event so external log
/// rotation works without a restart.
pub struct FileObserver {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditObserver for FileObserver {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn notify(&self, event: &AuditEvent) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_appends_one_line_per_event() {
        let dir = TempDir::new().unwrap();
        let observer = FileObserver::new(dir.path().join("audit.log"));

        observer
            .notify(&AuditEvent::shorten("u1", "https://a.com"))
            .await
            .unwrap();
        observer
            .notify(&AuditEvent::follow(None, "https://a.com"))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(observer.path()).unwrap();
        let lines: Vec<serde_json::Value> = contents
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["action"], "shorten");
        assert_eq!(lines[0]["user_id"], "u1");
        assert_eq!(lines[1]["action"], "follow");
        assert!(lines[1]["user_id"].is_null());
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let observer = FileObserver::new(dir.path().join("missing").join("audit.log"));

        let result = observer
            .notify(&AuditEvent::shorten("u1", "https://a.com"))
            .await;
        assert!(result.is_err());
    }
}
