//! JSON file storage backend.
//!
//! The whole record set lives in one JSON array that is read, modified, and
//! rewritten on every mutation. There is no append-only log.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StorageError;
use crate::domain::repositories::UrlStorage;

/// File-backed storage.
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a concurrent reader sees either the old document or the new one. The
/// internal lock keeps two read-modify-write cycles from interleaving.
pub struct FileStorage {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStorage {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    /// Location of the JSON document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next document is written to before the rename.
    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(OsString::from)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn read_records(&self) -> Result<Vec<UrlRecord>, StorageError> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&data)?)
    }

    async fn write_records(&self, records: &[UrlRecord]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let data = serde_json::to_vec_pretty(records)?;
        let tmp_path = self.tmp_path();
        tokio::fs::write(&tmp_path, &data).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = records.len(), "rewrote url file");
        Ok(())
    }
}

fn check_insertable(existing: &[UrlRecord], record: &UrlRecord) -> Result<(), StorageError> {
    for r in existing {
        if r.short_code == record.short_code {
            return Err(StorageError::DuplicateCode);
        }
        if !r.is_deleted && r.original_url == record.original_url {
            return Err(StorageError::DuplicateUrl);
        }
    }
    Ok(())
}

#[async_trait]
impl UrlStorage for FileStorage {
    async fn load(&self) -> Result<Vec<UrlRecord>, StorageError> {
        let _guard = self.lock.read().await;
        self.read_records().await
    }

    async fn append(&self, record: UrlRecord) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;
        let mut records = self.read_records().await?;

        check_insertable(&records, &record)?;
        records.push(record);

        self.write_records(&records).await
    }

    async fn append_batch(&self, new_records: Vec<UrlRecord>) -> Result<(), StorageError> {
        if new_records.is_empty() {
            return Ok(());
        }

        let _guard = self.lock.write().await;
        let mut records = self.read_records().await?;

        let mut codes = HashSet::with_capacity(new_records.len());
        let mut urls = HashSet::with_capacity(new_records.len());
        for record in &new_records {
            check_insertable(&records, record)?;
            if !codes.insert(record.short_code.as_str()) {
                return Err(StorageError::DuplicateCode);
            }
            if !urls.insert(record.original_url.as_str()) {
                return Err(StorageError::DuplicateUrl);
            }
        }

        records.extend(new_records);
        self.write_records(&records).await
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.read().await;
        let records = self.read_records().await?;

        Ok(records
            .into_iter()
            .find(|r| !r.is_deleted && r.original_url == original_url)
            .map(|r| r.short_code))
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.read().await;
        let records = self.read_records().await?;

        match records.into_iter().find(|r| r.short_code == short_code) {
            Some(r) if r.is_deleted => Err(StorageError::Deleted),
            Some(r) => Ok(Some(r.original_url)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<UrlRecord>, StorageError> {
        let _guard = self.lock.read().await;
        let records = self.read_records().await?;

        Ok(records
            .into_iter()
            .filter(|r| r.is_owned_by(owner_id))
            .collect())
    }

    async fn delete_batch(
        &self,
        short_codes: &[String],
        owner_id: &str,
    ) -> Result<(), StorageError> {
        let _guard = self.lock.write().await;
        let mut records = self.read_records().await?;

        let targets: HashSet<&str> = short_codes.iter().map(String::as_str).collect();
        let mut changed = false;
        for record in records.iter_mut() {
            if !record.is_deleted
                && record.is_owned_by(owner_id)
                && targets.contains(record.short_code.as_str())
            {
                record.is_deleted = true;
                changed = true;
            }
        }

        if changed {
            self.write_records(&records).await?;
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let _guard = self.lock.read().await;
        self.read_records().await.map(|_| ())
    }
}
