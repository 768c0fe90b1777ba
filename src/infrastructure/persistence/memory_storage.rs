//! In-memory storage backend.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StorageError;
use crate::domain::repositories::UrlStorage;

/// Records plus the two lookup indexes.
///
/// Kept behind a single lock so the code index and the URL index are always
/// updated together.
#[derive(Default)]
struct Inner {
    records: Vec<UrlRecord>,
    by_code: HashMap<String, usize>,
    /// Live records only.
    by_url: HashMap<String, usize>,
}

impl Inner {
    fn check_insertable(&self, record: &UrlRecord) -> Result<(), StorageError> {
        if self.by_code.contains_key(&record.short_code) {
            return Err(StorageError::DuplicateCode);
        }
        if self.by_url.contains_key(&record.original_url) {
            return Err(StorageError::DuplicateUrl);
        }
        Ok(())
    }

    fn insert(&mut self, record: UrlRecord) {
        let idx = self.records.len();
        self.by_code.insert(record.short_code.clone(), idx);
        if !record.is_deleted {
            self.by_url.insert(record.original_url.clone(), idx);
        }
        self.records.push(record);
    }
}

/// Process-local storage; contents are lost on restart.
///
/// Used when neither a database DSN nor a file path is configured, and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    inner: RwLock<Inner>,
}

impl MemoryStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UrlStorage for MemoryStorage {
    async fn load(&self) -> Result<Vec<UrlRecord>, StorageError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn append(&self, record: UrlRecord) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        inner.check_insertable(&record)?;

        debug!(code = %record.short_code, "storing url in memory");
        inner.insert(record);
        Ok(())
    }

    async fn append_batch(&self, records: Vec<UrlRecord>) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut inner = self.inner.write().await;

        let mut codes = HashSet::with_capacity(records.len());
        let mut urls = HashSet::with_capacity(records.len());
        for record in &records {
            inner.check_insertable(record)?;
            if !codes.insert(record.short_code.as_str()) {
                return Err(StorageError::DuplicateCode);
            }
            if !urls.insert(record.original_url.as_str()) {
                return Err(StorageError::DuplicateUrl);
            }
        }

        debug!(count = records.len(), "storing url batch in memory");
        for record in records {
            inner.insert(record);
        }
        Ok(())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<String>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_url
            .get(original_url)
            .map(|&idx| inner.records[idx].short_code.clone()))
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.read().await;
        match inner.by_code.get(short_code) {
            Some(&idx) => {
                let record = &inner.records[idx];
                if record.is_deleted {
                    return Err(StorageError::Deleted);
                }
                Ok(Some(record.original_url.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<UrlRecord>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| r.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    async fn delete_batch(
        &self,
        short_codes: &[String],
        owner_id: &str,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;

        for code in short_codes {
            let Some(&idx) = inner.by_code.get(code) else {
                continue;
            };

            let record = &mut inner.records[idx];
            if record.is_deleted || !record.is_owned_by(owner_id) {
                continue;
            }
            record.is_deleted = true;
            let url = record.original_url.clone();

            if inner.by_url.get(&url) == Some(&idx) {
                inner.by_url.remove(&url);
            }
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
