//! Lock-serialized short code allocator.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::{RepositoryError, StorageError};
use crate::domain::repositories::{UrlRepository, UrlStorage};

/// The only component that writes to a [`UrlStorage`].
///
/// All writes (`add`, `add_batch`, `delete_batch`) run under one async mutex,
/// so "check for an existing URL, then write" is a single critical section
/// and two concurrent requests can never both create a record for the same
/// URL or the same code. The mutex also guards the id counter. Reads go
/// straight to storage without taking it.
///
/// The counter belongs to the instance: it is seeded from the highest id in
/// storage at construction and advanced only after a successful write, so
/// independent allocators (as in tests) never share state.
pub struct Allocator {
    storage: Arc<dyn UrlStorage>,
    last_id: Mutex<i64>,
}

impl Allocator {
    /// Creates an allocator, seeding the id counter from existing records.
    ///
    /// # Errors
    ///
    /// Returns the storage error if existing records cannot be loaded.
    pub async fn new(storage: Arc<dyn UrlStorage>) -> Result<Self, StorageError> {
        let records = storage.load().await?;
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);

        Ok(Self {
            storage,
            last_id: Mutex::new(last_id),
        })
    }

    /// The storage backend this allocator writes to.
    pub fn storage(&self) -> &Arc<dyn UrlStorage> {
        &self.storage
    }
}

#[async_trait]
impl UrlRepository for Allocator {
    async fn add(
        &self,
        short_code: &str,
        url: &str,
        owner_id: &str,
    ) -> Result<String, RepositoryError> {
        let mut last_id = self.last_id.lock().await;

        if let Some(code) = self.storage.find_by_original_url(url).await? {
            return Err(RepositoryError::UrlExists { code });
        }

        let id = *last_id + 1;
        let record = UrlRecord::new(
            id,
            short_code.to_string(),
            url.to_string(),
            owner_id.to_string(),
        );

        match self.storage.append(record).await {
            Ok(()) => {
                *last_id = id;
                Ok(short_code.to_string())
            }
            // The relational backend may catch a URL race the lookup above
            // could not see (another process on the same database).
            Err(StorageError::DuplicateUrl) => {
                match self.storage.find_by_original_url(url).await? {
                    Some(code) => Err(RepositoryError::UrlExists { code }),
                    None => Err(RepositoryError::Storage(StorageError::DuplicateUrl)),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, short_code: &str) -> Result<String, RepositoryError> {
        self.storage
            .find_by_short_code(short_code)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn add_batch(
        &self,
        pairs: Vec<(String, String)>,
        owner_id: &str,
    ) -> Result<Vec<String>, RepositoryError> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        let mut last_id = self.last_id.lock().await;
        let mut next_id = *last_id;

        let mut codes = Vec::with_capacity(pairs.len());
        let mut records = Vec::new();
        let mut assigned: HashMap<String, String> = HashMap::with_capacity(pairs.len());

        for (candidate, url) in pairs {
            if let Some(code) = assigned.get(&url) {
                codes.push(code.clone());
                continue;
            }

            let code = match self.storage.find_by_original_url(&url).await? {
                Some(existing) => existing,
                None => {
                    next_id += 1;
                    records.push(UrlRecord::new(
                        next_id,
                        candidate.clone(),
                        url.clone(),
                        owner_id.to_string(),
                    ));
                    candidate
                }
            };

            assigned.insert(url, code.clone());
            codes.push(code);
        }

        if !records.is_empty() {
            self.storage.append_batch(records).await?;
            *last_id = next_id;
        }

        Ok(codes)
    }

    async fn user_urls(&self, owner_id: &str) -> Result<Vec<UrlRecord>, RepositoryError> {
        Ok(self.storage.find_by_owner(owner_id).await?)
    }

    async fn delete_batch(
        &self,
        short_codes: &[String],
        owner_id: &str,
    ) -> Result<(), RepositoryError> {
        if short_codes.is_empty() {
            return Ok(());
        }

        let _guard = self.last_id.lock().await;
        self.storage.delete_batch(short_codes, owner_id).await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(self.storage.ping().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlStorage;
    use crate::infrastructure::persistence::MemoryStorage;

    fn record(id: i64, code: &str, url: &str) -> UrlRecord {
        UrlRecord::new(id, code.to_string(), url.to_string(), "user1".to_string())
    }

    fn mock_with_records(records: Vec<UrlRecord>) -> MockUrlStorage {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_load()
            .times(1)
            .returning(move || Ok(records.clone()));
        storage
    }

    #[tokio::test]
    async fn test_counter_seeded_from_max_id() {
        let mut storage = mock_with_records(vec![
            record(3, "aaaaaaaa", "https://a.com"),
            record(9, "bbbbbbbb", "https://b.com"),
            record(5, "cccccccc", "https://c.com"),
        ]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(None));
        storage
            .expect_append()
            .withf(|r| r.id == 10 && r.short_code == "dddddddd")
            .times(1)
            .returning(|_| Ok(()));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let code = allocator
            .add("dddddddd", "https://d.com", "user1")
            .await
            .unwrap();

        assert_eq!(code, "dddddddd");
    }

    #[tokio::test]
    async fn test_new_fails_when_load_fails() {
        let mut storage = MockUrlStorage::new();
        storage.expect_load().returning(|| {
            Err(StorageError::Io(std::io::Error::other("disk gone")))
        });

        let result = Allocator::new(Arc::new(storage)).await;
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[tokio::test]
    async fn test_add_existing_url_returns_existing_code() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_original_url()
            .withf(|url| url == "https://example.com")
            .returning(|_| Ok(Some("AbCd1234".to_string())));
        storage.expect_append().times(0);

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let result = allocator
            .add("zzzzzzzz", "https://example.com", "user1")
            .await;

        match result {
            Err(RepositoryError::UrlExists { code }) => assert_eq!(code, "AbCd1234"),
            other => panic!("expected UrlExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_code_collision() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(None));
        storage
            .expect_append()
            .returning(|_| Err(StorageError::DuplicateCode));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let result = allocator.add("taken000", "https://x.com", "user1").await;

        assert!(matches!(result, Err(RepositoryError::CodeCollision)));
    }

    #[tokio::test]
    async fn test_failed_write_does_not_advance_counter() {
        let mut storage = mock_with_records(vec![record(1, "aaaaaaaa", "https://a.com")]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(None));

        let mut seq = mockall::Sequence::new();
        storage
            .expect_append()
            .withf(|r| r.id == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StorageError::DuplicateCode));
        storage
            .expect_append()
            .withf(|r| r.id == 2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();

        assert!(allocator.add("taken000", "https://x.com", "u").await.is_err());
        assert!(allocator.add("fresh000", "https://x.com", "u").await.is_ok());
    }

    #[tokio::test]
    async fn test_add_url_race_resolves_to_existing_code() {
        let mut storage = mock_with_records(vec![]);
        let mut seq = mockall::Sequence::new();
        storage
            .expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(None));
        storage
            .expect_append()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(StorageError::DuplicateUrl));
        storage
            .expect_find_by_original_url()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some("winner01".to_string())));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let result = allocator.add("loser001", "https://x.com", "u").await;

        match result {
            Err(RepositoryError::UrlExists { code }) => assert_eq!(code, "winner01"),
            other => panic!("expected UrlExists, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_add_passes_other_storage_errors_through() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(None));
        storage
            .expect_append()
            .returning(|_| Err(StorageError::Io(std::io::Error::other("full"))));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let result = allocator.add("code0000", "https://x.com", "u").await;

        assert!(matches!(
            result,
            Err(RepositoryError::Storage(StorageError::Io(_)))
        ));
    }

    #[tokio::test]
    async fn test_find_distinguishes_not_found_and_deleted() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_short_code()
            .withf(|code| code == "missing0")
            .returning(|_| Ok(None));
        storage
            .expect_find_by_short_code()
            .withf(|code| code == "deleted0")
            .returning(|_| Err(StorageError::Deleted));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();

        assert!(matches!(
            allocator.find("missing0").await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            allocator.find("deleted0").await,
            Err(RepositoryError::Deleted)
        ));
    }

    #[tokio::test]
    async fn test_add_batch_substitutes_existing_codes_in_order() {
        let mut storage = mock_with_records(vec![record(4, "existing", "https://old.com")]);
        storage
            .expect_find_by_original_url()
            .returning(|url| {
                if url == "https://old.com" {
                    Ok(Some("existing".to_string()))
                } else {
                    Ok(None)
                }
            });
        storage
            .expect_append_batch()
            .withf(|records| {
                records.len() == 2
                    && records[0].id == 5
                    && records[0].short_code == "new00001"
                    && records[1].id == 6
                    && records[1].short_code == "new00003"
            })
            .times(1)
            .returning(|_| Ok(()));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let codes = allocator
            .add_batch(
                vec![
                    ("new00001".to_string(), "https://a.com".to_string()),
                    ("new00002".to_string(), "https://old.com".to_string()),
                    ("new00003".to_string(), "https://b.com".to_string()),
                ],
                "user1",
            )
            .await
            .unwrap();

        assert_eq!(codes, vec!["new00001", "existing", "new00003"]);
    }

    #[tokio::test]
    async fn test_add_batch_repeated_url_stored_once() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(None));
        storage
            .expect_append_batch()
            .withf(|records| records.len() == 1)
            .times(1)
            .returning(|_| Ok(()));

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let codes = allocator
            .add_batch(
                vec![
                    ("first000".to_string(), "https://same.com".to_string()),
                    ("second00".to_string(), "https://same.com".to_string()),
                ],
                "user1",
            )
            .await
            .unwrap();

        assert_eq!(codes, vec!["first000", "first000"]);
    }

    #[tokio::test]
    async fn test_add_batch_all_existing_skips_write() {
        let mut storage = mock_with_records(vec![]);
        storage
            .expect_find_by_original_url()
            .returning(|_| Ok(Some("existing".to_string())));
        storage.expect_append_batch().times(0);

        let allocator = Allocator::new(Arc::new(storage)).await.unwrap();
        let codes = allocator
            .add_batch(
                vec![("cand0000".to_string(), "https://x.com".to_string())],
                "u",
            )
            .await
            .unwrap();

        assert_eq!(codes, vec!["existing"]);
    }

    #[tokio::test]
    async fn test_add_batch_failure_is_all_or_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let allocator = Allocator::new(storage.clone()).await.unwrap();

        allocator
            .add("taken000", "https://first.com", "u")
            .await
            .unwrap();

        let result = allocator
            .add_batch(
                vec![
                    ("fresh000".to_string(), "https://a.com".to_string()),
                    ("taken000".to_string(), "https://b.com".to_string()),
                ],
                "u",
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::CodeCollision)));
        assert!(matches!(
            allocator.find("fresh000").await,
            Err(RepositoryError::NotFound)
        ));
        assert_eq!(storage.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_batch_only_touches_owner_records() {
        let storage = Arc::new(MemoryStorage::new());
        let allocator = Allocator::new(storage).await.unwrap();

        allocator.add("ownedbyA", "https://a.com", "A").await.unwrap();
        allocator.add("ownedbyB", "https://b.com", "B").await.unwrap();

        allocator
            .delete_batch(&["ownedbyA".to_string(), "ownedbyB".to_string()], "A")
            .await
            .unwrap();

        assert!(matches!(
            allocator.find("ownedbyA").await,
            Err(RepositoryError::Deleted)
        ));
        assert_eq!(allocator.find("ownedbyB").await.unwrap(), "https://b.com");
    }

    #[tokio::test]
    async fn test_deleted_url_can_be_shortened_again_with_new_code() {
        let storage = Arc::new(MemoryStorage::new());
        let allocator = Allocator::new(storage).await.unwrap();

        allocator.add("original", "https://a.com", "A").await.unwrap();
        allocator
            .delete_batch(&["original".to_string()], "A")
            .await
            .unwrap();

        let again = allocator.add("replaced", "https://a.com", "A").await.unwrap();
        assert_eq!(again, "replaced");

        let reuse = allocator.add("original", "https://other.com", "A").await;
        assert!(matches!(reuse, Err(RepositoryError::CodeCollision)));
    }

    #[tokio::test]
    async fn test_concurrent_adds_for_same_url_create_one_record() {
        let storage = Arc::new(MemoryStorage::new());
        let allocator = Arc::new(Allocator::new(storage.clone()).await.unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator
                    .add(&format!("code{:04}", i), "https://same.com", &format!("owner{i}"))
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }

        assert_eq!(created, 1);
        assert_eq!(storage.load().await.unwrap().len(), 1);
    }
}
