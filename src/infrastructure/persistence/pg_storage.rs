//! PostgreSQL implementation of URL storage.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::errors::StorageError;
use crate::domain::repositories::UrlStorage;
use crate::utils::db_error::{
    ORIGINAL_URL_CONSTRAINT, SHORT_CODE_CONSTRAINT, is_unique_violation_on,
};

const INSERT_URL: &str = r#"
    INSERT INTO urls (id, short_code, original_url, owner_id)
    VALUES ($1, $2, $3, $4)
"#;

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    short_code: String,
    original_url: String,
    owner_id: String,
    is_deleted: bool,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            original_url: row.original_url,
            owner_id: row.owner_id,
            is_deleted: row.is_deleted,
        }
    }
}

fn map_insert_error(e: sqlx::Error) -> StorageError {
    if is_unique_violation_on(&e, SHORT_CODE_CONSTRAINT) {
        StorageError::DuplicateCode
    } else if is_unique_violation_on(&e, ORIGINAL_URL_CONSTRAINT) {
        StorageError::DuplicateUrl
    } else {
        StorageError::Database(e)
    }
}

/// PostgreSQL storage for URL records.
///
/// Uniqueness is enforced by the schema (see `migrations/`): a unique
/// constraint on `short_code` and a partial unique index on `original_url`
/// for rows that are not deleted. Violations are reported as
/// [`StorageError::DuplicateCode`] and [`StorageError::DuplicateUrl`].
pub struct PgStorage {
    pool: Arc<PgPool>,
}

impl PgStorage {
    /// Creates a new storage with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UrlStorage for PgStorage {
    async fn load(&self) -> Result<Vec<UrlRecord>, StorageError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            "SELECT id, short_code, original_url, owner_id, is_deleted FROM urls ORDER BY id",
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn append(&self, record: UrlRecord) -> Result<(), StorageError> {
        sqlx::query(INSERT_URL)
            .bind(record.id)
            .bind(&record.short_code)
            .bind(&record.original_url)
            .bind(&record.owner_id)
            .execute(self.pool.as_ref())
            .await
            .map_err(map_insert_error)?;

        Ok(())
    }

    async fn append_batch(&self, records: Vec<UrlRecord>) -> Result<(), StorageError> {
        if records.is_empty() {
            return Ok(());
        }

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        for record in &records {
            sqlx::query(INSERT_URL)
                .bind(record.id)
                .bind(&record.short_code)
                .bind(&record.original_url)
                .bind(&record.owner_id)
                .execute(&mut *tx)
                .await
                .map_err(map_insert_error)?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<String>, StorageError> {
        let code = sqlx::query_scalar::<_, String>(
            "SELECT short_code FROM urls WHERE original_url = $1 AND NOT is_deleted",
        )
        .bind(original_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(code)
    }

    async fn find_by_short_code(&self, short_code: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query_as::<_, (String, bool)>(
            "SELECT original_url, is_deleted FROM urls WHERE short_code = $1",
        )
        .bind(short_code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        match row {
            Some((_, true)) => Err(StorageError::Deleted),
            Some((url, false)) => Ok(Some(url)),
            None => Ok(None),
        }
    }

    async fn find_by_owner(&self, owner_id: &str) -> Result<Vec<UrlRecord>, StorageError> {
        let rows = sqlx::query_as::<_, UrlRow>(
            r#"
            SELECT id, short_code, original_url, owner_id, is_deleted
            FROM urls
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn delete_batch(
        &self,
        short_codes: &[String],
        owner_id: &str,
    ) -> Result<(), StorageError> {
        if short_codes.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r#"
            UPDATE urls
            SET is_deleted = TRUE
            WHERE owner_id = $1 AND short_code = ANY($2) AND NOT is_deleted
            "#,
        )
        .bind(owner_id)
        .bind(short_codes)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}
