//! Metadata persistence
//!
//! The store is the only I/O boundary in the pipeline. Each append is one
//! independent, atomic row insert; concurrent batches share the pool and
//! need no coordination beyond it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::MetadataRecord;

/// Store-level failure; surfaces per file as `StorageFailure`
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("append timed out after {0} ms")]
    Timeout(u128),

    #[error("stored row malformed: {0}")]
    Malformed(String),
}

/// Durable append plus retrieval by session id.
///
/// `append` must be safe under concurrent invocation; `list_by_session`
/// returns records in insertion order.
#[async_trait]
pub trait MetadataStore: Send + Sync {
    async fn append(&self, record: &MetadataRecord) -> Result<(), StoreError>;

    async fn list_by_session(&self, session_id: &str)
        -> Result<Vec<MetadataRecord>, StoreError>;
}

/// SQLite-backed store over a shared connection pool.
///
/// Every append runs under `append_timeout`; an elapsed timeout is reported
/// as a `StoreError` so the pipeline can mark that one file failed while
/// the batch continues.
pub struct SqliteMetadataStore {
    pool: SqlitePool,
    append_timeout: Duration,
}

impl SqliteMetadataStore {
    pub fn new(pool: SqlitePool, append_timeout: Duration) -> Self {
        Self {
            pool,
            append_timeout,
        }
    }
}

#[async_trait]
impl MetadataStore for SqliteMetadataStore {
    async fn append(&self, record: &MetadataRecord) -> Result<(), StoreError> {
        let insert = sqlx::query(
            r#"
            INSERT INTO audio_metadata (guid, session_id, file_name, length_seconds, processed_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.guid.to_string())
        .bind(&record.session_id)
        .bind(&record.file_name)
        .bind(record.length_seconds)
        .bind(record.processed_at.to_rfc3339())
        .execute(&self.pool);

        match tokio::time::timeout(self.append_timeout, insert).await {
            Ok(result) => {
                result?;
                Ok(())
            }
            Err(_) => Err(StoreError::Timeout(self.append_timeout.as_millis())),
        }
    }

    async fn list_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<MetadataRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT guid, session_id, file_name, length_seconds, processed_at
            FROM audio_metadata
            WHERE session_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let guid_str: String = row.get("guid");
                let guid = Uuid::parse_str(&guid_str)
                    .map_err(|e| StoreError::Malformed(format!("guid: {}", e)))?;

                let processed_at_str: String = row.get("processed_at");
                let processed_at = DateTime::parse_from_rfc3339(&processed_at_str)
                    .map_err(|e| StoreError::Malformed(format!("processed_at: {}", e)))?
                    .with_timezone(&Utc);

                Ok(MetadataRecord {
                    guid,
                    session_id: row.get("session_id"),
                    file_name: row.get("file_name"),
                    length_seconds: row.get("length_seconds"),
                    processed_at,
                })
            })
            .collect()
    }
}
