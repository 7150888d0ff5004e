//! Database access

pub mod metadata;

pub use metadata::{MetadataStore, SqliteMetadataStore, StoreError};

use anyhow::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open or create the service database and run table migration.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // SQLite URI with mode=rwc (read, write, create)
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the metadata table if it doesn't exist.
///
/// One row per processed file. Insertion order is rowid order, which
/// `list_by_session` relies on for its ordering guarantee.
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS audio_metadata (
            guid TEXT PRIMARY KEY,
            session_id TEXT NOT NULL,
            file_name TEXT NOT NULL,
            length_seconds REAL NOT NULL,
            processed_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_audio_metadata_session
        ON audio_metadata(session_id)
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (audio_metadata)");

    Ok(())
}
