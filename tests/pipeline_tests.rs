//! Pipeline integration tests
//!
//! Exercises the batch processor against the real SQLite store and the
//! real symphonia probe, below the HTTP layer.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use audiolog::db::{MetadataStore, SqliteMetadataStore};
use audiolog::ingest::{
    BatchError, BatchProcessor, BatchStatus, FileErrorKind, FileSubmission, SymphoniaProbe,
    UploadBatch,
};
use audiolog::time::SystemClock;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

async fn sqlite_store() -> Arc<SqliteMetadataStore> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    audiolog::db::init_tables(&pool).await.unwrap();
    Arc::new(SqliteMetadataStore::new(pool, Duration::from_secs(5)))
}

fn processor(store: Arc<SqliteMetadataStore>) -> BatchProcessor {
    BatchProcessor::new(Arc::new(SymphoniaProbe), store, Arc::new(SystemClock))
}

fn wav_submission(name: &str, seconds: f64) -> FileSubmission {
    FileSubmission {
        file_name: name.into(),
        encoded_data: helpers::wav_base64(8000, seconds),
    }
}

fn batch(session_id: &str, files: Vec<FileSubmission>) -> UploadBatch {
    UploadBatch {
        session_id: session_id.into(),
        files,
    }
}

#[tokio::test]
async fn test_processed_records_are_durable_and_ordered() {
    let store = sqlite_store().await;
    let processor = processor(Arc::clone(&store));

    let result = processor
        .process(batch(
            "sess-1",
            vec![
                wav_submission("a.wav", 1.0),
                wav_submission("b.wav", 0.5),
                wav_submission("c.wav", 0.25),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(result.status(), BatchStatus::Success);

    let stored = store.list_by_session("sess-1").await.unwrap();
    assert_eq!(stored.len(), 3);
    // Stored order matches succeeded order matches submission order
    let stored_names: Vec<_> = stored.iter().map(|r| r.file_name.as_str()).collect();
    let result_names: Vec<_> = result.succeeded.iter().map(|r| r.file_name.as_str()).collect();
    assert_eq!(stored_names, result_names);
    assert_eq!(stored_names, ["a.wav", "b.wav", "c.wav"]);
    // And the stored durations are the probe's values
    assert!((stored[0].length_seconds - 1.0).abs() < 1e-9);
    assert!((stored[2].length_seconds - 0.25).abs() < 1e-9);
}

#[tokio::test]
async fn test_failed_files_leave_no_rows_behind() {
    let store = sqlite_store().await;
    let processor = processor(Arc::clone(&store));

    let result = processor
        .process(batch(
            "sess-2",
            vec![
                wav_submission("good.wav", 0.5),
                FileSubmission {
                    file_name: "junk.bin".into(),
                    encoded_data: STANDARD.encode(b"no container here"),
                },
            ],
        ))
        .await
        .unwrap();

    assert_eq!(result.status(), BatchStatus::Partial);
    assert_eq!(result.failed[0].kind, FileErrorKind::UnsupportedFormat);

    let stored = store.list_by_session("sess-2").await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].file_name, "good.wav");
}

#[tokio::test]
async fn test_reprocessing_same_batch_accumulates_independent_records() {
    let store = sqlite_store().await;
    let processor = processor(Arc::clone(&store));

    let make = || batch("sess-3", vec![wav_submission("same.wav", 0.5)]);

    let first = processor.process(make()).await.unwrap();
    let second = processor.process(make()).await.unwrap();

    let stored = store.list_by_session("sess-3").await.unwrap();
    assert_eq!(stored.len(), 2);
    assert_ne!(stored[0].guid, stored[1].guid);
    assert_ne!(first.succeeded[0].guid, second.succeeded[0].guid);
}

#[tokio::test]
async fn test_empty_batch_never_touches_the_store() {
    let store = sqlite_store().await;
    let processor = processor(Arc::clone(&store));

    let result = processor.process(batch("sess-4", vec![])).await;

    assert_eq!(result.unwrap_err(), BatchError::EmptyBatch);
    assert!(store.list_by_session("sess-4").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_schema_surfaces_as_storage_failure_per_file() {
    // A store whose table was never created: every append fails, but the
    // batch still runs to completion with per-file outcomes.
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .unwrap();
    let store = Arc::new(SqliteMetadataStore::new(pool, Duration::from_secs(5)));
    let processor = processor(Arc::clone(&store));

    let result = processor
        .process(batch(
            "sess-5",
            vec![
                wav_submission("a.wav", 0.5),
                wav_submission("b.wav", 0.5),
            ],
        ))
        .await
        .unwrap();

    assert_eq!(result.status(), BatchStatus::Failure);
    assert_eq!(result.failed.len(), 2);
    assert!(result
        .failed
        .iter()
        .all(|f| matches!(f.kind, FileErrorKind::StorageFailure(_))));
}
