//! Ingestion API handlers
//!
//! POST /process-audio runs the batch pipeline; per-file failures come back
//! inline in a 200 response so a caller can retry exactly the files that
//! failed. GET /sessions/:session_id/metadata reads stored records back.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::ingest::{BatchError, BatchResult, BatchStatus, UploadBatch};
use crate::models::MetadataRecord;
use crate::AppState;

/// POST /process-audio response
#[derive(Debug, Serialize)]
pub struct ProcessAudioResponse {
    pub status: BatchStatus,
    pub metadata: Vec<FileMetadataEntry>,
    pub errors: Vec<FileErrorEntry>,
}

/// One successfully processed file
#[derive(Debug, Serialize)]
pub struct FileMetadataEntry {
    pub file_name: String,
    pub length_seconds: f64,
    pub timestamp: DateTime<Utc>,
}

/// One failed file, with a human-readable reason
#[derive(Debug, Serialize)]
pub struct FileErrorEntry {
    pub file_name: String,
    pub detail: String,
}

/// GET /sessions/:session_id/metadata response
#[derive(Debug, Serialize)]
pub struct SessionMetadataResponse {
    pub session_id: String,
    pub records: Vec<MetadataRecord>,
}

impl From<BatchResult> for ProcessAudioResponse {
    fn from(result: BatchResult) -> Self {
        let status = result.status();
        Self {
            status,
            metadata: result
                .succeeded
                .iter()
                .map(|r| FileMetadataEntry {
                    file_name: r.file_name.clone(),
                    // Two decimals for display; the stored record keeps full precision
                    length_seconds: (r.length_seconds * 100.0).round() / 100.0,
                    timestamp: r.processed_at,
                })
                .collect(),
            errors: result
                .failed
                .iter()
                .map(|f| FileErrorEntry {
                    file_name: f.file_name.clone(),
                    detail: f.kind.to_string(),
                })
                .collect(),
        }
    }
}

/// Reject structurally invalid batches before the pipeline runs.
///
/// Only request-shape constraints live here. Per-file payload problems are
/// pipeline outcomes reported inline, not request-level errors.
fn validate_batch(batch: &UploadBatch) -> Result<(), ApiError> {
    if batch.session_id.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "session_id must not be empty".to_string(),
        ));
    }
    if batch.files.is_empty() {
        return Err(ApiError::BadRequest("No audio files provided".to_string()));
    }
    if let Some(index) = batch
        .files
        .iter()
        .position(|f| f.file_name.trim().is_empty())
    {
        return Err(ApiError::BadRequest(format!(
            "file_name must not be empty (file at index {})",
            index
        )));
    }
    Ok(())
}

/// POST /process-audio
///
/// Process a batch of encoded audio files. A single bad file never fails
/// the call; it is reported in `errors` alongside its siblings' results.
pub async fn process_audio(
    State(state): State<AppState>,
    Json(batch): Json<UploadBatch>,
) -> ApiResult<Json<ProcessAudioResponse>> {
    validate_batch(&batch)?;

    let session_id = batch.session_id.clone();
    let result = state.processor.process(batch).await.map_err(|e| match e {
        BatchError::EmptyBatch => ApiError::BadRequest(e.to_string()),
    })?;

    tracing::info!(
        session_id = %session_id,
        status = ?result.status(),
        succeeded = result.succeeded.len(),
        failed = result.failed.len(),
        "Batch request complete"
    );

    Ok(Json(ProcessAudioResponse::from(result)))
}

/// GET /sessions/:session_id/metadata
///
/// Return all stored records for a session, in insertion order.
pub async fn session_metadata(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<SessionMetadataResponse>> {
    let records = state.store.list_by_session(&session_id).await?;

    tracing::debug!(session_id = %session_id, records = records.len(), "Session metadata query");

    Ok(Json(SessionMetadataResponse {
        session_id,
        records,
    }))
}

/// Build ingestion routes
pub fn ingest_routes() -> Router<AppState> {
    Router::new()
        .route("/process-audio", post(process_audio))
        .route("/sessions/:session_id/metadata", get(session_metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::FileSubmission;

    fn batch(session_id: &str, names: &[&str]) -> UploadBatch {
        UploadBatch {
            session_id: session_id.into(),
            files: names
                .iter()
                .map(|n| FileSubmission {
                    file_name: n.to_string(),
                    encoded_data: "QUJD".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_batch() {
        assert!(validate_batch(&batch("s1", &["a.wav"])).is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_session_id() {
        let result = validate_batch(&batch("   ", &["a.wav"]));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_empty_file_list() {
        let result = validate_batch(&batch("s1", &[]));
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_blank_file_name() {
        let result = validate_batch(&batch("s1", &["a.wav", ""]));
        match result {
            Err(ApiError::BadRequest(msg)) => assert!(msg.contains("index 1")),
            other => panic!("expected BadRequest, got {:?}", other),
        }
    }

    #[test]
    fn test_response_rounds_display_length_only() {
        let record = crate::models::MetadataRecord::new(
            "s1".into(),
            "a.wav".into(),
            1.23456,
            Utc::now(),
        );
        let result = BatchResult {
            succeeded: vec![record],
            failed: vec![],
        };

        let response = ProcessAudioResponse::from(result);
        assert_eq!(response.metadata[0].length_seconds, 1.23);
    }
}
