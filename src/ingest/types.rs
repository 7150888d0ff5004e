//! Batch pipeline input/output types and error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::MetadataRecord;

/// One client-submitted batch of encoded audio files sharing a session id.
///
/// This is the pipeline's input struct; the HTTP layer deserializes the
/// request body directly into it.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadBatch {
    /// Grouping key for later retrieval; not a uniqueness constraint
    pub session_id: String,
    /// Ordered file submissions; an empty list is rejected as `EmptyBatch`
    pub files: Vec<FileSubmission>,
}

/// A single encoded file within a batch
#[derive(Debug, Clone, Deserialize)]
pub struct FileSubmission {
    pub file_name: String,
    /// Base64-encoded audio bytes; the empty string is an invalid payload
    #[serde(rename = "data")]
    pub encoded_data: String,
}

/// Per-file failure kinds. Collected into `BatchResult::failed`, never
/// thrown; one file's failure must not abort its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileErrorKind {
    /// Payload is not valid base64
    #[error("invalid base64 payload")]
    InvalidEncoding,

    /// Payload is empty, or decodes to zero bytes
    #[error("empty audio payload")]
    EmptyPayload,

    /// Bytes match no recognized audio container or codec
    #[error("unrecognized audio container or codec")]
    UnsupportedFormat,

    /// Parsing started but no duration could be determined
    #[error("corrupt audio stream, duration could not be determined")]
    CorruptAudio,

    /// The record was valid but the store could not persist it
    #[error("metadata store append failed: {0}")]
    StorageFailure(String),
}

/// Batch-level rejection, raised before any file is processed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("batch contains no files")]
    EmptyBatch,
}

/// One failed file: which submission, and why
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub file_name: String,
    pub kind: FileErrorKind,
}

/// Aggregated batch outcome. Both sequences preserve submission order of
/// the files that landed in them; `succeeded.len() + failed.len()` always
/// equals the number of submitted files.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub succeeded: Vec<MetadataRecord>,
    pub failed: Vec<FileFailure>,
}

/// Summary status reported to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    /// Every file succeeded
    Success,
    /// Some files succeeded, some failed
    Partial,
    /// Every file failed
    Failure,
}

impl BatchResult {
    pub fn status(&self) -> BatchStatus {
        if self.failed.is_empty() {
            BatchStatus::Success
        } else if self.succeeded.is_empty() {
            BatchStatus::Failure
        } else {
            BatchStatus::Partial
        }
    }
}
