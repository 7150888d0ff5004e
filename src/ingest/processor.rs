//! Batch orchestration
//!
//! Drives each submitted file through decode → probe → stamp → append,
//! collecting successes and failures independently. Files are processed
//! sequentially in submission order so result ordering is deterministic and
//! timestamps are monotonic within the batch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::decoder;
use super::probe::DurationProbe;
use super::types::{BatchError, BatchResult, FileErrorKind, FileFailure, UploadBatch};
use crate::db::MetadataStore;
use crate::models::MetadataRecord;
use crate::time::Clock;

/// Batch pipeline with its capabilities injected at construction.
///
/// The processor owns no resource lifecycle: the store's pool and timeout
/// discipline, the probe's codec support, and the clock all belong to the
/// caller. One processor serves concurrent batches; it keeps no state
/// between `process` calls.
pub struct BatchProcessor {
    probe: Arc<dyn DurationProbe>,
    store: Arc<dyn MetadataStore>,
    clock: Arc<dyn Clock>,
}

impl BatchProcessor {
    pub fn new(
        probe: Arc<dyn DurationProbe>,
        store: Arc<dyn MetadataStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            probe,
            store,
            clock,
        }
    }

    /// Process a batch to completion, returning per-file outcomes.
    ///
    /// Every submission yields exactly one outcome; no failure aborts the
    /// rest of the batch. An empty file list is rejected up front with
    /// `EmptyBatch`, before the store is touched. There is no batch-level
    /// atomicity: records appended before a later failure stay durable.
    pub async fn process(&self, batch: UploadBatch) -> Result<BatchResult, BatchError> {
        if batch.files.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        info!(
            session_id = %batch.session_id,
            files = batch.files.len(),
            "Processing batch"
        );

        let mut result = BatchResult::default();
        let mut last_stamp: Option<DateTime<Utc>> = None;

        for submission in &batch.files {
            let raw = match decoder::decode(&submission.encoded_data) {
                Ok(raw) => raw,
                Err(kind) => {
                    warn!(file_name = %submission.file_name, error = %kind, "Payload rejected");
                    result.failed.push(FileFailure {
                        file_name: submission.file_name.clone(),
                        kind,
                    });
                    continue;
                }
            };

            let length_seconds = match self.probe.extract_duration(&raw) {
                Ok(seconds) => seconds,
                Err(kind) => {
                    warn!(file_name = %submission.file_name, error = %kind, "Duration probe failed");
                    result.failed.push(FileFailure {
                        file_name: submission.file_name.clone(),
                        kind,
                    });
                    continue;
                }
            };

            // Stamped at the moment extraction succeeds. Clamped to the
            // previous stamp so a stepping wall clock cannot reorder
            // records within the batch.
            let mut stamp = self.clock.now();
            if let Some(prev) = last_stamp {
                if stamp < prev {
                    stamp = prev;
                }
            }
            last_stamp = Some(stamp);

            let record = MetadataRecord::new(
                batch.session_id.clone(),
                submission.file_name.clone(),
                length_seconds,
                stamp,
            );

            match self.store.append(&record).await {
                Ok(()) => {
                    debug!(
                        file_name = %record.file_name,
                        length_seconds = record.length_seconds,
                        "Metadata stored"
                    );
                    result.succeeded.push(record);
                }
                Err(e) => {
                    error!(file_name = %record.file_name, error = %e, "Store append failed");
                    result.failed.push(FileFailure {
                        file_name: record.file_name.clone(),
                        kind: FileErrorKind::StorageFailure(e.to_string()),
                    });
                }
            }
        }

        info!(
            session_id = %batch.session_id,
            succeeded = result.succeeded.len(),
            failed = result.failed.len(),
            "Batch complete"
        );

        Ok(result)
    }
}
