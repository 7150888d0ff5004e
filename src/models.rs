//! Persistence-facing domain records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable metadata for one processed audio file.
///
/// Immutable once built. After `MetadataStore::append` succeeds the store
/// owns the row; the pipeline never mutates a stored record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Row identity, assigned at build time. Re-processing the same batch
    /// produces fresh guids, so storage accumulates instead of upserting.
    pub guid: Uuid,
    /// Caller-supplied grouping key; not unique across batches
    pub session_id: String,
    /// Submitted file name; not required unique within a batch
    pub file_name: String,
    /// Playback length in seconds, exactly as the probe reported it
    pub length_seconds: f64,
    /// Stamped when duration extraction succeeded; non-decreasing within a batch
    pub processed_at: DateTime<Utc>,
}

impl MetadataRecord {
    /// Build a record for a freshly measured file
    pub fn new(
        session_id: String,
        file_name: String,
        length_seconds: f64,
        processed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            guid: Uuid::new_v4(),
            session_id,
            file_name,
            length_seconds,
            processed_at,
        }
    }
}
