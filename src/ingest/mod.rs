//! Ingestion pipeline: decode, probe, persist
//!
//! The modules here are the core of the service. Everything is built
//! around independent per-file outcomes: a batch never fails as a unit
//! once it passes the empty-batch check.

pub mod decoder;
pub mod probe;
pub mod processor;
pub mod types;

pub use probe::{DurationProbe, SymphoniaProbe};
pub use processor::BatchProcessor;
pub use types::{
    BatchError, BatchResult, BatchStatus, FileErrorKind, FileFailure, FileSubmission, UploadBatch,
};
