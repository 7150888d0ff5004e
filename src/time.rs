//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Time source injected into the batch pipeline.
///
/// Production uses [`SystemClock`]; tests substitute scripted clocks to
/// exercise timestamp ordering without sleeping.
pub trait Clock: Send + Sync {
    /// Current UTC timestamp
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
