use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Hands out receipt timestamps that never repeat or go backwards.
///
/// Wall-clock milliseconds are used while they move forward; if the clock
/// stalls or steps back, the previous value plus one millisecond is used.
#[derive(Debug, Default)]
pub struct ReceiptClock {
    last_millis: AtomicI64,
}

impl ReceiptClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let wall = Utc::now().timestamp_millis();
        let previous = self
            .last_millis
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(wall.max(last + 1))
            })
            .unwrap_or_else(|last| last);
        let assigned = wall.max(previous + 1);
        DateTime::from_timestamp_millis(assigned).unwrap_or_else(Utc::now)
    }
}
