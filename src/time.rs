#[cfg(not(test))]
use chrono::Local;

#[cfg(test)]
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(test)]
static MOCK_TIME: AtomicU64 = AtomicU64::new(1_700_000_000);

/// Returns the current unix timestamp in seconds.
///
/// In tests this reads a process-wide mock clock so records created in
/// sequence get deterministic, strictly ordered timestamps.
#[cfg(not(test))]
pub fn current_timestamp() -> u64 {
    Local::now().timestamp() as u64
}

#[cfg(test)]
pub fn current_timestamp() -> u64 {
    MOCK_TIME.load(Ordering::SeqCst)
}

#[cfg(test)]
pub fn advance_mock_time(secs: u64) {
    MOCK_TIME.fetch_add(secs, Ordering::SeqCst);
}
