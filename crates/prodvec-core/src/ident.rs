//! Time-ordered record identifiers.

use chrono::{DateTime, Utc};
use uuid::{NoContext, Timestamp, Uuid};

/// Build a UUID v7 whose timestamp is `at`.
///
/// The 48-bit millisecond prefix sorts ids chronologically; the remaining
/// bits are random, so ids minted in the same millisecond still differ.
/// Instants before the Unix epoch are clamped to it.
pub fn time_ordered_id(at: DateTime<Utc>) -> Uuid {
    let seconds = u64::try_from(at.timestamp()).unwrap_or(0);
    let nanos = at.timestamp_subsec_nanos();
    Uuid::new_v7(Timestamp::from_unix(NoContext, seconds, nanos))
}
