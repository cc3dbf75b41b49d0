use crate::Timestamp;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

const NANOS_PER_SECOND: u128 = 1_000_000_000;

/// Returns the current timestamp in nanoseconds.
#[must_use]
#[allow(clippy::expect_used)]
pub fn timestamp() -> Timestamp {
    let start = SystemTime::now();
    let since_the_epoch = start
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards");

    since_the_epoch.as_nanos()
}

/// Converts a nanosecond timestamp into a UTC date time.
pub(crate) fn to_utc(ts: Timestamp) -> crate::Result<DateTime<Utc>> {
    let secs = i64::try_from(ts / NANOS_PER_SECOND).map_err(|_| crate::Error::TimestampOutOfRange)?;

    #[allow(clippy::cast_possible_truncation)]
    let nanos = (ts % NANOS_PER_SECOND) as u32;

    DateTime::<Utc>::from_timestamp(secs, nanos).ok_or(crate::Error::TimestampOutOfRange)
}

/// Maps a nanosecond timestamp onto the calendar at the given offset.
pub(crate) fn to_calendar(ts: Timestamp, offset: FixedOffset) -> crate::Result<DateTime<FixedOffset>> {
    to_utc(ts).map(|dt| dt.with_timezone(&offset))
}

/// Returns the timestamp of 00:00:00 on `date` at the given offset.
///
/// Midnights before the Unix epoch saturate to 0.
pub(crate) fn start_of_day(date: NaiveDate, offset: FixedOffset) -> crate::Result<Timestamp> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(offset).single())
        .ok_or(crate::Error::TimestampOutOfRange)?;

    Ok(u128::try_from(midnight.timestamp()).map_or(0, |secs| secs * NANOS_PER_SECOND))
}
