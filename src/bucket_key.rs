use crate::{time::to_calendar, Timestamp};
use chrono::{Datelike, FixedOffset, Timelike};
use serde::Serialize;

/// Width of a bucket on the calendar.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// One bucket per calendar hour
    Hour,

    /// One bucket per calendar day
    Day,
}

/// Identity of a bucket: a timestamp truncated to its granularity.
///
/// Field order defines the ordering, so sorting keys sorts them chronologically.
/// `hour` is `None` for daily buckets.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct BucketKey {
    /// Calendar year
    #[serde(rename = "y")]
    pub year: i32,

    /// Month (1-12)
    #[serde(rename = "m")]
    pub month: u32,

    /// Day of month (1-31)
    #[serde(rename = "d")]
    pub day: u32,

    /// Hour of day (0-23), only for hourly buckets
    #[serde(rename = "h", skip_serializing_if = "Option::is_none")]
    pub hour: Option<u32>,
}

impl BucketKey {
    /// Truncates `ts` to the bucket it falls into, on the calendar of `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timestamp cannot be represented as a calendar date.
    pub fn new(ts: Timestamp, granularity: Granularity, offset: FixedOffset) -> crate::Result<Self> {
        let dt = to_calendar(ts, offset)?;

        Ok(Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: match granularity {
                Granularity::Hour => Some(dt.hour()),
                Granularity::Day => None,
            },
        })
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)?;

        if let Some(hour) = self.hour {
            write!(f, "T{hour:02}")?;
        }

        Ok(())
    }
}
