use crate::{
    bucket_key::Granularity,
    time::{start_of_day, to_calendar},
    Timestamp,
};
use chrono::{Days, FixedOffset};
use serde::Serialize;

/// Time range of a stats query.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Range {
    /// Today so far, in hourly buckets
    #[default]
    Day,

    /// The last 7 calendar days including today, in daily buckets
    Week,
}

/// Time bounds (both inclusive) and bucket width resolved from a [`Range`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Window {
    /// Earliest timestamp to scan
    pub start: Timestamp,

    /// Latest timestamp to scan
    pub end: Timestamp,

    /// Bucket width
    pub granularity: Granularity,
}

impl Range {
    /// Parses a range token.
    ///
    /// Anything other than `day` or `week` falls back to [`Range::Day`],
    /// so an unknown token can never widen the scan to the whole history.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "day" => Self::Day,
            "week" => Self::Week,
            _ => {
                log::debug!("Unknown range {token:?}, falling back to {}", Self::Day);
                Self::Day
            }
        }
    }

    /// Number of calendar days before today that the window reaches back.
    fn days_back(self) -> u64 {
        match self {
            Self::Day => 0,
            Self::Week => 6,
        }
    }

    /// Bucket width used for this range.
    #[must_use]
    pub fn granularity(self) -> Granularity {
        match self {
            Self::Day => Granularity::Hour,
            Self::Week => Granularity::Day,
        }
    }

    /// Resolves the window ending at `now`, on the calendar of `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if `now` cannot be represented as a calendar date.
    pub fn resolve(self, now: Timestamp, offset: FixedOffset) -> crate::Result<Window> {
        let today = to_calendar(now, offset)?.date_naive();

        let first_day = today
            .checked_sub_days(Days::new(self.days_back()))
            .ok_or(crate::Error::TimestampOutOfRange)?;

        Ok(Window {
            start: start_of_day(first_day, offset)?,
            end: now,
            granularity: self.granularity(),
        })
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day => write!(f, "day"),
            Self::Week => write!(f, "week"),
        }
    }
}
