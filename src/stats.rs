use crate::{
    agg::{assemble, Aggregator, BucketSummary, DEFAULT_SCAN_LIMIT},
    range::Range,
    store::LogStore,
    time::to_utc,
    OwnerId, Timestamp,
};
use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

/// Calendar and resource policy applied to every stats query.
#[derive(Copy, Clone, Debug)]
pub struct StatsOptions {
    /// Fixed UTC offset that windows and buckets are aligned to
    pub offset: FixedOffset,

    /// Maximum number of readings folded per query
    pub scan_limit: usize,
}

impl Default for StatsOptions {
    #[allow(clippy::unwrap_used)]
    fn default() -> Self {
        Self {
            // NOTE: 0 is always a valid offset
            offset: FixedOffset::east_opt(0).unwrap(),
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }
}

/// Per-bucket statistics of one owner's readings over a range.
///
/// Serializes as `{"range": "day", "start": "...", "buckets": [...]}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    /// Range the statistics cover
    pub range: Range,

    /// Start of the window (inclusive)
    pub start: DateTime<Utc>,

    /// Buckets in chronological order; empty if there were no readings
    pub buckets: Vec<BucketSummary>,
}

impl Stats {
    /// Aggregates the readings of `owner` in the window of `range_token` ending at `now`.
    ///
    /// Unknown range tokens fall back to `day`.
    ///
    /// # Errors
    ///
    /// Returns error if the store failed, the scan limit was exceeded,
    /// or `now` is outside the supported calendar.
    pub fn compute<S: LogStore + ?Sized>(
        store: &S,
        owner: &OwnerId,
        range_token: &str,
        now: Timestamp,
        options: &StatsOptions,
    ) -> crate::Result<Self> {
        let range = Range::from_token(range_token);
        let window = range.resolve(now, options.offset)?;

        log::debug!(
            "Aggregating {range} stats for {owner} over [{}..={}]",
            window.start,
            window.end
        );

        let readings = store.query(owner, window.start, window.end)?;

        let buckets = Aggregator::new(window.granularity, options.offset)
            .scan_limit(options.scan_limit)
            .fold(readings)?;

        Ok(Self {
            range,
            start: to_utc(window.start)?,
            buckets: assemble(buckets),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::Reading;

    const SECOND: u128 = 1_000_000_000;
    const HOUR: u128 = 3_600 * SECOND;
    const DAY: u128 = 24 * HOUR;

    // 2024-10-04T00:00:00Z
    const OCT_4: u128 = 1_728_000_000 * SECOND;

    fn reading(id: u64, owner: &str, value_celsius: f64, recorded_at: Timestamp) -> Reading {
        Reading {
            id,
            owner: OwnerId::try_from(owner).unwrap(),
            value_celsius,
            note: String::new(),
            recorded_at,
        }
    }

    fn alice() -> OwnerId {
        OwnerId::try_from("alice").unwrap()
    }

    #[test_log::test]
    fn stats_day_hourly_buckets() -> crate::Result<()> {
        let readings = vec![
            reading(0, "alice", 36.5, OCT_4 + 8 * HOUR + 10 * SECOND),
            reading(1, "alice", 36.6, OCT_4 + 9 * HOUR + 15 * 60 * SECOND),
            reading(2, "alice", 37.0, OCT_4 + 9 * HOUR + 45 * 60 * SECOND),
            reading(3, "alice", 36.9, OCT_4 + 10 * HOUR),
            reading(4, "alice", 37.1, OCT_4 + 10 * HOUR + 60 * SECOND),
            reading(5, "alice", 37.3, OCT_4 + 10 * HOUR + 120 * SECOND),
            reading(6, "alice", 36.7, OCT_4 + 10 * HOUR + 180 * SECOND),
        ];

        let now = OCT_4 + 12 * HOUR;
        let stats = Stats::compute(readings.as_slice(), &alice(), "day", now, &StatsOptions::default())?;

        assert_eq!(Range::Day, stats.range);
        assert_eq!(to_utc(OCT_4)?, stats.start);
        assert_eq!(3, stats.buckets.len());

        let eight = stats.buckets.first().unwrap();
        assert_eq!(Some(8), eight.key.hour);
        assert_eq!((36.5, 36.5, 36.5, 1), (eight.avg, eight.min, eight.max, eight.count));

        let nine = stats.buckets.get(1).unwrap();
        assert_eq!(Some(9), nine.key.hour);
        assert_eq!((36.8, 36.6, 37.0, 2), (nine.avg, nine.min, nine.max, nine.count));

        let ten = stats.buckets.get(2).unwrap();
        assert_eq!(Some(10), ten.key.hour);
        assert_eq!((36.7, 37.3, 4), (ten.min, ten.max, ten.count));
        assert!((ten.avg - 37.0).abs() < 1e-9);

        Ok(())
    }

    #[test_log::test]
    fn stats_empty_window() -> crate::Result<()> {
        let readings = vec![reading(0, "alice", 36.5, OCT_4 - HOUR)];

        let stats = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + HOUR, &StatsOptions::default())?;
        assert!(stats.buckets.is_empty());

        Ok(())
    }

    #[test_log::test]
    fn stats_window_start_is_inclusive() -> crate::Result<()> {
        let readings = vec![
            reading(0, "alice", 30.0, OCT_4 - 1),
            reading(1, "alice", 36.5, OCT_4),
        ];

        let stats = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + HOUR, &StatsOptions::default())?;

        assert_eq!(1, stats.buckets.len());
        assert_eq!(36.5, stats.buckets.first().unwrap().min);

        Ok(())
    }

    #[test_log::test]
    fn stats_week_daily_buckets() -> crate::Result<()> {
        let now = OCT_4 + 20 * HOUR;

        let readings = vec![
            // outside: one nanosecond before Sep 28
            reading(0, "alice", 30.0, OCT_4 - 6 * DAY - 1),
            reading(1, "alice", 36.1, OCT_4 - 6 * DAY),
            reading(2, "alice", 36.3, OCT_4 - 6 * DAY + 23 * HOUR),
            reading(3, "alice", 36.9, OCT_4 - 2 * DAY + 12 * HOUR),
            reading(4, "alice", 37.4, OCT_4 + 19 * HOUR),
        ];

        let stats = Stats::compute(readings.as_slice(), &alice(), "week", now, &StatsOptions::default())?;

        assert_eq!(Range::Week, stats.range);
        assert_eq!(to_utc(OCT_4 - 6 * DAY)?, stats.start);
        assert_eq!(3, stats.buckets.len());
        assert!(stats.buckets.iter().all(|b| b.key.hour.is_none()));

        assert_eq!(
            vec![(9, 28), (10, 2), (10, 4)],
            stats
                .buckets
                .iter()
                .map(|b| (b.key.month, b.key.day))
                .collect::<Vec<_>>()
        );
        assert_eq!(2, stats.buckets.first().unwrap().count);
        assert_eq!(4, stats.buckets.iter().map(|b| b.count).sum::<usize>());

        Ok(())
    }

    #[test_log::test]
    fn stats_unknown_range_behaves_like_day() -> crate::Result<()> {
        let readings = vec![
            reading(0, "alice", 36.5, OCT_4 - DAY),
            reading(1, "alice", 36.6, OCT_4 + HOUR),
        ];
        let now = OCT_4 + 2 * HOUR;

        let day = Stats::compute(readings.as_slice(), &alice(), "day", now, &StatsOptions::default())?;

        for token in ["", "month", "all"] {
            let fallback = Stats::compute(readings.as_slice(), &alice(), token, now, &StatsOptions::default())?;
            assert_eq!(day, fallback);
        }

        Ok(())
    }

    #[test_log::test]
    fn stats_never_mix_owners() -> crate::Result<()> {
        let readings = vec![
            reading(0, "alice", 36.5, OCT_4 + HOUR),
            reading(1, "bob", 40.0, OCT_4 + HOUR),
            reading(2, "bob", 20.0, OCT_4 + 2 * HOUR),
        ];

        let stats = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + 3 * HOUR, &StatsOptions::default())?;

        assert_eq!(1, stats.buckets.len());
        let bucket = stats.buckets.first().unwrap();
        assert_eq!((36.5, 36.5, 1), (bucket.min, bucket.max, bucket.count));

        Ok(())
    }

    #[test_log::test]
    fn stats_fixed_offset() -> crate::Result<()> {
        // 22:30Z on Oct 3 is 00:30 on Oct 4 at +02:00
        let readings = vec![
            reading(0, "alice", 36.5, OCT_4 - 90 * 60 * SECOND),
            reading(1, "alice", 36.0, OCT_4 - 3 * HOUR),
        ];

        let options = StatsOptions {
            offset: FixedOffset::east_opt(2 * 3_600).unwrap(),
            ..Default::default()
        };

        let stats = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4, &options)?;

        assert_eq!(to_utc(OCT_4 - 2 * HOUR)?, stats.start);
        assert_eq!(1, stats.buckets.len());

        let bucket = stats.buckets.first().unwrap();
        assert_eq!((4, Some(0)), (bucket.key.day, bucket.key.hour));
        assert_eq!(36.5, bucket.avg);

        Ok(())
    }

    #[test_log::test]
    fn stats_scan_limit() {
        let readings = (0..5)
            .map(|id| reading(id, "alice", 36.6, OCT_4 + u128::from(id) * SECOND))
            .collect::<Vec<_>>();

        let options = StatsOptions {
            scan_limit: 4,
            ..Default::default()
        };

        let result = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + HOUR, &options);
        assert!(matches!(result, Err(crate::Error::ScanLimitExceeded)));
    }

    #[test_log::test]
    fn stats_non_finite_reading_is_rejected() {
        let readings = vec![
            reading(0, "alice", 36.5, OCT_4 + 8 * HOUR),
            reading(1, "alice", f64::NAN, OCT_4 + 8 * HOUR + SECOND),
        ];

        let result = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + 9 * HOUR, &StatsOptions::default());
        assert!(matches!(result, Err(crate::Error::NonFiniteValue)));
    }

    #[test_log::test]
    fn stats_json_shape() -> crate::Result<()> {
        let readings = vec![reading(0, "alice", 36.5, OCT_4 + 8 * HOUR)];

        let stats = Stats::compute(readings.as_slice(), &alice(), "day", OCT_4 + 9 * HOUR, &StatsOptions::default())?;

        assert_eq!(
            serde_json::json!({
                "range": "day",
                "start": "2024-10-04T00:00:00Z",
                "buckets": [
                    {
                        "key": { "y": 2024, "m": 10, "d": 4, "h": 8 },
                        "avg": 36.5,
                        "min": 36.5,
                        "max": 36.5,
                        "count": 1
                    }
                ]
            }),
            serde_json::to_value(&stats).unwrap(),
        );

        Ok(())
    }
}
