use super::BucketAccumulator;
use crate::{
    bucket_key::{BucketKey, Granularity},
    Reading,
};
use chrono::FixedOffset;

/// Default upper bound of readings folded in one pass.
pub const DEFAULT_SCAN_LIMIT: usize = 1_000_000;

/// Folds readings into per-bucket accumulators.
///
/// Readings may arrive in any order; the resulting buckets are the same.
/// The input is expected to contain a single owner's readings only.
#[derive(Copy, Clone, Debug)]
pub struct Aggregator {
    /// Bucket width
    granularity: Granularity,

    /// Calendar the buckets are aligned to
    offset: FixedOffset,

    /// Maximum number of readings to fold before giving up
    scan_limit: usize,
}

impl Aggregator {
    /// Creates an aggregator for the given bucket width and calendar.
    #[must_use]
    pub fn new(granularity: Granularity, offset: FixedOffset) -> Self {
        Self {
            granularity,
            offset,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Sets the maximum number of readings to fold.
    ///
    /// Default = 1 million
    #[must_use]
    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    /// Consumes a stream of readings.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by the stream, [`crate::Error::NonFiniteValue`]
    /// for a NaN or infinite reading, or an error if the scan limit is exceeded.
    /// No partial result is returned in any case.
    pub fn fold<I>(&self, readings: I) -> crate::Result<crate::HashMap<BucketKey, BucketAccumulator>>
    where
        I: IntoIterator<Item = crate::Result<Reading>>,
    {
        let mut buckets: crate::HashMap<BucketKey, BucketAccumulator> = crate::HashMap::default();
        let mut scanned = 0;

        for reading in readings {
            let reading = reading?;

            scanned += 1;
            if scanned > self.scan_limit {
                log::warn!(
                    "Aborting aggregation for {}: more than {} readings in window",
                    reading.owner,
                    self.scan_limit,
                );
                return Err(crate::Error::ScanLimitExceeded);
            }

            if !reading.value_celsius.is_finite() {
                return Err(crate::Error::NonFiniteValue);
            }

            let key = BucketKey::new(reading.recorded_at, self.granularity, self.offset)?;

            buckets
                .entry(key)
                .and_modify(|bucket| bucket.push(reading.value_celsius))
                .or_insert_with(|| BucketAccumulator::new(key, reading.value_celsius));
        }

        log::trace!("Folded {scanned} readings into {} buckets", buckets.len());

        Ok(buckets)
    }
}
