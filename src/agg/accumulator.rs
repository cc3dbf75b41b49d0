use super::{sum::ExactSum, BucketSummary};
use crate::{bucket_key::BucketKey, Value};

/// 2^64, the headroom kept below `Value::MAX` while summing
///
/// Values are summed scaled down by this power of two, so no number of finite
/// readings a `usize` can count overflows the sum. Scaling is exact for any
/// magnitude above 2^-958.
const HEADROOM: Value = 18_446_744_073_709_551_616.0;

/// Running sum, count, min and max of one bucket.
///
/// Only lives for the duration of a single aggregation pass.
#[derive(Clone, Debug, PartialEq)]
pub struct BucketAccumulator {
    /// Which bucket this is
    pub key: BucketKey,

    /// Sum of all values divided by [`HEADROOM`]
    scaled_sum: ExactSum,

    /// Number of values
    pub count: usize,

    /// Lowest value
    pub min: Value,

    /// Highest value
    pub max: Value,
}

impl BucketAccumulator {
    /// Starts a bucket with its first value.
    #[must_use]
    pub fn new(key: BucketKey, value: Value) -> Self {
        let mut scaled_sum = ExactSum::default();
        scaled_sum.add(value / HEADROOM);

        Self {
            key,
            scaled_sum,
            count: 1,
            min: value,
            max: value,
        }
    }

    /// Folds another value into the bucket.
    pub fn push(&mut self, value: Value) {
        self.scaled_sum.add(value / HEADROOM);
        self.count += 1;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Sum of all values, correctly rounded.
    ///
    /// Infinite if the sum exceeds the range of [`Value`].
    #[must_use]
    pub fn sum(&self) -> Value {
        self.scaled_sum.value() * HEADROOM
    }

    /// Derives the published summary.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn finish(&self) -> BucketSummary {
        let avg = self.scaled_sum.value() / self.count as Value * HEADROOM;

        // NOTE: sum / count may round just outside [min, max]
        let avg = if self.min <= self.max {
            avg.clamp(self.min, self.max)
        } else {
            avg
        };

        BucketSummary {
            key: self.key,
            avg,
            min: self.min,
            max: self.max,
            count: self.count,
        }
    }
}
