mod accumulator;
mod assemble;
mod stream;
mod sum;

pub use accumulator::BucketAccumulator;
pub use assemble::assemble;
pub use stream::{Aggregator, DEFAULT_SCAN_LIMIT};
pub use sum::ExactSum;

use crate::{bucket_key::BucketKey, Value};
use serde::Serialize;

/// Statistics of all readings that fell into one bucket.
///
/// `count` is at least 1 and `min <= avg <= max`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct BucketSummary {
    /// Which bucket this is
    pub key: BucketKey,

    /// Arithmetic mean
    pub avg: Value,

    /// Lowest reading
    pub min: Value,

    /// Highest reading
    pub max: Value,

    /// Number of readings
    pub count: usize,
}
