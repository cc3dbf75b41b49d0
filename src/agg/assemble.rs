use super::{BucketAccumulator, BucketSummary};
use crate::bucket_key::BucketKey;

/// Turns accumulators into summaries, sorted chronologically by bucket key.
#[must_use]
pub fn assemble(buckets: crate::HashMap<BucketKey, BucketAccumulator>) -> Vec<BucketSummary> {
    let mut summaries = buckets
        .into_values()
        .map(|bucket| bucket.finish())
        .collect::<Vec<_>>();

    // NOTE: Keys are unique, so an unstable sort is deterministic
    summaries.sort_unstable_by_key(|summary| summary.key);

    summaries
}
