mod key;
mod reader;
mod readings;

pub use readings::ReadingLog;

use crate::{OwnerId, Reading, Timestamp};

/// Stream of readings returned by a [`LogStore`].
pub type ReadingStream<'a> = Box<dyn Iterator<Item = crate::Result<Reading>> + 'a>;

/// Source of raw readings for the aggregation engine.
///
/// Implementations must only yield readings of `owner` whose `recorded_at`
/// lies in `[start, end]` (both inclusive). Order is not significant.
/// A reading with a non-finite value is yielded as [`crate::Error::NonFiniteValue`].
pub trait LogStore {
    /// Returns the readings of `owner` taken between `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store could not be read.
    fn query(&self, owner: &OwnerId, start: Timestamp, end: Timestamp) -> crate::Result<ReadingStream<'_>>;
}

/// In-memory store, filtering a slice of readings of possibly many owners.
impl LogStore for [Reading] {
    fn query(&self, owner: &OwnerId, start: Timestamp, end: Timestamp) -> crate::Result<ReadingStream<'_>> {
        let owner = owner.clone();

        Ok(Box::new(
            self.iter()
                .filter(move |r| r.owner == owner && (start..=end).contains(&r.recorded_at))
                .map(|r| {
                    if r.value_celsius.is_finite() {
                        Ok(r.clone())
                    } else {
                        Err(crate::Error::NonFiniteValue)
                    }
                }),
        ))
    }
}
