use crate::{OwnerId, Timestamp, Value};

/// Identifier of a stored reading.
pub type ReadingId = u64;

/// A single immutable temperature observation belonging to one owner.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    /// Sequence number assigned on append
    pub id: ReadingId,

    /// Account that logged the reading
    pub owner: OwnerId,

    /// Temperature in degrees Celsius, always finite
    pub value_celsius: Value,

    /// Free text, empty if none was given
    pub note: String,

    /// When the reading was taken, in nanoseconds since the Unix epoch
    pub recorded_at: Timestamp,
}

/// A reading to append to the log.
#[derive(Clone, Debug, Default)]
pub struct NewReading {
    pub(crate) value_celsius: Value,
    pub(crate) note: Option<String>,
    pub(crate) recorded_at: Option<Timestamp>,
}

impl NewReading {
    /// Creates a reading taken now, without a note.
    #[must_use]
    pub fn new(value_celsius: Value) -> Self {
        Self {
            value_celsius,
            ..Default::default()
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn note<S: Into<String>>(mut self, note: S) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the time the reading was taken.
    ///
    /// Default = time of the append
    #[must_use]
    pub fn recorded_at(mut self, ts: Timestamp) -> Self {
        self.recorded_at = Some(ts);
        self
    }
}
