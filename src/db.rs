use crate::{
    db_builder::Builder,
    reading::NewReading,
    stats::{Stats, StatsOptions},
    store::ReadingLog,
    time::timestamp,
    OwnerId, Reading, Timestamp,
};
use fjall::TxKeyspace;
use std::path::Path;

/// An embeddable temperature log
///
/// `Send + Sync`, so it can be shared by reference across threads;
/// stats queries hold no state between calls.
pub struct Database {
    keyspace: TxKeyspace,

    log: ReadingLog,

    options: StatsOptions,
}

impl Database {
    /// Creates a new database builder to create or open a temperature log.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Opens a temperature log in the given directory, using UTC day boundaries.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn new<P: AsRef<Path>>(path: P, cache_size_mib: u64) -> crate::Result<Self> {
        Self::builder().cache_size_mib(cache_size_mib).open(path)
    }

    pub(crate) fn from_keyspace(keyspace: TxKeyspace, options: StatsOptions) -> crate::Result<Self> {
        let log = ReadingLog::new(&keyspace)?;

        log::debug!(
            "Opened temperature log (UTC offset: {}, scan limit: {})",
            options.offset,
            options.scan_limit,
        );

        Ok(Self {
            keyspace,
            log,
            options,
        })
    }

    /// Appends a reading to the owner's log.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NonFiniteValue`] if the value is NaN or infinite,
    /// or an error if an I/O error occurred.
    pub fn append(&self, owner: &OwnerId, reading: NewReading) -> crate::Result<Reading> {
        self.log.append(owner, reading, timestamp())
    }

    /// Flushes all appended readings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn persist(&self) -> crate::Result<()> {
        self.keyspace.persist(fjall::PersistMode::SyncAll)?;
        Ok(())
    }

    /// Returns up to `limit` of the owner's readings, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn list(&self, owner: &OwnerId, limit: usize) -> crate::Result<Vec<Reading>> {
        self.log.list(owner, limit)
    }

    /// Computes the owner's statistics for a range (`day` or `week`) up to now.
    ///
    /// Unknown range tokens fall back to `day`.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the scan limit was exceeded.
    pub fn aggregate(&self, owner: &OwnerId, range: &str) -> crate::Result<Stats> {
        self.aggregate_at(owner, range, timestamp())
    }

    /// Computes the owner's statistics for a range, as seen at `now`.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the scan limit was exceeded.
    pub fn aggregate_at(&self, owner: &OwnerId, range: &str, now: Timestamp) -> crate::Result<Stats> {
        Stats::compute(&self.log, owner, range, now, &self.options)
    }
}
