use crate::{agg::DEFAULT_SCAN_LIMIT, stats::StatsOptions, Database};
use chrono::FixedOffset;
use fjall::{BlockCache, TxKeyspace};
use std::{path::Path, sync::Arc};

/// Builder for [`Database`].
pub struct Builder {
    cache_size_mib: u64,
    utc_offset_minutes: i32,
    scan_limit: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            cache_size_mib: 64,
            utc_offset_minutes: 0,
            scan_limit: DEFAULT_SCAN_LIMIT,
        }
    }

    /// Sets the cache size in MiB.
    ///
    /// Default = 64 MiB
    #[must_use]
    pub fn cache_size_mib(mut self, mib: u64) -> Self {
        self.cache_size_mib = mib;
        self
    }

    /// Sets the fixed UTC offset, in minutes east of UTC, that day and hour
    /// boundaries are computed in.
    ///
    /// Default = 0 (UTC)
    #[must_use]
    pub fn utc_offset_minutes(mut self, minutes: i32) -> Self {
        self.utc_offset_minutes = minutes;
        self
    }

    /// Sets the maximum number of readings scanned by a single stats query.
    ///
    /// Queries that would scan more fail instead of returning partial results.
    ///
    /// Default = 1 million
    #[must_use]
    pub fn scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    fn stats_options(&self) -> crate::Result<StatsOptions> {
        let offset = self
            .utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or(crate::Error::InvalidOffset)?;

        Ok(StatsOptions {
            offset,
            scan_limit: self.scan_limit,
        })
    }

    /// Opens or recovers a temperature log.
    ///
    /// If you have a keyspace already in your application, you may
    /// want to use `open_in_keyspace` instead.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the UTC offset is out of range.
    pub fn open<P: AsRef<Path>>(self, path: P) -> crate::Result<crate::Database> {
        let options = self.stats_options()?;

        let keyspace = fjall::Config::new(path)
            .block_cache(Arc::new(BlockCache::with_capacity_bytes(
                self.cache_size_mib * 1_024 * 1_024,
            )))
            .open_transactional()?;

        Database::from_keyspace(keyspace, options)
    }

    /// Uses an existing `fjall` keyspace to open a temperature log.
    ///
    /// Partitions are prefixed with `_templog#` to avoid name clashes with other applications.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or the UTC offset is out of range.
    pub fn open_in_keyspace(self, keyspace: TxKeyspace) -> crate::Result<crate::Database> {
        Database::from_keyspace(keyspace, self.stats_options()?)
    }
}
