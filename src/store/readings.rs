use super::{
    key::{ReadingKey, ReadingValue},
    reader::{decode, Reader, Snapshot},
    LogStore, ReadingStream,
};
use crate::{reading::NewReading, OwnerId, Reading, ReadingId, Timestamp};
use byteorder::{BigEndian, ReadBytesExt};
use fjall::{CompressionType, PartitionCreateOptions, TxKeyspace, TxPartition};
use std::ops::RangeInclusive;

const READINGS_PARTITION: &str = "_templog#v1#readings";
const META_PARTITION: &str = "_templog#v1#meta";

const SEQUENCE_KEY: &str = "seq";

/// Append-only log of readings, keyed by owner and time
pub struct ReadingLog {
    keyspace: TxKeyspace,
    readings: TxPartition,
    meta: TxPartition,
}

impl ReadingLog {
    /// Opens the log's partitions in `keyspace`, creating them if needed.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn new(keyspace: &TxKeyspace) -> crate::Result<Self> {
        let opts = PartitionCreateOptions::default()
            .block_size(4_096)
            .compression(CompressionType::Lz4)
            .max_memtable_size(8_000_000);

        let readings = keyspace.open_partition(READINGS_PARTITION, opts)?;
        let meta = keyspace.open_partition(META_PARTITION, PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace: keyspace.clone(),
            readings,
            meta,
        })
    }

    /// Stores a reading, allocating its ID in the same transaction.
    ///
    /// A missing timestamp defaults to `now`, a missing note to an empty string.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not finite, or an I/O error occurred.
    pub fn append(&self, owner: &OwnerId, reading: NewReading, now: Timestamp) -> crate::Result<Reading> {
        if !reading.value_celsius.is_finite() {
            return Err(crate::Error::NonFiniteValue);
        }

        let recorded_at = reading.recorded_at.unwrap_or(now);
        let note = reading.note.unwrap_or_default();

        let mut tx = self.keyspace.write_tx();

        let id: ReadingId = match tx.get(&self.meta, SEQUENCE_KEY)? {
            Some(bytes) => {
                let mut reader: &[u8] = &bytes;
                reader
                    .read_u64::<BigEndian>()
                    .map_err(|_| crate::Error::Corrupt)?
                    + 1
            }
            None => 0,
        };

        tx.insert(&self.meta, SEQUENCE_KEY, id.to_be_bytes());
        tx.insert(
            &self.readings,
            ReadingKey::format(owner, recorded_at, id),
            ReadingValue::format(reading.value_celsius, &note),
        );

        tx.commit()?;

        log::trace!("appended reading {id} of {owner} at {recorded_at}");

        Ok(Reading {
            id,
            owner: owner.clone(),
            value_celsius: reading.value_celsius,
            note,
            recorded_at,
        })
    }

    /// Returns up to `limit` readings of `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred, or a stored reading is corrupt.
    pub fn list(&self, owner: &OwnerId, limit: usize) -> crate::Result<Vec<Reading>> {
        let range = ReadingKey::lower_bound(owner, Timestamp::MIN)
            ..=ReadingKey::upper_bound(owner, Timestamp::MAX);

        self.scan(owner, range, true).take(limit).collect()
    }

    fn scan(&self, owner: &OwnerId, range: RangeInclusive<Vec<u8>>, newest_first: bool) -> Reader {
        let snapshot = Snapshot {
            tx: self.keyspace.read_tx(),
            partition: self.readings.clone(),
        };

        let owner = owner.clone();

        Reader::new(snapshot, move |snapshot| {
            let iter = snapshot.tx.range(&snapshot.partition, range);

            let readings: ReadingStream<'_> = if newest_first {
                Box::new(iter.rev().map(move |kv| -> crate::Result<Reading> {
                    let (key, value) = kv?;
                    decode(&owner, &key, &value)
                }))
            } else {
                Box::new(iter.map(move |kv| -> crate::Result<Reading> {
                    let (key, value) = kv?;
                    decode(&owner, &key, &value)
                }))
            };

            readings
        })
    }
}

impl LogStore for ReadingLog {
    fn query(&self, owner: &OwnerId, start: Timestamp, end: Timestamp) -> crate::Result<ReadingStream<'_>> {
        if start > end {
            return Ok(Box::new(std::iter::empty()));
        }

        log::debug!("Scanning readings of {owner} in [{start}..={end}]");

        let range = ReadingKey::lower_bound(owner, start)..=ReadingKey::upper_bound(owner, end);

        Ok(Box::new(self.scan(owner, range, false)))
    }
}
