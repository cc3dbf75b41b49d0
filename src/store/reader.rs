use super::{
    key::{ReadingKey, ReadingValue},
    ReadingStream,
};
use crate::{OwnerId, Reading};
use fjall::{ReadTransaction, TxPartition};
use self_cell::self_cell;

/// A read snapshot, pinned for as long as a reader iterates over it.
pub struct Snapshot {
    pub(crate) tx: ReadTransaction,
    pub(crate) partition: TxPartition,
}

self_cell!(
    /// Iterates over one owner's readings in a consistent snapshot.
    pub struct Reader {
        owner: Snapshot,

        #[covariant]
        dependent: ReadingStream,
    }
);

impl Iterator for Reader {
    type Item = crate::Result<Reading>;

    fn next(&mut self) -> Option<Self::Item> {
        self.with_dependent_mut(|_, iter| iter.next())
    }
}

/// Decodes a stored key-value pair of `owner` into a reading.
pub(crate) fn decode(owner: &OwnerId, key: &[u8], value: &[u8]) -> crate::Result<Reading> {
    let (recorded_at, id) = ReadingKey::parse(owner, key)?;
    let (value_celsius, note) = ReadingValue::parse(value)?;

    Ok(Reading {
        id,
        owner: owner.clone(),
        value_celsius,
        note,
        recorded_at,
    })
}
