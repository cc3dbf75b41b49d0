use crate::{reading::ReadingId, OwnerId, Timestamp, Value};
use byteorder::{BigEndian, ReadBytesExt};

/// Separates the owner from the rest of the key
///
/// Not part of the owner alphabet, so owner key ranges never overlap.
const SEPARATOR: u8 = b'#';

const SUFFIX_LEN: usize = std::mem::size_of::<Timestamp>() + std::mem::size_of::<ReadingId>();

/// Storage key of a reading: `owner # recorded_at id`.
///
/// Timestamp and ID are big endian, so one owner's readings sort chronologically.
pub struct ReadingKey;

impl ReadingKey {
    /// Formats the key of a reading.
    #[must_use]
    pub fn format(owner: &OwnerId, ts: Timestamp, id: ReadingId) -> Vec<u8> {
        let mut key = Self::allocate(owner);
        key.extend_from_slice(&ts.to_be_bytes());
        key.extend_from_slice(&id.to_be_bytes());
        key
    }

    /// Smallest key of any reading of `owner` taken at `ts`.
    #[must_use]
    pub fn lower_bound(owner: &OwnerId, ts: Timestamp) -> Vec<u8> {
        Self::format(owner, ts, ReadingId::MIN)
    }

    /// Largest key of any reading of `owner` taken at `ts`.
    #[must_use]
    pub fn upper_bound(owner: &OwnerId, ts: Timestamp) -> Vec<u8> {
        Self::format(owner, ts, ReadingId::MAX)
    }

    /// Parses timestamp and reading ID out of a key of `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Corrupt`] if the key does not belong to `owner`
    /// or has the wrong length.
    pub fn parse(owner: &OwnerId, key: &[u8]) -> crate::Result<(Timestamp, ReadingId)> {
        let prefix_len = owner.len() + 1;

        if key.len() != prefix_len + SUFFIX_LEN
            || !key.starts_with(owner.as_bytes())
            || key.get(owner.len()) != Some(&SEPARATOR)
        {
            return Err(crate::Error::Corrupt);
        }

        let mut reader = key.get(prefix_len..).ok_or(crate::Error::Corrupt)?;
        let ts = reader
            .read_u128::<BigEndian>()
            .map_err(|_| crate::Error::Corrupt)?;
        let id = reader
            .read_u64::<BigEndian>()
            .map_err(|_| crate::Error::Corrupt)?;

        Ok((ts, id))
    }

    fn allocate(owner: &OwnerId) -> Vec<u8> {
        let mut key = Vec::with_capacity(owner.len() + 1 + SUFFIX_LEN);
        key.extend_from_slice(owner.as_bytes());
        key.push(SEPARATOR);
        key
    }
}

/// Storage value of a reading: `value_celsius note`.
pub struct ReadingValue;

impl ReadingValue {
    /// Encodes value and note.
    #[must_use]
    pub fn format(value: Value, note: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(std::mem::size_of::<Value>() + note.len());
        bytes.extend_from_slice(&value.to_be_bytes());
        bytes.extend_from_slice(note.as_bytes());
        bytes
    }

    /// Decodes value and note.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Corrupt`] if the bytes are truncated or the note is not UTF-8,
    /// and [`crate::Error::NonFiniteValue`] if the stored value is NaN or infinite.
    pub fn parse(bytes: &[u8]) -> crate::Result<(Value, String)> {
        let mut reader = bytes;

        let value = reader
            .read_f64::<BigEndian>()
            .map_err(|_| crate::Error::Corrupt)?;

        if !value.is_finite() {
            return Err(crate::Error::NonFiniteValue);
        }

        let note = std::str::from_utf8(reader).map_err(|_| crate::Error::Corrupt)?;

        Ok((value, note.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn owner(id: &str) -> OwnerId {
        OwnerId::try_from(id).unwrap()
    }

    #[test_log::test]
    fn reading_key_layout() {
        let key = ReadingKey::format(&owner("ab"), 1, 2);

        assert_eq!(2 + 1 + 16 + 8, key.len());
        assert_eq!(b"ab#", key.get(..3).unwrap());
        assert_eq!(Some(&1), key.get(18));
        assert_eq!(Some(&2), key.last());
    }

    #[test_log::test]
    fn reading_key_parse() -> crate::Result<()> {
        let alice = owner("alice");
        let key = ReadingKey::format(&alice, 1_728_000_000_000_000_000, 42);

        assert_eq!((1_728_000_000_000_000_000, 42), ReadingKey::parse(&alice, &key)?);

        Ok(())
    }

    #[test_log::test]
    fn reading_key_parse_wrong_owner() {
        let key = ReadingKey::format(&owner("alice"), 5, 1);

        assert!(matches!(ReadingKey::parse(&owner("alicf"), &key), Err(crate::Error::Corrupt)));
        assert!(matches!(ReadingKey::parse(&owner("ali"), &key), Err(crate::Error::Corrupt)));
    }

    #[test_log::test]
    fn reading_key_sorts_chronologically() {
        let alice = owner("alice");

        let keys = [
            ReadingKey::format(&alice, 1, 9),
            ReadingKey::format(&alice, 2, 0),
            ReadingKey::format(&alice, 2, 1),
            ReadingKey::format(&alice, 256, 0),
            ReadingKey::format(&alice, 1 << 70, 0),
        ];

        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test_log::test]
    fn reading_key_owner_prefix_free() {
        // "al" must not cover keys of "al-ice" or "alice"
        let short = b"al#";

        assert!(!ReadingKey::format(&owner("alice"), 0, 0).starts_with(short));
        assert!(!ReadingKey::format(&owner("al-ice"), 0, 0).starts_with(short));
        assert!(ReadingKey::format(&owner("al"), 0, 0).starts_with(short));
    }

    #[test_log::test]
    fn reading_value_parse() -> crate::Result<()> {
        let bytes = ReadingValue::format(36.6, "Morning reading");
        assert_eq!((36.6, "Morning reading".to_owned()), ReadingValue::parse(&bytes)?);

        let bytes = ReadingValue::format(-2.5, "");
        assert_eq!((-2.5, String::new()), ReadingValue::parse(&bytes)?);

        Ok(())
    }

    #[test_log::test]
    fn reading_value_corrupt() {
        assert!(matches!(ReadingValue::parse(&[0, 1, 2]), Err(crate::Error::Corrupt)));

        let mut bytes = ReadingValue::format(36.6, "");
        bytes.push(0xFF);
        assert!(matches!(ReadingValue::parse(&bytes), Err(crate::Error::Corrupt)));

        let bytes = ReadingValue::format(f64::NAN, "");
        assert!(matches!(ReadingValue::parse(&bytes), Err(crate::Error::NonFiniteValue)));
    }
}
