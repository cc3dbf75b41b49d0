const OWNER_ID_CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_-";

/// Maximum length of an owner ID in bytes.
pub const MAX_OWNER_ID_LEN: usize = 64;

/// The account a reading belongs to.
///
/// Characters supported: a-z A-Z 0-9 _ -
///
/// The separator used in storage keys (`#`) is not part of the alphabet,
/// so one owner's key range can never contain another owner's readings.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Debug)]
pub struct OwnerId(String);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for OwnerId {
    type Error = crate::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.is_empty()
            || value.len() > MAX_OWNER_ID_LEN
            || value.chars().any(|c| !OWNER_ID_CHARS.contains(c))
        {
            Err(crate::Error::InvalidOwner)
        } else {
            Ok(Self(value.to_owned()))
        }
    }
}

impl std::ops::Deref for OwnerId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn owner_id_valid() {
        assert!(OwnerId::try_from("652f1c0e9b1e8a0012345678").is_ok());
        assert!(OwnerId::try_from("user_1-a").is_ok());
        assert!(OwnerId::try_from("a".repeat(MAX_OWNER_ID_LEN).as_str()).is_ok());
    }

    #[test_log::test]
    fn owner_id_invalid() {
        assert!(matches!(OwnerId::try_from(""), Err(crate::Error::InvalidOwner)));
        assert!(matches!(OwnerId::try_from("a#b"), Err(crate::Error::InvalidOwner)));
        assert!(matches!(OwnerId::try_from("a b"), Err(crate::Error::InvalidOwner)));
        assert!(matches!(
            OwnerId::try_from("a".repeat(MAX_OWNER_ID_LEN + 1).as_str()),
            Err(crate::Error::InvalidOwner)
        ));
    }
}
