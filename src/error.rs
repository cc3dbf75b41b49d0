/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error in storage engine.
    Storage(fjall::Error),

    /// The owner ID is empty, too long, or contains unsupported characters.
    InvalidOwner,

    /// The configured UTC offset is not a valid fixed offset.
    InvalidOffset,

    /// A reading value was NaN or infinite.
    NonFiniteValue,

    /// A timestamp could not be mapped onto the calendar.
    TimestampOutOfRange,

    /// More readings were scanned than the configured limit allows.
    ScanLimitExceeded,

    /// A stored key or value could not be decoded.
    Corrupt,

    /// The credential was missing or not recognized.
    Unauthorized,
}

impl From<fjall::Error> for Error {
    fn from(value: fjall::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => {
                write!(f, "{e}",)
            }
            Self::Io(e) => {
                write!(f, "{e}",)
            }
            Self::InvalidOwner => {
                write!(f, "InvalidOwner",)
            }
            Self::InvalidOffset => {
                write!(f, "InvalidOffset",)
            }
            Self::NonFiniteValue => {
                write!(f, "NonFiniteValue",)
            }
            Self::TimestampOutOfRange => {
                write!(f, "TimestampOutOfRange",)
            }
            Self::ScanLimitExceeded => {
                write!(f, "ScanLimitExceeded",)
            }
            Self::Corrupt => {
                write!(f, "Corrupt",)
            }
            Self::Unauthorized => {
                write!(f, "Unauthorized",)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;
