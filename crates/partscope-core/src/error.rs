//! Decoder error types

use thiserror::Error;

/// The main error type for partition table decoding
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying byte source could not be opened or read
    #[error("Source unavailable: {0}")]
    SourceUnavailable(#[from] std::io::Error),

    /// Fewer bytes were available than a structure requires
    #[error("Short read while reading {context}: expected {expected} bytes, got {actual}")]
    ShortRead {
        context: String,
        expected: u64,
        actual: u64,
    },

    /// Neither an MBR boot signature nor a GPT header signature was found
    #[error("Unrecognized partition table type")]
    UnrecognizedTableType,

    /// Sector size is outside the supported range
    #[error("Invalid sector size: {0}")]
    InvalidSectorSize(String),

    /// Structurally impossible partition table
    #[error("Invalid zone table: {0}")]
    InvalidZoneTable(String),
}

/// Result type alias for decoding operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a short read error
    pub fn short_read(context: impl Into<String>, expected: u64, actual: u64) -> Self {
        Error::ShortRead {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Create an invalid zone table error
    pub fn invalid_zone_table(msg: impl Into<String>) -> Self {
        Error::InvalidZoneTable(msg.into())
    }

    /// Create an invalid sector size error
    pub fn invalid_sector_size(msg: impl Into<String>) -> Self {
        Error::InvalidSectorSize(msg.into())
    }

    /// True for the short-read condition
    pub fn is_short_read(&self) -> bool {
        matches!(self, Error::ShortRead { .. })
    }
}
