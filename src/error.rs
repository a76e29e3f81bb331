//! Global error handling for bulkpaste
//!
//! Run-level failures live in [`BulkPasteError`]. Per-file failures never
//! abort a run; they are described by [`SkipReason`] and reported as skips.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clipboard::ClipboardError;

/// Global error type for bulkpaste operations
#[derive(Error, Debug)]
pub enum BulkPasteError {
    /// Clipboard-related errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Every candidate was skipped, so there is nothing to put on the clipboard
    #[error("No valid text files were processed. No data was copied.")]
    NothingToCopy,

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Specialized Result type for bulkpaste operations
pub type Result<T> = std::result::Result<T, BulkPasteError>;

/// Why a path did not make it into the output
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("ignored by pattern")]
    IgnoredByPattern,

    #[error("already visited")]
    AlreadyVisited,

    #[error("not a file or directory")]
    NotFileOrDirectory,

    #[error("file does not exist or cannot be accessed")]
    NotFound,

    #[error("file too large ({size}, limit {limit})")]
    TooLarge { size: String, limit: String },

    #[error("appears to be a binary file")]
    Binary,

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("file locked or unreadable: {0}")]
    Unreadable(String),

    #[error("could not fully read file ({read} of {expected} bytes)")]
    Truncated { read: u64, expected: u64 },

    #[error("error accessing directory: {0}")]
    Enumeration(String),
}

/// A skipped path together with the reason it was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skipped {
    /// Path as it was discovered
    pub path: PathBuf,
    /// Reason for skipping
    pub reason: SkipReason,
}

/// Creates a BulkPasteError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::BulkPasteError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

impl From<BulkPasteError> for io::Error {
    fn from(err: BulkPasteError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
