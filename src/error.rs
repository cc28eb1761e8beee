//! Error types for DRS archive reading and extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`DrsError`].
pub type Result<T> = std::result::Result<T, DrsError>;

/// Errors raised while reading or extracting a DRS archive.
///
/// Only the directory and output variants are per-file conditions that the
/// extractor records in its report before moving on. Everything else aborts
/// the archive being processed.
#[derive(Error, Debug)]
pub enum DrsError {
    /// Archive is shorter than the fixed header.
    #[error("file is too small: only {found} bytes long (header needs {required})")]
    TooSmall {
        /// Bytes available in the archive.
        found: u64,
        /// Bytes the header needs.
        required: u64,
    },

    /// Declared table count does not fit in the archive.
    #[error("{tables} table descriptors need {needed} bytes but the archive is {len} bytes long")]
    DirectoryOverrun {
        /// Declared number of tables.
        tables: u32,
        /// Header plus descriptor bytes required.
        needed: u64,
        /// Archive length.
        len: u64,
    },

    /// Output directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    DirectoryCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output file could not be opened for writing.
    #[error("cannot open output file {path}: {source}")]
    OutputOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing extracted bytes to the output failed.
    #[error("write failed: {0}")]
    WriteFailed(#[source] std::io::Error),

    /// Read position disagrees with the offset recorded in the directory.
    #[error("layout mismatch in {context}: expected offset {expected}, stream is at {actual}")]
    LayoutInvariantViolation {
        /// What was being read when the mismatch was detected.
        context: String,
        expected: u64,
        actual: u64,
    },

    /// A read or skip asked for more bytes than remain in the archive.
    #[error("unexpected end of archive: requested {requested} bytes, {remaining} remaining")]
    Truncated { requested: u64, remaining: u64 },

    /// Any other I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DrsError {
    /// Whether the error stops processing of the whole archive.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::DirectoryCreateFailed { .. }
                | Self::OutputOpenFailed { .. }
                | Self::WriteFailed(_)
        )
    }
}
