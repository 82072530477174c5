//! Error types for the CAT crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading CAT/DAT archive pairs.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The index (`.cat`) file of a pair does not exist.
    #[error("cat file {} does not exist", .0.display())]
    ArchivePairNotFound(PathBuf),

    /// An index line could not be interpreted as a record.
    #[error("malformed record on line {line_number}: {reason} ({line:?})")]
    MalformedRecord {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// An extracted file could not be written.
    #[error("error while writing file {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory holds no cat files at all.
    #[error("no cat files found in {}", .0.display())]
    NoArchivesFound(PathBuf),

    /// The data file ends before a record's payload does.
    #[error("data file ends at {data_len} bytes but record {path} needs bytes up to {needed}")]
    TruncatedData {
        path: String,
        needed: u64,
        data_len: u64,
    },
}

/// Result type for CAT operations.
pub type Result<T> = std::result::Result<T, Error>;
