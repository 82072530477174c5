//! Error types for extraction runs.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a whole run, or a single target within it.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive error.
    #[error("{0}")]
    Cat(#[from] xtract_cat::Error),

    /// The extension filter is empty.
    #[error("no file types specified for extraction")]
    NoFileTypes,

    /// The game directory does not exist.
    #[error("source directory {} does not exist", .0.display())]
    SourceRootMissing(PathBuf),

    /// An expansion directory has no entry in the expansion catalog.
    #[error("unknown expansion identifier: {0}")]
    UnknownExpansion(String),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// An extraction job panicked.
    #[error("extraction job panicked: {0}")]
    JobPanicked(String),
}

/// Result type for extraction runs.
pub type Result<T> = std::result::Result<T, Error>;
