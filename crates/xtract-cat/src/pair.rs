//! CAT/DAT archive pairs.

use std::path::{Path, PathBuf};

/// Extension of index files.
pub const INDEX_EXTENSION: &str = "cat";

/// Extension of the data file paired with an index.
pub const DATA_EXTENSION: &str = "dat";

/// Stem suffix marking signature companions such as `01_sig.cat`.
pub const SIGNATURE_SUFFIX: &str = "_sig";

/// An index file and the data file holding its payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivePair {
    /// The `.cat` index.
    pub index: PathBuf,
    /// The `.dat` file with the same stem. It may not exist.
    pub data: PathBuf,
}

impl ArchivePair {
    /// Pair an index file with its data file.
    pub fn from_index<P: Into<PathBuf>>(index: P) -> Self {
        let index = index.into();
        let data = index.with_extension(DATA_EXTENSION);
        Self { index, data }
    }

    /// File name of the index, used in logs and progress messages.
    pub fn name(&self) -> &str {
        self.index
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }
}

/// Whether `path` names a signature companion rather than a real index.
pub fn is_signature_file(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(SIGNATURE_SUFFIX))
}
