//! Index record parsing.

use std::path::{Component, Path, PathBuf};

use crate::{Error, Result};

/// Number of metadata fields that follow the byte length on every index line.
const TRAILING_FIELDS: usize = 2;

/// One file described by a line of a `.cat` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    /// Path relative to the archive root, as written in the index.
    pub path: String,
    /// Payload length in the paired data file.
    pub length: u64,
}

impl IndexRecord {
    /// Parse one index line.
    ///
    /// Blank lines yield `Ok(None)`. `line_number` is 1-based and only used
    /// for error reporting.
    pub fn parse(line: &str, line_number: usize) -> Result<Option<Self>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        // Path plus the length plus the trailing metadata.
        if fields.len() < TRAILING_FIELDS + 2 {
            return Err(malformed(
                trimmed,
                line_number,
                format!("expected at least {} fields, got {}", TRAILING_FIELDS + 2, fields.len()),
            ));
        }

        let length_field = fields[fields.len() - TRAILING_FIELDS - 1];
        let length = length_field.parse::<u64>().map_err(|_| {
            malformed(
                trimmed,
                line_number,
                format!("invalid byte length {length_field:?}"),
            )
        })?;

        Ok(Some(Self {
            path: fields[0].to_string(),
            length,
        }))
    }

    /// Extension of the record's path without the leading dot.
    #[inline]
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.path).extension().and_then(|e| e.to_str())
    }

    /// Destination of this record under `root`.
    ///
    /// Returns `None` when the path would escape `root` (absolute paths,
    /// `..` components, drive prefixes) or names no file at all.
    pub fn output_path(&self, root: &Path) -> Option<PathBuf> {
        let relative = Path::new(&self.path);
        let mut out = root.to_path_buf();
        let mut pushed = false;

        for component in relative.components() {
            match component {
                Component::Normal(part) => {
                    out.push(part);
                    pushed = true;
                }
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        pushed.then_some(out)
    }
}

fn malformed(line: &str, line_number: usize, reason: String) -> Error {
    Error::MalformedRecord {
        line_number,
        line: line.to_string(),
        reason,
    }
}
