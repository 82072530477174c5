//! Discovery of the archive pairs in a directory.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::pair::{is_signature_file, ArchivePair, INDEX_EXTENSION};
use crate::{Error, Result};

/// List the archive pairs directly inside `dir`.
///
/// Signature companions (`*_sig.cat`) are never returned. When `include` is
/// non-empty only pairs whose index file name is listed there are kept; names
/// that match nothing are ignored. Results are sorted by file name.
///
/// Fails with [`Error::NoArchivesFound`] if `dir` holds no cat files before
/// the `include` list is applied.
pub fn collect_archives<S: AsRef<str>>(dir: &Path, include: &[S]) -> Result<Vec<ArchivePair>> {
    let mut indexes = Vec::new();

    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_index = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == INDEX_EXTENSION);

        if is_index && path.is_file() && !is_signature_file(&path) {
            indexes.push(path);
        }
    }

    if indexes.is_empty() {
        return Err(Error::NoArchivesFound(dir.to_path_buf()));
    }

    indexes.sort();

    let pairs: Vec<ArchivePair> = indexes
        .into_iter()
        .map(ArchivePair::from_index)
        .filter(|pair| include.is_empty() || include.iter().any(|name| name.as_ref() == pair.name()))
        .collect();

    debug!(dir = %dir.display(), count = pairs.len(), "cat files found for extraction");
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    fn names(pairs: &[ArchivePair]) -> Vec<&str> {
        pairs.iter().map(ArchivePair::name).collect()
    }

    #[test]
    fn test_empty_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            collect_archives(dir.path(), NONE),
            Err(Error::NoArchivesFound(_))
        ));
    }

    #[test]
    fn test_only_signatures_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("01_sig.cat"), "").unwrap();
        assert!(matches!(
            collect_archives(dir.path(), NONE),
            Err(Error::NoArchivesFound(_))
        ));
    }

    #[test]
    fn test_all_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["02.cat", "01.cat", "03_sig.cat", "01.dat", "notes.txt"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let pairs = collect_archives(dir.path(), NONE).unwrap();
        assert_eq!(names(&pairs), vec!["01.cat", "02.cat"]);
        assert_eq!(pairs[0].data, dir.path().join("01.dat"));
    }

    #[test]
    fn test_include_filter() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["a.cat", "a_sig.cat", "b.cat"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let pairs = collect_archives(dir.path(), &["b.cat", "missing.cat"]).unwrap();
        assert_eq!(names(&pairs), vec!["b.cat"]);
    }

    #[test]
    fn test_include_filter_may_empty_the_result() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("exists.cat"), "").unwrap();

        let pairs = collect_archives(dir.path(), &["missing.cat".to_string()]).unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_subdirectories_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.cat")).unwrap();
        fs::write(dir.path().join("real.cat"), "").unwrap();

        let pairs = collect_archives(dir.path(), NONE).unwrap();
        assert_eq!(names(&pairs), vec!["real.cat"]);
    }
}
