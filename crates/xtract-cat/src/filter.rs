//! Extension allow-list.

use std::collections::BTreeSet;
use std::fmt;

/// Extensions extracted when the caller does not pick any.
pub const DEFAULT_TYPES: &str = "xml, xsd, html, js, css, lua";

/// Set of file extensions selected for extraction.
///
/// Extensions are stored lower-cased and without the leading dot. Matching
/// against record paths is case-sensitive, so `Foo.XML` is not selected by
/// `xml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: BTreeSet<String>,
}

impl ExtensionFilter {
    /// Build a filter from individual extensions.
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .filter_map(|ext| {
                let ext = ext.as_ref().trim().trim_start_matches('.');
                (!ext.is_empty()).then(|| ext.to_lowercase())
            })
            .collect();

        Self { extensions }
    }

    /// Parse a comma separated list such as `"xml, lua"`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Check whether an extension (without the dot) is selected.
    #[inline]
    pub fn matches(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.extensions.iter().map(String::as_str)
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for ext in &self.extensions {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(ext)?;
            first = false;
        }
        Ok(())
    }
}
