//! Expansion (DLC) discovery and naming.
//!
//! Expansions live in `<game>/extensions/ego_dlc_*`, each with its own set of
//! cat/dat pairs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Directory under the game root holding the expansions.
pub const EXPANSIONS_DIR: &str = "extensions";

/// Name prefix of official expansion directories.
pub const EXPANSION_PREFIX: &str = "ego_dlc_";

/// Known expansions: directory name and display name.
const KNOWN_EXPANSIONS: &[(&str, &str)] = &[
    ("ego_dlc_split", "Split Vendetta"),
    ("ego_dlc_terran", "Cradle of Humanity"),
    ("ego_dlc_pirate", "Tides of Avarice"),
    ("ego_dlc_boron", "Kingdom End"),
    ("ego_dlc_timelines", "Timelines"),
    ("ego_dlc_mini_01", "Hyperion Pack"),
    ("ego_dlc_mini_02", "Envoy Pack"),
];

/// Lookup table from expansion identifier to display name.
#[derive(Debug, Clone, Copy)]
pub struct ExpansionCatalog {
    entries: &'static [(&'static str, &'static str)],
}

impl ExpansionCatalog {
    /// Catalog with a caller-provided table.
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Display name for `identifier`.
    pub fn display_name(&self, identifier: &str) -> Result<&'static str> {
        self.entries
            .iter()
            .find(|(id, _)| *id == identifier)
            .map(|(_, name)| *name)
            .ok_or_else(|| Error::UnknownExpansion(identifier.to_string()))
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

impl Default for ExpansionCatalog {
    fn default() -> Self {
        Self::new(KNOWN_EXPANSIONS)
    }
}

/// An expansion directory found under the game root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Directory name, e.g. `ego_dlc_boron`.
    pub identifier: String,
    /// Directory holding the expansion's cat files.
    pub root: PathBuf,
}

/// Find expansion directories under `game_root`.
///
/// Returns `Ok(None)` if the game has no expansions directory at all.
/// Results are sorted by identifier.
pub fn discover_expansions(game_root: &Path) -> Result<Option<Vec<Expansion>>> {
    let dir = game_root.join(EXPANSIONS_DIR);
    if !dir.is_dir() {
        warn!("no expansions directory found at {}", dir.display());
        return Ok(None);
    }

    let mut expansions = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };

        if name.starts_with(EXPANSION_PREFIX) && entry.path().is_dir() {
            expansions.push(Expansion {
                identifier: name,
                root: entry.path(),
            });
        }
    }

    expansions.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    debug!(count = expansions.len(), "expansions discovered");

    Ok(Some(expansions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_display_names() {
        let catalog = ExpansionCatalog::default();
        assert_eq!(catalog.display_name("ego_dlc_boron").unwrap(), "Kingdom End");
        assert_eq!(catalog.display_name("ego_dlc_split").unwrap(), "Split Vendetta");
        assert!(catalog.identifiers().all(|id| id.starts_with(EXPANSION_PREFIX)));
    }

    #[test]
    fn test_unknown_identifier() {
        let catalog = ExpansionCatalog::default();
        assert!(matches!(
            catalog.display_name("ego_dlc_unreleased"),
            Err(Error::UnknownExpansion(id)) if id == "ego_dlc_unreleased"
        ));
    }

    #[test]
    fn test_custom_catalog() {
        static TABLE: &[(&str, &str)] = &[("ego_dlc_test", "Test Pack")];
        let catalog = ExpansionCatalog::new(TABLE);
        assert_eq!(catalog.display_name("ego_dlc_test").unwrap(), "Test Pack");
        assert!(catalog.display_name("ego_dlc_boron").is_err());
    }

    #[test]
    fn test_discover_without_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(discover_expansions(dir.path()).unwrap(), None);
    }

    #[test]
    fn test_discover_filters_by_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let extensions = dir.path().join(EXPANSIONS_DIR);
        fs::create_dir_all(extensions.join("ego_dlc_terran")).unwrap();
        fs::create_dir_all(extensions.join("ego_dlc_boron")).unwrap();
        fs::create_dir_all(extensions.join("some_workshop_mod")).unwrap();
        fs::write(extensions.join("ego_dlc_file.txt"), "").unwrap();

        let found = discover_expansions(dir.path()).unwrap().unwrap();
        let ids: Vec<_> = found.iter().map(|e| e.identifier.as_str()).collect();
        assert_eq!(ids, vec!["ego_dlc_boron", "ego_dlc_terran"]);
        assert_eq!(found[0].root, extensions.join("ego_dlc_boron"));
    }
}
