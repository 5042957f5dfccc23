//! Package catalog interface and the in-memory reference backend.
//!
//! The catalog answers three questions about a system's packages: what is
//! installed, which installs were automatic, and what each package declares
//! as dependency alternatives.

use indexmap::IndexMap;

use crate::errors::RecommenderError;
use crate::types::ItemId;

/// Interface over the system package database.
pub trait PackageCatalog: Send + Sync {
    /// Identifiers of every installed package, in catalog order.
    fn installed(&self) -> Vec<ItemId>;

    /// Whether an installed package was pulled in automatically.
    fn is_auto_installed(&self, item: &str) -> Result<bool, RecommenderError>;

    /// Declared dependency alternatives, one inner sequence per OR-group.
    /// Empty when the package declares no dependencies.
    fn dependency_alternatives(&self, item: &str) -> Result<Vec<Vec<ItemId>>, RecommenderError>;
}

/// One package entry for the in-memory catalog.
#[derive(Clone, Debug)]
pub struct CatalogEntry {
    /// Package identifier.
    pub name: ItemId,
    /// Whether the package is currently installed.
    pub installed: bool,
    /// Whether the install was automatic (a dependency pull-in).
    pub auto_installed: bool,
    /// Declared dependency alternatives, one inner list per OR-group.
    pub dependencies: Vec<Vec<ItemId>>,
}

impl CatalogEntry {
    /// Entry for an available, not-installed package.
    pub fn available(name: &str) -> Self {
        Self {
            name: name.to_string(),
            installed: false,
            auto_installed: false,
            dependencies: Vec::new(),
        }
    }

    /// Entry for a manually installed package.
    pub fn installed(name: &str) -> Self {
        Self {
            installed: true,
            ..Self::available(name)
        }
    }

    /// Entry for an automatically installed package.
    pub fn auto_installed(name: &str) -> Self {
        Self {
            installed: true,
            auto_installed: true,
            ..Self::available(name)
        }
    }

    /// Attach one OR-dependency group.
    pub fn with_or_group<S: AsRef<str>>(mut self, alternatives: &[S]) -> Self {
        self.dependencies.push(
            alternatives
                .iter()
                .map(|alt| alt.as_ref().to_string())
                .collect(),
        );
        self
    }
}

/// In-memory package catalog for tests and small fixtures.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    entries: IndexMap<ItemId, CatalogEntry>,
}

impl MemoryCatalog {
    /// Create a catalog from prebuilt entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.name.clone(), entry))
            .collect();
        Self { entries }
    }

    /// Number of packages the catalog knows about.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry(&self, item: &str) -> Result<&CatalogEntry, RecommenderError> {
        self.entries
            .get(item)
            .ok_or_else(|| RecommenderError::CatalogLookup {
                item: item.to_string(),
            })
    }
}

impl PackageCatalog for MemoryCatalog {
    fn installed(&self) -> Vec<ItemId> {
        self.entries
            .values()
            .filter(|entry| entry.installed)
            .map(|entry| entry.name.clone())
            .collect()
    }

    fn is_auto_installed(&self, item: &str) -> Result<bool, RecommenderError> {
        Ok(self.entry(item)?.auto_installed)
    }

    fn dependency_alternatives(&self, item: &str) -> Result<Vec<Vec<ItemId>>, RecommenderError> {
        Ok(self.entry(item)?.dependencies.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn installed_preserves_entry_order() {
        let catalog = MemoryCatalog::new(vec![
            CatalogEntry::installed("vim"),
            CatalogEntry::available("emacs"),
            CatalogEntry::auto_installed("vim-common"),
        ]);
        assert_eq!(catalog.installed(), vec!["vim", "vim-common"]);
    }

    #[test]
    fn unknown_items_fail_with_a_lookup_error() {
        let catalog = MemoryCatalog::new(vec![CatalogEntry::installed("vim")]);
        let err = catalog.is_auto_installed("nonexistent").unwrap_err();
        assert!(
            matches!(err, RecommenderError::CatalogLookup { ref item } if item == "nonexistent")
        );
    }

    #[test]
    fn or_groups_round_trip() {
        let catalog = MemoryCatalog::new(vec![
            CatalogEntry::installed("mutt").with_or_group(&["exim4", "postfix"]),
        ]);
        let groups = catalog.dependency_alternatives("mutt").unwrap();
        assert_eq!(groups, vec![vec!["exim4", "postfix"]]);
    }
}
