//! Catalog cache: in-memory mirror of the backend media catalog.
//!
//! DESIGN
//! ======
//! The cache is replaced wholesale on load and appended to after a
//! successful upload. It holds no placement logic. Board edits never touch
//! it; the only removal path is an acknowledged backend delete.
//!
//! A listing can arrive after uploads or deletes that completed while it was
//! in flight. `reconcile` applies such a listing against the ids that were
//! cached when it was requested, so entries appended since survive and
//! entries deleted since stay gone.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// TYPES
// =============================================================================

/// Opaque, stable identifier of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted media item, independent of any placement on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub catalog_id: CatalogId,
    pub display_name: String,
    /// URL or locator for the media payload.
    pub media_ref: String,
}

// =============================================================================
// CACHE
// =============================================================================

/// Catalog entries in backend insertion order.
#[derive(Debug, Default)]
pub struct CatalogCache {
    items: Vec<CatalogItem>,
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache wholesale and return the new contents.
    pub fn load(&mut self, items: Vec<CatalogItem>) -> &[CatalogItem] {
        self.items.clear();
        for item in items {
            self.append(item);
        }
        &self.items
    }

    /// Apply a backend listing requested while `known` was the cached id set.
    pub fn reconcile(&mut self, items: Vec<CatalogItem>, known: &[CatalogId]) -> &[CatalogItem] {
        let deleted_since: Vec<CatalogId> = known.iter().filter(|id| !self.contains(id)).cloned().collect();
        let appended_since: Vec<CatalogItem> = self
            .items
            .iter()
            .filter(|item| !known.contains(&item.catalog_id))
            .cloned()
            .collect();

        self.load(
            items
                .into_iter()
                .filter(|item| !deleted_since.contains(&item.catalog_id))
                .collect(),
        );
        for item in appended_since {
            if !self.contains(&item.catalog_id) {
                self.append(item);
            }
        }
        &self.items
    }

    /// Add an item after an upload acknowledgment. An item whose id is
    /// already cached replaces the cached entry in place, so late or repeated
    /// acknowledgments converge on the same contents.
    pub fn append(&mut self, item: CatalogItem) {
        match self.items.iter_mut().find(|cached| cached.catalog_id == item.catalog_id) {
            Some(cached) => *cached = item,
            None => self.items.push(item),
        }
    }

    /// Drop an entry after the backend acknowledged its deletion.
    pub fn evict(&mut self, catalog_id: &CatalogId) -> Option<CatalogItem> {
        let index = self.items.iter().position(|item| &item.catalog_id == catalog_id)?;
        Some(self.items.remove(index))
    }

    #[must_use]
    pub fn get(&self, catalog_id: &CatalogId) -> Option<&CatalogItem> {
        self.items.iter().find(|item| &item.catalog_id == catalog_id)
    }

    #[must_use]
    pub fn contains(&self, catalog_id: &CatalogId) -> bool {
        self.get(catalog_id).is_some()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<CatalogId> {
        self.items.iter().map(|item| item.catalog_id.clone()).collect()
    }

    #[must_use]
    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
