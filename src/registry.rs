//! Tile instance registry: owns on-board instance identity.
//!
//! DESIGN
//! ======
//! Every tile on the board is an instance that points at a catalog entry by
//! id. Several instances may point at the same entry. Ids come from a
//! strictly increasing counter and are never reused within a session, so a
//! stale id from a late drag event can never alias a newer tile.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogCache, CatalogId, CatalogItem};

// =============================================================================
// TYPES
// =============================================================================

/// Identifier of one placed tile. Unique within a board session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(u64);

impl InstanceId {
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One placed occurrence of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileInstance {
    pub instance_id: InstanceId,
    pub catalog_id: CatalogId,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("dangling reference: no live instance {0}")]
    UnknownInstance(InstanceId),
    #[error("dangling reference: instance {instance_id} points at missing catalog item {catalog_id}")]
    MissingCatalogItem { instance_id: InstanceId, catalog_id: CatalogId },
}

impl crate::error::ErrorCode for RegistryError {
    fn error_code(&self) -> &'static str {
        "E_DANGLING_REFERENCE"
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

#[derive(Debug, Default)]
pub struct TileRegistry {
    next_id: u64,
    instances: BTreeMap<InstanceId, CatalogId>,
}

impl TileRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh instance pointing at `catalog_id`.
    pub fn create(&mut self, catalog_id: CatalogId) -> InstanceId {
        let instance_id = InstanceId(self.next_id);
        self.next_id += 1;
        self.instances.insert(instance_id, catalog_id);
        instance_id
    }

    /// Remove an instance. Returns `false` if it was already absent.
    pub fn destroy(&mut self, instance_id: InstanceId) -> bool {
        self.instances.remove(&instance_id).is_some()
    }

    /// Look an instance up through the catalog cache.
    ///
    /// # Errors
    ///
    /// Returns a dangling-reference error if the instance is not live or its
    /// catalog entry is no longer cached.
    pub fn resolve<'a>(&self, instance_id: InstanceId, catalog: &'a CatalogCache) -> Result<&'a CatalogItem, RegistryError> {
        let catalog_id = self
            .instances
            .get(&instance_id)
            .ok_or(RegistryError::UnknownInstance(instance_id))?;
        catalog
            .get(catalog_id)
            .ok_or_else(|| RegistryError::MissingCatalogItem { instance_id, catalog_id: catalog_id.clone() })
    }

    #[must_use]
    pub fn catalog_id(&self, instance_id: InstanceId) -> Option<&CatalogId> {
        self.instances.get(&instance_id)
    }

    #[must_use]
    pub fn contains(&self, instance_id: InstanceId) -> bool {
        self.instances.contains_key(&instance_id)
    }

    /// Live instances that reference `catalog_id`, oldest first.
    #[must_use]
    pub fn referencing(&self, catalog_id: &CatalogId) -> Vec<InstanceId> {
        self.instances
            .iter()
            .filter(|(_, referenced)| *referenced == catalog_id)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn instances(&self) -> impl Iterator<Item = TileInstance> + '_ {
        self.instances
            .iter()
            .map(|(id, catalog_id)| TileInstance { instance_id: *id, catalog_id: catalog_id.clone() })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
