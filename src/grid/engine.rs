//! Placement engine: the canonical ordered set of placement records.
//!
//! DESIGN
//! ======
//! Records are kept in insertion order, one per live tile instance. Every
//! mutation (add, layout replacement, remove) ends with a full compaction,
//! so the stored layout is always a packed, overlap-free fixed point.

use tracing::debug;

use super::GridConfig;
use super::compact::{compact, is_compacted};
use super::placement::{PlacementRecord, Row};
use crate::registry::InstanceId;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("instance {0} already has a placement")]
    DuplicatePlacement(InstanceId),
}

impl crate::error::ErrorCode for PlacementError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicatePlacement(_) => "E_DUPLICATE_PLACEMENT",
        }
    }
}

#[derive(Debug)]
pub struct PlacementEngine {
    config: GridConfig,
    records: Vec<PlacementRecord>,
}

impl PlacementEngine {
    #[must_use]
    pub fn new(config: GridConfig) -> Self {
        Self { config, records: Vec::new() }
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    #[must_use]
    pub fn records(&self) -> &[PlacementRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, instance_id: InstanceId) -> Option<&PlacementRecord> {
        self.records.iter().find(|r| r.instance_id == instance_id)
    }

    #[must_use]
    pub fn contains(&self, instance_id: InstanceId) -> bool {
        self.get(instance_id).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    // =========================================================================
    // AUTO-PLACEMENT
    // =========================================================================

    /// Slot for the next tile: column slots cycle left to right with the
    /// number of tiles already placed, and the row is left for compaction.
    #[must_use]
    pub fn auto_placement(&self, instance_id: InstanceId) -> PlacementRecord {
        let width = self.config.tile_width();
        let slots = u64::from(self.config.desired_column_count());
        let slot = u32::try_from(self.records.len() as u64 % slots).unwrap_or(0);
        PlacementRecord {
            instance_id,
            x: slot * width,
            y: Row::Unresolved,
            width,
            height: self.config.default_row_span(),
        }
    }

    // =========================================================================
    // MUTATION
    // =========================================================================

    /// Append a record and re-pack.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePlacement` if the instance already has a record.
    pub fn add_placement(&mut self, record: PlacementRecord) -> Result<PlacementRecord, PlacementError> {
        if self.contains(record.instance_id) {
            return Err(PlacementError::DuplicatePlacement(record.instance_id));
        }
        self.records.push(record);
        self.settle();

        let placed = self.records[self.records.len() - 1];
        debug!(instance_id = %placed.instance_id, x = placed.x, y = ?placed.y, "placement added");
        Ok(placed)
    }

    /// Replace the whole layout with `proposed` and re-pack it. The current
    /// layout is kept if `proposed` names an instance twice.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePlacement` for the first repeated instance id.
    pub fn replace_layout(&mut self, proposed: Vec<PlacementRecord>) -> Result<(), PlacementError> {
        for (i, record) in proposed.iter().enumerate() {
            if proposed[..i].iter().any(|r| r.instance_id == record.instance_id) {
                return Err(PlacementError::DuplicatePlacement(record.instance_id));
            }
        }
        self.records = proposed;
        self.settle();
        debug!(count = self.records.len(), "layout replaced");
        Ok(())
    }

    /// Remove the record for `instance_id` and re-pack so nothing below is
    /// left hanging. Returns `false` if there was no such record.
    pub fn remove(&mut self, instance_id: InstanceId) -> bool {
        let Some(index) = self.records.iter().position(|r| r.instance_id == instance_id) else {
            return false;
        };
        self.records.remove(index);
        self.settle();
        debug!(%instance_id, "placement removed");
        true
    }

    fn settle(&mut self) {
        self.records = compact(&self.records, self.config.total_columns());
        debug_assert!(is_compacted(&self.records, self.config.total_columns()));
    }
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;
