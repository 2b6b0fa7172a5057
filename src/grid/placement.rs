//! Placement records: position and size of one tile in grid units.

use std::ops::Range;

use crate::registry::InstanceId;

/// Vertical position of a record.
///
/// `Unresolved` means "below everything currently on the board". Only
/// compaction turns it into a concrete row; nothing else does arithmetic on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    Unresolved,
    At(u32),
}

impl Row {
    #[must_use]
    pub fn resolved(self) -> Option<u32> {
        match self {
            Self::Unresolved => None,
            Self::At(row) => Some(row),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRecord {
    pub instance_id: InstanceId,
    /// Column offset.
    pub x: u32,
    pub y: Row,
    /// Column span, at least 1.
    pub width: u32,
    /// Row span, at least 1.
    pub height: u32,
}

impl PlacementRecord {
    #[must_use]
    pub fn columns(&self) -> Range<u32> {
        self.x..self.x.saturating_add(self.width)
    }

    /// Row just past the bottom edge, if the row is resolved.
    #[must_use]
    pub fn bottom(&self) -> Option<u32> {
        self.y.resolved().map(|y| y.saturating_add(self.height))
    }

    #[must_use]
    pub fn shares_columns(&self, other: &Self) -> bool {
        let (a, b) = (self.columns(), other.columns());
        a.start < b.end && b.start < a.end
    }

    /// Whether the occupied rectangles intersect. Unresolved records occupy
    /// nothing yet.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let (Some(top), Some(bottom)) = (self.y.resolved(), self.bottom()) else {
            return false;
        };
        let (Some(other_top), Some(other_bottom)) = (other.y.resolved(), other.bottom()) else {
            return false;
        };
        self.shares_columns(other) && top < other_bottom && other_top < bottom
    }
}

/// True if any two records in `records` overlap.
#[must_use]
pub fn has_overlap(records: &[PlacementRecord]) -> bool {
    records
        .iter()
        .enumerate()
        .any(|(i, a)| records[i + 1..].iter().any(|b| a.overlaps(b)))
}
