//! Grid placement engine.
//!
//! ARCHITECTURE
//! ============
//! The board is a fixed number of columns wide and unbounded downward.
//! Tiles are integer rectangles in grid units. `placement` defines the
//! record type, `compact` the packing algorithm every mutation runs
//! through, and `engine` the owning collection with add/replace/remove.
//!
//! Widths are whole grid units. A column divisor that does not divide the
//! column count evenly rounds the tile width down (12 columns / 8 slots
//! gives width 1), never below one column.

pub mod compact;
pub mod engine;
pub mod placement;

pub use compact::compact;
pub use engine::{PlacementEngine, PlacementError};
pub use placement::{PlacementRecord, Row};

pub const DEFAULT_TOTAL_COLUMNS: u32 = 12;
pub const DEFAULT_COLUMN_COUNT: u32 = 8;
pub const DEFAULT_ROW_SPAN: u32 = 4;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridConfigError {
    #[error("total columns must be at least 1")]
    NoColumns,
    #[error("column count {desired} must be between 1 and total columns {total}")]
    ColumnCount { desired: u32, total: u32 },
    #[error("default row span must be at least 1")]
    NoRowSpan,
}

/// Geometry of one layout context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    total_columns: u32,
    desired_column_count: u32,
    default_row_span: u32,
}

impl GridConfig {
    /// # Errors
    ///
    /// Returns an error if any dimension is zero or the column divisor exceeds
    /// the column count.
    pub fn new(total_columns: u32, desired_column_count: u32, default_row_span: u32) -> Result<Self, GridConfigError> {
        if total_columns == 0 {
            return Err(GridConfigError::NoColumns);
        }
        if desired_column_count == 0 || desired_column_count > total_columns {
            return Err(GridConfigError::ColumnCount { desired: desired_column_count, total: total_columns });
        }
        if default_row_span == 0 {
            return Err(GridConfigError::NoRowSpan);
        }
        Ok(Self { total_columns, desired_column_count, default_row_span })
    }

    #[must_use]
    pub fn total_columns(&self) -> u32 {
        self.total_columns
    }

    #[must_use]
    pub fn desired_column_count(&self) -> u32 {
        self.desired_column_count
    }

    #[must_use]
    pub fn default_row_span(&self) -> u32 {
        self.default_row_span
    }

    /// Width of an auto-placed tile.
    #[must_use]
    pub fn tile_width(&self) -> u32 {
        (self.total_columns / self.desired_column_count).max(1)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            total_columns: DEFAULT_TOTAL_COLUMNS,
            desired_column_count: DEFAULT_COLUMN_COUNT,
            default_row_span: DEFAULT_ROW_SPAN,
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
