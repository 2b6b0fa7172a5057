//! Vertical compaction.
//!
//! DESIGN
//! ======
//! Records are visited top-to-bottom, then left-to-right, ties broken by
//! their position in the input slice (insertion order). `Unresolved` rows
//! sort after every resolved row. Each record lands on the lowest row whose
//! span does not intersect an already-visited record sharing one of its
//! columns. That row is either 0 or the bottom edge of some visited record,
//! so those are the only candidates tried.
//!
//! Rows are recomputed from scratch, so gaps left by removals or downward
//! drags close up, holes under wide tiles are filled, and overlapping input
//! is pushed apart.
//!
//! FIXED POINT
//! ===========
//! Take a compacted layout and any record `t` in it. Every start row below `t.y`
//! was blocked on the first pass by some record `u` visited earlier. `u`
//! shares columns with `t` and does not overlap it, so `u` sits strictly
//! higher and is visited before `t` again on a second pass, where it still
//! blocks the same rows. `t.y` itself stays free, so `t` lands on the same
//! row: `compact(compact(l)) == compact(l)`.

use super::placement::{PlacementRecord, Row};

/// Pack `records` toward row 0 with no overlaps. The output keeps the input
/// order and has every row resolved.
#[must_use]
pub fn compact(records: &[PlacementRecord], total_columns: u32) -> Vec<PlacementRecord> {
    let mut out: Vec<PlacementRecord> = records
        .iter()
        .map(|record| correct_bounds(*record, total_columns))
        .collect();

    let mut order: Vec<usize> = (0..out.len()).collect();
    order.sort_by_key(|&i| (visit_rank(out[i].y), out[i].x, i));

    let mut placed: Vec<usize> = Vec::with_capacity(out.len());
    for i in order {
        let blockers: Vec<(u32, u32)> = placed
            .iter()
            .map(|&j| &out[j])
            .filter(|above| above.shares_columns(&out[i]))
            .filter_map(|above| Some((above.y.resolved()?, above.bottom()?)))
            .collect();
        out[i].y = Row::At(lowest_free_row(&blockers, out[i].height));
        placed.push(i);
    }

    out
}

/// True if `records` is already a fixed point of [`compact`].
#[must_use]
pub fn is_compacted(records: &[PlacementRecord], total_columns: u32) -> bool {
    compact(records, total_columns) == records
}

/// Clamp a record into `0..total_columns` with non-zero spans.
#[must_use]
pub fn correct_bounds(mut record: PlacementRecord, total_columns: u32) -> PlacementRecord {
    let total_columns = total_columns.max(1);
    record.width = record.width.clamp(1, total_columns);
    record.height = record.height.max(1);
    record.x = record.x.min(total_columns - record.width);
    record
}

/// Smallest row `y` where `y..y + height` misses every `(top, bottom)` span.
fn lowest_free_row(blockers: &[(u32, u32)], height: u32) -> u32 {
    let fits = |y: u32| {
        let bottom = y.saturating_add(height);
        blockers.iter().all(|&(top, end)| bottom <= top || end <= y)
    };
    let mut candidates: Vec<u32> = blockers.iter().map(|&(_, end)| end).collect();
    candidates.push(0);
    candidates.sort_unstable();
    candidates.into_iter().find(|&y| fits(y)).unwrap_or(0)
}

fn visit_rank(row: Row) -> (u8, u32) {
    match row {
        Row::At(y) => (0, y),
        Row::Unresolved => (1, 0),
    }
}

#[cfg(test)]
#[path = "compact_test.rs"]
mod tests;
