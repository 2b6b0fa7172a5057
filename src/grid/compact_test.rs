use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::*;
use crate::grid::placement::has_overlap;
use crate::registry::InstanceId;

fn rec(id: u64, x: u32, y: Row, width: u32, height: u32) -> PlacementRecord {
    PlacementRecord { instance_id: InstanceId::new(id), x, y, width, height }
}

fn rows(records: &[PlacementRecord]) -> Vec<u32> {
    records.iter().map(|r| r.y.resolved().unwrap()).collect()
}

fn random_layout(rng: &mut StdRng, count: u64, total_columns: u32) -> Vec<PlacementRecord> {
    (0..count)
        .map(|id| {
            let y = if rng.random_bool(0.2) { Row::Unresolved } else { Row::At(rng.random_range(0..20)) };
            rec(id, rng.random_range(0..total_columns + 3), y, rng.random_range(0..6), rng.random_range(0..5))
        })
        .collect()
}

#[test]
fn empty_layout_stays_empty() {
    assert!(compact(&[], 12).is_empty());
}

#[test]
fn floating_tile_moves_to_top() {
    let out = compact(&[rec(0, 0, Row::At(9), 3, 4)], 12);
    assert_eq!(out[0].y, Row::At(0));
}

#[test]
fn overlapping_tiles_are_stacked() {
    let input = [rec(0, 0, Row::At(0), 4, 4), rec(1, 2, Row::At(1), 4, 2)];
    let out = compact(&input, 12);
    assert_eq!(rows(&out), vec![0, 4]);
    assert!(!has_overlap(&out));
}

#[test]
fn identical_positions_break_ties_by_insertion_order() {
    let input = [rec(7, 0, Row::At(0), 3, 4), rec(3, 0, Row::At(0), 3, 4)];
    let out = compact(&input, 12);
    assert_eq!(out[0].instance_id, InstanceId::new(7));
    assert_eq!(rows(&out), vec![0, 4]);
}

#[test]
fn unresolved_lands_below_its_columns() {
    let input = [
        rec(0, 0, Row::At(0), 3, 4),
        rec(1, 3, Row::At(0), 3, 8),
        rec(2, 2, Row::Unresolved, 3, 4),
    ];
    let out = compact(&input, 12);
    assert_eq!(rows(&out), vec![0, 0, 8]);
}

#[test]
fn unresolved_in_empty_column_lands_on_top() {
    let input = [rec(0, 0, Row::At(0), 3, 4), rec(1, 6, Row::Unresolved, 3, 4)];
    let out = compact(&input, 12);
    assert_eq!(rows(&out), vec![0, 0]);
}

#[test]
fn unresolved_records_keep_insertion_order() {
    let input = [rec(0, 0, Row::Unresolved, 3, 4), rec(1, 0, Row::Unresolved, 3, 4)];
    let out = compact(&input, 12);
    assert_eq!(rows(&out), vec![0, 4]);
}

#[test]
fn gap_left_by_removed_tile_closes() {
    let mut layout = compact(
        &[rec(0, 0, Row::At(0), 3, 4), rec(1, 0, Row::At(4), 3, 4), rec(2, 0, Row::At(8), 3, 4)],
        12,
    );
    layout.remove(1);
    let out = compact(&layout, 12);
    assert_eq!(rows(&out), vec![0, 4]);
}

#[test]
fn output_preserves_input_order() {
    let input = [rec(5, 0, Row::At(8), 3, 4), rec(2, 0, Row::At(0), 3, 4)];
    let out = compact(&input, 12);
    let ids: Vec<u64> = out.iter().map(|r| r.instance_id.get()).collect();
    assert_eq!(ids, vec![5, 2]);
    assert_eq!(rows(&out), vec![4, 0]);
}

#[test]
fn correct_bounds_clamps_into_grid() {
    let fixed = correct_bounds(rec(0, 11, Row::At(0), 4, 0), 12);
    assert_eq!((fixed.x, fixed.width, fixed.height), (8, 4, 1));

    let fixed = correct_bounds(rec(0, 3, Row::At(0), 30, 2), 12);
    assert_eq!((fixed.x, fixed.width), (0, 12));

    let fixed = correct_bounds(rec(0, 0, Row::At(0), 0, 2), 12);
    assert_eq!(fixed.width, 1);
}

#[test]
fn compacted_layouts_are_fixed_points() {
    let mut rng = StdRng::seed_from_u64(0x7113);
    for _ in 0..200 {
        let count = rng.random_range(0..16);
        let layout = random_layout(&mut rng, count, 12);
        let once = compact(&layout, 12);
        assert_eq!(compact(&once, 12), once);
        assert!(is_compacted(&once, 12));
    }
}

#[test]
fn compaction_resolves_every_overlap() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let count = rng.random_range(0..16);
        let layout = random_layout(&mut rng, count, 12);
        let out = compact(&layout, 12);
        assert!(!has_overlap(&out));
        for record in &out {
            assert!(record.y.resolved().is_some());
            assert!(record.width >= 1 && record.height >= 1);
            assert!(record.x + record.width <= 12);
        }
    }
}

#[test]
fn is_compacted_detects_gaps() {
    let layout = [rec(0, 0, Row::At(2), 3, 4)];
    assert!(!is_compacted(&layout, 12));
}

#[test]
fn hole_under_wide_tile_is_filled() {
    let input = [
        rec(0, 0, Row::At(0), 2, 1),
        rec(1, 2, Row::At(0), 2, 10),
        rec(2, 0, Row::At(1), 4, 1),
        rec(3, 0, Row::At(5), 2, 1),
    ];
    let out = compact(&input, 12);
    assert_eq!(rows(&out), vec![0, 0, 10, 1]);
    assert!(is_compacted(&out, 12));
}

#[test]
fn tile_too_tall_for_hole_skips_it() {
    let hole = |height| {
        let input = [
            rec(0, 0, Row::At(0), 2, 1),
            rec(1, 2, Row::At(0), 2, 4),
            rec(2, 0, Row::At(1), 4, 1),
            rec(3, 0, Row::At(2), 2, height),
        ];
        rows(&compact(&input, 12))
    };
    // Rows 1..4 of columns 0..2 are free under the wide tile.
    assert_eq!(hole(3), vec![0, 0, 4, 1]);
    assert_eq!(hole(4), vec![0, 0, 4, 5]);
}
