use super::*;
use crate::grid::placement::has_overlap;

fn engine(total: u32, desired: u32, span: u32) -> PlacementEngine {
    PlacementEngine::new(GridConfig::new(total, desired, span).unwrap())
}

fn add(engine: &mut PlacementEngine, id: u64) -> PlacementRecord {
    let record = engine.auto_placement(InstanceId::new(id));
    engine.add_placement(record).unwrap()
}

fn geometry(record: &PlacementRecord) -> (u32, u32, u32, u32) {
    (record.x, record.y.resolved().unwrap(), record.width, record.height)
}

#[test]
fn five_tiles_fill_a_row_then_wrap() {
    let mut engine = engine(12, 4, 4);
    for id in 0..5 {
        add(&mut engine, id);
    }

    let placed: Vec<_> = engine.records().iter().map(geometry).collect();
    assert_eq!(
        placed,
        vec![(0, 0, 3, 4), (3, 0, 3, 4), (6, 0, 3, 4), (9, 0, 3, 4), (0, 4, 3, 4)]
    );
}

#[test]
fn auto_placement_leaves_row_unresolved() {
    let engine = engine(12, 4, 4);
    let record = engine.auto_placement(InstanceId::new(0));
    assert_eq!(record.y, Row::Unresolved);
    assert_eq!((record.x, record.width, record.height), (0, 3, 4));
}

#[test]
fn auto_placement_slot_tracks_current_count() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    add(&mut engine, 1);
    engine.remove(InstanceId::new(0));
    let next = engine.auto_placement(InstanceId::new(2));
    assert_eq!(next.x, 3);
}

#[test]
fn default_divisor_produces_unit_width_tiles() {
    let mut engine = PlacementEngine::new(GridConfig::default());
    for id in 0..9 {
        add(&mut engine, id);
    }
    let xs: Vec<u32> = engine.records().iter().map(|r| r.x).collect();
    assert_eq!(xs, vec![0, 1, 2, 3, 4, 5, 6, 7, 0]);
    assert_eq!(engine.records()[8].y, Row::At(4));
}

#[test]
fn new_tile_lands_beneath_tallest_tile_in_its_columns() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    let mut tall = *engine.get(InstanceId::new(0)).unwrap();
    tall.height = 10;
    engine.replace_layout(vec![tall]).unwrap();

    for id in 1..5 {
        add(&mut engine, id);
    }
    assert_eq!(engine.get(InstanceId::new(4)).unwrap().y, Row::At(10));
}

#[test]
fn duplicate_add_is_rejected() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    let again = engine.auto_placement(InstanceId::new(0));
    assert_eq!(engine.add_placement(again), Err(PlacementError::DuplicatePlacement(InstanceId::new(0))));
    assert_eq!(engine.len(), 1);
}

#[test]
fn remove_absent_is_noop() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    assert!(!engine.remove(InstanceId::new(9)));
    assert_eq!(engine.len(), 1);
}

#[test]
fn remove_middle_closes_gap() {
    let mut engine = engine(12, 1, 4);
    for id in 0..3 {
        add(&mut engine, id);
    }
    let before: Vec<_> = engine.records().iter().map(|r| r.y).collect();
    assert_eq!(before, vec![Row::At(0), Row::At(4), Row::At(8)]);

    assert!(engine.remove(InstanceId::new(1)));
    let after: Vec<_> = engine.records().iter().map(|r| (r.instance_id.get(), r.y)).collect();
    assert_eq!(after, vec![(0, Row::At(0)), (2, Row::At(4))]);
}

#[test]
fn add_then_remove_restores_layout() {
    let mut engine = engine(12, 4, 4);
    for id in 0..6 {
        add(&mut engine, id);
    }
    let before = engine.records().to_vec();

    add(&mut engine, 99);
    assert!(engine.remove(InstanceId::new(99)));
    assert_eq!(engine.records(), before.as_slice());
}

#[test]
fn replace_layout_compacts_overlapping_proposal() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    add(&mut engine, 1);

    let proposed = vec![
        PlacementRecord { instance_id: InstanceId::new(0), x: 0, y: Row::At(0), width: 6, height: 4 },
        PlacementRecord { instance_id: InstanceId::new(1), x: 2, y: Row::At(1), width: 6, height: 4 },
    ];
    engine.replace_layout(proposed).unwrap();
    assert!(!has_overlap(engine.records()));
    assert_eq!(engine.get(InstanceId::new(1)).unwrap().y, Row::At(4));
}

#[test]
fn replace_layout_rejects_repeated_ids_and_keeps_state() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    let before = engine.records().to_vec();

    let record = before[0];
    let err = engine.replace_layout(vec![record, record]).unwrap_err();
    assert_eq!(err, PlacementError::DuplicatePlacement(InstanceId::new(0)));
    assert_eq!(engine.records(), before.as_slice());
}

#[test]
fn replace_layout_clamps_out_of_bounds() {
    let mut engine = engine(12, 4, 4);
    add(&mut engine, 0);
    engine
        .replace_layout(vec![PlacementRecord {
            instance_id: InstanceId::new(0),
            x: 20,
            y: Row::At(3),
            width: 5,
            height: 2,
        }])
        .unwrap();
    assert_eq!(geometry(&engine.records()[0]), (7, 0, 5, 2));
}
