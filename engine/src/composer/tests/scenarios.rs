//! End-to-end composition scenarios against the shared stub model.

use crate::composer::testutil::test_model;
use crate::composer::{OverrideType, ReadingGrid};

fn composed(grid: &ReadingGrid) -> Vec<String> {
    grid.walk().values_as_strings()
}

#[test]
fn test_walk_prefers_long_phrase() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    assert!(grid.insert_reading("gao"));
    assert!(grid.insert_reading("ke"));
    assert!(grid.insert_reading("ji"));

    // 高科技 at -6.0 beats 高 + 科技 (-8.3), 高科 + 技 (-8.6) and the
    // all-singles path (-9.0).
    assert_eq!(composed(&grid), ["高科技"]);
    let result = grid.walk();
    assert_eq!(result.nodes.len(), 1);
    assert_eq!(result.nodes[0].borrow().spanning_length(), 3);
}

#[test]
fn test_hard_override_splits_phrase() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    assert!(grid.override_candidate_with_value(0, "高", OverrideType::HighScore));
    // The pinned node scores 0, so 高 + 科技 (-5.4) now beats 高科技 (-6.0).
    assert_eq!(composed(&grid), ["高", "科技"]);
}

#[test]
fn test_hard_override_of_lower_ranked_candidate() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    assert!(grid.override_candidate_with_value(0, "膏", OverrideType::HighScore));
    assert_eq!(composed(&grid), ["膏", "科技"]);
}

#[test]
fn test_soft_override_keeps_better_phrase() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    assert!(grid.override_candidate_with_value(0, "高", OverrideType::TopUnigramScore));
    // The soft override scores as the top unigram (-2.9); 高 + 科技 totals
    // -8.3, so 高科技 (-6.0) still wins.
    assert_eq!(composed(&grid), ["高科技"]);

    // The selection itself is kept on the node, ready if a later edit makes
    // the short span win.
    let node = grid
        .find_in_span(0, |n| n.borrow().reading() == "gao")
        .unwrap();
    assert!(node.borrow().is_overridden());
    assert_eq!(node.borrow().value(), "高");
}

#[test]
fn test_insertion_invalidates_straddling_nodes() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    grid.set_cursor(1);
    assert!(grid.insert_reading("xin"));
    assert_eq!(grid.readings(), ["gao", "xin", "ke", "ji"]);

    // Nothing may straddle the splice point: every node overlapping
    // position 1 is the single-reading "xin" node.
    for nis in grid.overlapping_nodes_at(1) {
        assert_eq!(nis.node.borrow().spanning_length(), 1);
        assert_eq!(nis.node.borrow().reading(), "xin");
    }
    assert_eq!(composed(&grid), ["高", "新", "科技"]);
}

#[test]
fn test_delete_restores_phrase() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");
    grid.set_cursor(1);
    grid.insert_reading("xin");

    assert!(grid.delete_reading_before_cursor());
    assert_eq!(grid.readings(), ["gao", "ke", "ji"]);
    assert_eq!(grid.cursor(), 1);
    assert_eq!(composed(&grid), ["高科技"]);
}

#[test]
fn test_candidate_listing_order() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    // Longer words first; within a length, nodes starting at the location
    // precede nodes extending through it; within a node, adapter order.
    let values: Vec<String> = grid
        .candidates_at(1)
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(values, ["高科技", "科技", "高科", "科", "课"]);
}

#[test]
fn test_candidates_at_end_of_composition() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    // Location 3 (the cursor after typing) addresses the last reading.
    let values: Vec<String> = grid
        .candidates_at(3)
        .into_iter()
        .map(|c| c.value)
        .collect();
    assert_eq!(values, ["高科技", "科技", "技"]);
}

#[test]
fn test_override_resets_conflicting_overrides() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    // Pin the singles 高 and 课 first.
    assert!(grid.override_candidate_with_value(0, "高", OverrideType::HighScore));
    assert!(grid.override_candidate_with_value(1, "课", OverrideType::HighScore));
    assert_eq!(composed(&grid), ["高", "课", "技"]);

    // Choosing 高科技 covers both; their overrides must be cleared, not
    // left to bias walks after the next edit.
    assert!(grid.override_candidate_with_value(0, "高科技", OverrideType::HighScore));
    assert_eq!(composed(&grid), ["高科技"]);

    let gao = grid
        .find_in_span(0, |n| n.borrow().reading() == "gao")
        .unwrap();
    let ke = grid
        .find_in_span(1, |n| n.borrow().reading() == "ke")
        .unwrap();
    assert!(!gao.borrow().is_overridden());
    assert_eq!(ke.borrow().value(), "科");
    assert!(!ke.borrow().is_overridden());
}

#[test]
fn test_override_survives_adjacent_edit() {
    let lm = test_model();
    let mut grid = ReadingGrid::new(&lm);
    grid.insert_reading("gao");
    grid.insert_reading("ke");
    grid.insert_reading("ji");

    assert!(grid.override_candidate_with_value(0, "膏", OverrideType::HighScore));
    assert_eq!(composed(&grid), ["膏", "科技"]);

    // Deleting the trailing reading leaves the pinned node untouched: the
    // refresh skips cells whose reading still matches.
    grid.set_cursor(3);
    assert!(grid.delete_reading_before_cursor());
    assert_eq!(grid.readings(), ["gao", "ke"]);
    assert_eq!(composed(&grid), ["膏", "科"]);
}
