//! Property tests for the line diff engine.

use proptest::prelude::*;

use md_collab::domain::diff::{apply_diff, split_lines, DiffEngine, DiffOp, DiffStats};

/// Texts over a tiny line alphabet so that common subsequences are likely.
fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["alpha", "beta", "gamma", "", "# heading"]),
        0..40,
    )
    .prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn replaying_the_diff_rebuilds_the_new_text(old in text(), new in text()) {
        let ops = DiffEngine::default().compute(&old, &new);
        prop_assert_eq!(apply_diff(&old, &ops).unwrap(), new);
    }

    #[test]
    fn linear_space_strategy_is_also_replayable(old in text(), new in text()) {
        let ops = DiffEngine::new(1).compute(&old, &new);
        prop_assert_eq!(apply_diff(&old, &ops).unwrap(), new);
    }

    #[test]
    fn both_strategies_keep_the_same_number_of_lines(old in text(), new in text()) {
        let table = DiffStats::from_lines(&DiffEngine::default().compute(&old, &new));
        let linear = DiffStats::from_lines(&DiffEngine::new(1).compute(&old, &new));
        prop_assert_eq!(table.unchanged, linear.unchanged);
        prop_assert_eq!(table.additions, linear.additions);
        prop_assert_eq!(table.deletions, linear.deletions);
    }

    #[test]
    fn line_numbers_walk_both_sides_in_order(old in text(), new in text()) {
        let ops = DiffEngine::default().compute(&old, &new);
        let old_side: Vec<usize> = ops.iter().filter_map(|l| l.old_line_no).collect();
        let new_side: Vec<usize> = ops.iter().filter_map(|l| l.new_line_no).collect();
        prop_assert_eq!(old_side, (1..=split_lines(&old).len()).collect::<Vec<_>>());
        prop_assert_eq!(new_side, (1..=split_lines(&new).len()).collect::<Vec<_>>());
    }

    #[test]
    fn identical_texts_are_all_equal(same in text()) {
        let ops = DiffEngine::default().compute(&same, &same);
        prop_assert!(ops.iter().all(|l| l.op == DiffOp::Equal));
        prop_assert_eq!(ops.len(), split_lines(&same).len());
    }
}

#[test]
fn empty_to_text_is_pure_insert() {
    let ops = DiffEngine::default().compute("", "a\nb");
    assert_eq!(ops.len(), 2);
    assert!(ops.iter().all(|l| l.op == DiffOp::Insert));
}
