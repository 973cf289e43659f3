use statchart::charts::axis::{skip_label_indices, tick_label_indices};
use statchart::charts::pipeline::resolve_boundary_gap;

#[test]
fn explicit_boundary_gap_wins() {
    assert!(!resolve_boundary_gap(Some(false), Some(true), 800, 3));
    assert!(resolve_boundary_gap(Some(true), None, 100, 50));
}

#[test]
fn chart_default_applies_before_density() {
    assert!(resolve_boundary_gap(None, Some(true), 400, 100));
}

#[test]
fn dense_categories_drop_the_gap() {
    assert!(!resolve_boundary_gap(None, None, 400, 20));
    assert!(resolve_boundary_gap(None, None, 800, 5));
    assert!(resolve_boundary_gap(None, None, 10, 1));
}

#[test]
fn tick_labels_are_evenly_spread() {
    assert_eq!(tick_label_indices(11, 6), [0, 2, 4, 6, 8, 10]);
    assert_eq!(tick_label_indices(10, 4), [0, 3, 6, 9]);
    assert_eq!(tick_label_indices(10, 6), [0, 2, 4, 5, 7, 9]);
}

#[test]
fn tick_labels_degenerate_counts() {
    assert!(tick_label_indices(0, 5).is_empty());
    assert!(tick_label_indices(5, 0).is_empty());
    assert_eq!(tick_label_indices(5, 1), [0]);
    assert_eq!(tick_label_indices(3, 8), [0, 1, 2]);
}

#[test]
fn skipped_labels_keep_the_last() {
    assert_eq!(skip_label_indices(7, 2), [0, 3, 6]);
    assert_eq!(skip_label_indices(6, 2), [0, 3, 5]);
    assert_eq!(skip_label_indices(4, 0), [0, 1, 2, 3]);
}

mod properties {
    use proptest::prelude::*;
    use statchart::charts::axis::tick_label_indices;

    proptest! {
        #[test]
        fn ticks_include_both_ends(count in 2usize..200, target in 2usize..20) {
            let ticks = tick_label_indices(count, target);
            prop_assert_eq!(ticks.first().copied(), Some(0));
            prop_assert_eq!(ticks.last().copied(), Some(count - 1));
            prop_assert!(ticks.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
