// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Algebraic laws of the paving operations over randomly generated pavings.

use proptest::prelude::*;

use tessella_grid::{BinaryWord, Grid};
use tessella_paving::{
    GridCell, GridTreeSet, difference, intersection, join, overlap, subset,
};

/// A paving on the 2-D unit grid built by adjoining height-0 cells.
fn paving(words: &[Vec<bool>]) -> GridTreeSet {
    let grid = Grid::unit(2);
    let mut set = GridTreeSet::new(grid.clone());
    for bits in words {
        set.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from(&bits[..])));
    }
    set
}

fn equivalent(a: &GridTreeSet, b: &GridTreeSet) -> bool {
    subset(&a.as_subset(), &b.as_subset()) && subset(&b.as_subset(), &a.as_subset())
}

fn words() -> impl Strategy<Value = Vec<Vec<bool>>> {
    prop::collection::vec(prop::collection::vec(any::<bool>(), 0..6), 0..8)
}

proptest! {
    #[test]
    fn join_and_intersection_are_idempotent(w in words()) {
        let a = paving(&w);
        prop_assert!(equivalent(&join(&a.as_subset(), &a.as_subset()), &a));
        prop_assert!(equivalent(&intersection(&a.as_subset(), &a.as_subset()), &a));
        prop_assert!(difference(&a.as_subset(), &a.as_subset()).is_empty());
    }

    #[test]
    fn join_and_intersection_are_commutative(wa in words(), wb in words()) {
        let a = paving(&wa);
        let b = paving(&wb);
        prop_assert!(equivalent(
            &join(&a.as_subset(), &b.as_subset()),
            &join(&b.as_subset(), &a.as_subset()),
        ));
        prop_assert!(equivalent(
            &intersection(&a.as_subset(), &b.as_subset()),
            &intersection(&b.as_subset(), &a.as_subset()),
        ));
    }

    #[test]
    fn join_is_associative(wa in words(), wb in words(), wc in words()) {
        let (a, b, c) = (paving(&wa), paving(&wb), paving(&wc));
        let left = join(&join(&a.as_subset(), &b.as_subset()).as_subset(), &c.as_subset());
        let right = join(&a.as_subset(), &join(&b.as_subset(), &c.as_subset()).as_subset());
        prop_assert!(equivalent(&left, &right));
    }

    #[test]
    fn overlap_agrees_with_intersection(wa in words(), wb in words()) {
        let a = paving(&wa);
        let b = paving(&wb);
        let meets = overlap(&a.as_subset(), &b.as_subset());
        let common = intersection(&a.as_subset(), &b.as_subset());
        prop_assert_eq!(meets, !common.is_empty());
    }

    #[test]
    fn operands_bound_the_results(wa in words(), wb in words()) {
        let a = paving(&wa);
        let b = paving(&wb);
        let union = join(&a.as_subset(), &b.as_subset());
        let common = intersection(&a.as_subset(), &b.as_subset());
        let diff = difference(&a.as_subset(), &b.as_subset());
        prop_assert!(subset(&a.as_subset(), &union.as_subset()));
        prop_assert!(subset(&common.as_subset(), &a.as_subset()));
        prop_assert!(subset(&common.as_subset(), &b.as_subset()));
        prop_assert!(subset(&diff.as_subset(), &a.as_subset()));
        prop_assert!(!overlap(&diff.as_subset(), &b.as_subset()));
    }

    #[test]
    fn difference_and_intersection_partition(wa in words(), wb in words()) {
        let a = paving(&wa);
        let b = paving(&wb);
        let common = intersection(&a.as_subset(), &b.as_subset());
        let diff = difference(&a.as_subset(), &b.as_subset());
        let rebuilt = join(&diff.as_subset(), &common.as_subset());
        prop_assert!(equivalent(&rebuilt, &a));
        // Cell measures are dyadic, so the inclusion-exclusion sum is exact.
        let union = join(&a.as_subset(), &b.as_subset());
        prop_assert_eq!(
            union.measure(),
            a.measure() + b.measure() - common.measure()
        );
    }

    #[test]
    fn re_rooting_preserves_the_set(w in words(), lift in 1usize..4) {
        let a = paving(&w);
        let mut lifted = a.clone();
        lifted.up_to_primary_cell(a.cell().height() + lift);
        prop_assert!(equivalent(&lifted, &a));
        prop_assert_eq!(lifted.measure(), a.measure());
    }

    #[test]
    fn neighbors_shift_by_one_cell_width(
        bits in prop::collection::vec(any::<bool>(), 0..7),
        axis in 0usize..2,
    ) {
        let cell = GridCell::new(Grid::unit(2), 0, BinaryWord::from(&bits[..]));
        let neighbor = cell.neighboring_cell(axis);
        let from = cell.lattice_box();
        let to = neighbor.lattice_box();
        prop_assert_eq!(to[axis].lo, from[axis].hi);
        prop_assert_eq!(to[axis].width(), from[axis].width());
        let other = 1 - axis;
        prop_assert_eq!(to[other].lo, from[other].lo);
        prop_assert_eq!(to[other].hi, from[other].hi);
    }

    #[test]
    fn serialization_round_trips(w in words()) {
        let a = paving(&w);
        let (tree, leaves) = a.to_binary_words();
        let rebuilt = GridTreeSet::from_words(Grid::unit(2), a.cell().height(), &tree, &leaves);
        prop_assert!(equivalent(&rebuilt, &a));
    }
}

#[test]
fn file_round_trip_restores_the_cells() {
    let grid = Grid::unit(2);
    let mut set = GridTreeSet::new(grid.clone());
    for bits in [&[false][..], &[true, false, true][..], &[true, true][..]] {
        set.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from(bits)));
    }
    let cells_before: Vec<_> = set.iter().collect();

    let mut path = std::env::temp_dir();
    path.push(format!("tessella_set_algebra_{}", std::process::id()));
    set.export_to_file(&path).unwrap();
    assert!(set.is_empty());
    set.import_from_file(&path).unwrap();

    let cells_after: Vec<_> = set.iter().collect();
    assert_eq!(cells_after, cells_before);
}
