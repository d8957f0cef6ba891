// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paving basics.
//!
//! Build two pavings on the unit grid, combine them, and walk the cells.
//!
//! Run:
//! - `cargo run -p tessella_demos --example paving_basics`

use tessella_grid::{BinaryWord, Grid};
use tessella_paving::{GridCell, GridTreeSet, difference, intersection, join, overlap, subset};

fn main() {
    let grid = Grid::unit(2);

    // The left half of the unit square.
    let mut left = GridTreeSet::new(grid.clone());
    left.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from([false])));

    // The bottom half.
    let mut bottom = GridTreeSet::new(grid.clone());
    bottom.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from([false, false])));
    bottom.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from([true, false])));

    let union = join(&left.as_subset(), &bottom.as_subset());
    let common = intersection(&left.as_subset(), &bottom.as_subset());
    let rest = difference(&left.as_subset(), &bottom.as_subset());

    println!("union measure:        {}", union.measure());
    println!("intersection measure: {}", common.measure());
    println!("difference measure:   {}", rest.measure());

    assert!(overlap(&left.as_subset(), &bottom.as_subset()));
    assert!(subset(&common.as_subset(), &left.as_subset()));

    println!("cells of the union:");
    for cell in &union {
        let bx = cell.space_box();
        println!(
            "  word {:?} -> [{}, {}] x [{}, {}]",
            cell.word(),
            bx[0].lo,
            bx[0].hi,
            bx[1].lo,
            bx[1].hi
        );
    }
}
