// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Projecting pavings onto a subset of the axes.

use tessella_grid::{BinaryWord, Grid, grid};

use crate::cell::GridCell;
use crate::set::GridTreeSet;

/// Project a cell onto `projected_grid` by keeping exactly the word bits
/// whose axis is listed in `indices`, preserving their order. The height is
/// unchanged.
pub fn project_down_cell(
    cell: &GridCell,
    projected_grid: &Grid,
    indices: &[usize],
) -> GridCell {
    let dimension = cell.dimension();
    let mut word = BinaryWord::new();
    for (i, bit) in cell.word().iter().enumerate() {
        let axis = i % dimension;
        if indices.contains(&axis) {
            word.push(bit);
        }
    }
    GridCell::new(projected_grid.clone(), cell.height(), word)
}

/// Project a paving onto the axes listed in `indices`.
pub fn project_down(set: &GridTreeSet, indices: &[usize]) -> GridTreeSet {
    assert!(!indices.is_empty(), "projection must keep at least one axis");
    assert!(
        indices.iter().all(|&i| i < set.dimension()),
        "projection index out of range"
    );
    let projected_grid = grid::project_down(set.grid(), indices);
    let mut result = GridTreeSet::new(projected_grid.clone());
    for cell in set {
        result.adjoin(&project_down_cell(&cell, &projected_grid, indices));
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_word_keeps_selected_axes() {
        let grid = Grid::unit(3);
        let cell = GridCell::new(
            grid,
            0,
            BinaryWord::from([false, true, false, true, true, false]),
        );
        let projected_grid = Grid::unit(2);
        let projected = project_down_cell(&cell, &projected_grid, &[0, 2]);
        assert_eq!(
            projected.word(),
            &BinaryWord::from([false, false, true, false])
        );
        assert_eq!(projected.height(), 0);
    }

    #[test]
    fn paving_projection_collapses_the_dropped_axis() {
        let grid = Grid::unit(2);
        let mut set = GridTreeSet::new(grid.clone());
        // Two cells stacked in axis 1 over the same axis-0 interval.
        set.adjoin(&GridCell::new(
            grid.clone(),
            0,
            BinaryWord::from([false, false]),
        ));
        set.adjoin(&GridCell::new(
            grid.clone(),
            0,
            BinaryWord::from([false, true]),
        ));

        let projected = project_down(&set, &[0]);
        assert_eq!(projected.dimension(), 1);
        // Both cells project onto the same interval [0, 0.5].
        assert_eq!(projected.size(), 1);
        assert_eq!(projected.measure(), 0.5);
    }
}
