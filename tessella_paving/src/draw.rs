// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Drawing adapter: pavings render as their cell boxes on any box sink.

use tessella_grid::Aabb;

use crate::cell::GridCell;
use crate::set::GridTreeSet;
use crate::subset::GridTreeSubset;

/// A sink accepting boxes, typically backed by some plotting surface.
pub trait Canvas {
    /// Draw one box.
    fn draw(&mut self, bx: &Aabb);
}

impl GridCell {
    /// Draw the cell's box.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        canvas.draw(&self.space_box());
    }
}

impl GridTreeSubset<'_> {
    /// Draw every enabled cell, in iteration order.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for cell in self {
            cell.draw(canvas);
        }
    }
}

impl GridTreeSet {
    /// Draw every enabled cell, in iteration order.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        self.as_subset().draw(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use tessella_grid::{BinaryWord, Grid};

    struct Recorder(Vec<Aabb>);

    impl Canvas for Recorder {
        fn draw(&mut self, bx: &Aabb) {
            self.0.push(bx.clone());
        }
    }

    #[test]
    fn draws_cells_in_iteration_order() {
        let grid = Grid::unit(1);
        let mut set = GridTreeSet::new(grid.clone());
        set.adjoin(&GridCell::new(grid.clone(), 0, BinaryWord::from([false, true])));
        set.adjoin(&GridCell::new(grid, 0, BinaryWord::from([true])));

        let mut canvas = Recorder(Vec::new());
        set.draw(&mut canvas);
        assert_eq!(
            canvas.0,
            alloc::vec![
                Aabb::from_corners(&[0.25], &[0.5]),
                Aabb::from_corners(&[0.5], &[1.0]),
            ]
        );
    }
}
