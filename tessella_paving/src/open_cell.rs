// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open cells: a closed cell extended by its own width in every positive
//! direction.
//!
//! An open cell is named like a closed cell, by `(grid, height, word)`; the
//! word names its *base cell*, the lower-left closed cell of the region. The
//! open set it represents is the interior of the base cell doubled along
//! every axis, and its closure is exactly the union of the 2ᵈ closed
//! neighbors of the base cell at the same level.

use alloc::vec::Vec;

use tessella_grid::{Aabb, BinaryWord, Grid, Tribool};

use crate::cell::{
    GridCell, primary_cell_path, smallest_enclosing_primary_cell_height_on_grid,
};
use crate::set::GridTreeSet;

impl GridCell {
    /// The interior of this cell as an open cell.
    ///
    /// The base cell of the interior is the lower-left sub-quadrant, so the
    /// word grows by one `false` bit per axis while the covered region stays
    /// the cell itself.
    pub fn interior(&self) -> GridOpenCell {
        let mut word = self.word().clone();
        for _ in 0..self.dimension() {
            word.push(false);
        }
        GridOpenCell::new(self.grid().clone(), self.height(), word)
    }
}

/// An open cell of the grid.
#[derive(Clone, Debug)]
pub struct GridOpenCell {
    grid: Grid,
    height: usize,
    word: BinaryWord,
}

impl GridOpenCell {
    /// Create an open cell from the naming triple of its base cell.
    pub fn new(grid: Grid, height: usize, word: BinaryWord) -> Self {
        Self { grid, height, word }
    }

    /// The grid the open cell lives on.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The primary-cell height of the base cell.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The word naming the base cell.
    #[inline]
    pub fn word(&self) -> &BinaryWord {
        &self.word
    }

    /// The ambient dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    /// The base cell: the lower-left closed cell of the open region.
    pub fn base_cell(&self) -> GridCell {
        GridCell::new(self.grid.clone(), self.height, self.word.clone())
    }

    /// The box of the open region in Euclidean space: the base cell's
    /// lattice box doubled in the positive direction on every axis.
    pub fn space_box(&self) -> Aabb {
        let mut lattice = GridCell::compute_lattice_box(self.dimension(), self.height, &self.word);
        for axis in 0..self.dimension() {
            let interval = lattice.interval_mut(axis);
            interval.hi += interval.width();
        }
        self.grid.to_space(&lattice)
    }

    /// One of the three sub-open-cells of the next level: `False` is the
    /// left sub-cell, `Indeterminate` the middle one, and `True` the right
    /// one, whose base cell is the neighbor of this base cell in the current
    /// axis (which may re-root to a higher primary cell).
    pub fn split(&self, side: Tribool) -> Self {
        match side {
            Tribool::Indeterminate => {
                let mut word = self.word.clone();
                word.push(true);
                Self::new(self.grid.clone(), self.height, word)
            }
            Tribool::False => {
                let mut word = self.word.clone();
                word.push(false);
                Self::new(self.grid.clone(), self.height, word)
            }
            Tribool::True => {
                // The axis of the *next* split, not of the last one.
                let axis = self.word.len() % self.dimension();
                let neighbor = self.base_cell().neighboring_cell(axis);
                let mut word = neighbor.word().clone();
                word.push(false);
                Self::new(self.grid.clone(), neighbor.height(), word)
            }
        }
    }

    /// The smallest open sub-cell of `open` still covering `bx`, or `None`
    /// when `open` itself does not cover it. Probes the three sub-cells in
    /// left, middle, right order.
    pub fn smallest_open_subcell(open: Self, bx: &Aabb) -> Option<Self> {
        if !open.space_box().covers(bx).definitely() {
            return None;
        }
        let found = Self::smallest_open_subcell(open.split(Tribool::False), bx)
            .or_else(|| Self::smallest_open_subcell(open.split(Tribool::Indeterminate), bx))
            .or_else(|| Self::smallest_open_subcell(open.split(Tribool::True), bx));
        Some(found.unwrap_or(open))
    }

    /// The smallest open cell covering `bx` on `grid`.
    ///
    /// `bx` must have nonempty interior; a degenerate box is covered by
    /// arbitrarily small open cells and the search would not terminate.
    pub fn outer_approximation(bx: &Aabb, grid: &Grid) -> Self {
        assert!(
            bx.has_interior(),
            "outer approximation needs a box with nonempty interior"
        );
        let primary = GridCell::smallest_enclosing_primary_cell(bx, grid);
        Self::smallest_open_subcell(primary.interior(), bx)
            .expect("the enclosing primary cell interior covers the box")
    }

    /// The closure of the open cell as a paving: the 2ᵈ closed neighbors of
    /// the base cell at the same level.
    pub fn closure(&self) -> GridTreeSet {
        let height = smallest_enclosing_primary_cell_height_on_grid(&self.space_box(), &self.grid);
        let (height, base_word) = if height > self.height {
            let mut word = primary_cell_path(self.dimension(), height, self.height);
            word.append(&self.word);
            (height, word)
        } else {
            (self.height, self.word.clone())
        };

        let mut result = GridTreeSet::with_height(self.grid.clone(), height);
        let mut position = BinaryWord::new();
        self.adjoin_neighboring_cells(height, &base_word, &mut position, &mut result);
        result
    }

    /// Enumerate every bit vector of length `d` as `position` and adjoin the
    /// corresponding neighbor of the base cell.
    fn adjoin_neighboring_cells(
        &self,
        height: usize,
        base_word: &BinaryWord,
        position: &mut BinaryWord,
        result: &mut GridTreeSet,
    ) {
        if position.len() < self.dimension() {
            position.push(false);
            self.adjoin_neighboring_cells(height, base_word, position, result);
            position.pop();
            position.push(true);
            self.adjoin_neighboring_cells(height, base_word, position, result);
            position.pop();
        } else {
            result.adjoin(&Self::neighboring_cell(
                self.grid.clone(),
                height,
                base_word,
                position,
            ));
        }
    }

    /// The closed cell displaced from the base cell by one cell width in
    /// every axis where `position` holds a `true` bit.
    ///
    /// For each such axis the word flips from the last lower-half step on;
    /// axes whose bit is `false` keep their path untouched.
    pub fn neighboring_cell(
        grid: Grid,
        height: usize,
        base_word: &BinaryWord,
        position: &BinaryWord,
    ) -> GridCell {
        let dimension = grid.dimension();
        let no_inverse = base_word.len();
        let mut invert_from = alloc::vec![no_inverse; dimension];
        let wanted = position.iter().filter(|&bit| bit).count();

        let mut word = base_word.clone();
        let mut first_inverse = no_inverse;
        if wanted > 0 {
            let mut found = 0;
            for index in (0..word.len()).rev() {
                let axis = index % dimension;
                if position[axis] && !word[index] && invert_from[axis] == no_inverse {
                    invert_from[axis] = index;
                    if index < first_inverse {
                        first_inverse = index;
                    }
                    found += 1;
                    if found == wanted {
                        break;
                    }
                }
            }
        }

        for index in first_inverse..word.len() {
            let axis = index % dimension;
            if position[axis] && index >= invert_from[axis] {
                let bit = word[index];
                word.set(index, !bit);
            }
        }

        GridCell::new(grid, height, word)
    }

    /// Open cells lying within the intersection of two open cells.
    ///
    /// When neither covers the other, the closures intersect as pavings and
    /// every cell of the intersection contributes its interior plus an open
    /// cell over each face it shares with another cell of the intersection.
    pub fn intersection(a: &Self, b: &Self) -> Vec<Self> {
        let mut result = Vec::new();
        let box_a = a.space_box();
        let box_b = b.space_box();
        if box_a.covers(&box_b).definitely() {
            result.push(b.clone());
        } else if box_b.covers(&box_a).definitely() {
            result.push(a.clone());
        } else if box_a.overlaps(&box_b).definitely() {
            let closure_a = a.closure();
            let closure_b = b.closure();
            let common =
                crate::set::intersection(&closure_a.as_subset(), &closure_b.as_subset());
            for cell in &common {
                let mut position = BinaryWord::new();
                cover_cell_and_borders(&cell, &common, &mut position, &mut result);
            }
        }
        result
    }
}

/// For every neighbor position of `cell` that is also enabled in `set`, emit
/// the open cell covering `cell` and the shared face toward that neighbor.
fn cover_cell_and_borders(
    cell: &GridCell,
    set: &GridTreeSet,
    position: &mut BinaryWord,
    result: &mut Vec<GridOpenCell>,
) {
    let dimension = cell.dimension();
    if position.len() < dimension {
        position.push(false);
        cover_cell_and_borders(cell, set, position, result);
        position.pop();
        position.push(true);
        cover_cell_and_borders(cell, set, position, result);
        position.pop();
    } else {
        let neighbor =
            GridOpenCell::neighboring_cell(cell.grid().clone(), cell.height(), cell.word(), position);
        if set.binary_tree().is_enabled_at(neighbor.word()) {
            let mut cover_word = cell.word().clone();
            // Append the position bits aligned to the axis the path ends on.
            for _ in 0..dimension {
                let bit = position[cover_word.len() % dimension];
                cover_word.push(bit);
            }
            result.push(GridOpenCell::new(
                cell.grid().clone(),
                cell.height(),
                cover_word,
            ));
        }
    }
}

impl PartialEq for GridOpenCell {
    fn eq(&self, other: &Self) -> bool {
        self.base_cell() == other.base_cell()
    }
}

impl Eq for GridOpenCell {}
