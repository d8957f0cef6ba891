// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dyadic cells of a grid and primary-cell arithmetic.
//!
//! A cell is named by a primary-cell height and a binary word of halvings.
//! Primary cells grow from the unit box by doubling along every axis at once:
//! stepping to an odd height extends the lattice interval downward, to an
//! even height upward. The previous primary cell is therefore the upper half
//! at odd heights and the lower half at even heights, which fixes the bits of
//! [`primary_cell_path`].

use core::cmp::Ordering;

use tessella_grid::{Aabb, BinaryWord, Grid, Interval};

/// Grow `interval` from the primary cell below `height` to the one at
/// `height`.
fn primary_cell_step(interval: &mut Interval, height: usize) {
    let width = interval.width();
    if height % 2 == 1 {
        interval.lo -= width;
    } else {
        interval.hi += width;
    }
}

/// The per-axis lattice interval of the primary cell at `height`.
pub fn primary_cell_interval(height: usize) -> Interval {
    let mut interval = Interval::new(0.0, 1.0);
    for h in 1..=height {
        primary_cell_step(&mut interval, h);
    }
    interval
}

/// The lattice box of the primary cell at `height` in `dimension` axes.
pub fn primary_cell_lattice_box(height: usize, dimension: usize) -> Aabb {
    Aabb::uniform(dimension, primary_cell_interval(height))
}

/// The path from the primary cell at `top_height` down to the one at
/// `bottom_height`: for each intermediate height, `dimension` identical bits,
/// `true` when that height is odd.
pub fn primary_cell_path(
    dimension: usize,
    top_height: usize,
    bottom_height: usize,
) -> BinaryWord {
    assert!(
        top_height >= bottom_height,
        "the path runs from the higher primary cell down"
    );
    let mut path = BinaryWord::new();
    for height in ((bottom_height + 1)..=top_height).rev() {
        let odd = height % 2 == 1;
        for _ in 0..dimension {
            path.push(odd);
        }
    }
    path
}

/// The height of the smallest primary cell strictly containing
/// `lattice_box`. Terminates because primary cells grow without bound.
pub fn smallest_enclosing_primary_cell_height(lattice_box: &Aabb) -> usize {
    let mut height = 0;
    let mut interval = Interval::new(0.0, 1.0);
    loop {
        let primary = Aabb::uniform(lattice_box.dimension(), interval);
        if lattice_box.inside(&primary) {
            return height;
        }
        height += 1;
        primary_cell_step(&mut interval, height);
    }
}

/// [`smallest_enclosing_primary_cell_height`] for a box in Euclidean space.
pub fn smallest_enclosing_primary_cell_height_on_grid(space_box: &Aabb, grid: &Grid) -> usize {
    smallest_enclosing_primary_cell_height(&grid.to_lattice(space_box))
}

/// A closed dyadic cell: a grid, a primary-cell height, and the word of
/// halvings leading from the primary cell to the cell.
///
/// The cell's box is always derived from the triple, never stored mutably.
/// Cells are small values; copies are cheap relative to tree operations.
#[derive(Clone, Debug)]
pub struct GridCell {
    grid: Grid,
    height: usize,
    word: BinaryWord,
}

impl GridCell {
    /// Create a cell from its naming triple.
    pub fn new(grid: Grid, height: usize, word: BinaryWord) -> Self {
        Self { grid, height, word }
    }

    /// The primary cell of the smallest height enclosing `space_box`.
    pub fn smallest_enclosing_primary_cell(space_box: &Aabb, grid: &Grid) -> Self {
        let height = smallest_enclosing_primary_cell_height_on_grid(space_box, grid);
        Self::new(grid.clone(), height, BinaryWord::new())
    }

    /// The grid the cell lives on.
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The height of the primary cell the word starts from.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The path from the primary cell to this cell.
    #[inline]
    pub fn word(&self) -> &BinaryWord {
        &self.word
    }

    /// The ambient dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.grid.dimension()
    }

    /// The lattice box named by `(dimension, height, word)`: the primary cell
    /// halved along cycling axes, on the lower side for `false` bits and the
    /// upper side for `true` bits.
    pub fn compute_lattice_box(dimension: usize, height: usize, word: &BinaryWord) -> Aabb {
        let mut lattice = primary_cell_lattice_box(height, dimension);
        for (i, bit) in word.iter().enumerate() {
            let axis = i % dimension;
            let interval = lattice.interval_mut(axis);
            let mid = interval.midpoint();
            if bit {
                interval.lo = mid;
            } else {
                interval.hi = mid;
            }
        }
        lattice
    }

    /// The cell's box on the lattice.
    pub fn lattice_box(&self) -> Aabb {
        Self::compute_lattice_box(self.dimension(), self.height, &self.word)
    }

    /// The cell's box in Euclidean space.
    pub fn space_box(&self) -> Aabb {
        self.grid.to_space(&self.lattice_box())
    }

    /// The child cell on the indicated side of the next halving.
    pub fn split(&self, right: bool) -> Self {
        let mut word = self.word.clone();
        word.push(right);
        Self::new(self.grid.clone(), self.height, word)
    }

    /// The adjacent cell of the same level in the positive direction of axis
    /// `dim`, re-rooting to a higher primary cell when the neighbor escapes
    /// the current one.
    pub fn neighboring_cell(&self, dim: usize) -> Self {
        let dimension = self.dimension();
        assert!(dim < dimension, "axis out of range");

        // A point past the shared face: the upper border plus half the width.
        let lattice = self.lattice_box();
        let target = lattice[dim].hi + lattice[dim].width() / 2.0;

        // The lowest primary cell whose upper border reaches that point.
        let mut needed_height = 0;
        let mut interval = Interval::new(0.0, 1.0);
        while target > interval.hi {
            needed_height += 1;
            primary_cell_step(&mut interval, needed_height);
        }

        let (height, mut word) = if needed_height > self.height {
            let mut word = primary_cell_path(dimension, needed_height, self.height);
            word.append(&self.word);
            (needed_height, word)
        } else {
            (self.height, self.word.clone())
        };

        // The last lower-half step in this axis is the point where the path
        // to the neighbor diverges; every bit of the axis from there on flips.
        let position = (0..word.len())
            .rev()
            .find(|&p| p % dimension == dim && !word[p])
            .expect("a re-rooted word has a lower half-step in every axis");
        for index in position..word.len() {
            if index % dimension == dim {
                let bit = word[index];
                word.set(index, !bit);
            }
        }

        Self::new(self.grid.clone(), height, word)
    }
}

/// The two cell words re-rooted to their common primary cell, with that
/// height. Grids must already be known equal.
pub(crate) fn aligned_words(a: &GridCell, b: &GridCell) -> (BinaryWord, BinaryWord, usize) {
    match a.height.cmp(&b.height) {
        Ordering::Equal => (a.word.clone(), b.word.clone(), a.height),
        Ordering::Greater => {
            let mut word_b = primary_cell_path(a.dimension(), a.height, b.height);
            word_b.append(&b.word);
            (a.word.clone(), word_b, a.height)
        }
        Ordering::Less => {
            let mut word_a = primary_cell_path(a.dimension(), b.height, a.height);
            word_a.append(&a.word);
            (word_a, b.word.clone(), b.height)
        }
    }
}

/// Whether cell `a` is a subset of cell `b`: after aligning to a common
/// primary cell, `b`'s word must be a prefix of `a`'s.
pub fn cell_subset(a: &GridCell, b: &GridCell) -> bool {
    assert_eq!(a.grid, b.grid, "cells must share a grid");
    let (word_a, word_b, _) = aligned_words(a, b);
    word_b.is_prefix_of(&word_a)
}

impl PartialEq for GridCell {
    fn eq(&self, other: &Self) -> bool {
        if self.grid != other.grid {
            return false;
        }
        let (word_a, word_b, _) = aligned_words(self, other);
        word_a == word_b
    }
}

impl Eq for GridCell {}

impl PartialOrd for GridCell {
    /// Cells on the same grid order by their height-aligned words,
    /// lexicographically. Cells on different grids are unordered.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.grid != other.grid {
            return None;
        }
        let (word_a, word_b, _) = aligned_words(self, other);
        Some(word_a.cmp(&word_b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_cells_nest() {
        assert_eq!(primary_cell_interval(0), Interval::new(0.0, 1.0));
        assert_eq!(primary_cell_interval(1), Interval::new(-1.0, 1.0));
        assert_eq!(primary_cell_interval(2), Interval::new(-1.0, 3.0));
        assert_eq!(primary_cell_interval(3), Interval::new(-5.0, 3.0));
        for h in 1..8 {
            let inner = Aabb::uniform(2, primary_cell_interval(h - 1));
            let outer = Aabb::uniform(2, primary_cell_interval(h));
            assert!(inner.is_subset(&outer));
        }
    }

    #[test]
    fn path_alternates_with_parity() {
        assert_eq!(
            primary_cell_path(2, 3, 1),
            BinaryWord::from([true, true, false, false])
        );
        assert_eq!(primary_cell_path(2, 5, 5), BinaryWord::new());
        // Following the path from the higher cell reproduces the lower cell.
        let word = primary_cell_path(2, 3, 0);
        let lattice = GridCell::compute_lattice_box(2, 3, &word);
        assert_eq!(lattice, Aabb::unit(2));
    }

    #[test]
    fn lattice_box_halves_cycling_axes() {
        let word = BinaryWord::from([false, false, true, true]);
        let lattice = GridCell::compute_lattice_box(2, 0, &word);
        assert_eq!(lattice, Aabb::from_corners(&[0.25, 0.25], &[0.5, 0.5]));
    }

    #[test]
    fn enclosing_height_is_strict() {
        let snug = Aabb::from_corners(&[0.25, 0.25], &[0.5, 0.5]);
        assert_eq!(smallest_enclosing_primary_cell_height(&snug), 0);
        // The unit box touches the primary cells up to height 2.
        assert_eq!(smallest_enclosing_primary_cell_height(&Aabb::unit(2)), 2);
    }

    #[test]
    fn neighbor_shifts_by_one_width() {
        let grid = Grid::unit(2);
        let cell = GridCell::new(grid.clone(), 0, BinaryWord::from([false, false]));
        let neighbor = cell.neighboring_cell(0);
        assert_eq!(
            neighbor.lattice_box(),
            Aabb::from_corners(&[0.5, 0.0], &[1.0, 0.5])
        );
        assert_eq!(neighbor.height(), 0);
    }

    #[test]
    fn neighbor_of_primary_cell_re_roots() {
        let grid = Grid::unit(2);
        let cell = GridCell::new(grid, 0, BinaryWord::new());
        let neighbor = cell.neighboring_cell(0);
        assert_eq!(neighbor.height(), 2);
        assert_eq!(
            neighbor.lattice_box(),
            Aabb::from_corners(&[1.0, 0.0], &[2.0, 1.0])
        );
    }

    #[test]
    fn cells_compare_across_heights() {
        let grid = Grid::unit(1);
        // At height 1 the word [true] names the unit cell itself.
        let low = GridCell::new(grid.clone(), 0, BinaryWord::new());
        let lifted = GridCell::new(grid.clone(), 1, BinaryWord::from([true]));
        assert_eq!(low, lifted);
        let left = GridCell::new(grid.clone(), 1, BinaryWord::from([false]));
        assert!(left < lifted);
        assert!(cell_subset(&low, &lifted));
    }

    #[test]
    fn subcells_are_subsets() {
        let grid = Grid::unit(2);
        let parent = GridCell::new(grid.clone(), 0, BinaryWord::from([true]));
        let child = parent.split(false);
        assert!(cell_subset(&child, &parent));
        assert!(!cell_subset(&parent, &child));
    }
}
