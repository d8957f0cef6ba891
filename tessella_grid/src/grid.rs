// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An infinite, uniform grid of boxes in Euclidean space.

use alloc::vec::Vec;
use core::fmt;

use crate::types::{Aabb, Interval};

/// The affine map between the integer lattice and Euclidean coordinates.
///
/// A lattice coordinate `q` maps to the point `origin + lengths ⊙ q`. The
/// grid is a small value type; cells and pavings hold their grid by value and
/// compare grids structurally.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    origin: Vec<f64>,
    lengths: Vec<f64>,
}

impl Grid {
    /// The unit grid of the given dimension: origin `0`, unit spacing.
    pub fn unit(dimension: usize) -> Self {
        assert!(dimension > 0, "grids must have at least one axis");
        Self {
            origin: alloc::vec![0.0; dimension],
            lengths: alloc::vec![1.0; dimension],
        }
    }

    /// A grid with origin `0` and the given per-axis spacing.
    pub fn with_lengths(lengths: Vec<f64>) -> Self {
        let origin = alloc::vec![0.0; lengths.len()];
        Self::new(origin, lengths)
    }

    /// A grid with the given origin and per-axis spacing.
    pub fn new(origin: Vec<f64>, lengths: Vec<f64>) -> Self {
        assert!(!lengths.is_empty(), "grids must have at least one axis");
        assert_eq!(
            origin.len(),
            lengths.len(),
            "origin and lengths must have equal dimension"
        );
        assert!(
            lengths.iter().all(|&l| l > 0.0),
            "grid lengths must be positive"
        );
        Self { origin, lengths }
    }

    /// The number of axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.lengths.len()
    }

    /// The origin of the grid.
    #[inline]
    pub fn origin(&self) -> &[f64] {
        &self.origin
    }

    /// The strides between successive lattice points.
    #[inline]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Map a lattice coordinate vector to a Euclidean point.
    pub fn point(&self, coords: &[f64]) -> Vec<f64> {
        assert_eq!(coords.len(), self.dimension());
        coords
            .iter()
            .zip(self.origin.iter().zip(self.lengths.iter()))
            .map(|(&q, (&o, &l))| o + l * q)
            .collect()
    }

    /// Map a lattice box to the corresponding box in Euclidean space.
    pub fn to_space(&self, lattice_box: &Aabb) -> Aabb {
        assert_eq!(lattice_box.dimension(), self.dimension());
        lattice_box
            .intervals()
            .iter()
            .zip(self.origin.iter().zip(self.lengths.iter()))
            .map(|(ivl, (&o, &l))| Interval::new(o + l * ivl.lo, o + l * ivl.hi))
            .collect()
    }

    /// Map a Euclidean box onto lattice coordinates.
    pub fn to_lattice(&self, space_box: &Aabb) -> Aabb {
        assert_eq!(space_box.dimension(), self.dimension());
        space_box
            .intervals()
            .iter()
            .zip(self.origin.iter().zip(self.lengths.iter()))
            .map(|(ivl, (&o, &l))| Interval::new((ivl.lo - o) / l, (ivl.hi - o) / l))
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Grid(origin={:?}, lengths={:?})",
            self.origin, self.lengths
        )
    }
}

/// Build a lower-dimensional grid keeping the selected axes, in order.
pub fn project_down(grid: &Grid, indices: &[usize]) -> Grid {
    assert!(!indices.is_empty(), "projection must keep at least one axis");
    let origin = indices.iter().map(|&i| grid.origin[i]).collect();
    let lengths = indices.iter().map(|&i| grid.lengths[i]).collect();
    Grid::new(origin, lengths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lattice_space_round_trip() {
        let grid = Grid::new(alloc::vec![1.0, -1.0], alloc::vec![0.5, 2.0]);
        let lattice = Aabb::from_corners(&[0.0, 0.0], &[1.0, 1.0]);
        let space = grid.to_space(&lattice);
        assert_eq!(space, Aabb::from_corners(&[1.0, -1.0], &[1.5, 1.0]));
        assert_eq!(grid.to_lattice(&space), lattice);
    }

    #[test]
    fn structural_equality() {
        assert_eq!(Grid::unit(2), Grid::with_lengths(alloc::vec![1.0, 1.0]));
        assert_ne!(Grid::unit(2), Grid::with_lengths(alloc::vec![1.0, 2.0]));
    }

    #[test]
    fn projection_keeps_selected_axes() {
        let grid = Grid::new(alloc::vec![0.0, 1.0, 2.0], alloc::vec![1.0, 2.0, 3.0]);
        let projected = project_down(&grid, &[0, 2]);
        assert_eq!(projected.origin(), &[0.0, 2.0]);
        assert_eq!(projected.lengths(), &[1.0, 3.0]);
    }

    #[test]
    #[should_panic(expected = "positive")]
    fn zero_length_rejected() {
        let _ = Grid::new(alloc::vec![0.0], alloc::vec![0.0]);
    }
}
