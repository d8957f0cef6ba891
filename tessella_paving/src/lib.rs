// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tessella_paving --heading-base-level=0

//! Tessella Paving: subsets of Euclidean space as unions of dyadic grid
//! cells.
//!
//! A *paving* represents a region as a finite union of axis-aligned cells of
//! a [`Grid`], obtained by repeatedly halving *primary cells* along cycling
//! axes and stored as a compressed binary tree with enabled and disabled
//! leaves. On top of that representation the crate provides:
//!
//! - exact set algebra ([`join`], [`intersection`], [`difference`], and the
//!   in-place [`GridTreeSet::adjoin`] / [`GridTreeSet::restrict`] /
//!   [`GridTreeSet::remove`] family), with operands of different root
//!   heights aligned by re-rooting;
//! - geometric predicates between pavings ([`subset`], [`overlap`],
//!   [`disjoint`]) and three-valued predicates against boxes;
//! - outer, lower, and inner approximations of abstract sets consumed
//!   through the capability traits of [`tessella_grid`], plus
//!   predicate-driven restriction and removal;
//! - cell arithmetic ([`GridCell`], [`GridOpenCell`]): neighbors, open-cell
//!   covers, closures and intersections;
//! - iteration over enabled cells in a stable pre-order, projection onto a
//!   subset of the axes, a [`Canvas`] drawing adapter, and (with the `std`
//!   feature) a bare pre-order file format for tree persistence.
//!
//! # Example
//!
//! ```rust
//! use tessella_grid::{Aabb, Grid};
//! use tessella_paving::{GridTreeSet, difference};
//!
//! let grid = Grid::unit(2);
//!
//! // Pave the outer approximation of two boxes at depth 2 per axis.
//! let mut reached = GridTreeSet::new(grid.clone());
//! reached.adjoin_outer_approximation(&Aabb::from_corners(&[0.0, 0.0], &[0.5, 0.5]), 2);
//!
//! let mut safe = GridTreeSet::new(grid.clone());
//! safe.adjoin_outer_approximation(&Aabb::from_corners(&[0.25, 0.25], &[1.0, 1.0]), 2);
//!
//! // The part of `reached` outside `safe`, still a paving on the same grid.
//! let escape = difference(&reached.as_subset(), &safe.as_subset());
//! assert!(!escape.is_empty());
//! assert_eq!(escape.measure(), 0.1875);
//! ```
//!
//! The tree and cell algebra are `no_std` (`alloc` only); file persistence
//! lives behind the default `std` feature.
//!
//! [`Grid`]: tessella_grid::Grid

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod approx;
pub mod cell;
pub mod cursor;
pub mod draw;
#[cfg(feature = "std")]
pub mod io;
pub mod node;
pub mod open_cell;
pub mod project;
pub mod set;
pub mod subset;

pub use approx::{
    constraint_covers, constraint_disjoint, constraint_overlaps, inner_difference,
    inner_intersection, outer_difference, outer_intersection,
};
pub use cell::{
    GridCell, cell_subset, primary_cell_lattice_box, primary_cell_path,
    smallest_enclosing_primary_cell_height, smallest_enclosing_primary_cell_height_on_grid,
};
pub use cursor::{Cursor, GridCells};
pub use draw::Canvas;
#[cfg(feature = "std")]
pub use io::PersistError;
pub use node::BinaryTreeNode;
pub use open_cell::GridOpenCell;
pub use project::{project_down, project_down_cell};
pub use set::{AlignStop, GridTreeSet, difference, intersection, join};
pub use subset::{
    GridTreeSubset, cell_in_paving, cell_overlaps_paving, disjoint, overlap, subset, superset,
};
