// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=tessella_grid --heading-base-level=0

//! Tessella Grid: coordinate-aligned grids and dyadic lattice geometry.
//!
//! Tessella Grid is the primitive layer under the paving engine.
//!
//! - [`Grid`]: the affine map between the integer lattice and Euclidean space.
//! - [`Interval`] / [`Aabb`]: exact d-dimensional box arithmetic on the lattice.
//! - [`BinaryWord`]: bit paths through nested dyadic subdivisions.
//! - [`Tribool`]: three-valued predicate results that survive tree walks.
//! - Capability traits ([`BoundedSet`], [`OvertSet`], [`OpenSet`],
//!   [`ClosedSet`], [`CompactSet`], [`SetChecker`], [`CacheBackedSet`]) through
//!   which abstract sets answer box queries.
//!
//! The predicates on [`Aabb`] are interior-based: boxes sharing only a
//! boundary face are disjoint. This matches the paving model, where closed
//! cells tile space with pairwise-disjoint interiors.
//!
//! # Example
//!
//! ```rust
//! use tessella_grid::{Aabb, Grid};
//!
//! let grid = Grid::new(vec![0.0, 0.0], vec![0.5, 0.5]);
//! let lattice = Aabb::from_corners(&[0.0, 0.0], &[1.0, 1.0]);
//! let space = grid.to_space(&lattice);
//! assert_eq!(space, Aabb::from_corners(&[0.0, 0.0], &[0.5, 0.5]));
//! assert!(space.inside(&Aabb::from_corners(&[-1.0, -1.0], &[1.0, 1.0])));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod grid;
pub mod sets;
pub mod tribool;
pub mod types;
pub mod word;

pub use grid::{Grid, project_down};
pub use sets::{
    BoundedSet, CacheBackedSet, ClosedSet, CompactSet, OpenSet, OvertSet, SetChecker,
};
pub use tribool::Tribool;
pub use types::{Aabb, Interval};
pub use word::BinaryWord;
