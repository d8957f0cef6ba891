// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability traits for abstract sets.
//!
//! The paving engine consumes sets through narrow capabilities rather than a
//! monolithic interface: a set advertises only the questions it can answer
//! about a box, and every answer is three-valued. Approximation drivers pick
//! their strategy from the capabilities the set exposes.

use crate::tribool::Tribool;
use crate::types::Aabb;

/// A set with a known bounding box.
pub trait BoundedSet {
    /// The ambient dimension.
    fn dimension(&self) -> usize;

    /// A box containing the set.
    fn bounding_box(&self) -> Aabb;
}

/// A set that can report whether it overlaps the interior of a box.
pub trait OvertSet {
    /// Whether the set intersects the interior of `bx`.
    fn overlaps(&self, bx: &Aabb) -> Tribool;
}

/// An open set: can additionally report whether it covers a box.
pub trait OpenSet: OvertSet {
    /// Whether `bx` is a subset of the set.
    fn covers(&self, bx: &Aabb) -> Tribool;
}

/// A closed set: can report disjointness from a box.
pub trait ClosedSet {
    /// Whether the set is disjoint from `bx`.
    fn disjoint(&self, bx: &Aabb) -> Tribool;
}

/// A compact set: bounded and closed.
pub trait CompactSet: BoundedSet + ClosedSet {}

impl<S: BoundedSet + ClosedSet> CompactSet for S {}

/// A general three-valued predicate over boxes.
///
/// Any `Fn(&Aabb) -> Tribool` closure is a checker.
pub trait SetChecker {
    /// Evaluate the predicate on `bx`.
    fn check(&self, bx: &Aabb) -> Tribool;
}

impl<F: Fn(&Aabb) -> Tribool> SetChecker for F {
    fn check(&self, bx: &Aabb) -> Tribool {
        self(bx)
    }
}

/// A compact set whose disjointness test is accelerated by a splitting cache.
///
/// The cache is created by the driver at the start of one outer-approximation
/// call, threaded through the recursion, and dropped when the driver returns.
/// Its contents are opaque to the engine.
pub trait CacheBackedSet: CompactSet {
    /// Driver-owned scratch state for one approximation call.
    type Cache;

    /// Create a fresh cache for one approximation call.
    fn new_cache(&self) -> Self::Cache;

    /// Disjointness of the set from `bx`, consulting and updating the cache.
    fn disjoint_with_cache(&self, bx: &Aabb, cache: &mut Self::Cache) -> Tribool;
}

impl BoundedSet for Aabb {
    fn dimension(&self) -> usize {
        Aabb::dimension(self)
    }

    fn bounding_box(&self) -> Aabb {
        self.clone()
    }
}

impl OvertSet for Aabb {
    fn overlaps(&self, bx: &Aabb) -> Tribool {
        Aabb::overlaps(self, bx)
    }
}

impl OpenSet for Aabb {
    fn covers(&self, bx: &Aabb) -> Tribool {
        Aabb::covers(self, bx)
    }
}

impl ClosedSet for Aabb {
    fn disjoint(&self, bx: &Aabb) -> Tribool {
        Aabb::disjoint(self, bx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_are_compact_and_open() {
        fn assert_compact<S: CompactSet + OpenSet>(_: &S) {}
        let bx = Aabb::from_corners(&[0.0], &[1.0]);
        assert_compact(&bx);
        assert_eq!(BoundedSet::bounding_box(&bx), bx);
    }

    #[test]
    fn closures_are_checkers() {
        let checker = |bx: &Aabb| Aabb::covers(&Aabb::unit(1), bx);
        assert!(checker.check(&Aabb::from_corners(&[0.25], &[0.5])).definitely());
        assert!(!checker.check(&Aabb::from_corners(&[0.5], &[2.0])).possibly());
    }
}
