// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry: intervals and d-dimensional axis-aligned boxes.
//!
//! Boxes produced by dyadic subdivision have exactly representable bounds, so
//! the comparisons below are exact on the lattice. Closed cells of a paving
//! tile space with pairwise-disjoint interiors; the three-valued predicates
//! are therefore interior-based: two boxes that share only a boundary face do
//! not `overlaps` and are `disjoint`.

use alloc::vec::Vec;
use core::ops::Index;

use crate::tribool::Tribool;

/// A closed interval `[lo, hi]` with `f64` endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Interval {
    /// Lower bound.
    pub lo: f64,
    /// Upper bound.
    pub hi: f64,
}

impl Interval {
    /// Create a new interval. An interval with `hi < lo` is empty.
    #[inline]
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// The midpoint `(lo + hi) / 2`.
    #[inline]
    pub fn midpoint(self) -> f64 {
        (self.lo + self.hi) / 2.0
    }

    /// The width `hi - lo` (negative for empty intervals).
    #[inline]
    pub fn width(self) -> f64 {
        self.hi - self.lo
    }

    /// Whether the interval contains no points.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.hi < self.lo
    }

    /// Split at the midpoint into lower and upper halves.
    #[inline]
    pub fn split(self) -> (Self, Self) {
        let mid = self.midpoint();
        (Self::new(self.lo, mid), Self::new(mid, self.hi))
    }
}

/// A d-dimensional axis-aligned box: one [`Interval`] per axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Aabb {
    intervals: Vec<Interval>,
}

impl Aabb {
    /// Create a box from per-axis intervals.
    pub fn new(intervals: Vec<Interval>) -> Self {
        Self { intervals }
    }

    /// The unit box `[0,1]^d`.
    pub fn unit(dimension: usize) -> Self {
        Self {
            intervals: alloc::vec![Interval::new(0.0, 1.0); dimension],
        }
    }

    /// A box with the same interval on every axis.
    pub fn uniform(dimension: usize, interval: Interval) -> Self {
        Self {
            intervals: alloc::vec![interval; dimension],
        }
    }

    /// Create a box from parallel slices of lower and upper bounds.
    pub fn from_corners(lo: &[f64], hi: &[f64]) -> Self {
        assert_eq!(lo.len(), hi.len(), "corner slices must have equal length");
        Self {
            intervals: lo
                .iter()
                .zip(hi.iter())
                .map(|(&l, &h)| Interval::new(l, h))
                .collect(),
        }
    }

    /// The number of axes.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.intervals.len()
    }

    /// Per-axis intervals.
    #[inline]
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Mutable access to one axis.
    #[inline]
    pub fn interval_mut(&mut self, axis: usize) -> &mut Interval {
        &mut self.intervals[axis]
    }

    /// Whether the box is empty on some axis.
    pub fn is_empty(&self) -> bool {
        self.intervals.iter().any(|ivl| ivl.is_empty())
    }

    /// Whether the box has nonempty interior on every axis.
    pub fn has_interior(&self) -> bool {
        self.intervals.iter().all(|ivl| ivl.lo < ivl.hi)
    }

    /// The product of the axis widths.
    pub fn measure(&self) -> f64 {
        self.intervals
            .iter()
            .map(|ivl| ivl.width().max(0.0))
            .product()
    }

    /// Non-strict containment of closed boxes: `self ⊆ other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        self.eq_dim(other);
        self.intervals
            .iter()
            .zip(other.intervals.iter())
            .all(|(a, b)| b.lo <= a.lo && a.hi <= b.hi)
    }

    /// Strict containment: `self` lies in the interior of `other`.
    pub fn inside(&self, other: &Self) -> bool {
        self.eq_dim(other);
        self.intervals
            .iter()
            .zip(other.intervals.iter())
            .all(|(a, b)| b.lo < a.lo && a.hi < b.hi)
    }

    /// Whether the interiors of `self` and `other` intersect.
    pub fn overlaps(&self, other: &Self) -> Tribool {
        self.eq_dim(other);
        let open = self
            .intervals
            .iter()
            .zip(other.intervals.iter())
            .all(|(a, b)| a.lo.max(b.lo) < a.hi.min(b.hi));
        Tribool::from(open)
    }

    /// Whether the interiors of `self` and `other` are disjoint.
    ///
    /// Boxes that share only a boundary face are disjoint in this sense: the
    /// shared face belongs to the neighboring cell of any paving.
    pub fn disjoint(&self, other: &Self) -> Tribool {
        !self.overlaps(other)
    }

    /// Whether `self` contains `other` as a closed subset.
    pub fn covers(&self, other: &Self) -> Tribool {
        Tribool::from(other.is_subset(self))
    }

    /// Whether `self` is a closed subset of `other`.
    pub fn subset_of(&self, other: &Self) -> Tribool {
        other.covers(self)
    }

    /// The smallest box containing both operands.
    pub fn union_with(&self, other: &Self) -> Self {
        self.eq_dim(other);
        Self {
            intervals: self
                .intervals
                .iter()
                .zip(other.intervals.iter())
                .map(|(a, b)| Interval::new(a.lo.min(b.lo), a.hi.max(b.hi)))
                .collect(),
        }
    }

    /// The intersection of the two boxes (possibly empty).
    pub fn intersection_with(&self, other: &Self) -> Self {
        self.eq_dim(other);
        Self {
            intervals: self
                .intervals
                .iter()
                .zip(other.intervals.iter())
                .map(|(a, b)| Interval::new(a.lo.max(b.lo), a.hi.min(b.hi)))
                .collect(),
        }
    }

    /// Halve the box at the midpoint of `axis`, yielding the lower and upper
    /// halves.
    pub fn split(&self, axis: usize) -> (Self, Self) {
        let (lo_half, hi_half) = self.intervals[axis].split();
        let mut lower = self.clone();
        let mut upper = self.clone();
        lower.intervals[axis] = lo_half;
        upper.intervals[axis] = hi_half;
        (lower, upper)
    }

    #[inline]
    fn eq_dim(&self, other: &Self) {
        assert_eq!(
            self.dimension(),
            other.dimension(),
            "box dimensions must agree"
        );
    }
}

impl Index<usize> for Aabb {
    type Output = Interval;

    #[inline]
    fn index(&self, axis: usize) -> &Interval {
        &self.intervals[axis]
    }
}

impl FromIterator<Interval> for Aabb {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Self {
            intervals: iter.into_iter().collect(),
        }
    }
}
