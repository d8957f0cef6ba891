// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximating a round set by pavings.
//!
//! A disc answers box queries with three-valued results; the engine turns
//! it into outer, lower, and inner pavings at increasing resolution.
//!
//! Run:
//! - `cargo run -p tessella_demos --example approximation`

use tessella_grid::{Aabb, BoundedSet, ClosedSet, OpenSet, OvertSet, Tribool};
use tessella_paving::{GridTreeSet, subset};

/// A disc, answering conservatively via corner distances.
struct Disc {
    center: [f64; 2],
    radius: f64,
}

impl Disc {
    /// Distance from the center to the nearest point of the box.
    fn min_dist(&self, bx: &Aabb) -> f64 {
        let mut sum = 0.0;
        for (axis, c) in self.center.iter().enumerate() {
            let ivl = bx[axis];
            let d = (ivl.lo - c).max(c - ivl.hi).max(0.0);
            sum += d * d;
        }
        sum.sqrt()
    }

    /// Distance from the center to the farthest corner of the box.
    fn max_dist(&self, bx: &Aabb) -> f64 {
        let mut sum = 0.0;
        for (axis, c) in self.center.iter().enumerate() {
            let ivl = bx[axis];
            let d = (ivl.lo - c).abs().max((ivl.hi - c).abs());
            sum += d * d;
        }
        sum.sqrt()
    }
}

impl BoundedSet for Disc {
    fn dimension(&self) -> usize {
        2
    }

    fn bounding_box(&self) -> Aabb {
        Aabb::from_corners(
            &[self.center[0] - self.radius, self.center[1] - self.radius],
            &[self.center[0] + self.radius, self.center[1] + self.radius],
        )
    }
}

impl OvertSet for Disc {
    fn overlaps(&self, bx: &Aabb) -> Tribool {
        let min = self.min_dist(bx);
        if min < self.radius {
            Tribool::True
        } else if min > self.radius {
            Tribool::False
        } else {
            Tribool::Indeterminate
        }
    }
}

impl OpenSet for Disc {
    fn covers(&self, bx: &Aabb) -> Tribool {
        let max = self.max_dist(bx);
        if max < self.radius {
            Tribool::True
        } else if max > self.radius {
            Tribool::False
        } else {
            Tribool::Indeterminate
        }
    }
}

impl ClosedSet for Disc {
    fn disjoint(&self, bx: &Aabb) -> Tribool {
        !self.overlaps(bx)
    }
}

fn main() {
    let disc = Disc {
        center: [0.5, 0.5],
        radius: 0.35,
    };
    let exact_area = core::f64::consts::PI * disc.radius * disc.radius;
    println!("disc area: {exact_area:.6}");

    for depth in 1..=5 {
        let mut outer = GridTreeSet::unit(2);
        outer.adjoin_outer_approximation(&disc, depth);

        let mut lower = GridTreeSet::unit(2);
        lower.adjoin_lower_approximation_open(&disc, depth);

        let mut inner = GridTreeSet::unit(2);
        inner.adjoin_inner_approximation_bounded(&disc, depth);

        assert!(subset(&inner.as_subset(), &outer.as_subset()));
        assert!(subset(&lower.as_subset(), &outer.as_subset()));
        assert!(inner.measure() <= exact_area && exact_area <= outer.measure());

        println!(
            "depth {depth}: inner {:.6} <= area <= outer {:.6} ({} / {} cells)",
            inner.measure(),
            outer.measure(),
            inner.size(),
            outer.size()
        );
    }
}
