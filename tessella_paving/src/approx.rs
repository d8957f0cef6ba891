// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Approximating abstract sets by pavings.
//!
//! The drivers walk the cell tree top-down, asking the set about each cell's
//! box through the capability traits and deciding per cell: keep, drop, or
//! split and look closer. The lattice box is threaded through the recursion
//! and halved along the cycling axis, so cell geometry is never recomputed
//! from the word. Splitting stops at the mince depth `(subdivisions + height) · d`,
//! where the three-valued answers are finally collapsed.

use tessella_grid::{
    Aabb, BoundedSet, CacheBackedSet, ClosedSet, CompactSet, Grid, OpenSet, OvertSet, SetChecker,
    Tribool,
};

use crate::cell::{primary_cell_lattice_box, smallest_enclosing_primary_cell_height_on_grid};
use crate::node::BinaryTreeNode;
use crate::set::{AlignStop, GridTreeSet};
use crate::subset::GridTreeSubset;

/// The tree depth of cells refined `subdivisions` times per axis below the
/// primary cell at `height`.
fn mince_depth(subdivisions: usize, height: usize, dimension: usize) -> usize {
    (subdivisions + height) * dimension
}

/// A three-valued membership test assembled from an open set's capabilities:
/// definitely inside when covered, definitely outside when not even
/// overlapping, indeterminate in between.
fn membership<S: OpenSet>(set: &S) -> impl Fn(&Aabb) -> Tribool + '_ {
    |bx| {
        if set.covers(bx).definitely() {
            Tribool::True
        } else if !set.overlaps(bx).possibly() {
            Tribool::False
        } else {
            Tribool::Indeterminate
        }
    }
}

impl GridTreeSet {
    /// Adjoin the outer approximation of a compact set, refined
    /// `subdivisions` times per axis relative to the unit cell.
    ///
    /// Cells definitely disjoint from the set are skipped; cells the set
    /// definitely covers become enabled leaves without further splitting;
    /// everything still undecided at the mince depth is enabled, which makes
    /// the result conservative.
    pub fn adjoin_outer_approximation<S>(&mut self, set: &S, subdivisions: usize)
    where
        S: CompactSet + OpenSet,
    {
        assert_eq!(set.dimension(), self.dimension(), "set dimension mismatch");
        self.outer_approximation_impl(
            &set.bounding_box(),
            subdivisions,
            &|bx| set.disjoint(bx),
            Some(&|bx| set.covers(bx)),
        );
    }

    /// [`adjoin_outer_approximation`](Self::adjoin_outer_approximation) for a
    /// set without the covers capability: no cell can be enabled early, so
    /// the result is the same but reached by splitting everywhere.
    pub fn adjoin_outer_approximation_closed<S: CompactSet>(
        &mut self,
        set: &S,
        subdivisions: usize,
    ) {
        assert_eq!(set.dimension(), self.dimension(), "set dimension mismatch");
        self.outer_approximation_impl(
            &set.bounding_box(),
            subdivisions,
            &|bx| set.disjoint(bx),
            None,
        );
    }

    fn outer_approximation_impl(
        &mut self,
        bounding: &Aabb,
        subdivisions: usize,
        disjoint: &dyn Fn(&Aabb) -> Tribool,
        covers: Option<&dyn Fn(&Aabb) -> Tribool>,
    ) {
        let grid = self.grid().clone();
        let height = smallest_enclosing_primary_cell_height_on_grid(bounding, &grid);
        let dimension = grid.dimension();
        if let Some(node) = self.align_with_cell(height, AlignStop::ON_ENABLED) {
            let max_depth = mince_depth(subdivisions, height, dimension);
            let lattice = primary_cell_lattice_box(height, dimension);
            outer_rec(&grid, &lattice, node, max_depth, 0, disjoint, covers);
        }
        self.recombine();
    }

    /// Outer approximation of a set whose disjointness test runs through a
    /// splitting cache. Above the mince depth only the bounding box is
    /// consulted; the expensive cached test runs exactly at the finest
    /// cells. The cache lives for this one call.
    pub fn adjoin_outer_approximation_cached<S: CacheBackedSet>(
        &mut self,
        set: &S,
        subdivisions: usize,
    ) {
        assert_eq!(set.dimension(), self.dimension(), "set dimension mismatch");
        let grid = self.grid().clone();
        let bounding = set.bounding_box();
        let height = smallest_enclosing_primary_cell_height_on_grid(&bounding, &grid);
        let dimension = grid.dimension();
        if let Some(node) = self.align_with_cell(height, AlignStop::ON_ENABLED) {
            let max_depth = mince_depth(subdivisions, height, dimension);
            let lattice = primary_cell_lattice_box(height, dimension);
            let mut cache = set.new_cache();
            outer_cached_rec(
                &grid, &lattice, node, max_depth, 0, set, &bounding, &mut cache,
            );
        }
        self.recombine();
    }

    /// Adjoin the outer approximation of a plain box, which must have
    /// nonempty interior.
    pub fn adjoin_over_approximation(&mut self, bx: &Aabb, subdivisions: usize) {
        assert_eq!(bx.dimension(), self.dimension(), "box dimension mismatch");
        assert!(
            bx.has_interior(),
            "box passed to over-approximation has empty interior"
        );
        self.adjoin_outer_approximation(bx, subdivisions);
    }

    /// Adjoin a lower approximation of an overt set, bounded by its bounding
    /// box.
    pub fn adjoin_lower_approximation<S: OvertSet + BoundedSet>(
        &mut self,
        set: &S,
        subdivisions: usize,
    ) {
        let height =
            smallest_enclosing_primary_cell_height_on_grid(&set.bounding_box(), self.grid());
        self.adjoin_lower_approximation_at_height(set, height, subdivisions);
    }

    /// Adjoin a lower approximation of an overt set below the primary cell
    /// at `height`.
    ///
    /// Overt knowledge cannot tell genuine containment from mere overlap, so
    /// a cell is enabled at the mince depth only when nothing below it is
    /// enabled yet; the result can be coarser than the best lower
    /// approximation.
    pub fn adjoin_lower_approximation_at_height<S: OvertSet>(
        &mut self,
        set: &S,
        height: usize,
        subdivisions: usize,
    ) {
        let grid = self.grid().clone();
        let dimension = grid.dimension();
        if let Some(node) = self.align_with_cell(height, AlignStop::ON_ENABLED) {
            let max_depth = mince_depth(subdivisions, height, dimension);
            let lattice = primary_cell_lattice_box(height, dimension);
            lower_overt_rec(&grid, &lattice, node, max_depth, 0, &|bx| set.overlaps(bx));
        }
        self.recombine();
    }

    /// Adjoin a lower approximation of an open set, bounded by its bounding
    /// box. Covered cells are enabled and minced to the full depth.
    pub fn adjoin_lower_approximation_open<S: OpenSet + BoundedSet>(
        &mut self,
        set: &S,
        subdivisions: usize,
    ) {
        let height =
            smallest_enclosing_primary_cell_height_on_grid(&set.bounding_box(), self.grid());
        self.adjoin_lower_approximation_open_at_height(set, height, subdivisions);
    }

    /// Adjoin a lower approximation of an open set below the primary cell at
    /// `height`.
    pub fn adjoin_lower_approximation_open_at_height<S: OpenSet>(
        &mut self,
        set: &S,
        height: usize,
        subdivisions: usize,
    ) {
        let grid = self.grid().clone();
        let dimension = grid.dimension();
        if let Some(node) = self.align_with_cell(height, AlignStop::ON_ENABLED) {
            let max_depth = mince_depth(subdivisions, height, dimension);
            let lattice = primary_cell_lattice_box(height, dimension);
            lower_open_rec(
                &grid,
                &lattice,
                node,
                max_depth,
                0,
                &|bx| set.overlaps(bx),
                &|bx| set.covers(bx),
            );
        }
    }

    /// Adjoin the inner approximation of an open set below the primary cell
    /// at `height`: only cells the set definitely covers are enabled, and a
    /// cell that merely overlaps at the mince depth is excluded.
    pub fn adjoin_inner_approximation<S: OpenSet>(
        &mut self,
        set: &S,
        height: usize,
        subdivisions: usize,
    ) {
        let grid = self.grid().clone();
        let dimension = grid.dimension();
        if let Some(node) = self.align_with_cell(height, AlignStop::ON_ENABLED) {
            let max_depth = mince_depth(subdivisions, height, dimension);
            let lattice = primary_cell_lattice_box(height, dimension);
            inner_rec(
                &grid,
                &lattice,
                node,
                max_depth,
                0,
                &|bx| set.overlaps(bx),
                &|bx| set.covers(bx),
            );
        }
        self.recombine();
    }

    /// [`adjoin_inner_approximation`](Self::adjoin_inner_approximation)
    /// bounded by the set's own bounding box.
    pub fn adjoin_inner_approximation_bounded<S: OpenSet + BoundedSet>(
        &mut self,
        set: &S,
        subdivisions: usize,
    ) {
        let height =
            smallest_enclosing_primary_cell_height_on_grid(&set.bounding_box(), self.grid());
        self.adjoin_inner_approximation(set, height, subdivisions);
    }

    /// Keep the cells where `checker` possibly holds, refining undecided
    /// cells down to `accuracy` subdivisions per axis. Undecided cells at
    /// the finest level are kept.
    pub fn outer_restrict<C: SetChecker>(&mut self, checker: &C, accuracy: usize) {
        self.restrict_with(&|bx| checker.check(bx), Some(accuracy), RestrictKind::Outer);
    }

    /// Keep only the cells where `checker` definitely holds. Undecided cells
    /// at the finest level are discarded.
    pub fn inner_restrict<C: SetChecker>(&mut self, checker: &C, accuracy: usize) {
        self.restrict_with(&|bx| checker.check(bx), Some(accuracy), RestrictKind::Inner);
    }

    /// Remove the cells where `checker` possibly holds (undecided cells at
    /// the finest level are removed).
    pub fn outer_remove<C: SetChecker>(&mut self, checker: &C, accuracy: usize) {
        self.remove_with(&|bx| checker.check(bx), Some(accuracy), RestrictKind::Outer);
    }

    /// Remove only the cells where `checker` definitely holds.
    pub fn inner_remove<C: SetChecker>(&mut self, checker: &C, accuracy: usize) {
        self.remove_with(&|bx| checker.check(bx), Some(accuracy), RestrictKind::Inner);
    }

    /// [`outer_restrict`](Self::outer_restrict) against an open set, refined
    /// to the current depth of the tree.
    pub fn outer_restrict_set<S: OpenSet>(&mut self, set: &S) {
        self.restrict_with(&membership(set), None, RestrictKind::Outer);
    }

    /// [`inner_restrict`](Self::inner_restrict) against an open set.
    pub fn inner_restrict_set<S: OpenSet>(&mut self, set: &S) {
        self.restrict_with(&membership(set), None, RestrictKind::Inner);
    }

    /// [`outer_remove`](Self::outer_remove) against an open set.
    pub fn outer_remove_set<S: OpenSet>(&mut self, set: &S) {
        self.remove_with(&membership(set), None, RestrictKind::Outer);
    }

    /// [`inner_remove`](Self::inner_remove) against an open set.
    pub fn inner_remove_set<S: OpenSet>(&mut self, set: &S) {
        self.remove_with(&membership(set), None, RestrictKind::Inner);
    }

    fn restrict_with(
        &mut self,
        check: &dyn Fn(&Aabb) -> Tribool,
        accuracy: Option<usize>,
        kind: RestrictKind,
    ) {
        if self.is_empty() {
            return;
        }
        let grid = self.grid().clone();
        let height = self.cell().height();
        let max_depth = match accuracy {
            Some(accuracy) => mince_depth(accuracy, height, grid.dimension()),
            None => self.depth(),
        };
        let lattice = primary_cell_lattice_box(height, grid.dimension());
        restrict_rec(
            &grid,
            &lattice,
            self.binary_tree_mut(),
            max_depth,
            0,
            check,
            kind,
        );
        self.recombine();
    }

    fn remove_with(
        &mut self,
        check: &dyn Fn(&Aabb) -> Tribool,
        accuracy: Option<usize>,
        kind: RestrictKind,
    ) {
        if self.is_empty() {
            return;
        }
        let grid = self.grid().clone();
        let height = self.cell().height();
        let max_depth = match accuracy {
            Some(accuracy) => mince_depth(accuracy, height, grid.dimension()),
            None => self.depth(),
        };
        let lattice = primary_cell_lattice_box(height, grid.dimension());
        remove_rec(
            &grid,
            &lattice,
            self.binary_tree_mut(),
            max_depth,
            0,
            check,
            kind,
        );
        self.recombine();
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum RestrictKind {
    /// Collapse undecided finest cells toward keeping set content.
    Outer,
    /// Collapse undecided finest cells toward certainty.
    Inner,
}

fn split_and_merge(
    node: &mut BinaryTreeNode,
    mut visit: impl FnMut(&Aabb, &mut BinaryTreeNode),
    lower: &Aabb,
    upper: &Aabb,
) {
    node.split();
    let mut both_enabled = false;
    if let BinaryTreeNode::Branch { left, right } = node {
        visit(lower, left);
        visit(upper, right);
        both_enabled = left.is_enabled() && right.is_enabled();
    }
    if both_enabled {
        node.make_leaf(true);
    }
}

fn outer_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    disjoint: &dyn Fn(&Aabb) -> Tribool,
    covers: Option<&dyn Fn(&Aabb) -> Tribool>,
) {
    let cell_box = grid.to_space(lattice_box);
    if disjoint(&cell_box).definitely() {
        return;
    }
    if let Some(covers) = covers {
        if covers(&cell_box).definitely() {
            node.make_leaf(true);
            return;
        }
    }
    if node.is_enabled() {
        return;
    }
    if depth < max_depth {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        split_and_merge(
            node,
            |bx, child| outer_rec(grid, bx, child, max_depth, depth + 1, disjoint, covers),
            &lower,
            &upper,
        );
    } else {
        node.make_leaf(true);
    }
}

#[allow(clippy::too_many_arguments)]
fn outer_cached_rec<S: CacheBackedSet>(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    set: &S,
    bounding: &Aabb,
    cache: &mut S::Cache,
) {
    let cell_box = grid.to_space(lattice_box);
    if depth < max_depth {
        if bounding.disjoint(&cell_box).definitely() {
            return;
        }
    } else if set.disjoint_with_cache(&cell_box, cache).definitely() {
        return;
    }
    if node.is_enabled() {
        return;
    }
    if depth < max_depth {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        node.split();
        let mut both_enabled = false;
        if let BinaryTreeNode::Branch { left, right } = node {
            outer_cached_rec(grid, &lower, left, max_depth, depth + 1, set, bounding, cache);
            outer_cached_rec(grid, &upper, right, max_depth, depth + 1, set, bounding, cache);
            both_enabled = left.is_enabled() && right.is_enabled();
        }
        if both_enabled {
            node.make_leaf(true);
        }
    } else {
        node.make_leaf(true);
    }
}

fn lower_overt_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    overlaps: &dyn Fn(&Aabb) -> Tribool,
) {
    let cell_box = grid.to_space(lattice_box);
    if !overlaps(&cell_box).definitely() {
        return;
    }
    if depth >= max_depth {
        // A subtree with enabled cells already witnesses the overlap.
        if !node.has_enabled() {
            node.make_leaf(true);
        }
    } else {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        node.split();
        if let BinaryTreeNode::Branch { left, right } = node {
            lower_overt_rec(grid, &lower, left, max_depth, depth + 1, overlaps);
            lower_overt_rec(grid, &upper, right, max_depth, depth + 1, overlaps);
        }
    }
}

fn lower_open_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    overlaps: &dyn Fn(&Aabb) -> Tribool,
    covers: &dyn Fn(&Aabb) -> Tribool,
) {
    let cell_box = grid.to_space(lattice_box);
    if covers(&cell_box).definitely() {
        node.make_leaf(true);
        node.mince(max_depth - depth);
    } else if overlaps(&cell_box).definitely() {
        if depth >= max_depth {
            if node.is_leaf() {
                node.make_leaf(true);
            }
        } else {
            let (lower, upper) = lattice_box.split(depth % grid.dimension());
            node.split();
            if let BinaryTreeNode::Branch { left, right } = node {
                lower_open_rec(grid, &lower, left, max_depth, depth + 1, overlaps, covers);
                lower_open_rec(grid, &upper, right, max_depth, depth + 1, overlaps, covers);
            }
        }
    }
}

fn inner_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    overlaps: &dyn Fn(&Aabb) -> Tribool,
    covers: &dyn Fn(&Aabb) -> Tribool,
) {
    if node.is_enabled() {
        return;
    }
    let cell_box = grid.to_space(lattice_box);
    if covers(&cell_box).definitely() {
        node.make_leaf(true);
    } else if overlaps(&cell_box).possibly() && depth < max_depth {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        node.split();
        if let BinaryTreeNode::Branch { left, right } = node {
            inner_rec(grid, &lower, left, max_depth, depth + 1, overlaps, covers);
            inner_rec(grid, &upper, right, max_depth, depth + 1, overlaps, covers);
        }
    }
}

fn restrict_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    check: &dyn Fn(&Aabb) -> Tribool,
    kind: RestrictKind,
) {
    let test = check(&grid.to_space(lattice_box));
    if test.definitely() {
        return;
    }
    if !test.possibly() {
        node.make_leaf(false);
        return;
    }
    if depth < max_depth {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        split_and_merge(
            node,
            |bx, child| restrict_rec(grid, bx, child, max_depth, depth + 1, check, kind),
            &lower,
            &upper,
        );
    } else if kind == RestrictKind::Inner {
        // At the finest level an undecided cell cannot be kept.
        node.make_leaf(false);
    }
}

fn remove_rec(
    grid: &Grid,
    lattice_box: &Aabb,
    node: &mut BinaryTreeNode,
    max_depth: usize,
    depth: usize,
    check: &dyn Fn(&Aabb) -> Tribool,
    kind: RestrictKind,
) {
    let test = check(&grid.to_space(lattice_box));
    if !test.possibly() {
        return;
    }
    if test.definitely() {
        node.make_leaf(false);
        return;
    }
    if depth < max_depth {
        let (lower, upper) = lattice_box.split(depth % grid.dimension());
        split_and_merge(
            node,
            |bx, child| remove_rec(grid, bx, child, max_depth, depth + 1, check, kind),
            &lower,
            &upper,
        );
    } else if kind == RestrictKind::Outer {
        // Outer removal takes every cell the set possibly reaches.
        node.make_leaf(false);
    }
}

/// Whether a closed set is disjoint from a paving: a quick bounding-box test
/// first, then the conjunction over the enabled cells, stopping at the first
/// cell the set definitely reaches.
pub fn constraint_disjoint<C: ClosedSet>(cons: &C, paving: &GridTreeSubset<'_>) -> Tribool {
    let Some(bounding) = paving.bounding_box() else {
        return Tribool::True;
    };
    if cons.disjoint(&bounding).definitely() {
        return Tribool::True;
    }
    let mut result = Tribool::True;
    for cell in paving {
        let cell_disjoint = cons.disjoint(&cell.space_box());
        if !cell_disjoint.possibly() {
            return Tribool::False;
        }
        result = result & cell_disjoint;
    }
    result
}

/// Whether a closed set reaches into a paving.
pub fn constraint_overlaps<C: ClosedSet>(cons: &C, paving: &GridTreeSubset<'_>) -> Tribool {
    !constraint_disjoint(cons, paving)
}

/// Whether a set covers a paving: definitely true when it covers the
/// bounding box, or when it definitely covers every enabled cell.
pub fn constraint_covers<C: OpenSet + ClosedSet>(cons: &C, paving: &GridTreeSubset<'_>) -> Tribool {
    let Some(bounding) = paving.bounding_box() else {
        return Tribool::True;
    };
    if cons.covers(&bounding).definitely() {
        return Tribool::True;
    }
    if cons.disjoint(&bounding).definitely() {
        return Tribool::False;
    }
    let mut result = Tribool::True;
    for cell in paving {
        let covers_cell = cons.covers(&cell.space_box());
        if !covers_cell.possibly() {
            return Tribool::False;
        }
        result = result & covers_cell;
    }
    result
}

/// A copy of the paving restricted to the outer approximation of `cons`.
pub fn outer_intersection<C: OpenSet>(paving: &GridTreeSet, cons: &C) -> GridTreeSet {
    let mut result = paving.clone();
    result.outer_restrict_set(cons);
    result
}

/// A copy of the paving restricted to the inner approximation of `cons`.
pub fn inner_intersection<C: OpenSet>(paving: &GridTreeSet, cons: &C) -> GridTreeSet {
    let mut result = paving.clone();
    result.inner_restrict_set(cons);
    result
}

/// A copy of the paving with the inner approximation of `cons` removed;
/// the result still contains everything of the paving outside `cons`.
pub fn outer_difference<C: OpenSet>(paving: &GridTreeSet, cons: &C) -> GridTreeSet {
    let mut result = paving.clone();
    result.inner_remove_set(cons);
    result
}

/// A copy of the paving with the outer approximation of `cons` removed;
/// the result is contained in the true difference.
pub fn inner_difference<C: OpenSet>(paving: &GridTreeSet, cons: &C) -> GridTreeSet {
    let mut result = paving.clone();
    result.outer_remove_set(cons);
    result
}
