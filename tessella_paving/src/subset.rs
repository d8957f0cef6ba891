// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Views over a subtree of a paving: iteration, measures, and geometric
//! predicates.
//!
//! A view never owns its tree; it borrows a node of some paving together
//! with the cell that node paves. Predicates between two views first re-root
//! both to their common primary cell and then walk the aligned trees.

use alloc::vec::Vec;

use tessella_grid::{Aabb, BinaryWord, Grid, Tribool};

use crate::cell::{GridCell, aligned_words, primary_cell_path};
use crate::cursor::GridCells;
use crate::node::BinaryTreeNode;

/// A non-owning view of a paving at some `(height, word)` root.
#[derive(Clone)]
pub struct GridTreeSubset<'a> {
    cell: GridCell,
    node: &'a BinaryTreeNode,
}

impl<'a> GridTreeSubset<'a> {
    /// View the subtree `node`, which paves `cell`.
    pub fn new(cell: GridCell, node: &'a BinaryTreeNode) -> Self {
        Self { cell, node }
    }

    /// The cell paved by the root of the view.
    #[inline]
    pub fn cell(&self) -> &GridCell {
        &self.cell
    }

    /// The grid the paving lives on.
    #[inline]
    pub fn grid(&self) -> &Grid {
        self.cell.grid()
    }

    /// The ambient dimension.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.cell.dimension()
    }

    /// The underlying subtree.
    #[inline]
    pub fn binary_tree(&self) -> &'a BinaryTreeNode {
        self.node
    }

    /// The depth of the underlying subtree.
    pub fn depth(&self) -> usize {
        self.node.depth()
    }

    /// The number of enabled leaves.
    pub fn size(&self) -> usize {
        self.node.count_enabled_leaves()
    }

    /// Whether no leaf is enabled.
    pub fn is_empty(&self) -> bool {
        !self.node.has_enabled()
    }

    /// The total measure of the enabled cells.
    pub fn measure(&self) -> f64 {
        self.iter().map(|cell| cell.space_box().measure()).sum()
    }

    /// The union bounding box of the enabled cells, `None` when empty.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let mut cells = self.iter();
        let first = cells.next()?.space_box();
        Some(cells.fold(first, |acc, cell| acc.union_with(&cell.space_box())))
    }

    /// Iterate the enabled cells in pre-order, left before right.
    pub fn iter(&self) -> GridCells<'a> {
        GridCells::new(self.cell.clone(), self.node)
    }

    /// The enabled cells as plain boxes.
    pub fn to_boxes(&self) -> Vec<Aabb> {
        self.iter().map(|cell| cell.space_box()).collect()
    }

    /// Serialize the subtree to pre-order shape and state words.
    pub fn to_binary_words(&self) -> (BinaryWord, BinaryWord) {
        let mut tree = BinaryWord::new();
        let mut leaves = BinaryWord::new();
        self.node.tree_to_binary_words(&mut tree, &mut leaves);
        (tree, leaves)
    }

    /// Whether the paving covers `bx`.
    pub fn covers(&self, bx: &Aabb) -> Tribool {
        let mut word = self.cell.word().clone();
        covers_rec(self.node, self.grid(), self.cell.height(), &mut word, bx)
    }

    /// Whether the paving is a subset of `bx`.
    pub fn subset_of(&self, bx: &Aabb) -> Tribool {
        let mut word = self.cell.word().clone();
        subset_rec(self.node, self.grid(), self.cell.height(), &mut word, bx)
    }

    /// Whether the paving overlaps the interior of `bx`.
    pub fn overlaps(&self, bx: &Aabb) -> Tribool {
        let mut word = self.cell.word().clone();
        overlaps_rec(self.node, self.grid(), self.cell.height(), &mut word, bx)
    }

    /// Whether the paving is disjoint from `bx`.
    pub fn disjoint(&self, bx: &Aabb) -> Tribool {
        !self.overlaps(bx)
    }
}

impl<'a> IntoIterator for &GridTreeSubset<'a> {
    type Item = GridCell;
    type IntoIter = GridCells<'a>;

    fn into_iter(self) -> GridCells<'a> {
        self.iter()
    }
}

fn cell_space_box(grid: &Grid, height: usize, word: &BinaryWord) -> Aabb {
    grid.to_space(&GridCell::compute_lattice_box(grid.dimension(), height, word))
}

/// Three-valued walk for `covers`: a disabled leaf that definitely meets the
/// box breaks the covering; cells away from the box never matter.
fn covers_rec(
    node: &BinaryTreeNode,
    grid: &Grid,
    height: usize,
    word: &mut BinaryWord,
    bx: &Aabb,
) -> Tribool {
    let meets = cell_space_box(grid, height, word).overlaps(bx);
    if !meets.possibly() {
        return Tribool::True;
    }
    match node {
        BinaryTreeNode::Leaf(true) => Tribool::True,
        BinaryTreeNode::Leaf(false) => !meets,
        BinaryTreeNode::Branch { left, right } => {
            word.push(false);
            let left_result = covers_rec(left, grid, height, word, bx);
            word.pop();
            if !left_result.possibly() {
                return Tribool::False;
            }
            word.push(true);
            let right_result = covers_rec(right, grid, height, word, bx);
            word.pop();
            if !right_result.possibly() {
                return Tribool::False;
            }
            left_result & right_result
        }
    }
}

/// Three-valued walk for `subset_of`: an enabled leaf sticking out of the
/// box breaks the inclusion.
fn subset_rec(
    node: &BinaryTreeNode,
    grid: &Grid,
    height: usize,
    word: &mut BinaryWord,
    bx: &Aabb,
) -> Tribool {
    let inside = cell_space_box(grid, height, word).subset_of(bx);
    if inside.definitely() {
        return Tribool::True;
    }
    match node {
        BinaryTreeNode::Leaf(state) => {
            if !inside.possibly() {
                Tribool::from(!*state)
            } else if *state {
                Tribool::Indeterminate
            } else {
                Tribool::True
            }
        }
        BinaryTreeNode::Branch { left, right } => {
            word.push(false);
            let left_result = subset_rec(left, grid, height, word, bx);
            word.pop();
            if !left_result.possibly() {
                return Tribool::False;
            }
            word.push(true);
            let right_result = subset_rec(right, grid, height, word, bx);
            word.pop();
            if !right_result.possibly() {
                return Tribool::False;
            }
            left_result & right_result
        }
    }
}

/// Three-valued walk for `overlaps`: the first enabled leaf definitely
/// meeting the box decides.
fn overlaps_rec(
    node: &BinaryTreeNode,
    grid: &Grid,
    height: usize,
    word: &mut BinaryWord,
    bx: &Aabb,
) -> Tribool {
    let meets = cell_space_box(grid, height, word).overlaps(bx);
    if !meets.possibly() {
        return Tribool::False;
    }
    match node {
        BinaryTreeNode::Leaf(true) => meets,
        BinaryTreeNode::Leaf(false) => Tribool::False,
        BinaryTreeNode::Branch { left, right } => {
            word.push(false);
            let left_result = overlaps_rec(left, grid, height, word, bx);
            word.pop();
            if left_result.definitely() {
                return Tribool::True;
            }
            word.push(true);
            let right_result = overlaps_rec(right, grid, height, word, bx);
            word.pop();
            if right_result.definitely() {
                return Tribool::True;
            }
            left_result | right_result
        }
    }
}

/// The paths from the common primary cell of two views down to their
/// respective roots.
pub(crate) fn common_primary_cell_path(a: &GridCell, b: &GridCell) -> (BinaryWord, BinaryWord) {
    if b.height() > a.height() {
        let mut path_a = primary_cell_path(a.dimension(), b.height(), a.height());
        path_a.append(a.word());
        (path_a, b.word().clone())
    } else {
        let mut path_b = primary_cell_path(a.dimension(), a.height(), b.height());
        path_b.append(b.word());
        (a.word().clone(), path_b)
    }
}

/// Follow `path` from `node`, stopping early at a leaf.
pub(crate) fn locate_node<'a>(
    node: &'a BinaryTreeNode,
    path: &BinaryWord,
) -> &'a BinaryTreeNode {
    let mut current = node;
    for position in 0..path.len() {
        match current {
            BinaryTreeNode::Leaf(_) => break,
            BinaryTreeNode::Branch { left, right } => {
                current = if path[position] { right } else { left };
            }
        }
    }
    current
}

/// `sub ⊆ super` where `path` leads from `super`'s root to `sub`'s position.
fn subset_within(sub: &BinaryTreeNode, superset: &BinaryTreeNode, path: &BinaryWord) -> bool {
    if !sub.has_enabled() {
        return true;
    }
    if !superset.has_enabled() {
        return false;
    }
    let located = locate_node(superset, path);
    if located.is_leaf() {
        located.is_enabled()
    } else {
        BinaryTreeNode::subset(sub, located)
    }
}

/// `super ⊆ sub` where `path` leads from `super`'s root to `sub`'s position:
/// every branch `super` leaves aside along the path must be disabled.
fn subset_of_inner(superset: &BinaryTreeNode, path: &BinaryWord, sub: &BinaryTreeNode) -> bool {
    let mut position = 0;
    let mut extras_disabled = true;
    let mut current = superset;
    while position < path.len() && extras_disabled {
        match current {
            BinaryTreeNode::Leaf(_) => break,
            BinaryTreeNode::Branch { left, right } => {
                if path[position] {
                    extras_disabled = !left.has_enabled();
                    current = right;
                } else {
                    extras_disabled = !right.has_enabled();
                    current = left;
                }
            }
        }
        position += 1;
    }
    if !extras_disabled {
        return false;
    }
    match current {
        BinaryTreeNode::Leaf(false) => true,
        BinaryTreeNode::Leaf(true) => {
            // An enabled leaf part-way down the path covers more than `sub`'s
            // bounding cell.
            position >= path.len() && BinaryTreeNode::subset(current, sub)
        }
        BinaryTreeNode::Branch { .. } => BinaryTreeNode::subset(current, sub),
    }
}

/// Whether both trees own an enabled region inside the located subtree.
fn overlap_located(superset: &BinaryTreeNode, path: &BinaryWord, sub: &BinaryTreeNode) -> bool {
    if !superset.has_enabled() || !sub.has_enabled() {
        return false;
    }
    let located = locate_node(superset, path);
    if located.is_leaf() {
        located.is_enabled()
    } else {
        BinaryTreeNode::overlap(located, sub)
    }
}

/// Whether the set of `a` is a subset of the set of `b`.
pub fn subset(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> bool {
    assert_eq!(a.grid(), b.grid(), "pavings must share a grid");
    let (mut path_a, mut path_b) = common_primary_cell_path(a.cell(), b.cell());
    if path_a.is_prefix_of(&path_b) {
        path_b.erase_prefix(path_a.len());
        subset_of_inner(a.binary_tree(), &path_b, b.binary_tree())
    } else if path_b.is_prefix_of(&path_a) {
        path_a.erase_prefix(path_b.len());
        subset_within(a.binary_tree(), b.binary_tree(), &path_a)
    } else {
        // The bounding cells diverge; `a` can only fit inside `b` if empty.
        a.is_empty()
    }
}

/// Whether the set of `a` is a superset of the set of `b`.
pub fn superset(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> bool {
    subset(b, a)
}

/// Whether the sets share an enabled region.
pub fn overlap(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> bool {
    assert_eq!(a.grid(), b.grid(), "pavings must share a grid");
    let (mut path_a, mut path_b) = common_primary_cell_path(a.cell(), b.cell());
    if path_a.is_prefix_of(&path_b) {
        path_b.erase_prefix(path_a.len());
        overlap_located(a.binary_tree(), &path_b, b.binary_tree())
    } else if path_b.is_prefix_of(&path_a) {
        path_a.erase_prefix(path_b.len());
        overlap_located(b.binary_tree(), &path_a, a.binary_tree())
    } else {
        false
    }
}

/// Whether the sets have no enabled region in common.
pub fn disjoint(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> bool {
    !overlap(a, b)
}

/// Whether `cell` lies inside the set of the paving.
pub fn cell_in_paving(cell: &GridCell, set: &GridTreeSubset<'_>) -> bool {
    assert_eq!(cell.grid(), set.grid(), "cell and paving must share a grid");
    let (word_cell, word_set, _) = aligned_words(cell, set.cell());
    if word_set.is_prefix_of(&word_cell) {
        let mut path = word_cell;
        path.erase_prefix(word_set.len());
        set.binary_tree().is_enabled_at(&path)
    } else {
        false
    }
}

/// Whether `cell` shares an enabled region with the paving.
pub fn cell_overlaps_paving(cell: &GridCell, set: &GridTreeSubset<'_>) -> bool {
    assert_eq!(cell.grid(), set.grid(), "cell and paving must share a grid");
    let (word_cell, word_set, _) = aligned_words(cell, set.cell());
    if word_cell.is_prefix_of(&word_set) {
        // The cell contains the whole paving.
        set.binary_tree().has_enabled()
    } else if word_set.is_prefix_of(&word_cell) {
        let mut path = word_cell;
        path.erase_prefix(word_set.len());
        locate_node(set.binary_tree(), &path).has_enabled()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_grid::Grid;

    fn leaf(state: bool) -> BinaryTreeNode {
        BinaryTreeNode::Leaf(state)
    }

    fn root_cell(grid: &Grid, height: usize) -> GridCell {
        GridCell::new(grid.clone(), height, BinaryWord::new())
    }

    #[test]
    fn measures_and_sizes() {
        let grid = Grid::unit(2);
        // Left half enabled: [0, 0.5] x [0, 1].
        let tree = BinaryTreeNode::branch(leaf(true), leaf(false));
        let view = GridTreeSubset::new(root_cell(&grid, 0), &tree);
        assert_eq!(view.size(), 1);
        assert_eq!(view.depth(), 1);
        assert!(!view.is_empty());
        assert_eq!(view.measure(), 0.5);
        assert_eq!(
            view.bounding_box(),
            Some(Aabb::from_corners(&[0.0, 0.0], &[0.5, 1.0]))
        );
    }

    #[test]
    fn box_predicates_on_half_paving() {
        let grid = Grid::unit(2);
        let tree = BinaryTreeNode::branch(leaf(true), leaf(false));
        let view = GridTreeSubset::new(root_cell(&grid, 0), &tree);

        let inside = Aabb::from_corners(&[0.1, 0.1], &[0.4, 0.9]);
        assert!(view.covers(&inside).definitely());
        assert!(view.overlaps(&inside).definitely());
        assert!(!view.disjoint(&inside).possibly());

        let outside = Aabb::from_corners(&[0.6, 0.1], &[0.9, 0.9]);
        assert!(!view.covers(&outside).possibly());
        assert!(view.disjoint(&outside).definitely());

        let straddling = Aabb::from_corners(&[0.4, 0.1], &[0.6, 0.9]);
        assert!(!view.covers(&straddling).possibly());
        assert!(view.overlaps(&straddling).definitely());

        // The paving is a subset of its own half-space, not of the outside.
        assert!(view
            .subset_of(&Aabb::from_corners(&[0.0, 0.0], &[0.5, 1.0]))
            .definitely());
        assert!(!view.subset_of(&outside).possibly());
    }

    #[test]
    fn subset_and_overlap_between_views() {
        let grid = Grid::unit(2);
        let half = BinaryTreeNode::branch(leaf(true), leaf(false));
        let quarter = BinaryTreeNode::branch(
            BinaryTreeNode::branch(leaf(true), leaf(false)),
            leaf(false),
        );
        let full = leaf(true);
        let half_view = GridTreeSubset::new(root_cell(&grid, 0), &half);
        let quarter_view = GridTreeSubset::new(root_cell(&grid, 0), &quarter);
        let full_view = GridTreeSubset::new(root_cell(&grid, 0), &full);

        assert!(subset(&quarter_view, &half_view));
        assert!(!subset(&half_view, &quarter_view));
        assert!(subset(&half_view, &full_view));
        assert!(superset(&full_view, &quarter_view));
        assert!(overlap(&quarter_view, &half_view));

        let other_half = BinaryTreeNode::branch(leaf(false), leaf(true));
        let other_view = GridTreeSubset::new(root_cell(&grid, 0), &other_half);
        assert!(disjoint(&half_view, &other_view));
        assert!(!overlap(&half_view, &other_view));
    }

    #[test]
    fn subset_across_heights() {
        let grid = Grid::unit(1);
        // A height-0 paving of the whole unit cell...
        let low = leaf(true);
        let low_view = GridTreeSubset::new(root_cell(&grid, 0), &low);
        // ...and a height-1 paving enabling the same region (the upper half
        // of the height-1 primary cell [-1, 1]).
        let lifted = BinaryTreeNode::branch(leaf(false), leaf(true));
        let lifted_view = GridTreeSubset::new(root_cell(&grid, 1), &lifted);
        assert!(subset(&low_view, &lifted_view));
        assert!(subset(&lifted_view, &low_view));
        assert!(overlap(&low_view, &lifted_view));

        // Enabling the lower half instead makes the sets disjoint.
        let elsewhere = BinaryTreeNode::branch(leaf(true), leaf(false));
        let elsewhere_view = GridTreeSubset::new(root_cell(&grid, 1), &elsewhere);
        assert!(disjoint(&low_view, &elsewhere_view));
        assert!(!subset(&lifted_view, &elsewhere_view));
    }

    #[test]
    fn cells_against_pavings() {
        let grid = Grid::unit(2);
        let half = BinaryTreeNode::branch(leaf(true), leaf(false));
        let view = GridTreeSubset::new(root_cell(&grid, 0), &half);

        let in_cell = GridCell::new(grid.clone(), 0, BinaryWord::from([false, true]));
        let out_cell = GridCell::new(grid.clone(), 0, BinaryWord::from([true, true]));
        assert!(cell_in_paving(&in_cell, &view));
        assert!(!cell_in_paving(&out_cell, &view));
        assert!(cell_overlaps_paving(&in_cell, &view));
        assert!(!cell_overlaps_paving(&out_cell, &view));

        // The primary cell contains the paving, so it overlaps but is no
        // subset.
        let primary = GridCell::new(grid.clone(), 0, BinaryWord::new());
        assert!(cell_overlaps_paving(&primary, &view));
        assert!(!cell_in_paving(&primary, &view));
    }
}
