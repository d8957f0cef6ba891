// Copyright 2025 the Tessella Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The owning paving: re-rooting, alignment, and exact set algebra.
//!
//! A `GridTreeSet` owns its tree and is always rooted at a primary cell, so
//! its root word is empty. Binary operations first re-root both operands to
//! a common primary cell (growing the lower tree with [`prepend_tree`]
//! chains whose new siblings are disabled) and then delegate to the pure
//! tree algebra. Every set-algebraic mutation leaves the tree recombined.
//!
//! [`prepend_tree`]: BinaryTreeNode::prepend_tree

use bitflags::bitflags;
use core::mem;

use tessella_grid::{Aabb, BinaryWord, Grid, Tribool};

use crate::cell::{
    GridCell, primary_cell_path, smallest_enclosing_primary_cell_height_on_grid,
};
use crate::cursor::GridCells;
use crate::node::BinaryTreeNode;
use crate::subset::GridTreeSubset;

bitflags! {
    /// Leaf kinds that stop a descent during [`GridTreeSet::align_with_cell`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AlignStop: u8 {
        /// Stop when the descent meets an enabled leaf.
        const ON_ENABLED = 0b01;
        /// Stop when the descent meets a disabled leaf.
        const ON_DISABLED = 0b10;
    }
}

/// An owning paving: a grid, a primary root cell, and the tree of cells.
#[derive(Clone, Debug)]
pub struct GridTreeSet {
    cell: GridCell,
    root: BinaryTreeNode,
}

impl GridTreeSet {
    /// The empty paving on `grid`, rooted at the height-0 primary cell.
    pub fn new(grid: Grid) -> Self {
        Self::with_height(grid, 0)
    }

    /// The empty paving rooted at the primary cell of the given height.
    pub fn with_height(grid: Grid, height: usize) -> Self {
        Self {
            cell: GridCell::new(grid, height, BinaryWord::new()),
            root: BinaryTreeNode::Leaf(false),
        }
    }

    /// The empty paving on the unit grid of the given dimension.
    pub fn unit(dimension: usize) -> Self {
        Self::new(Grid::unit(dimension))
    }

    /// The paving of a single cell.
    pub fn from_cell(cell: &GridCell) -> Self {
        let mut set = Self::with_height(cell.grid().clone(), cell.height());
        set.adjoin(cell);
        set
    }

    /// The empty paving rooted at the smallest primary cell enclosing
    /// `space_box`.
    pub fn enclosing(grid: Grid, space_box: &Aabb) -> Self {
        let height = smallest_enclosing_primary_cell_height_on_grid(space_box, &grid);
        Self::with_height(grid, height)
    }

    /// A paving over an explicit tree rooted at the given height.
    pub fn from_parts(grid: Grid, height: usize, root: BinaryTreeNode) -> Self {
        Self {
            cell: GridCell::new(grid, height, BinaryWord::new()),
            root,
        }
    }

    /// Rebuild a paving from the pre-order words of
    /// [`to_binary_words`](Self::to_binary_words).
    pub fn from_words(
        grid: Grid,
        height: usize,
        tree: &BinaryWord,
        leaves: &BinaryWord,
    ) -> Self {
        Self::from_parts(grid, height, BinaryTreeNode::from_words(tree, leaves))
    }

    /// The root cell of the paving (a primary cell).
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

    /// The underlying tree.
    #[inline]
    pub fn binary_tree(&self) -> &BinaryTreeNode {
        &self.root
    }

    pub(crate) fn binary_tree_mut(&mut self) -> &mut BinaryTreeNode {
        &mut self.root
    }

    /// A borrowing view of the whole paving.
    pub fn as_subset(&self) -> GridTreeSubset<'_> {
        GridTreeSubset::new(self.cell.clone(), &self.root)
    }

    /// Iterate the enabled cells in pre-order, left before right.
    pub fn iter(&self) -> GridCells<'_> {
        GridCells::new(self.cell.clone(), &self.root)
    }

    /// The number of enabled leaves.
    pub fn size(&self) -> usize {
        self.root.count_enabled_leaves()
    }

    /// Whether no cell is enabled.
    pub fn is_empty(&self) -> bool {
        !self.root.has_enabled()
    }

    /// The depth of the tree below the primary cell.
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// The total measure of the enabled cells.
    pub fn measure(&self) -> f64 {
        self.as_subset().measure()
    }

    /// The union bounding box of the enabled cells, `None` when empty.
    pub fn bounding_box(&self) -> Option<Aabb> {
        self.as_subset().bounding_box()
    }

    /// The enabled cells as plain boxes.
    pub fn to_boxes(&self) -> alloc::vec::Vec<Aabb> {
        self.as_subset().to_boxes()
    }

    /// Serialize the tree to pre-order shape and state words.
    pub fn to_binary_words(&self) -> (BinaryWord, BinaryWord) {
        self.as_subset().to_binary_words()
    }

    /// Whether the paving covers `bx`.
    pub fn covers(&self, bx: &Aabb) -> Tribool {
        self.as_subset().covers(bx)
    }

    /// Whether the paving is a subset of `bx`.
    pub fn subset_of(&self, bx: &Aabb) -> Tribool {
        self.as_subset().subset_of(bx)
    }

    /// Whether the paving overlaps the interior of `bx`.
    pub fn overlaps(&self, bx: &Aabb) -> Tribool {
        self.as_subset().overlaps(bx)
    }

    /// Whether the paving is disjoint from `bx`.
    pub fn disjoint(&self, bx: &Aabb) -> Tribool {
        self.as_subset().disjoint(bx)
    }

    /// Split every non-disabled leaf `subdivisions_per_dim` times per axis.
    pub fn mince(&mut self, subdivisions_per_dim: usize) {
        let depth = subdivisions_per_dim * self.dimension();
        self.mince_to_tree_depth(depth);
    }

    /// Split every non-disabled leaf down to the given tree depth.
    pub fn mince_to_tree_depth(&mut self, depth: usize) {
        self.root.mince(depth);
    }

    /// Recombine sibling leaves of equal state, bottom-up.
    pub fn recombine(&mut self) {
        self.root.recombine();
    }

    /// Refine until every axis of every cell is at most `max_cell_width`
    /// wide.
    ///
    /// The axis needing the most halvings is reached first (the subdivision
    /// axis cycles from the one last split), then `(M - 1) · d` further
    /// levels complete the remaining halvings.
    pub fn subdivide(&mut self, max_cell_width: f64) {
        assert!(max_cell_width > 0.0, "the width bound must be positive");
        let root_box = self.cell.space_box();
        let dimensions = self.dimension();

        let mut max_subdivisions = 0;
        let mut max_subdiv_axis = 0;
        for axis in 0..dimensions {
            let needed = subdivisions_needed(root_box[axis].width(), max_cell_width);
            if needed >= max_subdivisions {
                max_subdivisions = needed;
                max_subdiv_axis = axis;
            }
        }

        let mut needed_tree_depth = 0;
        if max_subdivisions != 0 {
            let path_len = self.cell.word().len();
            let last_axis: isize = if path_len == 0 {
                -1
            } else {
                ((path_len - 1) % dimensions) as isize
            };
            let ahead = max_subdiv_axis as isize - last_axis;
            let first_steps = if ahead > 0 {
                ahead as usize
            } else if ahead == 0 {
                dimensions
            } else {
                dimensions - ahead.unsigned_abs()
            };
            needed_tree_depth = first_steps + (max_subdivisions - 1) * dimensions;
        }

        self.mince_to_tree_depth(needed_tree_depth);
    }

    /// Re-root the paving to the primary cell at `height`, which must not be
    /// below the current root. The new sibling branches are disabled leaves,
    /// so the enabled region is unchanged.
    pub fn up_to_primary_cell(&mut self, height: usize) {
        let current = self.cell.height();
        assert!(height >= current, "cannot re-root below the current root");
        let path = primary_cell_path(self.dimension(), height, current);
        let old_root = mem::replace(&mut self.root, BinaryTreeNode::Leaf(false));
        self.root = BinaryTreeNode::prepend_tree(&path, old_root);
        self.cell = GridCell::new(self.grid().clone(), height, BinaryWord::new());
    }

    /// Reach the node paving the primary cell at `height`: re-root when that
    /// cell is higher than the current root, descend (splitting leaves)
    /// when it is lower. Meeting a leaf named by `stop` aborts the descent
    /// and returns `None`.
    pub(crate) fn align_with_cell(
        &mut self,
        height: usize,
        stop: AlignStop,
    ) -> Option<&mut BinaryTreeNode> {
        let current = self.cell.height();
        if current > height {
            let path = primary_cell_path(self.dimension(), current, height);
            let mut node = &mut self.root;
            for position in 0..path.len() {
                if (node.is_enabled() && stop.contains(AlignStop::ON_ENABLED))
                    || (node.is_disabled() && stop.contains(AlignStop::ON_DISABLED))
                {
                    return None;
                }
                node.split();
                node = match node {
                    BinaryTreeNode::Branch { left, right } => {
                        if path[position] {
                            &mut **right
                        } else {
                            &mut **left
                        }
                    }
                    BinaryTreeNode::Leaf(_) => unreachable!("split leaves a branch"),
                };
            }
            Some(node)
        } else {
            if current < height {
                self.up_to_primary_cell(height);
            }
            Some(&mut self.root)
        }
    }

    /// Adjoin a single cell.
    pub fn adjoin(&mut self, cell: &GridCell) {
        assert_eq!(self.grid(), cell.grid(), "pavings must share a grid");
        if let Some(node) = self.align_with_cell(cell.height(), AlignStop::ON_ENABLED) {
            node.add_enabled_path(cell.word());
        }
        self.root.recombine();
    }

    /// Adjoin every enabled cell of another paving.
    pub fn adjoin_subset(&mut self, other: &GridTreeSubset<'_>) {
        assert_eq!(self.grid(), other.grid(), "pavings must share a grid");
        if let Some(node) = self.align_with_cell(other.cell().height(), AlignStop::ON_ENABLED) {
            node.add_enabled_subtree(other.binary_tree(), other.cell().word());
        }
        self.root.recombine();
    }

    /// Keep only the cells also enabled in `other`.
    pub fn restrict(&mut self, other: &GridTreeSubset<'_>) {
        assert_eq!(self.grid(), other.grid(), "pavings must share a grid");
        if self.cell.height() < other.cell().height() {
            self.up_to_primary_cell(other.cell().height());
        }
        self.restrict_to_lower(other);
        self.root.recombine();
    }

    /// Disable the cells enabled in `other`.
    pub fn remove(&mut self, other: &GridTreeSubset<'_>) {
        assert_eq!(self.grid(), other.grid(), "pavings must share a grid");
        if self.cell.height() < other.cell().height() {
            self.up_to_primary_cell(other.cell().height());
        }
        self.remove_from_lower(other);
        self.root.recombine();
    }

    /// Disable a single cell.
    pub fn remove_cell(&mut self, cell: &GridCell) {
        assert_eq!(self.grid(), cell.grid(), "pavings must share a grid");
        if let Some(mut node) = self.align_with_cell(cell.height(), AlignStop::ON_DISABLED) {
            let path = cell.word();
            let mut position = 0;
            while position < path.len() && !node.is_leaf() {
                node = match node {
                    BinaryTreeNode::Branch { left, right } => {
                        if path[position] {
                            &mut **right
                        } else {
                            &mut **left
                        }
                    }
                    BinaryTreeNode::Leaf(_) => unreachable!("the loop stops at leaves"),
                };
                position += 1;
            }
            if node.is_leaf() {
                if node.is_enabled() {
                    // Split the enabled leaf down to the cell and switch the
                    // cell itself off.
                    for p in position..path.len() {
                        node.split();
                        node = match node {
                            BinaryTreeNode::Branch { left, right } => {
                                if path[p] {
                                    &mut **right
                                } else {
                                    &mut **left
                                }
                            }
                            BinaryTreeNode::Leaf(_) => unreachable!("split leaves a branch"),
                        };
                    }
                    node.make_leaf(false);
                }
            } else {
                // The whole subtree below the cell goes away.
                node.make_leaf(false);
            }
        }
        self.root.recombine();
    }

    /// Make the paving empty.
    pub fn clear(&mut self) {
        let grid = self.grid().clone();
        *self = Self::new(grid);
    }

    /// Disable every cell outside the primary cell at `height`. A paving
    /// already rooted at or below that height is unchanged.
    pub fn restrict_to_height(&mut self, height: usize) {
        if self.cell.height() <= height {
            return;
        }
        let path = primary_cell_path(self.dimension(), self.cell.height(), height);
        let mut node = &mut self.root;
        for position in 0..path.len() {
            if node.is_leaf() {
                if node.is_enabled() {
                    node.split();
                } else {
                    break;
                }
            }
            node = match node {
                BinaryTreeNode::Branch { left, right } => {
                    if path[position] {
                        left.make_leaf(false);
                        &mut **right
                    } else {
                        right.make_leaf(false);
                        &mut **left
                    }
                }
                BinaryTreeNode::Leaf(_) => unreachable!("leaves are split or break the loop"),
            };
        }
        self.root.recombine();
    }

    /// Restrict against a paving whose primary cell is not above this one's.
    fn restrict_to_lower(&mut self, other: &GridTreeSubset<'_>) {
        let mut path = primary_cell_path(
            self.dimension(),
            self.cell.height(),
            other.cell().height(),
        );
        path.append(other.cell().word());

        let mut node = &mut self.root;
        for position in 0..path.len() {
            if node.is_disabled() {
                // The intersection below here is already empty.
                return;
            }
            node.split();
            node = match node {
                BinaryTreeNode::Branch { left, right } => {
                    if path[position] {
                        left.make_leaf(false);
                        &mut **right
                    } else {
                        right.make_leaf(false);
                        &mut **left
                    }
                }
                BinaryTreeNode::Leaf(_) => unreachable!("split leaves a branch"),
            };
        }
        if node.is_enabled() {
            *node = other.binary_tree().clone();
        } else if !node.is_disabled() {
            node.restrict(other.binary_tree());
        }
    }

    /// Remove a paving whose primary cell is not above this one's.
    fn remove_from_lower(&mut self, other: &GridTreeSubset<'_>) {
        let mut path = primary_cell_path(
            self.dimension(),
            self.cell.height(),
            other.cell().height(),
        );
        path.append(other.cell().word());

        let mut node = &mut self.root;
        for position in 0..path.len() {
            if node.is_disabled() {
                return;
            }
            node.split();
            node = match node {
                BinaryTreeNode::Branch { left, right } => {
                    if path[position] {
                        &mut **right
                    } else {
                        &mut **left
                    }
                }
                BinaryTreeNode::Leaf(_) => unreachable!("split leaves a branch"),
            };
        }
        if !node.is_disabled() {
            node.remove(other.binary_tree());
        }
    }
}

impl<'a> IntoIterator for &'a GridTreeSet {
    type Item = GridCell;
    type IntoIter = GridCells<'a>;

    fn into_iter(self) -> GridCells<'a> {
        self.iter()
    }
}

/// The smallest number of halvings bringing `width` at or below `max_width`.
fn subdivisions_needed(mut width: f64, max_width: f64) -> usize {
    let mut count = 0;
    while width > max_width {
        width /= 2.0;
        count += 1;
    }
    count
}

/// The union of two pavings, rooted at the higher of the two primary cells.
pub fn join(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> GridTreeSet {
    assert_eq!(a.grid(), b.grid(), "pavings must share a grid");
    let height = a.cell().height().max(b.cell().height());
    let mut result = GridTreeSet::with_height(a.grid().clone(), height);
    result.adjoin_subset(a);
    result.adjoin_subset(b);
    result
}

/// The intersection of two pavings.
pub fn intersection(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> GridTreeSet {
    assert_eq!(a.grid(), b.grid(), "pavings must share a grid");
    let height = a.cell().height().max(b.cell().height());
    let mut result = GridTreeSet::with_height(a.grid().clone(), height);
    result.adjoin_subset(a);
    result.restrict(b);
    result
}

/// The set difference `a \ b` of two pavings.
pub fn difference(a: &GridTreeSubset<'_>, b: &GridTreeSubset<'_>) -> GridTreeSet {
    assert_eq!(a.grid(), b.grid(), "pavings must share a grid");
    let height = a.cell().height().max(b.cell().height());
    let mut result = GridTreeSet::with_height(a.grid().clone(), height);
    result.adjoin_subset(a);
    result.remove(b);
    result
}
