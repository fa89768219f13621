// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Borrowing iterators over the node tree.

use super::geometry::Sampling;
use super::id::{INVALID, NodeId};
use super::store::NodeTree;
use crate::cursor::TreeCursor;

/// Iterator over the direct children of a node, eldest first.
#[derive(Clone, Debug)]
pub struct Children<'a> {
    tree: &'a NodeTree,
    next: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(tree: &'a NodeTree, first: u32) -> Self {
        Self { tree, next: first }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.tree.next_sibling[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// Iterator from a node's parent up to the root.
#[derive(Clone, Debug)]
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        if self.next == INVALID {
            return None;
        }
        let idx = self.next;
        self.next = self.tree.parent[idx as usize];
        Some(self.tree.id_at(idx))
    }
}

/// Pre-order iterator over a node and all its descendants.
///
/// Drives a [`TreeCursor`], so it needs no stack.
#[derive(Clone, Debug)]
pub struct Branch<'a> {
    tree: &'a NodeTree,
    cursor: TreeCursor,
    pending: Option<NodeId>,
}

impl Iterator for Branch<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.pending.take()?;
        if self.cursor.advance_to_next_node(self.tree) {
            self.pending = Some(self.cursor.pos());
        }
        Some(current)
    }
}

impl NodeTree {
    /// Returns an iterator from the parent of `id` up to the root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors {
            tree: self,
            next: self.parent[id.idx as usize],
        }
    }

    /// Returns a pre-order iterator over `id` and its whole subtree.
    #[must_use]
    pub fn branch(&self, id: NodeId) -> Branch<'_> {
        self.validate(id);
        Branch {
            tree: self,
            cursor: TreeCursor::new(self, id, Sampling::Target),
            pending: Some(id),
        }
    }
}
