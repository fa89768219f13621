// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree surgery: connecting, disconnecting and moving nodes.
//!
//! Every operation checks its preconditions first and returns a
//! [`TreeError`] without touching the tree if one fails. The `move_*`
//! operations re-base the moved node so that its absolute position does not
//! jump; the `simple_move_*` variants keep the local values as they are.

use super::geometry::Sampling;
use super::id::{INVALID, NodeId};
use super::store::NodeTree;
use crate::error::TreeError;

impl NodeTree {
    // -- Connecting --

    /// Links a detached node under `parent`, as first or last child.
    ///
    /// # Errors
    ///
    /// [`TreeError::Attached`] if `id` already has a parent,
    /// [`TreeError::WouldCycle`] if `parent` is `id` or one of its
    /// descendants.
    pub fn connect_as_child(
        &mut self,
        id: NodeId,
        parent: NodeId,
        first: bool,
    ) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(parent);
        if self.parent[id.idx as usize] != INVALID {
            return Err(TreeError::Attached(id));
        }
        if self.is_in_branch_of(parent, id) {
            return Err(TreeError::WouldCycle(id, parent));
        }
        self.link_as_child(id.idx, parent.idx, first);
        Ok(())
    }

    /// Links a detached node next to `bro`, as its big brother (`before`) or
    /// little brother.
    ///
    /// # Errors
    ///
    /// [`TreeError::SameNode`], [`TreeError::NoParent`] if `bro` is
    /// detached, [`TreeError::Attached`], or [`TreeError::WouldCycle`].
    pub fn connect_as_sibling(
        &mut self,
        id: NodeId,
        bro: NodeId,
        before: bool,
    ) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(bro);
        if id == bro {
            return Err(TreeError::SameNode(id));
        }
        let parent = self.parent(bro).ok_or(TreeError::NoParent(bro))?;
        if self.parent[id.idx as usize] != INVALID {
            return Err(TreeError::Attached(id));
        }
        if self.is_in_branch_of(parent, id) {
            return Err(TreeError::WouldCycle(id, parent));
        }
        self.link_as_sibling(id.idx, bro.idx, before);
        Ok(())
    }

    // -- Disconnecting --

    /// Unlinks a node (and its subtree) from its parent. The node stays alive
    /// and can be connected again; use [`destroy`](Self::destroy) to free it.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if the node is already detached.
    pub fn disconnect(&mut self, id: NodeId) -> Result<(), TreeError> {
        self.validate(id);
        if self.parent[id.idx as usize] == INVALID {
            return Err(TreeError::NoParent(id));
        }
        self.unlink(id.idx);
        Ok(())
    }

    /// Disconnects the first (or last) child and returns it.
    pub fn disconnect_child(&mut self, id: NodeId, first: bool) -> Option<NodeId> {
        let child = if first {
            self.first_child(id)?
        } else {
            self.last_child(id)?
        };
        self.unlink(child.idx);
        Some(child)
    }

    /// Disconnects the big (or little) brother and returns it.
    pub fn disconnect_sibling(&mut self, id: NodeId, big: bool) -> Option<NodeId> {
        let bro = if big {
            self.prev_sibling(id)?
        } else {
            self.next_sibling(id)?
        };
        self.unlink(bro.idx);
        Some(bro)
    }

    // -- Reordering --

    /// Moves a node within its sibling list, just before or just after `bro`.
    ///
    /// # Errors
    ///
    /// [`TreeError::SameNode`], [`TreeError::NoParent`], or
    /// [`TreeError::NotSiblings`] if the nodes have different parents.
    pub fn move_within_siblings(
        &mut self,
        id: NodeId,
        bro: NodeId,
        before: bool,
    ) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(bro);
        if id == bro {
            return Err(TreeError::SameNode(id));
        }
        let parent = self.parent[bro.idx as usize];
        if parent == INVALID {
            return Err(TreeError::NoParent(bro));
        }
        if parent != self.parent[id.idx as usize] {
            return Err(TreeError::NotSiblings(id, bro));
        }
        self.unlink(id.idx);
        self.link_as_sibling(id.idx, bro.idx, before);
        Ok(())
    }

    /// Moves a node to the front (eldest) or back of its sibling list.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if the node is detached.
    pub fn move_to_end(&mut self, id: NodeId, first: bool) -> Result<(), TreeError> {
        self.validate(id);
        let parent = self.parent[id.idx as usize];
        if parent == INVALID {
            return Err(TreeError::NoParent(id));
        }
        let at_end = if first {
            self.prev_sibling[id.idx as usize] == INVALID
        } else {
            self.next_sibling[id.idx as usize] == INVALID
        };
        if !at_end {
            self.unlink(id.idx);
            self.link_as_child(id.idx, parent, first);
        }
        Ok(())
    }

    // -- Moving with re-basing --

    /// Moves a node next to `bro`, re-basing it so that it stays where it
    /// is on screen.
    ///
    /// # Errors
    ///
    /// As [`simple_move_to_sibling`](Self::simple_move_to_sibling).
    pub fn move_to_sibling(
        &mut self,
        id: NodeId,
        bro: NodeId,
        before: bool,
    ) -> Result<(), TreeError> {
        let parent = self.check_sibling_move(id, bro)?;
        self.rebase_into(id, parent);
        self.relink_as_sibling(id, bro, before);
        Ok(())
    }

    /// Moves a node next to `bro` without changing its local values.
    ///
    /// # Errors
    ///
    /// [`TreeError::SameNode`], [`TreeError::NoParent`] if `bro` is
    /// detached, or [`TreeError::WouldCycle`] if `bro` is inside `id`'s
    /// branch.
    pub fn simple_move_to_sibling(
        &mut self,
        id: NodeId,
        bro: NodeId,
        before: bool,
    ) -> Result<(), TreeError> {
        self.check_sibling_move(id, bro)?;
        self.relink_as_sibling(id, bro, before);
        Ok(())
    }

    /// Moves a node under `parent`, re-basing it so that it stays where it
    /// is on screen.
    ///
    /// # Errors
    ///
    /// [`TreeError::WouldCycle`] if `parent` is in `id`'s branch.
    pub fn move_to_parent(
        &mut self,
        id: NodeId,
        parent: NodeId,
        first: bool,
    ) -> Result<(), TreeError> {
        self.check_parent_move(id, parent)?;
        self.rebase_into(id, parent);
        self.relink_as_child(id, parent, first);
        Ok(())
    }

    /// Moves a node under `parent` without changing its local values.
    ///
    /// # Errors
    ///
    /// [`TreeError::WouldCycle`] if `parent` is in `id`'s branch.
    pub fn simple_move_to_parent(
        &mut self,
        id: NodeId,
        parent: NodeId,
        first: bool,
    ) -> Result<(), TreeError> {
        self.check_parent_move(id, parent)?;
        self.relink_as_child(id, parent, first);
        Ok(())
    }

    /// Lifts a node out of its parent to become the parent's sibling, just
    /// before or after it. Leaves carry the old parent's scale in their size,
    /// branches in their scale.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if the node or its parent is detached.
    pub fn move_up(&mut self, id: NodeId, before: bool) -> Result<(), TreeError> {
        self.validate(id);
        let parent = self.parent(id).ok_or(TreeError::NoParent(id))?;
        if self.parent[parent.idx as usize] == INVALID {
            return Err(TreeError::NoParent(parent));
        }
        self.unlink(id.idx);
        self.link_as_sibling(id.idx, parent.idx, before);

        let p = &self.transform[parent.idx as usize];
        let (px, py, sx, sy) = (p.x.real(), p.y.real(), p.scale_x.real(), p.scale_y.real());
        let branch = self.first_child[id.idx as usize] != INVALID;
        let t = &mut self.transform[id.idx as usize];
        t.x.referential_up(px, sx);
        t.y.referential_up(py, sy);
        if branch {
            t.scale_x.referential_up_as_delta(sx);
            t.scale_y.referential_up_as_delta(sy);
        } else {
            t.width.referential_up_as_delta(sx);
            t.height.referential_up_as_delta(sy);
        }
        Ok(())
    }

    /// Moves a node down into one of its siblings, as first or last child.
    ///
    /// # Errors
    ///
    /// [`TreeError::SameNode`], [`TreeError::NoParent`], or
    /// [`TreeError::NotSiblings`].
    pub fn move_down_into(
        &mut self,
        id: NodeId,
        bro: NodeId,
        first: bool,
    ) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(bro);
        if id == bro {
            return Err(TreeError::SameNode(id));
        }
        let parent = self.parent[bro.idx as usize];
        if parent == INVALID {
            return Err(TreeError::NoParent(bro));
        }
        if parent != self.parent[id.idx as usize] {
            return Err(TreeError::NotSiblings(id, bro));
        }
        self.unlink(id.idx);
        self.link_as_child(id.idx, bro.idx, first);

        let b = &self.transform[bro.idx as usize];
        let (bx, by, sx, sy) = (b.x.real(), b.y.real(), b.scale_x.real(), b.scale_y.real());
        let branch = self.first_child[id.idx as usize] != INVALID;
        let t = &mut self.transform[id.idx as usize];
        t.x.referential_down(bx, sx);
        t.y.referential_down(by, sy);
        if branch {
            t.scale_x.referential_down_as_delta(sx);
            t.scale_y.referential_down_as_delta(sy);
        } else {
            t.width.referential_down_as_delta(sx);
            t.height.referential_down_as_delta(sy);
        }
        Ok(())
    }

    /// Swaps the places of two nodes, re-basing both.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoParent`] if either node is detached,
    /// [`TreeError::SameNode`], or [`TreeError::WouldCycle`] if one node is
    /// inside the other's branch.
    pub fn permute_with(&mut self, id: NodeId, other: NodeId) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(other);
        if id == other {
            return Err(TreeError::SameNode(id));
        }
        let old_parent = self.parent(id).ok_or(TreeError::NoParent(id))?;
        if self.parent[other.idx as usize] == INVALID {
            return Err(TreeError::NoParent(other));
        }
        if self.is_in_branch_of(other, id) {
            return Err(TreeError::WouldCycle(other, id));
        }
        if self.is_in_branch_of(id, other) {
            return Err(TreeError::WouldCycle(id, other));
        }
        match self.prev_sibling(id) {
            None => {
                self.move_to_sibling(id, other, true)?;
                self.move_to_parent(other, old_parent, true)?;
            }
            Some(big) => {
                self.move_to_sibling(id, other, true)?;
                // Adjacent siblings are already swapped.
                if big != other {
                    self.move_to_sibling(other, big, false)?;
                }
            }
        }
        Ok(())
    }

    // -- Helpers --

    fn check_sibling_move(&self, id: NodeId, bro: NodeId) -> Result<NodeId, TreeError> {
        self.validate(id);
        self.validate(bro);
        if id == bro {
            return Err(TreeError::SameNode(id));
        }
        let parent = self.parent(bro).ok_or(TreeError::NoParent(bro))?;
        if self.is_in_branch_of(parent, id) {
            return Err(TreeError::WouldCycle(id, parent));
        }
        Ok(parent)
    }

    fn check_parent_move(&self, id: NodeId, parent: NodeId) -> Result<(), TreeError> {
        self.validate(id);
        self.validate(parent);
        if self.is_in_branch_of(parent, id) {
            return Err(TreeError::WouldCycle(id, parent));
        }
        Ok(())
    }

    fn relink_as_sibling(&mut self, id: NodeId, bro: NodeId, before: bool) {
        if self.parent[id.idx as usize] != INVALID {
            self.unlink(id.idx);
        }
        self.link_as_sibling(id.idx, bro.idx, before);
    }

    fn relink_as_child(&mut self, id: NodeId, parent: NodeId, first: bool) {
        if self.parent[id.idx as usize] != INVALID {
            self.unlink(id.idx);
        }
        self.link_as_child(id.idx, parent.idx, first);
    }

    /// Re-expresses `id`'s values in the frame of `new_parent`'s children,
    /// keeping its absolute position and size.
    fn rebase_into(&mut self, id: NodeId, new_parent: NodeId) {
        let from = self.parent_frame(id, Sampling::Target);
        let dest = self.inner_frame(new_parent, Sampling::Target);
        let abs = from.to_reference(self.transform[id.idx as usize].position());
        let branch = self.first_child[id.idx as usize] != INVALID;
        let t = &mut self.transform[id.idx as usize];
        t.x.new_referential(abs.x, dest.origin.x, from.scale.x, dest.scale.x);
        t.y.new_referential(abs.y, dest.origin.y, from.scale.y, dest.scale.y);
        if branch {
            t.scale_x.new_referential_as_delta(from.scale.x, dest.scale.x);
            t.scale_y.new_referential_as_delta(from.scale.y, dest.scale.y);
        } else {
            t.width.new_referential_as_delta(from.scale.x, dest.scale.x);
            t.height.new_referential_as_delta(from.scale.y, dest.scale.y);
        }
    }
}
