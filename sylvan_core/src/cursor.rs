// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Iterative tree walker that carries its coordinate frame.
//!
//! A [`TreeCursor`] sits on one node and knows the absolute [`Frame`] of that
//! node's parent. Moving down or up through a node updates the frame with
//! that node's position, depth and scale, so the absolute position of
//! whatever the cursor is on is always at hand, with no recursion and no
//! allocation. Moving sideways keeps the frame.
//!
//! The cursor does not borrow the tree: it is a small value, and every move
//! takes the tree as an argument. Lifecycle walks can therefore mutate the
//! tree between steps.

use kurbo::{Point, Vec2};

use crate::tree::{Flag, Frame, INVALID, NodeId, NodeTree, Sampling};

/// A position in the tree plus the frame of that position's parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeCursor {
    pos: NodeId,
    start: NodeId,
    frame: Frame,
    sampling: Sampling,
}

impl TreeCursor {
    /// Places a cursor on `at` with the absolute frame of its parent.
    #[must_use]
    pub fn new(tree: &NodeTree, at: NodeId, sampling: Sampling) -> Self {
        Self {
            pos: at,
            start: at,
            frame: tree.parent_frame(at, sampling),
            sampling,
        }
    }

    /// Places a cursor on `at` whose reference frame is `at`'s parent frame
    /// itself. Points given to [`is_in`](Self::is_in) are then expressed in
    /// that frame.
    #[must_use]
    pub fn local(at: NodeId, sampling: Sampling) -> Self {
        Self {
            pos: at,
            start: at,
            frame: Frame::IDENTITY,
            sampling,
        }
    }

    // -- State --

    /// The node the cursor is on.
    #[inline]
    #[must_use]
    pub const fn pos(&self) -> NodeId {
        self.pos
    }

    /// The node the cursor started from. DFS walks end there.
    #[inline]
    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    /// Frame of the current node's parent.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> Frame {
        self.frame
    }

    /// Position of the current node's centre in the cursor's reference
    /// frame.
    #[must_use]
    pub fn absolute_position(&self, tree: &NodeTree) -> Point {
        let (pos, _, _) = tree.local_frame_parts(self.pos.idx, self.sampling);
        self.frame.to_reference(pos)
    }

    /// Depth of the current node in the cursor's reference frame.
    #[must_use]
    pub fn absolute_z(&self, tree: &NodeTree) -> f64 {
        let (_, z, _) = tree.local_frame_parts(self.pos.idx, self.sampling);
        self.frame.z + z
    }

    /// Scale applied to the current node's children, in the cursor's
    /// reference frame.
    #[must_use]
    pub fn absolute_scale(&self, tree: &NodeTree) -> Vec2 {
        let (_, _, scale) = tree.local_frame_parts(self.pos.idx, self.sampling);
        self.frame.scale_vec(scale)
    }

    /// Whether `point` (in the cursor's reference frame) falls inside the
    /// current node's box. Edges count as inside.
    #[must_use]
    pub fn is_in(&self, tree: &NodeTree, point: Point) -> bool {
        let local = self.frame.to_local(point);
        let t = tree.transform(self.pos);
        let center = match self.sampling {
            Sampling::Target => t.position(),
            Sampling::Animated(now) => t.position_at(now),
        };
        (local.x - center.x).abs() <= t.delta_x() && (local.y - center.y).abs() <= t.delta_y()
    }

    /// Expresses a point of the cursor's reference frame in the frame of the
    /// current node's children.
    #[must_use]
    pub fn to_inner(&self, tree: &NodeTree, point: Point) -> Point {
        let (pos, z, scale) = tree.local_frame_parts(self.pos.idx, self.sampling);
        self.frame.enter(pos, z, scale).to_local(point)
    }

    // -- Moves --

    /// Moves to the little brother. Returns `false` at the last child.
    pub fn right(&mut self, tree: &NodeTree) -> bool {
        match tree.next_sibling(self.pos) {
            Some(n) => {
                self.pos = n;
                true
            }
            None => false,
        }
    }

    /// Moves to the big brother. Returns `false` at the first child.
    pub fn left(&mut self, tree: &NodeTree) -> bool {
        match tree.prev_sibling(self.pos) {
            Some(n) => {
                self.pos = n;
                true
            }
            None => false,
        }
    }

    /// Moves to the little brother, wrapping to the eldest at the end of the
    /// list. Returns `false` only for a detached node.
    pub fn right_loop(&mut self, tree: &NodeTree) -> bool {
        if self.right(tree) {
            return true;
        }
        match tree.parent(self.pos).and_then(|p| tree.first_child(p)) {
            Some(first) => {
                self.pos = first;
                true
            }
            None => false,
        }
    }

    /// Moves right at least once, then on past nodes carrying `flag`.
    /// Returns `false` if it ran out of siblings.
    pub fn right_without(&mut self, tree: &NodeTree, flag: Flag) -> bool {
        loop {
            if !self.right(tree) {
                return false;
            }
            if !tree.has_flag(self.pos, flag) {
                return true;
            }
        }
    }

    /// Mirror of [`right_without`](Self::right_without).
    pub fn left_without(&mut self, tree: &NodeTree, flag: Flag) -> bool {
        loop {
            if !self.left(tree) {
                return false;
            }
            if !tree.has_flag(self.pos, flag) {
                return true;
            }
        }
    }

    /// Moves into the eldest child. Returns `false` for a leaf.
    pub fn down(&mut self, tree: &NodeTree) -> bool {
        let Some(child) = tree.first_child(self.pos) else {
            return false;
        };
        self.enter(tree, child);
        true
    }

    /// Moves into the youngest child. Returns `false` for a leaf.
    pub fn down_last(&mut self, tree: &NodeTree) -> bool {
        let Some(child) = tree.last_child(self.pos) else {
            return false;
        };
        self.enter(tree, child);
        true
    }

    /// Moves into the first child not carrying `flag`. Returns `false`
    /// (staying on the current node) if there is none.
    pub fn down_without(&mut self, tree: &NodeTree, flag: Flag) -> bool {
        let Some(child) = tree
            .children(self.pos)
            .find(|&c| !tree.has_flag(c, flag))
        else {
            return false;
        };
        self.enter(tree, child);
        true
    }

    /// Moves to the parent. Returns `false` at a root.
    pub fn up(&mut self, tree: &NodeTree) -> bool {
        let Some(parent) = tree.parent(self.pos) else {
            return false;
        };
        let (pos, z, scale) = tree.local_frame_parts(parent.idx, self.sampling);
        self.frame = self.frame.leave(pos, z, scale);
        self.pos = parent;
        true
    }

    fn enter(&mut self, tree: &NodeTree, child: NodeId) {
        let (pos, z, scale) = tree.local_frame_parts(self.pos.idx, self.sampling);
        self.frame = self.frame.enter(pos, z, scale);
        self.pos = child;
    }

    // -- Depth-first walks --

    /// Steps to the next node of a pre-order walk of the start node's
    /// branch. Returns `false` once the walk is back at the start.
    pub fn advance_to_next_node(&mut self, tree: &NodeTree) -> bool {
        self.down(tree) || self.skip_branch(tree)
    }

    /// Steps past the current node's subtree to the next node of a
    /// pre-order walk of the start node's branch: the little brother, or
    /// that of the nearest ancestor that has one. Returns `false` once the
    /// walk is back at the start.
    pub fn skip_branch(&mut self, tree: &NodeTree) -> bool {
        loop {
            if self.pos == self.start {
                return false;
            }
            if self.right(tree) {
                return true;
            }
            if !self.up(tree) {
                tracing::error!(start = ?self.start, "cursor ran off the top of the tree");
                return false;
            }
        }
    }

    /// Puts the cursor on `at`, recomputing the frame of its parent. The
    /// start node is kept.
    ///
    /// Used to pick a walk up again after the tree changed under the
    /// cursor.
    pub fn jump_to(&mut self, tree: &NodeTree, at: NodeId) {
        self.frame = tree.parent_frame(at, self.sampling);
        self.pos = at;
    }

    /// Steps to the next node the display walk must visit.
    ///
    /// Descends only into nodes that are shown or flagged
    /// `branch_to_display`, clearing that flag on the way down. On the way
    /// past a node that is still display-active it re-raises the flag on
    /// the parent, so next frame's walk reaches it again.
    pub fn advance_to_next_to_display(&mut self, tree: &mut NodeTree) -> bool {
        let i = self.pos.idx as usize;
        let v = tree.flags[i].visibility;
        if tree.first_child[i] != INVALID && (v.show || v.branch_to_display) {
            tree.flags[i].visibility.branch_to_display = false;
            return self.down(tree);
        }
        loop {
            let idx = self.pos.idx;
            if tree.is_display_active_at(idx) {
                let p = tree.parent[idx as usize];
                if p != INVALID {
                    tree.flags[p as usize].visibility.branch_to_display = true;
                }
            }
            if self.pos == self.start {
                return false;
            }
            if self.right(tree) {
                return true;
            }
            if !self.up(tree) {
                tracing::error!(start = ?self.start, "display walk ran off the top of the tree");
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{NodeDesc, Prop};

    const EPS: f64 = 1e-9;

    fn desc(x: f64, y: f64) -> NodeDesc {
        NodeDesc::new(x, y, 2.0, 2.0)
    }

    #[test]
    fn frame_tracks_moves() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(1.0, 0.0));
        let group = tree.add_child(root, desc(2.0, 2.0));
        tree.set(group, Prop::ScaleX, 3.0, true);
        tree.set(group, Prop::ScaleY, 3.0, true);
        let a = tree.add_child(group, desc(1.0, 0.0));
        let b = tree.add_child(group, desc(-1.0, 0.0));

        let mut sq = TreeCursor::new(&tree, root, Sampling::Target);
        assert!(sq.down(&tree));
        assert!(sq.down(&tree));
        assert_eq!(sq.pos(), a);
        let p = sq.absolute_position(&tree);
        assert!((p.x - 6.0).abs() < EPS && (p.y - 2.0).abs() < EPS, "{p:?}");
        assert!(sq.right(&tree));
        assert_eq!(sq.pos(), b);
        let p = sq.absolute_position(&tree);
        assert!((p.x - 0.0).abs() < EPS, "{p:?}");
        assert_eq!(p, tree.absolute_position(b));
        assert!(!sq.right(&tree));
        assert!(sq.up(&tree));
        assert!(sq.up(&tree));
        assert_eq!(sq.pos(), root);
        assert_eq!(sq.frame(), Frame::IDENTITY);
        assert!(!sq.up(&tree));
    }

    #[test]
    fn is_in_uses_scaled_box() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(0.0, 0.0));
        tree.set(root, Prop::ScaleX, 2.0, true);
        let leaf = tree.add_child(root, desc(1.0, 0.0));
        let sq = TreeCursor::new(&tree, leaf, Sampling::Target);
        // The leaf spans x in [0, 2] locally, [0, 4] absolutely.
        assert!(sq.is_in(&tree, Point::new(3.5, 0.0)));
        assert!(sq.is_in(&tree, Point::new(4.0, 1.0)));
        assert!(!sq.is_in(&tree, Point::new(4.5, 0.0)));
        assert!(!sq.is_in(&tree, Point::new(2.0, 1.5)));
    }

    #[test]
    fn dfs_visits_each_node_once() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(0.0, 0.0));
        let a = tree.add_child(root, desc(0.0, 0.0));
        let a1 = tree.add_child(a, desc(0.0, 0.0));
        let a1x = tree.add_child(a1, desc(0.0, 0.0));
        let b = tree.add_child(root, desc(0.0, 0.0));
        let c = tree.add_child(root, desc(0.0, 0.0));
        let c1 = tree.add_child(c, desc(0.0, 0.0));

        let mut sq = TreeCursor::new(&tree, root, Sampling::Target);
        let mut seen = vec![sq.pos()];
        while sq.advance_to_next_node(&tree) {
            seen.push(sq.pos());
        }
        assert_eq!(seen, vec![root, a, a1, a1x, b, c, c1]);
        assert_eq!(sq.pos(), root);

        // Starting inside the tree never escapes the branch.
        let mut sq = TreeCursor::new(&tree, a, Sampling::Target);
        let mut seen = vec![sq.pos()];
        while sq.advance_to_next_node(&tree) {
            seen.push(sq.pos());
        }
        assert_eq!(seen, vec![a, a1, a1x]);
    }

    #[test]
    fn skip_branch_steps_over_the_subtree() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(0.0, 0.0));
        let a = tree.add_child(root, desc(0.0, 0.0));
        let a1 = tree.add_child(a, desc(0.0, 0.0));
        let b = tree.add_child(root, desc(0.0, 0.0));

        let mut sq = TreeCursor::new(&tree, root, Sampling::Target);
        assert!(sq.down(&tree));
        assert!(sq.skip_branch(&tree));
        assert_eq!(sq.pos(), b);
        assert!(!sq.skip_branch(&tree));
        assert_eq!(sq.pos(), root);

        // A jump lands with the frame a fresh cursor would have.
        let mut sq = TreeCursor::new(&tree, root, Sampling::Target);
        sq.jump_to(&tree, a1);
        assert_eq!(sq.start(), root);
        assert_eq!(sq.frame(), TreeCursor::new(&tree, a1, Sampling::Target).frame());
        assert!(sq.skip_branch(&tree));
        assert_eq!(sq.pos(), b);
    }

    #[test]
    fn display_walk_prunes_and_reraises() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(0.0, 0.0));
        let shown = tree.add_child(root, desc(0.0, 0.0));
        let hidden = tree.add_child(root, desc(0.0, 0.0));
        let under_hidden = tree.add_child(hidden, desc(0.0, 0.0));
        let leaf = tree.add_child(shown, desc(0.0, 0.0));
        tree.set_show(root, true);
        tree.set_show(shown, true);
        tree.set_show(leaf, true);

        let mut sq = TreeCursor::new(&tree, root, Sampling::Target);
        let mut seen = vec![sq.pos()];
        while sq.advance_to_next_to_display(&mut tree) {
            seen.push(sq.pos());
        }
        assert_eq!(seen, vec![root, shown, leaf, hidden]);
        assert!(!seen.contains(&under_hidden));
        assert!(tree.flags(shown).visibility.branch_to_display);
        assert!(!tree.flags(hidden).visibility.branch_to_display);
    }

    #[test]
    fn right_without_skips_flagged() {
        let mut tree = NodeTree::default();
        let root = tree.create(desc(0.0, 0.0));
        let a = tree.add_child(root, desc(0.0, 0.0));
        let _b = tree.add_child(root, desc(0.0, 0.0).flag(Flag::Hidden));
        let c = tree.add_child(root, desc(0.0, 0.0));
        let mut sq = TreeCursor::new(&tree, a, Sampling::Target);
        assert!(sq.right_without(&tree, Flag::Hidden));
        assert_eq!(sq.pos(), c);
        assert!(!sq.right_without(&tree, Flag::Hidden));
        assert!(sq.right_loop(&tree));
        assert_eq!(sq.pos(), a);
    }
}
