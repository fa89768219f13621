// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Branch-wide open, close and reshape.
//!
//! Visibility is driven top-down by three walks:
//!
//! - [`open_and_show_branch`](Scene::open_and_show_branch) runs the `open`
//!   hook of each node, shows it unless it is `hidden`, and descends only
//!   into shown nodes.
//! - [`close_branch`](Scene::close_branch) clears `show` (except on `exposed`
//!   nodes), runs the `close` hook, and always descends fully.
//! - [`reshape_branch`](Scene::reshape_branch) runs the `reshape` hook of
//!   shown nodes and descends only into `reshape_root` nodes.
//!
//! All three are pre-order walks of a [`TreeCursor`]. Hooks may restructure
//! the tree under the walk: disconnect the node being visited, destroy a
//! sibling, move the node elsewhere or reorder it among its siblings. The
//! walk records the parent and little brother of each node before its hook
//! runs. When the node is no longer between the same two links afterwards,
//! its subtree is walked on the side and the walk resumes at the recorded
//! little brother (or, if that one is gone, at the node's new little
//! brother). A node moved further down its sibling list is visited again
//! when the walk gets there. The walk never leaves the branch it started
//! in.

use crate::cursor::TreeCursor;
use crate::scene::Scene;
use crate::trace::{LifecycleEvent, LifecycleKind};
use crate::tree::{Flag, INVALID, NodeId, NodeTree, Prop, Sampling};

impl Scene {
    /// Opens a branch: `open` hook, then `show` unless `hidden`, descending
    /// into shown nodes.
    ///
    /// `show` may be raised beforehand on a `hidden` node to reveal it.
    pub fn open_and_show_branch(&mut self, id: NodeId) {
        let visited = self.walk_branch(id, &mut |scene, node| {
            scene.run_open(node);
            if !scene.tree.is_alive(node) {
                return false;
            }
            if !scene.tree.flags(node).visibility.hidden {
                scene.tree.set_show(node, true);
            }
            scene.tree.flags(node).visibility.show
        });
        tracing::debug!(?id, visited, "opened branch");
        self.trace().lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Open,
            root: id,
            visited,
        });
    }

    /// Closes a branch: clears `show` on non-`exposed` nodes and runs their
    /// `close` hook. Always visits the whole branch.
    pub fn close_branch(&mut self, id: NodeId) {
        let visited = self.walk_branch(id, &mut |scene, node| {
            if !scene.tree.flags(node).visibility.exposed {
                scene.tree.set_show(node, false);
            }
            scene.run_close(node);
            true
        });
        tracing::debug!(?id, visited, "closed branch");
        self.trace().lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Close,
            root: id,
            visited,
        });
    }

    /// Re-lays out a branch after a size change: runs the `reshape` hook of
    /// every shown node reached, descending only into `reshape_root` nodes.
    pub fn reshape_branch(&mut self, id: NodeId) {
        let visited = self.walk_branch(id, &mut |scene, node| {
            if !scene.tree.flags(node).visibility.show {
                return false;
            }
            scene.run_reshape(node);
            scene.tree.is_alive(node) && scene.tree.flags(node).layout.reshape_root
        });
        self.trace().lifecycle(&LifecycleEvent {
            kind: LifecycleKind::Reshape,
            root: id,
            visited,
        });
    }

    /// Clears `hidden` and opens the node if its parent is shown.
    pub fn unhide_and_try_to_open(&mut self, id: NodeId) {
        self.tree.flags_mut(id).visibility.hidden = false;
        if self
            .tree
            .parent(id)
            .is_some_and(|p| self.tree.flags(p).visibility.show)
        {
            self.open_and_show_branch(id);
        }
    }

    /// Raises `hidden` and closes the node if it was shown.
    pub fn hide_and_try_to_close(&mut self, id: NodeId) {
        self.tree.flags_mut(id).visibility.hidden = true;
        if self.tree.flags(id).visibility.show {
            self.close_branch(id);
        }
    }

    /// Visits the branch of `start` in pre-order with a [`TreeCursor`],
    /// descending below a node only when `visit` returns `true`. Returns the
    /// number of visits.
    fn walk_branch(
        &mut self,
        start: NodeId,
        visit: &mut dyn FnMut(&mut Self, NodeId) -> bool,
    ) -> usize {
        let mut seen = Vec::new();
        self.walk_from(start, visit, &mut seen);
        seen.len()
    }

    fn walk_from(
        &mut self,
        start: NodeId,
        visit: &mut dyn FnMut(&mut Self, NodeId) -> bool,
        seen: &mut Vec<NodeId>,
    ) {
        self.tree.validate(start);
        let mut cursor = TreeCursor::new(&self.tree, start, Sampling::Target);
        loop {
            let node = cursor.pos();
            let parent = self.tree.parent(node);
            let little = self.tree.next_sibling(node);
            let descend = visit(self, node);
            seen.push(node);

            let alive = self.tree.is_alive(node);
            if node == start {
                if alive && descend && cursor.down(&self.tree) {
                    continue;
                }
                return;
            }
            let in_place = alive
                && self.tree.parent(node) == parent
                && self.tree.next_sibling(node) == little;
            if in_place {
                if descend && cursor.down(&self.tree) {
                    continue;
                }
                if !cursor.skip_branch(&self.tree) {
                    return;
                }
                continue;
            }

            // The hook moved, reordered or freed the node, or unlinked its
            // little brother. Its subtree is walked on the side, then the walk
            // resumes where the node was.
            if alive
                && descend
                && self.tree.is_alive(start)
                && self.tree.is_in_branch_of(node, start)
            {
                self.walk_children(node, visit, seen);
            }
            let next = if alive && self.tree.parent(node) == parent {
                self.tree.next_sibling(node)
            } else {
                None
            };
            if !self.resume_walk(&mut cursor, parent, [little, next], seen) {
                return;
            }
        }
    }

    /// Walks the branches of the current children of `node` not visited yet.
    fn walk_children(
        &mut self,
        node: NodeId,
        visit: &mut dyn FnMut(&mut Self, NodeId) -> bool,
        seen: &mut Vec<NodeId>,
    ) {
        let children: Vec<NodeId> = self.tree.children(node).collect();
        for child in children {
            if self.tree.is_alive(child)
                && self.tree.parent(child) == Some(node)
                && !seen.contains(&child)
            {
                self.walk_from(child, visit, seen);
            }
        }
    }

    /// Puts `cursor` on the first node not visited yet among the siblings
    /// from the first of `candidates` still under `parent`, or past `parent`
    /// if there is none. Returns `false` when the walk is over.
    ///
    /// Visited nodes are skipped, so the walk ends even when every hook
    /// reorders its own node.
    fn resume_walk(
        &self,
        cursor: &mut TreeCursor,
        parent: Option<NodeId>,
        candidates: [Option<NodeId>; 2],
        seen: &[NodeId],
    ) -> bool {
        let start = cursor.start();
        let Some(parent) = parent.filter(|&p| {
            self.tree.is_alive(p)
                && self.tree.is_alive(start)
                && self.tree.is_in_branch_of(p, start)
        }) else {
            tracing::error!(?start, "lifecycle walk lost its branch");
            return false;
        };
        let from = candidates
            .into_iter()
            .flatten()
            .find(|&c| self.tree.is_alive(c) && self.tree.parent(c) == Some(parent));
        let mut next = from;
        while let Some(n) = next {
            if !seen.contains(&n) {
                cursor.jump_to(&self.tree, n);
                return true;
            }
            next = self.tree.next_sibling(n);
        }
        cursor.jump_to(&self.tree, parent);
        cursor.skip_branch(&self.tree)
    }
}

impl NodeTree {
    /// Sets `flag` on `id` and its whole subtree.
    pub fn add_flag_to_branch(&mut self, id: NodeId, flag: Flag) {
        let ids: Vec<NodeId> = self.branch(id).collect();
        for n in ids {
            self.set_flag(n, flag, true);
        }
    }

    /// Clears `flag` on `id` and its whole subtree.
    pub fn remove_flag_from_branch(&mut self, id: NodeId, flag: Flag) {
        let ids: Vec<NodeId> = self.branch(id).collect();
        for n in ids {
            self.set_flag(n, flag, false);
        }
    }

    /// Sets `flag` on the ancestors of `id` (not on `id` itself), stopping at
    /// the first ancestor that already has it.
    pub fn add_root_flag(&mut self, id: NodeId, flag: Flag) {
        self.validate(id);
        let mut idx = self.parent[id.idx as usize];
        while idx != INVALID {
            let ancestor = self.id_at(idx);
            if self.has_flag(ancestor, flag) {
                break;
            }
            self.set_flag(ancestor, flag, true);
            idx = self.parent[idx as usize];
        }
    }

    /// Marks a node `selectable` and its ancestors `selectable_root`, so hit
    /// testing can reach it.
    pub fn make_selectable(&mut self, id: NodeId) {
        self.add_root_flag(id, Flag::SelectableRoot);
        self.flags_mut(id).selection.selectable = true;
    }
}

/// The `open` hook of a node without behavior: applies relative placement
/// and slides `fade_in_right` nodes in.
pub fn default_open(scene: &mut Scene, node: NodeId) {
    let flags = *scene.tree.flags(node);
    if !flags.placement.acts_on_open() {
        return;
    }
    scene.tree.place_relatively(node, true);
    if !flags.visibility.show && flags.placement.fade_in_right {
        let delta = scene.config().fade_delta;
        let now = scene.tree.now();
        scene.tree.value_mut(node, Prop::X).fade_in(delta, now);
    }
}

/// The `close` hook of a node without behavior: slides `fade_in_right`
/// nodes out.
pub fn default_close(scene: &mut Scene, node: NodeId) {
    if scene.tree.flags(node).placement.fade_in_right {
        let delta = scene.config().fade_delta;
        let now = scene.tree.now();
        scene.tree.value_mut(node, Prop::X).fade_out(delta, now);
    }
}

/// The `reshape` hook of a node without behavior: re-applies relative
/// placement.
pub fn default_reshape(scene: &mut Scene, node: NodeId) {
    scene.tree.place_relatively(node, false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::NodeBehavior;
    use crate::tree::NodeDesc;

    fn leaf() -> NodeDesc {
        NodeDesc::new(0.0, 0.0, 1.0, 1.0)
    }

    /// front screen → group → {a, b (hidden) → b1, c (exposed)}
    fn sample() -> (Scene, [NodeId; 5]) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let tree = scene.tree_mut();
        let group = tree.add_child(front, leaf());
        let a = tree.add_child(group, leaf());
        let b = tree.add_child(group, leaf().flag(Flag::Hidden));
        let b1 = tree.add_child(b, leaf());
        let c = tree.add_child(group, leaf().flag(Flag::Exposed));
        (scene, [group, a, b, b1, c])
    }

    #[test]
    fn open_shows_all_but_hidden_subtrees() {
        let (mut scene, [group, a, b, b1, c]) = sample();
        scene.open_and_show_branch(group);
        let t = scene.tree();
        assert!(t.has_flag(group, Flag::Show));
        assert!(t.has_flag(a, Flag::Show));
        assert!(!t.has_flag(b, Flag::Show));
        assert!(!t.has_flag(b1, Flag::Show), "walk must not enter hidden b");
        assert!(t.has_flag(c, Flag::Show));
    }

    #[test]
    fn close_clears_show_except_exposed() {
        let (mut scene, [group, a, b, b1, c]) = sample();
        scene.open_and_show_branch(group);
        scene.close_branch(group);
        let t = scene.tree();
        for n in [group, a, b, b1] {
            assert!(!t.has_flag(n, Flag::Show), "{n:?} still shown");
        }
        assert!(t.has_flag(c, Flag::Show));
    }

    #[test]
    fn unhide_opens_under_shown_parent() {
        let (mut scene, [group, _, b, b1, _]) = sample();
        scene.open_and_show_branch(group);
        scene.unhide_and_try_to_open(b);
        assert!(scene.tree().has_flag(b, Flag::Show));
        assert!(scene.tree().has_flag(b1, Flag::Show));
        scene.hide_and_try_to_close(b);
        assert!(scene.tree().has_flag(b, Flag::Hidden));
        assert!(!scene.tree().has_flag(b1, Flag::Show));
    }

    #[test]
    fn unhide_under_closed_parent_only_clears_the_flag() {
        let (mut scene, [_, _, b, b1, _]) = sample();
        scene.unhide_and_try_to_open(b);
        assert!(!scene.tree().has_flag(b, Flag::Hidden));
        assert!(!scene.tree().has_flag(b1, Flag::Show));
    }

    #[derive(Debug)]
    struct Counter(u32);

    impl NodeBehavior for Counter {
        fn reshape(&mut self, _scene: &mut Scene, _node: NodeId) {
            self.0 += 1;
        }
    }

    #[test]
    fn reshape_descends_only_through_reshape_roots() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let tree = scene.tree_mut();
        let plain = tree.add_child(front, leaf());
        let under_plain = tree.add_child(plain, leaf());
        let rooted = tree.add_child(front, leaf().flag(Flag::ReshapeRoot));
        let under_rooted = tree.add_child(rooted, leaf());
        for n in [plain, under_plain, rooted, under_rooted] {
            tree.set_behavior(n, Counter(0));
        }
        scene.open_and_show_branch(front);
        scene.reshape_branch(front);
        let count = |n| scene.tree().behavior::<Counter>(n).map(|c| c.0);
        assert_eq!(count(plain), Some(1));
        assert_eq!(count(under_plain), Some(0));
        assert_eq!(count(rooted), Some(1));
        assert_eq!(count(under_rooted), Some(1));
    }

    #[derive(Debug)]
    struct SelfRemoving;

    impl NodeBehavior for SelfRemoving {
        fn close(&mut self, scene: &mut Scene, node: NodeId) {
            scene.destroy(node);
        }
    }

    #[test]
    fn walk_survives_hooks_that_destroy_the_visited_node() {
        let (mut scene, [group, a, b, b1, c]) = sample();
        scene.open_and_show_branch(group);
        scene.tree_mut().set_behavior(a, SelfRemoving);
        scene.close_branch(group);
        let t = scene.tree();
        assert!(!t.is_alive(a));
        assert!(!t.has_flag(b, Flag::Show));
        assert!(!t.has_flag(b1, Flag::Show));
        assert!(t.has_flag(c, Flag::Show));
        assert_eq!(t.children(group).collect::<Vec<_>>(), vec![b, c]);
    }

    #[derive(Debug)]
    struct ToEnd {
        first: bool,
    }

    impl NodeBehavior for ToEnd {
        fn open(&mut self, scene: &mut Scene, node: NodeId) {
            let _ = scene.tree_mut().move_to_end(node, self.first);
        }

        fn close(&mut self, scene: &mut Scene, node: NodeId) {
            let _ = scene.tree_mut().move_to_end(node, self.first);
        }
    }

    /// front screen → group → {a → a1, b, c}
    fn reordering_sample() -> (Scene, [NodeId; 5]) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let tree = scene.tree_mut();
        let group = tree.add_child(front, leaf());
        let a = tree.add_child(group, leaf());
        let a1 = tree.add_child(a, leaf());
        let b = tree.add_child(group, leaf());
        let c = tree.add_child(group, leaf());
        (scene, [group, a, a1, b, c])
    }

    #[test]
    fn close_reaches_siblings_after_a_node_sent_to_the_back() {
        let (mut scene, [group, a, a1, b, c]) = reordering_sample();
        scene.open_and_show_branch(group);
        scene.tree_mut().set_behavior(a, ToEnd { first: false });
        scene.close_branch(group);
        let t = scene.tree();
        assert_eq!(t.children(group).collect::<Vec<_>>(), vec![b, c, a]);
        for n in [group, a, a1, b, c] {
            assert!(!t.has_flag(n, Flag::Show), "{n:?} still shown");
        }
    }

    #[test]
    fn open_reaches_the_subtree_of_a_node_brought_forward() {
        let (mut scene, [group, a, a1, b, c]) = reordering_sample();
        scene.tree_mut().move_to_end(a, false).unwrap();
        scene.tree_mut().set_behavior(a, ToEnd { first: true });
        scene.open_and_show_branch(group);
        let t = scene.tree();
        assert_eq!(t.children(group).collect::<Vec<_>>(), vec![a, b, c]);
        for n in [group, a, a1, b, c] {
            assert!(t.has_flag(n, Flag::Show), "{n:?} not shown");
        }
    }

    #[test]
    fn walk_ends_when_every_node_reorders_itself() {
        for first in [false, true] {
            let (mut scene, [group, a, a1, b, c]) = reordering_sample();
            for n in [a, b, c] {
                scene.tree_mut().set_behavior(n, ToEnd { first });
            }
            scene.open_and_show_branch(group);
            for n in [group, a, a1, b, c] {
                assert!(scene.tree().has_flag(n, Flag::Show), "{n:?} not shown");
            }
            scene.close_branch(group);
            for n in [group, a, a1, b, c] {
                assert!(!scene.tree().has_flag(n, Flag::Show), "{n:?} still shown");
            }
        }
    }

    #[test]
    fn walk_stays_inside_its_branch() {
        let (mut scene, [group, a, ..]) = sample();
        let front = scene.front_screen();
        let outside = scene.tree_mut().add_child(front, leaf());
        scene.open_and_show_branch(a);
        assert!(scene.tree().has_flag(a, Flag::Show));
        assert!(!scene.tree().has_flag(group, Flag::Show));
        assert!(!scene.tree().has_flag(outside, Flag::Show));
    }

    #[test]
    fn make_selectable_marks_the_path() {
        let (mut scene, [group, a, ..]) = sample();
        let root = scene.root();
        let front = scene.front_screen();
        scene.tree_mut().make_selectable(a);
        let t = scene.tree();
        assert!(t.flags(a).selection.selectable);
        assert!(!t.flags(a).selection.selectable_root);
        for n in [group, front, root] {
            assert!(t.flags(n).selection.selectable_root, "{n:?}");
        }
    }

    #[test]
    fn branch_flags() {
        let (mut scene, [group, a, b, b1, c]) = sample();
        scene.tree_mut().add_flag_to_branch(b, Flag::NotToAlign);
        let t = scene.tree();
        assert!(t.has_flag(b, Flag::NotToAlign) && t.has_flag(b1, Flag::NotToAlign));
        assert!(!t.has_flag(a, Flag::NotToAlign) && !t.has_flag(c, Flag::NotToAlign));
        scene.tree_mut().remove_flag_from_branch(group, Flag::NotToAlign);
        assert!(!scene.tree().has_flag(b1, Flag::NotToAlign));
    }
}
