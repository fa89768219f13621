// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit testing and input routing.
//!
//! [`NodeTree::search_selectable_at`] finds the node under a point: it walks
//! shown nodes whose box contains the point, descending only through
//! `selectable_root` nodes. A `selectable` node becomes the candidate; if it
//! is not itself a `selectable_root` it ends the search, so a button never
//! hides a control inside it.
//!
//! The `on_*` methods of [`Scene`] are the entry points of an input adapter.
//! Points are in the root's logical frame (`y` up). They route to the
//! [capabilities](crate::behavior) of the node found:
//!
//! - press: [`Draggable::grab`](crate::behavior::Draggable::grab), or the
//!   [`Action`](crate::behavior::Action) of the node;
//! - move and release: `drag` and `let_go` of the grabbed node;
//! - hover: `start_hovering`/`stop_hovering` as the pointer crosses nodes;
//! - wheel and keys: the first shown selectable node with the capability.

use kurbo::Point;

use crate::behavior::NodeBehavior;
use crate::cursor::TreeCursor;
use crate::scene::Scene;
use crate::trace::{HitEvent, HitKind};
use crate::tree::{NodeId, NodeTree, Sampling};

impl NodeTree {
    /// Finds the selectable node under `point` in the branch of `start`.
    ///
    /// `point` is expressed in the frame of `start`'s parent. `avoid` (and
    /// its subtree) is never returned, which lets a dragged node look for
    /// what lies under itself.
    #[must_use]
    pub fn search_selectable_at(
        &self,
        start: NodeId,
        point: Point,
        avoid: Option<NodeId>,
    ) -> Option<NodeId> {
        let mut sq = TreeCursor::local(start, Sampling::Target);
        let eligible = |sq: &TreeCursor| {
            let f = self.flags(sq.pos()).visibility;
            f.show && Some(sq.pos()) != avoid && sq.is_in(self, point)
        };
        if !eligible(&sq) {
            return None;
        }
        let mut candidate = None;
        let sel = self.flags(start).selection;
        if sel.selectable {
            candidate = Some(start);
            if !sel.selectable_root {
                return candidate;
            }
        }
        if !sel.selectable_root || !sq.down(self) {
            return candidate;
        }
        loop {
            if eligible(&sq) {
                let sel = self.flags(sq.pos()).selection;
                if sel.selectable {
                    candidate = Some(sq.pos());
                    if !sel.selectable_root {
                        return candidate;
                    }
                }
                if sel.selectable_root {
                    if sq.down(self) {
                        continue;
                    }
                    tracing::warn!(node = ?sq.pos(), "selectable_root without children");
                }
            }
            if !sq.skip_branch(self) {
                return candidate;
            }
        }
    }

    /// Returns the first shown selectable node of `start`'s branch (in
    /// pre-order, through `selectable_root` nodes) that satisfies `pred`.
    #[must_use]
    pub fn first_selectable_matching(
        &self,
        start: NodeId,
        mut pred: impl FnMut(NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut tree = self;
        first_selectable(&mut tree, start, |_, n| pred(n))
    }
}

/// Something that owns a node tree and may be handed back mutably between
/// steps of a walk.
trait TreeHost {
    fn host_tree(&self) -> &NodeTree;
}

impl TreeHost for &NodeTree {
    fn host_tree(&self) -> &NodeTree {
        self
    }
}

impl TreeHost for Scene {
    fn host_tree(&self) -> &NodeTree {
        &self.tree
    }
}

/// Pre-order search of `start`'s branch through shown `selectable_root`
/// nodes for a shown selectable node passing `pred`. The cursor holds no
/// borrow, so `pred` gets the host mutably.
fn first_selectable<H: TreeHost>(
    host: &mut H,
    start: NodeId,
    mut pred: impl FnMut(&mut H, NodeId) -> bool,
) -> Option<NodeId> {
    let f = *host.host_tree().flags(start);
    if !f.visibility.show {
        return None;
    }
    if f.selection.selectable && pred(host, start) {
        return Some(start);
    }
    if !f.selection.selectable_root {
        return None;
    }
    let mut sq = TreeCursor::local(start, Sampling::Target);
    if !sq.down(host.host_tree()) {
        return None;
    }
    loop {
        let node = sq.pos();
        let f = *host.host_tree().flags(node);
        if f.visibility.show {
            if f.selection.selectable && pred(host, node) {
                return Some(node);
            }
            if f.selection.selectable_root && sq.down(host.host_tree()) {
                continue;
            }
        }
        if !sq.skip_branch(host.host_tree()) {
            return None;
        }
    }
}

impl Scene {
    /// The selectable node under a point of the root frame.
    #[must_use]
    pub fn node_at(&self, point: Point) -> Option<NodeId> {
        self.tree.search_selectable_at(self.root(), point, None)
    }

    /// The node currently grabbed by the pointer.
    #[inline]
    #[must_use]
    pub const fn grabbed(&self) -> Option<NodeId> {
        self.grabbed
    }

    /// The node the last press landed on.
    #[inline]
    #[must_use]
    pub const fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// The node the pointer hovers.
    #[inline]
    #[must_use]
    pub const fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    /// Pointer down. Grabs a draggable node or fires an action. Returns the
    /// node hit.
    pub fn on_press(&mut self, point: Point) -> Option<NodeId> {
        if let Some(old) = self.grabbed.take() {
            // A press without release in between: finish the old drag.
            self.call_let_go(old);
        }
        let target = self.node_at(point);
        self.selected = target;
        if let Some(node) = target {
            let local = self.tree.to_local(point, node);
            let grabbed = self
                .with_behavior(node, |b, scene| {
                    b.as_draggable()
                        .map(|d| d.grab(scene, node, local))
                        .is_some()
                })
                .unwrap_or(false);
            if grabbed {
                self.grabbed = Some(node);
            } else {
                self.with_behavior(node, |b, scene| {
                    if let Some(a) = b.as_action() {
                        a.action(scene, node);
                    }
                });
            }
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Press(point),
            target,
        });
        target
    }

    /// Pointer moved while down. Drags the grabbed node, if any.
    pub fn on_move(&mut self, point: Point) {
        let target = self.grabbed.filter(|&n| self.tree.is_alive(n));
        if let Some(node) = target {
            let local = self.tree.to_local(point, node);
            self.with_behavior(node, |b, scene| {
                if let Some(d) = b.as_draggable() {
                    d.drag(scene, node, local);
                }
            });
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Move(point),
            target,
        });
    }

    /// Pointer up. Lets go of the grabbed node.
    pub fn on_release(&mut self) {
        let target = self.grabbed.take();
        if let Some(node) = target {
            self.call_let_go(node);
        }
        self.selected = None;
        self.trace().hit(&HitEvent {
            kind: HitKind::Release,
            target,
        });
    }

    /// Pointer hovering without a button down. Notifies hoverable nodes as
    /// the pointer enters and leaves them. Ignored in touch mode.
    pub fn on_hover(&mut self, point: Point) -> Option<NodeId> {
        if self.touch_mode {
            return None;
        }
        let target = self
            .node_at(point)
            .filter(|&n| self.behavior_has(n, |b| b.as_hoverable().is_some()));
        if target != self.hovered {
            if let Some(old) = self.hovered.take().filter(|&n| self.tree.is_alive(n)) {
                self.with_behavior(old, |b, scene| {
                    if let Some(h) = b.as_hoverable() {
                        h.stop_hovering(scene, old);
                    }
                });
            }
            if let Some(new) = target {
                self.with_behavior(new, |b, scene| {
                    if let Some(h) = b.as_hoverable() {
                        h.start_hovering(scene, new);
                    }
                });
            }
            self.hovered = target;
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Hover(point),
            target,
        });
        target
    }

    /// Wheel scrolling, routed to the first scrollable node of the active
    /// screen.
    pub fn on_scroll(&mut self, delta_y: f64) -> Option<NodeId> {
        let target = self.first_with(|b| b.as_scrollable().is_some());
        if let Some(node) = target {
            self.with_behavior(node, |b, scene| {
                if let Some(s) = b.as_scrollable() {
                    s.scroll(scene, node, delta_y);
                }
            });
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Scroll(delta_y),
            target,
        });
        target
    }

    /// Enter key, routed to the first enterable node of the active screen.
    pub fn on_enter(&mut self) -> Option<NodeId> {
        let target = self.first_with(|b| b.as_enterable().is_some());
        if let Some(node) = target {
            self.with_behavior(node, |b, scene| {
                if let Some(e) = b.as_enterable() {
                    e.enter(scene, node);
                }
            });
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Enter,
            target,
        });
        target
    }

    /// Escape key, routed to the first escapable node of the active screen.
    pub fn on_escape(&mut self) -> Option<NodeId> {
        let target = self.first_with(|b| b.as_escapable().is_some());
        if let Some(node) = target {
            self.with_behavior(node, |b, scene| {
                if let Some(e) = b.as_escapable() {
                    e.escape(scene, node);
                }
            });
        }
        self.trace().hit(&HitEvent {
            kind: HitKind::Escape,
            target,
        });
        target
    }

    fn call_let_go(&mut self, node: NodeId) {
        if !self.tree.is_alive(node) {
            return;
        }
        self.with_behavior(node, |b, scene| {
            if let Some(d) = b.as_draggable() {
                d.let_go(scene, node);
            }
        });
    }

    /// First selectable node of the active screen (or of the whole tree
    /// when no screen is active) whose behavior passes `check`.
    fn first_with(
        &mut self,
        mut check: impl FnMut(&mut dyn NodeBehavior) -> bool,
    ) -> Option<NodeId> {
        let start = self.active_screen.unwrap_or(self.root());
        first_selectable(self, start, |scene, n| scene.behavior_has(n, &mut check))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Action, Draggable, Scrollable};
    use crate::tree::{Flag, NodeDesc, Prop};

    fn shown(x: f64, y: f64, w: f64, h: f64) -> NodeDesc {
        NodeDesc::new(x, y, w, h).flag(Flag::Show)
    }

    /// root (10×10) → panel at (2, 0) scale 2 → {button at (1, 0), slot at (-1, 0)}
    fn sample() -> (NodeTree, [NodeId; 4]) {
        let mut tree = NodeTree::default();
        let root = tree.create(shown(0.0, 0.0, 10.0, 10.0));
        let panel = tree.add_child(root, shown(2.0, 0.0, 3.0, 2.0));
        tree.set(panel, Prop::ScaleX, 2.0, true);
        tree.set(panel, Prop::ScaleY, 2.0, true);
        let button = tree.add_child(panel, shown(1.0, 0.0, 1.0, 1.0));
        let slot = tree.add_child(panel, shown(-1.0, 0.0, 1.0, 1.0));
        tree.make_selectable(button);
        tree.make_selectable(slot);
        (tree, [root, panel, button, slot])
    }

    #[test]
    fn finds_the_deepest_selectable() {
        let (tree, [root, _, button, slot]) = sample();
        // button spans x in [3, 5] absolutely, slot [-1, 1].
        assert_eq!(tree.search_selectable_at(root, Point::new(4.0, 0.5), None), Some(button));
        assert_eq!(tree.search_selectable_at(root, Point::new(0.0, -0.9), None), Some(slot));
        assert_eq!(tree.search_selectable_at(root, Point::new(2.0, 0.0), None), None);
        assert_eq!(tree.search_selectable_at(root, Point::new(40.0, 0.0), None), None);
        assert_eq!(
            tree.search_selectable_at(root, Point::new(4.0, 0.5), Some(button)),
            None
        );
    }

    #[test]
    fn terminal_selectable_hides_its_children() {
        let (mut tree, [root, _, button, _]) = sample();
        let inner = tree.add_child(button, shown(0.0, 0.0, 1.0, 1.0));
        tree.flags_mut(inner).selection.selectable = true;
        assert_eq!(tree.search_selectable_at(root, Point::new(4.0, 0.0), None), Some(button));
    }

    #[test]
    fn unshown_branches_are_skipped() {
        let (mut tree, [root, panel, _, _]) = sample();
        tree.set_show(panel, false);
        assert_eq!(tree.search_selectable_at(root, Point::new(4.0, 0.0), None), None);
    }

    #[test]
    fn first_matching_walks_in_order() {
        let (tree, [root, _, button, slot]) = sample();
        assert_eq!(tree.first_selectable_matching(root, |_| true), Some(button));
        assert_eq!(tree.first_selectable_matching(root, |n| n == slot), Some(slot));
        assert_eq!(tree.first_selectable_matching(root, |_| false), None);
    }

    #[derive(Debug, Default)]
    struct Log {
        grabs: Vec<Point>,
        drags: Vec<Point>,
        let_go: u32,
        actions: u32,
        scrolls: Vec<f64>,
    }

    #[derive(Debug, Default)]
    struct DragLog(Log);

    impl NodeBehavior for DragLog {
        fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
            Some(self)
        }
        fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
            Some(self)
        }
    }

    impl Draggable for DragLog {
        fn grab(&mut self, _scene: &mut Scene, _node: NodeId, point: Point) {
            self.0.grabs.push(point);
        }
        fn drag(&mut self, _scene: &mut Scene, _node: NodeId, point: Point) {
            self.0.drags.push(point);
        }
        fn let_go(&mut self, _scene: &mut Scene, _node: NodeId) {
            self.0.let_go += 1;
        }
    }

    impl Scrollable for DragLog {
        fn scroll(&mut self, _scene: &mut Scene, _node: NodeId, delta_y: f64) {
            self.0.scrolls.push(delta_y);
        }
    }

    #[derive(Debug, Default)]
    struct ActionLog(Log);

    impl NodeBehavior for ActionLog {
        fn as_action(&mut self) -> Option<&mut dyn Action> {
            Some(self)
        }
    }

    impl Action for ActionLog {
        fn action(&mut self, _scene: &mut Scene, _node: NodeId) {
            self.0.actions += 1;
        }
    }

    fn scene_with_logs() -> (Scene, NodeId, NodeId) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let tree = scene.tree_mut();
        let drag = tree.add_child(front, shown(-1.0, 0.0, 1.0, 1.0));
        let act = tree.add_child(front, shown(1.0, 0.0, 1.0, 1.0));
        tree.make_selectable(drag);
        tree.make_selectable(act);
        tree.set_behavior(drag, DragLog::default());
        tree.set_behavior(act, ActionLog::default());
        (scene, drag, act)
    }

    #[test]
    fn press_drag_release_routes_to_draggable() {
        let (mut scene, drag, _) = scene_with_logs();
        assert_eq!(scene.on_press(Point::new(-1.25, 0.0)), Some(drag));
        assert_eq!(scene.grabbed(), Some(drag));
        scene.on_move(Point::new(-0.5, 0.25));
        scene.on_release();
        assert_eq!(scene.grabbed(), None);
        let log = &scene.tree().behavior::<DragLog>(drag).unwrap().0;
        // Points arrive in the node's own frame; its centre is at (-1, 0).
        assert_eq!(log.grabs, vec![Point::new(-0.25, 0.0)]);
        assert_eq!(log.drags, vec![Point::new(0.5, 0.25)]);
        assert_eq!(log.let_go, 1);
    }

    #[test]
    fn press_fires_actions_once() {
        let (mut scene, _, act) = scene_with_logs();
        assert_eq!(scene.on_press(Point::new(1.0, 0.0)), Some(act));
        assert_eq!(scene.grabbed(), None);
        scene.on_release();
        assert_eq!(scene.tree().behavior::<ActionLog>(act).unwrap().0.actions, 1);
        assert_eq!(scene.on_press(Point::new(0.0, 1.9)), None);
    }

    #[test]
    fn scroll_goes_to_first_scrollable() {
        let (mut scene, drag, _) = scene_with_logs();
        assert_eq!(scene.on_scroll(-2.0), Some(drag));
        assert_eq!(
            scene.tree().behavior::<DragLog>(drag).unwrap().0.scrolls,
            vec![-2.0]
        );
        assert_eq!(scene.on_enter(), None);
    }

    #[test]
    fn key_routing_tests_each_candidate_once() {
        let (mut scene, _, _) = scene_with_logs();
        let front = scene.front_screen();
        let tree = scene.tree_mut();
        let panel = tree.add_child(front, shown(0.0, 0.0, 4.0, 4.0));
        let hidden = tree.add_child(panel, NodeDesc::new(0.0, 0.0, 1.0, 1.0));
        tree.make_selectable(hidden);
        tree.set_behavior(hidden, DragLog::default());
        for _ in 0..50 {
            let n = tree.add_child(panel, shown(0.0, 0.0, 1.0, 1.0));
            tree.make_selectable(n);
            tree.set_behavior(n, ActionLog::default());
        }
        let last = tree.add_child(panel, shown(0.0, 0.0, 1.0, 1.0));
        tree.make_selectable(last);
        tree.set_behavior(last, DragLog::default());
        // The sample's own draggable comes first in pre-order; move it last.
        let drag = scene.tree().children(front).next().unwrap();
        scene.tree_mut().move_to_end(drag, false).unwrap();

        let mut calls = 0;
        let found = scene.first_with(|b| {
            calls += 1;
            b.as_draggable().is_some()
        });
        assert_eq!(found, Some(last));
        // act, then the fifty actions, then `last`; the hidden node is never asked.
        assert_eq!(calls, 52);
        assert_eq!(scene.on_scroll(1.0), Some(last));
    }
}
