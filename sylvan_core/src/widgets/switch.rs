// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An on/off switch.

use core::fmt;

use kurbo::Point;

use crate::behavior::{Draggable, NodeBehavior};
use crate::scene::Scene;
use crate::tree::{NodeDesc, NodeId, Payload, Prop, ResourceHandle};

use super::Callback;

/// Nub offset from the centre, in switch heights.
const NUB_X: f64 = 0.375;

/// Placement and look of a [`SwitchButton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SwitchDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Height; the switch is twice as wide.
    pub height: f64,
    /// Initial state.
    pub is_on: bool,
    /// Tiled texture: tile 0 is the off back, 1 the on back, 2 the nub.
    pub texture: Option<ResourceHandle>,
}

/// A two-state switch.
///
/// Tapping toggles it; dragging the nub past the middle flips it. The
/// callback runs on every change with the new state.
pub struct SwitchButton {
    is_on: bool,
    did_drag: bool,
    back: NodeId,
    nub: NodeId,
    on_change: Callback<bool>,
}

impl fmt::Debug for SwitchButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwitchButton")
            .field("is_on", &self.is_on)
            .field("back", &self.back)
            .field("nub", &self.nub)
            .finish_non_exhaustive()
    }
}

fn nub_x(on: bool) -> f64 {
    if on { NUB_X } else { -NUB_X }
}

impl SwitchButton {
    /// Creates a switch under `parent` and returns its node.
    pub fn install(
        scene: &mut Scene,
        parent: NodeId,
        desc: SwitchDesc,
        on_change: impl FnMut(&mut Scene, NodeId, bool) + 'static,
    ) -> NodeId {
        let tree = scene.tree_mut();
        let node = tree.add_child(parent, NodeDesc::new(desc.x, desc.y, 2.0, 1.0));
        tree.set(node, Prop::ScaleX, desc.height, true);
        tree.set(node, Prop::ScaleY, desc.height, true);
        tree.make_selectable(node);
        let tile = |tile| desc.texture.map(|texture| Payload::Texture { texture, tile });
        let mut back = NodeDesc::new(0.0, 0.0, 2.0, 1.0);
        back.payload = tile(u32::from(desc.is_on));
        let back = tree.add_child(node, back);
        let mut nub = NodeDesc::new(nub_x(desc.is_on), 0.0, 1.0, 1.0).lambda(10.0);
        nub.payload = tile(2);
        let nub = tree.add_child(node, nub);
        tree.set_behavior(
            node,
            Self {
                is_on: desc.is_on,
                did_drag: false,
                back,
                nub,
                on_change: Box::new(on_change),
            },
        );
        node
    }

    /// Current state.
    #[inline]
    #[must_use]
    pub const fn is_on(&self) -> bool {
        self.is_on
    }

    /// Sets the state without running the callback.
    pub fn fix(&mut self, scene: &mut Scene, is_on: bool) {
        self.is_on = is_on;
        scene.tree_mut().set(self.nub, Prop::X, nub_x(is_on), false);
        self.update_back(scene);
    }

    fn update_back(&self, scene: &mut Scene) {
        if scene.tree().payload(self.back).is_some()
            && let Err(e) = scene.tree_mut().set_tile(self.back, u32::from(self.is_on))
        {
            tracing::warn!(%e, "switch back is not tiled");
        }
    }

    fn change(&mut self, scene: &mut Scene, node: NodeId, is_on: bool) {
        self.is_on = is_on;
        self.update_back(scene);
        (self.on_change)(scene, node, is_on);
    }
}

impl NodeBehavior for SwitchButton {
    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        Some(self)
    }
}

impl Draggable for SwitchButton {
    fn grab(&mut self, _scene: &mut Scene, _node: NodeId, _point: Point) {
        self.did_drag = false;
    }

    fn drag(&mut self, scene: &mut Scene, node: NodeId, point: Point) {
        let x = point.x.clamp(-NUB_X, NUB_X);
        scene.tree_mut().set(self.nub, Prop::X, x, false);
        let on = point.x > 0.0;
        if on != self.is_on {
            self.change(scene, node, on);
        }
        self.did_drag = true;
    }

    fn let_go(&mut self, scene: &mut Scene, node: NodeId) {
        if !self.did_drag {
            self.change(scene, node, !self.is_on);
        }
        scene.tree_mut().set(self.nub, Prop::X, nub_x(self.is_on), false);
        self.did_drag = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-9;

    fn switch(on: bool) -> (Scene, NodeId, Rc<RefCell<Vec<bool>>>) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let node = SwitchButton::install(
            &mut scene,
            front,
            SwitchDesc {
                x: 0.0,
                y: 0.0,
                height: 0.5,
                is_on: on,
                texture: Some(ResourceHandle(9)),
            },
            move |_, _, on| sink.borrow_mut().push(on),
        );
        scene.open_and_show_branch(node);
        (scene, node, log)
    }

    fn nub(scene: &Scene, node: NodeId) -> NodeId {
        scene.tree().last_child(node).unwrap()
    }

    #[test]
    fn tap_toggles() {
        let (mut scene, node, log) = switch(false);
        assert_eq!(scene.on_press(Point::new(0.0, 0.0)), Some(node));
        scene.on_release();
        let t = scene.tree();
        assert!(t.behavior::<SwitchButton>(node).unwrap().is_on());
        assert!((t.real(nub(&scene, node), Prop::X) - NUB_X).abs() < EPS);
        let back = t.first_child(node).unwrap();
        assert_eq!(
            t.payload(back),
            Some(Payload::Texture {
                texture: ResourceHandle(9),
                tile: 1
            })
        );
        assert_eq!(*log.borrow(), vec![true]);
    }

    #[test]
    fn drag_across_flips_once() {
        let (mut scene, node, log) = switch(true);
        scene.on_press(Point::new(0.1, 0.0));
        // Switch frame is scaled by 0.5: -0.2 absolute is -0.4 inside.
        scene.on_move(Point::new(-0.1, 0.0));
        scene.on_move(Point::new(-0.2, 0.0));
        let x = scene.tree().real(nub(&scene, node), Prop::X);
        assert!((x + NUB_X).abs() < EPS, "{x}");
        scene.on_release();
        assert!(!scene.tree().behavior::<SwitchButton>(node).unwrap().is_on());
        assert_eq!(*log.borrow(), vec![false]);
    }

    #[test]
    fn fix_does_not_notify() {
        let (mut scene, node, log) = switch(false);
        scene.with_behavior_as::<SwitchButton, _>(node, |s, scene| s.fix(scene, true));
        assert!(scene.tree().behavior::<SwitchButton>(node).unwrap().is_on());
        assert!(log.borrow().is_empty());
    }
}
