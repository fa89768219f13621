// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A hold-to-activate button.

use core::fmt;

use kurbo::Point;

use crate::behavior::{Draggable, NodeBehavior};
use crate::popover::PopDiskDesc;
use crate::scene::Scene;
use crate::scheduler::{TaskId, TaskKind};
use crate::time::Duration;
use crate::tree::{NodeDesc, NodeId, Payload, Prop, ResourceHandle};

const HOLD_DONE: u64 = 0;
/// Damping of the progress disk.
const DISK_LAMBDA: f64 = 10.0;

/// Placement and look of a [`SecureButton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SecureDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Side of the (square) button.
    pub height: f64,
    /// What the button draws.
    pub icon: Option<Payload>,
    /// How long the button must be held.
    pub hold: Duration,
    /// Texture of the progress disk.
    pub disk: ResourceHandle,
    /// Tile of the progress disk.
    pub disk_tile: u32,
    /// Popover text shown when released too early.
    pub fail_text: ResourceHandle,
    /// Frame of that popover.
    pub fail_frame: Option<ResourceHandle>,
}

/// A button that fires only after being held down.
///
/// Grabbing it pops a progress disk beside it that fills over the hold
/// time. Letting go before the disk is full takes the disk away and shows
/// the "hold down" popover instead of running the action.
pub struct SecureButton {
    desc: SecureDesc,
    pop_disk: Option<NodeId>,
    armed: Option<TaskId>,
    action: Box<dyn FnMut(&mut Scene, NodeId)>,
}

impl fmt::Debug for SecureButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureButton")
            .field("hold", &self.desc.hold)
            .field("pop_disk", &self.pop_disk)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}

impl SecureButton {
    /// Creates a secure button under `parent` and returns its node.
    pub fn install(
        scene: &mut Scene,
        parent: NodeId,
        desc: SecureDesc,
        action: impl FnMut(&mut Scene, NodeId) + 'static,
    ) -> NodeId {
        let mut node = NodeDesc::new(desc.x, desc.y, desc.height, desc.height);
        node.payload = desc.icon;
        let tree = scene.tree_mut();
        let node = tree.add_child(parent, node);
        tree.make_selectable(node);
        tree.set_behavior(
            node,
            Self {
                desc,
                pop_disk: None,
                armed: None,
                action: Box::new(action),
            },
        );
        node
    }

    /// Whether a hold is in progress.
    #[inline]
    #[must_use]
    pub const fn is_held(&self) -> bool {
        self.armed.is_some()
    }

    fn drop_disk(&mut self, scene: &mut Scene) {
        if let Some(disk) = self.pop_disk.take()
            && scene.tree().is_alive(disk)
        {
            scene.destroy(disk);
        }
    }
}

impl NodeBehavior for SecureButton {
    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        Some(self)
    }

    fn on_task(&mut self, scene: &mut Scene, node: NodeId, token: u64) {
        if token != HOLD_DONE {
            return;
        }
        self.armed = None;
        self.drop_disk(scene);
        (self.action)(scene, node);
    }
}

impl Draggable for SecureButton {
    fn grab(&mut self, scene: &mut Scene, node: NodeId, _point: Point) {
        self.drop_disk(scene);
        if let Some(id) = self.armed.take() {
            scene.tasks.cancel(id);
        }
        let h = scene.tree().real(node, Prop::Height);
        let disk = scene.pop_disk(
            node,
            PopDiskDesc {
                x: -0.5 * h,
                y: 0.0,
                height: h,
                lambda: DISK_LAMBDA,
                texture: self.desc.disk,
                tile: self.desc.disk_tile,
                duration: self.desc.hold,
                down: false,
            },
        );
        self.pop_disk = Some(disk);
        let now = scene.tree().now();
        self.armed = Some(scene.tasks.schedule_after(
            now,
            self.desc.hold,
            node,
            TaskKind::Custom(HOLD_DONE),
        ));
    }

    fn drag(&mut self, _scene: &mut Scene, _node: NodeId, _point: Point) {}

    fn let_go(&mut self, scene: &mut Scene, node: NodeId) {
        let Some(id) = self.armed.take() else {
            return;
        };
        scene.tasks.cancel(id);
        if let Some(disk) = self.pop_disk.take() {
            scene.discard_pop_disk(disk);
        }
        tracing::debug!(?node, "secure button released early");
        scene.popover_over(node, self.desc.fail_text, self.desc.fail_frame);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::FrameTime;
    use crate::tree::Flag;
    use std::cell::Cell;
    use std::rc::Rc;

    fn desc() -> SecureDesc {
        SecureDesc {
            x: 0.0,
            y: 0.0,
            height: 0.5,
            icon: Some(Payload::Mesh(ResourceHandle(1))),
            hold: Duration::from_millis(1_000),
            disk: ResourceHandle(2),
            disk_tile: 0,
            fail_text: ResourceHandle(3),
            fail_frame: None,
        }
    }

    fn installed() -> (Scene, NodeId, Rc<Cell<u32>>) {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        let node = SecureButton::install(&mut scene, front, desc(), move |_, _| f.set(f.get() + 1));
        scene.open_and_show_branch(node);
        (scene, node, fired)
    }

    fn texts(scene: &Scene) -> usize {
        let front = scene.front_screen();
        let t = scene.tree();
        t.branch(front)
            .filter(|&n| matches!(t.payload(n), Some(Payload::Text(ResourceHandle(3)))))
            .count()
    }

    #[test]
    fn holding_long_enough_fires() {
        let (mut scene, node, fired) = installed();
        assert_eq!(scene.on_press(Point::new(0.0, 0.0)), Some(node));
        let disk = scene.tree().first_child(node).unwrap();
        assert!(matches!(scene.tree().payload(disk), Some(Payload::Progress { .. })));
        assert!(scene.tree().has_flag(disk, Flag::Show));

        scene.begin_frame(FrameTime::from_millis(999));
        assert_eq!(fired.get(), 0);
        scene.begin_frame(FrameTime::from_millis(1_000));
        assert_eq!(fired.get(), 1);
        assert!(!scene.tree().is_alive(disk));
        assert!(!scene.tree().behavior::<SecureButton>(node).unwrap().is_held());

        // Releasing after the action is silent.
        scene.on_release();
        assert_eq!(texts(&scene), 0);
    }

    #[test]
    fn early_release_asks_to_hold_down() {
        let (mut scene, node, fired) = installed();
        scene.on_press(Point::new(0.0, 0.0));
        let disk = scene.tree().first_child(node).unwrap();
        scene.begin_frame(FrameTime::from_millis(400));
        scene.on_release();
        assert_eq!(texts(&scene), 1);
        assert!(!scene.tree().has_flag(disk, Flag::Show));

        scene.begin_frame(FrameTime::from_millis(1_500));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn grabbing_again_restarts_the_hold() {
        let (mut scene, node, fired) = installed();
        scene.on_press(Point::new(0.0, 0.0));
        scene.begin_frame(FrameTime::from_millis(600));
        scene.on_release();
        scene.on_press(Point::new(0.0, 0.0));
        scene.begin_frame(FrameTime::from_millis(1_500));
        assert_eq!(fired.get(), 0);
        scene.begin_frame(FrameTime::from_millis(1_600));
        assert_eq!(fired.get(), 1);
        let t = scene.tree();
        assert_eq!(t.children(node).filter(|&c| t.has_flag(c, Flag::Show)).count(), 0);
    }
}
