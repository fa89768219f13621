// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A push button running a closure.

use core::fmt;

use crate::behavior::{Action, Hoverable, NodeBehavior};
use crate::scene::Scene;
use crate::tree::{NodeDesc, NodeId, Payload, ResourceHandle};

/// Placement and look of an [`FnButton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Side of the (square) button.
    pub height: f64,
    /// What the button draws.
    pub icon: Option<Payload>,
    /// Hover popover text.
    pub popover: Option<ResourceHandle>,
    /// Hover popover frame.
    pub popover_frame: Option<ResourceHandle>,
}

/// A button firing its action on press, with an optional hover popover.
pub struct FnButton {
    popover: Option<ResourceHandle>,
    popover_frame: Option<ResourceHandle>,
    action: Box<dyn FnMut(&mut Scene, NodeId)>,
}

impl fmt::Debug for FnButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnButton")
            .field("popover", &self.popover)
            .field("popover_frame", &self.popover_frame)
            .finish_non_exhaustive()
    }
}

impl FnButton {
    /// Creates a button under `parent` and returns its node.
    pub fn install(
        scene: &mut Scene,
        parent: NodeId,
        desc: ButtonDesc,
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
                popover: desc.popover,
                popover_frame: desc.popover_frame,
                action: Box::new(action),
            },
        );
        if desc.popover.is_some() {
            scene.update_hover_label(node, desc.popover);
        }
        node
    }
}

impl NodeBehavior for FnButton {
    fn as_action(&mut self) -> Option<&mut dyn Action> {
        Some(self)
    }

    fn as_hoverable(&mut self) -> Option<&mut dyn Hoverable> {
        Some(self)
    }
}

impl Action for FnButton {
    fn action(&mut self, scene: &mut Scene, node: NodeId) {
        scene.cancel_hover_popover(node);
        (self.action)(scene, node);
    }
}

impl Hoverable for FnButton {
    fn popover_text(&self) -> Option<ResourceHandle> {
        self.popover
    }

    fn popover_frame(&self) -> Option<ResourceHandle> {
        self.popover_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::TaskKind;
    use kurbo::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    fn desc() -> ButtonDesc {
        ButtonDesc {
            x: 0.0,
            y: 0.0,
            height: 0.5,
            icon: Some(Payload::Mesh(ResourceHandle(1))),
            popover: Some(ResourceHandle(2)),
            popover_frame: None,
        }
    }

    #[test]
    fn press_runs_the_action_and_disarms_the_popover() {
        let mut scene = Scene::default();
        let front = scene.front_screen();
        let count = Rc::new(Cell::new(0));
        let c = Rc::clone(&count);
        let node = FnButton::install(&mut scene, front, desc(), move |_, _| c.set(c.get() + 1));
        scene.open_and_show_branch(node);

        assert_eq!(scene.on_hover(Point::new(0.0, 0.0)), Some(node));
        assert!(scene.tasks().has_pending(node, TaskKind::ShowHoverPopover));
        assert_eq!(scene.on_press(Point::new(0.0, 0.0)), Some(node));
        scene.on_release();
        assert_eq!(count.get(), 1);
        assert!(!scene.tasks().has_pending(node, TaskKind::ShowHoverPopover));
    }

    #[test]
    fn touch_buttons_get_a_label() {
        let mut scene = Scene::new(crate::config::SceneConfig::touch());
        let front = scene.front_screen();
        let node = FnButton::install(&mut scene, front, desc(), |_, _| {});
        let label = scene.inline_label(node).unwrap();
        assert_eq!(
            scene.tree().payload(label),
            Some(Payload::Text(ResourceHandle(2)))
        );
        assert_eq!(
            scene.tree().payload(node),
            Some(Payload::Mesh(ResourceHandle(1)))
        );
    }
}
