// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A horizontal slider.

use core::fmt;

use kurbo::Point;

use crate::behavior::{Draggable, NodeBehavior};
use crate::scene::Scene;
use crate::tree::{NodeDesc, NodeId, Payload, Prop, ResourceHandle};

use super::Callback;

/// Placement and look of a [`SliderButton`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Height, which is also the nub's size.
    pub height: f64,
    /// Length of the nub's course; at least `height`.
    pub slide_width: f64,
    /// Initial value in `[0, 1]`.
    pub value: f64,
    /// Report the value once on let go instead of on every drag.
    pub action_at_let_go: bool,
    /// Tiled texture: tile 0 is the bar, 1 the nub.
    pub texture: Option<ResourceHandle>,
}

/// A nub sliding along a bar, mapping its position to a value in `[0, 1]`.
pub struct SliderButton {
    value: f64,
    action_at_let_go: bool,
    slide_width: f64,
    nub: NodeId,
    on_change: Callback<f64>,
}

impl fmt::Debug for SliderButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SliderButton")
            .field("value", &self.value)
            .field("slide_width", &self.slide_width)
            .field("nub", &self.nub)
            .finish_non_exhaustive()
    }
}

impl SliderButton {
    /// Creates a slider under `parent` and returns its node.
    pub fn install(
        scene: &mut Scene,
        parent: NodeId,
        desc: SliderDesc,
        on_change: impl FnMut(&mut Scene, NodeId, f64) + 'static,
    ) -> NodeId {
        let h = desc.height;
        let slide_width = desc.slide_width.max(h);
        let value = desc.value.clamp(0.0, 1.0);
        let tile = |tile| desc.texture.map(|texture| Payload::Texture { texture, tile });
        let tree = scene.tree_mut();
        let node = tree.add_child(parent, NodeDesc::new(desc.x, desc.y, slide_width + h, h));
        tree.make_selectable(node);
        let mut bar = NodeDesc::new(0.0, 0.0, slide_width, 0.25 * h);
        bar.payload = tile(0);
        tree.add_child(node, bar);
        let mut nub = NodeDesc::new((value - 0.5) * slide_width, 0.0, h, h).lambda(20.0);
        nub.payload = tile(1);
        let nub = tree.add_child(node, nub);
        tree.set_behavior(
            node,
            Self {
                value,
                action_at_let_go: desc.action_at_let_go,
                slide_width,
                nub,
                on_change: Box::new(on_change),
            },
        );
        node
    }

    /// Current value in `[0, 1]`.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> f64 {
        self.value
    }
}

impl NodeBehavior for SliderButton {
    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        Some(self)
    }
}

impl Draggable for SliderButton {
    fn grab(&mut self, _scene: &mut Scene, _node: NodeId, _point: Point) {}

    fn drag(&mut self, scene: &mut Scene, node: NodeId, point: Point) {
        let half = self.slide_width / 2.0;
        let x = point.x.clamp(-half, half);
        scene.tree_mut().set(self.nub, Prop::X, x, false);
        self.value = x / self.slide_width + 0.5;
        if !self.action_at_let_go {
            (self.on_change)(scene, node, self.value);
        }
    }

    fn let_go(&mut self, scene: &mut Scene, node: NodeId) {
        if self.action_at_let_go {
            (self.on_change)(scene, node, self.value);
        }
    }
}
