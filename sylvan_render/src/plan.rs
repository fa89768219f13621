// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one frame.

use kurbo::{Affine, Vec2};

use sylvan_core::display::DisplayItem;
use sylvan_core::scene::Scene;
use sylvan_core::tree::{NodeId, Payload, Prop};

/// A single draw command in the render plan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    /// The node this item originates from.
    pub node: NodeId,
    /// What to draw.
    pub payload: Payload,
    /// Maps the unit square centred on the origin onto the node's box in
    /// the root frame (column-major 4x4). Depth is carried in `z`.
    pub model: [f32; 16],
    /// Opacity from the show transition.
    pub alpha: f32,
}

impl RenderItem {
    /// Builds the draw command of one display item.
    #[must_use]
    pub fn from_display(item: &DisplayItem) -> Self {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "alpha is in [0, 1] give or take the pop overshoot"
        )]
        let alpha = item.alpha as f32;
        Self {
            node: item.node,
            payload: item.payload,
            model: model_matrix(
                Affine::translate(item.center.to_vec2())
                    * Affine::scale_non_uniform(item.size.x, item.size.y),
                item.z,
            ),
            alpha,
        }
    }
}

/// Expands a 2D affine map and a depth into a column-major 4x4 matrix.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "scene coordinates are small; f32 is what GPUs consume"
)]
pub fn model_matrix(affine: Affine, z: f64) -> [f32; 16] {
    let [a, b, c, d, e, f] = affine.as_coeffs().map(|v| v as f32);
    [
        a, b, 0.0, 0.0, //
        c, d, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        e, f, z as f32, 1.0,
    ]
}

/// Orthographic projection of a root frame of size `view` (centred on the
/// origin, `y` up) onto clip space, with depths in `[-depth, depth]`
/// mapped to `[1, -1]` so that larger `z` is nearer.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "scene coordinates are small; f32 is what GPUs consume"
)]
pub fn ortho_projection(view: Vec2, depth: f64) -> [f32; 16] {
    let sx = if view.x > 0.0 { 2.0 / view.x } else { 0.0 };
    let sy = if view.y > 0.0 { 2.0 / view.y } else { 0.0 };
    let sz = if depth > 0.0 { -1.0 / depth } else { 0.0 };
    [
        sx as f32, 0.0, 0.0, 0.0, //
        0.0, sy as f32, 0.0, 0.0, //
        0.0, 0.0, sz as f32, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]
}

/// An ordered list of draw commands for a single frame.
///
/// Items come in display order: tree order, parents before children and
/// elder siblings first. Renderers without a depth buffer may call
/// [`sort_back_to_front`](Self::sort_back_to_front) first.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Size of the root frame.
    pub view: Vec2,
    /// Draw items.
    pub items: Vec<RenderItem>,
    scratch: Vec<DisplayItem>,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Replaces the items with the draw commands of `display`.
    pub fn fill(&mut self, view: Vec2, display: &[DisplayItem]) {
        self.view = view;
        self.items.clear();
        self.items.extend(display.iter().map(RenderItem::from_display));
    }

    /// Runs the scene's display walk and fills the plan from it.
    pub fn build(&mut self, scene: &mut Scene) {
        let mut scratch = core::mem::take(&mut self.scratch);
        scene.display(&mut scratch);
        let root = scene.root();
        let tree = scene.tree();
        let view = Vec2::new(tree.pos(root, Prop::Width), tree.pos(root, Prop::Height));
        self.fill(view, &scratch);
        self.scratch = scratch;
    }

    /// Stable sort by depth, farthest first.
    pub fn sort_back_to_front(&mut self) {
        self.items.sort_by(|a, b| a.model[14].total_cmp(&b.model[14]));
    }

    /// The projection matching [`view`](Self::view).
    #[must_use]
    pub fn projection(&self, depth: f64) -> [f32; 16] {
        ortho_projection(self.view, depth)
    }
}
