// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The display walk.
//!
//! Once per frame the renderer asks for the list of things to draw. The walk
//! is a pruned pre-order DFS: it only enters branches that are shown or
//! flagged `branch_to_display`, and re-raises that flag on the way back up
//! past nodes that are still fading out. Each node with a [`Payload`] that is
//! still active becomes one [`DisplayItem`], in tree order (elder siblings
//! first, parents before children).
//!
//! Positions are sampled at the tree's clock, so animations in flight are
//! displayed where they are, not where they are going.

use kurbo::{Point, Vec2};

use crate::cursor::TreeCursor;
use crate::scene::Scene;
use crate::trace::DisplayPassEvent;
use crate::tree::{NodeId, NodeTree, Payload, Sampling};

/// One thing to draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayItem {
    /// The node it comes from.
    pub node: NodeId,
    /// What to draw.
    pub payload: Payload,
    /// Centre, in the root's frame.
    pub center: Point,
    /// Absolute depth.
    pub z: f64,
    /// Full width and height, in the root's frame.
    pub size: Vec2,
    /// Opacity from the show transition, in `[0, 1]` (the pop curve may
    /// overshoot slightly).
    pub alpha: f64,
}

impl NodeTree {
    /// Walks the displayed part of `root`'s branch at the tree's clock and
    /// appends one item per active payload node to `out`.
    ///
    /// Returns the number of nodes visited.
    pub fn collect_display(&mut self, root: NodeId, out: &mut Vec<DisplayItem>) -> usize {
        self.validate(root);
        let now = self.now();
        let mut sq = TreeCursor::new(self, root, Sampling::Animated(now));
        let mut visited = 0;
        loop {
            visited += 1;
            self.display_one(&sq, out);
            if !sq.advance_to_next_to_display(self) {
                break;
            }
        }
        visited
    }

    fn display_one(&mut self, sq: &TreeCursor, out: &mut Vec<DisplayItem>) {
        let id = sq.pos();
        let i = id.idx as usize;
        let Some(payload) = self.payload[i] else {
            return;
        };
        let now = self.now();
        let show = self.flags[i].visibility.show;
        let transition = &mut self.transition[i];
        if !show && !transition.is_active() {
            return;
        }
        let alpha = transition.set_and_get(show, now);
        if !transition.is_active() {
            return;
        }
        let t = &self.transform[i];
        let own = t.size_at(now);
        let scale = t.scale_at(now);
        let mut size = sq.frame().scale_vec(Vec2::new(own.x * scale.x, own.y * scale.y));
        if self.flags[i].layout.popping {
            size *= alpha;
        }
        out.push(DisplayItem {
            node: id,
            payload,
            center: sq.absolute_position(self),
            z: sq.absolute_z(self),
            size,
            alpha,
        });
    }
}

impl Scene {
    /// Produces this frame's draw list into `out` (cleared first).
    pub fn display(&mut self, out: &mut Vec<DisplayItem>) {
        out.clear();
        let root = self.root();
        let visited = self.tree.collect_display(root, out);
        let frame_index = self.frame_index();
        self.trace().display_pass(&DisplayPassEvent {
            frame_index,
            visited,
            items: out.len(),
        });
    }
}
