// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Absolute coordinates of nodes.
//!
//! A node's `x`/`y` are expressed in its parent's frame: the parent's centre
//! is the origin and the parent's scale applies. The helpers here compose
//! those frames up to the root.

use kurbo::{Point, Vec2};

use super::frame::Frame;
use super::id::{INVALID, NodeId};
use super::store::NodeTree;
use crate::error::TreeError;
use crate::time::FrameTime;

/// Which value of the animated properties to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sampling {
    /// The targets. Layout, hit testing and re-basing use these.
    Target,
    /// The displayed values at the given time.
    Animated(FrameTime),
}

impl NodeTree {
    /// Position, depth and scale of one node under `sampling`.
    pub(crate) fn local_frame_parts(&self, idx: u32, sampling: Sampling) -> (Point, f64, Vec2) {
        let t = &self.transform[idx as usize];
        match sampling {
            Sampling::Target => (t.position(), t.z.real(), t.scale()),
            Sampling::Animated(now) => (t.position_at(now), t.z.pos(now), t.scale_at(now)),
        }
    }

    /// The absolute frame `id`'s position is expressed in.
    ///
    /// The root's parent frame is the identity.
    #[must_use]
    pub fn parent_frame(&self, id: NodeId, sampling: Sampling) -> Frame {
        self.validate(id);
        self.frame_above(self.parent[id.idx as usize], sampling)
    }

    /// The absolute frame of `id`'s children.
    #[must_use]
    pub fn inner_frame(&self, id: NodeId, sampling: Sampling) -> Frame {
        self.validate(id);
        self.frame_above(id.idx, sampling)
    }

    /// Absolute target position of a node's centre.
    #[must_use]
    pub fn absolute_position(&self, id: NodeId) -> Point {
        self.parent_frame(id, Sampling::Target)
            .to_reference(self.transform[id.idx as usize].position())
    }

    /// Target position of `id`'s centre expressed in the frame of
    /// `ancestor`'s children.
    ///
    /// # Errors
    ///
    /// [`TreeError::NotAnAncestor`] if `ancestor` is not a strict ancestor
    /// of `id`.
    pub fn position_in_ancestor(&self, id: NodeId, ancestor: NodeId) -> Result<Point, TreeError> {
        self.validate(id);
        self.validate(ancestor);
        let mut p = self.transform[id.idx as usize].position();
        let mut idx = self.parent[id.idx as usize];
        while idx != INVALID {
            if idx == ancestor.idx {
                return Ok(p);
            }
            let t = &self.transform[idx as usize];
            p = Point::new(
                t.x.real() + t.scale_x.real() * p.x,
                t.y.real() + t.scale_y.real() * p.y,
            );
            idx = self.parent[idx as usize];
        }
        Err(TreeError::NotAnAncestor(id, ancestor))
    }

    /// Maps an absolute point into the frame of `node`'s children.
    #[must_use]
    pub fn to_local(&self, point: Point, node: NodeId) -> Point {
        self.inner_frame(node, Sampling::Target).to_local(point)
    }

    /// Composes the frames from the root down to the inner frame of `idx`.
    fn frame_above(&self, idx: u32, sampling: Sampling) -> Frame {
        // Accumulate bottom-up: the frame of `idx`'s children inside its
        // ancestors. `within` places a frame inside its outer one.
        let mut frame = Frame::IDENTITY;
        let mut cur = idx;
        while cur != INVALID {
            let (pos, z, scale) = self.local_frame_parts(cur, sampling);
            frame = frame.within(&Frame::IDENTITY.enter(pos, z, scale));
            cur = self.parent[cur as usize];
        }
        frame
    }
}
