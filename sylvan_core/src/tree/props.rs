// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animated properties of a node.

use kurbo::{Point, Vec2};

use crate::smooth::SmoothValue;
use crate::time::FrameTime;

/// Selects one animated property of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Horizontal position of the centre, in the parent's frame.
    X,
    /// Vertical position of the centre, in the parent's frame (up is
    /// positive).
    Y,
    /// Depth offset.
    Z,
    /// Width, before scaling.
    Width,
    /// Height, before scaling.
    Height,
    /// Horizontal scale applied to the node and its children.
    ScaleX,
    /// Vertical scale applied to the node and its children.
    ScaleY,
}

/// Position, size, and scale of a node, each one a [`SmoothValue`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    /// See [`Prop::X`].
    pub x: SmoothValue,
    /// See [`Prop::Y`].
    pub y: SmoothValue,
    /// See [`Prop::Z`].
    pub z: SmoothValue,
    /// See [`Prop::Width`].
    pub width: SmoothValue,
    /// See [`Prop::Height`].
    pub height: SmoothValue,
    /// See [`Prop::ScaleX`].
    pub scale_x: SmoothValue,
    /// See [`Prop::ScaleY`].
    pub scale_y: SmoothValue,
}

impl NodeTransform {
    /// Creates a transform whose values all share the critical damping
    /// `lambda`. Scales start at 1.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64, lambda: f64) -> Self {
        Self {
            x: SmoothValue::with_lambda(x, lambda),
            y: SmoothValue::with_lambda(y, lambda),
            z: SmoothValue::with_lambda(0.0, lambda),
            width: SmoothValue::with_lambda(width, lambda),
            height: SmoothValue::with_lambda(height, lambda),
            scale_x: SmoothValue::with_lambda(1.0, lambda),
            scale_y: SmoothValue::with_lambda(1.0, lambda),
        }
    }

    /// Returns the selected property.
    #[must_use]
    pub fn get(&self, prop: Prop) -> &SmoothValue {
        match prop {
            Prop::X => &self.x,
            Prop::Y => &self.y,
            Prop::Z => &self.z,
            Prop::Width => &self.width,
            Prop::Height => &self.height,
            Prop::ScaleX => &self.scale_x,
            Prop::ScaleY => &self.scale_y,
        }
    }

    /// Returns the selected property mutably.
    #[must_use]
    pub fn get_mut(&mut self, prop: Prop) -> &mut SmoothValue {
        match prop {
            Prop::X => &mut self.x,
            Prop::Y => &mut self.y,
            Prop::Z => &mut self.z,
            Prop::Width => &mut self.width,
            Prop::Height => &mut self.height,
            Prop::ScaleX => &mut self.scale_x,
            Prop::ScaleY => &mut self.scale_y,
        }
    }

    /// Half the scaled target width: the horizontal reach of the box from its
    /// centre, in the parent's frame.
    #[inline]
    #[must_use]
    pub fn delta_x(&self) -> f64 {
        self.width.real() * self.scale_x.real() / 2.0
    }

    /// Half the scaled target height.
    #[inline]
    #[must_use]
    pub fn delta_y(&self) -> f64 {
        self.height.real() * self.scale_y.real() / 2.0
    }

    /// Target centre.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        Point::new(self.x.real(), self.y.real())
    }

    /// Target scale.
    #[inline]
    #[must_use]
    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.scale_x.real(), self.scale_y.real())
    }

    /// Displayed centre at `now`.
    #[inline]
    #[must_use]
    pub fn position_at(&self, now: FrameTime) -> Point {
        Point::new(self.x.pos(now), self.y.pos(now))
    }

    /// Displayed scale at `now`.
    #[inline]
    #[must_use]
    pub fn scale_at(&self, now: FrameTime) -> Vec2 {
        Vec2::new(self.scale_x.pos(now), self.scale_y.pos(now))
    }

    /// Displayed size (unscaled) at `now`.
    #[inline]
    #[must_use]
    pub fn size_at(&self, now: FrameTime) -> Vec2 {
        Vec2::new(self.width.pos(now), self.height.pos(now))
    }
}
