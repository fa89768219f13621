// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate frames.

use kurbo::{Point, Vec2};

/// A scale-and-translate coordinate frame.
///
/// A point `p` expressed in the frame sits at `origin + scale * p` in the
/// reference frame (usually the absolute frame of the tree). Depth is
/// additive: scale never applies to `z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Where the frame's origin lands.
    pub origin: Point,
    /// Accumulated depth.
    pub z: f64,
    /// Per-axis scale.
    pub scale: Vec2,
}

impl Frame {
    /// The reference frame itself.
    pub const IDENTITY: Self = Self {
        origin: Point::ORIGIN,
        z: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Maps a point of this frame to the reference frame.
    #[inline]
    #[must_use]
    pub fn to_reference(&self, p: Point) -> Point {
        Point::new(
            self.origin.x + self.scale.x * p.x,
            self.origin.y + self.scale.y * p.y,
        )
    }

    /// Maps a point of the reference frame into this frame.
    ///
    /// A degenerate axis (zero scale) maps everything to zero.
    #[inline]
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        Point::new(
            div_or_zero(p.x - self.origin.x, self.scale.x),
            div_or_zero(p.y - self.origin.y, self.scale.y),
        )
    }

    /// Maps a size (half extents, offsets) of this frame to the reference
    /// frame.
    #[inline]
    #[must_use]
    pub fn scale_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.scale.x * v.x, self.scale.y * v.y)
    }

    /// The frame of a child placed at `pos` (depth `z`) with `scale` inside
    /// this frame.
    #[inline]
    #[must_use]
    pub fn enter(&self, pos: Point, z: f64, scale: Vec2) -> Self {
        Self {
            origin: self.to_reference(pos),
            z: self.z + z,
            scale: self.scale_vec(scale),
        }
    }

    /// Inverse of [`enter`](Self::enter).
    #[inline]
    #[must_use]
    pub fn leave(&self, pos: Point, z: f64, scale: Vec2) -> Self {
        let outer_scale = Vec2::new(
            div_or_zero(self.scale.x, scale.x),
            div_or_zero(self.scale.y, scale.y),
        );
        Self {
            origin: Point::new(
                self.origin.x - outer_scale.x * pos.x,
                self.origin.y - outer_scale.y * pos.y,
            ),
            z: self.z - z,
            scale: outer_scale,
        }
    }

    /// Places this frame inside `outer`: the result maps this frame's
    /// points straight to `outer`'s reference frame.
    #[inline]
    #[must_use]
    pub fn within(&self, outer: &Self) -> Self {
        Self {
            origin: outer.to_reference(self.origin),
            z: outer.z + self.z,
            scale: outer.scale_vec(self.scale),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn div_or_zero(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}
