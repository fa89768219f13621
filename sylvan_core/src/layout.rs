// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Alignment of children and placement relative to the parent.
//!
//! Layout is a pair of passes over the children of one node, run from the
//! `open` and `reshape` hooks. Nothing is cached: every call reads the
//! current targets and writes new ones, gliding or snapping per the options.

use crate::tree::{NodeId, NodeTree, Prop};

/// Options of [`NodeTree::align_children`].
///
/// In a horizontal alignment the *primary* axis is `x` and the *secondary*
/// axis is `y`; vertical swaps them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AlignOptions {
    /// Stack top to bottom instead of left to right.
    pub vertically: bool,
    /// Leave the parent's width and height alone.
    pub dont_update_sizes: bool,
    /// Pad the spacing so the parent's width over height reaches the given
    /// ratio.
    pub respect_ratio: bool,
    /// Snap instead of gliding.
    pub fix_pos: bool,
    /// Record the aligned primary positions and the parent's size as the
    /// rest positions.
    pub set_as_default: bool,
    /// Put the secondary coordinate back to its rest position instead of 0.
    pub set_secondary_to_default: bool,
}

impl AlignOptions {
    /// Horizontal, gliding, sizes updated.
    pub const HORIZONTAL: Self = Self {
        vertically: false,
        dont_update_sizes: false,
        respect_ratio: false,
        fix_pos: false,
        set_as_default: false,
        set_secondary_to_default: false,
    };

    /// Vertical, gliding, sizes updated.
    pub const VERTICAL: Self = Self {
        vertically: true,
        ..Self::HORIZONTAL
    };

    /// Builder: snap instead of gliding.
    #[must_use]
    pub const fn fixed(mut self) -> Self {
        self.fix_pos = true;
        self
    }
}

impl NodeTree {
    /// Lines up the children of `parent` along one axis.
    ///
    /// Children flagged `hidden` or `not_to_align` are skipped. Each child
    /// takes `extent × spacing` along the primary axis (plus any ratio
    /// padding) and is centred in its slot; the parent's size becomes the
    /// sum of the slots by the largest secondary extent. Returns the number
    /// of aligned children.
    ///
    /// A parent with nothing to align is left untouched and reported.
    pub fn align_children(
        &mut self,
        parent: NodeId,
        options: AlignOptions,
        ratio: f64,
        spacing: f64,
    ) -> usize {
        let items: Vec<NodeId> = self
            .children(parent)
            .filter(|&c| {
                let f = self.flags(c);
                !f.visibility.hidden && !f.layout.not_to_align
            })
            .collect();
        if items.is_empty() {
            tracing::warn!(?parent, "align_children: nothing to align");
            return 0;
        }
        let fix = options.fix_pos;
        let as_default = options.set_as_default;
        let n = items.len();

        // Pass 1: measure.
        let (mut w, mut h) = (0.0_f64, 0.0_f64);
        for &c in &items {
            let (dx, dy) = (self.delta_x(c), self.delta_y(c));
            if options.vertically {
                h += dy * 2.0 * spacing;
                w = w.max(dx * 2.0);
            } else {
                w += dx * 2.0 * spacing;
                h = h.max(dy * 2.0);
            }
        }
        let mut padding = 0.0;
        if options.respect_ratio && h > 0.0 && ratio > 0.0 {
            let n = n as f64;
            if !options.vertically && w / h < ratio {
                padding = (ratio * h - w) / n;
                w = ratio * h;
            } else if options.vertically && w / h > ratio {
                padding = (w / ratio - h) / n;
                h = w / ratio;
            }
        }
        if !options.dont_update_sizes {
            let now = self.now();
            let t = self.transform_mut(parent);
            t.width.set(w, fix, as_default, now);
            t.height.set(h, fix, as_default, now);
        }

        // Pass 2: place.
        let now = self.now();
        let (primary, secondary) = if options.vertically {
            (Prop::Y, Prop::X)
        } else {
            (Prop::X, Prop::Y)
        };
        // Vertical runs top to bottom, y up.
        let (mut cursor, sign) = if options.vertically {
            (h / 2.0, -1.0)
        } else {
            (-w / 2.0, 1.0)
        };
        for &c in &items {
            let half = if options.vertically {
                self.delta_y(c)
            } else {
                self.delta_x(c)
            };
            let slot = half * spacing + padding / 2.0;
            cursor += sign * slot;
            let t = self.transform_mut(c);
            t.get_mut(primary).set(cursor, fix, as_default, now);
            let sec = t.get_mut(secondary);
            if options.set_secondary_to_default {
                sec.set_relative_to_default(0.0, fix, now);
            } else {
                sec.set(0.0, fix, false, now);
            }
            cursor += sign * slot;
        }
        n
    }

    /// Places a node against its parent's edges per its
    /// [`Placement`](crate::tree::Placement) flags.
    ///
    /// The offset is applied relative to the node's rest position, so a node
    /// can be nudged from its anchor with its default `x`/`y`. Nodes without
    /// anchor or justification, and detached nodes, are left alone.
    pub fn place_relatively(&mut self, id: NodeId, fix: bool) {
        let p = self.flags(id).placement;
        if !p.is_relative() {
            return;
        }
        let Some(parent) = self.parent(id) else {
            return;
        };
        let (pw, ph) = (self.real(parent, Prop::Width), self.real(parent, Prop::Height));
        let mut dx = if p.relative_to_right {
            pw / 2.0
        } else if p.relative_to_left {
            -pw / 2.0
        } else {
            0.0
        };
        let mut dy = if p.relative_to_top {
            ph / 2.0
        } else if p.relative_to_bottom {
            -ph / 2.0
        } else {
            0.0
        };
        if p.justified_right {
            dx -= self.delta_x(id);
        } else if p.justified_left {
            dx += self.delta_x(id);
        }
        if p.justified_top {
            dy -= self.delta_y(id);
        } else if p.justified_bottom {
            dy += self.delta_y(id);
        }
        let now = self.now();
        let t = self.transform_mut(id);
        t.x.set_relative_to_default(dx, fix, now);
        t.y.set_relative_to_default(dy, fix, now);
    }

    /// Grows or shrinks a node so its box, centred where it is, covers all
    /// its non-hidden children.
    pub fn adjust_size_from_children(&mut self, id: NodeId) {
        let (mut w, mut h) = (0.0_f64, 0.0_f64);
        let mut any = false;
        for c in self.children(id) {
            if self.flags(c).visibility.hidden {
                continue;
            }
            any = true;
            let t = self.transform(c);
            w = w.max((t.delta_x() + t.x.real().abs()) * 2.0);
            h = h.max((t.delta_y() + t.y.real().abs()) * 2.0);
        }
        if !any {
            return;
        }
        self.set(id, Prop::Width, w, false);
        self.set(id, Prop::Height, h, false);
    }
}
