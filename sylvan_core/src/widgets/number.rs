// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numbers drawn with the tiles of a digit texture.

use crate::behavior::NodeBehavior;
use crate::layout::AlignOptions;
use crate::scene::Scene;
use crate::tree::{Flag, NodeDesc, NodeId, Payload, Prop, ResourceHandle};

/// Tiles of a digit texture past `0`–`9`, which are tiles 0 to 9.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DigitTile {
    /// Blank.
    Space = 10,
    /// `_`
    Underscore = 12,
    /// `+`
    Plus = 13,
    /// `-`
    Minus = 14,
    /// `×`
    Mult = 15,
    /// `÷`
    Div = 16,
    /// `.`
    Dot = 17,
    /// `,`
    Comma = 18,
    /// Seconds mark.
    Second = 19,
    /// `%`
    Percent = 20,
    /// `=`
    Equal = 21,
    /// `?`
    Question = 22,
}

impl DigitTile {
    /// Tile index in the digit texture.
    #[inline]
    #[must_use]
    pub const fn tile(self) -> u32 {
        self as u32
    }
}

/// Placement and format of a [`NumberNode`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumberDesc {
    /// Centre x in the parent's frame.
    pub x: f64,
    /// Centre y in the parent's frame.
    pub y: f64,
    /// Digit height.
    pub height: f64,
    /// Damping of the digits.
    pub lambda: f64,
    /// Digit texture.
    pub texture: ResourceHandle,
    /// Digits after the separator. The number is shown divided by
    /// `10^unit_decimal`.
    pub unit_decimal: u32,
    /// Decimal separator.
    pub separator: DigitTile,
    /// Symbol appended after the last digit.
    pub extra: Option<DigitTile>,
    /// Advance of a digit, in digit heights.
    pub spacing: f64,
    /// Advance of the separator, in digit heights.
    pub separator_spacing: f64,
    /// Prefix positive numbers with `+`.
    pub show_plus: bool,
}

impl NumberDesc {
    /// An integer display at the origin with the default spacing.
    #[must_use]
    pub const fn new(texture: ResourceHandle, height: f64) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            height,
            lambda: 0.0,
            texture,
            unit_decimal: 0,
            separator: DigitTile::Dot,
            extra: None,
            spacing: 0.83,
            separator_spacing: 0.5,
            show_plus: false,
        }
    }
}

/// A number laid out as a row of digit tiles.
///
/// The node keeps one child per symbol. Updating the number retiles the
/// children it has, adds or removes the difference, and realigns them.
#[derive(Debug)]
pub struct NumberNode {
    number: i32,
    desc: NumberDesc,
}

/// Decimal digit `i` of `n` (0 is the units).
fn digit_at(n: u32, i: u32) -> u32 {
    10_u32.checked_pow(i).map_or(0, |p| n / p % 10)
}

impl NumberNode {
    /// Creates a number display under `parent` and returns its node.
    pub fn install(scene: &mut Scene, parent: NodeId, desc: NumberDesc, number: i32) -> NodeId {
        let tree = scene.tree_mut();
        let node = tree.add_child(parent, NodeDesc::new(desc.x, desc.y, 1.0, 1.0).lambda(desc.lambda));
        tree.set(node, Prop::ScaleX, desc.height, true);
        tree.set(node, Prop::ScaleY, desc.height, true);
        let this = Self { number, desc };
        this.layout(scene, node);
        scene.tree_mut().set_behavior(node, this);
        node
    }

    /// Shows `number`, optionally with a new decimal count and separator.
    /// Returns `false` if `node` is not a number display.
    pub fn update(
        scene: &mut Scene,
        node: NodeId,
        number: i32,
        unit_decimal: Option<u32>,
        separator: Option<DigitTile>,
    ) -> bool {
        scene
            .with_behavior_as::<Self, _>(node, |this, scene| {
                this.number = number;
                if let Some(unit) = unit_decimal {
                    this.desc.unit_decimal = unit;
                }
                if let Some(sep) = separator {
                    this.desc.separator = sep;
                }
                this.layout(scene, node);
            })
            .is_some()
    }

    /// The number shown.
    #[inline]
    #[must_use]
    pub const fn number(&self) -> i32 {
        self.number
    }

    /// Tiles to draw, with their advance.
    fn symbols(&self) -> Vec<(u32, f64)> {
        let d = &self.desc;
        let n = self.number.unsigned_abs();
        let unit = d.unit_decimal;
        let top = n.checked_ilog10().unwrap_or(0).max(unit);
        let mut out = Vec::new();
        if self.number < 0 {
            out.push((DigitTile::Minus.tile(), d.spacing));
        } else if d.show_plus {
            out.push((DigitTile::Plus.tile(), d.spacing));
        }
        out.extend((unit..=top).rev().map(|i| (digit_at(n, i), d.spacing)));
        if unit > 0 {
            out.push((d.separator.tile(), d.separator_spacing));
            out.extend((0..unit).rev().map(|i| (digit_at(n, i), d.spacing)));
        }
        if let Some(extra) = d.extra {
            out.push((extra.tile(), d.spacing));
        }
        out
    }

    fn layout(&self, scene: &mut Scene, node: NodeId) {
        let symbols = self.symbols();
        let texture = self.desc.texture;
        let shown = scene.tree().has_flag(node, Flag::Show);
        let tree = scene.tree_mut();
        let existing: Vec<NodeId> = tree.children(node).collect();
        for (i, &(tile, advance)) in symbols.iter().enumerate() {
            let child = match existing.get(i) {
                Some(&child) => {
                    tree.set_payload(child, Some(Payload::Texture { texture, tile }));
                    child
                }
                None => tree.add_child(
                    node,
                    NodeDesc::new(0.0, 0.0, 1.0, 1.0)
                        .lambda(self.desc.lambda)
                        .payload(Payload::Texture { texture, tile }),
                ),
            };
            tree.set(child, Prop::ScaleX, advance, true);
        }
        for &extra in existing.iter().skip(symbols.len()) {
            scene.destroy(extra);
        }

        let options = if shown {
            AlignOptions::HORIZONTAL
        } else {
            AlignOptions::HORIZONTAL.fixed()
        };
        scene.tree_mut().align_children(node, options, 1.0, 1.0);
        if shown {
            scene.open_and_show_branch(node);
        }
    }
}

impl NodeBehavior for NumberNode {}
