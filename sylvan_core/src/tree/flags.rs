// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node flags, grouped by concern.

/// Visibility state driven by the lifecycle walks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Visibility {
    /// The node is open and drawn.
    pub show: bool,
    /// `open_and_show_branch` does not show this node (or its subtree).
    pub hidden: bool,
    /// `close_branch` leaves this node shown.
    pub exposed: bool,
    /// Set by the display walk: something below this node is still on screen.
    pub branch_to_display: bool,
}

/// Participation in hit testing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Selection {
    /// The node can be picked by a pointer.
    pub selectable: bool,
    /// Some descendant is selectable; hit testing descends into this node.
    pub selectable_root: bool,
}

/// Role of the node in layout and lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LayoutRole {
    /// The tree root.
    pub is_root: bool,
    /// Skipped by `align_children`.
    pub not_to_align: bool,
    /// `reshape_branch` descends into this node's children.
    pub reshape_root: bool,
    /// Grows in with the show transition instead of just fading.
    pub popping: bool,
    /// A screen that survives being switched away from.
    pub persistent: bool,
    /// A screen that keeps its blocks where they are on reshape.
    pub dont_align: bool,
}

/// Placement relative to the parent's box, applied on open and reshape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Anchor to the parent's right edge.
    pub relative_to_right: bool,
    /// Anchor to the parent's left edge.
    pub relative_to_left: bool,
    /// Anchor to the parent's top edge.
    pub relative_to_top: bool,
    /// Anchor to the parent's bottom edge.
    pub relative_to_bottom: bool,
    /// Put the node's right edge on the anchor.
    pub justified_right: bool,
    /// Put the node's left edge on the anchor.
    pub justified_left: bool,
    /// Put the node's top edge on the anchor.
    pub justified_top: bool,
    /// Put the node's bottom edge on the anchor.
    pub justified_bottom: bool,
    /// Slide in from the right on open, out to the left on close.
    pub fade_in_right: bool,
}

impl Placement {
    /// Whether any anchor or justification is set.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        self.relative_to_right
            || self.relative_to_left
            || self.relative_to_top
            || self.relative_to_bottom
            || self.justified_right
            || self.justified_left
            || self.justified_top
            || self.justified_bottom
    }

    /// Whether the default `open` hook has anything to do.
    #[must_use]
    pub const fn acts_on_open(&self) -> bool {
        self.is_relative() || self.fade_in_right
    }
}

/// All flags of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeFlags {
    /// Lifecycle visibility.
    pub visibility: Visibility,
    /// Hit testing.
    pub selection: Selection,
    /// Layout and lifecycle role.
    pub layout: LayoutRole,
    /// Relative placement.
    pub placement: Placement,
    /// Application-defined bits.
    pub custom: u32,
}

/// Names a single flag, for branch-wide updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    /// [`Visibility::show`].
    Show,
    /// [`Visibility::hidden`].
    Hidden,
    /// [`Visibility::exposed`].
    Exposed,
    /// [`Visibility::branch_to_display`].
    BranchToDisplay,
    /// [`Selection::selectable`].
    Selectable,
    /// [`Selection::selectable_root`].
    SelectableRoot,
    /// [`LayoutRole::not_to_align`].
    NotToAlign,
    /// [`LayoutRole::reshape_root`].
    ReshapeRoot,
    /// [`LayoutRole::popping`].
    Popping,
    /// One of the [custom](NodeFlags::custom) bits (0–31).
    Custom(u8),
}

impl NodeFlags {
    /// Returns the state of one flag.
    #[must_use]
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Show => self.visibility.show,
            Flag::Hidden => self.visibility.hidden,
            Flag::Exposed => self.visibility.exposed,
            Flag::BranchToDisplay => self.visibility.branch_to_display,
            Flag::Selectable => self.selection.selectable,
            Flag::SelectableRoot => self.selection.selectable_root,
            Flag::NotToAlign => self.layout.not_to_align,
            Flag::ReshapeRoot => self.layout.reshape_root,
            Flag::Popping => self.layout.popping,
            Flag::Custom(bit) => self.custom & custom_mask(bit) != 0,
        }
    }

    /// Sets one flag.
    pub fn set(&mut self, flag: Flag, on: bool) {
        let slot = match flag {
            Flag::Show => &mut self.visibility.show,
            Flag::Hidden => &mut self.visibility.hidden,
            Flag::Exposed => &mut self.visibility.exposed,
            Flag::BranchToDisplay => &mut self.visibility.branch_to_display,
            Flag::Selectable => &mut self.selection.selectable,
            Flag::SelectableRoot => &mut self.selection.selectable_root,
            Flag::NotToAlign => &mut self.layout.not_to_align,
            Flag::ReshapeRoot => &mut self.layout.reshape_root,
            Flag::Popping => &mut self.layout.popping,
            Flag::Custom(bit) => {
                if on {
                    self.custom |= custom_mask(bit);
                } else {
                    self.custom &= !custom_mask(bit);
                }
                return;
            }
        };
        *slot = on;
    }

    /// Builder form of [`set`](Self::set) with `on = true`.
    #[must_use]
    pub fn with(mut self, flag: Flag) -> Self {
        self.set(flag, true);
        self
    }
}

fn custom_mask(bit: u8) -> u32 {
    1_u32.checked_shl(u32::from(bit)).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_set_round_trip() {
        let mut flags = NodeFlags::default()
            .with(Flag::Selectable)
            .with(Flag::Custom(3));
        assert!(flags.selection.selectable);
        assert!(flags.get(Flag::Custom(3)));
        assert!(!flags.get(Flag::Custom(4)));
        flags.set(Flag::Custom(3), false);
        assert_eq!(flags.custom, 0);
        flags.set(Flag::Hidden, true);
        assert!(flags.visibility.hidden);
    }

    #[test]
    fn out_of_range_custom_bit_is_ignored() {
        let flags = NodeFlags::default().with(Flag::Custom(40));
        assert_eq!(flags.custom, 0);
        assert!(!flags.get(Flag::Custom(40)));
    }

    #[test]
    fn placement_groups() {
        let mut p = Placement::default();
        assert!(!p.acts_on_open());
        p.fade_in_right = true;
        assert!(p.acts_on_open());
        assert!(!p.is_relative());
        p.justified_top = true;
        assert!(p.is_relative());
    }
}
