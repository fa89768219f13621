// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screens: the top-level pages of a scene.
//!
//! A screen is a child of the root. It usually holds a few blocks that are
//! lined up side by side in landscape and stacked in portrait, then scaled to
//! fit the root. Screens are kept in front of one another in creation order,
//! except the front screen which always stays last (drawn on top).
//!
//! One screen at a time is *active*. [`Scene::change_active_screen`] closes
//! the old one and opens the new one; non-persistent screens are destroyed
//! once their closing transition had time to run.

use crate::behavior::NodeBehavior;
use crate::config::SceneConfig;
use crate::layout::AlignOptions;
use crate::scene::Scene;
use crate::tree::{LayoutRole, NodeDesc, NodeFlags, NodeId, Prop};

/// Behavior of a screen node: aligns its blocks on open and reshape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Screen {
    /// Pack the blocks without padding them to the view's aspect ratio.
    pub compact: bool,
    /// Width over height below which blocks are stacked vertically.
    pub vertical_threshold: f64,
}

impl Screen {
    /// A screen using the scene's stacking threshold.
    #[must_use]
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            compact: false,
            vertical_threshold: config.screen_vertical_threshold,
        }
    }

    /// Builder: pack the blocks tightly.
    #[must_use]
    pub fn compact(mut self) -> Self {
        self.compact = true;
        self
    }
}

impl NodeBehavior for Screen {
    fn open(&mut self, scene: &mut Scene, node: NodeId) {
        align_screen(scene, node, self, true);
    }

    fn reshape(&mut self, scene: &mut Scene, node: NodeId) {
        align_screen(scene, node, self, false);
    }
}

/// Fits a screen to its parent.
///
/// A `dont_align` screen just takes the parent's size at scale 1. Otherwise
/// its children are aligned (vertically if the parent is narrower than
/// `vertical_threshold`) and the screen is scaled down or up to fit.
/// Opening snaps; reshaping glides.
pub fn align_screen(scene: &mut Scene, node: NodeId, screen: &Screen, is_opening: bool) {
    let tree = scene.tree_mut();
    let Some(parent) = tree.parent(node) else {
        tracing::warn!(?node, "screen without parent");
        return;
    };
    let (pw, ph) = (tree.real(parent, Prop::Width), tree.real(parent, Prop::Height));
    if tree.flags(node).layout.dont_align {
        tree.set(node, Prop::ScaleX, 1.0, is_opening);
        tree.set(node, Prop::ScaleY, 1.0, is_opening);
        tree.set(node, Prop::Width, pw, is_opening);
        tree.set(node, Prop::Height, ph, is_opening);
        return;
    }
    let ratio = if ph > 0.0 { pw / ph } else { 1.0 };
    let options = AlignOptions {
        vertically: ratio < screen.vertical_threshold,
        respect_ratio: !screen.compact,
        fix_pos: is_opening,
        set_secondary_to_default: true,
        ..AlignOptions::HORIZONTAL
    };
    if tree.align_children(node, options, ratio, 1.0) == 0 {
        return;
    }
    let (w, h) = (tree.real(node, Prop::Width), tree.real(node, Prop::Height));
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    let scale = (pw / w).min(ph / h);
    tree.set(node, Prop::ScaleX, scale, is_opening);
    tree.set(node, Prop::ScaleY, scale, is_opening);
}

impl Scene {
    /// Adds a screen under the root, in front of the existing screens and
    /// behind the front screen. The screen starts closed.
    pub fn add_screen(&mut self, screen: Screen, persistent: bool) -> NodeId {
        let flags = NodeFlags {
            layout: LayoutRole {
                reshape_root: true,
                persistent,
                ..LayoutRole::default()
            },
            ..NodeFlags::default()
        };
        let desc = NodeDesc::new(0.0, 0.0, 4.0, 4.0).flags(flags);
        let front = self.front_screen();
        let id = match self.tree.add_sibling(front, desc, true) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(%e, "front screen detached; adding screen under the root");
                let root = self.root();
                self.tree.add_first_child(root, desc)
            }
        };
        self.tree.set_behavior(id, screen);
        id
    }

    /// Makes `screen` the active screen.
    ///
    /// The previous active screen is closed and, unless persistent, destroyed
    /// after the removal delay. Passing the active screen again re-opens it;
    /// passing `None` only closes.
    pub fn change_active_screen(&mut self, screen: Option<NodeId>) {
        if let Some(s) = screen
            && self.active_screen == Some(s)
        {
            self.open_and_show_branch(s);
            return;
        }
        if let Some(old) = self.active_screen.take()
            && self.tree.is_alive(old)
        {
            self.close_branch(old);
            if !self.tree.flags(old).layout.persistent {
                self.schedule_removal(old);
            }
        }
        if let Some(new) = screen {
            tracing::debug!(screen = ?new, "active screen changed");
            self.active_screen = Some(new);
            self.open_and_show_branch(new);
        }
    }
}
