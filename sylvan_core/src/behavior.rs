// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node behavior: lifecycle hooks and interaction capabilities.
//!
//! A node may carry one boxed [`NodeBehavior`]. The lifecycle walks call its
//! [`open`](NodeBehavior::open), [`close`](NodeBehavior::close) and
//! [`reshape`](NodeBehavior::reshape) hooks; nodes without a behavior get the
//! default hooks of [`lifecycle`](crate::lifecycle).
//!
//! Interaction capabilities are separate traits. A behavior advertises the
//! ones it implements through the `as_*` accessors, and
//! [hit dispatch](crate::hit) routes input to them.
//!
//! While a hook or capability runs, its behavior is taken out of the tree, so
//! it receives the whole [`Scene`] mutably. Inside the call,
//! [`NodeTree::behavior`](crate::tree::NodeTree::behavior) returns `None` for
//! the running node.

use core::any::Any;
use core::fmt::Debug;

use kurbo::Point;

use crate::lifecycle;
use crate::scene::Scene;
use crate::tree::{NodeId, ResourceHandle};

/// Behavior attached to a node.
pub trait NodeBehavior: Any + Debug {
    /// Called by `open_and_show_branch` before the node is shown.
    fn open(&mut self, scene: &mut Scene, node: NodeId) {
        lifecycle::default_open(scene, node);
    }

    /// Called by `close_branch` after `show` was cleared.
    fn close(&mut self, scene: &mut Scene, node: NodeId) {
        lifecycle::default_close(scene, node);
    }

    /// Called by `reshape_branch` on shown nodes.
    fn reshape(&mut self, scene: &mut Scene, node: NodeId) {
        lifecycle::default_reshape(scene, node);
    }

    /// Called when a [`TaskKind::Custom`](crate::scheduler::TaskKind::Custom)
    /// task scheduled for this node fires.
    fn on_task(&mut self, scene: &mut Scene, node: NodeId, token: u64) {
        _ = (scene, node, token);
    }

    /// The node can be grabbed and dragged.
    fn as_draggable(&mut self) -> Option<&mut dyn Draggable> {
        None
    }

    /// The node fires an action when pressed.
    fn as_action(&mut self) -> Option<&mut dyn Action> {
        None
    }

    /// The node reacts to the pointer hovering over it.
    fn as_hoverable(&mut self) -> Option<&mut dyn Hoverable> {
        None
    }

    /// The node consumes wheel scrolling.
    fn as_scrollable(&mut self) -> Option<&mut dyn Scrollable> {
        None
    }

    /// The node reacts to the enter key.
    fn as_enterable(&mut self) -> Option<&mut dyn Enterable> {
        None
    }

    /// The node reacts to the escape key.
    fn as_escapable(&mut self) -> Option<&mut dyn Escapable> {
        None
    }
}

/// Grab, any number of drags, then let go.
///
/// Points are expressed in the frame of the node's children.
pub trait Draggable {
    /// The pointer went down on the node.
    fn grab(&mut self, scene: &mut Scene, node: NodeId, point: Point);
    /// The pointer moved while the node is grabbed.
    fn drag(&mut self, scene: &mut Scene, node: NodeId, point: Point);
    /// The pointer was released.
    fn let_go(&mut self, scene: &mut Scene, node: NodeId);
}

/// Fires once on press.
pub trait Action {
    /// Runs the action.
    fn action(&mut self, scene: &mut Scene, node: NodeId);
}

/// Hover notifications.
///
/// The default methods show a popover with
/// [`popover_text`](Self::popover_text) after the configured hover delay,
/// unless the pointer leaves first.
pub trait Hoverable {
    /// The text shown in the hover popover (or the inline label on touch
    /// screens).
    fn popover_text(&self) -> Option<ResourceHandle> {
        None
    }

    /// Texture framing the popover text, if any.
    fn popover_frame(&self) -> Option<ResourceHandle> {
        None
    }

    /// The pointer entered the node.
    fn start_hovering(&mut self, scene: &mut Scene, node: NodeId) {
        scene.schedule_hover_popover(node);
    }

    /// The pointer left the node.
    fn stop_hovering(&mut self, scene: &mut Scene, node: NodeId) {
        scene.cancel_hover_popover(node);
    }
}

/// Wheel scrolling.
pub trait Scrollable {
    /// Scrolls by `delta_y` wheel notches; positive is up.
    fn scroll(&mut self, scene: &mut Scene, node: NodeId, delta_y: f64);
}

/// Enter key.
pub trait Enterable {
    /// The enter key was pressed.
    fn enter(&mut self, scene: &mut Scene, node: NodeId);
}

/// Escape key.
pub trait Escapable {
    /// The escape key was pressed.
    fn escape(&mut self, scene: &mut Scene, node: NodeId);
}
