// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node tree data model.
//!
//! A *node* is an element of the scene graph. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed, preventing use-after-free bugs at the API level.
//! - Topology: parent, first/last child, and big/little brother links forming
//!   an ordered tree. Elder siblings come first.
//! - Seven animated properties ([`NodeTransform`]): centre `x`/`y` in the
//!   parent's frame, depth `z`, `width`/`height`, and `scale_x`/`scale_y`
//!   applied to the node's children.
//! - [`NodeFlags`] grouped by concern, an optional [`Payload`] the renderer
//!   draws, and an optional [behavior](crate::behavior::NodeBehavior).
//!
//! Nodes are stored in struct-of-arrays layout with index-based handles.
//! Disconnecting a node unlinks it but keeps it alive; destroying it frees its
//! slot and the slots of its whole subtree.
//!
//! # Coordinates
//!
//! `y` points up. A node's box is centred on `(x, y)` and extends
//! [`delta_x`](NodeTree::delta_x) and [`delta_y`](NodeTree::delta_y) on each
//! side. See [`Frame`] and the [geometry helpers](NodeTree::absolute_position).

mod flags;
mod frame;
mod geometry;
mod id;
mod props;
mod store;
mod surgery;
mod traverse;

pub use flags::{Flag, LayoutRole, NodeFlags, Placement, Selection, Visibility};
pub use frame::Frame;
pub use geometry::Sampling;
pub(crate) use id::INVALID;
pub use id::{NodeId, Payload, ResourceHandle};
pub use props::{NodeTransform, Prop};
pub use store::{NodeDesc, NodeTree};
pub use traverse::{Ancestors, Branch, Children};
