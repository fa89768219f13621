// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The node tree records three categories of change with
//! [`understory_dirty`]. All channels are local-only: lifecycle walks already
//! visit descendants, so nothing needs eager propagation.
//!
//! - [`TOPOLOGY`]: a node was created, destroyed, linked, or unlinked.
//! - [`VISIBILITY`]: a node's `show` flag flipped.
//! - [`RESHAPE`]: a reshape was requested with
//!   [`Scene::request_reshape`](crate::scene::Scene::request_reshape); the
//!   scene drains it at the start of the next frame and reshapes each branch
//!   once, however many requests piled up.
//!
//! [`Scene::begin_frame`](crate::scene::Scene::begin_frame) drains every
//! channel and reports the result as a
//! [`FrameReport`](crate::scene::FrameReport).

use understory_dirty::Channel;

/// Tree structure changed.
pub const TOPOLOGY: Channel = Channel::new(0);

/// A `show` flag changed.
pub const VISIBILITY: Channel = Channel::new(1);

/// A branch asked to be reshaped on the next frame.
pub const RESHAPE: Channel = Channel::new(2);
