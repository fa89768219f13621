// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ready-made interactive nodes.
//!
//! Each widget is a [`NodeBehavior`](crate::behavior::NodeBehavior) installed
//! on a node it creates, together with the children it draws with. Widgets
//! report changes through a closure given at install time.

mod button;
mod menu;
mod number;
mod secure;
mod slider;
mod switch;

pub use button::{ButtonDesc, FnButton};
pub use menu::{SlidingMenu, SlidingMenuDesc};
pub use number::{DigitTile, NumberDesc, NumberNode};
pub use secure::{SecureButton, SecureDesc};
pub use slider::{SliderButton, SliderDesc};
pub use switch::{SwitchButton, SwitchDesc};

use crate::scene::Scene;
use crate::tree::NodeId;

/// Change notification of a widget.
pub(crate) type Callback<T> = Box<dyn FnMut(&mut Scene, NodeId, T)>;
