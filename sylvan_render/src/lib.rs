// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw lists for sylvan scenes.
//!
//! This crate sits between [`sylvan_core`]'s display walk and a GPU
//! renderer. It defines:
//!
//! - [`RenderItem`]: one draw command, with a column-major model matrix
//!   mapping the unit square onto the node's box.
//! - [`RenderPlan`]: the ordered draw list of one frame, plus the projection
//!   of the scene's root frame to clip space.
//!
//! Payload handles are passed through untouched; the renderer owns the
//! textures, meshes and text layouts they name.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod plan;

pub use plan::{RenderItem, RenderPlan, model_matrix, ortho_projection};
