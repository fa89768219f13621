// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained-mode 2D scene graph for animated, touch-driven interfaces.
//!
//! `sylvan_core` keeps an ordered tree of nodes whose every visual property
//! glides toward its target with a damped spring. The host sets targets,
//! opens and closes branches, and feeds input; the tree says what to draw at
//! each frame. Storage is struct-of-arrays with generational handles, and
//! nothing in the crate touches a GPU or a platform API.
//!
//! # Architecture
//!
//! ```text
//!   wall clock ──► RenderClock::tick() ──► FrameTime
//!                                             │
//!                 ┌───────────────────────────┘
//!                 ▼
//!   Scene::begin_frame() ── due tasks, requested reshapes ──► FrameReport
//!                 │
//!                 ▼
//!   Scene::display() ──► [DisplayItem] ──► renderer
//!
//!   input ──► Scene::on_press / on_move / on_hover / ... ──► behaviors
//! ```
//!
//! **[`smooth`]**: [`SmoothValue`](smooth::SmoothValue) and friends, damped
//! values evaluated in closed form at any [`FrameTime`](time::FrameTime).
//!
//! **[`tree`]**: the node arena, its topology and surgery, flags, payloads
//! and coordinate frames.
//!
//! **[`cursor`]**: [`TreeCursor`](cursor::TreeCursor), the iterative walker
//! that carries the absolute frame of where it stands.
//!
//! **[`lifecycle`]**: open, close and reshape walks, safe against hooks that
//! restructure the tree.
//!
//! **[`layout`]**: aligning children in a row or a column, relative
//! placement, and sizing a parent around its children.
//!
//! **[`display`]**: the per-frame walk producing the draw list.
//!
//! **[`hit`]**: hit testing and input routing to the
//! [capabilities](behavior) of nodes.
//!
//! **[`scheduler`]**: deferred work as expiring tasks owned by the scene.
//!
//! **[`screen`]**, **[`popover`]**, **[`widgets`]**: screens, popovers and
//! effect popovers, sliding menus, switches, sliders, number displays and
//! buttons built on the above.
//!
//! **[`trace`]**: structured frame-loop events for tools.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): enables the
//!   [`Tracer`](trace::Tracer) method bodies (one branch per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod behavior;
pub mod clock;
pub mod config;
pub mod cursor;
pub mod dirty;
pub mod display;
pub mod error;
pub mod hit;
pub mod layout;
pub mod lifecycle;
pub mod popover;
pub mod scene;
pub mod scheduler;
pub mod screen;
pub mod smooth;
pub mod time;
pub mod trace;
pub mod tree;
pub mod widgets;
