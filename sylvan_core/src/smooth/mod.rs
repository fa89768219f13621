// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damped animation primitives.
//!
//! Every visual property of a node is a [`SmoothValue`]: the caller sets a
//! target and the displayed value follows a closed-form solution of a damped
//! harmonic oscillator, continuous in value and speed across retargeting.
//!
//! - [`SmoothValue`]: scalars (positions, sizes, scales).
//! - [`SmoothAngle`] and [`DriftingAngle`]: angles that turn the short way,
//!   optionally with a constant spin.
//! - [`ShowTransition`]: a `0..=1` on/off ramp with an optional overshooting
//!   [`PopCurve`], used as alpha for fading nodes.

mod angle;
mod curve;
mod transition;
mod value;

pub use angle::{DriftingAngle, SmoothAngle, normalize_angle};
pub use curve::{CRITICAL_BAND, Damping};
pub use transition::{PopCurve, ShowTransition, TransitionState};
pub use value::SmoothValue;
