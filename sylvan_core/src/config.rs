// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-wide tuning knobs.
//!
//! Everything that would otherwise be a process-global constant (the pop
//! factor of show transitions, hover delays, the touch-device flag) lives in
//! a [`SceneConfig`] owned by the [`Scene`](crate::scene::Scene).

use crate::time::Duration;

/// Configuration for a [`Scene`](crate::scene::Scene).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    /// Overshoot of the pop curve. `0.0` is a plain ease, larger values bounce
    /// further past 1 before settling.
    pub pop_factor: f64,
    /// Distance used by `fade_in`/`fade_out` when no explicit delta is given.
    pub fade_delta: f64,
    /// Length of a show/hide transition.
    pub show_transition: Duration,
    /// Hover time before a hover popover is shown.
    pub hover_delay: Duration,
    /// Time a popover stays on screen before discarding itself.
    pub popover_lifetime: Duration,
    /// Delay between closing a transient node and disconnecting it, so its
    /// closing transition can play.
    pub removal_delay: Duration,
    /// Aspect ratio (width over height) below which screens stack their
    /// blocks vertically.
    pub screen_vertical_threshold: f64,
    /// Period of fling steps of a sliding menu.
    pub fling_step: Duration,
    /// Time a fling keeps its initial speed before decelerating.
    pub fling_hold: Duration,
    /// Total length of a fling.
    pub fling_length: Duration,
    /// Whether the scene starts in touch mode (no hover, inline labels).
    pub touch_mode: bool,
}

impl SceneConfig {
    /// Configuration for mouse/trackpad driven scenes.
    #[must_use]
    pub const fn pointer() -> Self {
        Self {
            pop_factor: 0.2,
            fade_delta: 3.0,
            show_transition: Duration::from_millis(500),
            hover_delay: Duration::from_millis(350),
            popover_lifetime: Duration::from_millis(2_000),
            removal_delay: Duration::from_millis(1_000),
            screen_vertical_threshold: 1.0,
            fling_step: Duration::from_millis(40),
            fling_hold: Duration::from_millis(100),
            fling_length: Duration::from_millis(1_000),
            touch_mode: false,
        }
    }

    /// Configuration for touch screens: hover popovers are replaced by inline
    /// labels.
    #[must_use]
    pub const fn touch() -> Self {
        Self {
            touch_mode: true,
            ..Self::pointer()
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::pointer()
    }
}
