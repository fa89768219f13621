// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Smoothed angles.

use core::f64::consts::{PI, TAU};

use super::value::SmoothValue;
use crate::time::FrameTime;

/// Wraps an angle into `(−π, π]`.
#[inline]
#[must_use]
pub fn normalize_angle(theta: f64) -> f64 {
    theta - ((theta - PI) / TAU).ceil() * TAU
}

/// A [`SmoothValue`] on the circle: it always turns the short way round.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SmoothAngle {
    inner: SmoothValue,
}

impl SmoothAngle {
    /// Creates a critically damped angle.
    #[must_use]
    pub fn with_lambda(theta: f64, lambda: f64) -> Self {
        Self {
            inner: SmoothValue::with_lambda(normalize_angle(theta), lambda),
        }
    }

    /// Returns the displayed angle at `now` (not wrapped).
    #[inline]
    #[must_use]
    pub fn pos(&self, now: FrameTime) -> f64 {
        self.inner.pos(now)
    }

    /// Returns the target angle, in `(−π, π]`.
    #[inline]
    #[must_use]
    pub const fn real(&self) -> f64 {
        self.inner.real()
    }

    /// Turns toward `theta` along the shorter arc.
    pub fn set(&mut self, theta: f64, fix: bool, now: FrameTime) {
        let target = normalize_angle(theta);
        if fix {
            self.inner.curve_mut().settle(now);
        } else {
            let curve = *self.inner.curve();
            let delta = normalize_angle(curve.delta(now) + self.inner.real() - target);
            self.inner
                .curve_mut()
                .restart(delta, curve.slope(now), now);
        }
        self.inner.set_real(target);
    }
}

/// An angle that keeps spinning at a constant `drift` (radians per second)
/// on top of its damped motion.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DriftingAngle {
    inner: SmoothValue,
    drift: f64,
}

impl DriftingAngle {
    /// Creates a critically damped angle with no drift.
    #[must_use]
    pub fn with_lambda(theta: f64, lambda: f64) -> Self {
        Self {
            inner: SmoothValue::with_lambda(normalize_angle(theta), lambda),
            drift: 0.0,
        }
    }

    /// Returns the displayed angle at `now`.
    #[must_use]
    pub fn pos(&self, now: FrameTime) -> f64 {
        let curve = self.inner.curve();
        curve.delta(now) + self.drift * curve.elapsed(now) + self.inner.real()
    }

    /// Returns the angular speed at `now`.
    #[must_use]
    pub fn speed(&self, now: FrameTime) -> f64 {
        self.inner.curve().slope(now) + self.drift
    }

    /// Returns the current drift.
    #[inline]
    #[must_use]
    pub const fn drift(&self) -> f64 {
        self.drift
    }

    /// Turns toward `theta` and stops drifting.
    pub fn set(&mut self, theta: f64, fix: bool, now: FrameTime) {
        if fix {
            self.inner.curve_mut().settle(now);
            self.inner.set_real(normalize_angle(theta));
            self.drift = 0.0;
        } else {
            self.set_with_drift(theta, 0.0, now);
        }
    }

    /// Turns toward `theta`, then keeps spinning at `drift`.
    pub fn set_with_drift(&mut self, theta: f64, drift: f64, now: FrameTime) {
        let target = normalize_angle(theta);
        let curve = *self.inner.curve();
        let delta = normalize_angle(self.pos(now) - target);
        let slope = curve.slope(now) + self.drift - drift;
        self.inner.curve_mut().restart(delta, slope, now);
        self.inner.set_real(target);
        self.drift = drift;
    }
}
