// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! [`SmoothValue`]: a scalar that glides to its targets.

use super::curve::{Curve, Damping};
use crate::time::FrameTime;

/// A scalar animated by a damped spring.
///
/// The value has a target ([`real`](Self::real)), a rest position used by
/// fades and relative placement ([`default_pos`](Self::default_pos)), and a
/// closed-form transient that decays toward the target. Reading is pure
/// evaluation at a [`FrameTime`]: no per-frame integration, so skipped frames
/// never disturb the motion.
///
/// A non-fixing [`set`](Self::set) keeps both the displayed value and its
/// velocity continuous; a fixing set jumps.
///
/// ```
/// use sylvan_core::smooth::SmoothValue;
/// use sylvan_core::time::FrameTime;
///
/// let mut x = SmoothValue::with_lambda(0.0, 5.0);
/// x.set(10.0, false, false, FrameTime::ZERO);
/// assert_eq!(x.pos(FrameTime::ZERO), 0.0);
/// assert!((x.pos(FrameTime::from_millis(5_000)) - 10.0).abs() < 1e-6);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SmoothValue {
    default_pos: f64,
    real_pos: f64,
    curve: Curve,
}

impl SmoothValue {
    /// Creates a value that snaps to every target.
    #[must_use]
    pub const fn new(pos: f64) -> Self {
        Self {
            default_pos: pos,
            real_pos: pos,
            curve: Curve::STATIC,
        }
    }

    /// Creates a critically damped value (`γ = 2λ`, `k = λ²`).
    ///
    /// A `lambda` of zero gives a static value.
    #[must_use]
    pub fn with_lambda(pos: f64, lambda: f64) -> Self {
        Self::with_damping(pos, 2.0 * lambda, lambda * lambda)
    }

    /// Creates a value with explicit damping `gamma` and stiffness `k`.
    #[must_use]
    pub fn with_damping(pos: f64, gamma: f64, k: f64) -> Self {
        Self {
            default_pos: pos,
            real_pos: pos,
            curve: Curve::new(gamma, k, FrameTime::ZERO),
        }
    }

    // -- Reading --

    /// Returns the displayed value at `now`.
    #[inline]
    #[must_use]
    pub fn pos(&self, now: FrameTime) -> f64 {
        self.curve.delta(now) + self.real_pos
    }

    /// Returns the target value.
    #[inline]
    #[must_use]
    pub const fn real(&self) -> f64 {
        self.real_pos
    }

    /// Returns the rest position.
    #[inline]
    #[must_use]
    pub const fn default_pos(&self) -> f64 {
        self.default_pos
    }

    /// Returns the remaining offset `pos − real` at `now`.
    #[inline]
    #[must_use]
    pub fn delta(&self, now: FrameTime) -> f64 {
        self.curve.delta(now)
    }

    /// Returns the rate of change of [`pos`](Self::pos) at `now`, per second.
    #[inline]
    #[must_use]
    pub fn speed(&self, now: FrameTime) -> f64 {
        self.curve.slope(now)
    }

    /// Returns the damping regime.
    #[inline]
    #[must_use]
    pub const fn damping(&self) -> Damping {
        self.curve.kind()
    }

    // -- Setting --

    /// Moves the target to `new`.
    ///
    /// With `fix` the value jumps there. Otherwise the transient restarts so
    /// that the displayed value and speed at `now` are unchanged.
    /// `set_as_default` also moves the rest position.
    pub fn set(&mut self, new: f64, fix: bool, set_as_default: bool, now: FrameTime) {
        if set_as_default {
            self.default_pos = new;
        }
        if fix {
            self.curve.settle(now);
        } else {
            let delta = self.curve.delta(now) + self.real_pos - new;
            let slope = self.curve.slope(now);
            self.curve.restart(delta, slope, now);
        }
        self.real_pos = new;
    }

    /// Moves the rest position without touching the target.
    #[inline]
    pub fn set_default(&mut self, pos: f64) {
        self.default_pos = pos;
    }

    /// Sets the target to `default_pos + shift`.
    pub fn set_relative_to_default(&mut self, shift: f64, fix: bool, now: FrameTime) {
        self.set(self.default_pos + shift, fix, false, now);
    }

    /// Shifts the target by `shift`.
    pub fn move_by(&mut self, shift: f64, fix: bool, set_as_default: bool, now: FrameTime) {
        self.set(self.real_pos + shift, fix, set_as_default, now);
    }

    /// Jumps to `default_pos + delta`, then glides back to the rest position.
    pub fn fade_in(&mut self, delta: f64, now: FrameTime) {
        self.set_relative_to_default(delta, true, now);
        self.set(self.default_pos, false, false, now);
    }

    /// Jumps to the rest position, then glides to `default_pos + delta`.
    pub fn fade_in_from_default(&mut self, delta: f64, now: FrameTime) {
        self.set(self.default_pos, true, false, now);
        self.set(self.default_pos + delta, false, false, now);
    }

    /// Glides away by `−delta` from the current target.
    pub fn fade_out(&mut self, delta: f64, now: FrameTime) {
        self.set(self.real_pos - delta, false, false, now);
    }

    /// Changes damping without a jump in value or speed.
    pub fn update_curve(&mut self, gamma: f64, k: f64, now: FrameTime) {
        self.curve.retune(gamma, k, now);
    }

    /// Changes to critical damping `lambda` without a jump.
    pub fn update_lambda(&mut self, lambda: f64, now: FrameTime) {
        self.update_curve(2.0 * lambda, lambda * lambda, now);
    }

    // -- Frame changes --

    /// Re-expresses an absolute `pos` in a frame at `dest_pos` scaled by
    /// `dest_scale`. `pos_scale` is the absolute scale of the frame the
    /// value was expressed in, used to rescale the motion in flight.
    pub fn new_referential(&mut self, pos: f64, dest_pos: f64, pos_scale: f64, dest_scale: f64) {
        self.real_pos = (pos - dest_pos) / dest_scale;
        self.curve.scale(pos_scale / dest_scale);
    }

    /// Like [`new_referential`](Self::new_referential) for a size-like value
    /// (scaled but not translated).
    pub fn new_referential_as_delta(&mut self, pos_scale: f64, dest_scale: f64) {
        let factor = pos_scale / dest_scale;
        self.real_pos *= factor;
        self.curve.scale(factor);
    }

    /// Moves into the frame of the grand-parent, given the old parent's
    /// position and scale.
    pub fn referential_up(&mut self, parent_pos: f64, parent_scale: f64) {
        self.real_pos = self.real_pos * parent_scale + parent_pos;
        self.curve.scale(parent_scale);
    }

    /// [`referential_up`](Self::referential_up) for a size-like value.
    pub fn referential_up_as_delta(&mut self, parent_scale: f64) {
        self.real_pos *= parent_scale;
        self.curve.scale(parent_scale);
    }

    /// Moves into the frame of a new parent (currently a sibling) given its
    /// position and scale.
    pub fn referential_down(&mut self, parent_pos: f64, parent_scale: f64) {
        self.real_pos = (self.real_pos - parent_pos) / parent_scale;
        self.curve.scale(1.0 / parent_scale);
    }

    /// [`referential_down`](Self::referential_down) for a size-like value.
    pub fn referential_down_as_delta(&mut self, parent_scale: f64) {
        self.real_pos /= parent_scale;
        self.curve.scale(1.0 / parent_scale);
    }

    pub(super) fn curve(&self) -> &Curve {
        &self.curve
    }

    pub(super) fn curve_mut(&mut self) -> &mut Curve {
        &mut self.curve
    }

    pub(super) fn set_real(&mut self, real: f64) {
        self.real_pos = real;
    }
}

impl Default for SmoothValue {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ms(ms: u64) -> FrameTime {
        FrameTime::from_millis(ms)
    }

    #[test]
    fn critical_set_starts_from_current_value() {
        let mut v = SmoothValue::with_lambda(0.0, 5.0);
        v.set(10.0, false, false, FrameTime::ZERO);
        assert!((v.delta(FrameTime::ZERO) + 10.0).abs() < EPS);
        assert!(v.pos(FrameTime::ZERO).abs() < EPS);
        assert!((v.real() - 10.0).abs() < EPS);
        assert!((v.pos(ms(10_000)) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn non_fixing_set_is_continuous() {
        let mut v = SmoothValue::with_damping(1.0, 1.0, 10.0);
        v.set(4.0, false, false, ms(0));
        let before = (v.pos(ms(300)), v.speed(ms(300)));
        v.set(-2.0, false, false, ms(300));
        assert!((v.pos(ms(300)) - before.0).abs() < EPS, "position jumped");
        assert!((v.speed(ms(300)) - before.1).abs() < EPS, "speed jumped");
    }

    #[test]
    fn fixing_set_jumps() {
        let mut v = SmoothValue::with_lambda(0.0, 5.0);
        v.set(3.0, true, false, ms(100));
        assert!((v.pos(ms(100)) - 3.0).abs() < EPS);
        assert!(v.speed(ms(100)).abs() < EPS);
    }

    #[test]
    fn static_values_snap() {
        let mut v = SmoothValue::new(1.0);
        v.set(7.0, false, true, ms(50));
        assert_eq!(v.damping(), Damping::Static);
        assert!((v.pos(ms(50)) - 7.0).abs() < EPS);
        assert!((v.default_pos() - 7.0).abs() < EPS);
    }

    #[test]
    fn fades_are_relative_to_default() {
        let mut v = SmoothValue::with_lambda(2.0, 8.0);
        v.fade_in(3.0, ms(0));
        assert!((v.pos(ms(0)) - 5.0).abs() < EPS, "fade in starts shifted");
        assert!((v.real() - 2.0).abs() < EPS, "fade in targets default");

        v.fade_out(3.0, ms(0));
        assert!((v.real() + 1.0).abs() < EPS);

        v.fade_in_from_default(4.0, ms(0));
        assert!((v.pos(ms(0)) - 2.0).abs() < EPS);
        assert!((v.real() - 6.0).abs() < EPS);
    }

    #[test]
    fn move_by_and_relative_set() {
        let mut v = SmoothValue::with_lambda(1.0, 3.0);
        v.move_by(2.0, true, true, ms(0));
        assert!((v.real() - 3.0).abs() < EPS);
        assert!((v.default_pos() - 3.0).abs() < EPS);
        v.set_relative_to_default(-1.0, true, ms(0));
        assert!((v.real() - 2.0).abs() < EPS);
        assert!((v.default_pos() - 3.0).abs() < EPS);
    }

    #[test]
    fn referential_up_then_down_is_identity() {
        let mut v = SmoothValue::with_lambda(0.0, 4.0);
        v.set(2.0, false, false, ms(0));
        let pos = v.pos(ms(40));
        v.referential_up(5.0, 2.0);
        assert!((v.pos(ms(40)) - (pos * 2.0 + 5.0)).abs() < EPS);
        v.referential_down(5.0, 2.0);
        assert!((v.pos(ms(40)) - pos).abs() < EPS);
    }

    #[test]
    fn new_referential_rebases_target() {
        let mut v = SmoothValue::new(1.0);
        v.new_referential(10.0, 4.0, 1.0, 2.0);
        assert!((v.real() - 3.0).abs() < EPS);
        v.new_referential_as_delta(2.0, 1.0);
        assert!((v.real() - 6.0).abs() < EPS);
    }
}
