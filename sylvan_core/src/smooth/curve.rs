// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Closed-form solutions of `x'' + γx' + kx = 0`.

use crate::time::FrameTime;

/// Width of the discriminant band treated as critical damping.
pub const CRITICAL_BAND: f64 = 0.001;

/// Damping regime of a [`SmoothValue`](super::SmoothValue).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Damping {
    /// `γ = k = 0`: no motion, every `set` snaps.
    Static,
    /// `γ² − 4k < 0`: oscillates while converging.
    Underdamped,
    /// `γ² − 4k ≈ 0`: fastest convergence without overshoot.
    Critical,
    /// `γ² − 4k > 0`: slow convergence without overshoot.
    Overdamped,
}

/// The "delta" part of a smoothed value: the offset from the target as a
/// function of the time elapsed since the last `set`.
///
/// For every regime `delta(t)` is a linear combination of two basis
/// functions; `a` and `b` are chosen so that `delta(0)` and `delta'(0)` match
/// the requested initial condition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Curve {
    kind: Damping,
    lambda: f64,
    beta: f64,
    a: f64,
    b: f64,
    set_time: FrameTime,
}

impl Curve {
    pub(crate) const STATIC: Self = Self {
        kind: Damping::Static,
        lambda: 0.0,
        beta: 0.0,
        a: 0.0,
        b: 0.0,
        set_time: FrameTime::ZERO,
    };

    /// Creates a curve at rest for the given damping `gamma` and stiffness `k`.
    pub(crate) fn new(gamma: f64, k: f64, now: FrameTime) -> Self {
        let mut curve = Self {
            set_time: now,
            ..Self::STATIC
        };
        curve.set_coefficients(gamma, k);
        curve
    }

    #[inline]
    pub(crate) const fn kind(&self) -> Damping {
        self.kind
    }

    /// Seconds since the last restart.
    #[inline]
    pub(crate) fn elapsed(&self, now: FrameTime) -> f64 {
        now.saturating_duration_since(self.set_time).as_secs_f64()
    }

    pub(crate) fn delta(&self, now: FrameTime) -> f64 {
        let t = self.elapsed(now);
        match self.kind {
            Damping::Static => 0.0,
            Damping::Underdamped => {
                let (sin, cos) = (self.beta * t).sin_cos();
                (-self.lambda * t).exp() * (self.a * cos + self.b * sin)
            }
            Damping::Critical => (self.a + self.b * t) * (-self.lambda * t).exp(),
            Damping::Overdamped => {
                self.a * (-self.lambda * t).exp() + self.b * (-self.beta * t).exp()
            }
        }
    }

    pub(crate) fn slope(&self, now: FrameTime) -> f64 {
        let t = self.elapsed(now);
        match self.kind {
            Damping::Static => 0.0,
            Damping::Underdamped => {
                let (sin, cos) = (self.beta * t).sin_cos();
                (-self.lambda * t).exp()
                    * (cos * (self.beta * self.b - self.lambda * self.a)
                        - sin * (self.lambda * self.b + self.beta * self.a))
            }
            Damping::Critical => {
                (-self.lambda * t).exp() * (self.b * (1.0 - self.lambda * t) - self.lambda * self.a)
            }
            Damping::Overdamped => {
                -self.lambda * self.a * (-self.lambda * t).exp()
                    - self.beta * self.b * (-self.beta * t).exp()
            }
        }
    }

    /// Restarts the curve at `now` with `delta(0) = delta` and
    /// `delta'(0) = slope`.
    pub(crate) fn restart(&mut self, delta: f64, slope: f64, now: FrameTime) {
        self.set_time = now;
        match self.kind {
            Damping::Static => {
                self.a = 0.0;
                self.b = 0.0;
            }
            Damping::Underdamped => {
                self.a = delta;
                self.b = (slope + self.lambda * self.a) / self.beta;
            }
            Damping::Critical => {
                self.a = delta;
                self.b = slope + self.lambda * self.a;
            }
            Damping::Overdamped => {
                self.a = (self.beta * delta + slope) / (self.beta - self.lambda);
                self.b = delta - self.a;
            }
        }
    }

    /// Drops any motion in flight.
    pub(crate) fn settle(&mut self, now: FrameTime) {
        self.a = 0.0;
        self.b = 0.0;
        self.set_time = now;
    }

    /// Switches regime without a jump in value or slope.
    pub(crate) fn retune(&mut self, gamma: f64, k: f64, now: FrameTime) {
        let delta = self.delta(now);
        let slope = self.slope(now);
        self.set_coefficients(gamma, k);
        self.restart(delta, slope, now);
    }

    /// Multiplies the motion in flight by `factor` (frame change).
    pub(crate) fn scale(&mut self, factor: f64) {
        self.a *= factor;
        self.b *= factor;
    }

    fn set_coefficients(&mut self, gamma: f64, k: f64) {
        if gamma == 0.0 && k == 0.0 {
            self.kind = Damping::Static;
            self.lambda = 0.0;
            self.beta = 0.0;
            return;
        }
        let discriminant = gamma * gamma - 4.0 * k;
        if discriminant > CRITICAL_BAND {
            let root = discriminant.sqrt();
            self.kind = Damping::Overdamped;
            self.lambda = (gamma + root) / 2.0;
            self.beta = (gamma - root) / 2.0;
        } else if discriminant < -CRITICAL_BAND {
            self.kind = Damping::Underdamped;
            self.lambda = gamma / 2.0;
            self.beta = (-discriminant).sqrt() / 2.0;
        } else {
            self.kind = Damping::Critical;
            self.lambda = gamma / 2.0;
            self.beta = self.lambda;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn t(ms: u64) -> FrameTime {
        FrameTime::from_millis(ms)
    }

    #[test]
    fn regime_selection() {
        assert_eq!(Curve::new(0.0, 0.0, t(0)).kind(), Damping::Static);
        assert_eq!(Curve::new(2.0, 1.0, t(0)).kind(), Damping::Critical);
        assert_eq!(Curve::new(2.0, 1.0002, t(0)).kind(), Damping::Critical);
        assert_eq!(Curve::new(1.0, 10.0, t(0)).kind(), Damping::Underdamped);
        assert_eq!(Curve::new(10.0, 1.0, t(0)).kind(), Damping::Overdamped);
    }

    #[test]
    fn restart_matches_initial_condition() {
        for (gamma, k) in [(1.0, 10.0), (4.0, 4.0), (10.0, 1.0)] {
            let mut c = Curve::new(gamma, k, t(0));
            c.restart(-3.0, 1.5, t(100));
            assert!((c.delta(t(100)) + 3.0).abs() < EPS, "delta for {gamma},{k}");
            assert!((c.slope(t(100)) - 1.5).abs() < EPS, "slope for {gamma},{k}");
        }
    }

    #[test]
    fn slope_is_derivative_of_delta() {
        for (gamma, k) in [(1.0, 10.0), (4.0, 4.0), (10.0, 1.0)] {
            let mut c = Curve::new(gamma, k, t(0));
            c.restart(5.0, -2.0, t(0));
            let at = FrameTime(250_000);
            let h = FrameTime(250_001);
            let numeric = (c.delta(h) - c.delta(at)) / 1e-6;
            assert!((numeric - c.slope(at)).abs() < 1e-3, "regime {:?}", c.kind());
        }
    }

    #[test]
    fn retune_keeps_value_and_slope() {
        let mut c = Curve::new(4.0, 4.0, t(0));
        c.restart(10.0, 0.0, t(0));
        let before = (c.delta(t(120)), c.slope(t(120)));
        c.retune(1.0, 10.0, t(120));
        assert_eq!(c.kind(), Damping::Underdamped);
        assert!((c.delta(t(120)) - before.0).abs() < EPS, "value jumped");
        assert!((c.slope(t(120)) - before.1).abs() < EPS, "slope jumped");
    }
}
