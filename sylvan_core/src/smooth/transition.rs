// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Analog on/off switch used for show/hide fades.

use core::f64::consts::PI;

use crate::time::{Duration, FrameTime};

/// Overshooting ease-in curve used by popping nodes.
///
/// `pop(r) = a + b·cos(πr) + (½ − a)·cos(2πr) + (−½ − b)·cos(3πr)`, with
/// `pop(0) = 0` and `pop(1) = 1` for any coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PopCurve {
    a: f64,
    b: f64,
}

impl PopCurve {
    /// Builds the curve for a pop factor (see
    /// [`SceneConfig::pop_factor`](crate::config::SceneConfig::pop_factor)).
    #[must_use]
    pub fn from_factor(factor: f64) -> Self {
        Self {
            a: 0.75 + factor * 0.2,
            b: -0.43 + factor * 0.43,
        }
    }

    /// Evaluates the curve at ratio `r` in `[0, 1]`.
    #[must_use]
    pub fn eval(&self, r: f64) -> f64 {
        let x = PI * r;
        self.a + self.b * x.cos() + (0.5 - self.a) * (2.0 * x).cos() + (-0.5 - self.b) * (3.0 * x).cos()
    }
}

impl Default for PopCurve {
    fn default() -> Self {
        Self::from_factor(0.2)
    }
}

/// Phase of a [`ShowTransition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionState {
    /// Fully off.
    Down,
    /// Ramping from 0 to 1.
    GoingUp,
    /// Fully on.
    Up,
    /// Ramping from 1 to 0.
    GoingDown,
}

/// A boolean with a smooth `0 → 1` ramp in between.
///
/// The display walk feeds each payload node's `show` flag into
/// [`set_and_get`](Self::set_and_get) every frame and uses the result as
/// alpha. While the ramp is going down the node is still
/// [active](Self::is_active), which keeps it on screen until it has faded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShowTransition {
    state: TransitionState,
    start: FrameTime,
    duration: Duration,
    hard: bool,
    popping: bool,
    pop: PopCurve,
}

impl ShowTransition {
    /// Creates a transition in the [`Down`](TransitionState::Down) state.
    #[must_use]
    pub fn new(duration: Duration, pop: PopCurve) -> Self {
        Self {
            state: TransitionState::Down,
            start: FrameTime::ZERO,
            duration,
            hard: false,
            popping: false,
            pop,
        }
    }

    /// Sets the options: `hard` switches instantly, `popping` uses the
    /// overshooting [`PopCurve`] on the way up.
    pub fn set_options(&mut self, hard: bool, popping: bool) {
        self.hard = hard;
        self.popping = popping;
    }

    /// Returns whether the node still has something to show.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state != TransitionState::Down
    }

    /// Returns the current phase.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> TransitionState {
        self.state
    }

    /// Whether the overshooting curve is used on the way up.
    #[inline]
    #[must_use]
    pub const fn is_popping(&self) -> bool {
        self.popping
    }

    /// Forces the end state without a ramp.
    pub fn hard_set(&mut self, on: bool) {
        self.state = if on {
            TransitionState::Up
        } else {
            TransitionState::Down
        };
    }

    /// Drives the switch toward `on` and returns the ramp value at `now`.
    pub fn set_and_get(&mut self, on: bool, now: FrameTime) -> f64 {
        self.set(on, now);
        self.value(now)
    }

    /// Finishes an elapsed ramp and returns the value at `now`.
    pub fn get(&mut self, now: FrameTime) -> f64 {
        self.finish_if_elapsed(now);
        self.value(now)
    }

    /// Drives the switch toward `on`.
    pub fn set(&mut self, on: bool, now: FrameTime) {
        use TransitionState::{Down, GoingDown, GoingUp, Up};
        self.finish_if_elapsed(now);
        self.state = match (on, self.state) {
            (true, Down) if self.hard => Up,
            (true, Down) => {
                self.start = now;
                GoingUp
            }
            (true, GoingDown) => {
                self.reverse(now);
                GoingUp
            }
            (false, Up) if self.hard => Down,
            (false, Up) => {
                self.start = now;
                GoingDown
            }
            (false, GoingUp) => {
                self.reverse(now);
                GoingDown
            }
            (_, state) => state,
        };
    }

    fn elapsed(&self, now: FrameTime) -> Duration {
        now.saturating_duration_since(self.start)
    }

    fn finish_if_elapsed(&mut self, now: FrameTime) {
        if self.elapsed(now) > self.duration {
            self.state = match self.state {
                TransitionState::GoingUp => TransitionState::Up,
                TransitionState::GoingDown => TransitionState::Down,
                state => state,
            };
        }
    }

    /// Mirrors the elapsed time so the ramp turns around without a jump.
    fn reverse(&mut self, now: FrameTime) {
        let remaining = self.duration.saturating_sub(self.elapsed(now));
        self.start = now.saturating_sub(remaining);
    }

    fn ratio(&self, now: FrameTime) -> f64 {
        if self.duration == Duration::ZERO {
            return 1.0;
        }
        (self.elapsed(now).as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    fn value(&self, now: FrameTime) -> f64 {
        match self.state {
            TransitionState::Down => 0.0,
            TransitionState::Up => 1.0,
            TransitionState::GoingUp => {
                let r = self.ratio(now);
                if self.popping {
                    self.pop.eval(r)
                } else {
                    (1.0 - (PI * r).cos()) / 2.0
                }
            }
            TransitionState::GoingDown => (1.0 + (PI * self.ratio(now)).cos()) / 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn ms(ms: u64) -> FrameTime {
        FrameTime::from_millis(ms)
    }

    fn transition() -> ShowTransition {
        ShowTransition::new(Duration::from_millis(500), PopCurve::default())
    }

    #[test]
    fn pop_curve_endpoints() {
        for factor in [0.0, 0.2, 1.0] {
            let pop = PopCurve::from_factor(factor);
            assert!(pop.eval(0.0).abs() < EPS, "pop(0) for {factor}");
            assert!((pop.eval(1.0) - 1.0).abs() < EPS, "pop(1) for {factor}");
        }
    }

    #[test]
    fn ramps_up_and_settles() {
        let mut tr = transition();
        assert!(!tr.is_active());
        assert!(tr.set_and_get(true, ms(0)).abs() < EPS);
        assert_eq!(tr.state(), TransitionState::GoingUp);
        assert!((tr.set_and_get(true, ms(250)) - 0.5).abs() < EPS);
        assert!((tr.set_and_get(true, ms(600)) - 1.0).abs() < EPS);
        assert_eq!(tr.state(), TransitionState::Up);
    }

    #[test]
    fn stays_active_while_fading_out() {
        let mut tr = transition();
        tr.hard_set(true);
        tr.set_and_get(false, ms(1_000));
        assert!(tr.is_active());
        assert!((tr.get(ms(1_250)) - 0.5).abs() < EPS);
        assert!(tr.get(ms(1_600)).abs() < EPS);
        assert!(!tr.is_active());
    }

    #[test]
    fn reversal_is_continuous() {
        let mut tr = transition();
        tr.set(true, ms(1_000));
        let up = tr.get(ms(1_100));
        let down = tr.set_and_get(false, ms(1_100));
        assert!((up - down).abs() < EPS, "{up} vs {down}");
    }

    #[test]
    fn hard_switches_instantly() {
        let mut tr = transition();
        tr.set_options(true, false);
        assert!((tr.set_and_get(true, ms(0)) - 1.0).abs() < EPS);
        assert!(tr.set_and_get(false, ms(1)).abs() < EPS);
    }
}
