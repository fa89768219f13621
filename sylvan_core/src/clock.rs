// Copyright 2026 the Sylvan Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendering clock.
//!
//! [`RenderClock`] turns wall-clock samples taken once per frame into the
//! [`FrameTime`] given to [`Scene::begin_frame`](crate::scene::Scene::begin_frame).
//! The frame delta is smoothed, so a late frame or a stall advances the
//! animations by about one usual frame instead of jumping:
//!
//! ```text
//! rendering_time += smooth(wall_now - wall_prev)
//! ```
//!
//! The clock can be paused (nothing advances, and the gap is not counted
//! when it resumes) and tells the host when nothing was touched for a while
//! so it can stop requesting frames.

use crate::smooth::SmoothValue;
use crate::time::{Duration, FrameTime};

/// Frame delta assumed before the first measurement, in microseconds.
const NOMINAL_DELTA_US: f64 = 16_700.0;
/// Damping of the frame-delta smoothing.
const DELTA_LAMBDA: f64 = 5.0;
/// Half period of the angle time, in microseconds (60π seconds).
const ANGLE_LOOP_US: i64 = 188_495_559;

/// A smoothed, pausable rendering clock.
#[derive(Clone, Debug)]
pub struct RenderClock {
    elapsed: FrameTime,
    /// Microseconds, kept in `[-ANGLE_LOOP_US, ANGLE_LOOP_US]`.
    angle_us: i64,
    last_wall: Option<FrameTime>,
    smooth_delta: SmoothValue,
    paused: bool,
    last_touch: FrameTime,
    sleep_after: Duration,
}

impl Default for RenderClock {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderClock {
    /// Idle time after which [`should_sleep`](Self::should_sleep) is raised.
    pub const DEFAULT_SLEEP_AFTER: Duration = Duration::from_millis(16_000);

    /// A clock at zero, running.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elapsed: FrameTime::ZERO,
            angle_us: 0,
            last_wall: None,
            smooth_delta: SmoothValue::with_lambda(NOMINAL_DELTA_US, DELTA_LAMBDA),
            paused: false,
            last_touch: FrameTime::ZERO,
            sleep_after: Self::DEFAULT_SLEEP_AFTER,
        }
    }

    /// Builder: idle time before sleeping.
    #[must_use]
    pub fn with_sleep_after(mut self, sleep_after: Duration) -> Self {
        self.sleep_after = sleep_after;
        self
    }

    /// Advances the clock to the wall-clock sample `wall` and returns the new
    /// rendering time.
    ///
    /// The first sample (and the first after a pause) only anchors the
    /// clock. Samples going backwards count as a zero delta.
    pub fn tick(&mut self, wall: FrameTime) -> FrameTime {
        if self.paused {
            return self.elapsed;
        }
        let Some(last) = self.last_wall.replace(wall) else {
            return self.elapsed;
        };
        let raw = wall.saturating_duration_since(last).micros() as f64;
        self.smooth_delta.set(raw, false, false, wall);
        let delta = self.smooth_delta.pos(wall).max(0.0).round();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "rounded and non-negative, bounded by the raw gap"
        )]
        let delta_us = delta as u64;
        self.elapsed = self.elapsed + Duration(delta_us);
        self.angle_us += i64::try_from(delta_us).unwrap_or(ANGLE_LOOP_US);
        while self.angle_us > ANGLE_LOOP_US {
            self.angle_us -= 2 * ANGLE_LOOP_US;
        }
        self.elapsed
    }

    /// Current rendering time.
    #[inline]
    #[must_use]
    pub const fn now(&self) -> FrameTime {
        self.elapsed
    }

    /// Seconds on a clock that loops within `±60π`, for periodic effects.
    #[must_use]
    pub fn angle_time(&self) -> f64 {
        self.angle_us as f64 / 1_000_000.0
    }

    /// Whether the clock is paused.
    #[inline]
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pauses or resumes the clock. Resuming counts as a touch.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused == paused {
            return;
        }
        self.paused = paused;
        self.last_wall = None;
        if !paused {
            self.touch();
        }
        tracing::debug!(paused, now = ?self.elapsed, "render clock");
    }

    /// Records user activity, postponing sleep.
    pub fn touch(&mut self) {
        self.last_touch = self.elapsed;
    }

    /// Whether nothing was touched for the sleep delay.
    #[must_use]
    pub fn should_sleep(&self) -> bool {
        self.elapsed.saturating_duration_since(self.last_touch) > self.sleep_after
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(clock: &mut RenderClock, wall: &mut FrameTime, frames: usize, step_ms: u64) {
        for _ in 0..frames {
            *wall = *wall + Duration::from_millis(step_ms);
            clock.tick(*wall);
        }
    }

    #[test]
    fn first_sample_only_anchors() {
        let mut clock = RenderClock::new();
        assert_eq!(clock.tick(FrameTime::from_millis(5_000)), FrameTime::ZERO);
    }

    #[test]
    fn steady_frames_converge_to_their_period() {
        let mut clock = RenderClock::new();
        let mut wall = FrameTime::from_millis(1_000);
        clock.tick(wall);
        run(&mut clock, &mut wall, 200, 16);
        let before = clock.now();
        run(&mut clock, &mut wall, 1, 16);
        let step = clock.now().saturating_duration_since(before).micros();
        assert!(step.abs_diff(16_000) < 50, "{step}");
    }

    #[test]
    fn stalls_do_not_jump() {
        let mut clock = RenderClock::new();
        let mut wall = FrameTime::ZERO;
        clock.tick(wall);
        run(&mut clock, &mut wall, 100, 16);
        let before = clock.now();
        run(&mut clock, &mut wall, 1, 2_000);
        let step = clock.now().saturating_duration_since(before);
        assert!(step < Duration::from_millis(100), "{step:?}");
    }

    #[test]
    fn paused_time_is_not_counted() {
        let mut clock = RenderClock::new();
        let mut wall = FrameTime::ZERO;
        clock.tick(wall);
        run(&mut clock, &mut wall, 10, 16);
        clock.set_paused(true);
        let at_pause = clock.now();
        run(&mut clock, &mut wall, 10, 1_000);
        assert_eq!(clock.now(), at_pause);
        clock.set_paused(false);
        run(&mut clock, &mut wall, 1, 60_000);
        assert_eq!(clock.now(), at_pause, "resuming re-anchors");
        run(&mut clock, &mut wall, 1, 16);
        assert!(clock.now() > at_pause);
    }

    #[test]
    fn idles_into_sleep_until_touched() {
        let mut clock = RenderClock::new().with_sleep_after(Duration::from_millis(100));
        let mut wall = FrameTime::ZERO;
        clock.tick(wall);
        run(&mut clock, &mut wall, 4, 16);
        assert!(!clock.should_sleep());
        run(&mut clock, &mut wall, 10, 16);
        assert!(clock.should_sleep());
        clock.touch();
        assert!(!clock.should_sleep());
    }

    #[test]
    fn angle_time_loops() {
        let mut clock = RenderClock::new();
        let mut wall = FrameTime::ZERO;
        clock.tick(wall);
        let limit = 60.0 * core::f64::consts::PI;
        for _ in 0..2_000 {
            run(&mut clock, &mut wall, 1, 250);
            let a = clock.angle_time();
            assert!((-limit..=limit + 1e-6).contains(&a), "{a}");
        }
        assert!(clock.now().as_secs_f64() > limit);
    }
}
