//! Warmup: eased acceleration from half speed up to the target rate.
//!
//! While active the ramp owns the live rate cell and rewrites it every frame.
//! It never touches the engine's position or play state; it only observes
//! whether the engine is running.

use log::debug;

use crate::pacing::LiveRate;

pub const RAMP_DURATION_MS: u64 = 5_000;
pub const RAMP_START_FRACTION: f32 = 0.5;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RampEvent {
    Emitted(u16),
    /// Reached the target; the cell now holds the target exactly.
    Completed(u16),
    /// Stopped early; the cell was restored to the target.
    Cancelled(u16),
}

#[derive(Debug)]
pub struct RateRamp {
    output: LiveRate,
    target: u16,
    active: bool,
    // `None` while armed and waiting for the engine to start running.
    started_at_ms: Option<u64>,
    progress: f32,
}

impl RateRamp {
    pub fn new(output: LiveRate, target: u16) -> Self {
        Self {
            output,
            target,
            active: false,
            started_at_ms: None,
            progress: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> u16 {
        self.target
    }

    /// Fraction of the ramp elapsed, `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Follow the configured rate. Ignored while a ramp is running.
    pub fn track_target(&mut self, target: u16) {
        if !self.active {
            self.target = target;
        }
    }

    /// Begin a ramp toward `target`.
    ///
    /// If the engine is not running yet the ramp is armed and its clock
    /// starts on the first running frame.
    pub fn start(&mut self, target: u16, now_ms: u64, engine_running: bool) {
        self.target = target;
        self.active = true;
        self.progress = 0.0;
        self.started_at_ms = engine_running.then_some(now_ms);
        self.output.set(rate_at(0.0, target));
        debug!("ramp: start target={} armed={}", target, !engine_running);
    }

    pub fn stop(&mut self) -> Option<RampEvent> {
        if !self.active {
            return None;
        }

        self.active = false;
        self.started_at_ms = None;
        self.progress = 0.0;
        self.output.set(self.target);
        debug!("ramp: cancelled, restored target={}", self.target);
        Some(RampEvent::Cancelled(self.target))
    }

    pub fn toggle(&mut self, now_ms: u64, engine_running: bool) -> Option<RampEvent> {
        if self.active {
            self.stop()
        } else {
            self.start(self.target, now_ms, engine_running);
            Some(RampEvent::Emitted(self.output.get()))
        }
    }

    /// Advance the ramp for this frame. Must run before the engine's tick so
    /// the engine sees the rate emitted for the same frame.
    pub fn on_frame(&mut self, now_ms: u64, engine_running: bool) -> Option<RampEvent> {
        if !self.active {
            return None;
        }

        let started_at = match self.started_at_ms {
            None if engine_running => {
                self.started_at_ms = Some(now_ms);
                now_ms
            }
            None => return None,
            Some(_) if !engine_running => return self.stop(),
            Some(started_at) => started_at,
        };

        let elapsed = now_ms.saturating_sub(started_at);
        self.progress = (elapsed as f32 / RAMP_DURATION_MS as f32).min(1.0);

        if self.progress >= 1.0 {
            self.active = false;
            self.started_at_ms = None;
            self.output.set(self.target);
            debug!("ramp: complete target={}", self.target);
            return Some(RampEvent::Completed(self.target));
        }

        let rate = rate_at(self.progress, self.target);
        self.output.set(rate);
        Some(RampEvent::Emitted(rate))
    }
}

/// Cubic ease-out from `target * RAMP_START_FRACTION` to `target`.
pub fn rate_at(progress: f32, target: u16) -> u16 {
    let progress = progress.clamp(0.0, 1.0);
    let remaining = 1.0 - progress;
    let eased = 1.0 - remaining * remaining * remaining;
    let target = target as f32;
    let start = target * RAMP_START_FRACTION;
    (start + (target - start) * eased).round() as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_to(target: u16) -> (RateRamp, LiveRate) {
        let rate = LiveRate::new(target);
        (RateRamp::new(rate.clone(), target), rate)
    }

    #[test]
    fn curve_endpoints() {
        assert_eq!(rate_at(0.0, 600), 300);
        assert_eq!(rate_at(1.0, 600), 600);
        assert_eq!(rate_at(0.5, 600), 563);
    }

    #[test]
    fn curve_is_monotonic() {
        let mut previous = 0;
        for step in 0..=100 {
            let rate = rate_at(step as f32 / 100.0, 900);
            assert!(rate >= previous);
            previous = rate;
        }
    }

    #[test]
    fn ramp_runs_to_target_and_deactivates() {
        let (mut ramp, rate) = ramp_to(600);
        ramp.start(600, 1_000, true);
        assert!(ramp.is_active());
        assert_eq!(rate.get(), 300);

        assert_eq!(ramp.on_frame(1_000, true), Some(RampEvent::Emitted(300)));
        assert_eq!(ramp.on_frame(3_500, true), Some(RampEvent::Emitted(563)));
        assert_eq!(rate.get(), 563);

        assert_eq!(ramp.on_frame(6_000, true), Some(RampEvent::Completed(600)));
        assert_eq!(rate.get(), 600);
        assert!(!ramp.is_active());
        assert_eq!(ramp.on_frame(7_000, true), None);
    }

    #[test]
    fn pause_cancels_instead_of_suspending() {
        let (mut ramp, rate) = ramp_to(800);
        ramp.start(800, 0, true);
        assert!(matches!(ramp.on_frame(1_000, true), Some(RampEvent::Emitted(_))));

        assert_eq!(ramp.on_frame(1_016, false), Some(RampEvent::Cancelled(800)));
        assert!(!ramp.is_active());
        assert_eq!(rate.get(), 800);
        assert_eq!(ramp.on_frame(1_032, true), None);
    }

    #[test]
    fn armed_ramp_waits_for_playback() {
        let (mut ramp, rate) = ramp_to(600);
        ramp.start(600, 0, false);
        assert_eq!(ramp.on_frame(2_000, false), None);
        assert!(ramp.is_active());
        assert_eq!(rate.get(), 300);

        assert_eq!(ramp.on_frame(10_000, true), Some(RampEvent::Emitted(300)));
        assert_eq!(ramp.on_frame(15_000, true), Some(RampEvent::Completed(600)));
    }

    #[test]
    fn toggle_starts_and_restores() {
        let (mut ramp, rate) = ramp_to(500);
        ramp.track_target(640);

        assert_eq!(ramp.toggle(0, true), Some(RampEvent::Emitted(320)));
        assert!(ramp.is_active());

        assert_eq!(ramp.toggle(100, true), Some(RampEvent::Cancelled(640)));
        assert!(!ramp.is_active());
        assert_eq!(rate.get(), 640);
    }

    #[test]
    fn target_is_frozen_while_active() {
        let (mut ramp, _rate) = ramp_to(600);
        ramp.start(600, 0, true);
        ramp.track_target(900);
        assert_eq!(ramp.target(), 600);

        ramp.stop();
        ramp.track_target(900);
        assert_eq!(ramp.target(), 900);
    }

    #[test]
    fn stop_when_inactive_is_a_no_op() {
        let (mut ramp, rate) = ramp_to(600);
        assert_eq!(ramp.stop(), None);
        assert_eq!(rate.get(), 600);
    }
}
