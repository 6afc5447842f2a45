//! Normalized progress of the current phase, for ring rendering.
//!
//! The tracker knows nothing about animation APIs. It turns engine state
//! into a fraction in `[0, 1]`, keeps intra-tick precision reported by a
//! high-frequency clock, and freezes the value across a pause so a resumed
//! ring continues from where it stopped.

use serde::Serialize;

use super::engine::TimerState;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgressTracker {
    /// Fraction of the current unit already elapsed, in `[0, 1)`.
    partial: f64,
    /// Value captured at the last pause, reported until resumed.
    frozen: Option<f64>,
    /// Lowest value the tracker may report within the current phase.
    floor: f64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// `1 - remaining / phase_duration`, plus any intra-tick progress while
    /// running. Never lower than the last paused value in this phase.
    pub fn fraction(&self, state: &TimerState) -> f64 {
        if let Some(frozen) = self.frozen {
            return frozen;
        }
        let duration = state.phase_duration();
        if duration == 0 {
            return 0.0;
        }
        let mut elapsed = duration.saturating_sub(state.remaining) as f64;
        if state.running {
            elapsed += self.partial;
        }
        (elapsed / duration as f64).clamp(0.0, 1.0).max(self.floor)
    }

    pub fn is_paused(&self) -> bool {
        self.frozen.is_some()
    }

    /// Record sub-unit progress. Values outside `[0, 1)` are clamped.
    pub fn advance_partial(&mut self, partial: f64) {
        self.partial = if partial.is_finite() {
            partial.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
    }

    /// A full unit elapsed; intra-tick progress starts over.
    pub fn on_tick(&mut self) {
        self.partial = 0.0;
    }

    /// Freeze at the current fraction. Must be called while `state` still
    /// reports running so intra-tick progress is included.
    pub fn on_pause(&mut self, state: &TimerState) -> f64 {
        let current = self.fraction(state);
        self.frozen = Some(current);
        self.floor = current;
        current
    }

    /// Continue from the frozen point. Returns the fraction resumed from.
    pub fn on_resume(&mut self) -> f64 {
        self.frozen.take().unwrap_or(self.floor)
    }

    /// Back to zero. Used on reset and at every phase change.
    pub fn on_reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{Phase, TimerSettings};

    fn state(remaining: u64, running: bool) -> TimerState {
        let mut s = TimerState::initial(&TimerSettings::default());
        s.remaining = remaining;
        s.running = running;
        s
    }

    #[test]
    fn zero_at_phase_start() {
        let t = ProgressTracker::new();
        assert_eq!(t.fraction(&state(10, false)), 0.0);
    }

    #[test]
    fn fills_as_time_elapses() {
        let t = ProgressTracker::new();
        assert!((t.fraction(&state(7, true)) - 0.3).abs() < 1e-9);
        assert!((t.fraction(&state(1, true)) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn partial_only_counts_while_running() {
        let mut t = ProgressTracker::new();
        t.advance_partial(0.5);
        assert!((t.fraction(&state(10, true)) - 0.05).abs() < 1e-9);
        assert_eq!(t.fraction(&state(10, false)), 0.0);
    }

    #[test]
    fn pause_resume_keeps_fraction() {
        let mut t = ProgressTracker::new();
        t.advance_partial(0.25);
        let running = state(6, true);
        let before = t.fraction(&running);
        let paused_at = t.on_pause(&running);
        assert_eq!(paused_at, before);
        assert_eq!(t.fraction(&state(6, false)), before);
        assert!(t.is_paused());
        assert_eq!(t.on_resume(), before);
        assert_eq!(t.fraction(&running), before);
    }

    #[test]
    fn never_moves_backward_after_resume() {
        let mut t = ProgressTracker::new();
        t.advance_partial(0.75);
        t.on_pause(&state(6, true));
        t.on_resume();
        // Clock restarted its sub-unit count.
        t.advance_partial(0.0);
        assert!(t.fraction(&state(6, true)) >= 0.475 - 1e-9);
    }

    #[test]
    fn reset_returns_to_zero() {
        let mut t = ProgressTracker::new();
        t.advance_partial(0.5);
        t.on_pause(&state(2, true));
        t.on_reset();
        assert!(!t.is_paused());
        assert_eq!(t.fraction(&state(10, false)), 0.0);
    }

    #[test]
    fn relax_phase_uses_relax_duration() {
        let t = ProgressTracker::new();
        let mut s = state(1, true);
        s.phase = Phase::Relax;
        assert!((t.fraction(&s) - 0.8).abs() < 1e-9);
    }
}
