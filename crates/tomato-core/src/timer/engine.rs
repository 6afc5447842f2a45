//! Countdown engine implementation.
//!
//! The engine is a tick-driven state machine over two phases. It does not
//! use internal threads or timers - the caller is responsible for calling
//! `tick()` once per time unit while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle(Work)  --start--> Running(Work)  --pause--> Idle(Work)
//! Running(Work)  --tick to zero--> Idle(Relax)
//! Running(Relax) --tick to zero--> Idle(Work)
//! any --reset--> Idle(Work)
//! ```
//!
//! ## Usage
//!
//! ```
//! use tomato_core::timer::{CountdownEngine, Phase, TimerSettings};
//!
//! let mut engine = CountdownEngine::new(TimerSettings::new(2, 1)).unwrap();
//! engine.start();
//! engine.tick();
//! engine.tick(); // Returns Some(Event::PhaseCompleted)
//! assert_eq!(engine.phase(), Phase::Relax);
//! assert!(!engine.is_running());
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::format::format_remaining;
use super::phase::{Phase, TimerSettings};
use super::progress::ProgressTracker;
use crate::error::ConfigError;
use crate::events::Event;

/// The engine's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub work_duration: u64,
    pub relax_duration: u64,
    /// Units left in the current phase.
    pub remaining: u64,
    pub running: bool,
    /// Units of the current phase that had elapsed at the last pause.
    pub elapsed_at_pause: u64,
}

impl TimerState {
    /// Fresh state: work phase, full duration, not running.
    pub fn initial(settings: &TimerSettings) -> Self {
        Self {
            phase: Phase::Work,
            work_duration: settings.work_duration,
            relax_duration: settings.relax_duration,
            remaining: settings.work_duration,
            running: false,
            elapsed_at_pause: 0,
        }
    }

    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Relax => self.relax_duration,
        }
    }

    pub fn phase_duration(&self) -> u64 {
        self.duration_of(self.phase)
    }

    pub fn elapsed(&self) -> u64 {
        self.phase_duration().saturating_sub(self.remaining)
    }
}

/// What the display needs to know: the result of `snapshot()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub remaining: u64,
    pub running: bool,
}

/// Render payload pushed to the display after every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub phase: Phase,
    pub label: String,
    pub color: String,
    pub remaining: u64,
    pub remaining_formatted: String,
    pub progress_fraction: f64,
    pub running: bool,
}

/// Core countdown engine.
///
/// Owns its `TimerState` outright; there is no shared or static state, so
/// any number of engines can live side by side.
///
/// Deserializing goes through the same checks as [`CountdownEngine::new`],
/// plus consistency of the stored state with the settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StoredEngine")]
pub struct CountdownEngine {
    settings: TimerSettings,
    state: TimerState,
    progress: ProgressTracker,
}

/// Serialized form of an engine, checked before it becomes one.
#[derive(Deserialize)]
struct StoredEngine {
    settings: TimerSettings,
    state: TimerState,
}

impl TryFrom<StoredEngine> for CountdownEngine {
    type Error = ConfigError;

    fn try_from(stored: StoredEngine) -> Result<Self, ConfigError> {
        let StoredEngine { settings, state } = stored;
        settings.validate()?;
        if state.work_duration != settings.work_duration
            || state.relax_duration != settings.relax_duration
        {
            return Err(ConfigError::invalid(
                "state",
                "phase durations do not match settings",
            ));
        }
        if state.remaining == 0 || state.remaining > state.phase_duration() {
            return Err(ConfigError::invalid(
                "state.remaining",
                format!("must be between 1 and {}", state.phase_duration()),
            ));
        }

        // Progress is derived from the state; a paused engine resumes from
        // where its ring stopped.
        let mut progress = ProgressTracker::new();
        if !state.running && state.elapsed() > 0 {
            progress.on_pause(&state);
        }
        Ok(Self {
            settings,
            state,
            progress,
        })
    }
}

impl CountdownEngine {
    /// Create a new engine in `Idle(Work)`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a duration is zero.
    pub fn new(settings: TimerSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let state = TimerState::initial(&settings);
        Ok(Self {
            settings,
            state,
            progress: ProgressTracker::new(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining(&self) -> u64 {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn phase_duration(&self) -> u64 {
        self.state.phase_duration()
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        self.progress.fraction(&self.state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            remaining: self.state.remaining,
            running: self.state.running,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot_event(&self) -> Event {
        Event::StateSnapshot {
            phase: self.state.phase,
            remaining: self.state.remaining,
            running: self.state.running,
            progress: self.progress(),
            at: Utc::now(),
        }
    }

    /// Notification using the built-in phase labels and colors.
    pub fn notification(&self) -> Notification {
        let phase = self.state.phase;
        self.notification_with(phase.label(), phase.color())
    }

    /// Notification with caller-supplied label and color for the current phase.
    pub fn notification_with(&self, label: &str, color: &str) -> Notification {
        Notification {
            phase: self.state.phase,
            label: label.to_string(),
            color: color.to_string(),
            remaining: self.state.remaining,
            remaining_formatted: format_remaining(self.state.remaining),
            progress_fraction: self.progress(),
            running: self.state.running,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state.running {
            return None;
        }
        self.state.running = true;
        let was_paused = self.progress.is_paused();
        let resumed_from = self.progress.on_resume();
        debug!(phase = %self.state.phase, remaining = self.state.remaining, "timer started");
        if was_paused {
            Some(Event::TimerResumed {
                phase: self.state.phase,
                remaining: self.state.remaining,
                progress: resumed_from,
                at: Utc::now(),
            })
        } else {
            Some(Event::TimerStarted {
                phase: self.state.phase,
                remaining: self.state.remaining,
                at: Utc::now(),
            })
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        // Capture while still running so intra-tick progress is kept.
        let progress = self.progress.on_pause(&self.state);
        self.state.running = false;
        self.state.elapsed_at_pause = self.state.elapsed();
        debug!(phase = %self.state.phase, remaining = self.state.remaining, progress, "timer paused");
        Some(Event::TimerPaused {
            phase: self.state.phase,
            remaining: self.state.remaining,
            progress,
            at: Utc::now(),
        })
    }

    /// The play/pause button: pause when running, start otherwise.
    pub fn toggle(&mut self) -> Option<Event> {
        if self.state.running {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Back to `Idle(Work)` with the configured durations. Always succeeds.
    pub fn reset(&mut self) -> Event {
        self.state = TimerState::initial(&self.settings);
        self.progress.on_reset();
        debug!("timer reset");
        Event::TimerReset { at: Utc::now() }
    }

    /// Record intra-tick progress from a high-frequency clock.
    /// Ignored while idle; never changes `remaining`.
    pub fn advance_partial(&mut self, partial: f64) {
        if self.state.running {
            self.progress.advance_partial(partial);
        }
    }

    /// Call once per time unit. Returns `Some(Event::PhaseCompleted)` when
    /// the countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.state.running {
            return None;
        }
        self.state.remaining = self.state.remaining.saturating_sub(1);
        self.progress.on_tick();
        trace!(phase = %self.state.phase, remaining = self.state.remaining, "tick");
        if self.state.remaining > 0 {
            return None;
        }
        Some(self.complete_phase())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self) -> Event {
        let completed = self.state.phase;
        let next = completed.other();
        let next_duration = self.state.duration_of(next);
        let auto_continued = self.settings.auto_cycle;

        self.state.phase = next;
        self.state.remaining = next_duration;
        self.state.running = auto_continued;
        self.state.elapsed_at_pause = 0;
        self.progress.on_reset();

        debug!(%completed, %next, next_duration, auto_continued, "phase completed");
        Event::PhaseCompleted {
            completed,
            next,
            next_duration,
            auto_continued,
            at: Utc::now(),
        }
    }
}
