use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the engine produces an Event.
/// The display renders from notifications; events record what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining: u64,
        at: DateTime<Utc>,
    },
    /// Started again after a pause, continuing from `progress`.
    TimerResumed {
        phase: Phase,
        remaining: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        phase: Phase,
        remaining: u64,
        progress: f64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// The countdown reached zero and the other phase was loaded.
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        next_duration: u64,
        /// True when the engine kept running into `next`.
        auto_continued: bool,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        remaining: u64,
        running: bool,
        progress: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerReset { at }
            | Event::PhaseCompleted { at, .. }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::PhaseCompleted {
            completed: Phase::Work,
            next: Phase::Relax,
            next_duration: 5,
            auto_continued: false,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "phase_completed");
        assert_eq!(json["next"], "relax");
        assert_eq!(json["next_duration"], 5);
    }

    #[test]
    fn at_reads_every_variant() {
        let at = Utc::now();
        let events = [
            Event::TimerStarted { phase: Phase::Work, remaining: 10, at },
            Event::TimerPaused { phase: Phase::Work, remaining: 7, progress: 0.3, at },
            Event::TimerReset { at },
        ];
        for event in events {
            assert_eq!(event.at(), at);
        }
    }
}
