use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Relax,
}

impl Phase {
    /// The phase that follows this one.
    pub fn other(self) -> Self {
        match self {
            Phase::Work => Phase::Relax,
            Phase::Relax => Phase::Work,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "Work",
            Phase::Relax => "Relax",
        }
    }

    /// Default ring color for the phase, as a hex RGB string.
    pub fn color(self) -> &'static str {
        match self {
            Phase::Work => "#4876F5",
            Phase::Relax => "#44D14A",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Durations of the two phases and what happens at a phase boundary.
///
/// Durations are abstract time units. The engine decrements by one unit per
/// tick; mapping a unit to wall time is the clock's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub work_duration: u64,
    pub relax_duration: u64,
    /// Keep running into the next phase instead of stopping at the boundary.
    #[serde(default)]
    pub auto_cycle: bool,
}

impl TimerSettings {
    pub fn new(work_duration: u64, relax_duration: u64) -> Self {
        Self {
            work_duration,
            relax_duration,
            auto_cycle: false,
        }
    }

    /// 25 minutes of work, 5 of relax, with one-second units.
    pub fn classic() -> Self {
        Self::new(1500, 300)
    }

    pub fn with_auto_cycle(mut self, auto_cycle: bool) -> Self {
        self.auto_cycle = auto_cycle;
        self
    }

    pub fn duration_of(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Work => self.work_duration,
            Phase::Relax => self.relax_duration,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if either duration is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_duration == 0 {
            return Err(ConfigError::invalid("work_duration", "must be greater than 0"));
        }
        if self.relax_duration == 0 {
            return Err(ConfigError::invalid("relax_duration", "must be greater than 0"));
        }
        Ok(())
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::new(10, 5)
    }
}
