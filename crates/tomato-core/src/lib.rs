//! # Tomato Core Library
//!
//! This library provides the core logic for the Tomato work/relax timer.
//! The timer alternates between a work phase and a relax phase, shown as a
//! `MM:SS` countdown and a progress ring. Everything that draws or reads
//! keys lives outside this crate behind the [`Display`] trait.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a tick-driven state machine that requires the
//!   caller to invoke `tick()` once per time unit
//! - **Progress Tracker**: normalized ring fraction with pause/resume continuity
//! - **Clock Source**: tokio interval that subdivides a unit into pulses
//! - **Session**: applies commands and pushes notifications to a display
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: Core timer state machine
//! - [`ClockSource`]: Periodic pulse provider
//! - [`Session`]: Engine plus display
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{ClockSource, Pulse, TickDivider};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use session::{Command, Display, PhaseStyle, Session};
pub use storage::Config;
pub use timer::{
    format_remaining, CountdownEngine, Notification, Phase, ProgressTracker, Snapshot,
    TimerSettings, TimerState,
};
