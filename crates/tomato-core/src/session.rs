//! The seam between the countdown engine and whatever shows it.
//!
//! A `Display` receives a `Notification` after every state change. Input
//! arrives as `Command`s. `Session` wires the two to one engine and keeps
//! the rule that no-op commands render nothing.

use std::str::FromStr;

use tracing::debug;

use crate::clock::Pulse;
use crate::error::ValidationError;
use crate::events::Event;
use crate::timer::{CountdownEngine, Notification, Phase};

/// Renders engine state. Implemented by the host UI.
pub trait Display {
    fn render(&mut self, notification: &Notification);

    /// Called for every event the engine emits, before the matching render.
    fn event(&mut self, _event: &Event) {}
}

/// Inbound user commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Play/pause button.
    Toggle,
    Reset,
}

impl FromStr for Command {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(Command::Start),
            "pause" | "p" => Ok(Command::Pause),
            "toggle" | "t" | "" => Ok(Command::Toggle),
            "reset" | "r" => Ok(Command::Reset),
            other => Err(ValidationError::InvalidValue {
                field: "command".into(),
                message: format!("unknown command '{other}' (expected start, pause, toggle or reset)"),
            }),
        }
    }
}

/// Labels and colors shown for each phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseStyle {
    pub work_label: String,
    pub relax_label: String,
    pub work_color: String,
    pub relax_color: String,
}

impl PhaseStyle {
    pub fn label(&self, phase: Phase) -> &str {
        match phase {
            Phase::Work => &self.work_label,
            Phase::Relax => &self.relax_label,
        }
    }

    pub fn color(&self, phase: Phase) -> &str {
        match phase {
            Phase::Work => &self.work_color,
            Phase::Relax => &self.relax_color,
        }
    }
}

impl Default for PhaseStyle {
    fn default() -> Self {
        Self {
            work_label: Phase::Work.label().into(),
            relax_label: Phase::Relax.label().into(),
            work_color: Phase::Work.color().into(),
            relax_color: Phase::Relax.color().into(),
        }
    }
}

/// One engine plus the display it notifies.
pub struct Session<D: Display> {
    engine: CountdownEngine,
    display: D,
    style: PhaseStyle,
}

impl<D: Display> Session<D> {
    pub fn new(engine: CountdownEngine, display: D) -> Self {
        Self::with_style(engine, display, PhaseStyle::default())
    }

    pub fn with_style(engine: CountdownEngine, display: D, style: PhaseStyle) -> Self {
        Self {
            engine,
            display,
            style,
        }
    }

    pub fn engine(&self) -> &CountdownEngine {
        &self.engine
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn notification(&self) -> Notification {
        let phase = self.engine.phase();
        self.engine
            .notification_with(self.style.label(phase), self.style.color(phase))
    }

    /// Render the current state unconditionally, e.g. on first draw.
    pub fn refresh(&mut self) {
        let notification = self.notification();
        self.display.render(&notification);
    }

    /// Apply a user command. Returns the emitted event, if the command
    /// changed anything.
    pub fn apply(&mut self, command: Command) -> Option<Event> {
        debug!(?command, "command");
        let event = match command {
            Command::Start => self.engine.start(),
            Command::Pause => self.engine.pause(),
            Command::Toggle => self.engine.toggle(),
            Command::Reset => Some(self.engine.reset()),
        };
        self.publish(event)
    }

    /// Advance one time unit.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.engine.is_running() {
            return None;
        }
        let event = self.engine.tick();
        self.publish_and_render(event)
    }

    /// Feed one clock pulse. Partial pulses only move the progress ring.
    pub fn pulse(&mut self, pulse: Pulse) -> Option<Event> {
        match pulse {
            Pulse::Tick => self.tick(),
            Pulse::Partial(fraction) => {
                if self.engine.is_running() {
                    self.engine.advance_partial(fraction);
                    self.refresh();
                }
                None
            }
        }
    }

    fn publish(&mut self, event: Option<Event>) -> Option<Event> {
        let event = event?;
        self.publish_and_render(Some(event))
    }

    fn publish_and_render(&mut self, event: Option<Event>) -> Option<Event> {
        if let Some(ref e) = event {
            self.display.event(e);
        }
        self.refresh();
        event
    }
}
