//! Clock source that drives the countdown.
//!
//! A tick is one time unit at the engine boundary. For a smooth progress
//! ring the clock may fire several pulses per tick; `TickDivider` folds
//! them back so the engine still sees exactly one `tick()` per unit.

use std::time::Duration;

use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pulse {
    /// Intermediate pulse; the value is the elapsed fraction of the unit.
    Partial(f64),
    /// Last pulse of a unit.
    Tick,
}

/// Counts high-frequency pulses and reports when a full tick has elapsed.
///
/// The count survives pause/resume and is cleared only by `reset()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickDivider {
    pulses_per_tick: u32,
    count: u32,
}

impl TickDivider {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `pulses_per_tick` is zero.
    pub fn new(pulses_per_tick: u32) -> Result<Self, ConfigError> {
        if pulses_per_tick == 0 {
            return Err(ConfigError::invalid("pulses_per_tick", "must be greater than 0"));
        }
        Ok(Self {
            pulses_per_tick,
            count: 0,
        })
    }

    pub fn pulses_per_tick(&self) -> u32 {
        self.pulses_per_tick
    }

    pub fn pulse(&mut self) -> Pulse {
        self.count += 1;
        if self.count >= self.pulses_per_tick {
            self.count = 0;
            Pulse::Tick
        } else {
            Pulse::Partial(f64::from(self.count) / f64::from(self.pulses_per_tick))
        }
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

/// Periodic pulse provider on top of a tokio interval.
///
/// The interval is armed lazily, so a `ClockSource` can be built outside a
/// runtime. `next_pulse` must be awaited inside one.
#[derive(Debug)]
pub struct ClockSource {
    period: Duration,
    interval: Option<Interval>,
    divider: TickDivider,
}

impl ClockSource {
    /// `tick_interval` is the wall time of one unit, split into
    /// `pulses_per_tick` equal pulses.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for a zero interval, zero pulses,
    /// or a pulse period that rounds down to nothing.
    pub fn new(tick_interval: Duration, pulses_per_tick: u32) -> Result<Self, ConfigError> {
        if tick_interval.is_zero() {
            return Err(ConfigError::invalid("tick_interval_ms", "must be greater than 0"));
        }
        let divider = TickDivider::new(pulses_per_tick)?;
        let period = tick_interval / pulses_per_tick;
        if period.is_zero() {
            return Err(ConfigError::invalid(
                "pulses_per_tick",
                format!("too many pulses for a {tick_interval:?} tick"),
            ));
        }
        Ok(Self {
            period,
            interval: None,
            divider,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Wait for the next pulse.
    pub async fn next_pulse(&mut self) -> Pulse {
        let period = self.period;
        let interval = self.interval.get_or_insert_with(|| arm(period));
        interval.tick().await;
        self.divider.pulse()
    }

    /// Re-arm so the next pulse lands one full period from now.
    /// Call when the engine starts running.
    pub fn restart(&mut self) {
        self.interval = Some(arm(self.period));
    }

    /// Drop any partial unit and re-arm.
    pub fn reset(&mut self) {
        self.divider.reset();
        self.restart();
    }
}

fn arm(period: Duration) -> Interval {
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divider_emits_one_tick_per_unit() {
        let mut divider = TickDivider::new(4).unwrap();
        assert_eq!(divider.pulse(), Pulse::Partial(0.25));
        assert_eq!(divider.pulse(), Pulse::Partial(0.5));
        assert_eq!(divider.pulse(), Pulse::Partial(0.75));
        assert_eq!(divider.pulse(), Pulse::Tick);
        assert_eq!(divider.pulse(), Pulse::Partial(0.25));
    }

    #[test]
    fn single_pulse_divider_always_ticks() {
        let mut divider = TickDivider::new(1).unwrap();
        assert_eq!(divider.pulse(), Pulse::Tick);
        assert_eq!(divider.pulse(), Pulse::Tick);
    }

    #[test]
    fn divider_reset_drops_partial_unit() {
        let mut divider = TickDivider::new(3).unwrap();
        divider.pulse();
        divider.reset();
        assert_eq!(divider.pulse(), Pulse::Partial(1.0 / 3.0));
    }

    #[test]
    fn rejects_invalid_clock() {
        assert!(TickDivider::new(0).is_err());
        assert!(ClockSource::new(Duration::ZERO, 1).is_err());
        assert!(ClockSource::new(Duration::from_nanos(1), 2).is_err());
        let clock = ClockSource::new(Duration::from_secs(1), 1000).unwrap();
        assert_eq!(clock.period(), Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn pulses_fill_one_interval() {
        let mut clock = ClockSource::new(Duration::from_millis(100), 4).unwrap();
        let start = Instant::now();
        assert_eq!(clock.next_pulse().await, Pulse::Partial(0.25));
        assert_eq!(clock.next_pulse().await, Pulse::Partial(0.5));
        assert_eq!(clock.next_pulse().await, Pulse::Partial(0.75));
        assert_eq!(clock.next_pulse().await, Pulse::Tick);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(100));
        assert!(elapsed < Duration::from_millis(110));
    }

    #[tokio::test(start_paused = true)]
    async fn restart_delays_first_pulse_by_a_period() {
        let mut clock = ClockSource::new(Duration::from_secs(1), 1).unwrap();
        time::advance(Duration::from_millis(400)).await;
        clock.restart();
        let start = Instant::now();
        assert_eq!(clock.next_pulse().await, Pulse::Tick);
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
