//! Fixed-step simulation clock.
//!
//! The clock is the single source of time for a run. Every tick covers the
//! same `delta_time` seconds; elapsed time is accumulated tick by tick so
//! that a replay with the same configuration reproduces the same readings.

use versus_types::{Clock, TickTime};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. a zero step).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Simulation clock advancing in fixed steps.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Number of ticks completed (0 before the first advance).
    tick: u64,

    /// Seconds since simulation start.
    elapsed: f64,

    /// Seconds covered by each tick.
    delta: f32,
}

impl SimClock {
    /// Create a clock at tick 0 that advances `delta_time` seconds per tick.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `delta_time` is not a
    /// positive finite number.
    pub fn new(delta_time: f32) -> Result<Self, ClockError> {
        if !(delta_time.is_finite() && delta_time > 0.0) {
            return Err(ClockError::InvalidConfig {
                reason: format!("delta_time must be positive (got {delta_time})"),
            });
        }
        Ok(Self {
            tick: 0,
            elapsed: 0.0,
            delta: delta_time,
        })
    }

    /// Move to the next tick and return its reading.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter is exhausted.
    pub fn advance(&mut self) -> Result<TickTime, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.elapsed += f64::from(self.delta);
        Ok(self.now())
    }

    /// The most recent tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// The reading for the most recent tick.
    pub const fn now(&self) -> TickTime {
        TickTime::new(self.elapsed, self.delta)
    }
}

impl Clock for SimClock {
    fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    fn delta_time(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = SimClock::new(0.1).unwrap();
        assert_eq!(clock.tick(), 0);
        assert!(clock.elapsed_time().abs() < f64::EPSILON);
    }

    #[test]
    fn advance_accumulates_fixed_steps() {
        let mut clock = SimClock::new(0.5).unwrap();
        let first = clock.advance().unwrap();
        let second = clock.advance().unwrap();
        assert_eq!(clock.tick(), 2);
        assert!((first.elapsed - 0.5).abs() < 1e-9);
        assert!((second.elapsed - 1.0).abs() < 1e-9);
        assert!((second.delta - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_non_positive_step() {
        assert!(matches!(
            SimClock::new(0.0),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(SimClock::new(-1.0).is_err());
        assert!(SimClock::new(f32::NAN).is_err());
    }

    #[test]
    fn overflow_is_an_error() {
        let mut clock = SimClock {
            tick: u64::MAX,
            elapsed: 0.0,
            delta: 0.1,
        };
        assert!(matches!(clock.advance(), Err(ClockError::TickOverflow)));
    }
}
