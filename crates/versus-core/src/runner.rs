//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Extinction**: stop as soon as no agent is left in the city
//! - **Pacing**: sleep `tick_interval_ms` between ticks
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it. The tick itself never awaits.
//!
//! [`run_tick`]: crate::tick::run_tick

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::TimeConfig;
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Every agent has left the city.
    Extinction,
}

/// Bounds and pacing for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLimits {
    /// Stop after this many ticks.
    pub max_ticks: u64,
    /// Real-time milliseconds to wait between ticks.
    pub tick_interval_ms: u64,
}

impl From<&TimeConfig> for RunLimits {
    fn from(config: &TimeConfig) -> Self {
        Self {
            max_ticks: config.max_ticks,
            tick_interval_ms: config.tick_interval_ms,
        }
    }
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to collect statistics or print progress.
/// The callback receives the tick summary and the current simulation state.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    limits: RunLimits,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = limits.max_ticks,
        tick_interval_ms = limits.tick_interval_ms,
        agents = state.agents.len(),
        "Simulation starting"
    );

    loop {
        // --- Execute tick ---
        let summary = tick::run_tick(state)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check extinction ---
        if summary.agents_alive() == 0 {
            info!(tick = summary.tick, "No agents left in the city");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Extinction,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Check tick limit ---
        if total_ticks >= limits.max_ticks {
            info!(
                tick = summary.tick,
                max_ticks = limits.max_ticks,
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Sleep for tick interval ---
        if limits.tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(limits.tick_interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        cats_alive = result.final_summary.as_ref().map(|s| s.cats_alive),
        dogs_alive = result.final_summary.as_ref().map(|s| s.dogs_alive),
        "Simulation ended"
    );
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::{PopulationConfig, SimulationConfig};
    use versus_types::{Faction, GridCoord, NullSink};

    fn make_simulation_state(agents: u32) -> SimulationState {
        let config = SimulationConfig {
            population: PopulationConfig { spawns: Vec::new() },
            ..SimulationConfig::default()
        };
        let mut state = SimulationState::new(&config, Box::new(NullSink)).unwrap();
        for n in 0..agents {
            state
                .spawn_agent(format!("Cat #{n}"), Faction::Cat, GridCoord::new(1, 1))
                .unwrap();
        }
        state
    }

    const fn limits(max_ticks: u64) -> RunLimits {
        RunLimits {
            max_ticks,
            tick_interval_ms: 0,
        }
    }

    #[tokio::test]
    async fn bounded_by_max_ticks() {
        let mut state = make_simulation_state(3);
        let result = run_simulation(&mut state, limits(5), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(result.final_summary.unwrap().tick, 5);
    }

    #[tokio::test]
    async fn extinction_stops_simulation() {
        let mut state = make_simulation_state(0);
        let result = run_simulation(&mut state, limits(100), &mut NoOpCallback)
            .await
            .unwrap();

        assert_eq!(result.end_reason, SimulationEndReason::Extinction);
        assert_eq!(result.total_ticks, 1);
    }

    #[tokio::test]
    async fn tick_callback_is_called() {
        struct Counter(u64);

        impl TickCallback for Counter {
            fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {
                self.0 = self.0.saturating_add(1);
            }
        }

        let mut state = make_simulation_state(1);
        let mut counter = Counter(0);
        let result = run_simulation(&mut state, limits(7), &mut counter)
            .await
            .unwrap();

        assert_eq!(counter.0, 7);
        assert_eq!(result.total_ticks, 7);
    }

    #[tokio::test]
    async fn pacing_sleeps_between_ticks() {
        let mut state = make_simulation_state(1);
        let started = tokio::time::Instant::now();
        let result = run_simulation(
            &mut state,
            RunLimits {
                max_ticks: 3,
                tick_interval_ms: 5,
            },
            &mut NoOpCallback,
        )
        .await
        .unwrap();

        assert_eq!(result.total_ticks, 3);
        assert!(started.elapsed() >= tokio::time::Duration::from_millis(10));
    }

    #[test]
    fn limits_follow_time_config() {
        let config = TimeConfig {
            delta_time: 0.2,
            tick_interval_ms: 50,
            max_ticks: 9,
        };
        assert_eq!(
            RunLimits::from(&config),
            RunLimits {
                max_ticks: 9,
                tick_interval_ms: 50,
            }
        );
    }
}
