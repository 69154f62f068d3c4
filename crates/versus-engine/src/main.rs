//! Headless engine binary for the Versus simulation.
//!
//! This is the main entry point that wires together configuration, the
//! notification sinks, the starting population, and the tick loop. It
//! runs the simulation until the tick limit or until no agent is left.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `versus-config.yaml` (or `VERSUS_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Assemble the notification sinks
//! 4. Build the city and spawn the starting population
//! 5. Run the simulation loop
//! 6. Log the result and the notification tally

mod error;
mod report;
mod spawner;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use versus_core::config::{LoggingConfig, SimulationConfig};
use versus_core::runner::{self, RunLimits};
use versus_core::sinks::{BroadcastSink, JsonLinesSink, TracingSink};
use versus_core::tick::SimulationState;
use versus_types::FanOutSink;

use crate::error::EngineError;
use crate::report::ProgressCallback;

/// Config file looked up in the working directory.
const DEFAULT_CONFIG_PATH: &str = "versus-config.yaml";

/// Environment variable overriding the config path.
const CONFIG_PATH_ENV: &str = "VERSUS_CONFIG";

/// Buffered notifications per broadcast subscriber.
const BROADCAST_CAPACITY: usize = 1024;

/// Ticks between progress lines.
const PROGRESS_EVERY_TICKS: u64 = 100;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config_path = ?config_path,
        world_name = config.world.name,
        seed = config.world.seed,
        width = config.world.grid.width,
        depth = config.world.grid.depth,
        "versus-engine starting"
    );

    // 3. Assemble notification sinks.
    let (broadcast, receiver) = BroadcastSink::new(BROADCAST_CAPACITY);
    let observer = tokio::spawn(report::tally_events(receiver));

    let mut sinks = FanOutSink::new();
    sinks.subscribe(Box::new(TracingSink));
    sinks.subscribe(Box::new(broadcast));
    if let Some(path) = &config.logging.events_path {
        let file = File::create(path).map_err(|source| EngineError::EventLog {
            path: path.display().to_string(),
            source,
        })?;
        sinks.subscribe(Box::new(JsonLinesSink::new(BufWriter::new(file))));
        info!(path = %path.display(), "Writing notifications as JSON lines");
    }

    // 4. Build the city and spawn the starting population.
    let mut state = SimulationState::new(&config, Box::new(sinks)).map_err(EngineError::from)?;
    let spawned = spawner::spawn_population(&mut state, &config.population)?;
    info!(
        cats = spawned.cats,
        dogs = spawned.dogs,
        "Starting population spawned"
    );

    // 5. Run the simulation.
    let mut callback = ProgressCallback::new(PROGRESS_EVERY_TICKS);
    let result = runner::run_simulation(&mut state, RunLimits::from(&config.time), &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 6. Log results.
    runner::log_simulation_end(&result);
    info!(
        devices_placed = state.devices.placed().len(),
        intruders_driven_off = state.intruders.driven_off(),
        "Final tallies"
    );

    // Dropping the state closes the broadcast channel and ends the observer.
    drop(state);
    match observer.await {
        Ok(tally) => info!(
            high = tally.high,
            medium = tally.medium,
            low = tally.low,
            lagged = tally.lagged,
            "Notifications observed"
        ),
        Err(e) => warn!(error = %e, "Notification observer failed"),
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "versus-engine shutdown complete"
    );
    Ok(())
}

/// Load the simulation configuration.
///
/// Uses the path in `VERSUS_CONFIG` if set, otherwise `versus-config.yaml`
/// in the working directory. A missing default file means defaults; a
/// missing explicit file is an error.
fn load_config() -> Result<(SimulationConfig, Option<PathBuf>), EngineError> {
    if let Ok(explicit) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(explicit);
        let config = SimulationConfig::from_file(&path)?;
        return Ok((config, Some(path)));
    }
    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        let config = SimulationConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((SimulationConfig::default(), None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_logging(logging: &LoggingConfig) -> Result<(), EngineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .map_err(|e| EngineError::Logging {
            message: e.to_string(),
        })?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}
