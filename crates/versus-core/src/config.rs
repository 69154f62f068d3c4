//! Configuration loading and typed config structures for the Versus simulation.
//!
//! The canonical configuration lives in `versus-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every field has a default, so an empty document is a valid configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use versus_agents::{AgentConfig, AgentError};
use versus_types::{Faction, GridBounds, GridCoord, Priority};
use versus_world::{GridConfig, WorldError};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The grid section is malformed.
    #[error("invalid world config: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The agent tunables are malformed.
    #[error("invalid agent config: {source}")]
    Agents {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },

    /// Some other field is out of range.
    #[error("invalid config: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `versus-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World name, seed, and grid layout.
    #[serde(default)]
    pub world: WorldConfig,

    /// Step size and run bounds.
    #[serde(default)]
    pub time: TimeConfig,

    /// Tunables shared by every agent.
    #[serde(default)]
    pub agents: AgentConfig,

    /// Repellent device settings.
    #[serde(default)]
    pub devices: DeviceConfig,

    /// Agents to spawn at simulation start.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Director priorities applied before the first tick.
    #[serde(default)]
    pub priorities: Vec<PriorityConfig>,

    /// Intruders present from the start.
    #[serde(default)]
    pub intruders: Vec<IntruderConfig>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or one of the
    /// validation variants if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or one
    /// of the validation variants if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Run every fail-fast check.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.grid.validate()?;
        self.agents.validate()?;
        self.time.validate()?;
        self.devices.validate()?;

        let bounds = GridBounds::new(self.world.grid.width, self.world.grid.depth);
        for group in &self.population.spawns {
            require_in_bounds(bounds, group.coord(), "population")?;
            if group.faction == Faction::Neutral {
                return Err(ConfigError::Invalid {
                    reason: format!("population at {} cannot be neutral", group.coord()),
                });
            }
        }
        for entry in &self.priorities {
            require_in_bounds(bounds, entry.coord(), "priorities")?;
        }
        for intruder in &self.intruders {
            require_in_bounds(bounds, intruder.coord(), "intruders")?;
            if !(intruder.health.is_finite() && intruder.health > 0.0) {
                return Err(ConfigError::Invalid {
                    reason: format!(
                        "intruder at {} must have positive health (got {})",
                        intruder.coord(),
                        intruder.health
                    ),
                });
            }
        }
        Ok(())
    }
}

fn require_in_bounds(bounds: GridBounds, coord: GridCoord, section: &str) -> Result<(), ConfigError> {
    if bounds.contains(coord) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!(
                "{section}: block {coord} is outside the {}x{} grid",
                bounds.width, bounds.depth
            ),
        })
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Grid layout and influence parameters.
    #[serde(flatten)]
    pub grid: GridConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            grid: GridConfig::default(),
        }
    }
}

/// Step size and run bounds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeConfig {
    /// Simulated seconds per tick.
    #[serde(default = "default_delta_time")]
    pub delta_time: f32,

    /// Real-time milliseconds to wait between ticks (0 runs flat out).
    #[serde(default)]
    pub tick_interval_ms: u64,

    /// Number of ticks after which the run stops.
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            delta_time: default_delta_time(),
            tick_interval_ms: 0,
            max_ticks: default_max_ticks(),
        }
    }
}

impl TimeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.delta_time.is_finite() && self.delta_time > 0.0) {
            return Err(ConfigError::Invalid {
                reason: format!("time.delta_time must be positive (got {})", self.delta_time),
            });
        }
        if self.max_ticks == 0 {
            return Err(ConfigError::Invalid {
                reason: String::from("time.max_ticks must be at least 1"),
            });
        }
        Ok(())
    }
}

/// Repellent device settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceConfig {
    /// Repellent needed to place one device.
    #[serde(default = "default_device_cost")]
    pub cost: f32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            cost: default_device_cost(),
        }
    }
}

impl DeviceConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err(ConfigError::Invalid {
                reason: format!("devices.cost must be non-negative (got {})", self.cost),
            });
        }
        Ok(())
    }
}

/// Starting population.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PopulationConfig {
    /// Spawn groups, one per block and faction.
    #[serde(default = "default_spawns")]
    pub spawns: Vec<SpawnGroup>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            spawns: default_spawns(),
        }
    }
}

impl PopulationConfig {
    /// Total agents across every group.
    pub fn total(&self) -> u64 {
        self.spawns
            .iter()
            .fold(0_u64, |sum, group| sum.saturating_add(u64::from(group.count)))
    }
}

/// A number of agents of one faction spawned in one block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SpawnGroup {
    /// Block column.
    pub x: i32,
    /// Block row.
    pub y: i32,
    /// Cat or dog.
    pub faction: Faction,
    /// How many agents.
    pub count: u32,
}

impl SpawnGroup {
    /// The home block of this group.
    pub const fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }
}

/// A director priority for one block and faction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriorityConfig {
    /// Block column.
    pub x: i32,
    /// Block row.
    pub y: i32,
    /// Whose priority this is.
    pub faction: Faction,
    /// The priority to set.
    pub priority: Priority,
}

impl PriorityConfig {
    /// The block this entry applies to.
    pub const fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }
}

/// An intruder standing in a block from the start.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IntruderConfig {
    /// Block column.
    pub x: i32,
    /// Block row.
    pub y: i32,
    /// Faction of the intruder. Neutral intruders are hostile to everyone.
    #[serde(default = "default_intruder_faction")]
    pub faction: Faction,
    /// Hit points before the intruder is driven off.
    #[serde(default = "default_intruder_health")]
    pub health: f32,
}

impl IntruderConfig {
    /// The block the intruder stands in.
    pub const fn coord(&self) -> GridCoord {
        GridCoord::new(self.x, self.y)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit log lines as JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,

    /// Also write every notification to this file, one JSON object per line.
    #[serde(default)]
    pub events_path: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            events_path: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    String::from("Versus")
}

const fn default_seed() -> u64 {
    42
}

const fn default_delta_time() -> f32 {
    0.1
}

const fn default_max_ticks() -> u64 {
    600
}

const fn default_device_cost() -> f32 {
    10.0
}

fn default_spawns() -> Vec<SpawnGroup> {
    vec![
        SpawnGroup {
            x: 0,
            y: 0,
            faction: Faction::Cat,
            count: 5,
        },
        SpawnGroup {
            x: 4,
            y: 4,
            faction: Faction::Dog,
            count: 5,
        },
    ]
}

const fn default_intruder_faction() -> Faction {
    Faction::Neutral
}

const fn default_intruder_health() -> f32 {
    50.0
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.world.grid.width, 5);
        assert_eq!(config.time.max_ticks, 600);
        assert_eq!(config.population.total(), 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parses_every_section() {
        let yaml = r"
world:
  name: Harbour
  seed: 7
  width: 6
  depth: 4
  block_width: 12.5
  members_for_dominance: 3
time:
  delta_time: 0.05
  max_ticks: 20
agents:
  damage: 3.0
  gather_rate: { min: 1.0, max: 1.5 }
devices:
  cost: 2.5
population:
  spawns:
    - { x: 1, y: 1, faction: cat, count: 2 }
priorities:
  - { x: 5, y: 3, faction: dog, priority: high }
intruders:
  - { x: 2, y: 2, faction: dog, health: 10.0 }
  - { x: 0, y: 3 }
logging:
  level: debug
  json: true
  events_path: events.jsonl
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Harbour");
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.world.grid.width, 6);
        assert_eq!(config.world.grid.depth, 4);
        assert!((config.world.grid.block_width - 12.5).abs() < f32::EPSILON);
        assert!((config.world.grid.block_depth - 10.0).abs() < f32::EPSILON);
        assert_eq!(config.world.grid.members_for_dominance, 3);
        assert!((config.time.delta_time - 0.05).abs() < f32::EPSILON);
        assert!((config.agents.damage - 3.0).abs() < f32::EPSILON);
        assert!((config.devices.cost - 2.5).abs() < f32::EPSILON);
        assert_eq!(config.population.total(), 2);
        assert_eq!(config.priorities.first().unwrap().priority, Priority::High);
        assert_eq!(config.intruders.len(), 2);
        assert_eq!(config.intruders.get(1).unwrap().faction, Faction::Neutral);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
        assert_eq!(
            config.logging.events_path.as_deref(),
            Some(Path::new("events.jsonl"))
        );
    }

    #[test]
    fn rejects_zero_dominance() {
        let result = SimulationConfig::parse("world: { members_for_dominance: 0 }");
        assert!(matches!(result, Err(ConfigError::World { .. })));
    }

    #[test]
    fn rejects_bad_time_step() {
        let result = SimulationConfig::parse("time: { delta_time: 0.0 }");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn rejects_inverted_agent_range() {
        let result = SimulationConfig::parse("agents: { speed: { min: 3.0, max: 1.0 } }");
        assert!(matches!(result, Err(ConfigError::Agents { .. })));
    }

    #[test]
    fn rejects_out_of_bounds_entries() {
        let yaml = "priorities:\n  - { x: 9, y: 0, faction: cat, priority: low }\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_neutral_population() {
        let yaml = "population:\n  spawns:\n    - { x: 0, y: 0, faction: neutral, count: 1 }\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }
}
