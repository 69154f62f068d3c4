//! Animal agents and their behaviour for the Versus simulation.
//!
//! Each cat or dog is an [`Agent`] driven one tick at a time by
//! [`tick_agent`]. Agents read the city through a
//! [`BlockRegistry`](versus_world::BlockRegistry) and talk to the rest of
//! the world through small collaborator traits.
//!
//! # Modules
//!
//! - [`agent`] -- The [`Agent`] itself, spawning, the damage hook and
//!   relocation between blocks.
//! - [`behavior`] -- The per-tick state machine.
//! - [`config`] -- [`AgentConfig`] tunables and per-agent [`AgentTuning`].
//! - [`devices`] -- The [`DeviceFactory`] contract.
//! - [`error`] -- Error types for spawning and relocation.
//! - [`health`] -- The recharging [`Health`] component.
//! - [`movement`] -- Stepping, turning and arrival.
//! - [`targets`] -- The [`AttackTargets`] contract.

pub mod agent;
pub mod behavior;
pub mod config;
pub mod devices;
pub mod error;
pub mod health;
pub mod movement;
pub mod targets;

// Re-export primary types at crate root.
pub use agent::{Agent, AgentSpawn};
pub use behavior::{AgentTickOutcome, IDLE_REROLL_CHANCE, TickContext, tick_agent};
pub use config::{AgentConfig, AgentTuning, TunableRange};
pub use devices::DeviceFactory;
pub use error::AgentError;
pub use health::{Health, HealthChange, SAFE_HEALTH_FRACTION};
pub use targets::AttackTargets;
