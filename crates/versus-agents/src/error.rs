//! Error types for the versus-agents crate.
//!
//! Everything that can go wrong while spawning or moving an agent is a
//! typed error; behaviour ticks themselves never fail and report death
//! through their outcome instead.

use versus_types::AgentId;
use versus_world::WorldError;

/// Errors that can occur while creating or relocating agents.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Agents must belong to the cats or the dogs.
    #[error("agent {agent} cannot be spawned without a faction")]
    InvalidFaction {
        /// The rejected agent.
        agent: AgentId,
    },

    /// Agent tunables are malformed.
    #[error("invalid agent configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// The grid refused a residency change.
    #[error("world error: {0}")]
    World(#[from] WorldError),
}
