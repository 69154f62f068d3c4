//! Error types for the `versus-world` crate.

use versus_types::{AgentId, GridCoord};

/// Errors that can occur while building or mutating the city grid.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A block needs at least one member of margin to be dominated.
    #[error("members_for_dominance must be at least 1 (got {members})")]
    InvalidDominance {
        /// The rejected value.
        members: u32,
    },

    /// Grid or block configuration is malformed.
    #[error("invalid world configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },

    /// No block exists at the coordinate.
    #[error("no block at {0}")]
    BlockNotFound(GridCoord),

    /// Only cats and dogs can live in a block.
    #[error("agent {0} has no faction and cannot reside in a block")]
    NeutralResident(AgentId),
}
