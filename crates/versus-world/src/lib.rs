//! City blocks, faction influence and grid search for the Versus simulation.
//!
//! This crate models the contested territory: a grid of blocks, each
//! holding cat and dog residents whose balance decides who controls it.
//! Agents live in `versus-agents` and only ever reach blocks through a
//! [`BlockRegistry`] and the [`CityGrid`] relocation methods.
//!
//! # Modules
//!
//! - [`block`] -- [`Block`] residency, periodic influence refresh,
//!   ownership-change notifications and intruder detection.
//! - [`city`] -- [`CityGrid`], the block arena and sole mutation path for
//!   residents, plus its [`GridConfig`].
//! - [`error`] -- Error types for grid construction and residency.
//! - [`influence`] -- The linear influence ramp and ownership edge tracking.
//! - [`intruder`] -- The [`IntruderSensor`] contract and attack orders.
//! - [`notify`] -- Best-effort event publishing.
//! - [`registry`] -- The [`BlockRegistry`] lookup contract.
//! - [`ring_search`] -- Outward ring-by-ring grid search.
//! - [`search`] -- Friendly-block and high-priority-block searches.

pub mod block;
pub mod city;
pub mod error;
pub mod influence;
pub mod intruder;
pub mod notify;
pub mod registry;
pub mod ring_search;
pub mod search;

// Re-export primary types at crate root.
pub use block::{Block, BlockExtent, BlockStatus};
pub use city::{CityGrid, GridConfig};
pub use error::WorldError;
pub use influence::{InfluenceModel, OwnershipChange, OwnershipTracker};
pub use intruder::{AttackOrder, IntruderSensor, IntruderSighting};
pub use notify::publish_best_effort;
pub use registry::BlockRegistry;
pub use ring_search::{RingMatch, ring_search};
pub use search::{
    EXPANSION_SEARCH_MAX_DISTANCE, FRIENDLY_SEARCH_MAX_DISTANCE, nearest_friendly_block,
    nearest_high_priority_block,
};
