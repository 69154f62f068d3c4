//! The city grid: an arena of blocks keyed by coordinate.
//!
//! [`CityGrid`] owns every [`Block`] and is the sole entry point for
//! moving agents between them. All resident mutations take `&mut self`,
//! so an agent can never be half-way between two blocks' resident sets.

use serde::{Deserialize, Serialize};
use tracing::info;
use versus_types::{AgentId, Faction, GridBounds, GridCoord, NotificationSink, Priority, Vec3};

use crate::block::{Block, BlockExtent, BlockStatus};
use crate::error::WorldError;
use crate::influence::InfluenceModel;
use crate::registry::BlockRegistry;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Layout and influence parameters for building a [`CityGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of block columns.
    #[serde(default = "default_grid_size")]
    pub width: i32,
    /// Number of block rows.
    #[serde(default = "default_grid_size")]
    pub depth: i32,
    /// Block size along world X.
    #[serde(default = "default_block_size")]
    pub block_width: f32,
    /// Block size along world Z.
    #[serde(default = "default_block_size")]
    pub block_depth: f32,
    /// Population margin needed for full control of a block.
    #[serde(default = "default_members_for_dominance")]
    pub members_for_dominance: u32,
    /// Seconds between periodic influence refreshes.
    #[serde(default = "default_influence_refresh_secs")]
    pub influence_refresh_secs: f64,
}

const fn default_grid_size() -> i32 {
    5
}

const fn default_block_size() -> f32 {
    10.0
}

const fn default_members_for_dominance() -> u32 {
    InfluenceModel::DEFAULT_MEMBERS_FOR_DOMINANCE
}

const fn default_influence_refresh_secs() -> f64 {
    1.0
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_size(),
            depth: default_grid_size(),
            block_width: default_block_size(),
            block_depth: default_block_size(),
            members_for_dominance: default_members_for_dominance(),
            influence_refresh_secs: default_influence_refresh_secs(),
        }
    }
}

impl GridConfig {
    /// Check every field, failing on the first malformed one.
    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width <= 0 || self.depth <= 0 {
            return Err(WorldError::InvalidConfig {
                reason: format!(
                    "grid must be at least 1x1 (got {}x{})",
                    self.width, self.depth
                ),
            });
        }
        if !(self.block_width.is_finite() && self.block_width > 0.0)
            || !(self.block_depth.is_finite() && self.block_depth > 0.0)
        {
            return Err(WorldError::InvalidConfig {
                reason: format!(
                    "block size must be positive (got {}x{})",
                    self.block_width, self.block_depth
                ),
            });
        }
        if !(self.influence_refresh_secs.is_finite() && self.influence_refresh_secs >= 0.0) {
            return Err(WorldError::InvalidConfig {
                reason: format!(
                    "influence_refresh_secs must be non-negative (got {})",
                    self.influence_refresh_secs
                ),
            });
        }
        InfluenceModel::new(self.members_for_dominance)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// Every block of the city, stored row-major.
#[derive(Debug, Clone)]
pub struct CityGrid {
    bounds: GridBounds,
    blocks: Vec<Block>,
}

impl CityGrid {
    /// Build a grid of empty blocks from `config`.
    ///
    /// Block `(x, y)` is centred at `((x + 0.5) * block_width, 0,
    /// (y + 0.5) * block_depth)`, so the city's minimum corner sits at the
    /// world origin.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidConfig`] or
    /// [`WorldError::InvalidDominance`] if `config` does not validate.
    pub fn new(config: &GridConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let influence = InfluenceModel::new(config.members_for_dominance)?;
        let bounds = GridBounds::new(config.width, config.depth);
        let extent = BlockExtent::new(config.block_width, config.block_depth);

        let mut blocks = Vec::with_capacity(bounds.cell_count());
        let mut center_z = config.block_depth / 2.0;
        for y in 0..config.depth {
            let mut center_x = config.block_width / 2.0;
            for x in 0..config.width {
                blocks.push(Block::new(
                    GridCoord::new(x, y),
                    Vec3::new(center_x, 0.0, center_z),
                    extent,
                    influence,
                    config.influence_refresh_secs,
                ));
                center_x += config.block_width;
            }
            center_z += config.block_depth;
        }

        Ok(Self { bounds, blocks })
    }

    /// Grid dimensions.
    pub const fn grid_bounds(&self) -> GridBounds {
        self.bounds
    }

    /// The block at `coord`.
    pub fn block(&self, coord: GridCoord) -> Option<&Block> {
        self.bounds
            .index_of(coord)
            .and_then(|index| self.blocks.get(index))
    }

    /// Mutable access to the block at `coord`.
    ///
    /// Residents cannot be changed through this handle; use
    /// [`CityGrid::relocate`] and friends.
    pub fn block_mut(&mut self, coord: GridCoord) -> Option<&mut Block> {
        self.bounds
            .index_of(coord)
            .and_then(|index| self.blocks.get_mut(index))
    }

    fn require_block_mut(&mut self, coord: GridCoord) -> Result<&mut Block, WorldError> {
        self.block_mut(coord).ok_or(WorldError::BlockNotFound(coord))
    }

    /// All blocks in row-major order.
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// All blocks in row-major order, mutably.
    pub fn blocks_mut(&mut self) -> impl Iterator<Item = &mut Block> {
        self.blocks.iter_mut()
    }

    /// The block whose footprint contains `position`.
    pub fn coord_at(&self, position: Vec3) -> Option<GridCoord> {
        self.blocks
            .iter()
            .find(|block| block.contains_point(position))
            .map(Block::coord)
    }

    /// Set a faction's priority on a block.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::BlockNotFound`] for a coordinate outside the grid.
    pub fn set_priority(
        &mut self,
        coord: GridCoord,
        faction: Faction,
        priority: Priority,
    ) -> Result<(), WorldError> {
        self.require_block_mut(coord)?.set_priority(faction, priority);
        Ok(())
    }

    // -------------------------------------------------------------------
    // Residency
    // -------------------------------------------------------------------

    /// Register a freshly spawned agent in its first home block.
    ///
    /// Returns whether the agent was newly added.
    pub fn place_resident(
        &mut self,
        agent: AgentId,
        faction: Faction,
        home: GridCoord,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, WorldError> {
        self.require_block_mut(home)?
            .add_resident(agent, faction, sink)
    }

    /// Move an agent's residency from `from` to `to`.
    ///
    /// Both blocks are checked before anything changes, so a failed call
    /// leaves the grid untouched. Emits one "moved out" and one "moved into"
    /// event.
    pub fn relocate(
        &mut self,
        agent: AgentId,
        faction: Faction,
        from: GridCoord,
        to: GridCoord,
        sink: &mut dyn NotificationSink,
    ) -> Result<(), WorldError> {
        if faction == Faction::Neutral {
            return Err(WorldError::NeutralResident(agent));
        }
        if self.block(to).is_none() {
            return Err(WorldError::BlockNotFound(to));
        }
        self.require_block_mut(from)?
            .remove_resident(agent, faction, sink)?;
        self.require_block_mut(to)?
            .add_resident(agent, faction, sink)?;
        info!(agent = %agent, faction = %faction, from = %from, to = %to, "Agent relocated");
        Ok(())
    }

    /// Remove a destroyed agent from its home block.
    ///
    /// Returns whether the agent was actually a resident.
    pub fn evict(
        &mut self,
        agent: AgentId,
        faction: Faction,
        home: GridCoord,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, WorldError> {
        self.require_block_mut(home)?
            .remove_resident(agent, faction, sink)
    }

    /// Residents of `faction` across the whole city.
    pub fn population(&self, faction: Faction) -> usize {
        self.blocks
            .iter()
            .map(|block| block.resident_count(faction))
            .sum()
    }

    /// Status snapshots for every block in row-major order.
    pub fn statuses(&self) -> Vec<BlockStatus> {
        self.blocks.iter().map(Block::status).collect()
    }
}

impl BlockRegistry for CityGrid {
    fn width(&self) -> i32 {
        self.bounds.width
    }

    fn depth(&self) -> i32 {
        self.bounds.depth
    }

    fn block_at(&self, coord: GridCoord) -> Option<&Block> {
        self.block(coord)
    }
}
