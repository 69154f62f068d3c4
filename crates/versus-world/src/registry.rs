//! The grid lookup contract agents search through.

use versus_types::{Faction, GridBounds, GridCoord, Priority};

use crate::block::Block;

/// Read-only access to the city's blocks.
///
/// Agents never own blocks; they hold a [`GridCoord`] key and resolve it
/// through a registry each time they need block data.
pub trait BlockRegistry {
    /// Number of block columns.
    fn width(&self) -> i32;

    /// Number of block rows.
    fn depth(&self) -> i32;

    /// The block at `coord`, if any.
    fn block_at(&self, coord: GridCoord) -> Option<&Block>;

    /// Grid dimensions as a bounds value.
    fn bounds(&self) -> GridBounds {
        GridBounds::new(self.width(), self.depth())
    }

    /// Priority a faction's director has set on `coord`.
    ///
    /// Missing blocks and [`Faction::Neutral`] read as the default
    /// [`Priority::Medium`].
    fn priority_of(&self, coord: GridCoord, faction: Faction) -> Priority {
        self.block_at(coord)
            .map_or_else(Priority::default, |block| block.priority(faction))
    }
}
