//! The two block searches agents rely on.
//!
//! Both reuse [`ring_search`] unchanged and differ only in their predicate.

use versus_types::{Faction, GridCoord, Priority};

use crate::registry::BlockRegistry;
use crate::ring_search::{RingMatch, ring_search};

/// Ring bound for the survival search: rings 1 through 6 are examined.
pub const FRIENDLY_SEARCH_MAX_DISTANCE: i32 = 7;

/// Ring bound agents use when looking for a block to expand into: rings 1
/// and 2 are examined.
pub const EXPANSION_SEARCH_MAX_DISTANCE: i32 = 3;

/// The nearest block (in ring order) currently controlled by `faction`.
///
/// Control is read live from each block's residents, not from the cached
/// owner of its last refresh.
pub fn nearest_friendly_block(
    registry: &(impl BlockRegistry + ?Sized),
    origin: GridCoord,
    faction: Faction,
) -> Option<RingMatch> {
    ring_search(
        origin,
        registry.bounds(),
        FRIENDLY_SEARCH_MAX_DISTANCE,
        |coord| {
            registry
                .block_at(coord)
                .is_some_and(|block| block.controlling_faction() == faction)
        },
    )
}

/// The nearest block (in ring order) that `faction`'s director has marked
/// [`Priority::High`], searching rings `1..max_distance`.
pub fn nearest_high_priority_block(
    registry: &(impl BlockRegistry + ?Sized),
    origin: GridCoord,
    faction: Faction,
    max_distance: i32,
) -> Option<RingMatch> {
    ring_search(origin, registry.bounds(), max_distance, |coord| {
        registry.priority_of(coord, faction) == Priority::High
    })
}
