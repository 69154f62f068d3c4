//! Intruder sightings reported by an external detector.

use versus_types::{AgentId, Faction, GridCoord, IntruderId, Vec3};

/// An intruder observed inside a block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntruderSighting {
    /// Handle of the intruder. May go stale once the intruder is destroyed.
    pub id: IntruderId,
    /// Who the intruder fights for. A player-like actor is [`Faction::Neutral`].
    pub faction: Faction,
    /// Where it was seen.
    pub position: Vec3,
}

/// Reports which intruders are currently present in a block.
///
/// How presence is detected (trigger volumes, polling, a network feed) is up
/// to the implementor.
pub trait IntruderSensor {
    /// Intruders inside `block`, in detection order.
    fn sightings_in(&self, block: GridCoord) -> Vec<IntruderSighting>;
}

/// An instruction for a resident to attack an intruder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOrder {
    /// The resident that should switch to attacking.
    pub agent: AgentId,
    /// The intruder to chase.
    pub target: IntruderId,
}
