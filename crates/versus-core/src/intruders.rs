//! Reference intruder tracker.
//!
//! Intruders are anything standing in a block that its residents may want
//! to drive off: players, stray animals, or agents of the other faction
//! controlled elsewhere. The tracker keeps them in a map keyed by
//! [`IntruderId`], answers the per-block sensor query, and absorbs hits
//! from attacking agents. An intruder whose health runs out is removed and
//! every handle to it goes stale.

use std::collections::BTreeMap;

use tracing::info;
use versus_agents::AttackTargets;
use versus_types::{Faction, GridCoord, IntruderId, Vec3};
use versus_world::{IntruderSensor, IntruderSighting};

/// One tracked intruder.
#[derive(Debug, Clone, PartialEq)]
pub struct Intruder {
    /// Stable handle.
    pub id: IntruderId,
    /// Whose side it is on.
    pub faction: Faction,
    /// Where it stands.
    pub position: Vec3,
    /// The block it stands in.
    pub block: GridCoord,
    /// Hit points left.
    pub health: f32,
}

/// Every intruder currently in the city.
#[derive(Debug, Clone, Default)]
pub struct IntruderTracker {
    intruders: BTreeMap<IntruderId, Intruder>,
    driven_off: u64,
}

impl IntruderTracker {
    /// An empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an intruder standing at `position` inside `block`.
    pub fn insert(
        &mut self,
        faction: Faction,
        block: GridCoord,
        position: Vec3,
        health: f32,
    ) -> IntruderId {
        let id = IntruderId::new();
        self.intruders.insert(
            id,
            Intruder {
                id,
                faction,
                position,
                block,
                health,
            },
        );
        info!(intruder = %id, faction = %faction, block = %block, health, "Intruder entered the city");
        id
    }

    /// Look up an intruder.
    pub fn get(&self, id: IntruderId) -> Option<&Intruder> {
        self.intruders.get(&id)
    }

    /// Take an intruder out of the city without a fight.
    pub fn remove(&mut self, id: IntruderId) -> Option<Intruder> {
        self.intruders.remove(&id)
    }

    /// Number of intruders still present.
    pub fn len(&self) -> usize {
        self.intruders.len()
    }

    /// Whether the city is free of intruders.
    pub fn is_empty(&self) -> bool {
        self.intruders.is_empty()
    }

    /// Intruders removed by attacks so far.
    pub const fn driven_off(&self) -> u64 {
        self.driven_off
    }
}

impl IntruderSensor for IntruderTracker {
    fn sightings_in(&self, block: GridCoord) -> Vec<IntruderSighting> {
        self.intruders
            .values()
            .filter(|intruder| intruder.block == block)
            .map(|intruder| IntruderSighting {
                id: intruder.id,
                faction: intruder.faction,
                position: intruder.position,
            })
            .collect()
    }
}

impl AttackTargets for IntruderTracker {
    fn position_of(&self, target: IntruderId) -> Option<Vec3> {
        self.intruders.get(&target).map(|intruder| intruder.position)
    }

    fn apply_damage(&mut self, target: IntruderId, amount: f32) -> bool {
        let Some(intruder) = self.intruders.get_mut(&target) else {
            return false;
        };
        intruder.health -= amount.max(0.0);
        if intruder.health > 0.0 {
            return true;
        }
        if let Some(gone) = self.intruders.remove(&target) {
            self.driven_off = self.driven_off.saturating_add(1);
            info!(intruder = %gone.id, block = %gone.block, "Intruder driven off");
        }
        false
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn sightings_are_scoped_to_the_block() {
        let mut tracker = IntruderTracker::new();
        let here = GridCoord::new(1, 1);
        let id = tracker.insert(Faction::Dog, here, Vec3::new(15.0, 0.0, 15.0), 10.0);
        let _ = tracker.insert(Faction::Cat, GridCoord::new(2, 1), Vec3::ZERO, 10.0);

        let seen = tracker.sightings_in(here);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen.first().unwrap().id, id);
        assert!(tracker.sightings_in(GridCoord::new(0, 0)).is_empty());
    }

    #[test]
    fn lethal_damage_removes_the_intruder() {
        let mut tracker = IntruderTracker::new();
        let id = tracker.insert(Faction::Neutral, GridCoord::new(0, 0), Vec3::ZERO, 10.0);

        assert!(tracker.apply_damage(id, 7.5));
        assert!((tracker.get(id).unwrap().health - 2.5).abs() < f32::EPSILON);
        assert!(!tracker.apply_damage(id, 7.5));
        assert!(tracker.position_of(id).is_none());
        assert!(tracker.is_empty());
        assert_eq!(tracker.driven_off(), 1);
    }

    #[test]
    fn unknown_targets_are_not_standing() {
        let mut tracker = IntruderTracker::new();
        assert!(!tracker.apply_damage(IntruderId::new(), 1.0));
        assert_eq!(tracker.driven_off(), 0);
    }
}
