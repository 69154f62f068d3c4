//! Faction influence: turning resident counts into a territory balance.
//!
//! A block's influence is a single number in `[0, 1]`. `0.5` means the
//! populations are balanced, `0` is total cat control and `1` total dog
//! control. The value ramps linearly with the population margin and
//! saturates once one side leads by `members_for_dominance` residents.
//!
//! Ownership is derived with two independent thresholds (see
//! [`Faction::from_influence`]), leaving a neutral zone between them.

use core::cmp::Ordering;

use versus_types::Faction;

use crate::error::WorldError;

/// Parameters of the linear influence ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfluenceModel {
    members_for_dominance: u32,
}

impl InfluenceModel {
    /// Default population margin needed for full control of a block.
    pub const DEFAULT_MEMBERS_FOR_DOMINANCE: u32 = 5;

    /// Create a model requiring a margin of `members_for_dominance`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDominance`] if `members_for_dominance`
    /// is zero.
    pub const fn new(members_for_dominance: u32) -> Result<Self, WorldError> {
        if members_for_dominance == 0 {
            return Err(WorldError::InvalidDominance {
                members: members_for_dominance,
            });
        }
        Ok(Self {
            members_for_dominance,
        })
    }

    /// The margin needed for full control.
    pub const fn members_for_dominance(&self) -> u32 {
        self.members_for_dominance
    }

    /// Normalized influence for the given populations.
    ///
    /// Returns exactly `0.5` when the counts are equal.
    pub fn normalized(&self, dogs: usize, cats: usize) -> f64 {
        let margin = count_to_f64(dogs.abs_diff(cats)) / f64::from(self.members_for_dominance);
        match dogs.cmp(&cats) {
            Ordering::Equal => 0.5,
            Ordering::Greater => (0.5 + margin / 2.0).clamp(0.0, 1.0),
            Ordering::Less => (0.5 - margin / 2.0).clamp(0.0, 1.0),
        }
    }

    /// The faction controlling a block with the given populations.
    pub fn controlling_faction(&self, dogs: usize, cats: usize) -> Faction {
        Faction::from_influence(self.normalized(dogs, cats))
    }
}

impl Default for InfluenceModel {
    fn default() -> Self {
        Self {
            members_for_dominance: Self::DEFAULT_MEMBERS_FOR_DOMINANCE,
        }
    }
}

/// A transition of a block's derived owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipChange {
    /// Owner before the transition.
    pub previous: Faction,
    /// Owner after the transition.
    pub current: Faction,
}

/// Remembers the last observed owner so only edges are reported.
///
/// The cached value is never a source of truth for ownership; it exists
/// solely to detect transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnershipTracker {
    last_known: Faction,
}

impl OwnershipTracker {
    /// Start tracking from a known owner.
    pub const fn new(initial: Faction) -> Self {
        Self {
            last_known: initial,
        }
    }

    /// The last observed owner.
    pub const fn last_known(&self) -> Faction {
        self.last_known
    }

    /// Record a fresh observation; returns the edge if the owner changed.
    pub fn observe(&mut self, current: Faction) -> Option<OwnershipChange> {
        if current == self.last_known {
            return None;
        }
        let change = OwnershipChange {
            previous: self.last_known,
            current,
        };
        self.last_known = current;
        Some(change)
    }
}

impl Default for OwnershipTracker {
    fn default() -> Self {
        Self::new(Faction::Neutral)
    }
}

fn count_to_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
