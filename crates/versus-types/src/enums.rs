//! Enumeration types for the Versus simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Normalized influence at or below which the cats control a block.
pub const CAT_CONTROL_THRESHOLD: f64 = 0.1;

/// Normalized influence at or above which the dogs control a block.
pub const DOG_CONTROL_THRESHOLD: f64 = 0.9;

// ---------------------------------------------------------------------------
// Faction
// ---------------------------------------------------------------------------

/// One of the two competing animal populations, or neither.
///
/// Agents always belong to [`Faction::Cat`] or [`Faction::Dog`]. A block's
/// faction is derived from its residents and may be [`Faction::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    /// The cats. Low influence values favour this faction.
    Cat,
    /// The dogs. High influence values favour this faction.
    Dog,
    /// Contested territory, controlled by nobody.
    Neutral,
}

impl Faction {
    /// Derive the controlling faction from a normalized influence value.
    ///
    /// The two thresholds are independent, leaving a neutral dead zone
    /// between them.
    pub fn from_influence(influence: f64) -> Self {
        if influence <= CAT_CONTROL_THRESHOLD {
            Self::Cat
        } else if influence >= DOG_CONTROL_THRESHOLD {
            Self::Dog
        } else {
            Self::Neutral
        }
    }

    /// The faction this one fights against. Neutral has no opponent.
    pub const fn opponent(self) -> Option<Self> {
        match self {
            Self::Cat => Some(Self::Dog),
            Self::Dog => Some(Self::Cat),
            Self::Neutral => None,
        }
    }

    /// Whether a member of `self` treats a member of `other` as hostile.
    ///
    /// Neutral actors are hostile to both animal factions.
    pub fn is_hostile_to(self, other: Self) -> bool {
        match (self, other) {
            (Self::Neutral, Self::Neutral) => false,
            (Self::Neutral, _) | (_, Self::Neutral) => true,
            (a, b) => a != b,
        }
    }

    /// Lowercase plural used in notifications ("cats", "dogs").
    pub const fn plural(self) -> &'static str {
        match self {
            Self::Cat => "cats",
            Self::Dog => "dogs",
            Self::Neutral => "neutrals",
        }
    }
}

impl core::fmt::Display for Faction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Cat => write!(f, "Cat"),
            Self::Dog => write!(f, "Dog"),
            Self::Neutral => write!(f, "Neutral"),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Importance a faction's director places on holding a block.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Agents living here may leave to expand elsewhere.
    Low,
    /// The default for every block.
    #[default]
    Medium,
    /// Target for expansion by nearby agents.
    High,
}

// ---------------------------------------------------------------------------
// AgentState
// ---------------------------------------------------------------------------

/// The active state of an agent's behaviour state machine.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum AgentState {
    /// Waiting for the next decision roll.
    #[default]
    Idle,
    /// Wandering the home block collecting repellent.
    GatherResource,
    /// Walking to a spot to plant a repellent device.
    PlaceDevice,
    /// Running from damage at double speed.
    Flee,
    /// Stationary until health recovers.
    Hide,
    /// Chasing an intruder out of the home block.
    Attack,
    /// Travelling to a high-priority block to settle there.
    Expand,
}

impl core::fmt::Display for AgentState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::GatherResource => "gather_resource",
            Self::PlaceDevice => "place_device",
            Self::Flee => "flee",
            Self::Hide => "hide",
            Self::Attack => "attack",
            Self::Expand => "expand",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Importance
// ---------------------------------------------------------------------------

/// How noteworthy a notification is for observers.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    /// Routine chatter (device placements).
    Low,
    /// Default tier.
    #[default]
    Medium,
    /// Territory changing hands.
    High,
}
