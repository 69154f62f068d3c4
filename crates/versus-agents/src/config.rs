//! Agent tunables and their per-agent resolution.
//!
//! [`AgentConfig`] is the shape read from the `agents` section of
//! `versus-config.yaml`. Some tunables are ranges; each agent draws its own
//! value once at spawn time via [`AgentTuning::resolve`] and keeps it for
//! life.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// An inclusive `[min, max]` range a tunable is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TunableRange {
    /// Smallest value that may be drawn.
    pub min: f32,
    /// Largest value that may be drawn.
    pub max: f32,
}

impl TunableRange {
    /// A range covering `[min, max]`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Draw a value. An inverted or non-finite range yields `min`.
    pub fn sample(self, rng: &mut impl Rng) -> f32 {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            rng.random_range(self.min..=self.max)
        } else {
            self.min
        }
    }

    fn validate(self, name: &str) -> Result<(), AgentError> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min < 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: format!("{name} must be finite and non-negative"),
            });
        }
        if self.min > self.max {
            return Err(AgentError::InvalidConfig {
                reason: format!("{name} range is inverted ({} > {})", self.min, self.max),
            });
        }
        Ok(())
    }
}

/// Tunables shared by every agent, as configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Walking speed in world units per second.
    #[serde(default = "default_speed")]
    pub speed: TunableRange,

    /// Turning rate in radians per second.
    #[serde(default = "default_rotation_speed")]
    pub rotation_speed: f32,

    /// How close an agent must be to an intruder to hit it.
    #[serde(default = "default_attack_distance")]
    pub attack_distance: f32,

    /// Minimum seconds between two hits.
    #[serde(default = "default_attack_cooldown_secs")]
    pub attack_cooldown_secs: f32,

    /// Damage dealt per hit.
    #[serde(default = "default_damage")]
    pub damage: f32,

    /// How far from the home block's centre an agent chases before giving up.
    #[serde(default = "default_chase_distance")]
    pub chase_distance: f32,

    /// Repellent gathered per second.
    #[serde(default = "default_gather_rate")]
    pub gather_rate: TunableRange,

    /// Jitter the gather rate every tick between `gather_rate_floor` and
    /// the agent's resolved rate.
    #[serde(default = "default_randomize_gather")]
    pub randomize_gather: bool,

    /// Lower bound of the per-tick gather jitter.
    #[serde(default = "default_gather_rate_floor")]
    pub gather_rate_floor: f32,

    /// Full health.
    #[serde(default = "default_max_health")]
    pub max_health: f32,

    /// Health regained per second once recharging.
    #[serde(default = "default_recharge_rate")]
    pub recharge_rate: f32,

    /// Seconds after the last hit before recharging starts.
    #[serde(default = "default_recharge_delay_secs")]
    pub recharge_delay_secs: f32,
}

const fn default_speed() -> TunableRange {
    TunableRange::fixed(2.0)
}

const fn default_rotation_speed() -> f32 {
    25.0
}

const fn default_attack_distance() -> f32 {
    0.1
}

const fn default_attack_cooldown_secs() -> f32 {
    1.2
}

const fn default_damage() -> f32 {
    7.5
}

const fn default_chase_distance() -> f32 {
    100.0
}

const fn default_gather_rate() -> TunableRange {
    TunableRange::new(0.5, 2.0)
}

const fn default_randomize_gather() -> bool {
    true
}

const fn default_gather_rate_floor() -> f32 {
    0.01
}

const fn default_max_health() -> f32 {
    100.0
}

const fn default_recharge_rate() -> f32 {
    2.0
}

const fn default_recharge_delay_secs() -> f32 {
    3.0
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            rotation_speed: default_rotation_speed(),
            attack_distance: default_attack_distance(),
            attack_cooldown_secs: default_attack_cooldown_secs(),
            damage: default_damage(),
            chase_distance: default_chase_distance(),
            gather_rate: default_gather_rate(),
            randomize_gather: default_randomize_gather(),
            gather_rate_floor: default_gather_rate_floor(),
            max_health: default_max_health(),
            recharge_rate: default_recharge_rate(),
            recharge_delay_secs: default_recharge_delay_secs(),
        }
    }
}

impl AgentConfig {
    /// Check every tunable.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<(), AgentError> {
        self.speed.validate("speed")?;
        self.gather_rate.validate("gather_rate")?;
        let scalars = [
            ("rotation_speed", self.rotation_speed),
            ("attack_distance", self.attack_distance),
            ("attack_cooldown_secs", self.attack_cooldown_secs),
            ("damage", self.damage),
            ("chase_distance", self.chase_distance),
            ("gather_rate_floor", self.gather_rate_floor),
            ("recharge_rate", self.recharge_rate),
            ("recharge_delay_secs", self.recharge_delay_secs),
        ];
        for (name, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(AgentError::InvalidConfig {
                    reason: format!("{name} must be finite and non-negative (got {value})"),
                });
            }
        }
        if !self.max_health.is_finite() || self.max_health <= 0.0 {
            return Err(AgentError::InvalidConfig {
                reason: format!("max_health must be positive (got {})", self.max_health),
            });
        }
        Ok(())
    }
}

/// One agent's tunables, fixed at spawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentTuning {
    /// Walking speed.
    pub speed: f32,
    /// Turning rate in radians per second.
    pub rotation_speed: f32,
    /// Hit range.
    pub attack_distance: f32,
    /// Seconds between hits.
    pub attack_cooldown_secs: f32,
    /// Damage per hit.
    pub damage: f32,
    /// Give-up distance from the home centre.
    pub chase_distance: f32,
    /// This agent's gather rate.
    pub gather_rate: f32,
    /// Whether the gather rate is jittered each tick.
    pub randomize_gather: bool,
    /// Lower bound of the jitter.
    pub gather_rate_floor: f32,
    /// Full health.
    pub max_health: f32,
    /// Health regained per second.
    pub recharge_rate: f32,
    /// Seconds after a hit before recharging.
    pub recharge_delay_secs: f32,
}

impl AgentTuning {
    /// Draw this agent's tunables from `config`.
    pub fn resolve(config: &AgentConfig, rng: &mut impl Rng) -> Self {
        Self {
            speed: config.speed.sample(rng),
            rotation_speed: config.rotation_speed,
            attack_distance: config.attack_distance,
            attack_cooldown_secs: config.attack_cooldown_secs,
            damage: config.damage,
            chase_distance: config.chase_distance,
            gather_rate: config.gather_rate.sample(rng),
            randomize_gather: config.randomize_gather,
            gather_rate_floor: config.gather_rate_floor,
            max_health: config.max_health,
            recharge_rate: config.recharge_rate,
            recharge_delay_secs: config.recharge_delay_secs,
        }
    }

    /// Squared hit range.
    pub const fn sqr_attack_distance(&self) -> f32 {
        self.attack_distance * self.attack_distance
    }

    /// Squared give-up distance.
    pub const fn sqr_chase_distance(&self) -> f32 {
        self.chase_distance * self.chase_distance
    }
}
