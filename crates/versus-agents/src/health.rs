//! A recharging health component.
//!
//! Health falls when an agent is hit and slowly recharges once the agent
//! has gone `recharge_delay` seconds without taking damage. Reaching zero
//! marks the component not-alive; the behaviour tick decides what that
//! means for the agent.

/// Fraction of full health an agent needs to feel safe (leave Hide,
/// consider expanding).
pub const SAFE_HEALTH_FRACTION: f32 = 0.8;

/// A before/after reading of a health change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    /// Health before the change.
    pub from: f32,
    /// Health after the change.
    pub to: f32,
}

impl HealthChange {
    /// Whether the change was a loss that left the owner alive.
    pub const fn is_survivable_hit(&self) -> bool {
        self.to < self.from && self.to > 0.0
    }
}

/// Current and maximum health plus recharge state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
    alive: bool,
    recharge_rate: f32,
    recharge_delay: f32,
    last_damage_at: Option<f64>,
}

impl Health {
    /// Full health with the given recharge behaviour.
    pub const fn new(max: f32, recharge_rate: f32, recharge_delay: f32) -> Self {
        Self {
            current: max,
            max,
            alive: true,
            recharge_rate,
            recharge_delay,
            last_damage_at: None,
        }
    }

    /// Current health.
    pub const fn current(&self) -> f32 {
        self.current
    }

    /// Full health.
    pub const fn max(&self) -> f32 {
        self.max
    }

    /// Whether health has not yet run out.
    pub const fn is_alive(&self) -> bool {
        self.alive
    }

    /// Current health as a fraction of full.
    pub const fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Whether the owner is healthy enough to feel safe.
    pub const fn is_safe(&self) -> bool {
        self.current >= self.max * SAFE_HEALTH_FRACTION
    }

    /// Take `amount` damage at time `now`. Health never drops below zero.
    pub fn apply_damage(&mut self, amount: f32, now: f64) -> HealthChange {
        let from = self.current;
        self.current = (self.current - amount.max(0.0)).clamp(0.0, self.max);
        self.last_damage_at = Some(now);
        if self.current <= 0.0 {
            self.alive = false;
        }
        HealthChange {
            from,
            to: self.current,
        }
    }

    /// Set health directly, clamped to `[0, max]`.
    ///
    /// Does not revive a dead component; see [`Health::revive`].
    pub fn set_health(&mut self, value: f32) -> HealthChange {
        let from = self.current;
        self.current = value.clamp(0.0, self.max);
        if self.current <= 0.0 {
            self.alive = false;
        }
        HealthChange {
            from,
            to: self.current,
        }
    }

    /// Bring the component back to life at `value` health.
    pub fn revive(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
        self.alive = self.current > 0.0;
    }

    /// Regain health for a tick of `delta` seconds ending at `now`.
    pub fn recharge(&mut self, delta: f32, now: f64) {
        if !self.alive || self.current >= self.max {
            return;
        }
        let rested = self
            .last_damage_at
            .is_none_or(|hit| now - hit >= f64::from(self.recharge_delay));
        if rested {
            self.current = self
                .recharge_rate
                .mul_add(delta, self.current)
                .min(self.max);
        }
    }
}
