//! The animal agent and the hooks the outside world drives it through.
//!
//! An [`Agent`] refers to its home block by [`GridCoord`] only. The block's
//! resident set and the agent's `home` are kept in step by
//! [`Agent::relocate`], the single place an agent changes blocks.

use rand::Rng;
use tracing::{debug, info};
use versus_types::{
    AgentActionEvent, AgentId, AgentState, Faction, GridCoord, Importance, IntruderId,
    NotificationSink, Vec3,
};
use versus_world::{BlockRegistry, CityGrid, publish_best_effort};

use crate::config::AgentTuning;
use crate::error::AgentError;
use crate::health::{Health, HealthChange};
use crate::movement::{self, Step};

/// Everything needed to bring a new agent into the world.
#[derive(Debug, Clone)]
pub struct AgentSpawn {
    /// Display name used in notifications.
    pub name: String,
    /// Cat or dog.
    pub faction: Faction,
    /// First home block.
    pub home: GridCoord,
    /// Starting position.
    pub position: Vec3,
}

/// One cat or dog.
#[derive(Debug, Clone)]
pub struct Agent {
    id: AgentId,
    name: String,
    faction: Faction,
    home: GridCoord,
    expand_to: Option<GridCoord>,
    pub(crate) state: AgentState,
    pub(crate) health: Health,
    /// Repellent gathered and not yet spent. Never negative.
    pub(crate) resource: f32,
    pub(crate) position: Vec3,
    pub(crate) facing: Vec3,
    pub(crate) move_target: Vec3,
    pub(crate) attack_target: Option<IntruderId>,
    pub(crate) next_attack_at: f64,
    tuning: AgentTuning,
}

impl Agent {
    /// Create an agent and register it as a resident of its home block.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidFaction`] for a [`Faction::Neutral`]
    /// agent, or [`AgentError::World`] if the home block does not exist.
    pub fn spawn(
        spawn: AgentSpawn,
        tuning: AgentTuning,
        grid: &mut CityGrid,
        sink: &mut dyn NotificationSink,
    ) -> Result<Self, AgentError> {
        let id = AgentId::new();
        if spawn.faction == Faction::Neutral {
            return Err(AgentError::InvalidFaction { agent: id });
        }
        grid.place_resident(id, spawn.faction, spawn.home, sink)?;
        info!(agent = %id, name = %spawn.name, faction = %spawn.faction, home = %spawn.home, "Agent spawned");

        Ok(Self {
            id,
            name: spawn.name,
            faction: spawn.faction,
            home: spawn.home,
            expand_to: None,
            state: AgentState::Idle,
            health: Health::new(
                tuning.max_health,
                tuning.recharge_rate,
                tuning.recharge_delay_secs,
            ),
            resource: 0.0,
            position: spawn.position,
            facing: Vec3::FORWARD,
            move_target: spawn.position,
            attack_target: None,
            next_attack_at: 0.0,
            tuning,
        })
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    /// Unique identifier.
    pub const fn id(&self) -> AgentId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cat or dog, fixed for life.
    pub const fn faction(&self) -> Faction {
        self.faction
    }

    /// The block this agent lives in.
    pub const fn home(&self) -> GridCoord {
        self.home
    }

    /// The block this agent is trying to move to, if any.
    pub const fn expand_to(&self) -> Option<GridCoord> {
        self.expand_to
    }

    /// Active behaviour state.
    pub const fn state(&self) -> AgentState {
        self.state
    }

    /// Health component.
    pub const fn health(&self) -> &Health {
        &self.health
    }

    /// Mutable health, for the external health subsystem.
    ///
    /// Changes made here bypass the damage hook; use
    /// [`Agent::take_damage`] for hits.
    pub const fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }

    /// Repellent currently held.
    pub const fn resource(&self) -> f32 {
        self.resource
    }

    /// World position.
    pub const fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit facing direction.
    pub const fn facing(&self) -> Vec3 {
        self.facing
    }

    /// Where the agent is walking to.
    pub const fn move_target(&self) -> Vec3 {
        self.move_target
    }

    /// The intruder being chased, if any.
    pub const fn attack_target(&self) -> Option<IntruderId> {
        self.attack_target
    }

    /// Tunables drawn at spawn.
    pub const fn tuning(&self) -> &AgentTuning {
        &self.tuning
    }

    // -------------------------------------------------------------------
    // External hooks
    // -------------------------------------------------------------------

    /// Order this agent to chase `target`. Pre-empts any state.
    pub fn engage(&mut self, target: IntruderId) {
        self.attack_target = Some(target);
        self.transition(AgentState::Attack);
    }

    /// Apply a hit of `amount` from `source`.
    ///
    /// A hit the agent survives immediately forces Flee toward a fresh
    /// wander point and announces it. A lethal hit only marks health as
    /// not-alive; the next behaviour tick handles it.
    pub fn take_damage(
        &mut self,
        amount: f32,
        source: &str,
        now: f64,
        registry: &dyn BlockRegistry,
        rng: &mut impl Rng,
        sink: &mut dyn NotificationSink,
    ) -> HealthChange {
        let change = self.health.apply_damage(amount, now);
        if change.is_survivable_hit() {
            self.transition(AgentState::Flee);
            self.move_target = self.wander_point(registry, rng);
            self.announce(
                format!(
                    "{self} has been hit by {:.1} units of repellent from {source}. They are fleeing from the source but not yet giving up this block.",
                    change.from - change.to
                ),
                Importance::Medium,
                sink,
            );
        }
        change
    }

    /// Make `to` this agent's home block.
    ///
    /// Refused (returns `Ok(false)`) while the agent is attacking, since a
    /// chase across a block boundary is not a move. Moving to the current
    /// home is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the grid rejects the move; the
    /// agent's home is unchanged in that case.
    pub fn relocate(
        &mut self,
        grid: &mut CityGrid,
        to: GridCoord,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, AgentError> {
        if to == self.home {
            return Ok(false);
        }
        if self.state == AgentState::Attack {
            debug!(agent = %self.id, from = %self.home, to = %to, "Relocation refused while attacking");
            return Ok(false);
        }
        grid.relocate(self.id, self.faction, self.home, to, sink)?;
        self.home = to;
        if self.expand_to == Some(to) {
            self.expand_to = None;
        }
        Ok(true)
    }

    /// Remove this agent from its home block after it has left the city.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::World`] if the home block does not exist.
    pub fn retire(
        &self,
        grid: &mut CityGrid,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, AgentError> {
        Ok(grid.evict(self.id, self.faction, self.home, sink)?)
    }

    // -------------------------------------------------------------------
    // Internals shared with the behaviour tick
    // -------------------------------------------------------------------

    pub(crate) fn transition(&mut self, next: AgentState) {
        if self.state != next {
            debug!(agent = %self.id, from = %self.state, to = %next, "State transition");
            self.state = next;
        }
    }

    pub(crate) const fn set_expand_to(&mut self, block: Option<GridCoord>) {
        self.expand_to = block;
    }

    /// A random point in the home block, or the current target if the home
    /// block cannot be resolved.
    pub(crate) fn wander_point(&self, registry: &dyn BlockRegistry, rng: &mut impl Rng) -> Vec3 {
        registry
            .block_at(self.home)
            .map_or(self.move_target, |block| block.random_point(rng))
    }

    /// Advance toward the move target at `multiplier` times base speed.
    pub(crate) fn advance(&mut self, multiplier: f32, delta: f32) {
        let Step { position, facing } = movement::step_towards(
            self.position,
            self.facing,
            self.move_target,
            self.tuning.speed * multiplier * delta,
            self.tuning.rotation_speed * delta,
        );
        self.position = position;
        self.facing = facing;
    }

    pub(crate) fn reached_target(&self) -> bool {
        movement::has_reached(self.position, self.move_target)
    }

    pub(crate) fn announce(
        &self,
        message: String,
        importance: Importance,
        sink: &mut dyn NotificationSink,
    ) {
        publish_best_effort(sink, AgentActionEvent::new(self.id, message, importance));
    }
}

impl core::fmt::Display for Agent {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}
