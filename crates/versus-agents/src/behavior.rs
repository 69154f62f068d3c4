//! The per-tick behaviour state machine.
//!
//! [`tick_agent`] advances one agent by one tick. The order within a tick
//! is fixed:
//!
//! 1. Lethal-health recovery. A not-alive agent is revived at 1 health and
//!    sent fleeing to the nearest friendly block. With no friendly block in
//!    range the agent leaves the city and the tick reports
//!    [`AgentTickOutcome::Destroyed`].
//! 2. Health recharge.
//! 3. The state switch.
//!
//! Ticks never fail. Missing collaborators (a stale intruder handle, an
//! unknown home block) turn into state transitions.

use rand::Rng;
use tracing::info;
use versus_types::{AgentState, Clock, Importance, NotificationSink, Priority, TickTime};
use versus_world::{
    BlockRegistry, EXPANSION_SEARCH_MAX_DISTANCE, nearest_friendly_block,
    nearest_high_priority_block,
};

use crate::agent::Agent;
use crate::devices::DeviceFactory;
use crate::movement::{EXPAND_MULTIPLIER, RUN_MULTIPLIER};
use crate::targets::AttackTargets;

/// Chance per idle tick of choosing a new activity.
pub const IDLE_REROLL_CHANCE: f64 = 0.02;

/// Health an agent is revived at after a lethal hit.
pub const REVIVAL_HEALTH: f32 = 1.0;

/// Collaborators an agent reads and drives during its tick.
pub struct TickContext<'a, R: Rng> {
    /// Block lookups for searches and wander points.
    pub registry: &'a dyn BlockRegistry,
    /// Where devices are placed.
    pub devices: &'a mut dyn DeviceFactory,
    /// Intruders that can be chased and hit.
    pub targets: &'a mut dyn AttackTargets,
    /// Notification observer.
    pub sink: &'a mut dyn NotificationSink,
    /// Source of every random decision.
    pub rng: &'a mut R,
    /// Clock reading for this tick.
    pub time: TickTime,
}

/// What became of the agent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentTickOutcome {
    /// Still in the simulation.
    Alive,
    /// Found no friendly territory after a lethal hit. The caller must
    /// retire the agent.
    Destroyed,
}

/// Advance `agent` by one tick.
pub fn tick_agent<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) -> AgentTickOutcome {
    let now = ctx.time.elapsed_time();
    let delta = ctx.time.delta_time();

    if !agent.health.is_alive() && !recover_from_lethal_hit(agent, ctx) {
        return AgentTickOutcome::Destroyed;
    }

    agent.health.recharge(delta, now);

    match agent.state {
        AgentState::Idle => idle(agent, ctx),
        AgentState::GatherResource => gather(agent, ctx, delta),
        AgentState::PlaceDevice => place_device(agent, ctx, now, delta),
        AgentState::Flee => {
            agent.advance(RUN_MULTIPLIER, delta);
            if agent.reached_target() {
                agent.transition(AgentState::Hide);
            }
        }
        AgentState::Hide => {
            if agent.health.is_safe() {
                agent.transition(AgentState::Idle);
            }
        }
        AgentState::Attack => attack(agent, ctx, now, delta),
        AgentState::Expand => {
            agent.advance(EXPAND_MULTIPLIER, delta);
            if agent.position.sqr_distance(agent.move_target) <= agent.tuning().sqr_attack_distance()
            {
                agent.transition(AgentState::Idle);
            }
        }
    }

    AgentTickOutcome::Alive
}

/// Revive and flee, or report that the agent must leave. Returns whether
/// the agent survives.
fn recover_from_lethal_hit<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) -> bool {
    let refuge = nearest_friendly_block(ctx.registry, agent.home(), agent.faction())
        .and_then(|found| ctx.registry.block_at(found.coord));

    let Some(refuge) = refuge else {
        info!(agent = %agent.id(), home = %agent.home(), "Agent found no friendly territory");
        agent.announce(
            format!("{agent} found no friendly territory and has left the city."),
            Importance::High,
            ctx.sink,
        );
        return false;
    };

    agent.health.revive(REVIVAL_HEALTH);
    agent.attack_target = None;
    agent.transition(AgentState::Flee);
    agent.move_target = refuge.random_point(&mut *ctx.rng);
    info!(agent = %agent.id(), refuge = %refuge.coord(), "Agent driven out of its block");
    agent.announce(
        format!("{agent} has been hit by too much repellent. They are fleeing from the block."),
        Importance::Medium,
        ctx.sink,
    );
    true
}

fn idle<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>) {
    if agent.resource >= ctx.devices.device_cost(agent.faction()) {
        agent.transition(AgentState::PlaceDevice);
        return;
    }

    if ctx.rng.random::<f64>() >= IDLE_REROLL_CHANCE {
        return;
    }

    if agent.health.is_safe() && ctx.registry.priority_of(agent.home(), agent.faction()) == Priority::Low
    {
        let target = nearest_high_priority_block(
            ctx.registry,
            agent.home(),
            agent.faction(),
            EXPANSION_SEARCH_MAX_DISTANCE,
        )
        .and_then(|found| ctx.registry.block_at(found.coord));

        if let Some(target) = target {
            agent.set_expand_to(Some(target.coord()));
            agent.move_target = target.random_point(&mut *ctx.rng);
            agent.transition(AgentState::Expand);
            agent.announce(
                format!(
                    "{agent} is leaving Block {} in an attempt to take {target} for the {}.",
                    agent.home(),
                    agent.faction().plural()
                ),
                Importance::Medium,
                ctx.sink,
            );
            return;
        }
    }

    agent.move_target = agent.wander_point(ctx.registry, &mut *ctx.rng);
    agent.transition(AgentState::GatherResource);
}

fn gather<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>, delta: f32) {
    let tuning = *agent.tuning();
    let rate = if tuning.randomize_gather {
        let floor = tuning.gather_rate_floor.min(tuning.gather_rate);
        ctx.rng.random_range(floor..=tuning.gather_rate)
    } else {
        tuning.gather_rate
    };
    agent.resource = rate.mul_add(delta, agent.resource).max(0.0);

    agent.advance(1.0, delta);
    if agent.reached_target() {
        agent.transition(AgentState::Idle);
    }
}

fn place_device<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>, now: f64, delta: f32) {
    agent.advance(1.0, delta);
    if !agent.reached_target() {
        return;
    }

    let position = agent.position;
    let spent = ctx
        .devices
        .spawn_device(agent.id(), agent.faction(), position, now);
    agent.resource = (agent.resource - spent).max(0.0);
    agent.announce(
        format!("{agent} placed a repellent mine at {position}."),
        Importance::Low,
        ctx.sink,
    );
    agent.move_target = agent.wander_point(ctx.registry, &mut *ctx.rng);
    agent.transition(AgentState::GatherResource);
}

fn attack<R: Rng>(agent: &mut Agent, ctx: &mut TickContext<'_, R>, now: f64, delta: f32) {
    let home_center = ctx.registry.block_at(agent.home()).map(versus_world::Block::center);
    let within_chase = home_center.is_some_and(|center| {
        center.sqr_distance(agent.position) <= agent.tuning().sqr_chase_distance()
    });
    let target = agent
        .attack_target
        .and_then(|id| ctx.targets.position_of(id).map(|position| (id, position)));

    let (Some((target_id, target_position)), true) = (target, within_chase) else {
        agent.attack_target = None;
        agent.transition(AgentState::Idle);
        return;
    };

    if agent.position.sqr_distance(target_position) < agent.tuning().sqr_attack_distance() {
        if now > agent.next_attack_at {
            let standing = ctx.targets.apply_damage(target_id, agent.tuning().damage);
            agent.next_attack_at = now + f64::from(agent.tuning().attack_cooldown_secs);
            if !standing {
                agent.attack_target = None;
                agent.transition(AgentState::Idle);
            }
        }
    } else {
        agent.move_target = target_position;
        agent.advance(RUN_MULTIPLIER, delta);
    }
}
