//! Tick cycle: the phased loop that drives the Versus simulation.
//!
//! Each tick runs through these phases, in order:
//!
//! 1. **Clock** -- advance the fixed-step clock and freeze its reading for
//!    the rest of the tick.
//!
//! 2. **Blocks** -- every block runs its periodic influence refresh
//!    (announcing ownership edges) and checks for intruders. Attack orders
//!    are handed to the hostile residents.
//!
//! 3. **Agents** -- every agent runs one step of its behaviour state
//!    machine.
//!
//! 4. **Region entry** -- an agent standing over a block other than its
//!    home becomes a resident there, unless it is mid-attack.
//!
//! 5. **Departures** -- agents that found no friendly territory after a
//!    lethal hit are evicted from their block and dropped.
//!
//! Blocks always run before agents, so agents see the ownership and
//! priorities of the current tick. All randomness comes from the state's
//! seeded generator; a run is reproducible from its configuration.

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};
use versus_agents::{
    Agent, AgentConfig, AgentError, AgentSpawn, AgentTickOutcome, AgentTuning, HealthChange,
    TickContext, tick_agent,
};
use versus_types::{AgentId, Faction, GridCoord, NotificationSink, TickTime};
use versus_world::{AttackOrder, CityGrid, OwnershipChange, WorldError};

use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimulationConfig};
use crate::devices::DeviceLedger;
use crate::intruders::IntruderTracker;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// An agent could not be moved or retired.
    #[error("agent error for {agent_id}: {source}")]
    Agent {
        /// The agent that caused the error.
        agent_id: AgentId,
        /// The underlying agent error.
        source: AgentError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulation seconds at the end of the tick.
    pub elapsed: f64,
    /// Living cats at end of tick.
    pub cats_alive: usize,
    /// Living dogs at end of tick.
    pub dogs_alive: usize,
    /// Blocks whose owner changed this tick.
    pub ownership_changes: Vec<(GridCoord, OwnershipChange)>,
    /// Attack orders handed out by blocks.
    pub attack_orders: usize,
    /// Agents that moved into a new home block.
    pub relocations: usize,
    /// Agents that left the city.
    pub departed: Vec<AgentId>,
    /// Intruders still in the city.
    pub intruders_remaining: usize,
}

impl TickSummary {
    /// Living agents of both factions.
    pub const fn agents_alive(&self) -> usize {
        self.cats_alive.saturating_add(self.dogs_alive)
    }
}

/// The mutable simulation state passed through the tick cycle.
pub struct SimulationState {
    /// The simulation clock.
    pub clock: SimClock,
    /// Every block of the city.
    pub grid: CityGrid,
    /// Agents still in the city.
    pub agents: Vec<Agent>,
    /// Intruders still in the city.
    pub intruders: IntruderTracker,
    /// Devices planted so far.
    pub devices: DeviceLedger,
    /// Tunables each new agent draws from.
    pub agent_config: AgentConfig,
    /// The single source of randomness for the run.
    pub rng: SmallRng,
    /// Where notifications go.
    pub sink: Box<dyn NotificationSink + Send>,
}

impl core::fmt::Debug for SimulationState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SimulationState")
            .field("clock", &self.clock)
            .field("grid", &self.grid)
            .field("agents", &self.agents.len())
            .field("intruders", &self.intruders.len())
            .field("devices", &self.devices.placed().len())
            .finish_non_exhaustive()
    }
}

impl SimulationState {
    /// Build the world described by `config`: the grid, the director
    /// priorities, and the starting intruders. No agents are spawned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn new(
        config: &SimulationConfig,
        sink: Box<dyn NotificationSink + Send>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let clock = SimClock::new(config.time.delta_time).map_err(|e| ConfigError::Invalid {
            reason: e.to_string(),
        })?;
        let mut grid = CityGrid::new(&config.world.grid)?;

        for entry in &config.priorities {
            grid.set_priority(entry.coord(), entry.faction, entry.priority)?;
        }

        let mut intruders = IntruderTracker::new();
        for entry in &config.intruders {
            let coord = entry.coord();
            let center = grid
                .block(coord)
                .ok_or(WorldError::BlockNotFound(coord))?
                .center();
            let _ = intruders.insert(entry.faction, coord, center, entry.health);
        }

        info!(
            world_name = config.world.name,
            seed = config.world.seed,
            width = config.world.grid.width,
            depth = config.world.grid.depth,
            intruders = intruders.len(),
            "Simulation state created"
        );

        Ok(Self {
            clock,
            grid,
            agents: Vec::new(),
            intruders,
            devices: DeviceLedger::new(config.devices.cost),
            agent_config: config.agents.clone(),
            rng: SmallRng::seed_from_u64(config.world.seed),
            sink,
        })
    }

    /// Spawn an agent at a random point in `home` and register it there.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the faction is neutral or the block does
    /// not exist.
    pub fn spawn_agent(
        &mut self,
        name: String,
        faction: Faction,
        home: GridCoord,
    ) -> Result<AgentId, AgentError> {
        let position = self
            .grid
            .block(home)
            .ok_or(WorldError::BlockNotFound(home))?
            .random_point(&mut self.rng);
        let tuning = AgentTuning::resolve(&self.agent_config, &mut self.rng);
        let agent = Agent::spawn(
            AgentSpawn {
                name,
                faction,
                home,
                position,
            },
            tuning,
            &mut self.grid,
            &mut *self.sink,
        )?;
        let id = agent.id();
        self.agents.push(agent);
        Ok(id)
    }

    /// Look up a living agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|agent| agent.id() == id)
    }

    /// Hit an agent from outside the simulation (a player, a mine).
    ///
    /// Returns `None` if the agent is no longer in the city.
    pub fn damage_agent(&mut self, id: AgentId, amount: f32, source: &str) -> Option<HealthChange> {
        let now = self.clock.now().elapsed;
        let agent = self.agents.iter_mut().find(|agent| agent.id() == id)?;
        Some(agent.take_damage(
            amount,
            source,
            now,
            &self.grid,
            &mut self.rng,
            &mut *self.sink,
        ))
    }

    /// Living agents of `faction`.
    pub fn alive(&self, faction: Faction) -> usize {
        self.agents
            .iter()
            .filter(|agent| agent.faction() == faction)
            .count()
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError`] if the clock is exhausted or the grid rejects a
/// relocation or eviction.
pub fn run_tick(state: &mut SimulationState) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let time = state.clock.advance()?;
    let tick = state.clock.tick();
    debug!(tick, elapsed = time.elapsed, "Tick started");

    // --- Phase 2: Blocks ---
    let (ownership_changes, orders) = phase_blocks(state, time);
    apply_attack_orders(state, &orders);

    // --- Phase 3: Agents ---
    let departed = phase_agents(state, time);

    // --- Phase 4: Region entry ---
    let relocations = phase_region_entry(state, &departed)?;

    // --- Phase 5: Departures ---
    phase_departures(state, &departed)?;

    let summary = TickSummary {
        tick,
        elapsed: time.elapsed,
        cats_alive: state.alive(Faction::Cat),
        dogs_alive: state.alive(Faction::Dog),
        ownership_changes,
        attack_orders: orders.len(),
        relocations,
        departed,
        intruders_remaining: state.intruders.len(),
    };
    debug!(
        tick,
        cats = summary.cats_alive,
        dogs = summary.dogs_alive,
        relocations,
        "Tick complete"
    );
    Ok(summary)
}

fn phase_blocks(
    state: &mut SimulationState,
    time: TickTime,
) -> (Vec<(GridCoord, OwnershipChange)>, Vec<AttackOrder>) {
    let mut changes = Vec::new();
    let mut orders = Vec::new();
    for block in state.grid.blocks_mut() {
        if let Some(change) = block.update(time.elapsed, &mut *state.sink) {
            changes.push((block.coord(), change));
        }
        orders.extend(block.detect_intruders(&state.intruders));
    }
    (changes, orders)
}

fn apply_attack_orders(state: &mut SimulationState, orders: &[AttackOrder]) {
    for order in orders {
        if let Some(agent) = state.agents.iter_mut().find(|agent| agent.id() == order.agent) {
            agent.engage(order.target);
        }
    }
}

fn phase_agents(state: &mut SimulationState, time: TickTime) -> Vec<AgentId> {
    let mut ctx = TickContext {
        registry: &state.grid,
        devices: &mut state.devices,
        targets: &mut state.intruders,
        sink: &mut *state.sink,
        rng: &mut state.rng,
        time,
    };
    state
        .agents
        .iter_mut()
        .filter_map(|agent| match tick_agent(agent, &mut ctx) {
            AgentTickOutcome::Alive => None,
            AgentTickOutcome::Destroyed => Some(agent.id()),
        })
        .collect()
}

fn phase_region_entry(
    state: &mut SimulationState,
    departed: &[AgentId],
) -> Result<usize, TickError> {
    let mut moved: usize = 0;
    for agent in &mut state.agents {
        if departed.contains(&agent.id()) {
            continue;
        }
        let Some(entered) = state.grid.coord_at(agent.position()) else {
            continue;
        };
        let relocated = agent
            .relocate(&mut state.grid, entered, &mut *state.sink)
            .map_err(|source| TickError::Agent {
                agent_id: agent.id(),
                source,
            })?;
        if relocated {
            moved = moved.saturating_add(1);
        }
    }
    Ok(moved)
}

fn phase_departures(state: &mut SimulationState, departed: &[AgentId]) -> Result<(), TickError> {
    if departed.is_empty() {
        return Ok(());
    }
    let (gone, staying): (Vec<Agent>, Vec<Agent>) = std::mem::take(&mut state.agents)
        .into_iter()
        .partition(|agent| departed.contains(&agent.id()));
    state.agents = staying;

    for agent in gone {
        agent
            .retire(&mut state.grid, &mut *state.sink)
            .map_err(|source| TickError::Agent {
                agent_id: agent.id(),
                source,
            })?;
        info!(
            agent = %agent.id(),
            name = agent.name(),
            faction = %agent.faction(),
            home = %agent.home(),
            "Agent left the city"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::config::{IntruderConfig, PopulationConfig, PriorityConfig, SpawnGroup};
    use versus_types::{AgentState, NullSink, Priority};

    fn state_with(config: &SimulationConfig) -> SimulationState {
        let mut state = SimulationState::new(config, Box::new(NullSink)).unwrap();
        for group in &config.population.spawns {
            for n in 0..group.count {
                state
                    .spawn_agent(format!("{} #{n}", group.faction), group.faction, group.coord())
                    .unwrap();
            }
        }
        state
    }

    fn empty_config() -> SimulationConfig {
        SimulationConfig {
            population: PopulationConfig { spawns: Vec::new() },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn tick_advances_clock() {
        let mut state = state_with(&SimulationConfig::default());
        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.tick, 1);
        assert_eq!(state.clock.tick(), 1);
        assert!((summary.elapsed - 0.1).abs() < 1e-6);
    }

    #[test]
    fn first_tick_announces_initial_owners() {
        let mut state = state_with(&SimulationConfig::default());
        let summary = run_tick(&mut state).unwrap();

        assert_eq!(summary.ownership_changes.len(), 2);
        assert!(summary.ownership_changes.contains(&(
            GridCoord::new(0, 0),
            OwnershipChange {
                previous: Faction::Neutral,
                current: Faction::Cat,
            }
        )));
        assert!(summary.ownership_changes.contains(&(
            GridCoord::new(4, 4),
            OwnershipChange {
                previous: Faction::Neutral,
                current: Faction::Dog,
            }
        )));

        // Nothing changes hands on the next tick; the refresh is not due.
        let summary = run_tick(&mut state).unwrap();
        assert!(summary.ownership_changes.is_empty());
    }

    #[test]
    fn priorities_from_config_are_applied() {
        let config = SimulationConfig {
            priorities: vec![PriorityConfig {
                x: 3,
                y: 1,
                faction: Faction::Dog,
                priority: Priority::High,
            }],
            ..empty_config()
        };
        let state = state_with(&config);
        let block = state.grid.block(GridCoord::new(3, 1)).unwrap();
        assert_eq!(block.priority(Faction::Dog), Priority::High);
        assert_eq!(block.priority(Faction::Cat), Priority::Medium);
    }

    #[test]
    fn hostile_intruder_puts_residents_on_the_attack() {
        let config = SimulationConfig {
            intruders: vec![IntruderConfig {
                x: 0,
                y: 0,
                faction: Faction::Dog,
                health: 50.0,
            }],
            ..SimulationConfig::default()
        };
        let mut state = state_with(&config);
        let summary = run_tick(&mut state).unwrap();

        assert_eq!(summary.attack_orders, 5);
        assert!(
            state
                .agents
                .iter()
                .filter(|agent| agent.faction() == Faction::Cat)
                .all(|agent| agent.state() == AgentState::Attack)
        );
        assert!(
            state
                .agents
                .iter()
                .filter(|agent| agent.faction() == Faction::Dog)
                .all(|agent| agent.state() != AgentState::Attack)
        );
    }

    #[test]
    fn minority_residents_ignore_intruders() {
        let config = SimulationConfig {
            population: PopulationConfig {
                spawns: vec![
                    SpawnGroup {
                        x: 0,
                        y: 0,
                        faction: Faction::Cat,
                        count: 5,
                    },
                    SpawnGroup {
                        x: 0,
                        y: 0,
                        faction: Faction::Dog,
                        count: 1,
                    },
                ],
            },
            intruders: vec![IntruderConfig {
                x: 0,
                y: 0,
                faction: Faction::Neutral,
                health: 50.0,
            }],
            ..SimulationConfig::default()
        };
        let mut state = state_with(&config);
        let summary = run_tick(&mut state).unwrap();

        assert_eq!(summary.attack_orders, 5);
        let dog = state
            .agents
            .iter()
            .find(|agent| agent.faction() == Faction::Dog)
            .unwrap();
        assert_ne!(dog.state(), AgentState::Attack);
    }

    #[test]
    fn residents_drive_off_an_intruder() {
        let config = SimulationConfig {
            intruders: vec![IntruderConfig {
                x: 0,
                y: 0,
                faction: Faction::Neutral,
                health: 20.0,
            }],
            ..SimulationConfig::default()
        };
        let mut state = state_with(&config);
        let mut remaining = state.intruders.len();
        for _ in 0..500 {
            remaining = run_tick(&mut state).unwrap().intruders_remaining;
            if remaining == 0 {
                break;
            }
        }
        assert_eq!(remaining, 0);
        assert_eq!(state.intruders.driven_off(), 1);
    }

    #[test]
    fn stranded_agent_is_evicted_after_a_lethal_hit() {
        let config = SimulationConfig {
            world: crate::config::WorldConfig {
                grid: versus_world::GridConfig {
                    width: 9,
                    depth: 1,
                    ..versus_world::GridConfig::default()
                },
                ..crate::config::WorldConfig::default()
            },
            ..empty_config()
        };
        let mut state = state_with(&config);
        let id = state
            .spawn_agent(String::from("Rex"), Faction::Dog, GridCoord::new(0, 0))
            .unwrap();

        let change = state.damage_agent(id, 1_000.0, "a cat mine").unwrap();
        assert!(change.to <= 0.0);

        let summary = run_tick(&mut state).unwrap();
        assert_eq!(summary.departed, vec![id]);
        assert_eq!(summary.agents_alive(), 0);
        assert!(state.agent(id).is_none());
        assert_eq!(state.grid.population(Faction::Dog), 0);
    }

    #[test]
    fn expansion_moves_residency_on_region_entry() {
        let home = GridCoord::new(2, 2);
        let target = GridCoord::new(2, 1);
        let config = SimulationConfig {
            priorities: vec![
                PriorityConfig {
                    x: home.x,
                    y: home.y,
                    faction: Faction::Cat,
                    priority: Priority::Low,
                },
                PriorityConfig {
                    x: target.x,
                    y: target.y,
                    faction: Faction::Cat,
                    priority: Priority::High,
                },
            ],
            population: PopulationConfig {
                spawns: vec![SpawnGroup {
                    x: home.x,
                    y: home.y,
                    faction: Faction::Cat,
                    count: 1,
                }],
            },
            ..SimulationConfig::default()
        };
        let mut state = state_with(&config);
        let id = state.agents.first().unwrap().id();

        let mut relocations: usize = 0;
        for _ in 0..20_000 {
            relocations = relocations.saturating_add(run_tick(&mut state).unwrap().relocations);
            if state.agent(id).unwrap().home() == target {
                break;
            }
        }
        let agent = state.agent(id).unwrap();
        assert_eq!(agent.home(), target);
        assert_eq!(relocations, 1);
        assert!(state.grid.block(target).unwrap().has_resident(id));
        assert!(!state.grid.block(home).unwrap().has_resident(id));
    }
}
