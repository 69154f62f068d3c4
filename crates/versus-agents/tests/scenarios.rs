//! End-to-end behaviour scenarios for a single agent.
//!
//! Each test builds a small city, spawns an agent through the public API
//! and drives it with [`tick_agent`]. Randomness is either a seeded
//! `SmallRng` or a scripted source that forces every roll to succeed.

#![allow(clippy::unwrap_used)]

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use versus_agents::{
    Agent, AgentConfig, AgentSpawn, AgentTickOutcome, AgentTuning, AttackTargets, DeviceFactory,
    TickContext, TunableRange, tick_agent,
};
use versus_types::{
    AgentId, AgentState, Faction, GridCoord, Importance, IntruderId, Priority, RecordingSink,
    TickTime, Vec3,
};
use versus_world::{CityGrid, GridConfig};

/// Random source whose every draw is zero: every probability roll
/// succeeds and every random point lands on a block's minimum corner.
struct ZeroRng;

impl RngCore for ZeroRng {
    fn next_u32(&mut self) -> u32 {
        0
    }

    fn next_u64(&mut self) -> u64 {
        0
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        dest.fill(0);
    }
}

struct FixedCostDevices(f32);

impl DeviceFactory for FixedCostDevices {
    fn device_cost(&self, _faction: Faction) -> f32 {
        self.0
    }

    fn spawn_device(&mut self, _owner: AgentId, _faction: Faction, _position: Vec3, _now: f64) -> f32 {
        self.0
    }
}

struct NoTargets;

impl AttackTargets for NoTargets {
    fn position_of(&self, _target: IntruderId) -> Option<Vec3> {
        None
    }

    fn apply_damage(&mut self, _target: IntruderId, _amount: f32) -> bool {
        false
    }
}

struct Scenario {
    grid: CityGrid,
    sink: RecordingSink,
    devices: FixedCostDevices,
    elapsed: f64,
}

impl Scenario {
    fn new(config: &GridConfig) -> Self {
        Self {
            grid: CityGrid::new(config).unwrap(),
            sink: RecordingSink::new(),
            devices: FixedCostDevices(1000.0),
            elapsed: 0.0,
        }
    }

    fn spawn(&mut self, faction: Faction, home: GridCoord) -> Agent {
        let config = AgentConfig {
            recharge_rate: 0.0,
            gather_rate: TunableRange::fixed(1.0),
            ..AgentConfig::default()
        };
        let tuning = AgentTuning::resolve(&config, &mut SmallRng::seed_from_u64(1));
        let position = self.grid.block(home).unwrap().center();
        Agent::spawn(
            AgentSpawn {
                name: format!("{faction} scout"),
                faction,
                home,
                position,
            },
            tuning,
            &mut self.grid,
            &mut self.sink,
        )
        .unwrap()
    }

    fn tick(&mut self, agent: &mut Agent, rng: &mut impl RngCore) -> AgentTickOutcome {
        self.elapsed += 0.1;
        let mut targets = NoTargets;
        let mut ctx = TickContext {
            registry: &self.grid,
            devices: &mut self.devices,
            targets: &mut targets,
            sink: &mut self.sink,
            rng,
            time: TickTime::new(self.elapsed, 0.1),
        };
        tick_agent(agent, &mut ctx)
    }
}

fn low_priority_home_with_high_target(target: GridCoord) -> (Scenario, GridCoord) {
    let mut scenario = Scenario::new(&GridConfig::default());
    let home = GridCoord::new(2, 2);
    scenario
        .grid
        .set_priority(home, Faction::Cat, Priority::Low)
        .unwrap();
    scenario
        .grid
        .set_priority(target, Faction::Cat, Priority::High)
        .unwrap();
    (scenario, home)
}

// ---------------------------------------------------------------------------
// Idle decisions
// ---------------------------------------------------------------------------

#[test]
fn wounded_agent_gathers_even_next_to_a_high_priority_block() {
    let (mut scenario, home) = low_priority_home_with_high_target(GridCoord::new(2, 1));
    let mut agent = scenario.spawn(Faction::Cat, home);
    let _ = agent.health_mut().set_health(10.0);

    scenario.tick(&mut agent, &mut ZeroRng);

    assert_eq!(agent.state(), AgentState::GatherResource);
    assert_eq!(agent.expand_to(), None);
    assert!(scenario.grid.block(home).unwrap().contains_point(agent.move_target()));
}

#[test]
fn healthy_agent_expands_into_high_priority_block_in_range() {
    let target = GridCoord::new(2, 0);
    let (mut scenario, home) = low_priority_home_with_high_target(target);
    let mut agent = scenario.spawn(Faction::Cat, home);
    scenario.sink.clear();

    scenario.tick(&mut agent, &mut ZeroRng);

    assert_eq!(agent.state(), AgentState::Expand);
    assert_eq!(agent.expand_to(), Some(target));
    assert!(scenario.grid.block(target).unwrap().contains_point(agent.move_target()));
    let event = scenario.sink.agent_events().next().unwrap();
    assert_eq!(event.importance, Importance::Medium);
    assert_eq!(
        event.message,
        "Cat scout is leaving Block (2, 2) in an attempt to take Block (2, 0) for the cats."
    );
}

#[test]
fn healthy_agent_gathers_when_high_priority_block_is_out_of_range() {
    // Ring 3 is outside the expansion search.
    let (mut scenario, home) = low_priority_home_with_high_target(GridCoord::new(4, 3));
    let mut agent = scenario.spawn(Faction::Cat, home);

    scenario.tick(&mut agent, &mut ZeroRng);

    assert_eq!(agent.state(), AgentState::GatherResource);
    assert_eq!(agent.expand_to(), None);
}

#[test]
fn seeded_idle_agent_eventually_expands() {
    let target = GridCoord::new(1, 2);
    let (mut scenario, home) = low_priority_home_with_high_target(target);
    let mut agent = scenario.spawn(Faction::Cat, home);
    let mut rng = SmallRng::seed_from_u64(42);

    let mut ticks: u32 = 0;
    while agent.state() == AgentState::Idle && ticks < 10_000 {
        scenario.tick(&mut agent, &mut rng);
        ticks = ticks.saturating_add(1);
    }
    assert_eq!(agent.state(), AgentState::Expand);
    assert_eq!(agent.expand_to(), Some(target));
}

// ---------------------------------------------------------------------------
// Damage
// ---------------------------------------------------------------------------

#[test]
fn survivable_hit_forces_flee_with_a_new_target() {
    let mut scenario = Scenario::new(&GridConfig::default());
    let mut agent = scenario.spawn(Faction::Dog, GridCoord::new(1, 1));
    let _ = agent.health_mut().set_health(50.0);
    let before = agent.move_target();
    scenario.sink.clear();

    let mut rng = SmallRng::seed_from_u64(9);
    let change = agent.take_damage(20.0, "a cat mine", 3.0, &scenario.grid, &mut rng, &mut scenario.sink);

    assert!((change.from - 50.0).abs() < f32::EPSILON);
    assert!((change.to - 30.0).abs() < f32::EPSILON);
    assert_eq!(agent.state(), AgentState::Flee);
    assert_ne!(agent.move_target(), before);
    let event = scenario.sink.agent_events().next().unwrap();
    assert_eq!(event.importance, Importance::Medium);
    assert!(event.message.contains("20.0 units of repellent from a cat mine"));
    assert!(event.message.ends_with("not yet giving up this block."));
}

#[test]
fn lethal_hit_without_friendly_territory_destroys_the_agent() {
    let config = GridConfig {
        width: 9,
        depth: 1,
        ..GridConfig::default()
    };
    let mut scenario = Scenario::new(&config);
    let home = GridCoord::new(0, 0);
    // Friendly, but seven rings away.
    let far = GridCoord::new(7, 0);
    for _ in 0..5 {
        scenario
            .grid
            .place_resident(AgentId::new(), Faction::Dog, far, &mut scenario.sink)
            .unwrap();
    }
    let mut agent = scenario.spawn(Faction::Dog, home);
    let mut rng = SmallRng::seed_from_u64(3);
    let _ = agent.take_damage(500.0, "the player", 1.0, &scenario.grid, &mut rng, &mut scenario.sink);
    scenario.sink.clear();

    assert_eq!(scenario.tick(&mut agent, &mut rng), AgentTickOutcome::Destroyed);
    assert!(!agent.health().is_alive());
    let event = scenario.sink.agent_events().next().unwrap();
    assert_eq!(event.importance, Importance::High);
    assert!(event.message.contains("left the city"));

    assert!(agent.retire(&mut scenario.grid, &mut scenario.sink).unwrap());
    assert!(!scenario.grid.block(home).unwrap().has_resident(agent.id()));
}

// ---------------------------------------------------------------------------
// Long runs
// ---------------------------------------------------------------------------

#[test]
fn resource_never_goes_negative() {
    let mut scenario = Scenario::new(&GridConfig::default());
    scenario.devices = FixedCostDevices(0.75);
    let mut agent = scenario.spawn(Faction::Cat, GridCoord::new(3, 3));
    let mut rng = SmallRng::seed_from_u64(1234);

    let mut placed: u32 = 0;
    for _ in 0..5_000 {
        let before = agent.state();
        scenario.tick(&mut agent, &mut rng);
        assert!(agent.resource() >= 0.0);
        if before == AgentState::PlaceDevice && agent.state() == AgentState::GatherResource {
            placed = placed.saturating_add(1);
        }
    }
    assert!(placed > 0);
}

// ---------------------------------------------------------------------------
// Relocation
// ---------------------------------------------------------------------------

#[test]
fn relocation_is_refused_while_attacking() {
    let mut scenario = Scenario::new(&GridConfig::default());
    let home = GridCoord::new(0, 0);
    let next = GridCoord::new(1, 0);
    let mut agent = scenario.spawn(Faction::Cat, home);

    agent.engage(IntruderId::new());
    assert!(!agent.relocate(&mut scenario.grid, next, &mut scenario.sink).unwrap());
    assert_eq!(agent.home(), home);

    // Losing the target ends the chase; now the move goes through.
    scenario.tick(&mut agent, &mut ZeroRng);
    assert_eq!(agent.state(), AgentState::Idle);
    assert!(agent.relocate(&mut scenario.grid, next, &mut scenario.sink).unwrap());
    assert_eq!(agent.home(), next);
    assert!(scenario.grid.block(next).unwrap().has_resident(agent.id()));
    assert!(!scenario.grid.block(home).unwrap().has_resident(agent.id()));
}

#[test]
fn neutral_agents_cannot_spawn() {
    let mut grid = CityGrid::new(&GridConfig::default()).unwrap();
    let mut sink = RecordingSink::new();
    let tuning = AgentTuning::resolve(&AgentConfig::default(), &mut SmallRng::seed_from_u64(5));
    let result = Agent::spawn(
        AgentSpawn {
            name: String::from("nobody"),
            faction: Faction::Neutral,
            home: GridCoord::new(0, 0),
            position: Vec3::ZERO,
        },
        tuning,
        &mut grid,
        &mut sink,
    );
    assert!(matches!(
        result,
        Err(versus_agents::AgentError::InvalidFaction { .. })
    ));
    assert_eq!(grid.population(Faction::Neutral), 0);
    assert!(sink.events().is_empty());
}
