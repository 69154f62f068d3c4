//! Agent spawner for seeding the simulation with its starting population.
//!
//! Each spawn group in the `population` section becomes `count` agents of
//! one faction living in one block. Names come from a per-faction pool;
//! once a pool runs out, names repeat with a numeric suffix.

use tracing::info;
use versus_core::config::PopulationConfig;
use versus_core::tick::SimulationState;
use versus_types::Faction;

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Name pools
// -----------------------------------------------------------------------

const CAT_NAMES: &[&str] = &[
    "Tom", "Felix", "Luna", "Mittens", "Shadow", "Cleo", "Misty", "Tiger", "Smokey", "Ginger",
    "Pumpkin", "Salem", "Willow", "Pepper", "Olive", "Jasper",
];

const DOG_NAMES: &[&str] = &[
    "Rex", "Buddy", "Max", "Bella", "Rocky", "Daisy", "Duke", "Bailey", "Rusty", "Scout",
    "Biscuit", "Murphy", "Rosie", "Bruno", "Maple", "Otis",
];

/// Pick the `index`th name for `faction`.
///
/// Past the end of the pool, names cycle with a generation suffix
/// ("Tom II", "Tom III", ...).
pub fn agent_name(faction: Faction, index: usize) -> String {
    let pool = match faction {
        Faction::Cat => CAT_NAMES,
        Faction::Dog => DOG_NAMES,
        Faction::Neutral => return format!("Stray #{index}"),
    };
    let Some(len) = core::num::NonZeroUsize::new(pool.len()) else {
        return format!("{faction} #{index}");
    };
    let base = pool.get(index % len).copied().unwrap_or("Agent");
    match index / len {
        0 => base.to_owned(),
        generation => format!("{base} {}", roman(generation.saturating_add(1))),
    }
}

fn roman(mut n: usize) -> String {
    const NUMERALS: &[(usize, &str)] = &[
        (10, "X"),
        (9, "IX"),
        (5, "V"),
        (4, "IV"),
        (1, "I"),
    ];
    let mut out = String::new();
    for &(value, numeral) in NUMERALS {
        while n >= value {
            out.push_str(numeral);
            n = n.saturating_sub(value);
        }
    }
    out
}

// -----------------------------------------------------------------------
// Spawning
// -----------------------------------------------------------------------

/// Head counts produced by [`spawn_population`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Cats spawned.
    pub cats: usize,
    /// Dogs spawned.
    pub dogs: usize,
}

impl SpawnReport {
    /// Agents of `faction` spawned so far.
    pub const fn count(&self, faction: Faction) -> usize {
        match faction {
            Faction::Cat => self.cats,
            Faction::Dog => self.dogs,
            Faction::Neutral => 0,
        }
    }

    const fn record(&mut self, faction: Faction) {
        match faction {
            Faction::Cat => self.cats = self.cats.saturating_add(1),
            Faction::Dog => self.dogs = self.dogs.saturating_add(1),
            Faction::Neutral => {}
        }
    }
}

/// Spawn every group in `population` into `state`.
///
/// # Errors
///
/// Returns [`EngineError::Spawner`] if an agent cannot be placed.
pub fn spawn_population(
    state: &mut SimulationState,
    population: &PopulationConfig,
) -> Result<SpawnReport, EngineError> {
    let mut report = SpawnReport::default();
    for group in &population.spawns {
        for _ in 0..group.count {
            let name = agent_name(group.faction, report.count(group.faction));
            state.spawn_agent(name, group.faction, group.coord())?;
            report.record(group.faction);
        }
        info!(
            faction = %group.faction,
            block = %group.coord(),
            count = group.count,
            "Spawn group placed"
        );
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use versus_core::config::{SimulationConfig, SpawnGroup};
    use versus_types::{GridCoord, NullSink};

    #[test]
    fn names_cycle_with_suffix() {
        assert_eq!(agent_name(Faction::Cat, 0), "Tom");
        assert_eq!(agent_name(Faction::Dog, 1), "Buddy");
        assert_eq!(agent_name(Faction::Cat, CAT_NAMES.len()), "Tom II");
        assert_eq!(agent_name(Faction::Dog, DOG_NAMES.len() * 3 + 2), "Max IV");
    }

    #[test]
    fn roman_numerals() {
        assert_eq!(roman(2), "II");
        assert_eq!(roman(9), "IX");
        assert_eq!(roman(14), "XIV");
    }

    #[test]
    fn spawns_every_group() {
        let config = SimulationConfig::default();
        let mut state = SimulationState::new(&config, Box::new(NullSink)).unwrap();
        let population = PopulationConfig {
            spawns: vec![
                SpawnGroup {
                    x: 1,
                    y: 1,
                    faction: Faction::Cat,
                    count: 3,
                },
                SpawnGroup {
                    x: 3,
                    y: 2,
                    faction: Faction::Dog,
                    count: 2,
                },
            ],
        };

        let report = spawn_population(&mut state, &population).unwrap();
        assert_eq!(report, SpawnReport { cats: 3, dogs: 2 });
        assert_eq!(state.agents.len(), 5);
        let block = state.grid.block(GridCoord::new(1, 1)).unwrap();
        assert_eq!(block.resident_count(Faction::Cat), 3);
        let names: Vec<&str> = state.agents.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["Tom", "Felix", "Luna", "Rex", "Buddy"]);
    }
}
