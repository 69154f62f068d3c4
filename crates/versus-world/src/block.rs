//! A single city block: residents, influence and ownership notifications.
//!
//! A [`Block`] owns two resident sets, one per animal faction. Its
//! controlling faction is always derived from those sets through the
//! [`InfluenceModel`]; the cached owner in the [`OwnershipTracker`] only
//! exists to report ownership edges.
//!
//! Resident mutation is crate-private. Outside this crate the only way to
//! move an agent between blocks is through [`CityGrid`](crate::CityGrid),
//! which requires exclusive access to the whole grid.

use std::collections::BTreeSet;

use rand::Rng;
use tracing::{debug, info};
use versus_types::{
    AgentId, BlockUpdatedEvent, Faction, GridCoord, Importance, NotificationSink, Priority, Vec3,
};

use crate::error::WorldError;
use crate::influence::{InfluenceModel, OwnershipChange, OwnershipTracker};
use crate::intruder::{AttackOrder, IntruderSensor};
use crate::notify::publish_best_effort;

/// World-space footprint of a block on the XZ plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockExtent {
    /// Size along world X.
    pub width: f32,
    /// Size along world Z.
    pub depth: f32,
}

impl BlockExtent {
    /// Construct an extent.
    pub const fn new(width: f32, depth: f32) -> Self {
        Self { width, depth }
    }
}

/// A block of the city contested by cats and dogs.
#[derive(Debug, Clone)]
pub struct Block {
    coord: GridCoord,
    center: Vec3,
    extent: BlockExtent,
    cats: BTreeSet<AgentId>,
    dogs: BTreeSet<AgentId>,
    cat_priority: Priority,
    dog_priority: Priority,
    influence: InfluenceModel,
    ownership: OwnershipTracker,
    /// Seconds between influence refreshes.
    refresh_interval: f64,
    /// Elapsed time at which the next refresh is due.
    next_refresh_at: f64,
}

impl Block {
    /// Create an empty block with medium priority for both factions.
    ///
    /// The first call to [`Block::update`] refreshes immediately.
    pub const fn new(
        coord: GridCoord,
        center: Vec3,
        extent: BlockExtent,
        influence: InfluenceModel,
        refresh_interval: f64,
    ) -> Self {
        Self {
            coord,
            center,
            extent,
            cats: BTreeSet::new(),
            dogs: BTreeSet::new(),
            cat_priority: Priority::Medium,
            dog_priority: Priority::Medium,
            influence,
            ownership: OwnershipTracker::new(Faction::Neutral),
            refresh_interval,
            next_refresh_at: 0.0,
        }
    }

    /// Grid coordinate of this block.
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// World-space centre.
    pub const fn center(&self) -> Vec3 {
        self.center
    }

    /// World-space footprint.
    pub const fn extent(&self) -> BlockExtent {
        self.extent
    }

    // -------------------------------------------------------------------
    // Residents
    // -------------------------------------------------------------------

    /// Residents of one faction, in id order. Neutral has none.
    pub fn residents(&self, faction: Faction) -> impl Iterator<Item = &AgentId> {
        self.resident_set(faction).into_iter().flatten()
    }

    /// Number of residents of one faction.
    pub fn resident_count(&self, faction: Faction) -> usize {
        self.resident_set(faction).map_or(0, BTreeSet::len)
    }

    /// Whether `agent` lives here under either faction.
    pub fn has_resident(&self, agent: AgentId) -> bool {
        self.cats.contains(&agent) || self.dogs.contains(&agent)
    }

    const fn resident_set(&self, faction: Faction) -> Option<&BTreeSet<AgentId>> {
        match faction {
            Faction::Cat => Some(&self.cats),
            Faction::Dog => Some(&self.dogs),
            Faction::Neutral => None,
        }
    }

    const fn resident_set_mut(&mut self, faction: Faction) -> Option<&mut BTreeSet<AgentId>> {
        match faction {
            Faction::Cat => Some(&mut self.cats),
            Faction::Dog => Some(&mut self.dogs),
            Faction::Neutral => None,
        }
    }

    /// Register `agent` as a resident and announce it.
    ///
    /// Emits exactly one medium-importance event per call. Returns whether
    /// the agent was newly added; adding an existing resident is a no-op on
    /// the sets.
    pub(crate) fn add_resident(
        &mut self,
        agent: AgentId,
        faction: Faction,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, WorldError> {
        let set = self
            .resident_set_mut(faction)
            .ok_or(WorldError::NeutralResident(agent))?;
        let inserted = set.insert(agent);
        debug!(agent = %agent, block = %self.coord, faction = %faction, "Resident added");
        publish_best_effort(
            sink,
            BlockUpdatedEvent::new(
                self.coord,
                format!("{faction} moved into {self}."),
                Importance::Medium,
            ),
        );
        Ok(inserted)
    }

    /// Remove `agent` from the residents and announce it.
    ///
    /// Emits exactly one medium-importance event per call. Returns whether
    /// the agent was actually a resident.
    pub(crate) fn remove_resident(
        &mut self,
        agent: AgentId,
        faction: Faction,
        sink: &mut dyn NotificationSink,
    ) -> Result<bool, WorldError> {
        let set = self
            .resident_set_mut(faction)
            .ok_or(WorldError::NeutralResident(agent))?;
        let removed = set.remove(&agent);
        debug!(agent = %agent, block = %self.coord, faction = %faction, "Resident removed");
        publish_best_effort(
            sink,
            BlockUpdatedEvent::new(
                self.coord,
                format!("{faction} moved out of {self}."),
                Importance::Medium,
            ),
        );
        Ok(removed)
    }

    // -------------------------------------------------------------------
    // Priority
    // -------------------------------------------------------------------

    /// The priority `faction`'s director has set here.
    pub const fn priority(&self, faction: Faction) -> Priority {
        match faction {
            Faction::Cat => self.cat_priority,
            Faction::Dog => self.dog_priority,
            Faction::Neutral => Priority::Medium,
        }
    }

    /// Set a faction's priority. Setting Neutral's priority is ignored.
    pub const fn set_priority(&mut self, faction: Faction, priority: Priority) {
        match faction {
            Faction::Cat => self.cat_priority = priority,
            Faction::Dog => self.dog_priority = priority,
            Faction::Neutral => {}
        }
    }

    // -------------------------------------------------------------------
    // Influence
    // -------------------------------------------------------------------

    /// Current influence balance: 0 cats, 0.5 contested, 1 dogs.
    pub fn normalized_influence(&self) -> f64 {
        self.influence.normalized(self.dogs.len(), self.cats.len())
    }

    /// Current owner, computed from the live resident counts.
    pub fn controlling_faction(&self) -> Faction {
        self.influence.controlling_faction(self.dogs.len(), self.cats.len())
    }

    /// The owner as of the last refresh.
    pub const fn last_known_faction(&self) -> Faction {
        self.ownership.last_known()
    }

    /// Run the periodic refresh if it is due at `now`.
    ///
    /// Returns the ownership edge, if the refresh produced one.
    pub fn update(
        &mut self,
        now: f64,
        sink: &mut dyn NotificationSink,
    ) -> Option<OwnershipChange> {
        if now < self.next_refresh_at {
            return None;
        }
        self.next_refresh_at = now + self.refresh_interval;
        self.refresh_influence(sink)
    }

    /// Recompute ownership now and announce any edge.
    ///
    /// Emits exactly one high-importance event per transition and nothing
    /// when the owner is unchanged.
    pub fn refresh_influence(&mut self, sink: &mut dyn NotificationSink) -> Option<OwnershipChange> {
        let influence = self.normalized_influence();
        let change = self.ownership.observe(Faction::from_influence(influence))?;
        let message = self.ownership_message(change, influence);
        info!(
            block = %self.coord,
            previous = %change.previous,
            current = %change.current,
            influence,
            "Block ownership changed"
        );
        publish_best_effort(
            sink,
            BlockUpdatedEvent::new(self.coord, message, Importance::High),
        );
        Some(change)
    }

    fn ownership_message(&self, change: OwnershipChange, influence: f64) -> String {
        match change.current {
            Faction::Cat | Faction::Dog => {
                format!("The {} have taken {self}.", change.current.plural())
            }
            Faction::Neutral => {
                // The losing side is whoever held the block before.
                let (gaining, losing) = match change.previous {
                    Faction::Dog => (Faction::Cat, Faction::Dog),
                    Faction::Cat | Faction::Neutral => (Faction::Dog, Faction::Cat),
                };
                format!(
                    "The {} have weakened the {}' hold on {self}, it is now a neutral zone (influence: {influence:.2}).",
                    gaining.plural(),
                    losing.plural(),
                )
            }
        }
    }

    // -------------------------------------------------------------------
    // Space
    // -------------------------------------------------------------------

    /// A uniformly random point inside the footprint, at the centre's height.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec3 {
        let dx = (rng.random::<f32>() - 0.5) * self.extent.width;
        let dz = (rng.random::<f32>() - 0.5) * self.extent.depth;
        self.center + Vec3::new(dx, 0.0, dz)
    }

    /// Whether `position` lies over this block's footprint.
    ///
    /// The minimum edges are inclusive and the maximum edges exclusive, so
    /// neighbouring blocks never both claim a point.
    pub const fn contains_point(&self, position: Vec3) -> bool {
        let half_w = self.extent.width / 2.0;
        let half_d = self.extent.depth / 2.0;
        position.x >= self.center.x - half_w
            && position.x < self.center.x + half_w
            && position.z >= self.center.z - half_d
            && position.z < self.center.z + half_d
    }

    // -------------------------------------------------------------------
    // Intruders
    // -------------------------------------------------------------------

    /// Attack orders for the first hostile intruder the sensor reports.
    ///
    /// Only residents of the block's current controlling faction respond.
    /// A neutral block raises no orders, and intruders the owner is not
    /// hostile to are skipped.
    pub fn detect_intruders(&self, sensor: &dyn IntruderSensor) -> Vec<AttackOrder> {
        let owner = self.controlling_faction();
        if owner == Faction::Neutral {
            return Vec::new();
        }
        let Some(sighting) = sensor
            .sightings_in(self.coord)
            .into_iter()
            .find(|sighting| owner.is_hostile_to(sighting.faction))
        else {
            return Vec::new();
        };
        let orders: Vec<AttackOrder> = self
            .residents(owner)
            .map(|agent| AttackOrder {
                agent: *agent,
                target: sighting.id,
            })
            .collect();
        debug!(
            block = %self.coord,
            owner = %owner,
            intruder = %sighting.id,
            defenders = orders.len(),
            "Intruder detected"
        );
        orders
    }

    /// A snapshot of this block for status reports.
    pub fn status(&self) -> BlockStatus {
        BlockStatus {
            coord: self.coord,
            influence: self.normalized_influence(),
            controlling: self.controlling_faction(),
            cats: self.cats.len(),
            dogs: self.dogs.len(),
            cat_priority: self.cat_priority,
            dog_priority: self.dog_priority,
        }
    }
}

impl core::fmt::Display for Block {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Block {}", self.coord)
    }
}

/// Point-in-time summary of a block, rendered as a human-readable report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStatus {
    /// The block.
    pub coord: GridCoord,
    /// Influence balance at snapshot time.
    pub influence: f64,
    /// Owner at snapshot time.
    pub controlling: Faction,
    /// Cat residents.
    pub cats: usize,
    /// Dog residents.
    pub dogs: usize,
    /// Cat director's priority.
    pub cat_priority: Priority,
    /// Dog director's priority.
    pub dog_priority: Priority,
}

impl core::fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(
            f,
            "Block {} influence {:.2} (0 cats, 1 dogs), held by {}",
            self.coord, self.influence, self.controlling
        )?;
        writeln!(f, "  {} cats present, cat priority {:?}", self.cats, self.cat_priority)?;
        write!(f, "  {} dogs present, dog priority {:?}", self.dogs, self.dog_priority)
    }
}
