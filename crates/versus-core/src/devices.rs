//! Reference device ledger.
//!
//! Records every repellent device agents plant. Placement costs the same
//! for both factions and always succeeds.

use tracing::debug;
use versus_agents::DeviceFactory;
use versus_types::{AgentId, DeviceId, Faction, Vec3};

/// One planted device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedDevice {
    /// Stable handle.
    pub id: DeviceId,
    /// The agent that planted it.
    pub owner: AgentId,
    /// The owner's faction.
    pub faction: Faction,
    /// Where it sits.
    pub position: Vec3,
    /// Simulation time of placement.
    pub placed_at: f64,
}

/// Every device planted so far, in placement order.
#[derive(Debug, Clone, Default)]
pub struct DeviceLedger {
    cost: f32,
    placed: Vec<PlacedDevice>,
}

impl DeviceLedger {
    /// An empty ledger charging `cost` repellent per device.
    pub const fn new(cost: f32) -> Self {
        Self {
            cost,
            placed: Vec::new(),
        }
    }

    /// Every device, oldest first.
    pub fn placed(&self) -> &[PlacedDevice] {
        &self.placed
    }

    /// Devices planted by `faction`.
    pub fn count_for(&self, faction: Faction) -> usize {
        self.placed
            .iter()
            .filter(|device| device.faction == faction)
            .count()
    }
}

impl DeviceFactory for DeviceLedger {
    fn device_cost(&self, _faction: Faction) -> f32 {
        self.cost
    }

    fn spawn_device(&mut self, owner: AgentId, faction: Faction, position: Vec3, now: f64) -> f32 {
        let id = DeviceId::new();
        self.placed.push(PlacedDevice {
            id,
            owner,
            faction,
            position,
            placed_at: now,
        });
        debug!(device = %id, owner = %owner, faction = %faction, position = %position, "Device placed");
        self.cost
    }
}
