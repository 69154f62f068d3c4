//! The device-placement contract.

use versus_types::{AgentId, Faction, Vec3};

/// Creates repellent devices on behalf of agents.
pub trait DeviceFactory {
    /// Repellent an agent of `faction` needs before it can place a device.
    fn device_cost(&self, faction: Faction) -> f32;

    /// Place a device at `position` and return the repellent it consumed.
    fn spawn_device(&mut self, owner: AgentId, faction: Faction, position: Vec3, now: f64) -> f32;
}
