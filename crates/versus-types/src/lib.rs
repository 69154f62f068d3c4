//! Shared type definitions for the Versus faction simulation.
//!
//! This crate is the single source of truth for the types exchanged between
//! the world, agent and orchestration crates. Observable types flow
//! downstream to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for agents, intruders and devices
//! - [`enums`] -- Faction, priority, agent state and importance enumerations
//! - [`geometry`] -- World-space vectors, grid coordinates and grid bounds
//! - [`time`] -- The [`Clock`] contract and per-tick [`TickTime`] readings
//! - [`events`] -- Notification records and the [`NotificationSink`] contract

pub mod enums;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod time;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AgentState, CAT_CONTROL_THRESHOLD, DOG_CONTROL_THRESHOLD, Faction, Importance, Priority,
};
pub use events::{
    AgentActionEvent, BlockUpdatedEvent, FanOutSink, NotificationSink, NotifyError, NullSink,
    RecordingSink, VersusEvent,
};
pub use geometry::{GridBounds, GridCoord, Vec3};
pub use ids::{AgentId, DeviceId, IntruderId};
pub use time::{Clock, TickTime};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation for observable types.

    #[test]
    fn export_bindings() {
        // Files are written to the `bindings/` directory relative to the
        // crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::AgentId::export_all();
        let _ = crate::ids::IntruderId::export_all();
        let _ = crate::ids::DeviceId::export_all();

        // Enums
        let _ = crate::enums::Faction::export_all();
        let _ = crate::enums::Priority::export_all();
        let _ = crate::enums::AgentState::export_all();
        let _ = crate::enums::Importance::export_all();

        // Geometry
        let _ = crate::geometry::Vec3::export_all();
        let _ = crate::geometry::GridCoord::export_all();

        // Events
        let _ = crate::events::AgentActionEvent::export_all();
        let _ = crate::events::BlockUpdatedEvent::export_all();
        let _ = crate::events::VersusEvent::export_all();
    }
}
