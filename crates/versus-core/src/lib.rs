//! Simulation clock, tick cycle, and orchestration for the Versus simulation.
//!
//! This crate owns the phased tick cycle that drives the simulation:
//! Clock, Blocks, Agents, Region entry, and Departures. It also provides
//! reference implementations of the collaborator contracts declared by the
//! world and agent crates.
//!
//! # Modules
//!
//! - [`clock`] -- Fixed-step simulation clock.
//! - [`config`] -- Configuration loading from `versus-config.yaml` into
//!   strongly-typed structs.
//! - [`devices`] -- [`DeviceLedger`], recording planted repellent devices.
//! - [`intruders`] -- [`IntruderTracker`], the intruder sensor and attack
//!   target store.
//! - [`runner`] -- Async run loop with tick bounds and pacing.
//! - [`sinks`] -- Tracing, broadcast, and JSON-lines notification sinks.
//! - [`tick`] -- The tick cycle itself.
//!
//! [`DeviceLedger`]: devices::DeviceLedger
//! [`IntruderTracker`]: intruders::IntruderTracker

pub mod clock;
pub mod config;
pub mod devices;
pub mod intruders;
pub mod runner;
pub mod sinks;
pub mod tick;
