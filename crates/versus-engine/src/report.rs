//! Progress reporting for a headless run.
//!
//! [`ProgressCallback`] logs a territory summary every few ticks.
//! [`tally_events`] listens on the broadcast sink and counts notifications
//! by importance until the simulation drops its end of the channel.

use tokio::sync::broadcast::{Receiver, error::RecvError};
use tracing::info;
use versus_core::runner::TickCallback;
use versus_core::tick::{SimulationState, TickSummary};
use versus_types::{Faction, Importance, VersusEvent};

/// Logs a summary line every `every` ticks.
#[derive(Debug, Clone, Copy)]
pub struct ProgressCallback {
    every: u64,
}

impl ProgressCallback {
    /// Report every `every` ticks. Zero disables reporting.
    pub const fn new(every: u64) -> Self {
        Self { every }
    }
}

impl TickCallback for ProgressCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if summary.tick.checked_rem(self.every) != Some(0) {
            return;
        }
        let owned = |faction: Faction| {
            state
                .grid
                .blocks()
                .filter(|block| block.last_known_faction() == faction)
                .count()
        };
        info!(
            tick = summary.tick,
            elapsed = summary.elapsed,
            cats = summary.cats_alive,
            dogs = summary.dogs_alive,
            cat_blocks = owned(Faction::Cat),
            dog_blocks = owned(Faction::Dog),
            neutral_blocks = owned(Faction::Neutral),
            devices = state.devices.placed().len(),
            intruders = summary.intruders_remaining,
            "Progress"
        );
    }
}

/// Notification counts seen by an observer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventTally {
    /// High-importance events.
    pub high: u64,
    /// Medium-importance events.
    pub medium: u64,
    /// Low-importance events.
    pub low: u64,
    /// Events the observer fell too far behind to see.
    pub lagged: u64,
}

impl EventTally {
    fn record(&mut self, event: &VersusEvent) {
        let slot = match event.importance() {
            Importance::High => &mut self.high,
            Importance::Medium => &mut self.medium,
            Importance::Low => &mut self.low,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Count every event received until the channel closes.
pub async fn tally_events(mut receiver: Receiver<VersusEvent>) -> EventTally {
    let mut tally = EventTally::default();
    loop {
        match receiver.recv().await {
            Ok(event) => tally.record(&event),
            Err(RecvError::Lagged(missed)) => tally.lagged = tally.lagged.saturating_add(missed),
            Err(RecvError::Closed) => return tally,
        }
    }
}
