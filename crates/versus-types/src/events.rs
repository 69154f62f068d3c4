//! Notification records and the sink contract observers implement.
//!
//! Blocks and agents broadcast what they do as immutable [`VersusEvent`]
//! values. Nothing inside the simulation consumes these; they exist for
//! observers (logs, dashboards, tests). Delivery is fire-and-forget: a sink
//! may fail, and emitters log the failure and carry on.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Importance;
use crate::geometry::GridCoord;
use crate::ids::AgentId;

/// Something an agent did that observers may want to narrate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentActionEvent {
    /// The acting agent.
    pub agent: AgentId,
    /// Human-readable narration.
    pub message: String,
    /// Importance tier.
    pub importance: Importance,
}

impl AgentActionEvent {
    /// Build an event at the given importance.
    pub fn new(agent: AgentId, message: impl Into<String>, importance: Importance) -> Self {
        Self {
            agent,
            message: message.into(),
            importance,
        }
    }
}

/// A change to a block's residents or ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BlockUpdatedEvent {
    /// The block that changed.
    pub block: GridCoord,
    /// Human-readable narration.
    pub message: String,
    /// Importance tier.
    pub importance: Importance,
}

impl BlockUpdatedEvent {
    /// Build an event at the given importance.
    pub fn new(block: GridCoord, message: impl Into<String>, importance: Importance) -> Self {
        Self {
            block,
            message: message.into(),
            importance,
        }
    }
}

/// Any notification broadcast by the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VersusEvent {
    /// Emitted by an agent.
    AgentAction(AgentActionEvent),
    /// Emitted by a block.
    BlockUpdated(BlockUpdatedEvent),
}

impl VersusEvent {
    /// Importance of the wrapped event.
    pub const fn importance(&self) -> Importance {
        match self {
            Self::AgentAction(e) => e.importance,
            Self::BlockUpdated(e) => e.importance,
        }
    }

    /// Narration of the wrapped event.
    pub fn message(&self) -> &str {
        match self {
            Self::AgentAction(e) => &e.message,
            Self::BlockUpdated(e) => &e.message,
        }
    }
}

impl From<AgentActionEvent> for VersusEvent {
    fn from(event: AgentActionEvent) -> Self {
        Self::AgentAction(event)
    }
}

impl From<BlockUpdatedEvent> for VersusEvent {
    fn from(event: BlockUpdatedEvent) -> Self {
        Self::BlockUpdated(event)
    }
}

// ---------------------------------------------------------------------------
// Sinks
// ---------------------------------------------------------------------------

/// Errors a sink may report. Emitters never propagate these.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The observer on the other end has gone away.
    #[error("notification channel closed: {reason}")]
    Closed {
        /// Why the channel is unusable.
        reason: String,
    },

    /// The sink could not encode or write the event.
    #[error("failed to deliver notification: {reason}")]
    Delivery {
        /// Description of the failure.
        reason: String,
    },

    /// Some observers in a fan-out failed.
    #[error("{failed} of {total} observers failed to receive the notification")]
    Partial {
        /// Number of observers that returned an error.
        failed: usize,
        /// Number of observers attempted.
        total: usize,
    },
}

/// Receiver of simulation notifications.
pub trait NotificationSink {
    /// Deliver one event.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the event could not be delivered. Callers
    /// treat this as non-fatal.
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError>;
}

/// A sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn publish(&mut self, _event: &VersusEvent) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// A sink that keeps every event in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Vec<VersusEvent>,
}

impl RecordingSink {
    /// Create an empty recorder.
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Everything recorded so far.
    pub fn events(&self) -> &[VersusEvent] {
        &self.events
    }

    /// Only the block events.
    pub fn block_events(&self) -> impl Iterator<Item = &BlockUpdatedEvent> {
        self.events.iter().filter_map(|e| match e {
            VersusEvent::BlockUpdated(b) => Some(b),
            VersusEvent::AgentAction(_) => None,
        })
    }

    /// Only the agent events.
    pub fn agent_events(&self) -> impl Iterator<Item = &AgentActionEvent> {
        self.events.iter().filter_map(|e| match e {
            VersusEvent::AgentAction(a) => Some(a),
            VersusEvent::BlockUpdated(_) => None,
        })
    }

    /// Drop everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError> {
        self.events.push(event.clone());
        Ok(())
    }
}

/// Delivers each event to every registered observer.
///
/// A failing observer does not stop delivery to the others.
#[derive(Default)]
pub struct FanOutSink {
    observers: Vec<Box<dyn NotificationSink + Send>>,
}

impl FanOutSink {
    /// Create a fan-out with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn subscribe(&mut self, observer: Box<dyn NotificationSink + Send>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether no observers are registered.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl core::fmt::Debug for FanOutSink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FanOutSink")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl NotificationSink for FanOutSink {
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError> {
        let total = self.observers.len();
        let failed = self
            .observers
            .iter_mut()
            .map(|observer| observer.publish(event))
            .filter(Result::is_err)
            .count();
        if failed == 0 {
            Ok(())
        } else {
            Err(NotifyError::Partial { failed, total })
        }
    }
}
