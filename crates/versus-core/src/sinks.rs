//! Notification sinks for observers outside the simulation.
//!
//! - [`TracingSink`] writes each event to the log at a level derived from
//!   its importance.
//! - [`BroadcastSink`] forwards events to async subscribers over a tokio
//!   broadcast channel.
//! - [`JsonLinesSink`] writes one JSON object per line to any writer.
//!
//! Combine several with [`versus_types::FanOutSink`].

use std::io::Write;

use tokio::sync::broadcast;
use tracing::{debug, info, trace};
use versus_types::{Importance, NotificationSink, NotifyError, VersusEvent};

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Logs every event through `tracing`.
///
/// High importance maps to `info`, Medium to `debug`, Low to `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError> {
        let (source, kind) = match event {
            VersusEvent::AgentAction(e) => (e.agent.to_string(), "agent_action"),
            VersusEvent::BlockUpdated(e) => (e.block.to_string(), "block_updated"),
        };
        let message = event.message();
        match event.importance() {
            Importance::High => info!(kind, source = %source, "{message}"),
            Importance::Medium => debug!(kind, source = %source, "{message}"),
            Importance::Low => trace!(kind, source = %source, "{message}"),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

/// Forwards events to every subscriber of a tokio broadcast channel.
///
/// Slow subscribers lag and lose the oldest events; the simulation never
/// waits for them.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<VersusEvent>,
}

impl BroadcastSink {
    /// Create a channel buffering up to `capacity` events per subscriber,
    /// along with its first receiver.
    pub fn new(capacity: usize) -> (Self, broadcast::Receiver<VersusEvent>) {
        let (sender, receiver) = broadcast::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    /// Add another receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<VersusEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl NotificationSink for BroadcastSink {
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError> {
        self.sender
            .send(event.clone())
            .map(|_| ())
            .map_err(|e| NotifyError::Closed {
                reason: format!("no broadcast subscribers: {e}"),
            })
    }
}

// ---------------------------------------------------------------------------
// JSON lines
// ---------------------------------------------------------------------------

/// Writes each event as a single line of JSON.
#[derive(Debug)]
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    /// Wrap `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> NotificationSink for JsonLinesSink<W> {
    fn publish(&mut self, event: &VersusEvent) -> Result<(), NotifyError> {
        serde_json::to_writer(&mut self.writer, event).map_err(|e| NotifyError::Delivery {
            reason: e.to_string(),
        })?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| NotifyError::Delivery {
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use versus_types::{AgentActionEvent, AgentId, BlockUpdatedEvent, GridCoord};

    fn block_event() -> VersusEvent {
        BlockUpdatedEvent::new(GridCoord::new(0, 1), "The cats have taken Block (0, 1).", Importance::High)
            .into()
    }

    #[test]
    fn tracing_sink_accepts_every_tier() {
        let mut sink = TracingSink;
        for importance in [Importance::Low, Importance::Medium, Importance::High] {
            let event = AgentActionEvent::new(AgentId::new(), "moved", importance).into();
            assert!(sink.publish(&event).is_ok());
        }
    }

    #[test]
    fn json_lines_writes_one_object_per_line() {
        let mut sink = JsonLinesSink::new(Vec::new());
        sink.publish(&block_event()).unwrap();
        sink.publish(&block_event()).unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: VersusEvent = serde_json::from_str(lines.first().unwrap()).unwrap();
        assert_eq!(parsed, block_event());
    }

    #[test]
    fn broadcast_delivers_to_subscribers() {
        let (mut sink, mut first) = BroadcastSink::new(8);
        let mut second = sink.subscribe();
        sink.publish(&block_event()).unwrap();
        assert_eq!(first.try_recv().unwrap(), block_event());
        assert_eq!(second.try_recv().unwrap(), block_event());
    }

    #[test]
    fn broadcast_without_subscribers_reports_closed() {
        let (mut sink, receiver) = BroadcastSink::new(8);
        drop(receiver);
        assert_eq!(sink.receiver_count(), 0);
        assert!(matches!(
            sink.publish(&block_event()),
            Err(NotifyError::Closed { reason }) if reason.contains("channel closed")
        ));
    }
}
