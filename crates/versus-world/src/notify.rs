//! Best-effort event delivery.

use tracing::warn;
use versus_types::{NotificationSink, VersusEvent};

/// Publish `event`, logging and swallowing any sink failure.
///
/// Notifications are a side channel; a broken observer must never abort
/// the tick that produced the event.
pub fn publish_best_effort(sink: &mut dyn NotificationSink, event: impl Into<VersusEvent>) {
    let event = event.into();
    if let Err(err) = sink.publish(&event) {
        warn!(error = %err, message = event.message(), "Dropped simulation notification");
    }
}
