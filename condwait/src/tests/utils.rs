use std::sync::Arc;
use std::time::Duration;

use condwait_core::{Event, InMemoryEventSource, StreamId};
use serde_json::Value;
use tokio::task::JoinHandle;

pub fn stream(name: &str) -> StreamId {
    name.parse().expect("valid stream id")
}

pub fn event(event_type: &str, data: Value) -> Event {
    Event::new(event_type.parse().expect("valid event type"), data)
}

/// Appends `event` to `stream_id` once `delay` has passed, simulating a runtime recording
/// progress in the background.
pub fn append_after(
    source: &Arc<InMemoryEventSource>,
    stream_id: &StreamId,
    event: Event,
    delay: Duration,
) -> JoinHandle<()> {
    let source = source.clone();
    let stream_id = stream_id.clone();
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        source.append(&stream_id, event);
    })
}
