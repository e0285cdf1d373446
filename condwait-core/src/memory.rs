use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use dashmap::DashMap;
use tracing::{debug, trace};

use crate::{Event, EventSource, StreamId};

/// In-process event store standing in for a thread manager.
///
/// Each stream is an append-only `Vec<Event>` behind a `DashMap` shard lock, so snapshots taken
/// by [`EventSource::events`] always contain every event appended before the query started and
/// appends from other tasks never reorder existing events.
///
/// Queries can be made to fail on purpose with [`InMemoryEventSource::enable_query_error`] to
/// simulate a broken runtime.
///
/// # Methods
///
/// * `append` - Records an event at the end of a stream, creating the stream on first use.
/// * `stream_len` - Returns the number of events recorded for a stream.
/// * `clear` - Drops all events of a stream.
/// * `enable_query_error` / `disable_query_error` - Toggles simulated query failures.
///
#[derive(Debug, Default)]
pub struct InMemoryEventSource {
    streams: DashMap<StreamId, Vec<Event>>,
    query_error: AtomicBool,
}

impl InMemoryEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, stream_id: &StreamId, event: Event) {
        debug!(%stream_id, event_type = %event.event_type, "append event");
        self.streams
            .entry(stream_id.clone())
            .or_default()
            .push(event);
    }

    pub fn stream_len(&self, stream_id: &StreamId) -> usize {
        self.streams
            .get(stream_id)
            .map(|events| events.len())
            .unwrap_or(0)
    }

    pub fn clear(&self, stream_id: &StreamId) {
        self.streams.remove(stream_id);
    }

    pub fn enable_query_error(&self) {
        self.query_error.store(true, Ordering::SeqCst);
    }

    pub fn disable_query_error(&self) {
        self.query_error.store(false, Ordering::SeqCst);
    }
}

impl EventSource for InMemoryEventSource {
    fn events(&self, stream_id: &StreamId) -> Result<Vec<Event>> {
        if self.query_error.load(Ordering::SeqCst) {
            bail!("event source unavailable while querying stream {stream_id}");
        }
        let snapshot = self
            .streams
            .get(stream_id)
            .map(|events| events.clone())
            .unwrap_or_default();
        trace!(%stream_id, len = snapshot.len(), "snapshot");
        Ok(snapshot)
    }
}
