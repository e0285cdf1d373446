use std::sync::Arc;

use anyhow::Result;

use crate::{Event, StreamId};

/// Read access to the event streams recorded by a runtime.
///
/// This is the only capability condwait needs from the system it observes. Implementations must
/// return every event appended before the call began, in insertion order, and must be safe to
/// call repeatedly and concurrently without side effects.
///
/// # Errors
///
/// An error returned from [`EventSource::events`] is treated as a defect of the source: waiters
/// abort and hand it back to their caller unchanged instead of retrying.
pub trait EventSource: Send + Sync {
    /// Returns a snapshot of all events currently recorded for `stream_id`.
    ///
    /// Unknown streams yield an empty snapshot.
    fn events(&self, stream_id: &StreamId) -> Result<Vec<Event>>;
}

impl<T: EventSource + ?Sized> EventSource for &T {
    fn events(&self, stream_id: &StreamId) -> Result<Vec<Event>> {
        (**self).events(stream_id)
    }
}

impl<T: EventSource + ?Sized> EventSource for Arc<T> {
    fn events(&self, stream_id: &StreamId) -> Result<Vec<Event>> {
        (**self).events(stream_id)
    }
}
