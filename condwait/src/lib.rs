//! Condition-based waiting for tests of asynchronous agent runtimes.
//!
//! Instead of sleeping for a guessed duration, a test asks a [`ConditionWaiter`] to poll the
//! runtime's event stream until the state it depends on is observable:
//!
//! ```rust,ignore
//! let waiter = ConditionWaiter::new(thread_manager.clone());
//! let calls = waiter.wait_for_event_count(&thread_id, &"TOOL_CALL".parse()?, 2).await?;
//! agent.abort();
//! waiter.wait_for_event_count(&thread_id, &"TOOL_RESULT".parse()?, 2).await?;
//! ```

pub mod config;
pub mod error;
pub mod tracing;
pub mod waiter;

pub use condwait_core::{Event, EventSource, EventType, InMemoryEventSource, StreamId};
pub use error::WaitError;
pub use waiter::{
    wait_for_event, wait_for_event_count, wait_for_event_match, Clock, Condition,
    ConditionWaiter, Evaluation, TokioClock, DEFAULT_TIMEOUT, POLL_INTERVAL,
};

#[cfg(test)]
mod tests;
