//! Polling engine which waits for conditions on event streams.
//!
//! A wait fetches a snapshot of the stream, evaluates its [`Condition`] and either resolves,
//! fails with [`WaitError::Timeout`], or sleeps for [`POLL_INTERVAL`] and tries again. The first
//! poll happens immediately, so conditions which already hold resolve without any delay. The
//! pause before the final poll is shortened to whatever is left of the budget.

pub mod clock;
pub mod conditions;
pub mod types;

use std::time::Duration;

use condwait_core::{Event, EventSource, EventType, StreamId};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::WaitError;

pub use clock::{Clock, TokioClock};
pub use conditions::{EventCount, EventMatch, EventOfType};
pub use types::{Condition, Evaluation};

/// Delay between two polls of the same wait.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Timeout budget used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Waits for conditions to become true on the streams of an [`EventSource`].
///
/// A waiter holds no state about the streams it observes, every call starts an independent poll
/// loop. Calls can therefore run concurrently on the same waiter.
///
/// # Type Parameters
///
/// * `S` - The event source to query, e.g. `Arc<InMemoryEventSource>` or a reference to one.
/// * `C` - The clock measuring the timeout budget and pausing between polls.
///
/// # Termination
///
/// A wait ends when
///
/// - the condition holds on a poll (success wins over timeout on the same poll),
/// - the elapsed time reached the timeout budget on a poll where the condition did not hold,
/// - the event source returned an error, which is passed through as [`WaitError::Source`],
/// - the optional cancellation token fired, or
/// - the future is dropped.
///
/// A zero timeout checks the condition exactly once.
#[derive(Debug)]
pub struct ConditionWaiter<S, C = TokioClock> {
    source: S,
    clock: C,
    timeout: Duration,
    cancellation_token: Option<CancellationToken>,
}

impl<S> ConditionWaiter<S>
where
    S: EventSource,
{
    pub fn new(source: S) -> Self {
        Self {
            source,
            clock: TokioClock,
            timeout: DEFAULT_TIMEOUT,
            cancellation_token: None,
        }
    }

    pub fn from_config(source: S, config: &Config) -> Self {
        Self::new(source).with_timeout(config.timeout())
    }
}

impl<S, C> ConditionWaiter<S, C>
where
    S: EventSource,
    C: Clock,
{
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stops all waits of this waiter as soon as `cancellation_token` is cancelled.
    pub fn with_cancellation(mut self, cancellation_token: CancellationToken) -> Self {
        self.cancellation_token = Some(cancellation_token);
        self
    }

    pub fn with_clock<K: Clock>(self, clock: K) -> ConditionWaiter<S, K> {
        ConditionWaiter {
            source: self.source,
            clock,
            timeout: self.timeout,
            cancellation_token: self.cancellation_token,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Waits for the first event of `event_type` on the stream.
    pub async fn wait_for_event(
        &self,
        stream_id: &StreamId,
        event_type: &EventType,
    ) -> Result<Event, WaitError> {
        self.wait_until(stream_id, EventOfType::new(event_type.clone()))
            .await
    }

    /// Waits until at least `count` events of `event_type` exist on the stream.
    ///
    /// Resolves with all matching events in stream order at the moment the threshold was
    /// reached. On timeout the error reports how many were seen on the last poll.
    pub async fn wait_for_event_count(
        &self,
        stream_id: &StreamId,
        event_type: &EventType,
        count: usize,
    ) -> Result<Vec<Event>, WaitError> {
        self.wait_until(stream_id, EventCount::new(event_type.clone(), count))
            .await
    }

    /// Waits for the first event satisfying `predicate`.
    ///
    /// `description` names the awaited event in timeout errors, e.g. `TOOL_RESULT with id=call_123`.
    pub async fn wait_for_event_match<P>(
        &self,
        stream_id: &StreamId,
        predicate: P,
        description: &str,
    ) -> Result<Event, WaitError>
    where
        P: Fn(&Event) -> bool,
    {
        self.wait_until(stream_id, EventMatch::new(predicate, description))
            .await
    }

    /// Polls the stream until `condition` holds and resolves with its output.
    pub async fn wait_until<T>(
        &self,
        stream_id: &StreamId,
        condition: T,
    ) -> Result<T::Output, WaitError>
    where
        T: Condition,
    {
        let start = self.clock.now();
        let mut polls: usize = 0;
        debug!(
            %stream_id,
            timeout = ?self.timeout,
            "waiting for {}",
            condition.describe()
        );

        loop {
            if self.is_cancelled() {
                return Err(self.cancelled(stream_id, &condition));
            }

            polls += 1;
            let snapshot = self.source.events(stream_id)?;
            let observed = match condition.evaluate(snapshot) {
                Evaluation::Satisfied(output) => {
                    debug!(
                        %stream_id,
                        polls,
                        elapsed = ?self.clock.now().saturating_duration_since(start),
                        "{} observed",
                        condition.describe()
                    );
                    return Ok(output);
                }
                Evaluation::Pending { observed } => observed,
            };

            let elapsed = self.clock.now().saturating_duration_since(start);
            if elapsed >= self.timeout {
                warn!(
                    %stream_id,
                    polls,
                    ?elapsed,
                    "gave up waiting for {}",
                    condition.describe()
                );
                return Err(WaitError::Timeout {
                    condition: condition.describe(),
                    timeout: self.timeout,
                    observed,
                });
            }

            trace!(%stream_id, polls, ?elapsed, ?observed, "condition pending");

            // Never sleep past the budget, the last poll lands exactly on it.
            let pause = POLL_INTERVAL.min(self.timeout - elapsed);
            match &self.cancellation_token {
                Some(token) => {
                    tokio::select! {
                        biased;
                        _ = token.cancelled() => {
                            return Err(self.cancelled(stream_id, &condition));
                        }
                        _ = self.clock.sleep(pause) => {}
                    }
                }
                None => self.clock.sleep(pause).await,
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }

    fn cancelled<T: Condition>(&self, stream_id: &StreamId, condition: &T) -> WaitError {
        warn!(%stream_id, "cancelled waiting for {}", condition.describe());
        WaitError::Cancelled {
            condition: condition.describe(),
        }
    }
}

/// Waits for the first event of `event_type`, failing after `timeout`.
pub async fn wait_for_event<S: EventSource>(
    source: S,
    stream_id: &StreamId,
    event_type: &EventType,
    timeout: Duration,
) -> Result<Event, WaitError> {
    ConditionWaiter::new(source)
        .with_timeout(timeout)
        .wait_for_event(stream_id, event_type)
        .await
}

/// Waits until `count` events of `event_type` exist, failing after `timeout`.
pub async fn wait_for_event_count<S: EventSource>(
    source: S,
    stream_id: &StreamId,
    event_type: &EventType,
    count: usize,
    timeout: Duration,
) -> Result<Vec<Event>, WaitError> {
    ConditionWaiter::new(source)
        .with_timeout(timeout)
        .wait_for_event_count(stream_id, event_type, count)
        .await
}

/// Waits for the first event satisfying `predicate`, failing after `timeout`.
pub async fn wait_for_event_match<S, P>(
    source: S,
    stream_id: &StreamId,
    predicate: P,
    description: &str,
    timeout: Duration,
) -> Result<Event, WaitError>
where
    S: EventSource,
    P: Fn(&Event) -> bool,
{
    ConditionWaiter::new(source)
        .with_timeout(timeout)
        .wait_for_event_match(stream_id, predicate, description)
        .await
}
