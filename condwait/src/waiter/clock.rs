use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

/// Time source used by waiters to measure elapsed time and to pause between polls.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Clock backed by `tokio::time`.
///
/// Honours Tokio's paused test clock, so waits under `#[tokio::test(start_paused = true)]`
/// complete without spending wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
