use std::time::Duration;

use thiserror::Error;

/// Reasons a wait ends without its condition becoming true.
#[derive(Debug, Error)]
pub enum WaitError {
    /// The timeout budget elapsed while the condition was still false.
    ///
    /// `observed` carries the number of matching events seen on the final poll for conditions
    /// which count events.
    #[error(
        "timeout waiting for {condition} after {}{}",
        budget(.timeout),
        observed_suffix(.observed)
    )]
    Timeout {
        condition: String,
        timeout: Duration,
        observed: Option<usize>,
    },

    #[error("cancelled while waiting for {condition}")]
    Cancelled { condition: String },

    /// Querying the event source failed. The error is handed through untouched.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}

impl WaitError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }
}

/// Whole milliseconds where possible, sub-millisecond budgets keep their precision.
fn budget(timeout: &Duration) -> String {
    if timeout.is_zero() || *timeout >= Duration::from_millis(1) {
        format!("{}ms", timeout.as_millis())
    } else {
        format!("{timeout:?}")
    }
}

fn observed_suffix(observed: &Option<usize>) -> String {
    match observed {
        Some(count) => format!(" (got {count})"),
        None => String::new(),
    }
}
