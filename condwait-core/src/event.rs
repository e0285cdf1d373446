use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Discriminant tag of an event, for example `TOOL_CALL` or `AGENT_MESSAGE`.
///
/// The set of tags is defined by the runtime producing the events, condwait only compares them
/// for equality.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventType(String);

impl EventType {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventType {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            bail!("can't have empty event type");
        }
        Ok(Self(value.to_owned()))
    }
}

/// Immutable fact recorded on an event stream.
///
/// Events are append-only: once a runtime has recorded one it is never mutated or removed, which
/// is what makes polling a snapshot a sound way to observe progress.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// Creates an event stamped with the current time.
    pub fn new(event_type: EventType, data: Value) -> Self {
        Self {
            event_type,
            data,
            timestamp: Utc::now(),
        }
    }

    pub fn is_type(&self, event_type: &EventType) -> bool {
        &self.event_type == event_type
    }
}
