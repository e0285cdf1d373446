use condwait_core::{Event, EventType};

use super::types::{Condition, Evaluation};

/// Holds once any event of the given type is present. Resolves with the first one.
#[derive(Clone, Debug)]
pub struct EventOfType {
    event_type: EventType,
}

impl EventOfType {
    pub fn new(event_type: EventType) -> Self {
        Self { event_type }
    }
}

impl Condition for EventOfType {
    type Output = Event;

    fn evaluate(&self, events: Vec<Event>) -> Evaluation<Event> {
        match events
            .into_iter()
            .find(|event| event.is_type(&self.event_type))
        {
            Some(event) => Evaluation::Satisfied(event),
            None => Evaluation::Pending { observed: None },
        }
    }

    fn describe(&self) -> String {
        format!("{} event", self.event_type)
    }
}

/// Holds once at least `count` events of the given type are present.
///
/// Resolves with every matching event of the snapshot in stream order, which can be more than
/// `count`. Matches are filtered from scratch on each poll, never accumulated.
#[derive(Clone, Debug)]
pub struct EventCount {
    event_type: EventType,
    count: usize,
}

impl EventCount {
    pub fn new(event_type: EventType, count: usize) -> Self {
        Self { event_type, count }
    }
}

impl Condition for EventCount {
    type Output = Vec<Event>;

    fn evaluate(&self, events: Vec<Event>) -> Evaluation<Vec<Event>> {
        let matching: Vec<Event> = events
            .into_iter()
            .filter(|event| event.is_type(&self.event_type))
            .collect();

        if matching.len() >= self.count {
            Evaluation::Satisfied(matching)
        } else {
            Evaluation::Pending {
                observed: Some(matching.len()),
            }
        }
    }

    fn describe(&self) -> String {
        format!("{} {} events", self.count, self.event_type)
    }
}

/// Holds once any event satisfies `predicate`. Resolves with the first one.
///
/// Closures can't be printed, so the caller supplies a `description` which is used verbatim in
/// timeout errors.
pub struct EventMatch<P> {
    predicate: P,
    description: String,
}

impl<P> EventMatch<P>
where
    P: Fn(&Event) -> bool,
{
    pub fn new(predicate: P, description: impl Into<String>) -> Self {
        Self {
            predicate,
            description: description.into(),
        }
    }
}

impl<P> Condition for EventMatch<P>
where
    P: Fn(&Event) -> bool,
{
    type Output = Event;

    fn evaluate(&self, events: Vec<Event>) -> Evaluation<Event> {
        match events.into_iter().find(|event| (self.predicate)(event)) {
            Some(event) => Evaluation::Satisfied(event),
            None => Evaluation::Pending { observed: None },
        }
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn event(event_type: &str, data: Value) -> Event {
        Event::new(event_type.parse().unwrap(), data)
    }

    fn tool_call() -> EventType {
        "TOOL_CALL".parse().unwrap()
    }

    #[test]
    fn event_of_type_returns_first_match() {
        let condition = EventOfType::new(tool_call());
        let events = vec![
            event("AGENT_MESSAGE", Value::Null),
            event("TOOL_CALL", json!({ "id": "call_1" })),
            event("TOOL_CALL", json!({ "id": "call_2" })),
        ];

        let Evaluation::Satisfied(found) = condition.evaluate(events) else {
            panic!("expected a match");
        };
        assert_eq!(found.data["id"], "call_1");
    }

    #[test]
    fn event_of_type_pending() {
        let condition = EventOfType::new(tool_call());
        assert_eq!(
            condition.evaluate(vec![event("AGENT_MESSAGE", Value::Null)]),
            Evaluation::Pending { observed: None }
        );
        assert_eq!(condition.describe(), "TOOL_CALL event");
    }

    #[test]
    fn event_count_below_threshold_reports_observed() {
        let condition = EventCount::new(tool_call(), 2);
        let events = vec![
            event("TOOL_CALL", Value::Null),
            event("TOOL_RESULT", Value::Null),
        ];
        assert_eq!(
            condition.evaluate(events),
            Evaluation::Pending { observed: Some(1) }
        );
        assert_eq!(condition.describe(), "2 TOOL_CALL events");
    }

    #[test]
    fn event_count_returns_all_matches_in_order() {
        let condition = EventCount::new(tool_call(), 2);
        let events = vec![
            event("TOOL_CALL", json!({ "id": "call_1" })),
            event("TOOL_RESULT", json!({ "id": "call_1" })),
            event("TOOL_CALL", json!({ "id": "call_2" })),
            event("TOOL_CALL", json!({ "id": "call_3" })),
        ];

        let Evaluation::Satisfied(found) = condition.evaluate(events) else {
            panic!("expected threshold to be reached");
        };
        let ids: Vec<&Value> = found.iter().map(|event| &event.data["id"]).collect();
        assert_eq!(ids, vec!["call_1", "call_2", "call_3"]);
    }

    #[test]
    fn event_count_of_zero_always_holds() {
        let condition = EventCount::new(tool_call(), 0);
        assert_eq!(condition.evaluate(vec![]), Evaluation::Satisfied(vec![]));
    }

    #[test]
    fn event_match_uses_predicate_and_description() {
        let condition = EventMatch::new(
            |event: &Event| event.event_type.as_str() == "TOOL_RESULT" && event.data["id"] == "call_123",
            "TOOL_RESULT with id=call_123",
        );
        let events = vec![
            event("TOOL_RESULT", json!({ "id": "call_122" })),
            event("TOOL_RESULT", json!({ "id": "call_123", "output": "ok" })),
        ];

        let Evaluation::Satisfied(found) = condition.evaluate(events) else {
            panic!("expected a match");
        };
        assert_eq!(found.data["output"], "ok");
        assert_eq!(condition.describe(), "TOOL_RESULT with id=call_123");
    }
}
