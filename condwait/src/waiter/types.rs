use condwait_core::Event;

/// Outcome of evaluating a [`Condition`] against one snapshot.
///
/// * `Satisfied(T)` - The condition holds, the wait resolves with `T`.
/// * `Pending { observed }` - The condition does not hold yet. `observed` optionally reports how
///   many matching events were present, which ends up in the timeout message.
#[derive(Debug, PartialEq)]
pub enum Evaluation<T> {
    Satisfied(T),
    Pending { observed: Option<usize> },
}

/// A success condition evaluated on every poll.
///
/// Implementations receive a fresh snapshot of the whole stream each time and must not keep state
/// between calls: the result of a poll depends only on the snapshot it was given.
///
/// # Methods
///
/// * `evaluate` - Checks the snapshot and returns the value to resolve with, if any.
/// * `describe` - Human readable name of what is being waited for, used in errors and logs.
///
pub trait Condition {
    type Output;

    fn evaluate(&self, events: Vec<Event>) -> Evaluation<Self::Output>;

    fn describe(&self) -> String;
}
