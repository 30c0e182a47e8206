//! Condition functions for dynamic child selection.
//!
//! A condition picks which child of a cluster state to enter when the
//! transition did not name one explicitly. It is consulted ahead of history
//! and the default child.

use super::event::{Event, Trigger};
use std::fmt;

/// Pure selector returning the name of the child to enter.
///
/// # Example
///
/// ```rust
/// use harel::core::{Condition, Event, Trigger};
///
/// #[derive(Clone, Debug)]
/// struct Ping;
///
/// impl Event for Ping {
///     fn name(&self) -> &str {
///         "Ping"
///     }
/// }
///
/// let by_count = Condition::new(|count: &u32, _: &Trigger<'_, Ping>| {
///     if *count > 10 { "busy".to_string() } else { "idle".to_string() }
/// });
///
/// assert_eq!(by_count.select(&3, &Trigger::Start), "idle");
/// assert_eq!(by_count.select(&30, &Trigger::Start), "busy");
/// ```
pub struct Condition<C, E> {
    selector: Box<dyn Fn(&C, &Trigger<'_, E>) -> String + Send + Sync>,
}

impl<C, E: Event> Condition<C, E> {
    /// Create a condition from a selector function.
    ///
    /// The selector must be deterministic for a given context and trigger.
    pub fn new<F>(selector: F) -> Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> String + Send + Sync + 'static,
    {
        Condition {
            selector: Box::new(selector),
        }
    }

    /// Name of the child to enter.
    pub fn select(&self, context: &C, trigger: &Trigger<'_, E>) -> String {
        (self.selector)(context, trigger)
    }
}

impl<C, E> fmt::Debug for Condition<C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Condition").finish_non_exhaustive()
    }
}
