//! Event trait and the triggers delivered to hooks.
//!
//! Events are caller-defined values. The engine only needs a stable tag per
//! event to find the handler registered for it, which is what [`Event::name`]
//! provides.

use std::fmt::Debug;

/// Trait for statechart events.
///
/// The name is the dispatch tag: a node handles an event when it registered a
/// handler under exactly this name. Payload is free-form.
///
/// # Example
///
/// ```rust
/// use harel::core::Event;
///
/// #[derive(Clone, Debug)]
/// enum DoorEvent {
///     Open,
///     Close,
///     Knock { times: u8 },
/// }
///
/// impl Event for DoorEvent {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Close => "Close",
///             Self::Knock { .. } => "Knock",
///         }
///     }
/// }
///
/// assert_eq!(DoorEvent::Knock { times: 3 }.name(), "Knock");
/// ```
///
/// The [`event_enum!`](crate::event_enum) macro generates this impl.
pub trait Event: Clone + Debug + Send + Sync + 'static {
    /// Get the event's dispatch tag.
    fn name(&self) -> &str;
}

impl Event for &'static str {
    fn name(&self) -> &str {
        self
    }
}

impl Event for String {
    fn name(&self) -> &str {
        self
    }
}

/// What caused an enter/exit hook or a condition to run.
///
/// User events are wrapped as [`Trigger::Event`]; the other variants are the
/// engine's internal signals.
#[derive(Debug)]
pub enum Trigger<'a, E> {
    /// Entering the initial configuration.
    Start,
    /// Forced transition to the given paths.
    Goto(&'a [String]),
    /// Exiting everything.
    Stop,
    /// A caller event.
    Event(&'a E),
}

impl<'a, E: Event> Trigger<'a, E> {
    /// Tag of the trigger: the event name, or one of `__start__`,
    /// `__goto__`, `__stop__`.
    pub fn name(&self) -> &str {
        match self {
            Self::Start => "__start__",
            Self::Goto(_) => "__goto__",
            Self::Stop => "__stop__",
            Self::Event(event) => event.name(),
        }
    }

    /// The caller event, if this trigger is one.
    pub fn event(&self) -> Option<&'a E> {
        match self {
            Self::Event(event) => Some(event),
            _ => None,
        }
    }

    /// True for the engine's internal signals.
    pub fn is_internal(&self) -> bool {
        !matches!(self, Self::Event(_))
    }
}

impl<E> Clone for Trigger<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Trigger<'_, E> {}
