//! Values returned by enter hooks, exit hooks and event handlers.
//!
//! Every output is optional in every part: an empty output leaves the
//! context untouched and queues nothing.

use super::activity::{Activity, ActivityHandle};
use super::effect::Effect;
use std::fmt;
use std::sync::Arc;

/// Result of an enter hook.
pub struct EnterOutput<C, E, Env = ()> {
    pub(crate) context: Option<C>,
    pub(crate) effects: Vec<Effect<E, Env>>,
    pub(crate) activities: Vec<ActivityHandle<E>>,
}

impl<C, E, Env> EnterOutput<C, E, Env> {
    pub fn new() -> Self {
        Self {
            context: None,
            effects: Vec::new(),
            activities: Vec::new(),
        }
    }

    /// Replace the context.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Queue an effect.
    pub fn effect(mut self, effect: Effect<E, Env>) -> Self {
        self.effects.push(effect);
        self
    }

    /// Start an activity that lives as long as the entered state.
    pub fn activity<A>(mut self, activity: A) -> Self
    where
        A: Activity<E> + 'static,
    {
        self.activities.push(Arc::new(activity));
        self
    }

    /// Start an already shared activity.
    pub fn activity_handle(mut self, activity: ActivityHandle<E>) -> Self {
        self.activities.push(activity);
        self
    }
}

/// Result of an exit hook.
pub struct ExitOutput<C, E, Env = ()> {
    pub(crate) context: Option<C>,
    pub(crate) effects: Vec<Effect<E, Env>>,
}

impl<C, E, Env> ExitOutput<C, E, Env> {
    pub fn new() -> Self {
        Self {
            context: None,
            effects: Vec::new(),
        }
    }

    /// Replace the context.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Queue an effect.
    pub fn effect(mut self, effect: Effect<E, Env>) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Result of an event handler.
///
/// Without a `goto` the event counts as handled and no transition happens.
pub struct EventOutput<C, E, Env = ()> {
    pub(crate) context: Option<C>,
    pub(crate) effects: Vec<Effect<E, Env>>,
    pub(crate) goto: Vec<String>,
}

impl<C, E, Env> EventOutput<C, E, Env> {
    pub fn new() -> Self {
        Self {
            context: None,
            effects: Vec::new(),
            goto: Vec::new(),
        }
    }

    /// Replace the context.
    pub fn context(mut self, context: C) -> Self {
        self.context = Some(context);
        self
    }

    /// Queue an effect.
    pub fn effect(mut self, effect: Effect<E, Env>) -> Self {
        self.effects.push(effect);
        self
    }

    /// Add a transition target, relative to the handling state.
    pub fn goto(mut self, path: impl Into<String>) -> Self {
        self.goto.push(path.into());
        self
    }

    /// Add several transition targets.
    pub fn goto_all<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.goto.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Targets requested so far.
    pub fn targets(&self) -> &[String] {
        &self.goto
    }
}

impl<C, E, Env> Default for EnterOutput<C, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E, Env> Default for ExitOutput<C, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, E, Env> Default for EventOutput<C, E, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: fmt::Debug, E, Env> fmt::Debug for EnterOutput<C, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnterOutput")
            .field("context", &self.context)
            .field("effects", &self.effects)
            .field("activities", &self.activities.len())
            .finish()
    }
}

impl<C: fmt::Debug, E, Env> fmt::Debug for ExitOutput<C, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExitOutput")
            .field("context", &self.context)
            .field("effects", &self.effects)
            .finish()
    }
}

impl<C: fmt::Debug, E, Env> fmt::Debug for EventOutput<C, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventOutput")
            .field("context", &self.context)
            .field("effects", &self.effects)
            .field("goto", &self.goto)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outputs_change_nothing() {
        let enter: EnterOutput<u32, (), ()> = EnterOutput::new();
        let exit: ExitOutput<u32, (), ()> = ExitOutput::default();
        let event: EventOutput<u32, (), ()> = EventOutput::default();

        assert!(enter.context.is_none() && enter.effects.is_empty());
        assert!(enter.activities.is_empty());
        assert!(exit.context.is_none() && exit.effects.is_empty());
        assert!(event.context.is_none() && event.targets().is_empty());
    }

    #[test]
    fn event_output_collects_targets_in_order() {
        let output: EventOutput<(), (), ()> = EventOutput::new()
            .goto("../a")
            .goto_all(["/b/c", "/b/d"]);

        assert_eq!(output.targets(), ["../a", "/b/c", "/b/d"]);
    }

    #[test]
    fn later_context_wins() {
        let output: ExitOutput<u32, (), ()> = ExitOutput::new().context(1).context(2);
        assert_eq!(output.context, Some(2));
    }
}
