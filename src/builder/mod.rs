//! Builder API for declaring statechart trees.
//!
//! Construction is two-phase. A [`NodeBuilder`] is a mutable, build-time
//! record that the definition closure fills in; once the closure returns, the
//! whole definition is validated and frozen into an immutable tree owned by a
//! [`Statechart`](crate::core::Statechart). Frozen trees are never modified.
//!
//! # Example
//!
//! ```rust
//! use harel::builder::NodeOptions;
//! use harel::core::{HistoryMode, Statechart};
//! use harel::effects::EnterOutput;
//!
//! let chart: Statechart<u32, &'static str> = Statechart::new(0, |s| {
//!     s.state("off", |s| {
//!         s.on_goto("toggle", "../on");
//!     });
//!     s.state_with("on", NodeOptions::new().history(HistoryMode::Shallow), |s| {
//!         s.enter(|count, _| EnterOutput::new().context(count + 1));
//!         s.state("low", |s| {
//!             s.on_goto("more", "../high");
//!         });
//!         s.state("high", |_| {});
//!         s.on_goto("toggle", "../off");
//!     });
//! })
//! .unwrap();
//!
//! let state = chart.initial_state().unwrap();
//! assert_eq!(state.paths(), vec!["/off"]);
//! ```

pub mod error;
pub mod macros;
pub(crate) mod validate;

pub use error::BuildError;

use crate::core::path::join;
use crate::core::{Condition, Event, HistoryMode, Kind, Trigger};
use crate::effects::{EnterOutput, EventOutput, ExitOutput};

pub(crate) type EnterHook<C, E, Env> =
    Box<dyn Fn(&C, &Trigger<'_, E>) -> EnterOutput<C, E, Env> + Send + Sync>;

pub(crate) type ExitHook<C, E, Env> =
    Box<dyn Fn(&C, &Trigger<'_, E>) -> ExitOutput<C, E, Env> + Send + Sync>;

pub(crate) type EventHandler<C, E, Env> =
    Box<dyn Fn(&C, &E) -> EventOutput<C, E, Env> + Send + Sync>;

/// Hooks of one kind, run pre, then primary, then post.
pub(crate) struct Hooks<H> {
    pub(crate) pre: Vec<H>,
    pub(crate) primary: Vec<H>,
    pub(crate) post: Vec<H>,
}

impl<H> Hooks<H> {
    fn new() -> Self {
        Self {
            pre: Vec::new(),
            primary: Vec::new(),
            post: Vec::new(),
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &H> {
        self.pre.iter().chain(&self.primary).chain(&self.post)
    }
}

/// Node-level flags, the options form of [`NodeBuilder::concurrent`] and
/// [`NodeBuilder::history`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeOptions {
    pub concurrent: bool,
    pub history: Option<HistoryMode>,
}

impl NodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// All children active at once.
    pub fn concurrent(mut self) -> Self {
        self.concurrent = true;
        self
    }

    /// Remember the last active child.
    pub fn history(mut self, mode: HistoryMode) -> Self {
        self.history = Some(mode);
        self
    }
}

/// Build-time record of one state and its subtree.
pub struct NodeBuilder<C, E, Env = ()> {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: Kind,
    pub(crate) history: Option<HistoryMode>,
    pub(crate) condition: Option<Condition<C, E>>,
    pub(crate) enter: Hooks<EnterHook<C, E, Env>>,
    pub(crate) exit: Hooks<ExitHook<C, E, Env>>,
    pub(crate) handlers: Vec<(String, EventHandler<C, E, Env>)>,
    pub(crate) children: Vec<NodeBuilder<C, E, Env>>,
}

impl<C, E, Env> NodeBuilder<C, E, Env> {
    pub(crate) fn root() -> Self {
        Self::with_path(String::new(), "/".to_string())
    }

    fn with_path(name: String, path: String) -> Self {
        Self {
            name,
            path,
            kind: Kind::Cluster,
            history: None,
            condition: None,
            enter: Hooks::new(),
            exit: Hooks::new(),
            handlers: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name of the state being declared. Empty for the root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path of the state being declared.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Declare a child state. The first child declared is the default.
    pub fn state<F>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.state_with(name, NodeOptions::default(), body)
    }

    /// Declare a child state with options.
    pub fn state_with<F>(&mut self, name: impl Into<String>, options: NodeOptions, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let name = name.into();
        let path = join(&self.path, &name);
        let mut child = Self::with_path(name, path);
        if options.concurrent {
            child.kind = Kind::Concurrent;
        }
        child.history = options.history;
        body(&mut child);
        self.children.push(child);
        self
    }

    /// Mark this state concurrent: all children are active together.
    pub fn concurrent(&mut self) -> &mut Self {
        self.kind = Kind::Concurrent;
        self
    }

    /// Mark this state as a history state.
    pub fn history(&mut self, mode: HistoryMode) -> &mut Self {
        self.history = Some(mode);
        self
    }
}

impl<C, E, Env> NodeBuilder<C, E, Env>
where
    E: Event,
{
    /// Select the child to enter from context and trigger.
    ///
    /// Consulted when a transition does not name a child of this state,
    /// ahead of history and the default child.
    pub fn condition<F>(&mut self, selector: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> String + Send + Sync + 'static,
    {
        self.condition = Some(Condition::new(selector));
        self
    }

    /// Add an enter hook.
    pub fn enter<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> EnterOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.enter.primary.push(Box::new(hook));
        self
    }

    /// Add an enter hook that runs before the primary ones.
    pub fn pre_enter<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> EnterOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.enter.pre.push(Box::new(hook));
        self
    }

    /// Add an enter hook that runs after the primary ones.
    pub fn post_enter<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> EnterOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.enter.post.push(Box::new(hook));
        self
    }

    /// Add an exit hook.
    pub fn exit<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> ExitOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.exit.primary.push(Box::new(hook));
        self
    }

    pub fn pre_exit<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> ExitOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.exit.pre.push(Box::new(hook));
        self
    }

    pub fn post_exit<F>(&mut self, hook: F) -> &mut Self
    where
        F: Fn(&C, &Trigger<'_, E>) -> ExitOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.exit.post.push(Box::new(hook));
        self
    }

    /// Handle events named `event` in this state and its descendants.
    pub fn on<F>(&mut self, event: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(&C, &E) -> EventOutput<C, E, Env> + Send + Sync + 'static,
    {
        self.handlers.push((event.into(), Box::new(handler)));
        self
    }

    /// Transition to `path` on `event`.
    pub fn on_goto(&mut self, event: impl Into<String>, path: impl Into<String>) -> &mut Self {
        let path = path.into();
        self.on(event, move |_, _| EventOutput::new().goto(path.clone()))
    }

    /// Transition to every path in `paths` on `event`.
    pub fn on_goto_all<I, P>(&mut self, event: impl Into<String>, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        self.on(event, move |_, _| EventOutput::new().goto_all(paths.clone()))
    }
}
