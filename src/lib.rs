//! Harel: a pure functional statechart engine
//!
//! Harel interprets hierarchical, concurrent statecharts: a tree of named
//! states where composite states activate one child (clusters) or all of
//! them (concurrent regions), with shallow and deep history, condition-based
//! child selection and pre/post enter and exit hooks.
//!
//! The engine follows a "pure core, imperative shell" split. Every operation
//! on a [`Statechart`] reads an immutable [`State`] and returns a new one.
//! Side effects are only described: hooks return [`Effect`]s and
//! [`Activity`]s, and the caller (or the bundled [`Machine`]) runs them.
//!
//! # Core Concepts
//!
//! - **Statechart**: the frozen state tree plus its initial context
//! - **State**: an immutable snapshot of the current leaves, context,
//!   history and the effects and activities of the last step
//! - **Events**: caller-defined values dispatched by [`Event::name`]
//! - **Effects and activities**: descriptions of work for the caller
//!
//! # Example
//!
//! ```rust
//! use harel::{event_enum, EventOutput, Statechart};
//!
//! event_enum! {
//!     pub enum Door {
//!         Open,
//!         Close,
//!         Lock { code: u32 },
//!     }
//! }
//!
//! let chart: Statechart<u32, Door> = Statechart::new(0, |s| {
//!     s.state("closed", |s| {
//!         s.state("unlocked", |s| {
//!             s.on_goto("Open", "/opened");
//!             s.on("Lock", |_, event| match event {
//!                 Door::Lock { code } => EventOutput::new().context(*code).goto("../locked"),
//!                 _ => EventOutput::new(),
//!             });
//!         });
//!         s.state("locked", |_| {});
//!     });
//!     s.state("opened", |s| {
//!         s.on_goto("Close", "/closed");
//!     });
//! })
//! .unwrap();
//!
//! let state = chart.initial_state().unwrap();
//! let state = chart.send(&state, &Door::Lock { code: 42 }).unwrap();
//!
//! assert_eq!(state.paths(), vec!["/closed/locked"]);
//! assert_eq!(*state.context(), 42);
//!
//! // Locked doors ignore Open.
//! let state = chart.send(&state, &Door::Open).unwrap();
//! assert!(state.matches("/closed/locked").unwrap());
//! ```

pub mod builder;
pub mod core;
pub mod effects;
pub mod runner;

// Re-export commonly used types
pub use builder::{BuildError, NodeBuilder, NodeOptions};
pub use self::core::{
    Event, HistoryMode, Kind, NodeId, State, Statechart, StatechartError, StatechartResult,
    Trigger,
};
pub use effects::{Activity, Effect, EffectError, EnterOutput, EventOutput, ExitOutput, SendFn};
pub use runner::{Machine, MachineError};
