//! Core statechart types and the transition engine.
//!
//! This module is the pure core of the crate:
//! - The frozen node tree and path resolution
//! - Immutable state snapshots
//! - The exit/enter algorithms and event dispatch
//!
//! Nothing here performs I/O. Effects and activities produced by hooks are
//! recorded in the resulting [`State`] for the caller to run.

mod condition;
mod engine;
mod error;
mod event;
mod inspect;
mod node;
pub(crate) mod path;
mod state;
mod statechart;

pub use condition::Condition;
pub use error::{StatechartError, StatechartResult};
pub use event::{Event, Trigger};
pub use node::{HistoryMode, Kind, NodeId};
pub use state::{Activities, State};
pub use statechart::Statechart;
