//! Side-effect and activity descriptions.
//!
//! This module is the boundary between the pure core and whatever runs it.
//! Hooks and handlers return outputs that may carry:
//!
//! - **Effects**: one-shot asynchronous operations built on Stillwater's
//!   effect system, each yielding at most one follow-up event
//! - **Activities**: long-running processes started on entry and stopped on
//!   exit of the state that declared them
//!
//! The engine records these in the resulting [`State`](crate::core::State)
//! and never executes them itself.

mod activity;
mod effect;
mod output;

pub use activity::{Activity, ActivityHandle, SendFn};
pub use effect::{Effect, EffectAction, EffectError};
pub use output::{EnterOutput, EventOutput, ExitOutput};
