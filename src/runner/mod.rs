//! Imperative shell around the pure core.
//!
//! [`Machine`] runs what the engine only describes: it starts and stops
//! activities and runs effects, feeding resulting events back in. The
//! [`Journal`] keeps an immutable log of the steps taken.

mod journal;
mod machine;

pub use journal::{Journal, StepRecord};
pub use machine::{Machine, MachineError};
