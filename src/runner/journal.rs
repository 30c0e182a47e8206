//! Step journal kept by the [`Machine`](super::Machine).
//!
//! The journal is immutable: [`Journal::record`] returns a new journal and
//! leaves the original as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of one machine step.
///
/// # Example
///
/// ```rust
/// use harel::runner::{Journal, StepRecord};
/// use chrono::Utc;
///
/// let journal = Journal::new().record(StepRecord {
///     event: "open".into(),
///     from: vec!["/closed".into()],
///     to: vec!["/opened".into()],
///     timestamp: Utc::now(),
/// });
///
/// assert_eq!(journal.steps().len(), 1);
/// assert_eq!(journal.last().unwrap().event, "open");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Event or trigger name that caused the step
    pub event: String,
    /// Current paths before the step
    pub from: Vec<String>,
    /// Current paths after the step
    pub to: Vec<String>,
    /// When the step completed
    pub timestamp: DateTime<Utc>,
}

impl StepRecord {
    /// Whether the configuration changed.
    pub fn moved(&self) -> bool {
        self.from != self.to
    }
}

/// Ordered log of machine steps.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    steps: Vec<StepRecord>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a step, returning a new journal.
    pub fn record(&self, step: StepRecord) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.steps.last()
    }

    /// Every configuration visited, starting with the first step's origin.
    pub fn trail(&self) -> Vec<&[String]> {
        let mut trail = Vec::new();
        if let Some(first) = self.steps.first() {
            trail.push(first.from.as_slice());
        }
        for step in &self.steps {
            trail.push(step.to.as_slice());
        }
        trail
    }

    /// Time between the first and last step.
    ///
    /// `None` when empty or when the clock went backwards.
    pub fn duration(&self) -> Option<Duration> {
        let first = self.steps.first()?;
        let last = self.steps.last()?;
        (last.timestamp - first.timestamp).to_std().ok()
    }
}
