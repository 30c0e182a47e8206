//! Errors raised by the transition engine.

use crate::builder::BuildError;
use thiserror::Error;

/// Errors from building or running a statechart.
///
/// All of these are definition or targeting mistakes, never environmental
/// failures, and none are retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatechartError {
    #[error("Invalid statechart definition: {}", join_errors(.errors))]
    InvalidDefinition { errors: Vec<BuildError> },

    #[error("Path '{path}' does not resolve to a state")]
    UnresolvedPath { path: String },

    #[error("Transition target '{target}' from '{from}' does not resolve to a state")]
    UnresolvedTarget { from: String, target: String },

    #[error("Transition from '{from}' to {targets:?} has more than one pivot")]
    AmbiguousPivot { from: String, targets: Vec<String> },

    #[error("Transition from '{from}' crosses the concurrent state '{pivot}'")]
    ConcurrencyViolation { from: String, pivot: String },

    #[error("Transition enters more than one child of '{node}': {children:?}")]
    AmbiguousDestination { node: String, children: Vec<String> },

    #[error("State '{node}' has no child named '{child}'")]
    UnknownChild { node: String, child: String },
}

fn join_errors(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Result alias for statechart operations.
pub type StatechartResult<T> = Result<T, StatechartError>;
