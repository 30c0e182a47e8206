//! Build errors for statechart definitions.

use thiserror::Error;

/// Problems found in a statechart definition.
///
/// Definitions are checked as a whole, so every problem is reported at once.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("State declared under '{parent}' has no name. Pass a name to .state(name, body)")]
    UnnamedState { parent: String },

    #[error("Invalid state name '{name}' under '{parent}': names may not contain '/' or be '.' or '..'")]
    InvalidName { parent: String, name: String },

    #[error("Duplicate state '{name}' under '{parent}'")]
    DuplicateState { parent: String, name: String },

    #[error("Duplicate handler for event '{event}' on '{node}'")]
    DuplicateHandler { node: String, event: String },
}
