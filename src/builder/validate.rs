//! Definition checks run before a tree is frozen.
//!
//! Every check runs and every failure is collected, so a definition with
//! several mistakes reports all of them in one pass.

use crate::builder::error::BuildError;
use crate::builder::NodeBuilder;
use std::collections::HashSet;

/// Check a whole definition, returning every problem found.
pub(crate) fn validate<C, E, Env>(root: &NodeBuilder<C, E, Env>) -> Vec<BuildError> {
    let mut errors = Vec::new();
    check_node(root, &mut errors);
    errors
}

fn check_node<C, E, Env>(node: &NodeBuilder<C, E, Env>, errors: &mut Vec<BuildError>) {
    let mut names = HashSet::new();
    for child in &node.children {
        if let Some(error) = check_name(&node.path, &child.name) {
            errors.push(error);
        } else if !names.insert(child.name.as_str()) {
            errors.push(BuildError::DuplicateState {
                parent: node.path.clone(),
                name: child.name.clone(),
            });
        }
        check_node(child, errors);
    }

    let mut events = HashSet::new();
    for (event, _) in &node.handlers {
        if !events.insert(event.as_str()) {
            errors.push(BuildError::DuplicateHandler {
                node: node.path.clone(),
                event: event.clone(),
            });
        }
    }
}

fn check_name(parent: &str, name: &str) -> Option<BuildError> {
    if name.is_empty() {
        Some(BuildError::UnnamedState {
            parent: parent.to_string(),
        })
    } else if name.contains('/') || name == "." || name == ".." {
        Some(BuildError::InvalidName {
            parent: parent.to_string(),
            name: name.to_string(),
        })
    } else {
        None
    }
}
