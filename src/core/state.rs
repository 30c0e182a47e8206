//! Immutable run-time snapshots.
//!
//! A [`State`] is produced by every engine operation and never modified
//! afterwards. Holding on to an earlier state is always safe: the next step
//! works on a copy.

use super::error::{StatechartError, StatechartResult};
use super::node::{NodeId, Tree};
use crate::effects::{ActivityHandle, Effect};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Activity bookkeeping for one snapshot.
///
/// `current` lists what is running, keyed by the path of the state whose
/// entry started it. `start` and `stop` describe only the last step.
pub struct Activities<E> {
    pub(crate) current: BTreeMap<String, Vec<ActivityHandle<E>>>,
    pub(crate) start: Vec<ActivityHandle<E>>,
    pub(crate) stop: Vec<ActivityHandle<E>>,
}

impl<E> Activities<E> {
    fn new() -> Self {
        Self {
            current: BTreeMap::new(),
            start: Vec::new(),
            stop: Vec::new(),
        }
    }

    /// Running activities by owning state path.
    pub fn current(&self) -> &BTreeMap<String, Vec<ActivityHandle<E>>> {
        &self.current
    }

    /// Activities to start after the last step.
    pub fn start(&self) -> &[ActivityHandle<E>] {
        &self.start
    }

    /// Activities to stop after the last step.
    pub fn stop(&self) -> &[ActivityHandle<E>] {
        &self.stop
    }
}

impl<E> Clone for Activities<E> {
    fn clone(&self) -> Self {
        Self {
            current: self.current.clone(),
            start: self.start.clone(),
            stop: self.stop.clone(),
        }
    }
}

impl<E> fmt::Debug for Activities<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = |list: &[ActivityHandle<E>]| -> Vec<String> {
            list.iter().map(|a| a.name().to_string()).collect()
        };
        let current: BTreeMap<_, _> = self
            .current
            .iter()
            .map(|(path, list)| (path.as_str(), names(list)))
            .collect();
        f.debug_struct("Activities")
            .field("current", &current)
            .field("start", &names(&self.start))
            .field("stop", &names(&self.stop))
            .finish()
    }
}

/// Snapshot of a running statechart.
pub struct State<C, E, Env = ()> {
    pub(crate) tree: Arc<Tree<C, E, Env>>,
    pub(crate) context: C,
    pub(crate) current: Vec<NodeId>,
    pub(crate) history: BTreeMap<String, String>,
    pub(crate) effects: Vec<Effect<E, Env>>,
    pub(crate) activities: Activities<E>,
}

impl<C, E, Env> State<C, E, Env> {
    pub(crate) fn new(tree: Arc<Tree<C, E, Env>>, context: C) -> Self {
        Self {
            tree,
            context,
            current: Vec::new(),
            history: BTreeMap::new(),
            effects: Vec::new(),
            activities: Activities::new(),
        }
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Current leaf states in document order.
    pub fn current(&self) -> &[NodeId] {
        &self.current
    }

    /// Absolute path of a node.
    pub fn path_of(&self, id: NodeId) -> &str {
        &self.tree.node(id).path
    }

    /// Paths of the current leaf states.
    pub fn paths(&self) -> Vec<&str> {
        self.current.iter().map(|&id| self.path_of(id)).collect()
    }

    /// Last exited child name by history state path.
    pub fn history(&self) -> &BTreeMap<String, String> {
        &self.history
    }

    /// Effects queued by the last step.
    pub fn effects(&self) -> &[Effect<E, Env>] {
        &self.effects
    }

    pub fn activities(&self) -> &Activities<E> {
        &self.activities
    }

    /// True when no state is active, after [`stop`](crate::core::Statechart::stop).
    pub fn is_stopped(&self) -> bool {
        self.current.is_empty()
    }

    /// Whether the state at `path` (resolved from the root) is active.
    ///
    /// # Errors
    ///
    /// [`StatechartError::UnresolvedPath`] if `path` names no state.
    pub fn matches(&self, path: &str) -> StatechartResult<bool> {
        let id = self
            .tree
            .resolve(self.tree.root(), path)
            .ok_or_else(|| StatechartError::UnresolvedPath {
                path: path.to_string(),
            })?;
        Ok(self.tree.is_active(&self.current, id))
    }

    pub(crate) fn sort_current(&mut self) {
        self.current.sort_unstable();
        self.current.dedup();
    }
}

impl<C: Clone, E, Env> State<C, E, Env> {
    /// Copy of this state with a different context.
    pub fn with_context(&self, context: C) -> Self {
        Self {
            context,
            ..self.clone()
        }
    }

    /// Copy of this state with the per-step queues cleared.
    pub(crate) fn begin_step(&self) -> Self {
        let mut next = self.clone();
        next.effects.clear();
        next.activities.start.clear();
        next.activities.stop.clear();
        next
    }
}

impl<C: Clone, E, Env> Clone for State<C, E, Env> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            context: self.context.clone(),
            current: self.current.clone(),
            history: self.history.clone(),
            effects: self.effects.clone(),
            activities: self.activities.clone(),
        }
    }
}

impl<C: fmt::Debug, E, Env> fmt::Debug for State<C, E, Env> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("context", &self.context)
            .field("current", &self.paths())
            .field("history", &self.history)
            .field("effects", &self.effects)
            .field("activities", &self.activities)
            .finish()
    }
}
