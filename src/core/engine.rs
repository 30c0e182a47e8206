//! Exit and enter traversal.
//!
//! Exits run bottom-up: a node's active children leave before the node's own
//! exit hooks run. Enters run top-down: a node's enter hooks run before any
//! child is chosen. Child choice for a cluster follows one fixed priority:
//! explicit target, then condition, then history, then the first child.

use super::error::{StatechartError, StatechartResult};
use super::event::{Event, Trigger};
use super::node::{Kind, NodeId, Tree};
use super::state::State;
use tracing::trace;

impl<C, E, Env> Tree<C, E, Env>
where
    C: Clone,
    E: Event,
{
    /// Exit `id` and everything active below it.
    pub(crate) fn exit(&self, state: &mut State<C, E, Env>, id: NodeId, trigger: &Trigger<'_, E>) {
        self.exit_children(state, id, trigger);

        let node = self.node(id);
        trace!(path = %node.path, trigger = trigger.name(), "exit");

        for hook in node.exit.iter() {
            let output = hook(&state.context, trigger);
            if let Some(context) = output.context {
                state.context = context;
            }
            state.effects.extend(output.effects);
        }

        if node.is_leaf() {
            state.current.retain(|&leaf| leaf != id);
        }
        if let Some(activities) = state.activities.current.remove(&node.path) {
            state.activities.stop.extend(activities);
        }
    }

    /// Exit the active children of `id`, leaving `id` itself active.
    pub(crate) fn exit_children(
        &self,
        state: &mut State<C, E, Env>,
        id: NodeId,
        trigger: &Trigger<'_, E>,
    ) {
        let node = self.node(id);
        match node.kind {
            Kind::Concurrent => {
                for &child in &node.children {
                    if self.is_active(&state.current, child) {
                        self.exit(state, child, trigger);
                    }
                }
            }
            Kind::Cluster => {
                if let Some(child) = self.active_child(&state.current, id) {
                    if node.records_history {
                        state
                            .history
                            .insert(node.path.clone(), self.node(child).name.clone());
                    }
                    self.exit(state, child, trigger);
                }
            }
        }
    }

    /// Enter `id` and descend toward `targets`, which must lie under `id`.
    pub(crate) fn enter(
        &self,
        state: &mut State<C, E, Env>,
        id: NodeId,
        trigger: &Trigger<'_, E>,
        targets: &[NodeId],
    ) -> StatechartResult<()> {
        let node = self.node(id);
        trace!(path = %node.path, trigger = trigger.name(), "enter");

        for hook in node.enter.iter() {
            let output = hook(&state.context, trigger);
            if let Some(context) = output.context {
                state.context = context;
            }
            state.effects.extend(output.effects);
            if !output.activities.is_empty() {
                state.activities.start.extend(output.activities.iter().cloned());
                state
                    .activities
                    .current
                    .entry(node.path.clone())
                    .or_default()
                    .extend(output.activities);
            }
        }

        if node.is_leaf() {
            state.current.push(id);
            return Ok(());
        }
        self.enter_children(state, id, trigger, targets)
    }

    /// Enter the children of an already active `id`.
    pub(crate) fn enter_children(
        &self,
        state: &mut State<C, E, Env>,
        id: NodeId,
        trigger: &Trigger<'_, E>,
        targets: &[NodeId],
    ) -> StatechartResult<()> {
        let node = self.node(id);
        match node.kind {
            Kind::Concurrent => {
                for &child in &node.children {
                    let below = self.targets_under(child, targets);
                    self.enter(state, child, trigger, &below)?;
                }
                Ok(())
            }
            Kind::Cluster => match self.select_child(state, id, trigger, targets)? {
                Some(child) => {
                    let below = self.targets_under(child, targets);
                    self.enter(state, child, trigger, &below)
                }
                None => Ok(()),
            },
        }
    }

    fn targets_under(&self, id: NodeId, targets: &[NodeId]) -> Vec<NodeId> {
        targets
            .iter()
            .copied()
            .filter(|&target| self.contains(id, target))
            .collect()
    }

    /// Pick the child of cluster `id` to enter. `None` only for leaves.
    fn select_child(
        &self,
        state: &State<C, E, Env>,
        id: NodeId,
        trigger: &Trigger<'_, E>,
        targets: &[NodeId],
    ) -> StatechartResult<Option<NodeId>> {
        let node = self.node(id);

        let mut explicit: Vec<NodeId> = targets
            .iter()
            .filter_map(|&target| self.child_toward(id, target))
            .collect();
        explicit.sort_unstable();
        explicit.dedup();
        match explicit.as_slice() {
            [] => {}
            [child] => return Ok(Some(*child)),
            children => {
                return Err(StatechartError::AmbiguousDestination {
                    node: node.path.clone(),
                    children: children
                        .iter()
                        .map(|&child| self.node(child).name.clone())
                        .collect(),
                })
            }
        }

        if let Some(condition) = &node.condition {
            let name = condition.select(&state.context, trigger);
            return match self.child_named(id, &name) {
                Some(child) => Ok(Some(child)),
                None => Err(StatechartError::UnknownChild {
                    node: node.path.clone(),
                    child: name,
                }),
            };
        }

        if node.records_history {
            let remembered = state
                .history
                .get(&node.path)
                .and_then(|name| self.child_named(id, name));
            if remembered.is_some() {
                return Ok(remembered);
            }
        }

        Ok(node.children.first().copied())
    }
}
