//! The statechart orchestrator.

use super::error::{StatechartError, StatechartResult};
use super::event::{Event, Trigger};
use super::inspect;
use super::node::{Kind, NodeId, Tree};
use super::state::State;
use crate::builder::validate::validate;
use crate::builder::NodeBuilder;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A transition found while dispatching, applied once every handler has run.
#[derive(Debug)]
struct Transition {
    pivot: NodeId,
    targets: Vec<NodeId>,
    /// Exit and re-enter the pivot itself rather than only its children.
    reenter: bool,
}

/// A frozen statechart definition plus its initial context.
///
/// All operations are pure: they read a [`State`] and return a new one.
///
/// # Example
///
/// ```rust
/// use harel::core::Statechart;
/// use harel::effects::EventOutput;
///
/// let chart: Statechart<u32, &'static str> = Statechart::new(0, |s| {
///     s.state("idle", |s| {
///         s.on("ping", |count, _| EventOutput::new().context(count + 1));
///         s.on_goto("work", "../busy");
///     });
///     s.state("busy", |s| {
///         s.on_goto("done", "../idle");
///     });
/// })
/// .unwrap();
///
/// let state = chart.initial_state().unwrap();
/// let state = chart.send(&state, &"ping").unwrap();
/// let state = chart.send(&state, &"work").unwrap();
///
/// assert_eq!(*state.context(), 1);
/// assert_eq!(state.paths(), vec!["/busy"]);
/// assert!(state.matches("/busy").unwrap());
/// ```
pub struct Statechart<C, E, Env = ()> {
    tree: Arc<Tree<C, E, Env>>,
    context: C,
}

impl<C, E, Env> Statechart<C, E, Env>
where
    C: Clone,
    E: Event,
{
    /// Build a statechart from an initial context and a definition closure.
    ///
    /// The closure receives the root state. Once it returns, the definition
    /// is checked as a whole and frozen.
    ///
    /// # Errors
    ///
    /// [`StatechartError::InvalidDefinition`] listing every problem found.
    pub fn new<F>(context: C, body: F) -> StatechartResult<Self>
    where
        F: FnOnce(&mut NodeBuilder<C, E, Env>),
    {
        let mut root = NodeBuilder::root();
        body(&mut root);

        let errors = validate(&root);
        if !errors.is_empty() {
            return Err(StatechartError::InvalidDefinition { errors });
        }

        let tree = Tree::freeze(root);
        debug!(states = tree.ids().count(), "Statechart built");
        Ok(Self {
            tree: Arc::new(tree),
            context,
        })
    }

    /// Initial context given at construction.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Enter from the root with no explicit destination.
    pub fn initial_state(&self) -> StatechartResult<State<C, E, Env>> {
        let mut state = State::new(Arc::clone(&self.tree), self.context.clone());
        self.tree
            .enter(&mut state, self.tree.root(), &Trigger::Start, &[])?;
        state.sort_current();
        debug!(current = ?state.paths(), "Initial state");
        Ok(state)
    }

    /// Dispatch `event` and return the next state.
    ///
    /// Every current leaf looks for a handler on itself and then its
    /// ancestors. Each ancestor is asked at most once per event, even when
    /// several concurrent leaves share it. Transitions requested by the
    /// handlers are collected first and then applied in order.
    ///
    /// An event nobody handles is not an error: the result has the same
    /// configuration and context, with empty step queues.
    pub fn send(&self, state: &State<C, E, Env>, event: &E) -> StatechartResult<State<C, E, Env>> {
        let tree = &*self.tree;
        let mut next = state.begin_step();
        let mut seen = HashSet::new();
        let mut transitions = Vec::new();

        for &leaf in &state.current {
            for &id in tree.node(leaf).lineage.iter().rev() {
                if !seen.insert(id) {
                    break;
                }
                let Some(handler) = tree.node(id).handlers.get(event.name()) else {
                    continue;
                };

                let output = handler(&next.context, event);
                if let Some(context) = output.context {
                    next.context = context;
                }
                next.effects.extend(output.effects);
                if !output.goto.is_empty() {
                    transitions.push(self.plan(id, leaf, &output.goto)?);
                }
                break;
            }
        }

        let applied = self.apply_all(&mut next, &transitions, &Trigger::Event(event))?;
        debug!(event = event.name(), transitions = applied, "Event sent");
        Ok(next)
    }

    /// Force a transition to `paths`, resolved from the root, bypassing
    /// event handlers.
    ///
    /// The root takes the transition as if it had handled an event naming
    /// `paths`, so the same pivot rules apply as for [`send`](Self::send).
    /// On a stopped state this enters from the root toward the targets. An
    /// empty path list changes nothing.
    ///
    /// # Errors
    ///
    /// [`StatechartError::UnresolvedPath`] if any path names no state,
    /// [`StatechartError::ConcurrencyViolation`] if the root is concurrent
    /// and the targets leave a region, plus any error raised while entering.
    pub fn goto<P: AsRef<str>>(
        &self,
        state: &State<C, E, Env>,
        paths: &[P],
    ) -> StatechartResult<State<C, E, Env>> {
        let tree = &*self.tree;
        let paths: Vec<String> = paths.iter().map(|p| p.as_ref().to_string()).collect();
        let targets = paths
            .iter()
            .map(|path| {
                tree.resolve(tree.root(), path)
                    .ok_or_else(|| StatechartError::UnresolvedPath { path: path.clone() })
            })
            .collect::<StatechartResult<Vec<_>>>()?;

        let mut next = state.begin_step();
        if targets.is_empty() {
            return Ok(next);
        }

        let trigger = Trigger::Goto(&paths);
        match next.current.first().copied() {
            None => {
                tree.enter(&mut next, tree.root(), &trigger, &targets)?;
                next.sort_current();
            }
            Some(leaf) => {
                let transition = self.transition(tree.root(), leaf, &paths, targets)?;
                self.apply_all(&mut next, &[transition], &trigger)?;
            }
        }

        debug!(targets = ?paths, current = ?next.paths(), "Goto");
        Ok(next)
    }

    /// Exit everything and stop every running activity.
    ///
    /// The result has no current states; all activities that were running
    /// are listed in `activities().stop()`.
    pub fn stop(&self, state: &State<C, E, Env>) -> State<C, E, Env> {
        let mut next = state.begin_step();
        if !next.is_stopped() {
            self.tree.exit(&mut next, self.tree.root(), &Trigger::Stop);
        }

        let remaining = std::mem::take(&mut next.activities.current);
        next.activities
            .stop
            .extend(remaining.into_values().flatten());
        next.current.clear();

        debug!(stopped = next.activities.stop.len(), "Statechart stopped");
        next
    }

    fn plan(&self, from: NodeId, leaf: NodeId, paths: &[String]) -> StatechartResult<Transition> {
        let tree = &*self.tree;
        let from_path = || tree.node(from).path.clone();

        let targets = paths
            .iter()
            .map(|path| {
                tree.resolve(from, path)
                    .ok_or_else(|| StatechartError::UnresolvedTarget {
                        from: from_path(),
                        target: path.clone(),
                    })
            })
            .collect::<StatechartResult<Vec<_>>>()?;
        self.transition(from, leaf, paths, targets)
    }

    /// Pivot and form of a transition from `from`, taken on behalf of `leaf`.
    fn transition(
        &self,
        from: NodeId,
        leaf: NodeId,
        paths: &[String],
        targets: Vec<NodeId>,
    ) -> StatechartResult<Transition> {
        let tree = &*self.tree;
        let from_path = || tree.node(from).path.clone();

        let mut pivots: Vec<NodeId> = targets
            .iter()
            .map(|&target| tree.pivot(from, target))
            .collect();
        pivots.sort_unstable();
        pivots.dedup();
        let pivot = match pivots.as_slice() {
            [pivot] => *pivot,
            _ => {
                return Err(StatechartError::AmbiguousPivot {
                    from: from_path(),
                    targets: paths.to_vec(),
                })
            }
        };

        let reenter = targets
            .iter()
            .all(|&target| tree.node(leaf).lineage.contains(&target));
        if !reenter && tree.node(pivot).kind == Kind::Concurrent {
            return Err(StatechartError::ConcurrencyViolation {
                from: from_path(),
                pivot: tree.node(pivot).path.clone(),
            });
        }

        Ok(Transition {
            pivot,
            targets,
            reenter,
        })
    }

    fn apply_all(
        &self,
        state: &mut State<C, E, Env>,
        transitions: &[Transition],
        trigger: &Trigger<'_, E>,
    ) -> StatechartResult<usize> {
        let tree = &*self.tree;
        let mut applied = 0;

        for transition in transitions {
            let pivot = transition.pivot;
            if pivot != tree.root() && !tree.is_active(&state.current, pivot) {
                debug!(
                    pivot = %tree.node(pivot).path,
                    "Skipping transition whose pivot was exited earlier in this step"
                );
                continue;
            }

            if transition.reenter {
                tree.exit(state, pivot, trigger);
                tree.enter(state, pivot, trigger, &transition.targets)?;
            } else {
                tree.exit_children(state, pivot, trigger);
                tree.enter_children(state, pivot, trigger, &transition.targets)?;
            }
            applied += 1;
        }

        state.sort_current();
        Ok(applied)
    }
}

impl<C, E, Env> Statechart<C, E, Env> {
    /// Render the tree, marking states active in `state`.
    pub fn inspect(&self, state: Option<&State<C, E, Env>>) -> String {
        inspect::render(&self.tree, state.map(|s| s.current.as_slice()))
    }

    /// Canonical absolute path of `path`, resolved from the root.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.tree
            .resolve(self.tree.root(), path)
            .map(|id| self.tree.node(id).path.as_str())
    }
}

impl<C: Clone, E, Env> Clone for Statechart<C, E, Env> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
            context: self.context.clone(),
        }
    }
}
