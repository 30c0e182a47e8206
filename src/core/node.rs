//! Frozen node tree.
//!
//! Nodes live in a flat arena indexed by [`NodeId`]. Ids are assigned in
//! pre-order, so sorting ids sorts nodes into document order. Each node keeps
//! its root-to-self lineage, which makes ancestor tests and pivot computation
//! simple slice comparisons.

use super::condition::Condition;
use super::path::{segments, Segment};
use crate::builder::{EnterHook, EventHandler, ExitHook, Hooks, NodeBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a composite state activates its children.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// Exactly one child active at a time.
    #[default]
    Cluster,
    /// All children active at once.
    Concurrent,
}

/// History marker on a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryMode {
    /// Remember the last active child of this state only.
    Shallow,
    /// Remember the last active child at every cluster level below, down to
    /// the next history marker.
    Deep,
}

/// Stable index of a node in a frozen tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

pub(crate) struct Node<C, E, Env> {
    pub(crate) name: String,
    pub(crate) path: String,
    pub(crate) kind: Kind,
    pub(crate) history: Option<HistoryMode>,
    /// Whether exiting this node records its active child.
    pub(crate) records_history: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    child_index: HashMap<String, NodeId>,
    /// Root first, self last.
    pub(crate) lineage: Vec<NodeId>,
    pub(crate) condition: Option<Condition<C, E>>,
    pub(crate) enter: Hooks<EnterHook<C, E, Env>>,
    pub(crate) exit: Hooks<ExitHook<C, E, Env>>,
    pub(crate) handlers: HashMap<String, EventHandler<C, E, Env>>,
}

impl<C, E, Env> Node<C, E, Env> {
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn depth(&self) -> usize {
        self.lineage.len() - 1
    }
}

pub(crate) struct Tree<C, E, Env> {
    nodes: Vec<Node<C, E, Env>>,
}

impl<C, E, Env> Tree<C, E, Env> {
    /// Freeze a validated definition.
    pub(crate) fn freeze(root: NodeBuilder<C, E, Env>) -> Self {
        let mut tree = Tree { nodes: Vec::new() };
        tree.insert(root, None, Vec::new(), None);
        tree
    }

    fn insert(
        &mut self,
        builder: NodeBuilder<C, E, Env>,
        parent: Option<NodeId>,
        mut lineage: Vec<NodeId>,
        inherited: Option<HistoryMode>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        lineage.push(id);

        let effective = builder.history.or(inherited);
        let records_history = effective.is_some()
            && builder.kind == Kind::Cluster
            && !builder.children.is_empty();
        let passed_down = (effective == Some(HistoryMode::Deep)).then_some(HistoryMode::Deep);

        self.nodes.push(Node {
            name: builder.name,
            path: builder.path,
            kind: builder.kind,
            history: builder.history,
            records_history,
            parent,
            children: Vec::new(),
            child_index: HashMap::new(),
            lineage: lineage.clone(),
            condition: builder.condition,
            enter: builder.enter,
            exit: builder.exit,
            handlers: builder.handlers.into_iter().collect(),
        });

        for child in builder.children {
            let name = child.name.clone();
            let child_id = self.insert(child, Some(id), lineage.clone(), passed_down);
            let node = &mut self.nodes[id.0];
            node.children.push(child_id);
            node.child_index.insert(name, child_id);
        }

        id
    }

    pub(crate) fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<C, E, Env> {
        &self.nodes[id.0]
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId)
    }

    pub(crate) fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id).child_index.get(name).copied()
    }

    /// Resolve `path` starting at `from`.
    ///
    /// `None` when any segment fails, including `..` at the root.
    pub(crate) fn resolve(&self, from: NodeId, path: &str) -> Option<NodeId> {
        segments(path).try_fold(from, |id, segment| match segment {
            Segment::Root => Some(self.root()),
            Segment::Current => Some(id),
            Segment::Parent => self.node(id).parent,
            Segment::Child(name) => self.child_named(id, name),
        })
    }

    /// Lowest common ancestor of `a` and `b`.
    pub(crate) fn pivot(&self, a: NodeId, b: NodeId) -> NodeId {
        self.node(a)
            .lineage
            .iter()
            .zip(&self.node(b).lineage)
            .take_while(|(x, y)| x == y)
            .last()
            .map_or(self.root(), |(id, _)| *id)
    }

    /// True when `ancestor` is on the lineage of `node` (a node contains
    /// itself).
    pub(crate) fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let depth = self.node(ancestor).depth();
        self.node(node).lineage.get(depth) == Some(&ancestor)
    }

    /// Child of `id` on the way down to `node`.
    pub(crate) fn child_toward(&self, id: NodeId, node: NodeId) -> Option<NodeId> {
        if !self.contains(id, node) {
            return None;
        }
        self.node(node).lineage.get(self.node(id).depth() + 1).copied()
    }

    /// True when some leaf in `current` is at or below `id`.
    pub(crate) fn is_active(&self, current: &[NodeId], id: NodeId) -> bool {
        current.iter().any(|&leaf| self.contains(id, leaf))
    }

    /// Active child of a cluster node.
    pub(crate) fn active_child(&self, current: &[NodeId], id: NodeId) -> Option<NodeId> {
        current.iter().find_map(|&leaf| self.child_toward(id, leaf))
    }
}
