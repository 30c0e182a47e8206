//! Text rendering of a statechart tree.
//!
//! One line per state. Cluster children hang off `├──`/`└──`, concurrent
//! children off `╠══`/`╚══`. History states are tagged `(H)` or `(H*)` and
//! active states end with `*`.

use super::node::{HistoryMode, Kind, NodeId, Tree};

pub(crate) fn render<C, E, Env>(tree: &Tree<C, E, Env>, current: Option<&[NodeId]>) -> String {
    let mut out = String::new();
    label(tree, current, tree.root(), &mut out);
    children(tree, current, tree.root(), "", &mut out);
    out
}

fn children<C, E, Env>(
    tree: &Tree<C, E, Env>,
    current: Option<&[NodeId]>,
    id: NodeId,
    prefix: &str,
    out: &mut String,
) {
    let node = tree.node(id);
    let (branch, last, pipe) = match node.kind {
        Kind::Cluster => ("├── ", "└── ", "│   "),
        Kind::Concurrent => ("╠══ ", "╚══ ", "║   "),
    };

    for (i, &child) in node.children.iter().enumerate() {
        let is_last = i + 1 == node.children.len();
        out.push_str(prefix);
        out.push_str(if is_last { last } else { branch });
        label(tree, current, child, out);

        let nested = format!("{prefix}{}", if is_last { "    " } else { pipe });
        children(tree, current, child, &nested, out);
    }
}

fn label<C, E, Env>(tree: &Tree<C, E, Env>, current: Option<&[NodeId]>, id: NodeId, out: &mut String) {
    let node = tree.node(id);
    out.push_str(if node.parent.is_none() { "/" } else { &node.name });
    match node.history {
        Some(HistoryMode::Shallow) => out.push_str(" (H)"),
        Some(HistoryMode::Deep) => out.push_str(" (H*)"),
        None => {}
    }
    if current.is_some_and(|current| tree.is_active(current, id)) {
        out.push_str(" *");
    }
    out.push('\n');
}
