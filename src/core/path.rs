//! Slash-delimited path expressions.

/// A single step of a parsed path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    /// Leading `/`: restart from the root.
    Root,
    /// `.`
    Current,
    /// `..`
    Parent,
    /// A child name.
    Child(&'a str),
}

/// Split a path into segments.
///
/// Empty segments are skipped, so `a//b` and `a/b/` read like `a/b`. An empty
/// path yields no segments and therefore resolves to the starting node.
pub(crate) fn segments(path: &str) -> impl Iterator<Item = Segment<'_>> {
    let root = path.starts_with('/').then_some(Segment::Root);
    root.into_iter().chain(
        path.split('/')
            .filter(|part| !part.is_empty())
            .map(|part| match part {
                "." => Segment::Current,
                ".." => Segment::Parent,
                name => Segment::Child(name),
            }),
    )
}

/// Join a parent path and a child name.
pub(crate) fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}
