//! Move destinations and candidate enumeration.
//!
//! A [`Destination`] describes where a moved element lands: appended to the
//! document root (only meaningful while the root is an object), inserted as
//! a new key into an object, or appended to an array.

use std::fmt;

use crate::document::node::JsonValue;
use crate::document::tree::JsonTree;
use crate::path::{NodeAddress, Path, Segment};

/// The kind of container a move lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Append to the document root (root must be an object).
    Root,
    /// Insert as a new key into the object at the destination path.
    Object,
    /// Append to the array at the destination path.
    Array,
}

/// A target container for a move operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    /// Path of the destination container. Ignored for `Root`.
    pub path: Path,
    /// Declared container kind, verified against the runtime type on use.
    pub kind: DestinationKind,
}

impl Destination {
    /// The document root destination.
    pub fn root() -> Self {
        Self {
            path: Path::root(),
            kind: DestinationKind::Root,
        }
    }

    /// An object destination at `path`.
    pub fn object(path: Path) -> Self {
        Self {
            path,
            kind: DestinationKind::Object,
        }
    }

    /// An array destination at `path`.
    pub fn array(path: Path) -> Self {
        Self {
            path,
            kind: DestinationKind::Array,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DestinationKind::Root => write!(f, "Document root"),
            DestinationKind::Object => write!(f, "{} (object)", self.path),
            DestinationKind::Array => write!(f, "{} (array)", self.path),
        }
    }
}

/// Lists every container in the document that can receive a move, skipping
/// the nodes being moved and everything inside them. Ancestors of a moved
/// node stay valid destinations.
///
/// The root is offered first, and only while the document root is an object.
pub fn candidate_destinations(tree: &JsonTree, moving: &[NodeAddress]) -> Vec<Destination> {
    let mut candidates = Vec::new();
    if tree.root().is_object() {
        candidates.push(Destination::root());
    }
    walk_containers(tree.root(), &Path::root(), moving, &mut candidates);
    candidates
}

fn walk_containers(
    value: &JsonValue,
    path: &Path,
    moving: &[NodeAddress],
    out: &mut Vec<Destination>,
) {
    let children: Vec<(Segment, &JsonValue)> = match value {
        JsonValue::Object(entries) => entries
            .iter()
            .map(|(k, v)| (Segment::key(k.clone()), v))
            .collect(),
        JsonValue::Array(elements) => elements
            .iter()
            .enumerate()
            .map(|(i, v)| (Segment::index(i), v))
            .collect(),
        _ => return,
    };

    for (key, child) in children {
        let address = NodeAddress::new(path.clone(), key.clone());
        // A moved node and its whole subtree are not valid destinations.
        if moving
            .iter()
            .any(|m| m.is_same_location(&address) || m.is_ancestor_of(&address))
        {
            continue;
        }
        if !child.is_container() {
            continue;
        }

        let child_path = path.child(key);
        let destination = match child {
            JsonValue::Object(_) => Destination::object(child_path.clone()),
            JsonValue::Array(_) => Destination::array(child_path.clone()),
            _ => unreachable!(),
        };
        out.push(destination);
        walk_containers(child, &child_path, moving, out);
    }
}
