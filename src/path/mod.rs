//! Structural path addressing for JSON trees.
//!
//! A [`Path`] is an ordered list of segments (map keys or list indices) that
//! identifies a *container* inside the document. A [`NodeAddress`] pairs a
//! path with a final key and uniquely addresses a single node: the element
//! stored under `key` inside the container at `path`.
//!
//! Segment comparison stringifies both sides, so the list index `1` and the
//! map key `"1"` compare equal. Addresses produced by different front-end
//! layers (drag payloads, selection records) routinely mix the two forms and
//! must still agree about identity.
//!
//! # Example
//!
//! ```
//! use jsonforge::path::{NodeAddress, Path, Segment};
//!
//! let users = Path::root().child(Segment::key("users"));
//! let first = NodeAddress::new(users.clone(), Segment::index(0));
//! let name = NodeAddress::new(users.child(Segment::index(0)), Segment::key("name"));
//!
//! assert!(first.is_ancestor_of(&name));
//! assert!(!name.is_ancestor_of(&first));
//! ```

use std::fmt;

/// One step in a path: a map key or a list index.
#[derive(Debug, Clone, Eq)]
pub enum Segment {
    /// A key into an ordered map.
    Key(String),
    /// An index into a list.
    Index(usize),
}

impl Segment {
    /// Creates a key segment.
    pub fn key<S: Into<String>>(key: S) -> Self {
        Segment::Key(key.into())
    }

    /// Creates an index segment.
    pub fn index(index: usize) -> Self {
        Segment::Index(index)
    }

    /// Returns the segment as a list index if it is one, or if it is a key
    /// that parses as a non-negative integer.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(i) => Some(*i),
            Segment::Key(k) => k.parse().ok(),
        }
    }

    /// Returns the key text for key segments.
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(k) => Some(k.as_str()),
            Segment::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{}", k),
            Segment::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Segments compare by their string form, so `Index(1) == Key("1")`.
impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Segment::Key(a), Segment::Key(b)) => a == b,
            (Segment::Index(a), Segment::Index(b)) => a == b,
            (Segment::Key(k), Segment::Index(i)) | (Segment::Index(i), Segment::Key(k)) => {
                k.parse::<usize>().map(|p| p == *i).unwrap_or(false)
            }
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// An ordered sequence of segments identifying a container in the tree.
///
/// The empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<Segment>);

impl Path {
    /// The path of the document root container.
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Builds a path from a list of segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Path(segments)
    }

    /// Returns the segments of this path.
    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends a segment in place.
    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: Segment) -> Path {
        let mut segments = self.0.clone();
        segments.push(segment);
        Path(segments)
    }

    /// Splits this path into its parent path and final segment.
    ///
    /// Returns `None` for the root path.
    pub fn split_last(&self) -> Option<(Path, &Segment)> {
        let (last, rest) = self.0.split_last()?;
        Some((Path(rest.to_vec()), last))
    }

    /// True iff `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        self.0.len() <= other.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "(root)");
        }
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(" \u{2192} "))
    }
}

impl FromIterator<Segment> for Path {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Path(iter.into_iter().collect())
    }
}

/// A path plus a final key, uniquely addressing one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeAddress {
    /// Path of the container holding the node.
    pub path: Path,
    /// Key or index of the node inside that container.
    pub key: Segment,
}

impl NodeAddress {
    /// Creates an address from a container path and a final key.
    pub fn new(path: Path, key: Segment) -> Self {
        Self { path, key }
    }

    /// Returns the full path of the node itself: `path` plus `key`.
    pub fn full_path(&self) -> Path {
        self.path.child(self.key.clone())
    }

    /// Depth of the containing path. Used to order bulk mutations so that
    /// deeper entries are processed first.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// True iff this node's full path is a *strict* prefix of `other`'s.
    pub fn is_ancestor_of(&self, other: &NodeAddress) -> bool {
        let own = self.full_path();
        let theirs = other.full_path();
        own.len() < theirs.len() && own.is_prefix_of(&theirs)
    }

    /// Full-path equality.
    pub fn is_same_location(&self, other: &NodeAddress) -> bool {
        self.full_path() == other.full_path()
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{} \u{2192} {}", self.path, self.key)
        }
    }
}
