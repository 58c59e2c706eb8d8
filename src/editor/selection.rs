//! Multi-selection over document nodes.
//!
//! Selection entries are node addresses. Toggling a container selects or
//! deselects its descendants as they exist at toggle time; the relationship
//! is not live, so nodes added to a selected container later are not
//! implicitly selected.
//!
//! Bulk operations work on the *top-level* subset: entries with no selected
//! ancestor. Removing or moving a container already carries its children, so
//! a selected child of a selected container must not be processed twice.

use std::cmp::Ordering;

use crate::document::node::JsonValue;
use crate::document::tree::JsonTree;
use crate::path::{NodeAddress, Path, Segment};

/// The set of currently selected nodes.
#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    entries: Vec<NodeAddress>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NodeAddress] {
        &self.entries
    }

    pub fn contains(&self, address: &NodeAddress) -> bool {
        self.entries.iter().any(|e| e.is_same_location(address))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Toggles a node's selection.
    ///
    /// Selecting also selects every currently addressable descendant;
    /// deselecting also drops every selected descendant.
    pub fn toggle(&mut self, tree: &JsonTree, address: NodeAddress) {
        if self.contains(&address) {
            self.entries
                .retain(|e| !e.is_same_location(&address) && !address.is_ancestor_of(e));
            return;
        }

        let mut descendants = Vec::new();
        if let Ok(value) = tree.get(&address) {
            collect_addresses(value, &address.full_path(), &mut descendants);
        }
        self.entries.push(address);
        for descendant in descendants {
            if !self.contains(&descendant) {
                self.entries.push(descendant);
            }
        }
    }

    /// Selects every addressable node in the document.
    pub fn select_all(&mut self, tree: &JsonTree) {
        self.entries.clear();
        collect_addresses(tree.root(), &Path::root(), &mut self.entries);
    }

    /// Returns the selected entries that have no selected ancestor.
    pub fn top_level(&self) -> Vec<NodeAddress> {
        self.entries
            .iter()
            .filter(|entry| !self.entries.iter().any(|other| other.is_ancestor_of(entry)))
            .cloned()
            .collect()
    }

    /// Returns the top-level entries in safe bulk-mutation order: deepest
    /// paths first, and within one array parent, highest index first.
    ///
    /// Processing in this order guarantees that removing or moving one entry
    /// never shifts the address of an entry not yet processed.
    pub fn ordered_for_mutation(&self, tree: &JsonTree) -> Vec<NodeAddress> {
        let mut entries = self.top_level();
        entries.sort_by(|a, b| {
            let by_depth = b.depth().cmp(&a.depth());
            if by_depth != Ordering::Equal {
                return by_depth;
            }
            if a.path == b.path {
                let parent_is_array = tree
                    .resolve(&a.path)
                    .map(|v| v.is_array())
                    .unwrap_or(false);
                if parent_is_array {
                    if let (Some(ai), Some(bi)) = (a.key.as_index(), b.key.as_index()) {
                        return bi.cmp(&ai);
                    }
                }
            }
            Ordering::Equal
        });
        entries
    }
}

/// Collects the address of every node under `value`, whose own path is
/// `base`. The container itself is not included.
fn collect_addresses(value: &JsonValue, base: &Path, out: &mut Vec<NodeAddress>) {
    match value {
        JsonValue::Object(entries) => {
            for (key, child) in entries {
                let address = NodeAddress::new(base.clone(), Segment::key(key.clone()));
                out.push(address);
                collect_addresses(child, &base.child(Segment::key(key.clone())), out);
            }
        }
        JsonValue::Array(elements) => {
            for (index, child) in elements.iter().enumerate() {
                let address = NodeAddress::new(base.clone(), Segment::index(index));
                out.push(address);
                collect_addresses(child, &base.child(Segment::index(index)), out);
            }
        }
        _ => {}
    }
}
