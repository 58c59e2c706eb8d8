//! Path-addressed operations on a JSON document.
//!
//! `JsonTree` owns the document root and implements every structural edit as
//! a pure data operation: get, set, rename, remove, append, and move. The
//! operations here know nothing about history or selection; the editor
//! session is responsible for snapshotting before it calls them.
//!
//! Paths address containers. An operation on a node takes the container's
//! path plus the node's key, so the root container itself is reachable with
//! the empty path.
//!
//! # Example
//!
//! ```
//! use jsonforge::document::node::JsonValue;
//! use jsonforge::document::tree::JsonTree;
//! use jsonforge::path::{Path, Segment};
//!
//! let mut tree = JsonTree::empty();
//! tree.set_key(&Path::root(), &Segment::key("name"), JsonValue::String("Ana".into()))
//!     .unwrap();
//!
//! let node = tree
//!     .get(&jsonforge::path::NodeAddress::new(Path::root(), Segment::key("name")))
//!     .unwrap();
//! assert_eq!(*node, JsonValue::String("Ana".to_string()));
//! ```

use indexmap::IndexMap;

use super::node::JsonValue;
use crate::editor::destination::{Destination, DestinationKind};
use crate::error::EditError;
use crate::path::{NodeAddress, Path, Segment};

/// A mutable JSON document addressed by structural paths.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonTree {
    root: JsonValue,
}

impl JsonTree {
    /// Creates a tree with the given root value.
    pub fn new(root: JsonValue) -> Self {
        Self { root }
    }

    /// Creates a tree whose root is an empty object, the initial state of a
    /// fresh document.
    pub fn empty() -> Self {
        Self {
            root: JsonValue::empty_object(),
        }
    }

    /// Returns the root value.
    pub fn root(&self) -> &JsonValue {
        &self.root
    }

    /// Replaces the root value wholesale.
    pub fn set_root(&mut self, root: JsonValue) {
        self.root = root;
    }

    /// Resolves a path to the container it addresses.
    ///
    /// Fails with `InvalidPath` if any step lands on a missing entry or
    /// tries to traverse through a primitive.
    pub fn resolve(&self, path: &Path) -> Result<&JsonValue, EditError> {
        let mut current = &self.root;
        for segment in path.segments() {
            current = index_value(current, segment)?;
        }
        Ok(current)
    }

    fn resolve_mut(&mut self, path: &Path) -> Result<&mut JsonValue, EditError> {
        let mut current = &mut self.root;
        for segment in path.segments() {
            current = index_value_mut(current, segment)?;
        }
        Ok(current)
    }

    /// Returns the node at an address.
    pub fn get(&self, address: &NodeAddress) -> Result<&JsonValue, EditError> {
        let container = self.resolve(&address.path)?;
        index_value(container, &address.key)
    }

    /// True if the address resolves to an existing node.
    pub fn contains(&self, address: &NodeAddress) -> bool {
        self.get(address).is_ok()
    }

    /// Sets the value stored under `key` in the container at `path`.
    ///
    /// For an object container, an existing key is overwritten in place
    /// (keeping its position) and a new key is appended. For an array
    /// container, `key` must be an index of an existing element.
    pub fn set_key(
        &mut self,
        path: &Path,
        key: &Segment,
        value: JsonValue,
    ) -> Result<(), EditError> {
        let container = self.resolve_mut(path)?;
        match container {
            JsonValue::Object(entries) => {
                entries.insert(key.to_string(), value);
                Ok(())
            }
            JsonValue::Array(elements) => {
                let index = key
                    .as_index()
                    .ok_or_else(|| EditError::InvalidPath(format!("'{}' is not an index", key)))?;
                if index >= elements.len() {
                    return Err(EditError::InvalidPath(format!(
                        "index {} out of bounds for array of {}",
                        index,
                        elements.len()
                    )));
                }
                elements[index] = value;
                Ok(())
            }
            other => Err(EditError::InvalidPath(format!(
                "cannot set a key on a {}",
                other.type_name()
            ))),
        }
    }

    /// Appends a value to the array at `path`.
    pub fn append(&mut self, path: &Path, value: JsonValue) -> Result<(), EditError> {
        let container = self.resolve_mut(path)?;
        match container {
            JsonValue::Array(elements) => {
                elements.push(value);
                Ok(())
            }
            other => Err(EditError::InvalidPath(format!(
                "cannot append to a {}",
                other.type_name()
            ))),
        }
    }

    /// Renames `old_key` to `new_key` in the object at `path`, preserving
    /// the relative order of every other key.
    ///
    /// Fails with `DuplicateKey` if `new_key` already exists and is not the
    /// key being renamed.
    pub fn rename_key(
        &mut self,
        path: &Path,
        old_key: &str,
        new_key: &str,
    ) -> Result<(), EditError> {
        let container = self.resolve_mut(path)?;
        let entries = match container {
            JsonValue::Object(entries) => entries,
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot rename a key on a {}",
                    other.type_name()
                )))
            }
        };

        if !entries.contains_key(old_key) {
            return Err(EditError::InvalidPath(format!(
                "no property named '{}'",
                old_key
            )));
        }
        if new_key == old_key {
            return Ok(());
        }
        if entries.contains_key(new_key) {
            return Err(EditError::DuplicateKey(new_key.to_string()));
        }

        // Rebuild the map in original order with only the renamed key changed.
        let mut renamed = IndexMap::with_capacity(entries.len());
        for (key, value) in entries.drain(..) {
            if key == old_key {
                renamed.insert(new_key.to_string(), value);
            } else {
                renamed.insert(key, value);
            }
        }
        *entries = renamed;
        Ok(())
    }

    /// Removes and returns the node at an address.
    pub fn remove(&mut self, address: &NodeAddress) -> Result<JsonValue, EditError> {
        let container = self.resolve_mut(&address.path)?;
        match container {
            JsonValue::Object(entries) => entries
                .shift_remove(&address.key.to_string())
                .ok_or_else(|| {
                    EditError::InvalidPath(format!("no property named '{}'", address.key))
                }),
            JsonValue::Array(elements) => {
                let index = address.key.as_index().ok_or_else(|| {
                    EditError::InvalidPath(format!("'{}' is not an index", address.key))
                })?;
                if index >= elements.len() {
                    return Err(EditError::InvalidPath(format!(
                        "index {} out of bounds for array of {}",
                        index,
                        elements.len()
                    )));
                }
                Ok(elements.remove(index))
            }
            other => Err(EditError::InvalidPath(format!(
                "cannot remove from a {}",
                other.type_name()
            ))),
        }
    }

    /// Inserts `value` into an object under `desired_key`, suffixing with
    /// `_1`, `_2`, … until the key is unique. Returns the key actually used.
    pub fn insert_unique_key(
        entries: &mut IndexMap<String, JsonValue>,
        desired_key: &str,
        value: JsonValue,
    ) -> String {
        let mut key = desired_key.to_string();
        let mut counter = 1;
        while entries.contains_key(&key) {
            key = format!("{}_{}", desired_key, counter);
            counter += 1;
        }
        entries.insert(key.clone(), value);
        key
    }

    /// Inserts a value at a move destination.
    ///
    /// Object and root destinations use [`JsonTree::insert_unique_key`] with
    /// the moved node's original key; array destinations append. Fails with
    /// `InvalidDestination` when the container's runtime type does not match
    /// the destination's declared kind.
    pub fn insert_at_destination(
        &mut self,
        destination: &Destination,
        original_key: &Segment,
        value: JsonValue,
    ) -> Result<(), EditError> {
        match destination.kind {
            DestinationKind::Root => match &mut self.root {
                JsonValue::Object(entries) => {
                    Self::insert_unique_key(entries, &original_key.to_string(), value);
                    Ok(())
                }
                other => Err(EditError::InvalidDestination(format!(
                    "document root is a {}, not an object",
                    other.type_name()
                ))),
            },
            DestinationKind::Object => {
                let container = self.resolve_mut(&destination.path)?;
                match container {
                    JsonValue::Object(entries) => {
                        Self::insert_unique_key(entries, &original_key.to_string(), value);
                        Ok(())
                    }
                    other => Err(EditError::InvalidDestination(format!(
                        "'{}' is a {}, not an object",
                        destination.path,
                        other.type_name()
                    ))),
                }
            }
            DestinationKind::Array => {
                let container = self.resolve_mut(&destination.path)?;
                match container {
                    JsonValue::Array(elements) => {
                        elements.push(value);
                        Ok(())
                    }
                    other => Err(EditError::InvalidDestination(format!(
                        "'{}' is a {}, not an array",
                        destination.path,
                        other.type_name()
                    ))),
                }
            }
        }
    }

    /// Checks that a destination's declared kind matches the actual runtime
    /// type of the container it addresses.
    pub fn check_destination(&self, destination: &Destination) -> Result<(), EditError> {
        match destination.kind {
            DestinationKind::Root => {
                if self.root.is_object() {
                    Ok(())
                } else {
                    Err(EditError::InvalidDestination(format!(
                        "document root is a {}, not an object",
                        self.root.type_name()
                    )))
                }
            }
            DestinationKind::Object => {
                let container = self.resolve(&destination.path)?;
                if container.is_object() {
                    Ok(())
                } else {
                    Err(EditError::InvalidDestination(format!(
                        "'{}' is a {}, not an object",
                        destination.path,
                        container.type_name()
                    )))
                }
            }
            DestinationKind::Array => {
                let container = self.resolve(&destination.path)?;
                if container.is_array() {
                    Ok(())
                } else {
                    Err(EditError::InvalidDestination(format!(
                        "'{}' is a {}, not an array",
                        destination.path,
                        container.type_name()
                    )))
                }
            }
        }
    }

    /// Moves the node at `from` to `destination`.
    ///
    /// The destination's type is verified before the source is removed, so a
    /// kind mismatch leaves the document untouched. The value is deep-copied
    /// out, removed from its original container, then inserted at the
    /// destination with unique-key semantics for object/root landings.
    pub fn move_value(
        &mut self,
        from: &NodeAddress,
        destination: &Destination,
    ) -> Result<(), EditError> {
        self.check_destination(destination)?;
        let value = self.get(from)?.clone();
        self.remove(from)?;
        self.insert_at_destination(destination, &from.key, value)
    }

    /// Moves an element to a new position within the array at `path`.
    ///
    /// Both indices are measured against the order before the move: the
    /// element is spliced out of `from_index` and reinserted at `to_index`.
    pub fn reorder_in_array(
        &mut self,
        path: &Path,
        from_index: usize,
        to_index: usize,
    ) -> Result<(), EditError> {
        let container = self.resolve_mut(path)?;
        let elements = match container {
            JsonValue::Array(elements) => elements,
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot reorder a {}",
                    other.type_name()
                )))
            }
        };
        if from_index >= elements.len() || to_index >= elements.len() {
            return Err(EditError::InvalidPath(format!(
                "reorder index out of bounds for array of {}",
                elements.len()
            )));
        }
        let value = elements.remove(from_index);
        let insert_at = to_index.min(elements.len());
        elements.insert(insert_at, value);
        Ok(())
    }

    /// Moves a key to a new position within the object at `path`.
    ///
    /// The key is removed from the key order and reinserted at the position
    /// `to_key` occupied before the removal, mirroring the array rule.
    pub fn reorder_in_object(
        &mut self,
        path: &Path,
        from_key: &str,
        to_key: &str,
    ) -> Result<(), EditError> {
        let container = self.resolve_mut(path)?;
        let entries = match container {
            JsonValue::Object(entries) => entries,
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot reorder a {}",
                    other.type_name()
                )))
            }
        };

        let mut order: Vec<String> = entries.keys().cloned().collect();
        let from_index = order.iter().position(|k| k == from_key).ok_or_else(|| {
            EditError::InvalidPath(format!("no property named '{}'", from_key))
        })?;
        let to_index = order.iter().position(|k| k == to_key).ok_or_else(|| {
            EditError::InvalidPath(format!("no property named '{}'", to_key))
        })?;

        let key = order.remove(from_index);
        let insert_at = to_index.min(order.len());
        order.insert(insert_at, key);

        let mut reordered = IndexMap::with_capacity(entries.len());
        for key in order {
            if let Some(value) = entries.shift_remove(&key) {
                reordered.insert(key, value);
            }
        }
        *entries = reordered;
        Ok(())
    }
}

fn index_value<'a>(value: &'a JsonValue, segment: &Segment) -> Result<&'a JsonValue, EditError> {
    match value {
        JsonValue::Object(entries) => entries
            .get(&segment.to_string())
            .ok_or_else(|| EditError::InvalidPath(format!("no property named '{}'", segment))),
        JsonValue::Array(elements) => {
            let index = segment
                .as_index()
                .ok_or_else(|| EditError::InvalidPath(format!("'{}' is not an index", segment)))?;
            elements.get(index).ok_or_else(|| {
                EditError::InvalidPath(format!(
                    "index {} out of bounds for array of {}",
                    index,
                    elements.len()
                ))
            })
        }
        other => Err(EditError::InvalidPath(format!(
            "cannot traverse through a {}",
            other.type_name()
        ))),
    }
}

fn index_value_mut<'a>(
    value: &'a mut JsonValue,
    segment: &Segment,
) -> Result<&'a mut JsonValue, EditError> {
    match value {
        JsonValue::Object(entries) => entries
            .get_mut(&segment.to_string())
            .ok_or_else(|| EditError::InvalidPath(format!("no property named '{}'", segment))),
        JsonValue::Array(elements) => {
            let len = elements.len();
            let index = segment
                .as_index()
                .ok_or_else(|| EditError::InvalidPath(format!("'{}' is not an index", segment)))?;
            elements.get_mut(index).ok_or_else(|| {
                EditError::InvalidPath(format!("index {} out of bounds for array of {}", index, len))
            })
        }
        other => Err(EditError::InvalidPath(format!(
            "cannot traverse through a {}",
            other.type_name()
        ))),
    }
}
