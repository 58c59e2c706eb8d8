//! Editor session: the mutation engine.
//!
//! `EditorSession` owns the document tree, the undo/redo history, the
//! selection set, and the current editing context path. Every structural
//! operation goes through it, and each one follows the same contract:
//!
//! 1. check every precondition against the untouched document
//! 2. snapshot the pre-mutation state into history
//! 3. apply the mutation
//! 4. bump the revision counter (the "document changed" signal)
//!
//! A failed precondition returns an [`EditError`] and leaves document,
//! history, and selection exactly as they were. Multi-step mutations (moves,
//! drag/drop, bulk operations) are applied to a working copy and committed
//! whole, so a failure partway through can never leave a half-moved tree.
//!
//! # Example
//!
//! ```
//! use jsonforge::document::node::JsonValue;
//! use jsonforge::editor::session::EditorSession;
//! use jsonforge::path::{Path, Segment};
//!
//! let mut session = EditorSession::new();
//! session.add_object(&Path::root(), Some("user")).unwrap();
//! session
//!     .add_key_value(
//!         &Path::from_segments(vec![Segment::key("user")]),
//!         "name",
//!         JsonValue::String("Ana".to_string()),
//!     )
//!     .unwrap();
//!
//! assert_eq!(session.serialize(), "{\n  \"user\": {\n    \"name\": \"Ana\"\n  }\n}");
//!
//! session.undo();
//! session.undo();
//! assert_eq!(session.serialize(), "{}");
//! ```

use indexmap::IndexMap;

use super::destination::{candidate_destinations, Destination};
use super::history::{History, DEFAULT_HISTORY_LIMIT};
use super::selection::SelectionSet;
use crate::document::node::{JsonValue, ValueType};
use crate::document::parser::{parse_document, to_json_string};
use crate::document::tree::JsonTree;
use crate::error::EditError;
use crate::path::{NodeAddress, Path, Segment};

/// How an imported document combines with the existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Replace the document root with the imported root.
    Replace,
    /// Shallow-merge the imported object into the existing object root,
    /// overwriting colliding keys. Both roots must be objects.
    Merge,
}

/// The editing session: document, history, selection, and context path.
#[derive(Debug)]
pub struct EditorSession {
    tree: JsonTree,
    history: History,
    selection: SelectionSet,
    current_path: Path,
    revision: u64,
    dirty: bool,
}

impl EditorSession {
    /// Creates a session over an empty document.
    pub fn new() -> Self {
        Self::with_tree(JsonTree::empty())
    }

    /// Creates a session over an existing document.
    pub fn with_tree(tree: JsonTree) -> Self {
        Self::with_limit(tree, DEFAULT_HISTORY_LIMIT)
    }

    /// Creates a session with a custom history cap.
    pub fn with_limit(tree: JsonTree, history_limit: usize) -> Self {
        Self {
            tree,
            history: History::new(history_limit),
            selection: SelectionSet::new(),
            current_path: Path::root(),
            revision: 0,
            dirty: false,
        }
    }

    pub fn tree(&self) -> &JsonTree {
        &self.tree
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Moves the editing context to a container path.
    pub fn set_current_path(&mut self, path: Path) -> Result<(), EditError> {
        let target = self.tree.resolve(&path)?;
        if !target.is_container() {
            return Err(EditError::InvalidPath(format!(
                "'{}' is a {}, not a container",
                path,
                target.type_name()
            )));
        }
        self.current_path = path;
        Ok(())
    }

    /// Monotonic counter bumped by every successful mutation and by
    /// undo/redo. The renderer re-draws when it observes a change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clears the dirty flag, typically after a save.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // Selection is mediated here because toggling needs the document to
    // enumerate descendants.

    pub fn toggle_selection(&mut self, address: NodeAddress) {
        self.selection.toggle(&self.tree, address);
    }

    pub fn select_all(&mut self) {
        self.selection.select_all(&self.tree);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn checkpoint(&mut self) {
        self.history.snapshot(&self.tree, &self.current_path);
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.dirty = true;
    }

    /// Adds a key/value pair to the container at `path`.
    ///
    /// In an object the key must be new; in an array the pair is appended
    /// wrapped as a one-entry object, so duplicate keys cannot collide.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the container receiving the pair
    /// * `key` - Key name; surrounding whitespace is trimmed
    /// * `value` - The value to store
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trimmed key is empty (`Validation`)
    /// - `path` does not resolve to a container (`InvalidPath`)
    /// - The container is an object that already has `key` (`DuplicateKey`)
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonforge::document::node::JsonValue;
    /// use jsonforge::editor::session::EditorSession;
    /// use jsonforge::path::Path;
    ///
    /// let mut session = EditorSession::new();
    /// session
    ///     .add_key_value(&Path::root(), "name", JsonValue::String("Ana".to_string()))
    ///     .unwrap();
    /// assert_eq!(session.serialize(), "{\n  \"name\": \"Ana\"\n}");
    /// ```
    pub fn add_key_value(
        &mut self,
        path: &Path,
        key: &str,
        value: JsonValue,
    ) -> Result<(), EditError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(EditError::Validation(
                "Key name cannot be empty".to_string(),
            ));
        }

        let container = self.tree.resolve(path)?;
        match container {
            JsonValue::Object(entries) => {
                if entries.contains_key(key) {
                    return Err(EditError::DuplicateKey(key.to_string()));
                }
                self.checkpoint();
                self.tree.set_key(path, &Segment::key(key), value)?;
            }
            JsonValue::Array(_) => {
                self.checkpoint();
                let mut wrapped = IndexMap::new();
                wrapped.insert(key.to_string(), value);
                self.tree.append(path, JsonValue::Object(wrapped))?;
            }
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot add a property to a {}",
                    other.type_name()
                )))
            }
        }
        self.touch();
        Ok(())
    }

    /// Appends a value directly to the array at `path`.
    pub fn add_array_value(&mut self, path: &Path, value: JsonValue) -> Result<(), EditError> {
        let container = self.tree.resolve(path)?;
        if !container.is_array() {
            return Err(EditError::Validation(
                "The current context is not an array".to_string(),
            ));
        }
        self.checkpoint();
        self.tree.append(path, value)?;
        self.touch();
        Ok(())
    }

    /// Adds an empty array to the container at `path`.
    ///
    /// An object container requires a unique, non-empty name; an array
    /// container takes an appended unnamed array.
    pub fn add_array(&mut self, path: &Path, name: Option<&str>) -> Result<(), EditError> {
        self.add_container(path, name, JsonValue::empty_array(), "array")
    }

    /// Adds an empty object to the container at `path`.
    ///
    /// An object container requires a unique, non-empty name; an array
    /// container takes an appended unnamed object.
    pub fn add_object(&mut self, path: &Path, name: Option<&str>) -> Result<(), EditError> {
        self.add_container(path, name, JsonValue::empty_object(), "object")
    }

    fn add_container(
        &mut self,
        path: &Path,
        name: Option<&str>,
        value: JsonValue,
        what: &str,
    ) -> Result<(), EditError> {
        let container = self.tree.resolve(path)?;
        match container {
            JsonValue::Array(_) => {
                self.checkpoint();
                self.tree.append(path, value)?;
            }
            JsonValue::Object(entries) => {
                let name = name.map(str::trim).unwrap_or("");
                if name.is_empty() {
                    return Err(EditError::Validation(format!(
                        "Please provide a name for the {}",
                        what
                    )));
                }
                if entries.contains_key(name) {
                    return Err(EditError::DuplicateKey(name.to_string()));
                }
                self.checkpoint();
                self.tree.set_key(path, &Segment::key(name), value)?;
            }
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot add an {} to a {}",
                    what,
                    other.type_name()
                )))
            }
        }
        self.touch();
        Ok(())
    }

    /// Renames a key in the object at `path`, preserving key order.
    ///
    /// Renaming a key to itself is a no-op and records no history entry.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the object holding the key
    /// * `old_key` - The key to rename
    /// * `new_key` - The new name; surrounding whitespace is trimmed
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The trimmed new key is empty (`Validation`)
    /// - `path` does not resolve to an object, or `old_key` is missing
    ///   (`InvalidPath`)
    /// - `new_key` already exists in the object (`DuplicateKey`)
    pub fn rename_key(
        &mut self,
        path: &Path,
        old_key: &str,
        new_key: &str,
    ) -> Result<(), EditError> {
        let new_key = new_key.trim();
        if new_key.is_empty() {
            return Err(EditError::Validation(
                "Key name cannot be empty".to_string(),
            ));
        }
        if new_key == old_key {
            return Ok(());
        }

        // Validate against the live tree before snapshotting.
        let container = self.tree.resolve(path)?;
        match container {
            JsonValue::Object(entries) => {
                if !entries.contains_key(old_key) {
                    return Err(EditError::InvalidPath(format!(
                        "no property named '{}'",
                        old_key
                    )));
                }
                if entries.contains_key(new_key) {
                    return Err(EditError::DuplicateKey(new_key.to_string()));
                }
            }
            other => {
                return Err(EditError::InvalidPath(format!(
                    "cannot rename a key on a {}",
                    other.type_name()
                )))
            }
        }

        self.checkpoint();
        self.tree.rename_key(path, old_key, new_key)?;
        self.touch();
        Ok(())
    }

    /// Replaces the value at an address with a primitive coerced from raw
    /// editor input.
    pub fn edit_primitive_value(
        &mut self,
        address: &NodeAddress,
        value_type: ValueType,
        raw: &str,
    ) -> Result<(), EditError> {
        if !self.tree.contains(address) {
            return Err(EditError::InvalidPath(format!(
                "no element at '{}'",
                address
            )));
        }
        self.checkpoint();
        self.tree
            .set_key(&address.path, &address.key, value_type.coerce(raw))?;
        self.touch();
        Ok(())
    }

    /// Removes the element at an address.
    pub fn remove_element(&mut self, address: &NodeAddress) -> Result<(), EditError> {
        if !self.tree.contains(address) {
            return Err(EditError::InvalidPath(format!(
                "no element at '{}'",
                address
            )));
        }
        self.checkpoint();
        self.tree.remove(address)?;
        self.touch();
        Ok(())
    }

    /// Removes every selected element.
    ///
    /// Only the top-level selected entries are processed; a selected child
    /// of a selected container goes with its parent. Entries are removed
    /// deepest first, and within one array highest index first, so earlier
    /// removals never shift an address still waiting to be processed.
    ///
    /// # Returns
    ///
    /// The number of top-level entries removed.
    ///
    /// # Errors
    ///
    /// Returns `EmptySelection` if nothing is selected, or `InvalidPath` if
    /// a selected address no longer resolves. On error the document,
    /// history, and selection are untouched.
    pub fn remove_selected(&mut self) -> Result<usize, EditError> {
        if self.selection.is_empty() {
            return Err(EditError::EmptySelection);
        }

        let ordered = self.selection.ordered_for_mutation(&self.tree);
        let mut work = self.tree.clone();
        for address in &ordered {
            work.remove(address)?;
        }

        self.checkpoint();
        self.tree = work;
        self.selection.clear();
        self.touch();
        Ok(ordered.len())
    }

    /// Moves a single element to a destination container.
    ///
    /// Landing in an object (or the root) keeps the element's key,
    /// suffixing `_1`, `_2`, … on collision; landing in an array appends.
    ///
    /// # Arguments
    ///
    /// * `source` - Address of the element to move
    /// * `destination` - The container it lands in
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `source` does not resolve (`InvalidPath`)
    /// - The destination lies inside the element being moved, or its
    ///   declared kind does not match the container's runtime type
    ///   (`InvalidDestination`)
    ///
    /// On error the document and history are untouched.
    pub fn move_element(
        &mut self,
        source: &NodeAddress,
        destination: &Destination,
    ) -> Result<(), EditError> {
        if !self.tree.contains(source) {
            return Err(EditError::InvalidPath(format!("no element at '{}'", source)));
        }
        if source.full_path().is_prefix_of(&destination.path) {
            return Err(EditError::InvalidDestination(
                "destination is inside the element being moved".to_string(),
            ));
        }

        let mut work = self.tree.clone();
        work.move_value(source, destination)?;

        self.checkpoint();
        self.tree = work;
        self.touch();
        Ok(())
    }

    /// Moves every selected element to a destination container.
    ///
    /// Values are copied out before any removal, so the selected addresses
    /// all resolve against the pre-move document. The whole batch commits
    /// atomically: either every top-level entry moves or none do.
    ///
    /// # Returns
    ///
    /// The number of top-level entries moved.
    ///
    /// # Errors
    ///
    /// Returns `EmptySelection` if nothing is selected, or
    /// `InvalidDestination` if the destination lies inside a moved element
    /// or its declared kind does not match the container's runtime type.
    pub fn move_selected(&mut self, destination: &Destination) -> Result<usize, EditError> {
        if self.selection.is_empty() {
            return Err(EditError::EmptySelection);
        }

        let ordered = self.selection.ordered_for_mutation(&self.tree);
        for address in &ordered {
            if address.full_path().is_prefix_of(&destination.path) {
                return Err(EditError::InvalidDestination(
                    "destination is inside an element being moved".to_string(),
                ));
            }
        }
        self.tree.check_destination(destination)?;

        let mut work = self.tree.clone();
        // Deep-copy every element before the first removal so the ordered
        // addresses all resolve against the same pre-mutation shape.
        let mut moved = Vec::with_capacity(ordered.len());
        for address in &ordered {
            moved.push((address.key.clone(), work.get(address)?.clone()));
        }
        for address in &ordered {
            work.remove(address)?;
        }
        for (key, value) in moved {
            work.insert_at_destination(destination, &key, value)?;
        }

        let count = ordered.len();
        self.checkpoint();
        self.tree = work;
        self.selection.clear();
        self.touch();
        Ok(count)
    }

    /// Drops `source` onto `target`.
    ///
    /// - onto a container: the source moves into it
    /// - onto a sibling (same parent): the parent's order changes — the
    ///   source is spliced out and reinserted at the target's pre-removal
    ///   position
    /// - onto anything else: the source moves into the target's parent
    ///
    /// # Arguments
    ///
    /// * `source` - Address of the element being dragged
    /// * `target` - Address of the element it is dropped on
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the target is the source itself or one of
    /// its descendants, and `InvalidPath` when either address no longer
    /// resolves. On error nothing changes.
    ///
    /// # Examples
    ///
    /// ```
    /// use jsonforge::document::parser::parse_document;
    /// use jsonforge::editor::session::EditorSession;
    /// use jsonforge::path::{NodeAddress, Path, Segment};
    ///
    /// let tree = parse_document(r#"{"items": ["A", "B", "C"]}"#).unwrap();
    /// let mut session = EditorSession::with_tree(tree);
    /// let items = Path::from_segments(vec![Segment::key("items")]);
    ///
    /// session
    ///     .drag_drop(
    ///         &NodeAddress::new(items.clone(), Segment::index(0)),
    ///         &NodeAddress::new(items, Segment::index(2)),
    ///     )
    ///     .unwrap();
    /// assert!(session.serialize().contains("\"B\",\n    \"C\",\n    \"A\""));
    /// ```
    pub fn drag_drop(
        &mut self,
        source: &NodeAddress,
        target: &NodeAddress,
    ) -> Result<(), EditError> {
        if source.is_same_location(target) {
            return Err(EditError::Validation(
                "Cannot drop an element onto itself".to_string(),
            ));
        }
        if source.is_ancestor_of(target) {
            return Err(EditError::Validation(
                "Cannot drop an element into its own contents".to_string(),
            ));
        }
        self.tree.get(source)?;
        let target_value = self.tree.get(target)?;

        let mut work = self.tree.clone();
        match target_value {
            JsonValue::Object(_) => {
                work.move_value(source, &Destination::object(target.full_path()))?;
            }
            JsonValue::Array(_) => {
                work.move_value(source, &Destination::array(target.full_path()))?;
            }
            _ if source.path == target.path => {
                let parent = self.tree.resolve(&source.path)?;
                if parent.is_array() {
                    let from = source.key.as_index().ok_or_else(|| {
                        EditError::InvalidPath(format!("'{}' is not an index", source.key))
                    })?;
                    let to = target.key.as_index().ok_or_else(|| {
                        EditError::InvalidPath(format!("'{}' is not an index", target.key))
                    })?;
                    work.reorder_in_array(&source.path, from, to)?;
                } else {
                    work.reorder_in_object(
                        &source.path,
                        &source.key.to_string(),
                        &target.key.to_string(),
                    )?;
                }
            }
            _ => {
                let parent = self.tree.resolve(&target.path)?;
                let destination = if parent.is_array() {
                    Destination::array(target.path.clone())
                } else {
                    Destination::object(target.path.clone())
                };
                work.move_value(source, &destination)?;
            }
        }

        self.checkpoint();
        self.tree = work;
        self.touch();
        Ok(())
    }

    /// Lists every container that can receive the given nodes in a move.
    pub fn destinations(&self, moving: &[NodeAddress]) -> Vec<Destination> {
        candidate_destinations(&self.tree, moving)
    }

    /// Imports JSON text, replacing the document or shallow-merging into an
    /// object root.
    ///
    /// A successful import resets the editing context to the root and
    /// clears the selection. The previous document stays one undo away.
    ///
    /// # Arguments
    ///
    /// * `text` - The JSON text to import
    /// * `mode` - `Replace` swaps the whole document; `Merge` copies the
    ///   imported object's keys into the existing object root, overwriting
    ///   collisions
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `text` is not valid JSON (`Parse`, carrying the parser's message)
    /// - The imported root is a primitive (`Validation`)
    /// - `Merge` was requested and either root is not an object
    ///   (`Validation`)
    pub fn import_document(&mut self, text: &str, mode: ImportMode) -> Result<(), EditError> {
        let imported = parse_document(text)?;

        match mode {
            ImportMode::Replace => {
                self.checkpoint();
                self.tree = imported;
            }
            ImportMode::Merge => {
                if !self.tree.root().is_object() || !imported.root().is_object() {
                    return Err(EditError::Validation(
                        "Merge requires both documents to be objects".to_string(),
                    ));
                }
                self.checkpoint();
                if let (JsonValue::Object(existing), JsonValue::Object(incoming)) =
                    (self.tree.root().clone(), imported.root())
                {
                    let mut merged = existing;
                    for (key, value) in incoming {
                        merged.insert(key.clone(), value.clone());
                    }
                    self.tree.set_root(JsonValue::Object(merged));
                }
            }
        }

        self.current_path = Path::root();
        self.selection.clear();
        self.touch();
        Ok(())
    }

    /// Resets the document to an empty object.
    pub fn clear_document(&mut self) {
        self.checkpoint();
        self.tree = JsonTree::empty();
        self.current_path = Path::root();
        self.selection.clear();
        self.touch();
    }

    /// Restores the previous state. Returns false at the oldest entry.
    pub fn undo(&mut self) -> bool {
        match self.history.undo(&self.tree, &self.current_path) {
            Some(entry) => {
                self.tree = entry.document;
                self.current_path = entry.current_path;
                // Selected addresses may no longer exist in the restored tree.
                self.selection.clear();
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Replays the next state. Returns false at the newest entry.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(entry) => {
                self.tree = entry.document;
                self.current_path = entry.current_path;
                self.selection.clear();
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Serializes the document to pretty-printed JSON (2-space indent).
    pub fn serialize(&self) -> String {
        to_json_string(&self.tree)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new()
    }
}
