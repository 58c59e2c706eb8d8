//! Bounded linear undo/redo history.
//!
//! The history is a flat list of whole-document snapshots with a cursor.
//! Every mutation records the pre-mutation state before it runs; pushing a
//! new snapshot after undoing truncates the abandoned future, and the log is
//! capped, dropping the oldest entries while keeping the cursor on the same
//! logical state.
//!
//! Undo has to be able to come back: the first undo after a run of
//! mutations captures the live document at the top of the log so that redo
//! restores the newest state instead of stopping one step short.

use crate::document::tree::JsonTree;
use crate::path::Path;

/// Default maximum number of history entries.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// A recorded editor state: the document plus the editing context path.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub document: JsonTree,
    pub current_path: Path,
}

/// Linear snapshot log with a cursor.
///
/// `cursor` counts the entries behind us: it is the index the next undo
/// restores from, and equals `entries.len()` when no undo is pending.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Creates an empty history bounded to `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry cap.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// True if an undo would restore something.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True if a redo would restore something.
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Records the pre-mutation state of the document.
    ///
    /// Truncates any entries past the cursor (redo states abandoned by a new
    /// edit), then appends and advances. If the log exceeds its cap the
    /// oldest entries are dropped and the cursor shifts with them.
    pub fn snapshot(&mut self, document: &JsonTree, current_path: &Path) {
        self.entries.truncate(self.cursor);
        self.entries.push(HistoryEntry {
            document: document.clone(),
            current_path: current_path.clone(),
        });
        self.cursor = self.entries.len();

        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            self.cursor -= excess;
        }
    }

    /// Steps back one state, returning the entry to restore.
    ///
    /// `live_document` and `live_path` are the editor's current state; they
    /// are pushed onto the log on the first undo after a mutation so redo
    /// can return to them. The live entry counts against the cap, so on a
    /// full log it evicts the oldest snapshot. Returns `None` at the oldest
    /// entry.
    pub fn undo(&mut self, live_document: &JsonTree, live_path: &Path) -> Option<HistoryEntry> {
        if self.cursor == 0 {
            return None;
        }
        if self.cursor == self.entries.len() {
            self.entries.push(HistoryEntry {
                document: live_document.clone(),
                current_path: live_path.clone(),
            });
            if self.entries.len() > self.limit {
                // Never evict the entry this undo is about to restore.
                let excess =
                    (self.entries.len() - self.limit).min(self.cursor.saturating_sub(1));
                self.entries.drain(..excess);
                self.cursor -= excess;
            }
        }
        self.cursor -= 1;
        Some(self.entries[self.cursor].clone())
    }

    /// Steps forward one state, returning the entry to restore.
    ///
    /// Returns `None` at the newest entry.
    pub fn redo(&mut self) -> Option<HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.entries[self.cursor].clone())
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
