//! Editing engine: history, selection, and the mutation operations.
//!
//! # Modules
//!
//! - `history`: bounded linear undo/redo log of document snapshots
//! - `selection`: multi-selection with ancestor filtering
//! - `destination`: move targets and candidate enumeration
//! - `session`: the `EditorSession` that owns all editing state

pub mod destination;
pub mod history;
pub mod selection;
pub mod session;
