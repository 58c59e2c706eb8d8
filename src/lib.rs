//! jsonforge: a structural JSON document editor core.
//!
//! The crate models the editing engine behind a visual JSON structure
//! builder: an ordered document tree addressed by structural paths, a
//! bounded undo/redo history of whole-document snapshots, a multi-selection
//! set with ancestor filtering, and a mutation engine whose operations are
//! all-or-nothing. Rendering, input handling, and persistence policy are the
//! caller's concern; the engine exposes a revision counter as its
//! "document changed" signal.
//!
//! # Example
//!
//! ```
//! use jsonforge::editor::session::EditorSession;
//! use jsonforge::path::Path;
//!
//! let mut session = EditorSession::new();
//! session.add_object(&Path::root(), Some("user")).unwrap();
//! assert!(session.undo());
//! assert_eq!(session.serialize(), "{}");
//! ```

pub mod config;
pub mod document;
pub mod editor;
pub mod error;
pub mod file;
pub mod path;

pub use error::EditError;
