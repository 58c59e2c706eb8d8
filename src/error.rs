//! Error types for document editing operations.
//!
//! Every failure here is recoverable: operations check their preconditions
//! before touching the document or the history, so an error always means
//! "nothing happened" plus a message suitable for showing to the user.

use std::fmt;

/// Errors raised at the mutation-operation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// A path could not be resolved to a container, or an address to a node.
    InvalidPath(String),
    /// A key name collided where auto-suffixing does not apply (rename,
    /// explicit inserts into a map).
    DuplicateKey(String),
    /// A move destination's declared kind did not match the container's
    /// actual runtime type.
    InvalidDestination(String),
    /// Imported text was not valid JSON. Carries the parser's message verbatim.
    Parse(String),
    /// Imported JSON was valid but its root was not an object or array,
    /// or some other operation input failed validation.
    Validation(String),
    /// A bulk operation was invoked with nothing selected.
    EmptySelection,
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidPath(detail) => write!(f, "Invalid path: {}", detail),
            EditError::DuplicateKey(key) => {
                write!(f, "A property named '{}' already exists", key)
            }
            EditError::InvalidDestination(detail) => {
                write!(f, "Invalid move destination: {}", detail)
            }
            EditError::Parse(msg) => write!(f, "Invalid JSON: {}", msg),
            EditError::Validation(msg) => write!(f, "{}", msg),
            EditError::EmptySelection => write!(f, "No elements selected"),
        }
    }
}

impl std::error::Error for EditError {}
