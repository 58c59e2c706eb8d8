//! JSON document model.
//!
//! # Modules
//!
//! - `node`: the `JsonValue` type and primitive-type coercion
//! - `tree`: path-addressed structural operations on a document
//! - `parser`: JSON text import/export

pub mod node;
pub mod parser;
pub mod tree;
