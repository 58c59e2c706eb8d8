//! File loading and saving, with transparent gzip support.

pub mod loader;
pub mod saver;
