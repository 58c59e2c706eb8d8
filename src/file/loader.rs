//! Document loading.
//!
//! Reads JSON documents from the filesystem or stdin and runs them through
//! the import contract (root must be an object or array). Gzipped input is
//! decompressed transparently: by `.gz` extension for files, by magic bytes
//! for stdin.

use crate::document::parser::parse_document;
use crate::document::tree::JsonTree;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Loads and parses a JSON document from a file.
///
/// A path ending in `.gz` is decompressed before parsing.
///
/// # Arguments
///
/// * `path` - The path of the JSON file to load
///
/// # Returns
///
/// Returns a `JsonTree` ready for editing.
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read
/// - The contents are not valid JSON
/// - The document root is a primitive rather than an object or array
///
/// # Examples
///
/// ```no_run
/// use jsonforge::file::loader::load_json_file;
///
/// let tree = load_json_file("config.json").unwrap();
/// assert!(tree.root().is_container());
/// ```
pub fn load_json_file<P: AsRef<Path>>(path: P) -> Result<JsonTree> {
    let path = path.as_ref();

    let is_gzipped = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path)?
    } else {
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?
    };

    parse_document(&content).with_context(|| format!("Failed to load {}", path.display()))
}

/// Loads and parses a JSON document from standard input.
///
/// Gzip input is detected by its magic bytes, so piping a compressed file
/// works without a filename hint.
pub fn load_json_from_stdin() -> Result<JsonTree> {
    let mut buffer = Vec::new();
    std::io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;

    let content = if buffer.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(&buffer)?
    } else {
        String::from_utf8(buffer).context("Invalid UTF-8 in stdin")?
    };

    parse_document(&content).context("Failed to parse stdin")
}

fn read_gzipped_file(path: &Path) -> Result<String> {
    let bytes =
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decompress_gzip_bytes(&bytes)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzip data")?;
    Ok(content)
}
