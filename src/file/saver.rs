//! Document saving.
//!
//! Writes are atomic: the document is serialized to a temporary file in the
//! target directory and renamed into place, so a crash never leaves a
//! half-written file. A `.gz` target is gzip-compressed; an optional `.bak`
//! copy of the previous file can be kept.

use crate::config::Config;
use crate::document::parser::to_json_string_indented;
use crate::document::tree::JsonTree;
use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Saves a document tree to a file.
///
/// The document is serialized with the configured indent width and written
/// to a temporary file in the target directory, then renamed into place.
/// A path ending in `.gz` is gzip-compressed. When `config.create_backup`
/// is set and the target already exists, the previous contents are copied
/// to `<name>.bak` first.
///
/// # Arguments
///
/// * `path` - Destination path for the document
/// * `tree` - The document tree to serialize
/// * `config` - Supplies the indent width and backup policy
///
/// # Returns
///
/// Returns `Ok(())` once the rename has completed.
///
/// # Errors
///
/// This function will return an error if:
/// - The backup copy cannot be created
/// - The temporary file cannot be written
/// - The rename into place fails
///
/// # Examples
///
/// ```no_run
/// use jsonforge::config::Config;
/// use jsonforge::document::parser::parse_document;
/// use jsonforge::file::saver::save_json_file;
///
/// let tree = parse_document(r#"{"a": 1}"#).unwrap();
/// save_json_file("out.json", &tree, &Config::default()).unwrap();
/// ```
pub fn save_json_file<P: AsRef<Path>>(path: P, tree: &JsonTree, config: &Config) -> Result<()> {
    let path = path.as_ref();
    let should_compress = path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let mut json = to_json_string_indented(tree, config.indent_size);
    json.push('\n');

    let bytes = if should_compress {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(json.as_bytes())
            .context("Failed to compress document")?;
        encoder.finish().context("Failed to finish compression")?
    } else {
        json.into_bytes()
    };

    write_atomic(path, &bytes)
}

/// Copies the existing file aside with a `.bak` extension.
fn create_backup(path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    let mut backup = path.to_path_buf();
    backup.set_file_name(format!("{}.bak", name));
    fs::copy(path, backup).context("Failed to create backup")?;
    Ok(())
}

/// Writes to a sibling temp file and renames it over the target.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    let mut tmp = path.to_path_buf();
    tmp.set_file_name(format!(".{}.tmp", name));

    fs::write(&tmp, bytes).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to move temp file into {}", path.display()))?;
    Ok(())
}
