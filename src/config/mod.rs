//! Configuration for jsonforge.
//!
//! Settings load from a TOML file and fall back to defaults field by field,
//! so a partial config file is always valid.
//!
//! # Example
//!
//! ```
//! use jsonforge::config::Config;
//!
//! let config = Config::default();
//! assert_eq!(config.undo_limit, 100);
//! assert_eq!(config.indent_size, 2);
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Maximum number of undo snapshots to keep.
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,

    /// Number of spaces per indentation level when saving.
    #[serde(default = "default_indent_size")]
    pub indent_size: usize,

    /// Create .bak files before overwriting an existing file.
    #[serde(default)]
    pub create_backup: bool,
}

fn default_undo_limit() -> usize {
    100
}

fn default_indent_size() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            undo_limit: default_undo_limit(),
            indent_size: default_indent_size(),
            create_backup: false,
        }
    }
}

impl Config {
    /// Parses configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config file")
    }

    /// Returns the default config file path:
    /// `<config dir>/jsonforge/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("jsonforge").join("config.toml"))
    }

    /// Loads configuration from the default location, falling back to
    /// defaults when no file exists.
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                Self::from_toml(&text)
            }
            _ => Ok(Self::default()),
        }
    }
}
