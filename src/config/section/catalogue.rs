//! `[catalogue]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [catalogue]
//! files = ["icons/regular.json", "icons/brands.json"]
//! ```
//!
//! Paths are relative to the config file. Later files override earlier
//! definitions of the same icon.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Icon catalogue sources.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CatalogueConfig {
    /// Icon definition files (JSON).
    pub files: Vec<PathBuf>,
}

impl CatalogueConfig {
    /// Make every file path absolute against `root`.
    pub fn normalize(&mut self, root: &Path) {
        for file in &mut self.files {
            if file.is_relative() {
                *file = root.join(&*file);
            }
        }
    }
}
