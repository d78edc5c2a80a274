//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! input = "_site"     # rendered pages to read
//! output = "_site"    # where rewritten pages go (may equal input)
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Page input/output directories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("_site"),
            output: PathBuf::from("_site"),
        }
    }
}

impl BuildConfig {
    pub fn normalize(&mut self, root: &Path) {
        if self.input.is_relative() {
            self.input = root.join(&self.input);
        }
        if self.output.is_relative() {
            self.output = root.join(&self.output);
        }
    }

    /// Pages are rewritten where they were read.
    pub fn in_place(&self) -> bool {
        self.input == self.output
    }
}
