//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Locate `config_name`, searching the cwd and then each of its ancestors.
///
/// ```text
/// /home/user/site/_site/posts/    <- cwd
/// /home/user/site/tola-icons.toml <- found
/// ```
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_file_from(&cwd, config_name)
}

/// Like [`find_config_file`] but starting at `start`. Absolute names are
/// only checked for existence.
pub fn find_config_file_from(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.is_file().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

// ============================================================================
// tests
// ============================================================================
