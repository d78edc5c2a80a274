//! Configuration management for `tola-icons.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [icons], [catalogue], [build]
//! ├── error.rs       # ConfigError
//! ├── util.rs        # config file discovery
//! └── mod.rs         # IconsConfig (this file)
//! ```
//!
//! A missing config file is fine as long as the default name was used;
//! everything then comes from defaults and CLI flags.

pub mod error;
pub mod section;
mod util;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

pub use error::ConfigError;
pub use section::{BuildConfig, CatalogueConfig, IconOptions};
use util::find_config_file;

use crate::cli::{BuildArgs, Cli, Commands};
use crate::log;

/// Default config file name.
pub const DEFAULT_CONFIG: &str = "tola-icons.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing tola-icons.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IconsConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Icon transform settings
    pub icons: IconOptions,

    /// Icon definition sources
    pub catalogue: CatalogueConfig,

    /// Page directories
    pub build: BuildConfig,
}

impl IconsConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; the project root is
    /// the config file's parent directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, config_path) = match find_config_file(&cli.config) {
            Some(path) => (Self::from_path(&path)?, path),
            None if cli.config.as_os_str() != DEFAULT_CONFIG => {
                bail!("Config file '{}' not found", cli.config.display());
            }
            None => (Self::default(), cwd.join(&cli.config)),
        };

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        config.config_path = config_path;
        config.root = root.clone();
        config.catalogue.normalize(&root);
        config.build.normalize(&root);
        config.apply_cli(cli, &cwd);

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file. Unknown keys are reported, not rejected.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, unknown) = Self::parse_with_ignored(&content)?;
        for key in &unknown {
            log!("warn"; "{}: unknown key `{}` ignored", path.display(), key);
        }
        Ok(config)
    }

    /// Deserialize `content`, returning the dotted paths of unused keys.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut unknown = Vec::new();
        let config = serde_ignored::deserialize(toml::Deserializer::new(content), |key| {
            unknown.push(key.to_string())
        })?;
        Ok((config, unknown))
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply CLI flags on top of file values. CLI paths are cwd-relative.
    fn apply_cli(&mut self, cli: &Cli, cwd: &Path) {
        self.catalogue
            .files
            .extend(cli.catalogue.iter().map(|file| cwd.join(file)));

        if let Commands::Build { args } = &cli.command {
            self.apply_build_args(args, cwd);
        }
    }

    fn apply_build_args(&mut self, args: &BuildArgs, cwd: &Path) {
        if let Some(input) = &args.input {
            self.build.input = cwd.join(input);
            // output follows input unless given explicitly
            if args.output.is_none() {
                self.build.output = self.build.input.clone();
            }
        }
        if let Some(output) = &args.output {
            self.build.output = cwd.join(output);
        }
        if let Some(fail) = args.fail_on_error {
            self.icons.fail_on_error = fail;
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the final configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut problems = self.icons.check();

        if self.catalogue.files.is_empty() {
            problems.push(
                "no icon catalogue configured (set [catalogue] files or pass --catalogue)"
                    .to_string(),
            );
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(problems.join("; ")))
        }
    }
}
