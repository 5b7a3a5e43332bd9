//! Site configuration management for `folio.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                           |
//! |-------------|---------------------------------------------------|
//! | `[build]`   | Directories, extensions, patterns, plugin list    |
//! | `[context]` | Base context merged into every document           |
//!
//! # Example
//!
//! ```toml
//! [build]
//! content = "content"
//! publish = "publish"
//! plugins = ["blocks", "handlebars"]
//!
//! [context]
//! site = "My Site"
//! ```

mod build;
pub mod defaults;
mod error;
mod handle;
mod paths;

pub use build::BuildConfig;
pub use error::ConfigError;
pub use handle::{ConfigHandle, ConfigSnapshot};
pub use paths::{DocumentPaths, PathResolver};

use crate::cli::{Cli, Commands};
use crate::pipeline::Context;
use crate::plugins::BUILTIN_PLUGINS;
use crate::utils::path::bare_ext;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing folio.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Base context, the innermost layer of every document context
    #[serde(default)]
    pub context: Context,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Load the config named by the CLI, falling back to defaults when absent.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = cli.root.as_deref().unwrap_or(Path::new("./"));
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.update_with_cli(cli);
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Path resolver over this config's roots and extensions.
    #[inline]
    pub fn paths(&self) -> PathResolver<'_> {
        PathResolver::new(self.get_root(), &self.build)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let base = cli
            .root
            .clone()
            .unwrap_or_else(|| self.get_root().to_owned());
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => base.join(name),
            _ => base,
        };

        let root = Self::normalize_path(&Self::expand_tilde(&root));
        self.set_root(&root);
        self.config_path = Self::normalize_path(&root.join(&cli.config));

        Self::update_option(&mut self.build.content, cli.content.as_ref());
        Self::update_option(&mut self.build.publish, cli.publish.as_ref());
        Self::update_option(&mut self.build.assets, cli.assets.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn expand_tilde(path: &Path) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            // For non-existent paths, manually make them absolute
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration before a pipeline is created from it.
    pub fn validate(&self) -> Result<()> {
        if bare_ext(&self.build.content_ext).is_empty() {
            bail!(ConfigError::Validation(
                "[build.content_ext] must not be empty".into()
            ));
        }
        if bare_ext(&self.build.publish_ext).is_empty() {
            bail!(ConfigError::Validation(
                "[build.publish_ext] must not be empty".into()
            ));
        }

        // Compiles both patterns
        ConfigSnapshot::new(self.clone())?;

        if let Some(unknown) = self
            .build
            .plugins
            .iter()
            .find(|name| !BUILTIN_PLUGINS.contains(&name.as_str()))
        {
            bail!(ConfigError::Validation(format!(
                "unknown plugin `{unknown}` in [build.plugins], expected one of: {}",
                BUILTIN_PLUGINS.join(", ")
            )));
        }

        let content = self.paths().content_root();
        if !content.is_dir() {
            bail!(ConfigError::Validation(format!(
                "content directory `{}` not found",
                content.display()
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
