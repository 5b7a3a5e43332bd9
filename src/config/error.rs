//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern in [build.{field}]")]
    Pattern {
        field: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("Config validation error: {0}")]
    Validation(String),
}
