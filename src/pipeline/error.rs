//! Pipeline error types.

use super::Hook;
use crate::config::ConfigError;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Errors raised by pipeline stages.
///
/// `Parse` never escapes the core: malformed front-matter or directory
/// context is logged and ignored.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("`{}` not found", .0.display())]
    NotFound(PathBuf),

    #[error("`{}` already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("document `{0}` has not been read")]
    NotRead(String),

    #[error("document `{0}` has not been built")]
    NotBuilt(String),

    #[error("cannot parse `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("plugin `{plugin}` failed in `{hook}`")]
    Plugin {
        hook: Hook,
        plugin: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PipelineError {
    /// Wrap an IO error with its path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Like [`PipelineError::io`], but a missing file becomes `NotFound`.
    pub fn io_or_missing(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::io(path, source),
        }
    }
}

/// Convenience alias used throughout the pipeline.
pub type Result<T> = std::result::Result<T, PipelineError>;
