//! Centralized path resolution for documents, templates and assets.
//!
//! Maps a logical document path (content-root relative, `/` separated,
//! extension stripped) to concrete filesystem locations.
//!
//! ```text
//! "blog/post" ──► content/blog/post.md
//!             ──► publish/blog/post.html
//! ```

use super::BuildConfig;
use crate::utils::path::bare_ext;
use std::path::{Component, Path, PathBuf};

/// Filesystem locations of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPaths {
    /// Source file in the content tree
    pub content: PathBuf,
    /// Output file in the publish tree
    pub publish: PathBuf,
}

/// Stateless resolver over the configured roots and extensions.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    root: &'a Path,
    build: &'a BuildConfig,
}

impl<'a> PathResolver<'a> {
    #[inline]
    pub const fn new(root: &'a Path, build: &'a BuildConfig) -> Self {
        Self { root, build }
    }

    pub fn content_root(&self) -> PathBuf {
        self.root.join(&self.build.content)
    }

    pub fn publish_root(&self) -> PathBuf {
        self.root.join(&self.build.publish)
    }

    pub fn templates_root(&self) -> PathBuf {
        self.root.join(&self.build.templates)
    }

    pub fn assets_root(&self) -> PathBuf {
        self.root.join(&self.build.assets)
    }

    /// Resolve both content and publish locations for a logical path.
    pub fn resolve(&self, logical: &str) -> DocumentPaths {
        DocumentPaths {
            content: self.with_ext(self.content_root(), logical, &self.build.content_ext),
            publish: self.with_ext(self.publish_root(), logical, &self.build.publish_ext),
        }
    }

    pub fn template_file(&self, name: &str) -> PathBuf {
        self.templates_root().join(name)
    }

    /// Mirror an asset source path into the publish tree.
    pub fn asset_publish_path(&self, source: &Path) -> Option<PathBuf> {
        let rel = source.strip_prefix(self.assets_root()).ok()?;
        Some(self.publish_root().join(rel))
    }

    /// Derive the logical path of a content file.
    ///
    /// Returns `None` for files outside the content root.
    pub fn logical_path(&self, file: &Path) -> Option<String> {
        let rel = file.strip_prefix(self.content_root()).ok()?;
        let rel = rel.to_string_lossy().replace('\\', "/");
        Some(self.normalize(&rel))
    }

    /// Normalize user input into a logical path.
    ///
    /// Accepts `blog/post`, `/blog/post` and `blog/post.md` alike.
    pub fn normalize(&self, input: &str) -> String {
        let input = input.replace('\\', "/");
        let trimmed = input.trim_start_matches("./").trim_matches('/');
        let suffix = format!(".{}", bare_ext(&self.build.content_ext));

        let logical = trimmed.strip_suffix(&suffix).unwrap_or(trimmed);
        Path::new(logical)
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Append `.ext` without clobbering dots already in the logical path.
    fn with_ext(&self, base: PathBuf, logical: &str, ext: &str) -> PathBuf {
        base.join(format!("{logical}.{}", bare_ext(ext)))
    }
}
