//! Walk the content tree and read every document.
//!
//! ```text
//! content/            ──► load config.{json,yaml,yml}
//! ├── index.md        ──► read("index")
//! ├── logo.png        ──► ignored
//! └── blog/           ──► load context, recurse (parallel)
//!     └── post.md     ──► read("blog/post")
//! ```
//!
//! A directory's context is cached before any of its children are read, so
//! every document sees all of its ancestors' layers.

use super::{Hook, Pipeline, PipelineError, Result, reader::read_file};
use crate::utils::path::has_ext;
use rayon::prelude::*;
use std::{fs, path::Path};

/// Scan `path` (the content root when `None`), reading every content file.
///
/// Children of a directory are processed in parallel; the first failure
/// aborts the scan.
pub fn scan(site: &Pipeline, path: Option<&Path>) -> Result<()> {
    let config = site.config();
    let root = config.paths().content_root();
    scan_path(site, path.unwrap_or(&root))
}

/// Scan the whole content tree inside the `read_all` brackets.
pub fn read_all(site: &Pipeline) -> Result<()> {
    site.bracket(Hook::BeforeReadAll, |p, s| p.before_read_all(s))?;
    scan(site, None)?;
    site.bracket(Hook::AfterReadAll, |p, s| p.after_read_all(s))
}

fn scan_path(site: &Pipeline, path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| PipelineError::io(path, e))?;

    if metadata.is_dir() {
        let config = site.config();
        site.contexts.load(&config, path);

        let children = fs::read_dir(path)
            .map_err(|e| PipelineError::io(path, e))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()
            .map_err(|e| PipelineError::io(path, e))?;

        return children
            .par_iter()
            .try_for_each(|child| scan_path(site, child));
    }

    if has_ext(path, &site.config().build.content_ext) {
        read_file(site, path)?;
    }
    Ok(())
}
