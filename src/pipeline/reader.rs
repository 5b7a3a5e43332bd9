//! Read one content file into the document cache.
//!
//! ```text
//! logical path ──► merged directory context ──► before_read (core last)
//!              ──► template resolution ──► after_read ──► cache
//! ```

use super::{Document, Hook, Pipeline, PipelineError, Result};
use std::path::Path;

/// Read the document at `path` (logical, or content-relative with extension).
///
/// Replaces any cached entry for the same path.
pub fn read(site: &Pipeline, path: &str) -> Result<Document> {
    let logical = site.config().paths().normalize(path);
    read_logical(site, logical)
}

/// Read a content file found by the scanner.
pub(crate) fn read_file(site: &Pipeline, file: &Path) -> Result<Document> {
    let logical = site
        .config()
        .paths()
        .logical_path(file)
        .ok_or_else(|| PipelineError::NotFound(file.to_path_buf()))?;
    read_logical(site, logical)
}

/// `logical` is already normalized; it may itself end in the content
/// extension (`notes.md` for `notes.md.md`).
fn read_logical(site: &Pipeline, logical: String) -> Result<Document> {
    let config = site.config();
    let paths = config.paths();
    let resolved = paths.resolve(&logical);

    if !resolved.content.is_file() {
        return Err(PipelineError::NotFound(resolved.content));
    }

    let context = site.contexts.merge(&config, &logical);
    let seed = Document::new(logical, resolved, context);

    let read = site
        .plugins
        .run(Hook::BeforeRead, seed.clone(), |p, d| p.before_read(d))?;
    let mut document = seed.with_identity(read);

    let template = paths.template_file(document.template_name(&config.build.default_template));
    document.template_path = template;

    let read = site
        .plugins
        .run(Hook::AfterRead, document.clone(), |p, d| p.after_read(d))?;
    let document = seed.with_identity(read);

    site.documents.insert(document.clone());
    Ok(document)
}
