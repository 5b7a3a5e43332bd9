//! Persist built documents to the publish tree.

use super::{Document, Hook, Pipeline, PipelineError, Result};
use rayon::prelude::*;
use std::fs;

/// Write one built document to its publish path, overwriting.
///
/// A `Stop` from `before_write` only ends the chain; the write still happens.
pub fn write(site: &Pipeline, path: &str) -> Result<Document> {
    let logical = site.config().paths().normalize(path);
    write_logical(site, logical)
}

fn write_logical(site: &Pipeline, logical: String) -> Result<Document> {
    let built = site
        .built
        .get(&logical)
        .ok_or(PipelineError::NotBuilt(logical))?;

    let document = site
        .plugins
        .run(Hook::BeforeWrite, built.clone(), |p, d| p.before_write(d))?;
    let document = built.with_output(document);

    let target = &document.publish_path;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }
    fs::write(target, &document.content).map_err(|e| PipelineError::io(target, e))?;

    let written = site
        .plugins
        .run(Hook::AfterWrite, document.clone(), |p, d| p.after_write(d))?;
    Ok(document.with_output(written))
}

/// Write every built document inside the `write_all` brackets.
pub fn write_all(site: &Pipeline) -> Result<()> {
    write_all_with(site, |_| {})
}

/// Like [`write_all`], reporting each written document to `on_written`.
pub fn write_all_with(site: &Pipeline, on_written: impl Fn(&Document) + Sync) -> Result<()> {
    site.bracket(Hook::BeforeWriteAll, |p, s| p.before_write_all(s))?;

    site.built.keys().par_iter().try_for_each(|path| {
        let written = write_logical(site, path.clone())?;
        on_written(&written);
        Ok::<_, PipelineError>(())
    })?;

    site.bracket(Hook::AfterWriteAll, |p, s| p.after_write_all(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;
    use crate::pipeline::{HookResult, Outcome, Plugin, build, read};

    #[test]
    fn test_write_requires_build() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "Hello");
        read(&pipeline, "index").unwrap();

        assert!(matches!(
            write(&pipeline, "index"),
            Err(PipelineError::NotBuilt(_))
        ));
    }

    #[test]
    fn test_write_creates_directories_and_overwrites() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/blog/post.md", "New");
        write_file(dir.path(), "publish/blog/post.html", "Old and longer");
        read(&pipeline, "blog/post").unwrap();
        build(&pipeline, "blog/post").unwrap();

        write(&pipeline, "blog/post").unwrap();
        let html = fs::read_to_string(dir.path().join("publish/blog/post.html")).unwrap();
        assert_eq!(html, "New");
    }

    struct Banner;

    impl Plugin for Banner {
        fn before_write(&self, document: &Document) -> HookResult<Document> {
            let mut next = document.clone();
            next.content.insert_str(0, "<!-- banner -->");
            Ok(Outcome::StopWith(next))
        }
    }

    #[test]
    fn test_stop_in_before_write_still_writes() {
        let (dir, pipeline) = site_with(Banner);
        write_file(dir.path(), "content/index.md", "Hello");
        pipeline.run().unwrap();

        let html = fs::read_to_string(dir.path().join("publish/index.html")).unwrap();
        assert_eq!(html, "<!-- banner -->Hello");
    }
}
