//! Build documents: render context, site index and the build hook chain.
//!
//! # Render Context
//!
//! ```text
//! document.context
//!   + filename   "post.html"
//!   + root       "..", relative to the publish root ("." at the top)
//!   + index      { ".": [...], "blog": [...] }
//! ```
//!
//! The index is recomputed for every build and never cached: each summary's
//! `path` is relative to the building document, and `current` marks it.

use super::{Context, Document, Hook, Pipeline, PipelineError, Result};
use crate::config::ConfigSnapshot;
use crate::utils::path::{relative_path, to_url};
use rayon::prelude::*;
use serde_json::Value;
use std::{collections::BTreeMap, fs, path::Path};

/// Build one cached document and store the result in the built cache.
pub fn build(site: &Pipeline, path: &str) -> Result<Document> {
    let logical = site.config().paths().normalize(path);
    build_logical(site, logical)
}

fn build_logical(site: &Pipeline, logical: String) -> Result<Document> {
    let config = site.config();
    let document = site
        .documents
        .get(&logical)
        .ok_or(PipelineError::NotRead(logical))?;

    let template = fs::read_to_string(&document.template_path)
        .map_err(|e| PipelineError::io_or_missing(&document.template_path, e))?;

    let mut seed = document.clone();
    seed.context = render_context(site, &config, &document);

    let built = site.plugins.run(Hook::BeforeBuild, seed.clone(), |p, d| {
        p.before_build(d, &template)
    })?;
    let built = seed.with_output(built);

    let built = site.plugins.run(Hook::AfterBuild, built.clone(), |p, d| {
        p.after_build(d, &template)
    })?;
    let built = seed.with_output(built);

    site.built.insert(built.clone());
    Ok(built)
}

/// Build every cached document inside the `build_all` brackets.
pub fn build_all(site: &Pipeline) -> Result<()> {
    build_all_with(site, |_| {})
}

/// Like [`build_all`], reporting each built document to `on_built`.
pub fn build_all_with(site: &Pipeline, on_built: impl Fn(&Document) + Sync) -> Result<()> {
    site.bracket(Hook::BeforeBuildAll, |p, s| p.before_build_all(s))?;

    // Snapshot of the keys; documents read meanwhile wait for the next run
    site.documents.keys().par_iter().try_for_each(|path| {
        let built = build_logical(site, path.clone())?;
        on_built(&built);
        Ok::<_, PipelineError>(())
    })?;

    site.bracket(Hook::AfterBuildAll, |p, s| p.after_build_all(s))
}

fn render_context(site: &Pipeline, config: &ConfigSnapshot, document: &Document) -> Context {
    let publish_dir = publish_dir(&document.publish_path);
    let root = relative_path(publish_dir, &config.paths().publish_root());

    let mut context = document.context.clone();
    context.insert("filename".into(), Value::String(document.filename()));
    context.insert("root".into(), Value::String(to_url(&root)));
    context.insert(
        "index".into(),
        Value::Object(site_index(site, config, document)),
    );
    context
}

/// Group visible cached documents by logical directory, relative to `current`.
///
/// Buckets and their entries are ordered by logical path. The root
/// directory is keyed `"."`.
pub fn site_index(site: &Pipeline, config: &ConfigSnapshot, current: &Document) -> Context {
    let from = publish_dir(&current.publish_path);

    let mut buckets: BTreeMap<String, BTreeMap<String, Value>> = BTreeMap::new();
    site.documents.with_entries(|entries| {
        for document in entries.values() {
            if document.is_hidden(&config.hidden) {
                continue;
            }

            let mut summary = document.context.clone();
            let url = to_url(&relative_path(from, &document.publish_path));
            summary.insert("path".into(), Value::String(url));
            summary.insert("current".into(), Value::Bool(document.path == current.path));

            buckets
                .entry(document.directory().to_owned())
                .or_default()
                .insert(document.path.clone(), Value::Object(summary));
        }
    });

    buckets
        .into_iter()
        .map(|(dir, entries)| (dir, Value::Array(entries.into_values().collect())))
        .collect()
}

fn publish_dir(publish_path: &Path) -> &Path {
    publish_path.parent().unwrap_or(Path::new(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;
    use crate::pipeline::{HookResult, Outcome, Plugin, read, read_all, write_all};
    use serde_json::json;
    use std::{fs, sync::Arc};

    struct Append(&'static str);

    impl Plugin for Append {
        fn name(&self) -> &str {
            self.0
        }

        fn before_build(&self, document: &Document, _template: &str) -> HookResult<Document> {
            let mut next = document.clone();
            next.content.push_str(self.0);
            Ok(Outcome::Replace(next))
        }
    }

    #[test]
    fn test_build_requires_read() {
        let (_dir, pipeline) = site(Vec::new());
        assert!(matches!(
            build(&pipeline, "index"),
            Err(PipelineError::NotRead(path)) if path == "index"
        ));
    }

    #[test]
    fn test_missing_template() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "---\ntemplate: nope.html\n---\n");
        read(&pipeline, "index").unwrap();

        assert!(matches!(
            build(&pipeline, "index"),
            Err(PipelineError::NotFound(path)) if path.ends_with("templates/nope.html")
        ));
        assert!(pipeline.built().is_empty());
    }

    #[test]
    fn test_ordered_build_transforms_reach_output() {
        let plugins: Vec<Arc<dyn Plugin>> = vec![Arc::new(Append("-a")), Arc::new(Append("-b"))];
        let (dir, pipeline) = site(plugins);
        write_file(dir.path(), "content/index.md", "x");

        pipeline.run().unwrap();
        let html = fs::read_to_string(dir.path().join("publish/index.html")).unwrap();
        assert_eq!(html, "x-a-b");
    }

    #[test]
    fn test_render_context() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "Home");
        write_file(dir.path(), "content/blog/2024/post.md", "Post");
        read_all(&pipeline).unwrap();

        let post = build(&pipeline, "blog/2024/post").unwrap();
        assert_eq!(post.context["filename"], json!("post.html"));
        assert_eq!(post.context["root"], json!("../.."));
        assert_eq!(post.context["index"]["."][0]["path"], json!("../../index.html"));

        let home = build(&pipeline, "index").unwrap();
        assert_eq!(home.context["root"], json!("."));
        assert_eq!(
            home.context["index"]["blog/2024"][0]["path"],
            json!("blog/2024/post.html")
        );
    }

    #[test]
    fn test_hidden_documents_are_built_but_not_indexed() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "Home");
        write_file(dir.path(), "content/_draft.md", "Draft");

        pipeline.run().unwrap();
        let home = pipeline.built().get("index").unwrap();
        let bucket = home.context["index"]["."].as_array().unwrap();
        assert_eq!(bucket.len(), 1);
        assert!(dir.path().join("publish/_draft.html").is_file());
    }

    #[test]
    fn test_index_scenario() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "---\ntitle: Home\n---\nHello");
        write_file(dir.path(), "content/about.md", "About us");

        pipeline.run().unwrap();
        assert!(dir.path().join("publish/index.html").is_file());
        assert!(dir.path().join("publish/about.html").is_file());

        let home = pipeline.built().get("index").unwrap();
        assert_eq!(
            home.context["index"],
            json!({
                ".": [
                    { "path": "about.html", "current": false },
                    { "title": "Home", "path": "index.html", "current": true },
                ]
            })
        );
        let about = pipeline.built().get("about").unwrap();
        assert_eq!(about.context["index"]["."][0]["current"], json!(true));
        assert_eq!(about.context["index"]["."][1]["current"], json!(false));
    }

    struct Rename;

    impl Plugin for Rename {
        fn after_build(&self, document: &Document, _template: &str) -> HookResult<Document> {
            let mut next = document.clone();
            next.path = "renamed".into();
            next.source = "lost".into();
            next.content = "<p>built</p>".into();
            Ok(Outcome::StopWith(next))
        }
    }

    #[test]
    fn test_build_keeps_identity_and_source() {
        let (dir, pipeline) = site_with(Rename);
        write_file(dir.path(), "content/index.md", "Hello");
        read(&pipeline, "index").unwrap();

        let built = build(&pipeline, "index").unwrap();
        assert_eq!(built.path, "index");
        assert_eq!(built.source, "Hello");
        assert_eq!(built.content, "<p>built</p>");

        write_all(&pipeline).unwrap();
        let html = fs::read_to_string(dir.path().join("publish/index.html")).unwrap();
        assert_eq!(html, "<p>built</p>");
    }

    #[test]
    fn test_build_all_reports_progress() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/a.md", "A");
        write_file(dir.path(), "content/b.md", "B");
        read_all(&pipeline).unwrap();

        let count = std::sync::atomic::AtomicUsize::new(0);
        build_all_with(&pipeline, |_| {
            count.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        })
        .unwrap();
        assert_eq!(count.into_inner(), 2);
        assert_eq!(pipeline.built().len(), 2);
    }
}
