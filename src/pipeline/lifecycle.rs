//! Create, update and delete documents outside a full run.
//!
//! | Operation | Disk                          | Cache                  |
//! |-----------|-------------------------------|------------------------|
//! | `create`  | new content file (exclusive)  | untouched              |
//! | `update`  | untouched                     | read cache entry       |
//! | `delete`  | content and publish file      | both caches purged     |

use super::{
    Context, Document, Hook, Pipeline, PipelineError, Result, Revision, compose_source,
    context::merge_into,
};
use crate::config::ConfigSnapshot;
use std::{
    fs::{self, OpenOptions},
    io::{ErrorKind, Write},
};

/// Create a new content file from `context` (as front-matter) and `content`.
///
/// Fails with `AlreadyExists` if the file is present, leaving it untouched.
/// The new document is not read into the cache.
pub fn create(
    site: &Pipeline,
    path: &str,
    context: Option<Context>,
    content: &str,
) -> Result<Document> {
    let config = site.config();
    let paths = config.paths();
    let logical = paths.normalize(path);
    let resolved = paths.resolve(&logical);

    if resolved.content.exists() {
        return Err(PipelineError::AlreadyExists(resolved.content));
    }

    let mut seed = Document::new(logical, resolved, context.unwrap_or_default());
    seed.content = content.to_owned();
    resolve_template(&config, &mut seed);

    let created = site
        .plugins
        .run(Hook::BeforeCreate, seed.clone(), |p, d| p.before_create(d))?;
    let mut document = seed.with_identity(created);
    document.front_matter = document.context.clone();
    document.source = compose_source(&document.front_matter, &document.content)?;

    write_new(&document)?;

    let created = site
        .plugins
        .run(Hook::AfterCreate, document.clone(), |p, d| p.after_create(d))?;
    Ok(seed.with_identity(created))
}

/// Apply a revision to a cached document, in memory only.
///
/// `context` keys override both the merged context and the document's own
/// front-matter; `content` replaces the body. `source` is recomputed.
pub fn update(
    site: &Pipeline,
    path: &str,
    context: Option<Context>,
    content: Option<String>,
) -> Result<Document> {
    let config = site.config();
    let logical = config.paths().normalize(path);
    let current = site
        .documents
        .get(&logical)
        .ok_or(PipelineError::NotRead(logical))?;

    let revision = site.plugins.run(
        Hook::BeforeUpdate,
        Revision { context, content },
        |p, r| p.before_update(r, &current),
    )?;

    let mut document = current.clone();
    if let Some(layer) = &revision.context {
        merge_into(&mut document.context, layer);
        merge_into(&mut document.front_matter, layer);
    }
    if let Some(content) = revision.content {
        document.content = content;
    }
    document.source = compose_source(&document.front_matter, &document.content)?;
    resolve_template(&config, &mut document);

    let updated = site
        .plugins
        .run(Hook::AfterUpdate, document.clone(), |p, d| p.after_update(d))?;
    let document = current.with_identity(updated);

    site.documents.insert(document.clone());
    Ok(document)
}

/// Remove a document's content file and publish file, and purge the caches.
///
/// A missing content file is `NotFound`; a missing publish file is fine.
pub fn delete(site: &Pipeline, path: &str) -> Result<()> {
    let config = site.config();
    let paths = config.paths();
    let logical = paths.normalize(path);
    let resolved = paths.resolve(&logical);

    fs::remove_file(&resolved.content)
        .map_err(|e| PipelineError::io_or_missing(&resolved.content, e))?;

    match fs::remove_file(&resolved.publish) {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            return Err(PipelineError::io(resolved.publish, e));
        }
        _ => {}
    }

    site.documents.remove(&logical);
    site.built.remove(&logical);
    Ok(())
}

fn resolve_template(config: &ConfigSnapshot, document: &mut Document) {
    let template = config
        .paths()
        .template_file(document.template_name(&config.build.default_template));
    document.template_path = template;
}

/// Write the composed source, refusing to replace an existing file.
fn write_new(document: &Document) -> Result<()> {
    let target = &document.content_path;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => PipelineError::AlreadyExists(target.clone()),
            _ => PipelineError::io(target, e),
        })?;
    file.write_all(document.source.as_bytes())
        .map_err(|e| PipelineError::io(target, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;
    use crate::pipeline::{HookResult, Outcome, Plugin, read};
    use serde_json::{Value, json};

    fn context(value: Value) -> Option<Context> {
        value.as_object().cloned()
    }

    #[test]
    fn test_create_writes_front_matter() {
        let (dir, pipeline) = site(Vec::new());
        let doc = create(&pipeline, "blog/hello", context(json!({ "title": "Hi" })), "Body\n")
            .unwrap();

        let text = fs::read_to_string(dir.path().join("content/blog/hello.md")).unwrap();
        assert_eq!(text, "---\ntitle: Hi\n---\nBody\n");
        assert_eq!(doc.source, text);
        assert!(pipeline.documents().is_empty());

        let read_back = read(&pipeline, "blog/hello").unwrap();
        assert_eq!(read_back.context["title"], json!("Hi"));
        assert_eq!(read_back.content, "Body\n");
    }

    #[test]
    fn test_create_without_context() {
        let (dir, pipeline) = site(Vec::new());
        create(&pipeline, "plain", None, "Just text").unwrap();
        let text = fs::read_to_string(dir.path().join("content/plain.md")).unwrap();
        assert_eq!(text, "Just text");
    }

    #[test]
    fn test_create_collision_leaves_bytes() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "original");

        assert!(matches!(
            create(&pipeline, "index", None, "replacement"),
            Err(PipelineError::AlreadyExists(_))
        ));
        let text = fs::read_to_string(dir.path().join("content/index.md")).unwrap();
        assert_eq!(text, "original");
    }

    #[test]
    fn test_update_requires_read() {
        let (_dir, pipeline) = site(Vec::new());
        assert!(matches!(
            update(&pipeline, "index", None, None),
            Err(PipelineError::NotRead(_))
        ));
    }

    #[test]
    fn test_update_merges_in_memory() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/config.yaml", "site: folio");
        write_file(dir.path(), "content/index.md", "---\ntitle: Old\n---\nOld body");
        pipeline.run().unwrap();

        let doc = update(
            &pipeline,
            "index",
            context(json!({ "title": "New", "template": "page.html" })),
            Some("New body".into()),
        )
        .unwrap();

        assert_eq!(doc.context["title"], json!("New"));
        assert_eq!(doc.context["site"], json!("folio"));
        assert_eq!(
            Value::Object(doc.front_matter.clone()),
            json!({ "title": "New", "template": "page.html" })
        );
        assert_eq!(doc.content, "New body");
        assert!(doc.source.ends_with("---\nNew body"));
        assert_eq!(doc.template_path, dir.path().join("templates/page.html"));
        assert_eq!(pipeline.documents().get("index"), Some(doc));

        let text = fs::read_to_string(dir.path().join("content/index.md")).unwrap();
        assert_eq!(text, "---\ntitle: Old\n---\nOld body");
    }

    /// Refuses body changes.
    struct Freeze;

    impl Plugin for Freeze {
        fn before_update(&self, revision: &Revision, _document: &Document) -> HookResult<Revision> {
            Ok(Outcome::StopWith(Revision {
                content: None,
                ..revision.clone()
            }))
        }
    }

    #[test]
    fn test_before_update_rewrites_revision() {
        let (dir, pipeline) = site_with(Freeze);
        write_file(dir.path(), "content/index.md", "Body");
        read(&pipeline, "index").unwrap();

        let doc = update(
            &pipeline,
            "index",
            context(json!({ "tag": "x" })),
            Some("Changed".into()),
        )
        .unwrap();
        assert_eq!(doc.content, "Body");
        assert_eq!(doc.front_matter["tag"], json!("x"));
    }

    #[test]
    fn test_delete_purges_everything() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "Hello");
        pipeline.run().unwrap();

        delete(&pipeline, "index").unwrap();
        assert!(!dir.path().join("content/index.md").exists());
        assert!(!dir.path().join("publish/index.html").exists());
        assert!(pipeline.documents().is_empty());
        assert!(pipeline.built().is_empty());
    }

    #[test]
    fn test_delete_without_publish_file() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/draft.md", "Draft");
        delete(&pipeline, "draft").unwrap();
        assert!(!dir.path().join("content/draft.md").exists());
    }

    #[test]
    fn test_delete_missing_document() {
        let (_dir, pipeline) = site(Vec::new());
        assert!(matches!(
            delete(&pipeline, "ghost"),
            Err(PipelineError::NotFound(_))
        ));
    }
}
