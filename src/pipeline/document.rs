//! Document and asset records passed through the hook chains.

use super::{Context, PipelineError, context::merge_into};
use crate::config::DocumentPaths;
use regex::Regex;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One content file, from read through write.
///
/// Identified by its logical path, which never changes. Hook chains may
/// replace `context` and `content`; the pipeline restores everything else
/// after each chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Content-root relative path without extension, e.g. `blog/post`
    pub path: String,
    pub content_path: PathBuf,
    pub publish_path: PathBuf,
    pub template_path: PathBuf,
    /// Merged context: base, directory layers, then front-matter
    pub context: Context,
    /// The document's own front-matter
    pub front_matter: Context,
    /// Raw file text
    pub source: String,
    /// Body, front-matter stripped, further transformed by plugins
    pub content: String,
}

impl Document {
    pub fn new(path: String, paths: DocumentPaths, context: Context) -> Self {
        Self {
            path,
            content_path: paths.content,
            publish_path: paths.publish,
            template_path: PathBuf::new(),
            context,
            front_matter: Context::new(),
            source: String::new(),
            content: String::new(),
        }
    }

    /// Template name from `context.template`, else `default`.
    pub fn template_name<'a>(&'a self, default: &'a str) -> &'a str {
        self.context
            .get("template")
            .and_then(Value::as_str)
            .unwrap_or(default)
    }

    /// Logical directory for the site index, `.` for the content root.
    pub fn directory(&self) -> &str {
        self.path.rsplit_once('/').map_or(".", |(dir, _)| dir)
    }

    /// Whether the content file name matches the hidden pattern.
    pub fn is_hidden(&self, hidden: &Regex) -> bool {
        self.content_path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| hidden.is_match(name))
    }

    /// Publish file name, e.g. `post.html`.
    pub fn filename(&self) -> String {
        self.publish_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Take a hook chain's result, keeping this document's identity.
    pub(crate) fn with_identity(&self, mut result: Document) -> Document {
        result.path.clone_from(&self.path);
        result.content_path.clone_from(&self.content_path);
        result.publish_path.clone_from(&self.publish_path);
        result
    }

    /// Take only `context` and `content` from a hook chain's result.
    pub(crate) fn with_output(&self, result: Document) -> Document {
        Document {
            context: result.context,
            content: result.content,
            ..self.clone()
        }
    }

    /// Apply front-matter parsed from the raw source.
    pub(crate) fn apply_front_matter(&mut self, front_matter: Context) {
        merge_into(&mut self.context, &front_matter);
        self.front_matter = front_matter;
    }
}

/// An asset file and where it will be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub source: PathBuf,
    pub publish: PathBuf,
}

impl Asset {
    pub fn new(source: impl Into<PathBuf>, publish: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            publish: publish.into(),
        }
    }

    pub fn ext(&self) -> Option<&str> {
        self.source.extension().and_then(|e| e.to_str())
    }
}

/// Proposed change to a cached document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Revision {
    /// Keys to override, shallowly
    pub context: Option<Context>,
    /// Replacement body
    pub content: Option<String>,
}

// ============================================================================
// Front-matter
// ============================================================================

/// Split `source` into the captured front-matter block and the body.
///
/// The match must start at offset 0. Returns `None` when there is no block.
pub fn split_front_matter<'a>(pattern: &Regex, source: &'a str) -> Option<(&'a str, &'a str)> {
    let captures = pattern.captures(source)?;
    let whole = captures.get(0)?;
    if whole.start() != 0 {
        return None;
    }
    let block = captures.get(1).map_or("", |m| m.as_str());
    Some((block, &source[whole.end()..]))
}

/// Serialize front-matter and body into file text.
///
/// An empty context produces the body alone.
pub fn compose_source(front_matter: &Context, content: &str) -> Result<String, PipelineError> {
    if front_matter.is_empty() {
        return Ok(content.to_owned());
    }

    let yaml = serde_yaml::to_string(front_matter).map_err(|err| PipelineError::Parse {
        path: Path::new("<front-matter>").to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(format!("---\n{yaml}---\n{content}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults;
    use crate::pipeline::context::{Format, parse_context};
    use serde_json::json;

    fn front_matter_regex() -> Regex {
        Regex::new(&defaults::build::front_matter()).unwrap()
    }

    fn document(path: &str) -> Document {
        Document::new(
            path.into(),
            DocumentPaths {
                content: PathBuf::from(format!("/c/{path}.md")),
                publish: PathBuf::from(format!("/p/{path}.html")),
            },
            Context::new(),
        )
    }

    #[test]
    fn test_split_front_matter() {
        let re = front_matter_regex();
        let (block, body) = split_front_matter(&re, "---\ntitle: Home\n---\nHello").unwrap();
        assert_eq!(block, "title: Home");
        assert_eq!(body, "Hello");
    }

    #[test]
    fn test_split_empty_front_matter() {
        let re = front_matter_regex();
        let (block, body) = split_front_matter(&re, "---\n---\nBody").unwrap();
        assert_eq!(block, "");
        assert_eq!(body, "Body");
        assert!(parse_context(block, Format::Yaml).unwrap().is_empty());
    }

    #[test]
    fn test_split_front_matter_crlf() {
        let re = front_matter_regex();
        let (block, body) = split_front_matter(&re, "---\r\na: 1\r\n---\r\nBody").unwrap();
        assert_eq!(block, "a: 1");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_split_requires_start_of_file() {
        let re = front_matter_regex();
        assert!(split_front_matter(&re, "Intro\n---\na: 1\n---\n").is_none());
        assert!(split_front_matter(&re, "No front matter").is_none());
    }

    #[test]
    fn test_split_unanchored_custom_pattern() {
        // A user pattern without \A must still match only at offset 0
        let re = Regex::new(r"(?s)\{(.*?)\};\n").unwrap();
        assert!(split_front_matter(&re, "x {\"a\": 1};\n").is_none());
        let (block, body) = split_front_matter(&re, "{\"a\": 1};\nrest").unwrap();
        assert_eq!(block, "\"a\": 1");
        assert_eq!(body, "rest");
    }

    #[test]
    fn test_compose_source_roundtrip() {
        let mut front_matter = Context::new();
        front_matter.insert("title".into(), json!("Hello"));
        let source = compose_source(&front_matter, "Body\n").unwrap();
        assert!(source.starts_with("---\ntitle: Hello\n---\n"));

        let (block, body) = split_front_matter(&front_matter_regex(), &source).unwrap();
        assert_eq!(parse_context(block, Format::Yaml).unwrap(), front_matter);
        assert_eq!(body, "Body\n");
    }

    #[test]
    fn test_compose_source_without_context() {
        assert_eq!(compose_source(&Context::new(), "Body").unwrap(), "Body");
    }

    #[test]
    fn test_directory() {
        assert_eq!(document("index").directory(), ".");
        assert_eq!(document("blog/2024/post").directory(), "blog/2024");
    }

    #[test]
    fn test_is_hidden() {
        let hidden = Regex::new(&defaults::build::hidden()).unwrap();
        assert!(document("blog/_draft").is_hidden(&hidden));
        assert!(!document("blog/post").is_hidden(&hidden));
    }

    #[test]
    fn test_template_name() {
        let mut doc = document("index");
        assert_eq!(doc.template_name("index.html"), "index.html");
        doc.context.insert("template".into(), json!("post.html"));
        assert_eq!(doc.template_name("index.html"), "post.html");
    }

    #[test]
    fn test_with_output_freezes_identity() {
        let original = document("index");
        let mut result = document("hijacked");
        result.content = "new".into();
        result.source = "changed".into();

        let merged = original.with_output(result);
        assert_eq!(merged.path, "index");
        assert_eq!(merged.content, "new");
        assert_eq!(merged.source, "");
    }
}
