//! Directory-scoped context files and context merging.
//!
//! Precedence, later wins:
//!
//! ```text
//! [context] in folio.toml
//!   └── content/config.yaml
//!         └── content/blog/config.json
//!               └── front-matter of content/blog/post.md
//! ```

use super::PipelineError;
use crate::config::ConfigSnapshot;
use crate::log;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Key-value metadata visible to templates.
pub type Context = serde_json::Map<String, Value>;

/// Directory context candidates, first existing file wins.
pub const CONTEXT_FILES: &[&str] = &["config.json", "config.yaml", "config.yml"];

/// Structured-data flavour of a file or block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    /// YAML, which also accepts JSON.
    Yaml,
}

impl Format {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Parse a structured block into a context mapping.
///
/// An empty document yields an empty context; any non-mapping root is an error.
pub fn parse_context(text: &str, format: Format) -> Result<Context, String> {
    if text.trim().is_empty() {
        return Ok(Context::new());
    }

    let value: Value = match format {
        Format::Json => serde_json::from_str(text).map_err(|e| e.to_string())?,
        Format::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string())?,
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Context::new()),
        other => Err(format!("expected a mapping, found `{other}`")),
    }
}

/// Shallow merge: every key of `layer` overrides `base`.
pub fn merge_into(base: &mut Context, layer: &Context) {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
}

/// Cache of parsed directory contexts, keyed by content-relative directory
/// (`""` is the content root).
#[derive(Debug, Default)]
pub struct ContextStore {
    dirs: RwLock<FxHashMap<String, Context>>,
}

impl ContextStore {
    /// Load, cache and return the context of a content directory.
    ///
    /// A malformed file is logged and treated as empty; it never fails the build.
    pub fn load(&self, config: &ConfigSnapshot, dir: &Path) -> Context {
        let context = match CONTEXT_FILES.iter().map(|name| dir.join(name)).find(|p| p.is_file()) {
            Some(file) => read_context_file(&file).unwrap_or_else(|err| {
                log!("warn"; "{err}");
                Context::new()
            }),
            None => Context::new(),
        };

        let key = dir_key(config, dir);
        self.dirs.write().insert(key, context.clone());
        context
    }

    /// Merge base context and every cached ancestor directory context of
    /// `logical`, root-most first. Returns a fresh map.
    pub fn merge(&self, config: &ConfigSnapshot, logical: &str) -> Context {
        let mut merged = config.context.clone();
        let dirs = self.dirs.read();

        for dir in ancestors(logical).iter().rev() {
            if let Some(layer) = dirs.get(dir) {
                merge_into(&mut merged, layer);
            }
        }

        merged
    }

    pub fn get(&self, dir: &str) -> Option<Context> {
        self.dirs.read().get(dir).cloned()
    }

    pub fn clear(&self) {
        self.dirs.write().clear();
    }
}

fn read_context_file(file: &Path) -> Result<Context, PipelineError> {
    let text = fs::read_to_string(file).map_err(|e| PipelineError::io(file, e))?;
    parse_context(&text, Format::of(file)).map_err(|message| PipelineError::Parse {
        path: file.to_path_buf(),
        message,
    })
}

fn dir_key(config: &ConfigSnapshot, dir: &Path) -> String {
    let root = config.paths().content_root();
    dir.strip_prefix(&root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| PathBuf::from(dir))
        .to_string_lossy()
        .replace('\\', "/")
}

/// Directories enclosing a logical document path, nearest first, ending at `""`.
///
/// `"blog/2024/post"` → `["blog/2024", "blog", ""]`
fn ancestors(logical: &str) -> Vec<String> {
    let mut dirs = Vec::new();
    let mut current = logical;
    while let Some((parent, _)) = current.rsplit_once('/') {
        dirs.push(parent.to_owned());
        current = parent;
    }
    dirs.push(String::new());
    dirs
}
