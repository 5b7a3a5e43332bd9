//! The build pipeline.
//!
//! - **reader**: load one content file into a [`Document`]
//! - **scanner**: walk the content tree, reading every document
//! - **builder**: render context, site index, build hook chain
//! - **writer**: persist built documents
//! - **assets**: mirror the assets tree through the asset hook chain
//! - **lifecycle**: create / update / delete outside a run
//!
//! # Run Flow
//!
//! ```text
//! clear() ──► read_all() ──┬── build_all() ──► write_all()
//!                          └── handle_assets()
//! ```
//!
//! Stage entry points are free functions taking the [`Pipeline`] explicitly.
//! All state lives on the pipeline instance, so independent pipelines can
//! coexist.

pub mod assets;
pub mod builder;
pub mod context;
mod document;
mod error;
pub mod hooks;
pub mod lifecycle;
pub mod reader;
pub mod scanner;
pub mod writer;

pub use assets::{handle_asset, handle_assets};
pub use builder::{build, build_all, site_index};
pub use context::{Context, ContextStore};
pub use document::{Asset, Document, Revision, compose_source, split_front_matter};
pub use error::{PipelineError, Result};
pub use hooks::{Hook, HookResult, Outcome, Plugin, Plugins};
pub use lifecycle::{create, delete, update};
pub use reader::read;
pub use scanner::{read_all, scan};
pub use writer::{write, write_all};

use crate::config::{ConfigHandle, ConfigSnapshot, SiteConfig};
use crate::plugins::{self, CorePlugin};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Documents keyed by logical path.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: RwLock<FxHashMap<String, Document>>,
}

impl DocumentCache {
    pub fn get(&self, path: &str) -> Option<Document> {
        self.entries.read().get(path).cloned()
    }

    /// Insert, replacing any previous entry for the same path.
    pub fn insert(&self, document: Document) {
        self.entries.write().insert(document.path.clone(), document);
    }

    pub fn remove(&self, path: &str) -> Option<Document> {
        self.entries.write().remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.read().contains_key(path)
    }

    /// Sorted logical paths.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Run `f` over all entries under one read lock.
    pub(crate) fn with_entries<R>(&self, f: impl FnOnce(&FxHashMap<String, Document>) -> R) -> R {
        f(&self.entries.read())
    }
}

/// One site build: config, plugins and the three caches.
#[derive(Debug)]
pub struct Pipeline {
    config: Arc<ConfigHandle>,
    pub(crate) plugins: Plugins,
    pub(crate) contexts: ContextStore,
    pub(crate) documents: DocumentCache,
    pub(crate) built: DocumentCache,
}

impl Pipeline {
    /// Create a pipeline with explicit plugins; the core plugin is appended.
    pub fn new(config: SiteConfig, plugins: Vec<Arc<dyn Plugin>>) -> Result<Self> {
        let config = Arc::new(ConfigHandle::new(config)?);
        let core: Arc<dyn Plugin> = Arc::new(CorePlugin::new(Arc::clone(&config)));

        Ok(Self {
            plugins: Plugins::new(plugins, core),
            config,
            contexts: ContextStore::default(),
            documents: DocumentCache::default(),
            built: DocumentCache::default(),
        })
    }

    /// Create a pipeline with the built-in plugins named in `[build.plugins]`.
    pub fn from_config(config: SiteConfig) -> Result<Self> {
        let plugins = plugins::from_names(&config.build.plugins)?;
        Self::new(config, plugins)
    }

    /// Current config snapshot.
    #[inline]
    pub fn config(&self) -> Arc<ConfigSnapshot> {
        self.config.load()
    }

    /// Replace the config as a whole. Caches are kept; call [`Pipeline::clear`]
    /// when the new config moves any root.
    pub fn configure(&self, config: SiteConfig) -> Result<()> {
        Ok(self.config.replace(config)?)
    }

    pub fn plugins(&self) -> &Plugins {
        &self.plugins
    }

    pub fn contexts(&self) -> &ContextStore {
        &self.contexts
    }

    /// Documents as read.
    pub fn documents(&self) -> &DocumentCache {
        &self.documents
    }

    /// Documents as built.
    pub fn built(&self) -> &DocumentCache {
        &self.built
    }

    /// Drop every cached document and directory context.
    pub fn clear(&self) {
        self.contexts.clear();
        self.documents.clear();
        self.built.clear();
    }

    /// Full rebuild: scan, then build and write alongside asset handling.
    pub fn run(&self) -> Result<()> {
        self.clear();
        read_all(self)?;

        let (content, assets) = rayon::join(
            || build_all(self).and_then(|()| write_all(self)),
            || handle_assets(self),
        );
        content?;
        assets
    }

    /// Run a batch bracket hook (`before_build_all` and friends).
    pub(crate) fn bracket(
        &self,
        hook: Hook,
        call: impl Fn(&dyn Plugin, &Pipeline) -> HookResult<()>,
    ) -> Result<()> {
        self.plugins.run(hook, (), |plugin, _| call(plugin, self))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by the stage tests.

    use super::*;
    use std::{fs, path::Path};
    use tempfile::TempDir;

    pub fn site_config(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config
    }

    pub fn write_file(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// A temp site with the default layout and a static template.
    pub fn site(plugins: Vec<Arc<dyn Plugin>>) -> (TempDir, Pipeline) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content")).unwrap();
        write_file(dir.path(), "templates/index.html", "<main></main>");
        let pipeline = Pipeline::new(site_config(dir.path()), plugins).unwrap();
        (dir, pipeline)
    }

    /// [`site`] with a single user plugin ahead of the core plugin.
    pub fn site_with(plugin: impl Plugin + 'static) -> (TempDir, Pipeline) {
        let plugin: Arc<dyn Plugin> = Arc::new(plugin);
        site(vec![plugin])
    }
}
