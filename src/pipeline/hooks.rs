//! The plugin hook protocol.
//!
//! A hook invocation threads one value through every plugin in order:
//!
//! ```text
//! initial ──► plugin 1 ──► plugin 2 ──► ... ──► core plugin ──► result
//!               │            │
//!               │            └── Stop: later plugins never run
//!               └── Replace(v): later plugins see v
//! ```
//!
//! Every hook method has a pass-through default, so a plugin implements
//! only the stages it cares about.

use super::{Asset, Document, Pipeline, PipelineError, Result, Revision};
use std::{fmt, sync::Arc};

/// What a hook decided about the value it was given.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Leave the value unchanged and continue.
    Keep,
    /// Replace the value for all later plugins.
    Replace(T),
    /// Halt this invocation; the current value is the result.
    Stop,
    /// Replace the value, then halt.
    StopWith(T),
}

/// Return type of every hook method.
pub type HookResult<T> = anyhow::Result<Outcome<T>>;

/// Named hook points, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeCreate,
    AfterCreate,
    BeforeRead,
    AfterRead,
    BeforeUpdate,
    AfterUpdate,
    BeforeBuild,
    AfterBuild,
    BeforeWrite,
    AfterWrite,
    BeforeAsset,
    AfterAsset,
    BeforeReadAll,
    AfterReadAll,
    BeforeBuildAll,
    AfterBuildAll,
    BeforeWriteAll,
    AfterWriteAll,
}

impl Hook {
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeforeCreate => "before_create",
            Self::AfterCreate => "after_create",
            Self::BeforeRead => "before_read",
            Self::AfterRead => "after_read",
            Self::BeforeUpdate => "before_update",
            Self::AfterUpdate => "after_update",
            Self::BeforeBuild => "before_build",
            Self::AfterBuild => "after_build",
            Self::BeforeWrite => "before_write",
            Self::AfterWrite => "after_write",
            Self::BeforeAsset => "before_asset",
            Self::AfterAsset => "after_asset",
            Self::BeforeReadAll => "before_read_all",
            Self::AfterReadAll => "after_read_all",
            Self::BeforeBuildAll => "before_build_all",
            Self::AfterBuildAll => "after_build_all",
            Self::BeforeWriteAll => "before_write_all",
            Self::AfterWriteAll => "after_write_all",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pipeline extension. Implement any subset of the hooks.
///
/// Hooks run on rayon worker threads, possibly for several documents at
/// once, hence `Send + Sync`. A hook may return a [`PipelineError`] through
/// `anyhow`; it is surfaced unchanged instead of being wrapped.
#[allow(unused_variables)]
pub trait Plugin: Send + Sync {
    /// Name used in error messages.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn before_create(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn after_create(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn before_read(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn after_read(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    /// Sees the proposed revision alongside the document it applies to.
    fn before_update(&self, revision: &Revision, document: &Document) -> HookResult<Revision> {
        Ok(Outcome::Keep)
    }

    fn after_update(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    /// `template` is the raw text of the document's template file.
    fn before_build(&self, document: &Document, template: &str) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn after_build(&self, document: &Document, template: &str) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn before_write(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn after_write(&self, document: &Document) -> HookResult<Document> {
        Ok(Outcome::Keep)
    }

    fn before_asset(&self, asset: &Asset) -> HookResult<Asset> {
        Ok(Outcome::Keep)
    }

    fn after_asset(&self, asset: &Asset) -> HookResult<Asset> {
        Ok(Outcome::Keep)
    }

    fn before_read_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }

    fn after_read_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }

    fn before_build_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }

    fn after_build_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }

    fn before_write_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }

    fn after_write_all(&self, site: &Pipeline) -> HookResult<()> {
        Ok(Outcome::Keep)
    }
}

/// Ordered plugin list; the core plugin is always last.
#[derive(Clone)]
pub struct Plugins {
    chain: Vec<Arc<dyn Plugin>>,
}

impl Plugins {
    pub fn new(mut user: Vec<Arc<dyn Plugin>>, core: Arc<dyn Plugin>) -> Self {
        user.push(core);
        Self { chain: user }
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Run one hook invocation.
    ///
    /// `call` dispatches to the hook method; plugins are awaited strictly in
    /// order, and a `Stop` ends this invocation only.
    pub fn run<T>(
        &self,
        hook: Hook,
        initial: T,
        mut call: impl FnMut(&dyn Plugin, &T) -> HookResult<T>,
    ) -> Result<T> {
        let mut value = initial;

        for plugin in &self.chain {
            let outcome = call(plugin.as_ref(), &value).map_err(|err| {
                match err.downcast::<PipelineError>() {
                    Ok(err) => err,
                    Err(source) => PipelineError::Plugin {
                        hook,
                        plugin: plugin.name().to_owned(),
                        source: source.into(),
                    },
                }
            })?;

            match outcome {
                Outcome::Keep => {}
                Outcome::Replace(next) => value = next,
                Outcome::Stop => break,
                Outcome::StopWith(next) => {
                    value = next;
                    break;
                }
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for Plugins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.chain.iter().map(|p| p.name()))
            .finish()
    }
}
