//! Live config with atomic replacement.
//!
//! Uses `arc-swap` for lock-free reads and whole-config replacement. Every
//! batch loads one snapshot up front, so parallel builds never observe a
//! half-applied configuration.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                 ConfigHandle (ArcSwap)                    │
//! │                                                           │
//! │   build worker ──► load()      configure() ──► replace()  │
//! │   (lock-free)                  (atomic swap)              │
//! └───────────────────────────────────────────────────────────┘
//! ```

use super::{ConfigError, PathResolver, SiteConfig};
use arc_swap::ArcSwap;
use regex::Regex;
use std::{ops::Deref, sync::Arc};

/// A validated config together with its compiled patterns.
#[derive(Debug)]
pub struct ConfigSnapshot {
    site: SiteConfig,
    /// Compiled `[build.front_matter]`
    pub front_matter: Regex,
    /// Compiled `[build.hidden]`
    pub hidden: Regex,
}

impl ConfigSnapshot {
    pub fn new(site: SiteConfig) -> Result<Self, ConfigError> {
        let front_matter = compile("front_matter", &site.build.front_matter)?;
        let hidden = compile("hidden", &site.build.hidden)?;
        Ok(Self {
            site,
            front_matter,
            hidden,
        })
    }

    #[inline]
    pub fn paths(&self) -> PathResolver<'_> {
        self.site.paths()
    }
}

impl Deref for ConfigSnapshot {
    type Target = SiteConfig;

    fn deref(&self) -> &SiteConfig {
        &self.site
    }
}

fn compile(field: &'static str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::Pattern { field, source })
}

/// Shared, swappable config owned by a pipeline and its core plugin.
#[derive(Debug)]
pub struct ConfigHandle {
    current: ArcSwap<ConfigSnapshot>,
}

impl ConfigHandle {
    pub fn new(site: SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            current: ArcSwap::from_pointee(ConfigSnapshot::new(site)?),
        })
    }

    /// Current snapshot. Wait-free; the `Arc` stays valid across a `replace`.
    #[inline]
    pub fn load(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Replace the whole config. On error the previous config stays active.
    pub fn replace(&self, site: SiteConfig) -> Result<(), ConfigError> {
        self.current.store(Arc::new(ConfigSnapshot::new(site)?));
        Ok(())
    }
}
