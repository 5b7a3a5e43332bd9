//! Folio - a plugin-driven static site generator.
//!
//! # Architecture
//!
//! ```text
//! scan() ──► document cache ──► build_all() ──► built cache ──► write_all()
//!   │              ▲                 │
//!   │              └── site index ◄──┘
//!   └── directory contexts
//!
//! handle_assets() ──► before_asset / after_asset ──► publish tree
//! ```
//!
//! Every stage runs a named hook chain over the configured plugins, with the
//! core plugin (front-matter extraction, default asset copy) always last.

pub mod build;
pub mod cli;
pub mod config;
pub mod init;
pub mod logger;
pub mod pipeline;
pub mod plugins;
pub mod utils;

pub use config::SiteConfig;
pub use pipeline::{
    Asset, Context, Document, Hook, HookResult, Outcome, Pipeline, PipelineError, Plugin,
    Revision,
};
