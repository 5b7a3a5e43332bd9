//! The core plugin, always last in the chain.
//!
//! - `before_read`: load the raw file and extract front-matter
//! - `before_asset`: copy the asset byte-for-byte

use crate::config::ConfigHandle;
use crate::log;
use crate::pipeline::{
    Asset, Document, HookResult, Outcome, PipelineError, Plugin,
    context::{Format, parse_context},
    split_front_matter,
};
use std::{fs, sync::Arc};

pub struct CorePlugin {
    config: Arc<ConfigHandle>,
}

impl CorePlugin {
    pub fn new(config: Arc<ConfigHandle>) -> Self {
        Self { config }
    }
}

impl Plugin for CorePlugin {
    fn name(&self) -> &str {
        "core"
    }

    fn before_read(&self, document: &Document) -> HookResult<Document> {
        let config = self.config.load();
        let path = &document.content_path;
        let source =
            fs::read_to_string(path).map_err(|e| PipelineError::io_or_missing(path, e))?;

        let mut next = document.clone();
        match split_front_matter(&config.front_matter, &source) {
            Some((block, body)) => match parse_context(block, Format::Yaml) {
                Ok(front_matter) => {
                    next.apply_front_matter(front_matter);
                    next.content = body.to_owned();
                }
                Err(message) => {
                    let err = PipelineError::Parse {
                        path: path.clone(),
                        message,
                    };
                    log!("warn"; "{err}, front-matter ignored");
                    next.content.clone_from(&source);
                }
            },
            None => next.content.clone_from(&source),
        }
        next.source = source;

        Ok(Outcome::Replace(next))
    }

    fn before_asset(&self, asset: &Asset) -> HookResult<Asset> {
        if let Some(parent) = asset.publish.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        fs::copy(&asset.source, &asset.publish)
            .map_err(|e| PipelineError::io_or_missing(&asset.source, e))?;
        Ok(Outcome::Keep)
    }
}
