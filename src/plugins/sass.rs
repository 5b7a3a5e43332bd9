//! Compile Sass stylesheets in the assets tree.
//!
//! `css/app.scss` is published as `css/app.css`. Partials (`_name.scss`) are
//! only reachable through `@use`/`@import` and publish nothing. Every Sass
//! file stops the chain, so the raw source is never copied.

use crate::pipeline::{Asset, HookResult, Outcome, PipelineError, Plugin};
use std::fs;

pub struct SassPlugin;

impl Plugin for SassPlugin {
    fn name(&self) -> &str {
        "sass"
    }

    fn before_asset(&self, asset: &Asset) -> HookResult<Asset> {
        if !matches!(asset.ext(), Some("scss" | "sass")) {
            return Ok(Outcome::Keep);
        }

        let partial = asset
            .source
            .file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('_'));
        if partial {
            return Ok(Outcome::Stop);
        }

        let css = grass::from_path(&asset.source, &grass::Options::default()).map_err(|err| {
            PipelineError::Parse {
                path: asset.source.clone(),
                message: err.to_string(),
            }
        })?;

        let mut next = asset.clone();
        next.publish.set_extension("css");
        if let Some(parent) = next.publish.parent() {
            fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
        }
        fs::write(&next.publish, css).map_err(|e| PipelineError::io(&next.publish, e))?;

        Ok(Outcome::StopWith(next))
    }
}
