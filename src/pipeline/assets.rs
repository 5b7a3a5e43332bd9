//! Mirror the assets tree into the publish tree.
//!
//! ```text
//! assets/css/app.css ──► before_asset (core copies last) ──► after_asset
//!                        publish/css/app.css
//! ```
//!
//! A plugin that writes its own output returns `Stop` from `before_asset`,
//! which skips the default copy.

use super::{Asset, Hook, Pipeline, PipelineError, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Run one asset file through the asset hook chain.
pub fn handle_asset(site: &Pipeline, source: &Path) -> Result<Asset> {
    let config = site.config();
    let publish = config
        .paths()
        .asset_publish_path(source)
        .ok_or_else(|| PipelineError::NotFound(source.to_path_buf()))?;

    let asset = Asset::new(source, publish);
    let asset = site
        .plugins
        .run(Hook::BeforeAsset, asset, |p, a| p.before_asset(a))?;
    site.plugins
        .run(Hook::AfterAsset, asset, |p, a| p.after_asset(a))
}

/// Handle every file under the assets root. A missing root is not an error.
pub fn handle_assets(site: &Pipeline) -> Result<()> {
    handle_assets_with(site, |_| {})
}

/// Like [`handle_assets`], reporting each handled asset to `on_handled`.
pub fn handle_assets_with(site: &Pipeline, on_handled: impl Fn(&Asset) + Sync) -> Result<()> {
    collect_assets(site)?.par_iter().try_for_each(|source| {
        let asset = handle_asset(site, source)?;
        on_handled(&asset);
        Ok::<_, PipelineError>(())
    })
}

/// All files under the assets root, sorted.
pub fn collect_assets(site: &Pipeline) -> Result<Vec<PathBuf>> {
    let root = site.config().paths().assets_root();
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(&root).to_path_buf();
            PipelineError::io(path, err.into())
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}
