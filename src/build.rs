//! Site building orchestration for the `build` command.
//!
//! Same flow as [`Pipeline::run`], with progress bars and logging.
//!
//! ```text
//! build_site()
//!     │
//!     ├── read_all() ──► documents cache
//!     │
//!     ├─┬─ build_all() ──► write_all()      [content]
//!     │ └─ handle_assets()                  [assets]
//!     │
//!     └── log result
//! ```

use crate::{
    log,
    logger::ProgressBars,
    pipeline::{
        Pipeline,
        assets::{collect_assets, handle_assets_with},
        builder::build_all_with,
        read_all,
        writer::write_all_with,
    },
};
use anyhow::{Context, Result};
use std::fs;

/// Build the entire site, processing content and assets in parallel.
///
/// When `clean` is set the publish directory is removed first.
pub fn build_site(pipeline: &Pipeline, clean: bool) -> Result<()> {
    let config = pipeline.config();
    let publish = config.paths().publish_root();

    if clean && publish.exists() {
        fs::remove_dir_all(&publish).with_context(|| {
            format!("Failed to clear publish directory: {}", publish.display())
        })?;
    }

    pipeline.clear();
    log!("read"; "scanning {}", config.paths().content_root().display());
    read_all(pipeline)?;
    let documents = pipeline.documents().len();
    log!("read"; "found {documents} documents");

    let assets = collect_assets(pipeline)?.len();
    let progress = ProgressBars::new_filtered(&[
        ("content", documents * 2),
        ("assets", assets),
    ]);
    let tick = |name: &str| {
        if let Some(progress) = &progress {
            progress.inc(name);
        }
    };

    let (content_result, assets_result) = rayon::join(
        || {
            build_all_with(pipeline, |_| tick("content"))?;
            write_all_with(pipeline, |_| tick("content"))
        },
        || handle_assets_with(pipeline, |_| tick("assets")),
    );

    if let Some(progress) = &progress {
        progress.finish();
    }

    content_result.context("Build failed")?;
    assets_result.context("Asset handling failed")?;

    log!("build"; "published {documents} documents and {assets} assets to {}", publish.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::testing::*;

    #[test]
    fn test_clean_removes_stale_output() {
        let (dir, pipeline) = site(Vec::new());
        write_file(dir.path(), "content/index.md", "Home");
        write_file(dir.path(), "publish/stale.html", "old");

        build_site(&pipeline, false).unwrap();
        assert!(dir.path().join("publish/stale.html").exists());

        build_site(&pipeline, true).unwrap();
        assert!(!dir.path().join("publish/stale.html").exists());
        assert!(dir.path().join("publish/index.html").is_file());
    }
}
