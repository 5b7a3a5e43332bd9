//! HTML minification of built documents.

use crate::pipeline::{Document, HookResult, Outcome, Plugin};
use std::path::Path;

pub struct MinifyPlugin;

impl Plugin for MinifyPlugin {
    fn name(&self) -> &str {
        "minify"
    }

    fn after_build(&self, document: &Document, _template: &str) -> HookResult<Document> {
        if !is_html(&document.publish_path) {
            return Ok(Outcome::Keep);
        }

        let minified = minify_html(document.content.as_bytes());
        let mut next = document.clone();
        next.content = String::from_utf8(minified)?;
        Ok(Outcome::Replace(next))
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"))
}

/// Minify HTML content using `minify_html` crate.
fn minify_html(html: &[u8]) -> Vec<u8> {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = true;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    minify_html::minify(html, &cfg)
}
