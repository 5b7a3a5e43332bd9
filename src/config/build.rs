//! `[build]` section configuration.
//!
//! Contains directory layout, extensions, patterns and the plugin list.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in folio.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// content = "content"      # Source directory
/// publish = "publish"      # Output directory
/// content_ext = "md"
/// publish_ext = "html"
/// plugins = ["blocks", "markdown", "handlebars", "minify"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Project root directory (usually set via CLI `--root`).
    #[serde(default = "defaults::build::root")]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content source directory.
    #[serde(default = "defaults::build::content")]
    #[educe(Default = defaults::build::content())]
    pub content: PathBuf,

    /// Template directory.
    #[serde(default = "defaults::build::templates")]
    #[educe(Default = defaults::build::templates())]
    pub templates: PathBuf,

    /// Build output directory.
    #[serde(default = "defaults::build::publish")]
    #[educe(Default = defaults::build::publish())]
    pub publish: PathBuf,

    /// Static assets directory, mirrored into the publish tree.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Template used when a document sets no `template` key.
    #[serde(default = "defaults::build::default_template")]
    #[educe(Default = defaults::build::default_template())]
    pub default_template: String,

    /// Extension of content files (with or without the leading dot).
    #[serde(default = "defaults::build::content_ext")]
    #[educe(Default = defaults::build::content_ext())]
    pub content_ext: String,

    /// Extension of published files.
    #[serde(default = "defaults::build::publish_ext")]
    #[educe(Default = defaults::build::publish_ext())]
    pub publish_ext: String,

    /// Regex matching the front-matter block; capture group 1 is parsed.
    #[serde(default = "defaults::build::front_matter")]
    #[educe(Default = defaults::build::front_matter())]
    pub front_matter: String,

    /// Regex on file names of documents excluded from the site index.
    #[serde(default = "defaults::build::hidden")]
    #[educe(Default = defaults::build::hidden())]
    pub hidden: String,

    /// Built-in plugins, in execution order.
    #[serde(default = "defaults::build::plugins")]
    #[educe(Default = defaults::build::plugins())]
    pub plugins: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let build = BuildConfig::default();
        assert_eq!(build.content, PathBuf::from("content"));
        assert_eq!(build.publish, PathBuf::from("publish"));
        assert_eq!(build.default_template, "index.html");
        assert_eq!(build.content_ext, "md");
        assert_eq!(build.publish_ext, "html");
        assert!(build.plugins.is_empty());
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let build: BuildConfig = toml::from_str(
            r#"
            content = "pages"
            plugins = ["blocks"]
            "#,
        )
        .unwrap();
        assert_eq!(build.content, PathBuf::from("pages"));
        assert_eq!(build.templates, PathBuf::from("templates"));
        assert_eq!(build.plugins, vec!["blocks".to_string()]);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<BuildConfig, _> = toml::from_str("minify = true");
        assert!(result.is_err());
    }
}
