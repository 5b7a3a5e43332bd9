//! Site initialization module.
//!
//! Creates a new site with the default layout, a `folio.toml`, a starter
//! template and a first document.

use crate::{config::SiteConfig, log};
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Built-in plugins enabled in a fresh `folio.toml`
const STARTER_PLUGINS: &[&str] = &["blocks", "markdown", "handlebars"];

const STARTER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <title>{{title}} | {{site}}</title>
  </head>
  <body>
    <nav>
      {{#each (lookup index ".")}}
      <a href="{{path}}"{{#if current}} aria-current="page"{{/if}}>{{title}}</a>
      {{/each}}
    </nav>
    <main>{{{content}}}</main>
    <aside>{{{sidebar}}}</aside>
  </body>
</html>
"#;

const STARTER_DOCUMENT: &str = "---
title: Home
---
Welcome to your new site.

<<sidebar
Edit `content/index.md`
to get started.
sidebar;
";

/// Create a new site at the config root.
///
/// Without an explicit name the root must be empty.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `folio init <SITE_NAME>` to create in a subdirectory."
        );
    }
    if config.config_path.exists() {
        bail!(
            "Config file `{}` already exists. Remove it manually or init in a different path.",
            config.config_path.display()
        );
    }

    init_site_structure(config)?;
    init_default_config(config)?;
    init_starter_files(config)?;

    log!("init"; "created site at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Write the default configuration, with the directory layout in use
fn init_default_config(config: &SiteConfig) -> Result<()> {
    let mut starter = SiteConfig::default();
    starter.build.content.clone_from(&config.build.content);
    starter.build.publish.clone_from(&config.build.publish);
    starter.build.assets.clone_from(&config.build.assets);
    starter.build.plugins = STARTER_PLUGINS.iter().map(|&p| p.to_owned()).collect();
    starter
        .context
        .insert("site".into(), serde_json::Value::String("My Site".into()));

    let content = toml::to_string_pretty(&starter)?;
    fs::write(&config.config_path, content)
        .with_context(|| format!("Failed to write {}", config.config_path.display()))?;
    Ok(())
}

/// Create site directory structure
fn init_site_structure(config: &SiteConfig) -> Result<()> {
    let paths = config.paths();
    for path in [
        paths.content_root(),
        paths.templates_root(),
        paths.publish_root(),
        paths.assets_root(),
    ] {
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `folio init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

/// Write the starter template and home document
fn init_starter_files(config: &SiteConfig) -> Result<()> {
    let paths = config.paths();
    let files = [
        (
            paths.template_file(&config.build.default_template),
            STARTER_TEMPLATE,
        ),
        (paths.resolve("index").content, STARTER_DOCUMENT),
    ];

    for (path, content) in files {
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use tempfile::TempDir;

    fn config_at(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config.config_path = root.join("folio.toml");
        config
    }

    #[test]
    fn test_new_site_builds() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("blog");
        new_site(&config_at(&root), true).unwrap();

        let mut loaded = SiteConfig::from_path(&root.join("folio.toml")).unwrap();
        assert_eq!(loaded.build.plugins, ["blocks", "markdown", "handlebars"]);
        loaded.set_root(&root);
        loaded.validate().unwrap();

        let pipeline = Pipeline::from_config(loaded).unwrap();
        pipeline.run().unwrap();

        let html = fs::read_to_string(root.join("publish/index.html")).unwrap();
        assert!(html.contains("<title>Home | My Site</title>"));
        assert!(html.contains("<main><p>Welcome to your new site.</p>"));
        assert!(html.contains("<aside><p>Edit <code>content/index.md</code>"));
        assert!(html.contains(r#"<a href="index.html" aria-current="page">Home</a>"#));
    }

    #[test]
    fn test_refuses_non_empty_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        assert!(new_site(&config_at(dir.path()), false).is_err());
    }

    #[test]
    fn test_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("folio.toml"), "").unwrap();
        assert!(new_site(&config_at(dir.path()), true).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("folio.toml")).unwrap(), "");
    }
}
