//! Folio - a static site generator built around a plugin hook pipeline.

use anyhow::{Result, bail};
use clap::Parser;
use folio::{
    build::build_site,
    cli::{Cli, Commands},
    config::SiteConfig,
    init::new_site,
    log,
    pipeline::{self, Context, Pipeline},
};
use serde_json::Value;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { clean } => build_site(&Pipeline::from_config(config)?, *clean),
        Commands::New {
            path,
            title,
            template,
        } => {
            let pipeline = Pipeline::from_config(config)?;
            let front_matter = front_matter(title.as_deref(), template.as_deref());
            let document = pipeline::create(&pipeline, path, front_matter, "")?;
            log!("new"; "created {}", document.content_path.display());
            Ok(())
        }
        Commands::Delete { path } => {
            let pipeline = Pipeline::from_config(config)?;
            pipeline::delete(&pipeline, path)?;
            log!("delete"; "deleted {path}");
            Ok(())
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let config = SiteConfig::load(cli)?;

    let config_exists = config.config_path.exists();
    match (cli.is_init(), config_exists) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file `{}` not found.", config.config_path.display()),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

/// Front-matter for `folio new`, `None` when no field is given
fn front_matter(title: Option<&str>, template: Option<&str>) -> Option<Context> {
    let context: Context = [("title", title), ("template", template)]
        .into_iter()
        .filter_map(|(key, value)| Some((key.to_owned(), Value::String(value?.to_owned()))))
        .collect();
    (!context.is_empty()).then_some(context)
}
