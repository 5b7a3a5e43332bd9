//! Built-in plugins.
//!
//! | Name         | Hook           | Effect                                   |
//! |--------------|----------------|------------------------------------------|
//! | `blocks`     | `before_build` | `<<name ... name;` sections → context    |
//! | `markdown`   | `before_build` | markdown body and multi-line context     |
//! | `handlebars` | `before_build` | render the template around the body      |
//! | `minify`     | `after_build`  | minify HTML output                       |
//! | `sass`       | `before_asset` | compile `.scss`/`.sass` to `.css`        |
//!
//! The core plugin is not selectable; every pipeline appends it last.

mod blocks;
mod core;
mod handlebars;
mod markdown;
mod minify;
mod sass;

pub use self::core::CorePlugin;
pub use blocks::BlocksPlugin;
pub use handlebars::HandlebarsPlugin;
pub use markdown::MarkdownPlugin;
pub use minify::MinifyPlugin;
pub use sass::SassPlugin;

use crate::config::ConfigError;
use crate::pipeline::Plugin;
use std::sync::Arc;

/// Names accepted in `[build.plugins]`.
pub const BUILTIN_PLUGINS: &[&str] = &["blocks", "markdown", "handlebars", "minify", "sass"];

/// Instantiate a built-in plugin by name.
pub fn builtin(name: &str) -> Option<Arc<dyn Plugin>> {
    let plugin: Arc<dyn Plugin> = match name {
        "blocks" => Arc::new(BlocksPlugin),
        "markdown" => Arc::new(MarkdownPlugin::default()),
        "handlebars" => Arc::new(HandlebarsPlugin::new()),
        "minify" => Arc::new(MinifyPlugin),
        "sass" => Arc::new(SassPlugin),
        _ => return None,
    };
    Some(plugin)
}

/// Instantiate plugins in the configured order.
pub fn from_names(names: &[String]) -> Result<Vec<Arc<dyn Plugin>>, ConfigError> {
    names
        .iter()
        .map(|name| {
            builtin(name).ok_or_else(|| {
                ConfigError::Validation(format!(
                    "unknown plugin `{name}` in [build.plugins], expected one of: {}",
                    BUILTIN_PLUGINS.join(", ")
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_resolves() {
        for name in BUILTIN_PLUGINS {
            assert_eq!(builtin(name).unwrap().name(), *name);
        }
    }

    #[test]
    fn test_from_names_keeps_order() {
        let names = vec!["minify".to_owned(), "blocks".to_owned()];
        let plugins = from_names(&names).unwrap();
        let order: Vec<_> = plugins.iter().map(|p| p.name()).collect();
        assert_eq!(order, ["minify", "blocks"]);
    }

    #[test]
    fn test_unknown_name() {
        assert!(matches!(
            from_names(&["less".to_owned()]),
            Err(ConfigError::Validation(_))
        ));
    }
}
