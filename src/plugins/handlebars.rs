//! Template rendering with Handlebars.
//!
//! The template receives the render context plus `content`, the document
//! body. Use `{{{content}}}` to insert the body unescaped.

use crate::pipeline::{Context, Document, HookResult, Outcome, Plugin};
use anyhow::Context as _;
use handlebars::Handlebars;
use serde_json::Value;

pub struct HandlebarsPlugin {
    registry: Handlebars<'static>,
}

impl HandlebarsPlugin {
    pub fn new() -> Self {
        Self {
            registry: Handlebars::new(),
        }
    }
}

impl Default for HandlebarsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for HandlebarsPlugin {
    fn name(&self) -> &str {
        "handlebars"
    }

    fn before_build(&self, document: &Document, template: &str) -> HookResult<Document> {
        let name = document.template_path.to_string_lossy();
        let content = render_template(&self.registry, &name, template, document)
            .with_context(|| format!("failed to render `{}` with `{name}`", document.path))?;

        let mut next = document.clone();
        next.content = content;
        Ok(Outcome::Replace(next))
    }
}

/// Render `template` under `name`, so errors point at the template file.
fn render_template(
    base: &Handlebars<'static>,
    name: &str,
    template: &str,
    document: &Document,
) -> anyhow::Result<String> {
    let mut data: Context = document.context.clone();
    data.insert("content".into(), Value::String(document.content.clone()));

    let mut registry = base.clone();
    registry.register_template_string(name, template)?;
    Ok(registry.render(name, &data)?)
}
