//! Markdown to HTML.
//!
//! Converts the body, and optionally every multi-line string in the context
//! (such as the sections `blocks` lifts out). Single-line strings like a
//! `title` stay as they are.

use crate::pipeline::{Document, HookResult, Outcome, Plugin};
use pulldown_cmark::{Options, Parser, html};
use serde_json::Value;

pub struct MarkdownPlugin {
    multiline_context: bool,
}

impl MarkdownPlugin {
    pub fn new(multiline_context: bool) -> Self {
        Self { multiline_context }
    }
}

impl Default for MarkdownPlugin {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Plugin for MarkdownPlugin {
    fn name(&self) -> &str {
        "markdown"
    }

    fn before_build(&self, document: &Document, _template: &str) -> HookResult<Document> {
        let mut next = document.clone();
        next.content = render(&document.content);

        if self.multiline_context {
            for value in next.context.values_mut() {
                if let Value::String(text) = value {
                    if text.contains('\n') {
                        *text = render(text);
                    }
                }
            }
        }

        Ok(Outcome::Replace(next))
    }
}

fn render(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}
