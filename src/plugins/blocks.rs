//! Named content blocks.
//!
//! Lifts heredoc-style sections out of the body into the context, so a
//! template can place them separately:
//!
//! ```text
//! <<sidebar
//! Related posts...
//! sidebar;
//! ```
//!
//! becomes `context.sidebar = "Related posts..."`. Names are alphanumeric and
//! the closing line matches case-insensitively. A block holds at least one
//! line; an unclosed block stays in the body.

use crate::pipeline::{Document, HookResult, Outcome, Plugin};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static RE_OPENING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<<([a-z0-9]+)$").unwrap());

pub struct BlocksPlugin;

impl Plugin for BlocksPlugin {
    fn name(&self) -> &str {
        "blocks"
    }

    fn before_build(&self, document: &Document, _template: &str) -> HookResult<Document> {
        let (blocks, body) = extract_blocks(&document.content);

        let mut next = document.clone();
        for (name, value) in blocks {
            next.context.insert(name, Value::String(value));
        }
        next.content = body;

        Ok(Outcome::Replace(next))
    }
}

/// Split `content` into named blocks (values trimmed) and the remaining
/// body (trimmed).
fn extract_blocks(content: &str) -> (Vec<(String, String)>, String) {
    let lines: Vec<&str> = content.lines().collect();
    let mut blocks = Vec::new();
    let mut body = Vec::with_capacity(lines.len());

    let mut i = 0;
    while i < lines.len() {
        if let Some(name) = RE_OPENING.captures(lines[i]).and_then(|c| c.get(1)) {
            let closing = format!("{};", name.as_str());
            let end = lines
                .get(i + 2..)
                .and_then(|rest| rest.iter().position(|line| line.eq_ignore_ascii_case(&closing)));

            if let Some(offset) = end {
                let end = i + 2 + offset;
                let value = lines[i + 1..end].join("\n");
                blocks.push((name.as_str().to_owned(), value.trim().to_owned()));
                i = end + 1;
                continue;
            }
        }

        body.push(lines[i]);
        i += 1;
    }

    (blocks, body.join("\n").trim().to_owned())
}
