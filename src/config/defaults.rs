//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [build] Section Defaults
// ============================================================================

pub mod build {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn templates() -> PathBuf {
        "templates".into()
    }

    pub fn publish() -> PathBuf {
        "publish".into()
    }

    pub fn assets() -> PathBuf {
        "assets".into()
    }

    pub fn default_template() -> String {
        "index.html".into()
    }

    pub fn content_ext() -> String {
        "md".into()
    }

    pub fn publish_ext() -> String {
        "html".into()
    }

    /// A `---` fenced block at the very start of the file; group 1 is the body
    /// and does not participate when the block is empty.
    pub fn front_matter() -> String {
        r"\A---[ \t]*\r?\n(?s:(.*?)\r?\n)?---[ \t]*(?:\r?\n|\z)".into()
    }

    /// Documents whose file name starts with `_` stay out of the site index.
    pub fn hidden() -> String {
        "^_".into()
    }

    pub fn plugins() -> Vec<String> {
        Vec::new()
    }
}
