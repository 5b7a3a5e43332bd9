//! Path arithmetic shared by the resolver and the site index.

use std::path::{Component, Path, PathBuf};

/// Compute the path leading from directory `from` to `to`.
///
/// Both paths must be absolute (or share the same base). The result never
/// touches the filesystem, so it also works for files not yet written.
///
/// ```ignore
/// relative_path("/pub/blog", "/pub/index.html") // → "../index.html"
/// relative_path("/pub", "/pub")                 // → ""
/// ```
pub fn relative_path(from: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from.components().collect();
    let to: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in common..from.len() {
        rel.push("..");
    }
    for component in &to[common..] {
        rel.push(component.as_os_str());
    }
    rel
}

/// Render a relative path as a `/`-separated URL, mapping the empty path to `.`.
pub fn to_url(path: &Path) -> String {
    let url = path.to_string_lossy().replace('\\', "/");
    if url.is_empty() { ".".to_owned() } else { url }
}

/// Normalize an extension setting: `".md"` and `"md"` both become `"md"`.
#[inline]
pub fn bare_ext(ext: &str) -> &str {
    ext.trim_start_matches('.')
}

/// Check a file's extension against a configured one.
pub fn has_ext(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e == bare_ext(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_sibling() {
        let rel = relative_path(Path::new("/pub"), Path::new("/pub/about.html"));
        assert_eq!(rel, PathBuf::from("about.html"));
    }

    #[test]
    fn test_relative_path_up_and_down() {
        let rel = relative_path(Path::new("/pub/blog"), Path::new("/pub/docs/intro.html"));
        assert_eq!(to_url(&rel), "../docs/intro.html");
    }

    #[test]
    fn test_relative_path_to_self_is_dot() {
        let rel = relative_path(Path::new("/pub"), Path::new("/pub"));
        assert_eq!(to_url(&rel), ".");
    }

    #[test]
    fn test_relative_path_to_root() {
        let rel = relative_path(Path::new("/pub/a/b"), Path::new("/pub"));
        assert_eq!(to_url(&rel), "../..");
    }

    #[test]
    fn test_has_ext() {
        assert!(has_ext(Path::new("post.md"), ".md"));
        assert!(has_ext(Path::new("post.md"), "md"));
        assert!(!has_ext(Path::new("post.mdx"), "md"));
        assert!(!has_ext(Path::new("README"), "md"));
    }
}
