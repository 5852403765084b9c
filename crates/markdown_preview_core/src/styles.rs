//! Stylesheet links put in front of the rendered body.

use std::path::{Component, Path, PathBuf};
use url::Url;

/// File name of the base layout stylesheet in the media directory.
pub const MARKDOWN_CSS: &str = "markdown.css";
/// File name of the code highlight stylesheet in the media directory.
pub const HIGHLIGHT_CSS: &str = "highlight.css";

fn media_file(media_dir: &Path, file_name: &str) -> String {
    escape_attribute(&media_dir.join(file_name).to_string_lossy())
}

/// Escapes a value put between double quotes of an HTML attribute.
fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Links to the base layout and code highlight stylesheets.
pub fn fixed_style_links(media_dir: &Path) -> String {
    format!(
        "<link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" >\
         <link rel=\"stylesheet\" type=\"text/css\" href=\"{}\" >",
        media_file(media_dir, MARKDOWN_CSS),
        media_file(media_dir, HIGHLIGHT_CSS),
    )
}

/// Links to the user stylesheets of a document at `source_path`, one per line.
pub fn user_style_links(source_path: &Path, styles: &[String]) -> String {
    styles
        .iter()
        .filter_map(|style| resolve_style_href(source_path, style))
        .map(|href| {
            format!(
                "<link rel=\"stylesheet\" href=\"{}\" type=\"text/css\" media=\"screen\">",
                escape_attribute(&href)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Resolves a configured stylesheet reference.
///
/// A reference with a scheme is used as is, anything else is a path relative to
/// the directory of `source_path`. Returns `None` for an empty reference.
///
/// ```
/// use markdown_preview_core::styles::resolve_style_href;
/// use std::path::Path;
///
/// let source = Path::new("/docs/readme.md");
/// assert_eq!(
///     resolve_style_href(source, "../theme.css").as_deref(),
///     Some("file:///theme.css")
/// );
/// assert_eq!(
///     resolve_style_href(source, "https://example.com/x.css").as_deref(),
///     Some("https://example.com/x.css")
/// );
/// ```
pub fn resolve_style_href(source_path: &Path, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if Url::parse(href).is_ok() {
        return Some(href.to_string());
    }

    let source_dir = source_path.parent().unwrap_or_else(|| Path::new(""));
    let resolved = normalize_path(&source_dir.join(href.trim_start_matches(['/', '\\'])));

    Some(
        Url::from_file_path(&resolved)
            .map(String::from)
            .unwrap_or_else(|()| resolved.to_string_lossy().into_owned()),
    )
}

/// Resolves `.` and `..` components without touching the filesystem.
fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other),
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_style_links() {
        let links = fixed_style_links(Path::new("/opt/mdpreview/media"));
        assert_eq!(
            links,
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"/opt/mdpreview/media/markdown.css\" >\
             <link rel=\"stylesheet\" type=\"text/css\" href=\"/opt/mdpreview/media/highlight.css\" >"
        );
    }

    #[test]
    fn test_hrefs_are_attribute_escaped() {
        let links = fixed_style_links(Path::new("/media/a\"b&c"));
        assert!(links.contains("href=\"/media/a&quot;b&amp;c/markdown.css\""));

        let styles = vec![
            "https://example.com/x.css?a=1&b=\"><script>".to_string(),
            "https://example.com/y.css".to_string(),
        ];
        let links = user_style_links(Path::new("/docs/readme.md"), &styles);
        assert!(!links.contains("<script>"));
        assert_eq!(links.matches("<link ").count(), 2);
        assert_eq!(links.matches('"').count(), 2 * 8);
    }

    #[test]
    fn test_relative_and_absolute_styles() {
        let styles = vec!["theme.css".to_string(), "http://example.com/x.css".to_string()];
        let links = user_style_links(Path::new("/docs/readme.md"), &styles);
        assert_eq!(
            links,
            "<link rel=\"stylesheet\" href=\"file:///docs/theme.css\" type=\"text/css\" media=\"screen\">\n\
             <link rel=\"stylesheet\" href=\"http://example.com/x.css\" type=\"text/css\" media=\"screen\">"
        );
    }

    #[test]
    fn test_resolve_style_href() {
        let source = Path::new("/docs/guide/readme.md");
        let resolve = |href| resolve_style_href(source, href);
        assert_eq!(resolve("./a.css").as_deref(), Some("file:///docs/guide/a.css"));
        assert_eq!(resolve("../../../a.css").as_deref(), Some("file:///a.css"));
        assert_eq!(resolve("css/my theme.css").as_deref(), Some("file:///docs/guide/css/my%20theme.css"));
        assert_eq!(resolve("/shared.css").as_deref(), Some("file:///docs/guide/shared.css"));
        assert_eq!(resolve("file:///etc/x.css").as_deref(), Some("file:///etc/x.css"));
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("   "), None);
    }

    #[test]
    fn test_empty_styles() {
        assert_eq!(user_style_links(Path::new("/docs/readme.md"), &[]), "");
        let styles = vec![String::new(), "a.css".to_string()];
        assert_eq!(
            user_style_links(Path::new("/docs/readme.md"), &styles),
            "<link rel=\"stylesheet\" href=\"file:///docs/a.css\" type=\"text/css\" media=\"screen\">"
        );
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("../a")), PathBuf::from("../a"));
    }
}
