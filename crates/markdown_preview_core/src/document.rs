//! Recognition of markdown source documents.

/// File name endings of markdown documents, matched case-sensitively.
pub const MARKDOWN_SUFFIXES: &[&str] = &[".md", ".mdown", ".markdown", ".markdn"];

/// Returns `true` if `file_name` ends with one of [`MARKDOWN_SUFFIXES`].
///
/// ```
/// use markdown_preview_core::is_markdown_file;
///
/// assert!(is_markdown_file("notes.md"));
/// assert!(!is_markdown_file("NOTES.MD"));
/// assert!(!is_markdown_file("notes.txt"));
/// ```
pub fn is_markdown_file(file_name: &str) -> bool {
    MARKDOWN_SUFFIXES
        .iter()
        .any(|suffix| file_name.ends_with(suffix))
}
