//! Anchor ids of headings.

use std::collections::HashSet;

/// Convert heading text to a GitHub-style anchor slug.
///
/// ```
/// use markdown_preview_core::render::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("API: v2.0 -- Notes"), "api-v20-notes");
/// ```
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' {
                Some(c)
            } else if c == ' ' || c == '-' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Hands out unique slugs within one document, `intro`, `intro-1`, `intro-2`...
#[derive(Debug, Default)]
pub(super) struct SlugRegistry {
    issued: HashSet<String>,
}

impl SlugRegistry {
    /// Marks an id written explicitly in the document as taken.
    pub(super) fn reserve(&mut self, id: &str) {
        self.issued.insert(id.to_string());
    }

    pub(super) fn unique_slug(&mut self, text: &str) -> String {
        let slug = slugify(&text.replace('`', ""));
        let mut unique = slug.clone();
        let mut suffix = 0;
        while self.issued.contains(&unique) {
            suffix += 1;
            unique = format!("{slug}-{suffix}");
        }
        self.issued.insert(unique.clone());
        unique
    }
}
