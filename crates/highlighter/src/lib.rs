//! Syntax highlighting of code blocks into classed HTML.
//!
//! The spans carry `hljs-` prefixed scope classes, the matching stylesheet is
//! produced by [`SyntaxHighlighter::theme_css`].

use once_cell::sync::Lazy;
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

pub use syntect::parsing::SyntaxReference;

/// Class style shared by the generated markup and the generated stylesheet.
pub const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hljs-" };

static HIGHLIGHTER: Lazy<SyntaxHighlighter> = Lazy::new(SyntaxHighlighter::default);

/// Returns the process-wide highlighter, loading the syntax definitions on first use.
pub fn highlighter() -> &'static SyntaxHighlighter {
    &HIGHLIGHTER
}

#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    #[error("theme not found: {theme}, available themes: {}", .available.join(", "))]
    ThemeNotFound {
        theme: String,
        available: Vec<String>,
    },
    #[error(transparent)]
    Syntect(#[from] syntect::Error),
}

#[derive(Debug)]
pub struct SyntaxHighlighter {
    pub syntax_set: SyntaxSet,
    pub theme_set: ThemeSet,
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }
}

impl SyntaxHighlighter {
    pub fn get_theme_list(&self) -> Vec<String> {
        let mut themes: Vec<String> = self.theme_set.themes.keys().cloned().collect();
        themes.sort();
        themes
    }

    pub fn theme_exists(&self, theme: &str) -> bool {
        self.theme_set.themes.contains_key(theme)
    }

    /// Finds the syntax for a fenced code block language tag.
    ///
    /// Tries the tag as a syntax token, then as a syntax name and finally as a file
    /// extension, all case-insensitively.
    pub fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.trim();
        if lang.is_empty() {
            return None;
        }
        let lowercase = lang.to_ascii_lowercase();
        self.syntax_set
            .find_syntax_by_token(&lowercase)
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.eq_ignore_ascii_case(lang))
            })
            .or_else(|| self.syntax_set.find_syntax_by_extension(&lowercase))
    }

    /// Highlights `code` written in `lang` to HTML spans, without any wrapper element.
    pub fn highlight_html(&self, lang: &str, code: &str) -> Result<String, HighlightError> {
        let syntax = self
            .find_syntax(lang)
            .ok_or_else(|| HighlightError::UnknownLanguage(lang.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, CLASS_STYLE);

        for line in LinesWithEndings::from(code) {
            generator.parse_html_for_line_which_includes_newline(line)?;
        }

        Ok(generator.finalize())
    }

    /// Renders the stylesheet of `theme` for the classes emitted by [`Self::highlight_html`].
    pub fn theme_css(&self, theme: &str) -> Result<String, HighlightError> {
        let theme = self
            .theme_set
            .themes
            .get(theme)
            .ok_or_else(|| HighlightError::ThemeNotFound {
                theme: theme.to_string(),
                available: self.get_theme_list(),
            })?;
        Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
    }
}
