//! Stylesheets of the media directory.

use crate::error::AssetError;
use crate::styles::{HIGHLIGHT_CSS, MARKDOWN_CSS};
use std::path::{Path, PathBuf};

/// Base layout stylesheet.
pub const MARKDOWN_STYLESHEET: &str = include_str!("../assets/markdown.css");

/// Theme used for `highlight.css` when none is configured.
pub const DEFAULT_HIGHLIGHT_THEME: &str = "InspiredGitHub";

/// Provides access to embedded assets.
pub struct Assets;

impl Assets {
    /// Get the base layout stylesheet.
    pub fn markdown_css() -> &'static str {
        MARKDOWN_STYLESHEET
    }

    /// Build the code highlight stylesheet from a syntect theme.
    pub fn highlight_css(theme: &str) -> Result<String, AssetError> {
        Ok(highlighter::highlighter().theme_css(theme)?)
    }

    /// Write `markdown.css` and `highlight.css` into `media_dir`, creating it if needed.
    ///
    /// Returns the paths of the written files.
    pub fn write_to(media_dir: &Path, theme: &str) -> Result<Vec<PathBuf>, AssetError> {
        let highlight_css = Self::highlight_css(theme)?;

        std::fs::create_dir_all(media_dir).map_err(|source| AssetError::Write {
            path: media_dir.to_path_buf(),
            source,
        })?;

        [
            (MARKDOWN_CSS, MARKDOWN_STYLESHEET.to_string()),
            (HIGHLIGHT_CSS, highlight_css),
        ]
        .into_iter()
        .map(|(file_name, contents)| {
            let path = media_dir.join(file_name);
            std::fs::write(&path, contents).map_err(|source| AssetError::Write {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "Wrote stylesheet");
            Ok(path)
        })
        .collect()
    }
}
