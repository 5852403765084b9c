//! Core library of the markdown preview.
//!
//! - [`uri`] - The `markdown` URI scheme addressing a preview
//! - [`render`] - Markdown to HTML conversion with highlighted code blocks
//! - [`styles`] - Stylesheet links in front of the rendered body
//! - [`provider`] - Preview content provider and its change stream
//! - [`assets`] - The stylesheets of the media directory

pub mod assets;
pub mod document;
pub mod error;
pub mod provider;
pub mod render;
pub mod styles;
pub mod uri;

pub use assets::{Assets, DEFAULT_HIGHLIGHT_THEME};
pub use document::is_markdown_file;
pub use error::{AssetError, PreviewError};
pub use provider::{ConfigSource, OpenPreviews, PreviewContentProvider};
pub use render::{to_html, RenderOptions};
pub use uri::{PreviewUri, PREVIEW_SCHEME};
