//! Content provider of the `markdown` preview documents.

use crate::error::PreviewError;
use crate::render::{to_html, RenderOptions};
use crate::styles::{fixed_style_links, user_style_links};
use crate::uri::{PreviewUri, PREVIEW_SCHEME};
use async_trait::async_trait;
use parking_lot::Mutex;
use preview_config::MarkdownConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Number of unreceived changes kept for each subscriber.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Previews rendered so far, each once, in the order of their first render.
#[derive(Debug, Clone, Default)]
pub struct OpenPreviews(Arc<Mutex<Vec<PreviewUri>>>);

impl OpenPreviews {
    fn insert(&self, uri: &PreviewUri) {
        let mut previews = self.0.lock();
        if !previews.contains(uri) {
            previews.push(uri.clone());
        }
    }

    pub fn snapshot(&self) -> Vec<PreviewUri> {
        self.0.lock().clone()
    }
}

/// Supplies the `markdown` configuration section at render time.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    async fn markdown_config(&self) -> MarkdownConfig;
}

#[async_trait]
impl ConfigSource for MarkdownConfig {
    async fn markdown_config(&self) -> MarkdownConfig {
        self.clone()
    }
}

/// Renders preview documents and announces when one of them is stale.
pub struct PreviewContentProvider {
    media_dir: PathBuf,
    render_options: RenderOptions,
    config_source: Arc<dyn ConfigSource>,
    change_sender: broadcast::Sender<PreviewUri>,
    open_previews: OpenPreviews,
}

impl std::fmt::Debug for PreviewContentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewContentProvider")
            .field("media_dir", &self.media_dir)
            .field("render_options", &self.render_options)
            .field("subscribers", &self.change_sender.receiver_count())
            .finish()
    }
}

impl PreviewContentProvider {
    pub fn new(media_dir: PathBuf, config_source: Arc<dyn ConfigSource>) -> Self {
        let (change_sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            media_dir,
            render_options: RenderOptions::default(),
            config_source,
            change_sender,
            open_previews: OpenPreviews::default(),
        }
    }

    pub fn scheme(&self) -> &'static str {
        PREVIEW_SCHEME
    }

    pub fn media_dir(&self) -> &PathBuf {
        &self.media_dir
    }

    /// Renders the preview of `uri`.
    ///
    /// The source file and the styles are read again on every call.
    pub async fn render(&self, uri: &PreviewUri) -> Result<String, PreviewError> {
        let path = uri.fs_path();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| PreviewError::Read {
                path: path.clone(),
                source,
            })?;

        let body = to_html(&String::from_utf8_lossy(&bytes), &self.render_options);

        let config = self.config_source.markdown_config().await;

        let mut html = fixed_style_links(&self.media_dir);
        html.push_str(&user_style_links(&path, &config.styles));
        html.push_str(&body);

        self.open_previews.insert(uri);

        tracing::debug!(
            %uri,
            source_len = bytes.len(),
            styles = config.styles.len(),
            html_len = html.len(),
            "Rendered preview"
        );

        Ok(html)
    }

    /// Marks the preview of `uri` as stale.
    pub fn update(&self, uri: PreviewUri) {
        tracing::trace!(%uri, "Preview updated");
        // No subscriber is not an error.
        let _ = self.change_sender.send(uri);
    }

    /// Subscribes to the stale previews, in the order they are reported.
    pub fn subscribe(&self) -> broadcast::Receiver<PreviewUri> {
        self.change_sender.subscribe()
    }

    /// Returns the handle to the previews this provider has rendered.
    pub fn open_previews(&self) -> OpenPreviews {
        self.open_previews.clone()
    }
}
