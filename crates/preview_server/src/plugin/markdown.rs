use crate::host::EditorHost;
use crate::input::{AutocmdEvent, AutocmdEventType, PluginAction};
use crate::plugin::{Plugin, PluginError, PluginId};
use crate::view_column::ViewColumn;
use markdown_preview_core::{is_markdown_file, PreviewContentProvider, PreviewUri};
use serde::Deserialize;
use std::sync::Arc;

const PREVIEW: &str = "markdown.preview";
const PREVIEW_SIDE: &str = "markdown.previewSide";

#[derive(Debug, Deserialize)]
struct DocumentParams {
    uri: String,
}

/// Opens markdown previews and keeps them in sync with the sources.
pub struct MarkdownPreview {
    host: Arc<dyn EditorHost>,
    provider: Arc<PreviewContentProvider>,
}

impl std::fmt::Debug for MarkdownPreview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkdownPreview")
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}

impl MarkdownPreview {
    pub fn new(host: Arc<dyn EditorHost>, provider: Arc<PreviewContentProvider>) -> Self {
        Self { host, provider }
    }

    async fn show_preview(&self, side_by_side: bool) -> Result<(), PluginError> {
        let Some(editor) = self.host.active_editor().await? else {
            tracing::debug!("No active editor, skipping the preview");
            return Ok(());
        };

        let uri = PreviewUri::from_document_uri(&editor.uri)?;
        let view_column = editor.view_column.unwrap_or_default();
        let view_column = if side_by_side {
            view_column.beside()
        } else {
            view_column
        };

        tracing::debug!(%uri, ?view_column, "Showing preview");
        self.host.show_preview(&uri, view_column)?;

        Ok(())
    }

    fn on_document_saved(&self, params: DocumentParams) -> Result<(), PluginError> {
        let uri = PreviewUri::from_document_uri(&params.uri)?;
        if is_markdown_file(uri.path()) {
            self.provider.update(uri);
        }
        Ok(())
    }

    async fn on_configuration_changed(&self) -> Result<(), PluginError> {
        for document in self.host.text_documents().await? {
            if !PreviewUri::is_preview_uri(&document) {
                continue;
            }
            match document.parse::<PreviewUri>() {
                Ok(uri) => self.provider.update(uri),
                Err(err) => tracing::debug!(?err, %document, "Skipped invalid preview document"),
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Plugin for MarkdownPreview {
    fn id(&self) -> PluginId {
        "markdown"
    }

    fn actions(&self) -> &[&'static str] {
        &[PREVIEW, PREVIEW_SIDE]
    }

    fn subscriptions(&self) -> &[AutocmdEventType] {
        &[
            AutocmdEventType::BufWritePost,
            AutocmdEventType::ConfigurationChanged,
        ]
    }

    async fn handle_action(&mut self, action: PluginAction) -> Result<(), PluginError> {
        match action.method.as_str() {
            PREVIEW => self.show_preview(false).await,
            PREVIEW_SIDE => self.show_preview(true).await,
            _ => Err(PluginError::UnknownAction(action.method)),
        }
    }

    async fn handle_autocmd(&mut self, autocmd: AutocmdEvent) -> Result<(), PluginError> {
        let (event_type, params) = autocmd;

        match event_type {
            AutocmdEventType::BufWritePost => self.on_document_saved(params.parse()?),
            AutocmdEventType::ConfigurationChanged => self.on_configuration_changed().await,
        }
    }
}
