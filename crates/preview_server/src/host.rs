//! Typed access to the editor host.

use crate::view_column::ViewColumn;
use anyhow::Result;
use markdown_preview_core::{ConfigSource, PreviewUri};
use preview_config::MarkdownConfig;
use rpc::RpcClient;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

/// The editor with the keyboard focus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveEditor {
    /// Uri of the document being edited.
    pub uri: String,
    #[serde(default)]
    pub view_column: Option<ViewColumn>,
}

/// Operations the preview needs from the editor.
#[async_trait::async_trait]
pub trait EditorHost: Send + Sync + 'static {
    /// Returns the focused editor, `None` if no editor has the focus.
    async fn active_editor(&self) -> Result<Option<ActiveEditor>>;

    /// Returns the uris of the documents open in the editor.
    async fn text_documents(&self) -> Result<Vec<String>>;

    /// Returns the `markdown` configuration section, `None` if the editor has none.
    async fn markdown_config(&self) -> Result<Option<MarkdownConfig>>;

    /// Asks the editor to show the preview document in `view_column`.
    fn show_preview(&self, uri: &PreviewUri, view_column: ViewColumn) -> Result<()>;

    /// Tells the editor the preview document is stale.
    fn notify_change(&self, uri: &PreviewUri) -> Result<()>;
}

/// [`EditorHost`] over the JSON-RPC connection.
#[derive(Debug, Clone)]
pub struct RpcHost {
    rpc_client: Arc<RpcClient>,
}

impl RpcHost {
    pub fn new(rpc_client: Arc<RpcClient>) -> Self {
        Self { rpc_client }
    }
}

#[async_trait::async_trait]
impl EditorHost for RpcHost {
    async fn active_editor(&self) -> Result<Option<ActiveEditor>> {
        Ok(self
            .rpc_client
            .request("window/activeTextEditor", Value::Null)
            .await?)
    }

    async fn text_documents(&self) -> Result<Vec<String>> {
        Ok(self
            .rpc_client
            .request("workspace/textDocuments", Value::Null)
            .await?)
    }

    async fn markdown_config(&self) -> Result<Option<MarkdownConfig>> {
        let section: Value = self
            .rpc_client
            .request("workspace/configuration", json!(["markdown"]))
            .await?;
        if section.is_null() {
            return Ok(None);
        }
        Ok(Some(MarkdownConfig::from_host_value(section)))
    }

    fn show_preview(&self, uri: &PreviewUri, view_column: ViewColumn) -> Result<()> {
        self.rpc_client.notify(
            "window/showPreview",
            json!({ "uri": uri.to_string(), "viewColumn": view_column }),
        )?;
        Ok(())
    }

    fn notify_change(&self, uri: &PreviewUri) -> Result<()> {
        self.rpc_client
            .notify("markdown/didChange", json!({ "uri": uri.to_string() }))?;
        Ok(())
    }
}

/// Reads the styles from the editor on every render.
///
/// Falls back to the `[markdown]` section of the config file when the editor has
/// no such section or the request fails.
pub struct HostConfigSource {
    host: Arc<dyn EditorHost>,
    fallback: MarkdownConfig,
}

impl HostConfigSource {
    pub fn new(host: Arc<dyn EditorHost>, fallback: MarkdownConfig) -> Self {
        Self { host, fallback }
    }
}

#[async_trait::async_trait]
impl ConfigSource for HostConfigSource {
    async fn markdown_config(&self) -> MarkdownConfig {
        match self.host.markdown_config().await {
            Ok(Some(config)) => config,
            Ok(None) => self.fallback.clone(),
            Err(err) => {
                tracing::warn!(?err, "Failed to fetch the markdown configuration from host");
                self.fallback.clone()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockHost;

    #[test]
    fn test_active_editor_from_host_json() {
        let editor: ActiveEditor =
            serde_json::from_value(json!({"uri": "file:///a.md", "viewColumn": 2})).unwrap();
        assert_eq!(editor.view_column, Some(ViewColumn::TWO));

        let editor: ActiveEditor = serde_json::from_value(json!({"uri": "file:///a.md"})).unwrap();
        assert_eq!(editor.view_column, None);

        let editor: Option<ActiveEditor> = serde_json::from_value(Value::Null).unwrap();
        assert!(editor.is_none());
    }

    #[tokio::test]
    async fn test_host_config_source() {
        let fallback = MarkdownConfig {
            styles: vec!["fallback.css".into()],
        };

        let host = Arc::new(MockHost::default());
        let source = HostConfigSource::new(host.clone(), fallback.clone());
        assert_eq!(source.markdown_config().await, fallback);

        host.set_markdown_config(Some(MarkdownConfig {
            styles: vec!["host.css".into()],
        }));
        assert_eq!(source.markdown_config().await.styles, vec!["host.css".to_string()]);

        host.set_markdown_config(Some(MarkdownConfig::default()));
        assert!(source.markdown_config().await.styles.is_empty());
    }
}
