use crate::host::{ActiveEditor, EditorHost};
use crate::view_column::ViewColumn;
use anyhow::Result;
use markdown_preview_core::PreviewUri;
use parking_lot::Mutex;
use preview_config::MarkdownConfig;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    ShowPreview(String, ViewColumn),
    DidChange(String),
}

/// In-memory editor recording the notifications sent to it.
#[derive(Debug, Default)]
pub struct MockHost {
    pub active_editor: Mutex<Option<ActiveEditor>>,
    pub text_documents: Mutex<Vec<String>>,
    pub markdown_config: Mutex<Option<MarkdownConfig>>,
    pub calls: Mutex<Vec<HostCall>>,
}

impl MockHost {
    pub fn with_active_editor(uri: &str, view_column: Option<i64>) -> Self {
        let host = Self::default();
        *host.active_editor.lock() = Some(ActiveEditor {
            uri: uri.to_string(),
            view_column: view_column.map(ViewColumn),
        });
        host
    }

    pub fn set_text_documents(&self, documents: &[&str]) {
        *self.text_documents.lock() = documents.iter().map(|s| s.to_string()).collect();
    }

    pub fn set_markdown_config(&self, config: Option<MarkdownConfig>) {
        *self.markdown_config.lock() = config;
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }

    /// Waits until `n` calls are recorded, returns the calls recorded by then.
    pub async fn wait_for_calls(&self, n: usize) -> Vec<HostCall> {
        for _ in 0..200 {
            if self.calls.lock().len() >= n {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        self.calls()
    }
}

#[async_trait::async_trait]
impl EditorHost for MockHost {
    async fn active_editor(&self) -> Result<Option<ActiveEditor>> {
        Ok(self.active_editor.lock().clone())
    }

    async fn text_documents(&self) -> Result<Vec<String>> {
        Ok(self.text_documents.lock().clone())
    }

    async fn markdown_config(&self) -> Result<Option<MarkdownConfig>> {
        Ok(self.markdown_config.lock().clone())
    }

    fn show_preview(&self, uri: &PreviewUri, view_column: ViewColumn) -> Result<()> {
        self.calls
            .lock()
            .push(HostCall::ShowPreview(uri.to_string(), view_column));
        Ok(())
    }

    fn notify_change(&self, uri: &PreviewUri) -> Result<()> {
        self.calls.lock().push(HostCall::DidChange(uri.to_string()));
        Ok(())
    }
}
