mod markdown;

use crate::input::{AutocmdEvent, AutocmdEventType, PluginAction};
use std::fmt::Debug;

pub use self::markdown::MarkdownPreview;

pub type PluginId = &'static str;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("unknown action: {0}")]
    UnknownAction(String),
    #[error("unhandled event: {0:?}")]
    UnhandledEvent(AutocmdEventType),
    #[error(transparent)]
    InvalidParams(#[from] rpc::Error),
    #[error(transparent)]
    Preview(#[from] markdown_preview_core::PreviewError),
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}

/// A trait each preview plugin must implement.
///
/// The events of a plugin are processed one at a time by its session.
#[async_trait::async_trait]
pub trait Plugin: Debug + Send + Sync + 'static {
    fn id(&self) -> PluginId;

    /// Methods of the actions provided by this plugin.
    fn actions(&self) -> &[&'static str] {
        &[]
    }

    /// Editor events this plugin reacts to.
    fn subscriptions(&self) -> &[AutocmdEventType] {
        &[]
    }

    async fn handle_action(&mut self, action: PluginAction) -> Result<(), PluginError>;

    async fn handle_autocmd(&mut self, autocmd: AutocmdEvent) -> Result<(), PluginError>;
}
