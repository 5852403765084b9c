//! Preview service talking to the editor host over stdio.
//!
//! The host drives the service with JSON-RPC messages: content requests are
//! answered by the [`PreviewContentProvider`], user actions and editor events are
//! dispatched to the plugin sessions, and stale previews are reported back to the
//! host by the [`ChangeForwarder`].

mod forwarder;
mod host;
mod input;
mod plugin;
mod server;
mod service;
#[cfg(test)]
mod test_utils;
mod view_column;

pub use self::forwarder::{ChangeForwarder, DEFAULT_FORWARD_DELAY};
pub use self::host::{ActiveEditor, EditorHost, HostConfigSource, RpcHost};
pub use self::input::{AutocmdEvent, AutocmdEventType, Event, PluginAction, PluginEvent};
pub use self::plugin::{MarkdownPreview, Plugin, PluginError, PluginId};
pub use self::server::PreviewServer;
pub use self::service::{PluginSession, ServiceManager};
pub use self::view_column::ViewColumn;

use markdown_preview_core::PreviewContentProvider;
use preview_config::MarkdownConfig;
use rpc::RpcClient;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::Arc;

/// Starts and keeps running the preview service on top of stdio.
///
/// `fallback_config` is used when the editor has no `markdown` configuration.
pub async fn start(media_dir: PathBuf, fallback_config: MarkdownConfig) {
    let (host_message_sender, host_messages) = tokio::sync::mpsc::unbounded_channel();

    let rpc_client = Arc::new(RpcClient::new(
        BufReader::new(std::io::stdin()),
        BufWriter::new(std::io::stdout()),
        host_message_sender,
    ));

    let host: Arc<dyn EditorHost> = Arc::new(RpcHost::new(rpc_client.clone()));
    let config_source = Arc::new(HostConfigSource::new(host.clone(), fallback_config));
    let provider = Arc::new(PreviewContentProvider::new(media_dir, config_source));

    tracing::info!(media_dir = %provider.media_dir().display(), "Preview service started");

    PreviewServer::new(rpc_client, host, provider)
        .run(host_messages)
        .await;

    tracing::info!("Preview service stopped");
}
