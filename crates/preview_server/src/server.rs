use crate::forwarder::ChangeForwarder;
use crate::host::EditorHost;
use crate::input::Event;
use crate::plugin::MarkdownPreview;
use crate::service::ServiceManager;
use markdown_preview_core::{PreviewContentProvider, PreviewError, PreviewUri};
use parking_lot::Mutex;
use rpc::{ErrorCode, HostMessage, RpcClient, RpcRequest};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

/// Error code of a content request whose source file can not be read.
const READ_ERROR_CODE: i64 = -32001;

#[derive(Debug, Deserialize)]
struct ProvideContentParams {
    uri: String,
}

/// Bridge between the editor host and the preview plugins.
#[derive(Clone)]
pub struct PreviewServer {
    rpc_client: Arc<RpcClient>,
    provider: Arc<PreviewContentProvider>,
    service_manager: Arc<Mutex<ServiceManager>>,
    actions: Arc<Vec<String>>,
}

impl PreviewServer {
    /// Creates a new instance of [`PreviewServer`], registering the markdown plugin
    /// and forwarding the preview changes to `host`.
    pub fn new(
        rpc_client: Arc<RpcClient>,
        host: Arc<dyn EditorHost>,
        provider: Arc<PreviewContentProvider>,
    ) -> Self {
        ChangeForwarder::new(host.clone(), &provider).spawn();

        let mut service_manager = ServiceManager::default();
        let (plugin_id, actions) = service_manager
            .register_plugin(Box::new(MarkdownPreview::new(host, provider.clone())));
        tracing::debug!(plugin_id, ?actions, "Registered plugin");

        Self {
            rpc_client,
            provider,
            service_manager: Arc::new(Mutex::new(service_manager)),
            actions: Arc::new(actions),
        }
    }

    /// Handles the messages from the host until it exits or closes the stream.
    pub async fn run(self, mut host_messages: UnboundedReceiver<HostMessage>) {
        while let Some(host_message) = host_messages.recv().await {
            match host_message {
                HostMessage::Request(request) => self.process_request(request),
                HostMessage::Notification(notification) => {
                    let method = notification.method.clone();
                    match Event::from_notification(notification) {
                        Ok(Event::Autocmd(autocmd)) => {
                            self.service_manager.lock().notify_plugins(autocmd);
                        }
                        Ok(Event::Action(action)) => {
                            self.service_manager.lock().notify_plugin_action(action);
                        }
                        Ok(Event::Exit) => {
                            tracing::debug!("Host requested exit");
                            break;
                        }
                        Ok(Event::Other(method)) => {
                            tracing::debug!(%method, "Ignored unknown notification");
                        }
                        Err(err) => {
                            tracing::error!(?err, %method, "Invalid notification");
                        }
                    }
                }
            }
        }
    }

    fn process_request(&self, request: RpcRequest) {
        let server = self.clone();

        tokio::spawn(async move {
            let RpcRequest { id, method, params, .. } = request;

            let result = server.handle_request(&method, params).await;
            if let Err(err) = &result {
                tracing::debug!(%id, %method, ?err, "Request failed");
            }

            if let Err(err) = server.rpc_client.send_response(id, result) {
                tracing::debug!(?err, "Failed to send the output result");
            }
        });
    }

    pub(crate) async fn handle_request(
        &self,
        method: &str,
        params: rpc::Params,
    ) -> Result<Value, rpc::Error> {
        match method {
            "initialize" => Ok(json!({
                "scheme": self.provider.scheme(),
                "actions": self.actions.as_slice(),
            })),
            "markdown/provideContent" => {
                let ProvideContentParams { uri } = params.parse()?;
                let uri: PreviewUri = uri.parse().map_err(preview_error)?;
                let html = self.provider.render(&uri).await.map_err(preview_error)?;
                Ok(Value::String(html))
            }
            _ => Err(rpc::Error::method_not_found(method)),
        }
    }
}

fn preview_error(err: PreviewError) -> rpc::Error {
    match err {
        PreviewError::InvalidUri(_) => rpc::Error::invalid_params(err.to_string()),
        PreviewError::Read { ref path, .. } => rpc::Error {
            code: ErrorCode::ServerError(READ_ERROR_CODE),
            message: err.to_string(),
            data: Some(json!({ "path": path.display().to_string() })),
        },
    }
}
