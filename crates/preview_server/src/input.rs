use rpc::{Params, RpcNotification};
use serde::Deserialize;

/// Editor events a plugin can subscribe to.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum AutocmdEventType {
    /// A document was written to disk.
    BufWritePost,
    /// The editor configuration changed.
    ConfigurationChanged,
}

pub type AutocmdEvent = (AutocmdEventType, Params);

/// Action invoked by the user, e.g. `markdown.preview`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PluginAction {
    pub method: String,
    #[serde(default = "no_params")]
    pub params: Params,
}

fn no_params() -> Params {
    Params::None
}

impl PluginAction {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params: Params::None,
        }
    }

    /// Id of the plugin owning this action, the part before the first `.`.
    pub fn plugin_id(&self) -> &str {
        self.method
            .split_once('.')
            .map_or(self.method.as_str(), |(plugin_id, _)| plugin_id)
    }
}

#[derive(Debug, Clone)]
pub enum PluginEvent {
    Autocmd(AutocmdEvent),
    Action(PluginAction),
}

/// Notification from the editor host.
#[derive(Debug)]
pub enum Event {
    Autocmd(AutocmdEvent),
    Action(PluginAction),
    Exit,
    Other(String),
}

impl Event {
    pub fn from_notification(notification: RpcNotification) -> Result<Self, rpc::Error> {
        let RpcNotification { method, params, .. } = notification;

        let event = match method.as_str() {
            "textDocument/didSave" => Self::Autocmd((AutocmdEventType::BufWritePost, params)),
            "workspace/didChangeConfiguration" => {
                Self::Autocmd((AutocmdEventType::ConfigurationChanged, params))
            }
            "plugin/action" => Self::Action(params.parse()?),
            "exit" => Self::Exit,
            _ => Self::Other(method),
        };

        Ok(event)
    }
}
