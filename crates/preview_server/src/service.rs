use crate::input::{AutocmdEvent, AutocmdEventType, PluginAction, PluginEvent};
use crate::plugin::{Plugin, PluginId};
use std::collections::HashMap;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Runs the events of a plugin one after another.
pub struct PluginSession {
    plugin: Box<dyn Plugin>,
    plugin_events: UnboundedReceiver<PluginEvent>,
}

impl PluginSession {
    /// Creates a new [`PluginSession`] and starts its event processing.
    pub fn create(plugin: Box<dyn Plugin>) -> UnboundedSender<PluginEvent> {
        let (plugin_event_sender, plugin_event_receiver) = unbounded_channel();

        let plugin_id = plugin.id();

        let plugin_session = PluginSession {
            plugin,
            plugin_events: plugin_event_receiver,
        };

        tokio::spawn(async move {
            tracing::debug!(plugin_id, "Starting plugin session");
            plugin_session.run().await;
            tracing::debug!(plugin_id, "Plugin session exited");
        });

        plugin_event_sender
    }

    async fn run(mut self) {
        while let Some(plugin_event) = self.plugin_events.recv().await {
            self.process_event(plugin_event).await;
        }
    }

    async fn process_event(&mut self, plugin_event: PluginEvent) {
        let res = match plugin_event.clone() {
            PluginEvent::Action(action) => self.plugin.handle_action(action).await,
            PluginEvent::Autocmd(autocmd) => self.plugin.handle_autocmd(autocmd).await,
        };
        if let Err(err) = res {
            let id = self.plugin.id();
            tracing::error!(?err, "[{id}] Failed to process {plugin_event:?}");
        }
    }
}

/// This structs manages all the plugin sessions.
#[derive(Debug, Default)]
pub struct ServiceManager {
    plugins: HashMap<PluginId, (Vec<AutocmdEventType>, UnboundedSender<PluginEvent>)>,
}

impl ServiceManager {
    /// Starts a session for `plugin`, returns the id and the actions of the plugin.
    pub fn register_plugin(&mut self, plugin: Box<dyn Plugin>) -> (PluginId, Vec<String>) {
        let plugin_id = plugin.id();
        let actions = plugin.actions().iter().map(|s| s.to_string()).collect();
        let subscriptions = plugin.subscriptions().to_vec();

        let plugin_event_sender = PluginSession::create(plugin);
        self.plugins
            .insert(plugin_id, (subscriptions, plugin_event_sender));

        (plugin_id, actions)
    }

    /// Sends event message to all plugins subscribed to it.
    pub fn notify_plugins(&mut self, autocmd: AutocmdEvent) {
        self.plugins
            .retain(|_plugin_id, (subscriptions, plugin_sender)| {
                if subscriptions.contains(&autocmd.0) {
                    return plugin_sender
                        .send(PluginEvent::Autocmd(autocmd.clone()))
                        .is_ok();
                }
                true
            });
    }

    /// Dispatches the action to the plugin named by its method prefix.
    pub fn notify_plugin_action(&mut self, plugin_action: PluginAction) {
        let plugin_id = plugin_action.plugin_id().to_string();

        let Some((_, plugin_sender)) = self.plugins.get(plugin_id.as_str()) else {
            tracing::error!(method = %plugin_action.method, "No plugin for action");
            return;
        };

        if plugin_sender.send(PluginEvent::Action(plugin_action)).is_err() {
            tracing::error!("plugin {plugin_id} exited");
            self.plugins.remove(plugin_id.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::PluginError;
    use rpc::Params;
    use std::sync::Arc;
    use tokio::sync::mpsc::UnboundedSender as Sender;

    /// Plugin reporting every event it gets.
    #[derive(Debug)]
    struct Recorder {
        events: Sender<String>,
        in_progress: Arc<std::sync::atomic::AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Plugin for Recorder {
        fn id(&self) -> PluginId {
            "recorder"
        }

        fn actions(&self) -> &[&'static str] {
            &["recorder.slow", "recorder.fail"]
        }

        fn subscriptions(&self) -> &[AutocmdEventType] {
            &[AutocmdEventType::BufWritePost]
        }

        async fn handle_action(&mut self, action: PluginAction) -> Result<(), PluginError> {
            use std::sync::atomic::Ordering;

            assert!(!self.in_progress.swap(true, Ordering::SeqCst));
            if action.method == "recorder.slow" {
                tokio::time::sleep(std::time::Duration::from_millis(20)).await;
            }
            self.in_progress.store(false, Ordering::SeqCst);

            let _ = self.events.send(action.method.clone());
            if action.method == "recorder.fail" {
                return Err(PluginError::UnknownAction(action.method));
            }
            Ok(())
        }

        async fn handle_autocmd(&mut self, autocmd: AutocmdEvent) -> Result<(), PluginError> {
            let _ = self.events.send(format!("{:?}", autocmd.0));
            Ok(())
        }
    }

    fn manager() -> (ServiceManager, UnboundedReceiver<String>) {
        let (events, events_rx) = unbounded_channel();
        let mut manager = ServiceManager::default();
        let (id, actions) = manager.register_plugin(Box::new(Recorder {
            events,
            in_progress: Default::default(),
        }));
        assert_eq!(id, "recorder");
        assert_eq!(actions, vec!["recorder.slow", "recorder.fail"]);
        (manager, events_rx)
    }

    #[tokio::test]
    async fn events_are_processed_in_order_one_at_a_time() {
        let (mut manager, mut events) = manager();

        manager.notify_plugin_action(PluginAction::new("recorder.slow"));
        manager.notify_plugin_action(PluginAction::new("recorder.fail"));
        manager.notify_plugins((AutocmdEventType::BufWritePost, Params::None));

        assert_eq!(events.recv().await.unwrap(), "recorder.slow");
        // A failing event does not stop the session.
        assert_eq!(events.recv().await.unwrap(), "recorder.fail");
        assert_eq!(events.recv().await.unwrap(), "BufWritePost");
    }

    #[tokio::test]
    async fn only_subscribed_events_are_delivered() {
        let (mut manager, mut events) = manager();

        manager.notify_plugins((AutocmdEventType::ConfigurationChanged, Params::None));
        manager.notify_plugin_action(PluginAction::new("other.action"));
        manager.notify_plugins((AutocmdEventType::BufWritePost, Params::None));

        assert_eq!(events.recv().await.unwrap(), "BufWritePost");
    }
}
