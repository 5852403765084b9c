//! Forwards the stale previews to the editor.

use crate::host::EditorHost;
use markdown_preview_core::{OpenPreviews, PreviewContentProvider, PreviewUri};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Delay between the first change in a burst and the notification to the editor.
pub const DEFAULT_FORWARD_DELAY: Duration = Duration::from_millis(50);

/// Notifies the editor of the changes emitted by the content provider.
///
/// Changes arriving within the delay are sent together, each uri once, in the
/// order they first arrived. Once changes are lost to lagging, every open
/// preview is reported stale.
pub struct ChangeForwarder {
    host: Arc<dyn EditorHost>,
    changes: broadcast::Receiver<PreviewUri>,
    open_previews: OpenPreviews,
    delay: Duration,
}

impl ChangeForwarder {
    pub fn new(host: Arc<dyn EditorHost>, provider: &PreviewContentProvider) -> Self {
        Self {
            host,
            changes: provider.subscribe(),
            open_previews: provider.open_previews(),
            delay: DEFAULT_FORWARD_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Runs until the content provider is dropped.
    pub async fn run(mut self) {
        // If the timer isn't active, it will be set to expire "never",
        // which is actually just 1 year in the future.
        const NEVER: Duration = Duration::from_secs(365 * 24 * 60 * 60);

        let mut pending: Vec<PreviewUri> = Vec::new();
        let timer = tokio::time::sleep(NEVER);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                change = self.changes.recv() => {
                    let stale = match change {
                        Ok(uri) => vec![uri],
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(
                                skipped,
                                "Change forwarder lagged behind, refreshing all previews"
                            );
                            self.open_previews.snapshot()
                        }
                        Err(RecvError::Closed) => {
                            self.flush(&mut pending);
                            break;
                        }
                    };
                    if pending.is_empty() && !stale.is_empty() {
                        timer.as_mut().reset(Instant::now() + self.delay);
                    }
                    for uri in stale {
                        if !pending.contains(&uri) {
                            pending.push(uri);
                        }
                    }
                }
                _ = timer.as_mut(), if !pending.is_empty() => {
                    timer.as_mut().reset(Instant::now() + NEVER);
                    self.flush(&mut pending);
                }
            }
        }
    }

    fn flush(&self, pending: &mut Vec<PreviewUri>) {
        for uri in pending.drain(..) {
            if let Err(err) = self.host.notify_change(&uri) {
                tracing::error!(?err, %uri, "Failed to notify the preview change");
            }
        }
    }
}
