use crate::app::resolve_media_dir;
use anyhow::Result;
use clap::Parser;
use preview_config::Config;
use std::path::PathBuf;

/// Starts a RPC service using stdio.
#[derive(Parser, Debug, Clone)]
pub struct Rpc {
    /// Directory containing `markdown.css` and `highlight.css`.
    #[clap(long)]
    pub media_dir: Option<PathBuf>,
}

impl Rpc {
    pub async fn run(self, config: Config) -> Result<()> {
        let media_dir = resolve_media_dir(self.media_dir, config.preview.media_dir.as_deref());

        if !media_dir.is_dir() {
            tracing::warn!(
                media_dir = %media_dir.display(),
                "Media directory does not exist, run `mdpreview assets` to create it"
            );
        }

        preview_server::start(media_dir, config.markdown).await;

        Ok(())
    }
}
