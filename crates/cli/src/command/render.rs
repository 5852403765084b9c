use crate::app::resolve_media_dir;
use anyhow::Result;
use clap::Parser;
use markdown_preview_core::{PreviewContentProvider, PreviewUri};
use preview_config::{Config, MarkdownConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Renders a markdown file to stdout.
#[derive(Parser, Debug, Clone)]
pub struct Render {
    /// Markdown file to render.
    pub file: PathBuf,

    /// Extra stylesheet, a URL or a path relative to the file.
    ///
    /// Can be repeated, overrides the `styles` of the config file.
    #[clap(long)]
    pub style: Vec<String>,

    /// Directory containing `markdown.css` and `highlight.css`.
    #[clap(long)]
    pub media_dir: Option<PathBuf>,
}

impl Render {
    pub async fn run(self, config: Config) -> Result<()> {
        let html = self.render_html(config).await?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(html.as_bytes())?;
        stdout.flush()?;

        Ok(())
    }

    async fn render_html(self, config: Config) -> Result<String> {
        let media_dir = resolve_media_dir(self.media_dir, config.preview.media_dir.as_deref());

        let markdown_config = if self.style.is_empty() {
            config.markdown
        } else {
            MarkdownConfig { styles: self.style }
        };

        let provider = PreviewContentProvider::new(media_dir, Arc::new(markdown_config));
        let uri = PreviewUri::from_path(absolute_path(&self.file)?);

        Ok(provider.render(&uri).await?)
    }
}

fn absolute_path(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
