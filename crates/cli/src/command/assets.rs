use anyhow::Result;
use clap::Parser;
use preview_config::Config;
use std::path::PathBuf;

/// Writes `markdown.css` and `highlight.css` into a directory.
#[derive(Parser, Debug, Clone)]
pub struct Assets {
    /// Target directory, created if missing.
    pub dir: PathBuf,

    /// Syntect theme of the highlight stylesheet, overrides `highlight-theme` of the config.
    #[clap(long)]
    pub theme: Option<String>,
}

impl Assets {
    pub fn run(self, config: Config) -> Result<()> {
        let theme = self.theme.unwrap_or(config.preview.highlight_theme);

        let written = markdown_preview_core::Assets::write_to(&self.dir, &theme)?;
        for path in written {
            println!("{}", path.display());
        }

        Ok(())
    }
}
