use crate::command;
use anyhow::Result;
use clap::Parser;
use preview_config::{load_config, LoadedConfig};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
pub enum RunCmd {
    /// Start the stdio-based preview service.
    #[clap(name = "rpc")]
    Rpc(command::rpc::Rpc),
    /// Render a markdown file to stdout the way the preview shows it.
    #[clap(name = "render")]
    Render(command::render::Render),
    /// Write the stylesheets of the media directory.
    #[clap(name = "assets")]
    Assets(command::assets::Assets),
}

/// Preview CLI arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Enable the logging system.
    #[clap(long)]
    pub log: Option<PathBuf>,

    /// Specify the path of the config file.
    #[clap(long)]
    pub config_file: Option<PathBuf>,
}

impl RunCmd {
    pub async fn run(self, args: Args) -> Result<()> {
        let LoadedConfig {
            config,
            file_path,
            maybe_error,
        } = load_config(args.config_file.clone())?;

        let _guard = crate::logging::init(args.log.clone(), &config.log)?;

        tracing::debug!(config_file = ?file_path, "Loaded config");
        if let Some(err) = maybe_error {
            tracing::warn!(?err, "Failed to load the config file, using the default config");
        }

        match self {
            Self::Rpc(rpc) => rpc.run(config).await,
            Self::Render(render) => render.run(config).await,
            Self::Assets(assets) => assets.run(config),
        }
    }
}

/// Media directory given on the command line, in the config file, or next to the executable.
pub(crate) fn resolve_media_dir(
    specified: Option<PathBuf>,
    configured: Option<&Path>,
) -> PathBuf {
    specified
        .or_else(|| configured.map(Path::to_path_buf))
        .or_else(default_media_dir)
        .unwrap_or_else(|| PathBuf::from("media"))
}

/// `<exe dir>/../media`.
fn default_media_dir() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.parent()?.join("media"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[clap(flatten)]
        args: Args,
        #[clap(subcommand)]
        cmd: RunCmd,
    }

    #[test]
    fn test_parse_render() {
        let cli = TestCli::parse_from([
            "mdpreview",
            "--log",
            "/tmp/mdpreview.log",
            "render",
            "README.md",
            "--style",
            "a.css",
            "--style",
            "https://example.com/b.css",
        ]);
        assert_eq!(cli.args.log, Some(PathBuf::from("/tmp/mdpreview.log")));
        match cli.cmd {
            RunCmd::Render(render) => {
                assert_eq!(render.file, PathBuf::from("README.md"));
                assert_eq!(render.style, vec!["a.css", "https://example.com/b.css"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rpc() {
        let cli = TestCli::parse_from(["mdpreview", "rpc", "--media-dir", "/opt/media"]);
        match cli.cmd {
            RunCmd::Rpc(rpc) => assert_eq!(rpc.media_dir, Some(PathBuf::from("/opt/media"))),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_media_dir() {
        assert_eq!(
            resolve_media_dir(Some("/cli".into()), Some(Path::new("/config"))),
            PathBuf::from("/cli")
        );
        assert_eq!(
            resolve_media_dir(None, Some(Path::new("/config"))),
            PathBuf::from("/config")
        );
        assert!(resolve_media_dir(None, None).ends_with("media"));
    }
}
