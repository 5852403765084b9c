use clap::Parser;
use cli::{Args, RunCmd};

const BUILD_TIME: &str = include!(concat!(env!("OUT_DIR"), "/compiled_at.txt"));

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Parser, Debug)]
pub enum Cmd {
    /// Display the current version.
    #[clap(name = "version")]
    Version,

    /// Run the preview service or one of the tools.
    #[clap(flatten)]
    Run(Box<RunCmd>),
}

#[derive(Parser, Debug)]
#[clap(name = "mdpreview", disable_version_flag = true)]
pub struct MdPreview {
    #[clap(flatten)]
    pub args: Args,

    #[clap(subcommand)]
    pub cmd: Cmd,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mdpreview = MdPreview::parse();

    match mdpreview.cmd {
        Cmd::Version => {
            println!(
                "version {}, compiled at: {}, built for {} by {}.",
                built_info::PKG_VERSION,
                BUILD_TIME,
                built_info::TARGET,
                built_info::RUSTC_VERSION
            );
        }
        Cmd::Run(run_cmd) => {
            if let Err(e) = run_cmd.run(mdpreview.args).await {
                eprintln!("error: {e:?}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
