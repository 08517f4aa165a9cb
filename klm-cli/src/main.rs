//! KLM CLI - Kootenay Lake level and weather monitor.

use clap::Parser;
use env_logger::Env;
use klm_cmd::{Config, ConfigArgs};
use log::error;

#[derive(Parser)]
#[command(
    name = "klm",
    version,
    about = "Kootenay Lake level and weather monitor"
)]
struct Cli {
    #[command(subcommand)]
    command: klm_cmd::Command,

    #[command(flatten)]
    config: ConfigArgs,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let config = Config::try_from(cli.config)?;
    let result = klm_cmd::run(cli.command, config).await;
    if let Err(e) = &result {
        error!("✗ {e:#}");
    }
    result
}
