mod cli;

use anyhow::Result;
use clap::Parser;

use catalog_sheets::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = cli::Cli::parse();
    let config = Config::load()?;
    log::debug!("Using database {}", config.database.display());

    cli::run(cli, config).await
}
