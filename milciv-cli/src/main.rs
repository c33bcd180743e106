use clap::Parser;
use tracing::debug;

use milciv_cli::cli::Cli;
use milciv_cli::config::Config;
use milciv_cli::{commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?.with_overrides(
        cli.data_dir.clone(),
        cli.log_level.clone(),
        cli.log_file.clone(),
    );

    logging::init_logging(config.log_level(), config.log_file.as_deref())?;
    debug!(?config.data_dir, "configuration loaded");

    let tables = commands::load_tables(config.data_dir.as_deref())?;

    commands::run(&cli.command, &config, &tables).await
}
