mod commands;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use stocksync_core::SyncConfiguration;

use crate::commands::Cli;

fn main() -> Result<()> {
    stocksync_observability::init();

    let cli = Cli::parse();
    let config = SyncConfiguration::from_env()?;
    tracing::debug!(?config, "loaded sync configuration");

    let output = commands::run(cli.command, &config, Utc::now())?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
