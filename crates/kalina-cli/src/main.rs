//! Kalina CLI - Command-line interface for operating a Kalina DAO ledger.

pub mod commands;
pub mod config;
pub mod output;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = commands::Cli::parse();

    let mut cfg = config::KalinaConfig::load()?;
    if let Some(dir) = &cli.data_dir {
        cfg.data_dir = dir.clone();
    }

    let filter = cli.log.as_deref().unwrap_or(&cfg.log_filter);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter)?)
        .with_target(false)
        .init();

    if let Err(e) = commands::execute(cli.command, &cfg) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }

    Ok(())
}
