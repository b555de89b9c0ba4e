//! logmedic -- annotate application logs with remediation guidance.

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use logmedic_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::commands::ConfigSource;
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let source = ConfigSource::from_flag(cli.config);
    let loaded = source.load().await;

    // config commands report load errors themselves, so logging falls back to defaults
    let general = loaded
        .as_ref()
        .map(|c| c.general.clone())
        .unwrap_or_else(|_| GeneralConfig::default());
    logging::init_tracing(&general, cli.log_level.as_deref())
        .map_err(|e| CliError::Command(e.to_string()))?;

    tracing::debug!(config = %source.path().display(), "logmedic starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Config(args) => commands::config::execute(args, &source, &writer).await,
        Commands::Scan(args) => commands::scan::execute(args, &loaded?, &writer).await,
        Commands::Match(args) => commands::matching::execute(args, &loaded?, &writer).await,
        Commands::Signatures(args) => {
            commands::signatures::execute(args, &loaded?, &writer).await
        }
    }
}
