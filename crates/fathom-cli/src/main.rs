//! Fathom CLI - Personal finance analytics and forecasting
//!
//! Usage:
//!   fathom --snapshot data.json forecast     Predict next month per category
//!   fathom --snapshot data.csv anomalies     Flag unusual transactions
//!   fathom --snapshot data.json plan         Savings and debt allocation
//!   fathom --snapshot data.json validate     Report invalid records

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    let command = match cli.command {
        Commands::Validate => {
            return commands::cmd_validate(&cli.snapshot, &config, cli.json).await;
        }
        Commands::Analysis(command) => command,
    };

    let snapshot = commands::load_snapshot(&cli.snapshot, &config).await?;

    match command {
        AnalysisCommand::Forecast { category, as_of } => {
            let reference = commands::resolve_reference(as_of.as_deref(), &snapshot)?;
            commands::cmd_forecast(&snapshot, &config, reference, category.as_deref(), cli.json)
        }
        AnalysisCommand::Anomalies => commands::cmd_anomalies(&snapshot, cli.json),
        AnalysisCommand::Plan { disposable } => {
            commands::cmd_plan(&snapshot, &config, disposable, cli.json)
        }
        AnalysisCommand::Trends { category } => {
            commands::cmd_trends(&snapshot, &config, category.as_deref(), cli.json)
        }
        AnalysisCommand::Cashflow => commands::cmd_cashflow(&snapshot, cli.json),
        AnalysisCommand::Stats => commands::cmd_stats(&snapshot, &config, cli.json),
        AnalysisCommand::Debts => commands::cmd_debts(&snapshot, &config, cli.json),
    }
}
