//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fathom - Forecast spending and plan savings from your transaction history
#[derive(Parser)]
#[command(name = "fathom")]
#[command(about = "Personal finance analytics and forecasting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Snapshot file (JSON document or CSV of transactions, by extension)
    #[arg(short, long, default_value = "snapshot.json", global = true)]
    pub snapshot: PathBuf,

    /// Analysis config override (defaults to ~/.local/share/fathom/config/analysis.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check every record in the snapshot and report the invalid ones
    Validate,

    #[command(flatten)]
    Analysis(AnalysisCommand),
}

/// Commands that run on a validated snapshot
#[derive(Subcommand)]
pub enum AnalysisCommand {
    /// Predict next month's spending per category
    Forecast {
        /// Only forecast this category
        #[arg(short, long)]
        category: Option<String>,

        /// Reference date (YYYY-MM-DD); defaults to the latest transaction
        #[arg(long)]
        as_of: Option<String>,
    },

    /// Flag transactions that are unusual for their category
    Anomalies,

    /// Budget status, savings recommendation and debt repayment plan
    Plan {
        /// Disposable income to allocate (defaults to income minus expenses)
        #[arg(long)]
        disposable: Option<f64>,
    },

    /// Monthly totals, changes and seasonality per category
    Trends {
        /// Only show this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Income, expenses and savings rate per month
    Cashflow,

    /// Summary statistics for expenses
    Stats,

    /// Debt summary, avalanche order and emergency fund progress
    Debts,
}
