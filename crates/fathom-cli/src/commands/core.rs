//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `load_config` - Resolve the analysis config (override or embedded)
//! - `load_snapshot` - Fetch and validate a snapshot file
//! - `resolve_reference` - Pick the forecast reference date
//! - `cmd_validate` - Report invalid records without failing

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use fathom_core::source::source_for_path;
use fathom_core::{AnalysisConfig, Snapshot, SnapshotSource};
use serde::Serialize;
use tracing::debug;

/// Load the analysis config from an explicit path or the default location
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load_from(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => AnalysisConfig::load().context("Failed to load analysis config"),
    }
}

/// Load a snapshot file, failing on the first invalid record
pub async fn load_snapshot(path: &Path, config: &AnalysisConfig) -> Result<Snapshot> {
    debug!(path = %path.display(), "Loading snapshot");
    source_for_path(path)
        .load(config)
        .await
        .with_context(|| format!("Failed to load snapshot {}", path.display()))
}

/// Forecast reference date: explicit, else the latest transaction, else today
pub fn resolve_reference(as_of: Option<&str>, snapshot: &Snapshot) -> Result<NaiveDate> {
    if let Some(date) = as_of {
        return NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .context("Invalid --as-of date format (use YYYY-MM-DD)");
    }
    Ok(snapshot
        .latest_date()
        .unwrap_or_else(|| Utc::now().date_naive()))
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("Failed to serialize output")?
    );
    Ok(())
}

#[derive(Serialize)]
struct ValidationReport {
    transactions: usize,
    budgets: usize,
    debts: usize,
    emergency_fund: bool,
    errors: Vec<String>,
}

pub async fn cmd_validate(path: &Path, config: &AnalysisConfig, json: bool) -> Result<()> {
    let raw = source_for_path(path)
        .fetch()
        .await
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;

    let (snapshot, errors) = raw.validate_lenient(config);
    let report = ValidationReport {
        transactions: snapshot.transactions.len(),
        budgets: snapshot.budgets.len(),
        debts: snapshot.debts.len(),
        emergency_fund: snapshot.emergency_fund.is_some(),
        errors: errors.iter().map(|e| e.to_string()).collect(),
    };

    if json {
        return print_json(&report);
    }

    println!();
    println!("🔎 Snapshot Validation");
    println!("   {}", path.display());
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Valid transactions: {} of {}",
        report.transactions,
        raw.transactions.len()
    );
    println!("   Valid budgets:      {} of {}", report.budgets, raw.budgets.len());
    println!("   Valid debts:        {} of {}", report.debts, raw.debts.len());

    if report.errors.is_empty() {
        println!();
        println!("✅ All records are valid");
    } else {
        println!();
        println!("⚠️  {} invalid record(s):", report.errors.len());
        for error in &report.errors {
            println!("   • {}", error);
        }
    }

    Ok(())
}
