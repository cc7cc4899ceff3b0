//! Report command implementations

use std::collections::BTreeMap;

use anyhow::Result;
use fathom_core::analytics::series::recent_totals;
use fathom_core::analytics::{aggregate, seasonality, trend, TrendDirection};
use fathom_core::reports::{
    cash_flow, monthly_changes, spending_change_recommendations, statistics,
};
use fathom_core::{
    normalize_category, AnalysisConfig, MonthlyChange, Recommendation, Snapshot,
    TransactionStatistics,
};
use serde::Serialize;

use super::{print_json, print_recommendations, truncate};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Serialize)]
struct CategoryTrend {
    category: String,
    slope: f64,
    direction: TrendDirection,
    months: Vec<MonthlyChange>,
    /// Month name -> seasonal factor
    seasonality: BTreeMap<String, f64>,
}

pub fn cmd_trends(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let series = aggregate(&snapshot.expenses());
    let wanted = category.map(|c| normalize_category(c, &config.category_aliases));

    if let Some(ref wanted) = wanted {
        if !series.contains_key(wanted) {
            anyhow::bail!("No expense history for category: {}", wanted);
        }
    }

    let trends: Vec<CategoryTrend> = series
        .iter()
        .filter(|(name, _)| wanted.as_ref().map_or(true, |w| w == *name))
        .map(|(name, periods)| {
            let slope = trend(&recent_totals(periods, config.forecast_window));
            CategoryTrend {
                category: name.clone(),
                slope,
                direction: TrendDirection::from_slope(slope),
                months: monthly_changes(periods),
                seasonality: seasonality(periods)
                    .into_iter()
                    .map(|(month, factor)| (MONTH_NAMES[month as usize].to_string(), factor))
                    .collect(),
            }
        })
        .collect();

    if json {
        return print_json(&trends);
    }

    println!();
    println!("📈 Spending Trends");
    println!("   ─────────────────────────────────────────────────────────────");

    if trends.is_empty() {
        println!("   No expense history found.");
        return Ok(());
    }

    for item in &trends {
        println!();
        println!(
            "   {} ({}, slope {:+.2})",
            item.category, item.direction, item.slope
        );
        println!("   {:8} │ {:>10} │ {:>8}", "Month", "Total", "Change");
        println!("   ─────────┼────────────┼─────────");
        for month in &item.months {
            let change = month
                .change_percent
                .map(|c| format!("{:+.1}%", c))
                .unwrap_or_else(|| "-".to_string());
            println!("   {:8} │ {:>10.2} │ {:>8}", month.period_key, month.total, change);
        }
        let factors: Vec<String> = item
            .seasonality
            .iter()
            .map(|(month, factor)| format!("{} {:.2}", month, factor))
            .collect();
        println!("   \x1b[2mSeasonality: {}\x1b[0m", factors.join(", "));
    }

    Ok(())
}

pub fn cmd_cashflow(snapshot: &Snapshot, json: bool) -> Result<()> {
    let flow = cash_flow(&snapshot.transactions);

    if json {
        return print_json(&flow);
    }

    println!();
    println!("💵 Cash Flow");
    println!("   ─────────────────────────────────────────────────────────────");

    if flow.is_empty() {
        println!("   No transactions found.");
        return Ok(());
    }

    println!(
        "   {:8} │ {:>10} │ {:>10} │ {:>10} │ {:>7}",
        "Month", "Income", "Expenses", "Net", "Saved"
    );
    println!("   ─────────┼────────────┼────────────┼────────────┼────────");
    for period in &flow {
        println!(
            "   {:8} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>6.1}%",
            period.period_key, period.income, period.expenses, period.net_flow, period.savings_rate
        );
    }

    Ok(())
}

#[derive(Serialize)]
struct StatsReport {
    statistics: TransactionStatistics,
    recommendations: Vec<Recommendation>,
}

pub fn cmd_stats(snapshot: &Snapshot, config: &AnalysisConfig, json: bool) -> Result<()> {
    let report = StatsReport {
        statistics: statistics(&snapshot.expenses()),
        recommendations: spending_change_recommendations(&snapshot.transactions, config),
    };

    if json {
        return print_json(&report);
    }

    let stats = &report.statistics;
    println!();
    println!("📊 Expense Statistics");
    println!("   ─────────────────────────────────────────────────────────────");

    if stats.count == 0 {
        println!("   No expenses found.");
        return Ok(());
    }

    println!("   Transactions: {}", stats.count);
    println!("   Total:        ${:.2}", stats.total);
    println!("   Average:      ${:.2}", stats.average);
    println!("   Largest:      ${:.2}", stats.max);
    println!("   Smallest:     ${:.2}", stats.min);

    println!();
    println!("   {:22} │ {:>5}", "Category", "Count");
    println!("   ───────────────────────┼──────");
    for (category, count) in &stats.category_counts {
        println!("   {:22} │ {:>5}", truncate(category, 22), count);
    }

    println!();
    println!("   {:10} │ {:>10}", "Weekday", "Total");
    println!("   ───────────┼───────────");
    for day in &stats.day_of_week_totals {
        println!("   {:10} │ {:>10.2}", day.day, day.total);
    }

    print_recommendations(&report.recommendations);

    Ok(())
}
