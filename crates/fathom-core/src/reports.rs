//! Descriptive reports over a transaction snapshot
//!
//! Cash flow per month, summary statistics, month-over-month changes, and
//! quarter-over-quarter spending shifts per category.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::PeriodTotal;
use crate::config::AnalysisConfig;
use crate::models::{period_key, round_cents, Transaction};
use crate::recommendation::{Recommendation, RecommendationKind, Severity};

/// Months compared on each side of a spending change
const CHANGE_WINDOW_MONTHS: usize = 3;

/// Income and expenses for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPeriod {
    pub period_key: String,
    pub income: f64,
    pub expenses: f64,
    pub net_flow: f64,
    /// Net flow as a percent of income; 0 for a month with no income
    pub savings_rate: f64,
}

/// Per-month cash flow, oldest month first
pub fn cash_flow(transactions: &[Transaction]) -> Vec<CashFlowPeriod> {
    let mut months: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for tx in transactions {
        let entry = months.entry(tx.period_key()).or_insert((0.0, 0.0));
        if tx.is_income() {
            entry.0 += tx.amount;
        } else {
            entry.1 += tx.amount;
        }
    }

    months
        .into_iter()
        .map(|(period_key, (income, expenses))| {
            let net_flow = income - expenses;
            let savings_rate = if income > 0.0 {
                net_flow / income * 100.0
            } else {
                0.0
            };
            CashFlowPeriod {
                period_key,
                income: round_cents(income),
                expenses: round_cents(expenses),
                net_flow: round_cents(net_flow),
                savings_rate: round_cents(savings_rate),
            }
        })
        .collect()
}

/// Total for one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayTotal {
    pub day: String,
    pub total: f64,
}

/// Summary statistics over a set of transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionStatistics {
    pub count: usize,
    pub total: f64,
    pub average: f64,
    pub max: f64,
    pub min: f64,
    pub category_counts: BTreeMap<String, usize>,
    /// "YYYY-MM" -> total
    pub monthly_totals: BTreeMap<String, f64>,
    /// Monday first
    pub day_of_week_totals: Vec<DayTotal>,
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Count, totals and extremes. Callers choose which transactions to pass
/// (typically expenses only).
pub fn statistics(transactions: &[Transaction]) -> TransactionStatistics {
    let count = transactions.len();
    let total: f64 = transactions.iter().map(|t| t.amount).sum();
    let average = if count > 0 { total / count as f64 } else { 0.0 };

    let (max, min) = if transactions.is_empty() {
        (0.0, 0.0)
    } else {
        transactions.iter().fold((f64::MIN, f64::MAX), |(max, min), t| {
            (max.max(t.amount), min.min(t.amount))
        })
    };

    let mut category_counts = BTreeMap::new();
    let mut monthly_totals: BTreeMap<String, f64> = BTreeMap::new();
    let mut by_weekday = [0.0_f64; 7];
    for tx in transactions {
        *category_counts.entry(tx.category.clone()).or_insert(0) += 1;
        *monthly_totals.entry(tx.period_key()).or_insert(0.0) += tx.amount;
        by_weekday[tx.occurred_at.weekday().num_days_from_monday() as usize] += tx.amount;
    }

    TransactionStatistics {
        count,
        total: round_cents(total),
        average: round_cents(average),
        max: round_cents(max),
        min: round_cents(min),
        category_counts,
        monthly_totals: monthly_totals
            .into_iter()
            .map(|(k, v)| (k, round_cents(v)))
            .collect(),
        day_of_week_totals: WEEKDAYS
            .iter()
            .zip(by_weekday)
            .map(|(day, total)| DayTotal {
                day: weekday_name(*day).to_string(),
                total: round_cents(total),
            })
            .collect(),
    }
}

/// Month-over-month change for one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyChange {
    pub period_key: String,
    pub total: f64,
    /// Percent change from the previous month with data; `None` for the
    /// first month or when the previous total was zero
    pub change_percent: Option<f64>,
}

/// Month-over-month changes for a most-recent-first series, oldest first
pub fn monthly_changes(periods: &[PeriodTotal]) -> Vec<MonthlyChange> {
    let mut previous: Option<f64> = None;
    periods
        .iter()
        .rev()
        .map(|p| {
            let change_percent = previous
                .filter(|prev| *prev != 0.0)
                .map(|prev| round_cents((p.total - prev) / prev * 100.0));
            previous = Some(p.total);
            MonthlyChange {
                period_key: p.period_key.clone(),
                total: round_cents(p.total),
                change_percent,
            }
        })
        .collect()
}

/// Compare each category's spending over the most recent three months with
/// the three months before that.
///
/// Months are those in which any expense occurred. Returns nothing until
/// there is at least one month of prior history.
pub fn spending_change_recommendations(
    transactions: &[Transaction],
    config: &AnalysisConfig,
) -> Vec<Recommendation> {
    let expenses: Vec<&Transaction> = transactions.iter().filter(|t| t.is_expense()).collect();

    let months: BTreeSet<String> = expenses.iter().map(|t| period_key(t.occurred_at)).collect();
    let months: Vec<&String> = months.iter().rev().collect();
    if months.len() <= CHANGE_WINDOW_MONTHS {
        return Vec::new();
    }
    let recent: BTreeSet<&String> = months[..CHANGE_WINDOW_MONTHS].iter().copied().collect();
    let prior: BTreeSet<&String> = months[CHANGE_WINDOW_MONTHS..]
        .iter()
        .take(CHANGE_WINDOW_MONTHS)
        .copied()
        .collect();

    let mut totals: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
    for tx in &expenses {
        let key = tx.period_key();
        let entry = totals.entry(tx.category.as_str()).or_insert((0.0, 0.0));
        if recent.contains(&key) {
            entry.0 += tx.amount;
        } else if prior.contains(&key) {
            entry.1 += tx.amount;
        }
    }

    let mut recommendations = Vec::new();
    for (category, (recent_total, prior_total)) in totals {
        if prior_total == 0.0 {
            if recent_total > 0.0 {
                recommendations.push(
                    Recommendation::new(
                        RecommendationKind::NewSpending,
                        Severity::Info,
                        format!(
                            "New spending in {}: ${:.2} over the last {} months",
                            category, recent_total, CHANGE_WINDOW_MONTHS
                        ),
                    )
                    .with_category(category),
                );
            }
            continue;
        }

        let change = (recent_total - prior_total) / prior_total * 100.0;
        debug!(category, recent_total, prior_total, change, "Spending change");
        if change > config.spending_increase_percent {
            recommendations.push(
                Recommendation::new(
                    RecommendationKind::Warning,
                    Severity::Medium,
                    format!(
                        "Spending in {} is up {:.1}% compared to the previous {} months",
                        category, change, CHANGE_WINDOW_MONTHS
                    ),
                )
                .with_category(category)
                .with_action("Review recent purchases in this category"),
            );
        }
    }

    recommendations
}
