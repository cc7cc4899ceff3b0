//! Monthly time-series aggregation
//!
//! Buckets transactions by category and then by year-month. Everything
//! downstream (trend, seasonality, forecast) reads from this shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Total for one category in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    /// "YYYY-MM"
    pub period_key: String,
    pub total: f64,
    pub count: usize,
}

/// Category -> periods, most recent first
pub type MonthlySeries = BTreeMap<String, Vec<PeriodTotal>>;

/// Group transactions into per-category monthly totals.
///
/// Each category's periods are ordered most recent first. Empty input gives
/// an empty series.
pub fn aggregate(transactions: &[Transaction]) -> MonthlySeries {
    let mut buckets: BTreeMap<&str, BTreeMap<String, (f64, usize)>> = BTreeMap::new();

    for tx in transactions {
        let entry = buckets
            .entry(tx.category.as_str())
            .or_default()
            .entry(tx.period_key())
            .or_insert((0.0, 0));
        entry.0 += tx.amount;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(category, months)| {
            // BTreeMap iterates oldest first; period keys sort chronologically
            let periods = months
                .into_iter()
                .rev()
                .map(|(period_key, (total, count))| PeriodTotal {
                    period_key,
                    total,
                    count,
                })
                .collect();
            (category.to_string(), periods)
        })
        .collect()
}

/// Up to `n` most recent totals, most recent first
pub fn recent_totals(periods: &[PeriodTotal], n: usize) -> Vec<f64> {
    periods.iter().take(n).map(|p| p.total).collect()
}

/// Zero-based month of year (0 = January) for a "YYYY-MM" key
pub fn month_of_year(period_key: &str) -> Option<u32> {
    let (_, month) = period_key.split_once('-')?;
    let month: u32 = month.parse().ok()?;
    (1..=12).contains(&month).then(|| month - 1)
}
