//! Per-category outlier detection using z-scores

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{round_cents, Transaction};

use super::types::Anomaly;

/// Transactions more than this many standard deviations from their
/// category mean are flagged.
pub const Z_SCORE_THRESHOLD: f64 = 2.0;

/// Mean and population standard deviation
fn mean_and_std_dev(amounts: &[f64]) -> (f64, f64) {
    let n = amounts.len() as f64;
    let mean = amounts.iter().sum::<f64>() / n;
    let variance = amounts.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Flag transactions whose amount is unusual for their category.
///
/// Categories are visited in name order and transactions in input order, so
/// the same input always yields the same output. A category whose amounts
/// are all equal has no spread and produces no anomalies.
pub fn detect_anomalies(transactions: &[Transaction]) -> Vec<Anomaly> {
    let mut groups: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for tx in transactions {
        groups.entry(tx.category.as_str()).or_default().push(tx);
    }

    let mut anomalies = Vec::new();
    for (category, group) in groups {
        let amounts: Vec<f64> = group.iter().map(|t| t.amount).collect();
        let (mean, std_dev) = mean_and_std_dev(&amounts);

        if std_dev == 0.0 {
            continue;
        }

        for tx in group {
            let z_score = (tx.amount - mean) / std_dev;
            if z_score.abs() > Z_SCORE_THRESHOLD {
                debug!(category, id = %tx.id, z_score, "Anomalous transaction");
                anomalies.push(Anomaly {
                    transaction: tx.clone(),
                    category: category.to_string(),
                    z_score: round_cents(z_score),
                    expected_amount: round_cents(mean),
                    deviation: round_cents(tx.amount - mean),
                });
            }
        }
    }

    anomalies
}
