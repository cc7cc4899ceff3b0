//! Debt summary and avalanche ordering

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{round_cents, Debt};
use crate::recommendation::{Recommendation, RecommendationKind, Severity};

/// Summary of a set of outstanding debts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtAnalysis {
    pub total_debt: f64,
    pub total_minimum_payment: f64,
    /// Highest interest rate across all debts (0 when there are none)
    pub highest_interest: f64,
    pub debt_count: usize,
    /// Debts ordered highest interest rate first
    pub avalanche_order: Vec<Debt>,
    pub recommendations: Vec<Recommendation>,
}

/// Debts ordered by interest rate, highest first; ties keep input order
pub fn avalanche_order(debts: &[Debt]) -> Vec<Debt> {
    let mut ordered = debts.to_vec();
    ordered.sort_by(|a, b| b.interest_rate.total_cmp(&a.interest_rate));
    ordered
}

/// Totals, avalanche ordering and repayment recommendations
pub fn analyze_debts(debts: &[Debt], config: &AnalysisConfig) -> DebtAnalysis {
    let total_debt: f64 = debts.iter().map(|d| d.amount).sum();
    let total_minimum_payment: f64 = debts.iter().map(|d| d.minimum_payment).sum();
    let highest_interest = debts
        .iter()
        .map(|d| d.interest_rate)
        .fold(0.0_f64, f64::max);

    let ordered = avalanche_order(debts);
    let mut recommendations = Vec::new();

    if let Some(first) = ordered.first() {
        recommendations.push(
            Recommendation::new(
                RecommendationKind::Priority,
                Severity::High,
                format!(
                    "Focus on paying off {} first with {}% interest rate",
                    first.name, first.interest_rate
                ),
            )
            .with_action("Direct any extra payments here while paying minimums on the rest"),
        );
    }

    if total_minimum_payment > 0.0 {
        recommendations.push(Recommendation::new(
            RecommendationKind::Minimum,
            Severity::High,
            format!(
                "Ensure you can make the total minimum payment of ${:.2} per month",
                total_minimum_payment
            ),
        ));
    }

    let high_interest = debts
        .iter()
        .filter(|d| d.interest_rate > config.high_interest_percent)
        .count();
    if high_interest > 0 {
        recommendations.push(
            Recommendation::new(
                RecommendationKind::Warning,
                Severity::Medium,
                "Consider consolidating your high-interest debts",
            )
            .with_detail(format!(
                "{} debt(s) above {}% interest",
                high_interest, config.high_interest_percent
            )),
        );
    }

    debug!(
        debts = debts.len(),
        total_debt,
        highest_interest,
        "Debt analysis complete"
    );

    DebtAnalysis {
        total_debt: round_cents(total_debt),
        total_minimum_payment: round_cents(total_minimum_payment),
        highest_interest,
        debt_count: debts.len(),
        avalanche_order: ordered,
        recommendations,
    }
}
