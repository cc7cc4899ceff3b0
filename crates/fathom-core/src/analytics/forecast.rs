//! Per-category spending forecast
//!
//! Blends three signals over the most recent months of expense history:
//! - a weighted moving average (recent months weigh more)
//! - the least-squares trend, as a ratio of that average
//! - a seasonal factor for the upcoming calendar month
//!
//! Confidence comes from a MAPE-style comparison of each month against the
//! month before it.

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::models::{round_cents, Transaction};

use super::series::{aggregate, recent_totals, PeriodTotal};
use super::trend::{seasonal_factor_for, seasonality, trend};
use super::types::{Accuracy, Forecast, Prediction, TrendDirection};

/// Weighted sum of `values` using the leading weights.
///
/// Weights are not rescaled when there are fewer values than weights, so
/// sparse histories are deliberately under-weighted.
pub fn weighted_average(values: &[f64], weights: &[f64]) -> f64 {
    values
        .iter()
        .zip(weights.iter())
        .map(|(value, weight)| value * weight)
        .sum()
}

/// Predict next month's spending for one category.
///
/// Only expense transactions in `category` are considered. Returns `None`
/// when there are none.
pub fn predict(
    category: &str,
    transactions: &[Transaction],
    reference: NaiveDate,
    config: &AnalysisConfig,
) -> Option<(Prediction, Accuracy)> {
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense() && t.category == category)
        .cloned()
        .collect();

    let series = aggregate(&expenses);
    let periods = series.get(category)?;
    Some(predict_from_periods(category, periods, reference, config))
}

/// Predict next month's spending for every category with expense history
pub fn predict_all(
    transactions: &[Transaction],
    reference: NaiveDate,
    config: &AnalysisConfig,
) -> Forecast {
    let expenses: Vec<Transaction> = transactions
        .iter()
        .filter(|t| t.is_expense())
        .cloned()
        .collect();

    let mut forecast = Forecast::default();
    for (category, periods) in aggregate(&expenses) {
        let (prediction, accuracy) = predict_from_periods(&category, &periods, reference, config);
        forecast.accuracy.insert(category.clone(), accuracy);
        forecast.predictions.insert(category, prediction);
    }

    debug!(categories = forecast.predictions.len(), "Forecast complete");
    forecast
}

fn predict_from_periods(
    category: &str,
    periods: &[PeriodTotal],
    reference: NaiveDate,
    config: &AnalysisConfig,
) -> (Prediction, Accuracy) {
    let recent = recent_totals(periods, config.forecast_window);

    let average = weighted_average(&recent, &config.forecast_weights);
    let slope = trend(&recent);
    let trend_ratio = if average == 0.0 { 0.0 } else { slope / average };

    // month() is 1-based, so it is already the zero-based index of next month
    let upcoming_month = reference.month() % 12;
    let seasonal_factor = seasonal_factor_for(&seasonality(periods), upcoming_month);

    let raw_prediction = average * (1.0 + trend_ratio) * seasonal_factor;
    let accuracy = accuracy_metrics(&recent, raw_prediction);

    debug!(
        category,
        months = recent.len(),
        average,
        slope,
        seasonal_factor,
        "Category prediction"
    );

    let prediction = Prediction {
        category: category.to_string(),
        // A steep downward trend can overshoot zero; spend cannot
        amount: round_cents(raw_prediction.max(0.0)),
        trend_direction: TrendDirection::from_slope(slope),
        confidence: accuracy.confidence,
        seasonal_factor,
    };

    (prediction, accuracy)
}

/// MAPE, RMSE and confidence for a most-recent-first window.
///
/// Each month is compared with the month before it; the oldest month (or
/// one whose predecessor is zero) is compared with the prediction instead.
/// Months with a zero total add nothing to MAPE but still count in the mean.
pub fn accuracy_metrics(recent: &[f64], prediction: f64) -> Accuracy {
    if recent.is_empty() {
        return Accuracy::default();
    }

    let n = recent.len() as f64;
    let previous = |i: usize| match recent.get(i + 1) {
        Some(&p) if p != 0.0 => p,
        _ => prediction,
    };

    let mape = recent
        .iter()
        .enumerate()
        .filter(|(_, actual)| **actual != 0.0)
        .map(|(i, &actual)| ((actual - previous(i)) / actual).abs())
        .sum::<f64>()
        / n;

    let rmse = (recent
        .iter()
        .enumerate()
        .map(|(i, &actual)| (actual - previous(i)).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    let confidence = (100.0 * (1.0 - mape)).clamp(0.0, 100.0).round();

    Accuracy {
        mape: round_cents(mape),
        rmse: round_cents(rmse),
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionKind;

    fn expense(category: &str, amount: f64, y: i32, m: u32) -> Transaction {
        Transaction {
            id: format!("{}-{}-{}-{}", category, y, m, amount),
            kind: TransactionKind::Expense,
            amount,
            category: category.to_string(),
            occurred_at: NaiveDate::from_ymd_opt(y, m, 15).unwrap(),
            description: None,
        }
    }

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
    }

    #[test]
    fn test_weighted_average_uses_leading_weights() {
        let weights = AnalysisConfig::default().forecast_weights;
        let avg = weighted_average(&[200.0, 50.0, 100.0], &weights);
        assert!((avg - 92.5).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_ignores_values_beyond_weights() {
        assert_eq!(weighted_average(&[10.0, 10.0, 10.0], &[0.5]), 5.0);
    }

    #[test]
    fn test_food_scenario_decreasing() {
        let txs = vec![
            expense("Food", 100.0, 2024, 1),
            expense("Food", 50.0, 2024, 2),
            expense("Food", 200.0, 2024, 3),
        ];
        let (prediction, accuracy) =
            predict("Food", &txs, reference(), &AnalysisConfig::default()).unwrap();

        assert_eq!(prediction.trend_direction, TrendDirection::Decreasing);
        // No July history -> neutral seasonal factor
        assert_eq!(prediction.seasonal_factor, 1.0);
        // 92.5 * (1 + (-50 / 92.5)) = 42.5
        assert!((prediction.amount - 42.5).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&accuracy.confidence));
        assert_eq!(prediction.confidence, accuracy.confidence);
    }

    #[test]
    fn test_income_and_other_categories_ignored() {
        let mut txs = vec![expense("Food", 80.0, 2024, 5)];
        txs.push(Transaction {
            kind: TransactionKind::Income,
            ..expense("Food", 5000.0, 2024, 5)
        });
        txs.push(expense("Rent", 1200.0, 2024, 5));

        let (prediction, _) =
            predict("Food", &txs, reference(), &AnalysisConfig::default()).unwrap();
        // Single month: 80 * 0.30
        assert!((prediction.amount - 24.0).abs() < 1e-9);
        assert_eq!(prediction.trend_direction, TrendDirection::Stable);
    }

    #[test]
    fn test_no_expenses_is_none() {
        let income = Transaction {
            kind: TransactionKind::Income,
            ..expense("Salary", 3000.0, 2024, 5)
        };
        assert!(predict("Salary", &[income], reference(), &AnalysisConfig::default()).is_none());
        assert!(predict("Food", &[], reference(), &AnalysisConfig::default()).is_none());
    }

    #[test]
    fn test_seasonal_factor_for_upcoming_month() {
        // July is historically double the other months
        let txs = vec![
            expense("Travel", 400.0, 2023, 7),
            expense("Travel", 200.0, 2023, 8),
            expense("Travel", 200.0, 2024, 4),
            expense("Travel", 200.0, 2024, 5),
        ];
        let (prediction, _) =
            predict("Travel", &txs, reference(), &AnalysisConfig::default()).unwrap();
        // overall average 250, July average 400
        assert!((prediction.seasonal_factor - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_predict_all_is_deterministic() {
        let txs = vec![
            expense("Food", 120.0, 2024, 1),
            expense("Food", 95.0, 2024, 2),
            expense("Fun", 60.0, 2024, 2),
            expense("Food", 130.0, 2024, 3),
            expense("Fun", 10.0, 2024, 4),
        ];
        let config = AnalysisConfig::default();
        let first = predict_all(&txs, reference(), &config);
        let second = predict_all(&txs, reference(), &config);
        assert_eq!(first, second);
        assert_eq!(first.predictions.len(), 2);
        assert_eq!(first.accuracy.len(), 2);
    }

    #[test]
    fn test_accuracy_empty_window() {
        assert_eq!(accuracy_metrics(&[], 10.0), Accuracy::default());
    }

    #[test]
    fn test_accuracy_steady_history_is_confident() {
        let accuracy = accuracy_metrics(&[100.0, 100.0, 100.0], 100.0);
        assert_eq!(accuracy.mape, 0.0);
        assert_eq!(accuracy.rmse, 0.0);
        assert_eq!(accuracy.confidence, 100.0);
    }

    #[test]
    fn test_accuracy_volatile_history_clamps_to_zero() {
        let accuracy = accuracy_metrics(&[10.0, 500.0, 5.0], 1000.0);
        assert_eq!(accuracy.confidence, 0.0);
        assert!(accuracy.mape > 1.0);
    }

    #[test]
    fn test_accuracy_zero_months_do_not_divide() {
        let accuracy = accuracy_metrics(&[0.0, 0.0], 0.0);
        assert_eq!(accuracy.mape, 0.0);
        assert_eq!(accuracy.confidence, 100.0);
    }
}
