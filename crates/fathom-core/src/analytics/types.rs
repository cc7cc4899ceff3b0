//! Result types produced by the analytics engine

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Direction of a category's recent spending trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    /// Classify a trend slope by its sign
    pub fn from_slope(slope: f64) -> Self {
        if slope > 0.0 {
            TrendDirection::Increasing
        } else if slope < 0.0 {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Next-period spending prediction for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub category: String,
    /// Predicted spend, rounded to cents
    pub amount: f64,
    pub trend_direction: TrendDirection,
    /// Heuristic score in [0, 100]
    pub confidence: f64,
    pub seasonal_factor: f64,
}

/// Backtest-style error metrics for a category's prediction
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Accuracy {
    pub mape: f64,
    pub rmse: f64,
    pub confidence: f64,
}

/// Predictions for every category with expense history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub predictions: BTreeMap<String, Prediction>,
    pub accuracy: BTreeMap<String, Accuracy>,
}

impl Forecast {
    /// Sum of all category predictions
    pub fn total(&self) -> f64 {
        self.predictions.values().map(|p| p.amount).sum()
    }
}

/// A transaction whose amount is unusual for its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub transaction: Transaction,
    pub category: String,
    pub z_score: f64,
    /// Category mean
    pub expected_amount: f64,
    /// Signed distance from the mean
    pub deviation: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_from_slope() {
        assert_eq!(TrendDirection::from_slope(0.01), TrendDirection::Increasing);
        assert_eq!(TrendDirection::from_slope(-3.0), TrendDirection::Decreasing);
        assert_eq!(TrendDirection::from_slope(0.0), TrendDirection::Stable);
    }

    #[test]
    fn test_direction_serialization() {
        let json = serde_json::to_value(TrendDirection::Decreasing).unwrap();
        assert_eq!(json, "decreasing");
    }
}
