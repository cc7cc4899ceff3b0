//! Forecast and anomaly command implementations

use anyhow::Result;
use chrono::NaiveDate;
use fathom_core::analytics::{predict, predict_all, Accuracy, Prediction, TrendDirection};
use fathom_core::{detect_anomalies, normalize_category, AnalysisConfig, Snapshot};
use serde::Serialize;

use super::{print_json, truncate};

fn trend_arrow(direction: TrendDirection) -> &'static str {
    match direction {
        TrendDirection::Increasing => "↑",
        TrendDirection::Decreasing => "↓",
        TrendDirection::Stable => "→",
    }
}

#[derive(Serialize)]
struct CategoryForecast<'a> {
    prediction: &'a Prediction,
    accuracy: &'a Accuracy,
}

pub fn cmd_forecast(
    snapshot: &Snapshot,
    config: &AnalysisConfig,
    reference: NaiveDate,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    if let Some(category) = category {
        let category = normalize_category(category, &config.category_aliases);
        let Some((prediction, accuracy)) =
            predict(&category, &snapshot.transactions, reference, config)
        else {
            anyhow::bail!("No expense history for category: {}", category);
        };

        if json {
            return print_json(&CategoryForecast {
                prediction: &prediction,
                accuracy: &accuracy,
            });
        }

        println!();
        println!("🔮 Forecast: {}", prediction.category);
        println!("   As of {}", reference);
        println!("   ─────────────────────────────────────────────────────────────");
        println!("   Predicted next month: ${:.2}", prediction.amount);
        println!(
            "   Trend:                {} {}",
            trend_arrow(prediction.trend_direction),
            prediction.trend_direction
        );
        println!("   Seasonal factor:      {:.2}", prediction.seasonal_factor);
        println!("   Confidence:           {:.0}%", prediction.confidence);
        println!("   MAPE / RMSE:          {:.2} / {:.2}", accuracy.mape, accuracy.rmse);
        return Ok(());
    }

    let forecast = predict_all(&snapshot.transactions, reference, config);

    if json {
        return print_json(&forecast);
    }

    println!();
    println!("🔮 Spending Forecast");
    println!("   As of {}", reference);
    println!("   ─────────────────────────────────────────────────────────────");

    if forecast.predictions.is_empty() {
        println!("   No expense history to forecast from.");
        return Ok(());
    }

    println!(
        "   {:22} │ {:>10} │ {:^5} │ {:>6} │ {:>5}",
        "Category", "Predicted", "Trend", "Season", "Conf"
    );
    println!("   ───────────────────────┼────────────┼───────┼────────┼──────");

    for prediction in forecast.predictions.values() {
        println!(
            "   {:22} │ {:>10.2} │ {:^5} │ {:>6.2} │ {:>4.0}%",
            truncate(&prediction.category, 22),
            prediction.amount,
            trend_arrow(prediction.trend_direction),
            prediction.seasonal_factor,
            prediction.confidence
        );
    }

    println!("   ───────────────────────┼────────────┼───────┼────────┼──────");
    println!("   {:22} │ {:>10.2} │", "Total", forecast.total());

    Ok(())
}

pub fn cmd_anomalies(snapshot: &Snapshot, json: bool) -> Result<()> {
    let anomalies = detect_anomalies(&snapshot.transactions);

    if json {
        return print_json(&anomalies);
    }

    println!();
    println!("🚨 Unusual Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    if anomalies.is_empty() {
        println!("   ✅ Nothing unusual found.");
        return Ok(());
    }

    println!(
        "   {:10} │ {:16} │ {:>10} │ {:>10} │ {:>6}",
        "Date", "Category", "Amount", "Typical", "Z"
    );
    println!("   ───────────┼──────────────────┼────────────┼────────────┼───────");

    for anomaly in &anomalies {
        println!(
            "   {:10} │ {:16} │ {:>10.2} │ {:>10.2} │ {:>6.2}",
            anomaly.transaction.occurred_at,
            truncate(&anomaly.category, 16),
            anomaly.transaction.amount,
            anomaly.expected_amount,
            anomaly.z_score
        );
        if let Some(description) = &anomaly.transaction.description {
            println!("   \x1b[2m{:10}   {}\x1b[0m", "", truncate(description, 50));
        }
    }

    println!();
    println!("   {} unusual transaction(s)", anomalies.len());

    Ok(())
}
