//! Trend and seasonality estimation over monthly totals

use std::collections::BTreeMap;

use super::series::{month_of_year, PeriodTotal};

/// Least-squares slope of `values` against their index.
///
/// Index 0 is the most recent period, so a negative slope means older
/// periods were smaller. Fewer than two points carry no trend signal and
/// return exactly 0.
pub fn trend(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (numerator, denominator) =
        values
            .iter()
            .enumerate()
            .fold((0.0, 0.0), |(num, den), (x, y)| {
                let dx = x as f64 - x_mean;
                (num + dx * (y - y_mean), den + dx * dx)
            });

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Multiplicative factor per month of year (0 = January).
///
/// Each month's factor is its average total across years divided by the
/// average over all periods. Months without history are absent; use
/// [`seasonal_factor_for`] to read with the 1.0 default.
pub fn seasonality(periods: &[PeriodTotal]) -> BTreeMap<u32, f64> {
    let mut by_month: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for period in periods {
        let Some(month) = month_of_year(&period.period_key) else {
            continue;
        };
        let entry = by_month.entry(month).or_insert((0.0, 0));
        entry.0 += period.total;
        entry.1 += 1;
    }

    let (grand_sum, grand_count) = by_month
        .values()
        .fold((0.0, 0usize), |(s, c), (sum, count)| (s + sum, c + count));
    if grand_count == 0 {
        return BTreeMap::new();
    }
    let overall_average = grand_sum / grand_count as f64;
    if overall_average == 0.0 {
        return BTreeMap::new();
    }

    by_month
        .into_iter()
        .map(|(month, (sum, count))| (month, (sum / count as f64) / overall_average))
        .collect()
}

/// Seasonal factor for a month, defaulting to 1.0 when unknown
pub fn seasonal_factor_for(factors: &BTreeMap<u32, f64>, month: u32) -> f64 {
    factors.get(&month).copied().unwrap_or(1.0)
}
