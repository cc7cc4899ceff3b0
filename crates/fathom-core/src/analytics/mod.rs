//! Analytics Engine - forecasting and outlier detection
//!
//! Pure functions over a snapshot of validated transactions. Nothing here
//! performs I/O or keeps state between calls.
//!
//! ## Components
//!
//! - **series** - category and month keyed totals
//! - **trend** - least-squares trend and seasonal factors
//! - **forecast** - next-month prediction per category with confidence
//! - **anomaly** - z-score outliers per category
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fathom_core::analytics::{forecast, anomaly};
//!
//! let forecast = forecast::predict_all(&transactions, today, &config);
//! let anomalies = anomaly::detect_anomalies(&transactions);
//! ```

pub mod anomaly;
pub mod forecast;
pub mod series;
pub mod trend;
pub mod types;

pub use anomaly::{detect_anomalies, Z_SCORE_THRESHOLD};
pub use forecast::{predict, predict_all};
pub use series::{aggregate, MonthlySeries, PeriodTotal};
pub use trend::{seasonal_factor_for, seasonality, trend};
pub use types::{Accuracy, Anomaly, Forecast, Prediction, TrendDirection};
