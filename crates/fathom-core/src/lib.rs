//! Fathom Core Library
//!
//! Analytics and forecasting for the Fathom personal finance tracker:
//! - Record validation and category normalization
//! - CSV and JSON snapshot sources
//! - Monthly aggregation, trend and seasonality
//! - Per-category spending forecasts with confidence
//! - Z-score anomaly detection
//! - Savings and debt allocation planning
//! - Cash flow, statistics and spending-change reports
//!
//! The engine is a set of pure functions over an immutable [`Snapshot`].
//! Nothing below `source` performs I/O.

pub mod analytics;
pub mod config;
pub mod error;
pub mod import;
pub mod models;
pub mod planning;
pub mod recommendation;
pub mod reports;
pub mod source;
pub mod validate;

pub use analytics::{
    detect_anomalies, predict, predict_all, Accuracy, Anomaly, Forecast, MonthlySeries,
    PeriodTotal, Prediction, TrendDirection,
};
pub use config::AnalysisConfig;
pub use error::{Error, Result};
pub use models::{
    BudgetPeriod, BudgetRecord, Debt, DebtPriority, EmergencyFund, RawTransaction, Transaction,
    TransactionKind,
};
pub use planning::{
    analyze_debts, analyze_spending_and_savings, emergency_fund_status, plan_allocation,
    AllocationEntry, AllocationOutcome, AllocationPlan, BudgetStatus, DebtAnalysis,
    EmergencyFundStatus, SpendingAnalysis,
};
pub use recommendation::{Recommendation, RecommendationKind, Severity};
pub use reports::{CashFlowPeriod, MonthlyChange, TransactionStatistics};
pub use source::{
    source_for_path, CsvFileSource, JsonFileSource, MemorySource, RawSnapshot, Snapshot,
    SnapshotSource,
};
pub use validate::{normalize_category, validate, validate_all, validate_lenient};
