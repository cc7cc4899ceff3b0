//! Snapshot sources
//!
//! The engine never performs I/O. A [`SnapshotSource`] fetches raw records
//! (from a file, memory, or anything else), and [`RawSnapshot::validate`]
//! turns them into the immutable [`Snapshot`] the engine works on.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::import::parse_csv;
use crate::models::{BudgetRecord, Debt, EmergencyFund, RawTransaction, Transaction};
use crate::validate::{
    validate_all, validate_budget, validate_debt, validate_emergency_fund, validate_lenient,
};

/// Records as fetched, before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub budgets: Vec<BudgetRecord>,
    #[serde(default)]
    pub debts: Vec<Debt>,
    #[serde(default, alias = "emergencyFund")]
    pub emergency_fund: Option<EmergencyFund>,
}

impl RawSnapshot {
    /// Validate every record, failing on the first invalid one
    pub fn validate(&self, config: &AnalysisConfig) -> Result<Snapshot> {
        let transactions = validate_all(&self.transactions, config)?;
        let budgets = self
            .budgets
            .iter()
            .enumerate()
            .map(|(i, b)| validate_budget(b, i, config))
            .collect::<Result<Vec<_>>>()?;
        let debts = self
            .debts
            .iter()
            .enumerate()
            .map(|(i, d)| validate_debt(d, i))
            .collect::<Result<Vec<_>>>()?;
        let emergency_fund = self
            .emergency_fund
            .as_ref()
            .map(validate_emergency_fund)
            .transpose()?;

        Ok(Snapshot {
            transactions,
            budgets,
            debts,
            emergency_fund,
        })
    }

    /// Validate every record, dropping invalid ones and returning their errors
    pub fn validate_lenient(&self, config: &AnalysisConfig) -> (Snapshot, Vec<Error>) {
        let (transactions, mut errors) = validate_lenient(&self.transactions, config);

        let mut budgets = Vec::with_capacity(self.budgets.len());
        for (i, budget) in self.budgets.iter().enumerate() {
            match validate_budget(budget, i, config) {
                Ok(b) => budgets.push(b),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid budget");
                    errors.push(e);
                }
            }
        }

        let mut debts = Vec::with_capacity(self.debts.len());
        for (i, debt) in self.debts.iter().enumerate() {
            match validate_debt(debt, i) {
                Ok(d) => debts.push(d),
                Err(e) => {
                    warn!(error = %e, "Skipping invalid debt");
                    errors.push(e);
                }
            }
        }

        let emergency_fund = match self.emergency_fund.as_ref().map(validate_emergency_fund) {
            Some(Ok(fund)) => Some(fund),
            Some(Err(e)) => {
                warn!(error = %e, "Skipping invalid emergency fund");
                errors.push(e);
                None
            }
            None => None,
        };

        let snapshot = Snapshot {
            transactions,
            budgets,
            debts,
            emergency_fund,
        };
        (snapshot, errors)
    }
}

/// Validated, immutable records handed to the engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub transactions: Vec<Transaction>,
    pub budgets: Vec<BudgetRecord>,
    pub debts: Vec<Debt>,
    pub emergency_fund: Option<EmergencyFund>,
}

impl Snapshot {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions,
            ..Default::default()
        }
    }

    pub fn with_budgets(mut self, budgets: Vec<BudgetRecord>) -> Self {
        self.budgets = budgets;
        self
    }

    pub fn with_debts(mut self, debts: Vec<Debt>) -> Self {
        self.debts = debts;
        self
    }

    pub fn with_emergency_fund(mut self, fund: EmergencyFund) -> Self {
        self.emergency_fund = Some(fund);
        self
    }

    /// Date of the most recent transaction
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.transactions.iter().map(|t| t.occurred_at).max()
    }

    pub fn expenses(&self) -> Vec<Transaction> {
        self.transactions
            .iter()
            .filter(|t| t.is_expense())
            .cloned()
            .collect()
    }
}

/// Anything that can produce a raw snapshot
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetch the raw records
    async fn fetch(&self) -> Result<RawSnapshot>;

    /// Human-readable name for logs
    fn name(&self) -> String;

    /// Fetch and validate, failing on the first invalid record
    async fn load(&self, config: &AnalysisConfig) -> Result<Snapshot> {
        let raw = self.fetch().await?;
        let snapshot = raw.validate(config)?;
        info!(
            source = %self.name(),
            transactions = snapshot.transactions.len(),
            budgets = snapshot.budgets.len(),
            debts = snapshot.debts.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }
}

/// Full snapshot stored as a JSON document
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for JsonFileSource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        debug!(path = %self.path.display(), bytes = content.len(), "Read JSON snapshot");

        // A bare array is accepted as a transaction list
        let value: serde_json::Value = serde_json::from_str(&content)?;
        match value {
            serde_json::Value::Array(_) => Ok(RawSnapshot {
                transactions: serde_json::from_value(value)?,
                ..Default::default()
            }),
            serde_json::Value::Object(_) => Ok(serde_json::from_value(value)?),
            _ => Err(Error::InvalidData(format!(
                "{}: snapshot must be a JSON object or array",
                self.path.display()
            ))),
        }
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// Transactions stored as CSV; budgets and debts are empty
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for CsvFileSource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "Read CSV snapshot");
        Ok(RawSnapshot {
            transactions: parse_csv(bytes.as_slice())?,
            ..Default::default()
        })
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory snapshot, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    raw: RawSnapshot,
}

impl MemorySource {
    pub fn new(raw: RawSnapshot) -> Self {
        Self { raw }
    }
}

#[async_trait]
impl SnapshotSource for MemorySource {
    async fn fetch(&self) -> Result<RawSnapshot> {
        Ok(self.raw.clone())
    }

    fn name(&self) -> String {
        "memory".to_string()
    }
}

/// Pick a file source by extension (`.csv`, otherwise JSON)
pub fn source_for_path(path: &Path) -> Box<dyn SnapshotSource> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        Box::new(CsvFileSource::new(path))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample_json() -> serde_json::Value {
        json!({
            "transactions": [
                {"id": "t1", "type": "income", "amount": 3000, "category": "Salary", "date": "2024-05-01"},
                {"id": "t2", "type": "expense", "amount": "82.10", "category": "groceries", "date": "2024-05-03"}
            ],
            "budgets": [
                {"category": "Food", "limit_amount": 400, "savings_goal": 500},
                {"category": "Visa", "amount": 0, "priority": "high", "minimum_payment": 50}
            ],
            "debts": [
                {"name": "Visa", "amount": 1800, "interest_rate": 22.9, "minimum_payment": 50}
            ],
            "emergencyFund": {"goal": 6000, "current": 1500, "monthly_contribution": 250}
        })
    }

    #[tokio::test]
    async fn test_json_file_source() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", sample_json()).unwrap();

        let source = source_for_path(file.path());
        let snapshot = source.load(&AnalysisConfig::embedded()).await.unwrap();

        assert_eq!(snapshot.transactions.len(), 2);
        assert_eq!(snapshot.transactions[1].category, "Food");
        assert_eq!(snapshot.budgets.len(), 2);
        assert_eq!(snapshot.debts[0].name, "Visa");
        assert_eq!(snapshot.emergency_fund.unwrap().goal, 6000.0);
        assert_eq!(snapshot.latest_date(), NaiveDate::from_ymd_opt(2024, 5, 3));
    }

    #[tokio::test]
    async fn test_json_array_is_transaction_list() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", sample_json()["transactions"]).unwrap();

        let raw = JsonFileSource::new(file.path()).fetch().await.unwrap();
        assert_eq!(raw.transactions.len(), 2);
        assert!(raw.budgets.is_empty());
    }

    #[tokio::test]
    async fn test_csv_file_source() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "date,type,amount,category,description").unwrap();
        writeln!(file, "2024-05-02,expense,12.00,Coffee,Beans").unwrap();

        let snapshot = source_for_path(file.path())
            .load(&AnalysisConfig::default())
            .await
            .unwrap();
        assert_eq!(snapshot.transactions.len(), 1);
        assert_eq!(snapshot.transactions[0].description.as_deref(), Some("Beans"));
    }

    #[test]
    fn test_snapshot_builders() {
        let raw: RawSnapshot = serde_json::from_value(sample_json()).unwrap();
        let validated = raw.validate(&AnalysisConfig::default()).unwrap();

        let snapshot = Snapshot::new(validated.transactions.clone())
            .with_budgets(validated.budgets.clone())
            .with_debts(validated.debts.clone())
            .with_emergency_fund(EmergencyFund {
                goal: 6000.0,
                current: 1500.0,
                monthly_contribution: 250.0,
            });

        assert_eq!(snapshot, validated);
        assert_eq!(snapshot.expenses().len(), 1);
        assert_eq!(Snapshot::default().latest_date(), None);
    }

    #[tokio::test]
    async fn test_scalar_json_is_invalid_data() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "42").unwrap();

        let result = JsonFileSource::new(file.path()).fetch().await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_wrongly_typed_date_skips_only_that_record() {
        let mut value = sample_json();
        let transactions = value["transactions"].as_array_mut().unwrap();
        transactions.push(json!({
            "id": "epoch", "type": "expense", "amount": 12, "category": "Food", "date": 1704067200000i64
        }));
        transactions.push(json!({
            "id": "bad-date", "type": "expense", "amount": 9, "category": "Food", "date": true
        }));

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{}", value).unwrap();
        let source = JsonFileSource::new(file.path());

        let err = source.load(&AnalysisConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("bad-date"));

        let raw = source.fetch().await.unwrap();
        let (snapshot, errors) = raw.validate_lenient(&AnalysisConfig::default());
        assert_eq!(snapshot.transactions.len(), 3);
        assert_eq!(
            snapshot.transactions[2].occurred_at,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            Error::InvalidRecord { record, .. } if record == "bad-date"
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = JsonFileSource::new("/nonexistent/snapshot.json");
        assert!(matches!(source.fetch().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_strict_and_lenient_validation() {
        let mut raw: RawSnapshot = serde_json::from_value(sample_json()).unwrap();
        raw.transactions.push(RawTransaction {
            id: Some(json!("bad")),
            kind: json!("expense"),
            amount: json!("n/a"),
            category: json!("Food"),
            date: json!("2024-05-04"),
            description: serde_json::Value::Null,
        });
        let source = MemorySource::new(raw.clone());

        let err = source.load(&AnalysisConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("bad"));

        let (snapshot, errors) = raw.validate_lenient(&AnalysisConfig::default());
        assert_eq!(snapshot.transactions.len(), 2);
        assert_eq!(errors.len(), 1);
    }
}
