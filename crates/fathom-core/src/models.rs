//! Domain models for Fathom

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Round a monetary value to whole cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Direction of money movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A validated transaction, as consumed by the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    /// Always non-negative; the kind carries the sign
    pub amount: f64,
    pub category: String,
    pub occurred_at: NaiveDate,
    pub description: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    /// Year-month bucket, e.g. "2024-03"
    pub fn period_key(&self) -> String {
        period_key(self.occurred_at)
    }
}

/// Year-month bucket for a date. Lexicographic order is chronological.
pub fn period_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// A transaction as received at the trust boundary, before validation.
///
/// Fields are kept as raw JSON values so a record with a wrongly typed field
/// is rejected on its own by `validate` rather than failing the whole
/// snapshot. Amounts may be numbers or numeric strings; dates may be strings
/// or epoch milliseconds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTransaction {
    #[serde(default, alias = "_id")]
    pub id: Option<serde_json::Value>,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: serde_json::Value,
    #[serde(default)]
    pub amount: serde_json::Value,
    #[serde(default)]
    pub category: serde_json::Value,
    #[serde(default, alias = "occurred_at", alias = "occurredAt")]
    pub date: serde_json::Value,
    #[serde(default)]
    pub description: serde_json::Value,
}

impl RawTransaction {
    /// Identity used in error messages: the record id, or its position
    pub fn identity(&self, index: usize) -> String {
        match &self.id {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(serde_json::Value::Number(n)) => n.to_string(),
            _ => format!("#{}", index + 1),
        }
    }
}

/// Budget period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    #[default]
    Monthly,
    Weekly,
}

/// Declared repayment priority for a debt or budget obligation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl DebtPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Numeric rank for sorting (higher = paid first)
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }
}

impl std::fmt::Display for DebtPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A category budget, optionally carrying a debt obligation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetRecord {
    pub category: String,
    #[serde(alias = "amount")]
    pub limit_amount: f64,
    #[serde(default)]
    pub period: BudgetPeriod,
    #[serde(default)]
    pub savings_goal: f64,
    #[serde(default, alias = "priority")]
    pub debt_priority: DebtPriority,
    #[serde(default)]
    pub minimum_payment: f64,
}

impl BudgetRecord {
    pub fn new(category: impl Into<String>, limit_amount: f64) -> Self {
        Self {
            category: category.into(),
            limit_amount,
            period: BudgetPeriod::Monthly,
            savings_goal: 0.0,
            debt_priority: DebtPriority::Medium,
            minimum_payment: 0.0,
        }
    }

    /// Attach a debt obligation to this budget
    pub fn with_debt(mut self, priority: DebtPriority, minimum_payment: f64) -> Self {
        self.debt_priority = priority;
        self.minimum_payment = minimum_payment;
        self
    }

    pub fn with_savings_goal(mut self, goal: f64) -> Self {
        self.savings_goal = goal;
        self
    }
}

/// An outstanding debt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    /// Outstanding balance
    pub amount: f64,
    /// Annual interest rate in percent (e.g. 19.9)
    pub interest_rate: f64,
    pub minimum_payment: f64,
    #[serde(default)]
    pub priority: DebtPriority,
}

/// Emergency fund status
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub goal: f64,
    pub current: f64,
    pub monthly_contribution: f64,
}
