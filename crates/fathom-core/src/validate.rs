//! Record validation at the trust boundary
//!
//! Snapshot records arrive loosely typed (amounts as strings, free-form
//! dates, inconsistent category spellings). Everything is checked and
//! normalized here once so the engine can assume clean input.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;
use tracing::warn;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::models::{
    round_cents, BudgetRecord, Debt, EmergencyFund, RawTransaction, Transaction, TransactionKind,
};

/// Map a category to its canonical name via the alias table.
///
/// Lookup is case-insensitive on the trimmed name; unknown categories are
/// returned trimmed but otherwise unchanged.
pub fn normalize_category(category: &str, aliases: &BTreeMap<String, String>) -> String {
    let trimmed = category.trim();
    aliases
        .get(&trimmed.to_lowercase())
        .cloned()
        .unwrap_or_else(|| trimmed.to_string())
}

/// Parse an amount given as a JSON number or numeric string
fn parse_amount(value: &Value) -> std::result::Result<f64, String> {
    let amount = match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("amount {} is not representable", n))?,
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("amount {:?} is not a number", s))?,
        Value::Null => return Err("missing amount".into()),
        other => return Err(format!("amount {} is not a number", other)),
    };

    if !amount.is_finite() {
        return Err(format!("amount {} is not finite", amount));
    }
    if amount < 0.0 {
        return Err(format!("amount {} is negative", amount));
    }
    Ok(round_cents(amount))
}

/// Parse a date given as a string or as epoch milliseconds
fn parse_date(value: &Value) -> std::result::Result<NaiveDate, String> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| format!("timestamp {} is out of range", n)),
        Value::Null => Err("missing date".into()),
        other => Err(format!("date {} is not a string or timestamp", other)),
    }
}

/// Parse a calendar date, accepting `YYYY-MM-DD` or an RFC 3339 timestamp
fn parse_date_str(s: &str) -> std::result::Result<NaiveDate, String> {
    let s = s.trim();

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    // Timestamps without an offset
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(dt.date());
    }

    Err(format!("unable to parse date {:?}", s))
}

/// Read an optional text field, rejecting non-string values
fn text_field<'a>(value: &'a Value, field: &str) -> std::result::Result<Option<&'a str>, String> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.trim()).filter(|s| !s.is_empty())),
        other => Err(format!("{} {} is not a string", field, other)),
    }
}

/// Validate one raw transaction. `index` is its position in the input and
/// names the record in errors when it has no id.
pub fn validate(
    raw: &RawTransaction,
    index: usize,
    config: &AnalysisConfig,
) -> Result<Transaction> {
    let identity = raw.identity(index);
    let invalid = |reason: String| Error::invalid_record(identity.clone(), reason);

    let amount = parse_amount(&raw.amount).map_err(&invalid)?;

    let occurred_at = parse_date(&raw.date).map_err(&invalid)?;

    let kind = text_field(&raw.kind, "type")
        .map_err(&invalid)?
        .ok_or_else(|| invalid("missing type".into()))?
        .parse::<TransactionKind>()
        .map_err(&invalid)?;

    let category = text_field(&raw.category, "category")
        .map_err(&invalid)?
        .ok_or_else(|| invalid("category must not be empty".into()))?;

    let description = text_field(&raw.description, "description")
        .map_err(&invalid)?
        .map(str::to_string);

    Ok(Transaction {
        id: identity.clone(),
        kind,
        amount,
        category: normalize_category(category, &config.category_aliases),
        occurred_at,
        description,
    })
}

/// Validate every record, failing on the first invalid one
pub fn validate_all(raws: &[RawTransaction], config: &AnalysisConfig) -> Result<Vec<Transaction>> {
    raws.iter()
        .enumerate()
        .map(|(i, raw)| validate(raw, i, config))
        .collect()
}

/// Validate every record, keeping the valid ones and returning the errors
/// for the rest
pub fn validate_lenient(
    raws: &[RawTransaction],
    config: &AnalysisConfig,
) -> (Vec<Transaction>, Vec<Error>) {
    let mut valid = Vec::with_capacity(raws.len());
    let mut errors = Vec::new();

    for (i, raw) in raws.iter().enumerate() {
        match validate(raw, i, config) {
            Ok(tx) => valid.push(tx),
            Err(e) => {
                warn!(error = %e, "Skipping invalid transaction");
                errors.push(e);
            }
        }
    }

    (valid, errors)
}

fn check_money(identity: &str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::invalid_record(
            identity,
            format!("{} must be a non-negative number, got {}", field, value),
        ));
    }
    Ok(())
}

/// Validate a budget and normalize its category
pub fn validate_budget(
    budget: &BudgetRecord,
    index: usize,
    config: &AnalysisConfig,
) -> Result<BudgetRecord> {
    let identity = format!("budget #{}", index + 1);
    if budget.category.trim().is_empty() {
        return Err(Error::invalid_record(identity, "category must not be empty"));
    }
    check_money(&identity, "limit_amount", budget.limit_amount)?;
    check_money(&identity, "savings_goal", budget.savings_goal)?;
    check_money(&identity, "minimum_payment", budget.minimum_payment)?;

    Ok(BudgetRecord {
        category: normalize_category(&budget.category, &config.category_aliases),
        ..budget.clone()
    })
}

/// Validate a debt record
pub fn validate_debt(debt: &Debt, index: usize) -> Result<Debt> {
    let identity = debt
        .id
        .clone()
        .unwrap_or_else(|| format!("debt #{}", index + 1));
    let name = debt.name.trim();
    if name.is_empty() {
        return Err(Error::invalid_record(identity, "name must not be empty"));
    }
    check_money(&identity, "amount", debt.amount)?;
    check_money(&identity, "interest_rate", debt.interest_rate)?;
    check_money(&identity, "minimum_payment", debt.minimum_payment)?;

    Ok(Debt {
        name: name.to_string(),
        ..debt.clone()
    })
}

pub fn validate_emergency_fund(fund: &EmergencyFund) -> Result<EmergencyFund> {
    let identity = "emergency fund";
    check_money(identity, "goal", fund.goal)?;
    check_money(identity, "current", fund.current)?;
    check_money(identity, "monthly_contribution", fund.monthly_contribution)?;
    Ok(*fund)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawTransaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_record() {
        let tx = validate(
            &raw(json!({
                "id": "t1",
                "type": "expense",
                "amount": "12.499",
                "category": "  groceries ",
                "date": "2024-03-05",
                "description": "  "
            })),
            0,
            &AnalysisConfig::embedded(),
        )
        .unwrap();

        assert_eq!(tx.id, "t1");
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, 12.5);
        assert_eq!(tx.category, "Food");
        assert_eq!(tx.occurred_at, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert!(tx.description.is_none());
    }

    #[test]
    fn test_non_numeric_amount_names_record() {
        let err = validate(
            &raw(json!({
                "_id": "abc123",
                "type": "expense",
                "amount": "lots",
                "category": "Food",
                "date": "2024-03-05"
            })),
            7,
            &AnalysisConfig::default(),
        )
        .unwrap_err();

        match err {
            Error::InvalidRecord { record, reason } => {
                assert_eq!(record, "abc123");
                assert!(reason.contains("not a number"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_without_id_named_by_position() {
        let err = validate(
            &raw(json!({"type": "income", "amount": -5, "category": "Pay", "date": "2024-01-01"})),
            2,
            &AnalysisConfig::default(),
        )
        .unwrap_err();
        assert!(err.to_string().starts_with("Invalid record #3:"));
    }

    #[test]
    fn test_rejections() {
        let config = AnalysisConfig::default();
        let base = json!({"type": "expense", "amount": 10, "category": "Food", "date": "2024-01-01"});

        let mut bad_date = base.clone();
        bad_date["date"] = json!("01/02/2024");
        assert!(validate(&raw(bad_date), 0, &config).is_err());

        let mut bad_kind = base.clone();
        bad_kind["type"] = json!("transfer");
        assert!(validate(&raw(bad_kind), 0, &config).is_err());

        let mut empty_category = base.clone();
        empty_category["category"] = json!("   ");
        assert!(validate(&raw(empty_category), 0, &config).is_err());

        let mut missing_amount = base;
        missing_amount.as_object_mut().unwrap().remove("amount");
        assert!(validate(&raw(missing_amount), 0, &config).is_err());
    }

    #[test]
    fn test_rfc3339_dates() {
        let config = AnalysisConfig::default();
        let tx = validate(
            &raw(json!({
                "type": "income",
                "amount": 2500,
                "category": "Salary",
                "date": "2024-02-29T18:30:00Z"
            })),
            0,
            &config,
        )
        .unwrap();
        assert_eq!(tx.occurred_at, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let tx = validate(
            &raw(json!({
                "type": "income",
                "amount": 2500,
                "category": "Salary",
                "occurredAt": "2024-03-01T08:00:00.000"
            })),
            0,
            &config,
        )
        .unwrap();
        assert_eq!(tx.occurred_at, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_epoch_millis_date() {
        let tx = validate(
            &raw(json!({
                "type": "expense",
                "amount": 40,
                "category": "Food",
                "date": 1704067200000i64
            })),
            0,
            &AnalysisConfig::default(),
        )
        .unwrap();
        assert_eq!(tx.occurred_at, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_wrongly_typed_fields_reject_only_that_record() {
        let config = AnalysisConfig::default();
        let raws = vec![
            raw(json!({"id": "ok", "type": "expense", "amount": 5, "category": "Food", "date": "2024-01-02"})),
            raw(json!({"id": "bad-date", "type": "expense", "amount": 5, "category": "Food", "date": [2024, 1, 3]})),
            raw(json!({"id": "bad-type", "type": 1, "amount": 5, "category": "Food", "date": "2024-01-04"})),
            raw(json!({"id": "bad-category", "type": "expense", "amount": 5, "category": {"name": "Food"}, "date": "2024-01-05"})),
        ];

        let (valid, errors) = validate_lenient(&raws, &config);
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0].id, "ok");

        let records: Vec<String> = errors
            .iter()
            .map(|e| match e {
                Error::InvalidRecord { record, .. } => record.clone(),
                other => panic!("unexpected error: {other}"),
            })
            .collect();
        assert_eq!(records, vec!["bad-date", "bad-type", "bad-category"]);
    }

    #[test]
    fn test_normalize_category() {
        let aliases = AnalysisConfig::embedded().category_aliases;
        assert_eq!(normalize_category("GROCERIES", &aliases), "Food");
        assert_eq!(normalize_category("Uber", &aliases), "Transportation");
        assert_eq!(normalize_category(" Pets ", &aliases), "Pets");
    }

    #[test]
    fn test_validate_all_fails_fast_and_lenient_collects() {
        let config = AnalysisConfig::default();
        let raws = vec![
            raw(json!({"type": "expense", "amount": 1, "category": "A", "date": "2024-01-01"})),
            raw(json!({"type": "expense", "amount": "x", "category": "A", "date": "2024-01-01"})),
            raw(json!({"type": "expense", "amount": 3, "category": "A", "date": "bad"})),
            raw(json!({"type": "income", "amount": 4, "category": "B", "date": "2024-01-02"})),
        ];

        assert!(validate_all(&raws, &config).is_err());

        let (valid, errors) = validate_lenient(&raws, &config);
        assert_eq!(valid.len(), 2);
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_validate_budget_and_debt() {
        let config = AnalysisConfig::embedded();
        let budget = validate_budget(&BudgetRecord::new("rent", 1500.0), 0, &config).unwrap();
        assert_eq!(budget.category, "Housing");
        assert!(validate_budget(&BudgetRecord::new("Food", -1.0), 0, &config).is_err());

        let debt = Debt {
            id: None,
            name: "  Visa ".into(),
            amount: 1000.0,
            interest_rate: f64::NAN,
            minimum_payment: 25.0,
            priority: Default::default(),
        };
        let err = validate_debt(&debt, 1).unwrap_err();
        assert!(err.to_string().contains("debt #2"));

        let fixed = Debt {
            interest_rate: 19.9,
            ..debt
        };
        assert_eq!(validate_debt(&fixed, 1).unwrap().name, "Visa");
    }
}
