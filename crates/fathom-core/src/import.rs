//! CSV snapshot import
//!
//! Expected header (column order is free, names are case-insensitive):
//! `date,type,amount,category,description[,id]`
//!
//! Rows are returned as raw records; nothing is trusted until
//! [`crate::validate`] accepts it.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::RawTransaction;

const REQUIRED_COLUMNS: [&str; 4] = ["date", "type", "amount", "category"];

/// Column positions resolved from the header row
struct Columns {
    date: usize,
    kind: usize,
    amount: usize,
    category: usize,
    description: Option<usize>,
    id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| Error::Import(format!("Missing column: {}", name)))
        };

        Ok(Self {
            date: require(REQUIRED_COLUMNS[0])?,
            kind: require(REQUIRED_COLUMNS[1])?,
            amount: require(REQUIRED_COLUMNS[2])?,
            category: require(REQUIRED_COLUMNS[3])?,
            description: find("description"),
            id: find("id"),
        })
    }
}

/// Stable id for a row that has none, derived from its contents
fn generate_id(date: &str, kind: &str, amount: &str, category: &str, description: &str) -> String {
    let mut hasher = Sha256::new();
    for field in [date, kind, amount, category, description] {
        hasher.update(field.trim().as_bytes());
        hasher.update([0u8]);
    }
    let digest = hex::encode(hasher.finalize());
    format!("csv-{}", &digest[..16])
}

/// Strip currency symbols and thousands separators
fn clean_amount(s: &str) -> String {
    s.trim().replace(['$', ',', ' '], "")
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn text(s: &str) -> Value {
    non_empty(s).map_or(Value::Null, Value::String)
}

/// Parse CSV transactions into raw records
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for result in rdr.records() {
        let record = result?;
        let field = |i: usize| record.get(i).unwrap_or("");

        // Skip blank lines padded out to the header width
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let date = field(columns.date);
        let kind = field(columns.kind);
        let amount = clean_amount(field(columns.amount));
        let category = field(columns.category);
        let description = columns.description.map(field).unwrap_or("");

        let id = columns
            .id
            .and_then(|i| non_empty(field(i)))
            .unwrap_or_else(|| generate_id(date, kind, &amount, category, description));

        transactions.push(RawTransaction {
            id: Some(Value::String(id)),
            kind: text(kind),
            amount: text(&amount),
            category: text(category),
            date: text(date),
            description: text(description),
        });
    }

    debug!(rows = transactions.len(), "Parsed CSV transactions");
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use serde_json::json;
    use crate::validate::validate_all;

    #[test]
    fn test_parse_basic() {
        let csv = "date,type,amount,category,description\n\
                   2024-01-15,expense,\"$1,234.56\",Rent,January rent\n\
                   2024-01-16,income,3000,Salary,\n";

        let raws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(raws.len(), 2);
        assert_eq!(raws[0].amount, Value::String("1234.56".into()));
        assert_eq!(raws[0].description, json!("January rent"));
        assert!(raws[1].description.is_null());

        let txs = validate_all(&raws, &AnalysisConfig::default()).unwrap();
        assert_eq!(txs[0].amount, 1234.56);
        assert!(txs[1].is_income());
    }

    #[test]
    fn test_explicit_id_and_column_order() {
        let csv = "ID,Category,Amount,Type,Date\n\
                   tx-1,Food,12.00,expense,2024-02-01\n";
        let raws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(raws[0].id, Some(Value::String("tx-1".into())));
        assert_eq!(raws[0].category, json!("Food"));
    }

    #[test]
    fn test_generated_ids_are_stable() {
        let csv = "date,type,amount,category,description\n\
                   2024-01-15,expense,9.99,Music,Stream\n\
                   2024-01-15,expense,5.00,Coffee,\n";
        let first = parse_csv(csv.as_bytes()).unwrap();
        let second = parse_csv(csv.as_bytes()).unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
        match &first[0].id {
            Some(Value::String(id)) => {
                assert!(id.starts_with("csv-"));
                assert_eq!(id.len(), 20);
            }
            other => panic!("unexpected id: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "date,amount,category\n2024-01-01,5,Food\n";
        let err = parse_csv(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing column: type"));
    }

    #[test]
    fn test_short_rows_become_invalid_records() {
        let csv = "date,type,amount,category\n2024-01-01,expense\n\n";
        let raws = parse_csv(csv.as_bytes()).unwrap();
        assert_eq!(raws.len(), 1);
        assert_eq!(raws[0].amount, Value::Null);
        assert!(validate_all(&raws, &AnalysisConfig::default()).is_err());
    }
}
