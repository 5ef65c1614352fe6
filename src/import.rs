use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

use crate::error::{ExpenseError, Result};
use crate::month::parse_date;

/// A row of the legacy flat file, validated.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRecord {
    pub date: NaiveDate,
    pub category: String,
    pub amount: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    date: String,
    category: String,
    amount: String,
    notes: Option<String>,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ImportStats {
    pub rows_imported: usize,
    pub categories_created: usize,
}

fn row_error(line: u64, reason: impl Into<String>) -> ExpenseError {
    ExpenseError::ImportRow {
        line,
        reason: reason.into(),
    }
}

fn validate(raw: RawRecord, line: u64) -> Result<LegacyRecord> {
    let date = parse_date(&raw.date).map_err(|e| row_error(line, e.to_string()))?;

    let category = raw.category.trim().to_string();
    if category.is_empty() {
        return Err(row_error(line, "empty category"));
    }

    let amount: f64 = raw
        .amount
        .trim()
        .parse()
        .map_err(|_| row_error(line, format!("invalid amount '{}'", raw.amount)))?;
    if !amount.is_finite() || amount < 0.0 {
        return Err(row_error(line, format!("invalid amount '{}'", raw.amount)));
    }

    let notes = raw
        .notes
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    Ok(LegacyRecord {
        date,
        category,
        amount,
        notes,
    })
}

/// Parses `date, category, amount, notes` rows. The first row is a header
/// and is skipped whatever its contents.
pub fn parse_legacy<R: Read>(reader: R) -> Result<Vec<LegacyRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let raw: RawRecord = row
            .deserialize(None)
            .map_err(|e| row_error(line, e.to_string()))?;
        records.push(validate(raw, line)?);
    }
    Ok(records)
}
