//! CSV boundary parsing for income and expense input.
//!
//! ## Income CSV
//!
//! | Column   | Required | Notes                                   |
//! |----------|----------|-----------------------------------------|
//! | `sender` | yes      | non-empty                               |
//! | `gross`  | yes      | decimal, must not be negative           |
//! | `type`   | yes      | `1099-NEC`, `W-2`, `Retirement`; an unrecognized label is kept and taxed like wage income |
//! | `date`   | yes      | `YYYY-MM-DD`                            |
//!
//! Errors name the offending line and field so the caller can point the
//! user at the exact cell.
//!
//! ## Expense CSV
//!
//! | Column    | Required | Notes                     |
//! |-----------|----------|---------------------------|
//! | `sender`  | yes      | non-empty                 |
//! | `expense` | no       | blank drops the line      |
//! | `amount`  | no       | blank, unparsable, or non-positive drops the line |
//!
//! Dropped expense lines are logged and skipped, never stored; that is the
//! one silent-skip rule in the system.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use checkbook_core::models::{ExpenseLine, IncomeRecord, IncomeType};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: missing required field '{field}'")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid amount '{value}'")]
    InvalidAmount { line: usize, value: String },

    #[error("line {line}: gross amount must not be negative, got {value}")]
    NegativeGross { line: usize, value: Decimal },

    #[error("line {line}: invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { line: usize, value: String },
}

#[derive(Debug, Deserialize)]
struct IncomeCsvRow {
    sender: Option<String>,
    gross: Option<String>,
    #[serde(rename = "type")]
    income_type: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpenseCsvRow {
    sender: Option<String>,
    expense: Option<String>,
    amount: Option<String>,
}

fn required(
    value: &Option<String>,
    line: usize,
    field: &'static str,
) -> Result<String, LoadError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(LoadError::MissingField { line, field })
}

pub fn load_income_records<R: Read>(reader: R) -> Result<Vec<IncomeRecord>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();

    for (index, row) in csv_reader.deserialize().enumerate() {
        let line = index + 2; // line 1 is the header
        let row: IncomeCsvRow = row?;

        let sender = required(&row.sender, line, "sender")?;
        let gross_text = required(&row.gross, line, "gross")?;
        let gross: Decimal = gross_text.parse().map_err(|_| LoadError::InvalidAmount {
            line,
            value: gross_text.clone(),
        })?;
        if gross < Decimal::ZERO {
            return Err(LoadError::NegativeGross { line, value: gross });
        }

        let type_text = required(&row.income_type, line, "type")?;
        let income_type = IncomeType::parse(&type_text);
        if matches!(income_type, IncomeType::Other(_)) {
            warn!(line, label = %type_text, "unrecognized income type; no taxes will be computed for it");
        }

        let date_text = required(&row.date, line, "date")?;
        let date =
            NaiveDate::parse_from_str(&date_text, "%Y-%m-%d").map_err(|_| LoadError::InvalidDate {
                line,
                value: date_text.clone(),
            })?;

        records.push(IncomeRecord {
            sender,
            gross,
            income_type,
            date,
        });
    }

    Ok(records)
}

pub fn load_income_records_from_path(path: &Path) -> Result<Vec<IncomeRecord>, LoadError> {
    load_income_records(File::open(path)?)
}

pub fn load_expense_lines<R: Read>(reader: R) -> Result<Vec<ExpenseLine>, LoadError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut lines = Vec::new();

    for (index, row) in csv_reader.deserialize().enumerate() {
        let line = index + 2;
        let row: ExpenseCsvRow = row?;

        let sender = required(&row.sender, line, "sender")?;

        let name = match row.expense.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                warn!(line, sender = %sender, "dropping expense line with blank name");
                continue;
            }
        };

        let amount = match row
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<Decimal>().ok())
        {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => {
                warn!(line, sender = %sender, name = %name, "dropping expense line with missing or invalid amount");
                continue;
            }
        };

        lines.push(ExpenseLine {
            sender,
            name,
            amount,
        });
    }

    Ok(lines)
}

pub fn load_expense_lines_from_path(path: &Path) -> Result<Vec<ExpenseLine>, LoadError> {
    load_expense_lines(File::open(path)?)
}
