//! Fixed-schema report rows handed to the export sink.
//!
//! Column names and order are the compatibility contract with downstream
//! consumers; the serde renames below are what a CSV writer emits as
//! headers. Dates serialize in ISO form, amounts keep their two-decimal
//! precision.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{
    AllocatedExpenseLine, ExpenseItem, IncomeItem, MonthBucket, TaxBreakdownRow, YearBucket,
};

/// One row of the breakdown sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownTableRow {
    #[serde(rename = "Sender")]
    pub sender: String,
    #[serde(rename = "Type")]
    pub income_type: String,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Gross")]
    pub gross: Decimal,
    #[serde(rename = "SE Tax")]
    pub se_tax: Decimal,
    #[serde(rename = "Fed Tax")]
    pub fed_tax: Decimal,
    #[serde(rename = "State Tax")]
    pub state_tax: Decimal,
    #[serde(rename = "Total Tax")]
    pub total_tax: Decimal,
    #[serde(rename = "Net")]
    pub net: Decimal,
}

impl From<&TaxBreakdownRow> for BreakdownTableRow {
    fn from(row: &TaxBreakdownRow) -> Self {
        Self {
            sender: row.sender.clone(),
            income_type: row.income_type.to_string(),
            date: row.date,
            gross: row.gross,
            se_tax: row.se_tax,
            fed_tax: row.fed_tax,
            state_tax: row.state_tax,
            total_tax: row.total_tax,
            net: row.net,
        }
    }
}

/// One row of the expense/net sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseTableRow {
    #[serde(rename = "Sender")]
    pub sender: String,
    #[serde(rename = "Expense")]
    pub expense: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
    #[serde(rename = "Net After")]
    pub net_after: Decimal,
}

impl From<&AllocatedExpenseLine> for ExpenseTableRow {
    fn from(line: &AllocatedExpenseLine) -> Self {
        Self {
            sender: line.sender.clone(),
            expense: line.name.clone(),
            amount: line.amount,
            net_after: line.net_after,
        }
    }
}

/// One row of the summary sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryTableRow {
    #[serde(rename = "Category")]
    pub category: &'static str,
    #[serde(rename = "Value")]
    pub value: Decimal,
}

/// The three summary rows: total tax, total expenses, final net.
pub fn summary_rows(
    total_tax: Decimal,
    total_expenses: Decimal,
    final_net: Decimal,
) -> Vec<SummaryTableRow> {
    vec![
        SummaryTableRow {
            category: "Total Tax",
            value: total_tax,
        },
        SummaryTableRow {
            category: "Total Expenses",
            value: total_expenses,
        },
        SummaryTableRow {
            category: "Final Net",
            value: final_net,
        },
    ]
}

/// One row of the monthly statement summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummaryRow {
    #[serde(rename = "Month")]
    pub month: String,
    #[serde(rename = "Income")]
    pub income: Decimal,
    #[serde(rename = "Expenses")]
    pub expenses: Decimal,
    #[serde(rename = "Taxes Due")]
    pub taxes_due: Decimal,
}

impl From<&MonthBucket> for MonthlySummaryRow {
    fn from(bucket: &MonthBucket) -> Self {
        Self {
            month: bucket.month.to_string(),
            income: bucket.total_income,
            expenses: bucket.total_expense,
            taxes_due: bucket.total_tax_due,
        }
    }
}

/// One row of the yearly statement summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearlySummaryRow {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Income")]
    pub income: Decimal,
    #[serde(rename = "Expenses")]
    pub expenses: Decimal,
    #[serde(rename = "Taxes Due")]
    pub taxes_due: Decimal,
}

impl From<&YearBucket> for YearlySummaryRow {
    fn from(bucket: &YearBucket) -> Self {
        Self {
            year: bucket.year,
            income: bucket.total_income,
            expenses: bucket.total_expense,
            taxes_due: bucket.total_tax_due,
        }
    }
}

/// One row of the flat statement income listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncomeListingRow {
    #[serde(rename = "Entry")]
    pub entry_id: i64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sender")]
    pub sender: String,
    #[serde(rename = "Type")]
    pub income_type: String,
    #[serde(rename = "Gross")]
    pub gross: Decimal,
    #[serde(rename = "Taxes Due")]
    pub taxes_due: Decimal,
}

impl From<&IncomeItem> for IncomeListingRow {
    fn from(item: &IncomeItem) -> Self {
        Self {
            entry_id: item.entry_id,
            date: item.date,
            sender: item.sender.clone(),
            income_type: item.income_type.to_string(),
            gross: item.gross,
            taxes_due: item.taxes_due,
        }
    }
}

/// One row of the flat statement expense listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpenseListingRow {
    #[serde(rename = "Entry")]
    pub entry_id: i64,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sender")]
    pub sender: String,
    #[serde(rename = "Expense")]
    pub expense: String,
    #[serde(rename = "Amount")]
    pub amount: Decimal,
}

impl From<&ExpenseItem> for ExpenseListingRow {
    fn from(item: &ExpenseItem) -> Self {
        Self {
            entry_id: item.entry_id,
            date: item.date,
            sender: item.sender.clone(),
            expense: item.name.clone(),
            amount: item.amount,
        }
    }
}
