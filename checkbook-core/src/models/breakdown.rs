use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::income::{IncomeRecord, IncomeType};

/// One row of the tax breakdown table, derived from an [`IncomeRecord`].
///
/// All monetary fields are rounded half-up to two decimal places at the row
/// level. Components are rounded first, then `total_tax` is the sum of the
/// rounded components and `net = gross - total_tax`, so every row is
/// internally consistent to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdownRow {
    pub sender: String,
    pub income_type: IncomeType,
    pub date: NaiveDate,
    pub gross: Decimal,
    pub se_tax: Decimal,
    pub fed_tax: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    pub net: Decimal,
}

impl TaxBreakdownRow {
    /// The income record this row was computed from.
    pub fn income_record(&self) -> IncomeRecord {
        IncomeRecord {
            sender: self.sender.clone(),
            gross: self.gross,
            income_type: self.income_type.clone(),
            date: self.date,
        }
    }
}

/// Column sums over the breakdown rows.
///
/// Totals are sums of the already-rounded row values, so the table footer
/// always equals the sum of the printed rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownTotals {
    pub se_tax: Decimal,
    pub fed_tax: Decimal,
    pub state_tax: Decimal,
    pub total_tax: Decimal,
    pub total_net: Decimal,
}

impl BreakdownTotals {
    /// Column sums over a set of rows.
    pub fn from_rows(rows: &[TaxBreakdownRow]) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.se_tax += row.se_tax;
            totals.fed_tax += row.fed_tax;
            totals.state_tax += row.state_tax;
            totals.total_tax += row.total_tax;
            totals.total_net += row.net;
        }
        totals
    }
}

/// Full breakdown: rows in input order plus column totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub rows: Vec<TaxBreakdownRow>,
    pub totals: BreakdownTotals,
}

impl TaxBreakdown {
    /// Sender -> net map consumed by the expense allocator.
    ///
    /// When a sender appears on several rows the last row's net wins.
    pub fn original_net_by_sender(&self) -> HashMap<String, Decimal> {
        self.rows
            .iter()
            .map(|row| (row.sender.clone(), row.net))
            .collect()
    }
}
