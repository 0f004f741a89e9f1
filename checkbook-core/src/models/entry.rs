use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::breakdown::{TaxBreakdown, TaxBreakdownRow};
use super::expense::{AllocatedExpenseLine, ExpenseAllocation};
use super::income::IncomeRecord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry title must not be empty")]
    EmptyTitle,
}

/// A named, timestamped, immutable snapshot of one full computation pass.
///
/// Once persisted an entry is the sole source of truth for statements;
/// its stored figures are never recomputed from updated tax tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub rows: Vec<TaxBreakdownRow>,
    pub expenses: Vec<AllocatedExpenseLine>,
    pub final_nets: Vec<Decimal>,
}

impl Entry {
    /// The income records this entry was computed from, derived from its
    /// breakdown rows.
    pub fn income_records(&self) -> Vec<IncomeRecord> {
        self.rows.iter().map(TaxBreakdownRow::income_record).collect()
    }
}

/// An entry about to be saved (no id or timestamp yet).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    pub title: String,
    pub rows: Vec<TaxBreakdownRow>,
    pub expenses: Vec<AllocatedExpenseLine>,
    pub final_nets: Vec<Decimal>,
}

impl NewEntry {
    /// Snapshots a breakdown plus its expense allocation under a title.
    ///
    /// `final_nets` are the per-line `net_after` values in order.
    pub fn from_computation(
        title: &str,
        breakdown: &TaxBreakdown,
        allocation: &ExpenseAllocation,
    ) -> Result<Self, EntryError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(EntryError::EmptyTitle);
        }

        Ok(Self {
            title: title.to_string(),
            rows: breakdown.rows.clone(),
            expenses: allocation.lines.clone(),
            final_nets: allocation.lines.iter().map(|line| line.net_after).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{BreakdownTotals, IncomeType};

    use super::*;

    fn sample_breakdown() -> TaxBreakdown {
        TaxBreakdown {
            rows: vec![TaxBreakdownRow {
                sender: "Acme".to_string(),
                income_type: IncomeType::SelfEmployed,
                date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
                gross: dec!(10000.00),
                se_tax: dec!(1530.00),
                fed_tax: dec!(1000.00),
                state_tax: dec!(400.00),
                total_tax: dec!(2930.00),
                net: dec!(7070.00),
            }],
            totals: BreakdownTotals::default(),
        }
    }

    fn sample_allocation() -> ExpenseAllocation {
        ExpenseAllocation {
            lines: vec![AllocatedExpenseLine {
                sender: "Acme".to_string(),
                name: "Hosting".to_string(),
                amount: dec!(100.00),
                net_after: dec!(6970.00),
            }],
            total_expense: dec!(100.00),
            total_net: dec!(6970.00),
        }
    }

    #[test]
    fn from_computation_snapshots_rows_and_expenses() {
        let entry =
            NewEntry::from_computation("March checks", &sample_breakdown(), &sample_allocation())
                .unwrap();

        assert_eq!(entry.title, "March checks");
        assert_eq!(entry.rows.len(), 1);
        assert_eq!(entry.expenses.len(), 1);
        assert_eq!(entry.final_nets, vec![dec!(6970.00)]);
    }

    #[test]
    fn from_computation_trims_title() {
        let entry =
            NewEntry::from_computation("  March  ", &sample_breakdown(), &sample_allocation())
                .unwrap();

        assert_eq!(entry.title, "March");
    }

    #[test]
    fn from_computation_rejects_blank_title() {
        let result = NewEntry::from_computation("   ", &sample_breakdown(), &sample_allocation());

        assert_eq!(result, Err(EntryError::EmptyTitle));
    }

    #[test]
    fn income_records_derive_from_rows() {
        let entry = Entry {
            id: 1,
            title: "March checks".to_string(),
            created_at: Utc::now(),
            rows: sample_breakdown().rows,
            expenses: vec![],
            final_nets: vec![],
        };

        let records = entry.income_records();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sender, "Acme");
        assert_eq!(records[0].gross, dec!(10000.00));
        assert_eq!(records[0].income_type, IncomeType::SelfEmployed);
    }
}
