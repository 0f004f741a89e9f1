//! Builds the per-check tax breakdown table from a batch of income records.
//!
//! Only self-employed (1099-NEC) checks have taxes computed in this pass;
//! wage and retirement checks are treated as already withheld and get zero
//! in every tax column. Row order follows input order.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::calculations::tax::{TaxCalculator, TaxError};
use crate::models::{BreakdownTotals, IncomeRecord, TaxBreakdown, TaxBreakdownRow};

/// Turns income records into a [`TaxBreakdown`] using a shared calculator.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use checkbook_core::calculations::{BreakdownBuilder, TaxCalculator, TaxConfig};
/// use checkbook_core::models::{IncomeRecord, IncomeType};
///
/// let calculator = TaxCalculator::new(TaxConfig::default()).unwrap();
/// let builder = BreakdownBuilder::new(&calculator);
///
/// let records = vec![IncomeRecord {
///     sender: "Acme".to_string(),
///     gross: dec!(10000),
///     income_type: IncomeType::SelfEmployed,
///     date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
/// }];
///
/// let breakdown = builder.build(&records).unwrap();
/// assert_eq!(breakdown.rows[0].total_tax, dec!(2930.00));
/// assert_eq!(breakdown.rows[0].net, dec!(7070.00));
/// ```
#[derive(Debug, Clone)]
pub struct BreakdownBuilder<'a> {
    calculator: &'a TaxCalculator,
}

impl<'a> BreakdownBuilder<'a> {
    pub fn new(calculator: &'a TaxCalculator) -> Self {
        Self { calculator }
    }

    /// Computes one row per record, in input order, plus column totals.
    ///
    /// Each tax component is rounded to cents independently; the row total
    /// is the sum of the rounded components and the net is the rounded
    /// gross minus that total, so rows are always internally consistent.
    /// Totals are column sums of the rounded row values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxError::NegativeGross`] if any record carries a
    /// negative gross, whatever its income type.
    pub fn build(&self, records: &[IncomeRecord]) -> Result<TaxBreakdown, TaxError> {
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            if record.gross < Decimal::ZERO {
                return Err(TaxError::NegativeGross(record.gross));
            }

            let (se_tax, fed_tax, state_tax) = if record.income_type.is_self_employed() {
                (
                    round_half_up(self.calculator.self_employment_tax(record.gross)?),
                    round_half_up(self.calculator.federal_tax(record.gross)?),
                    round_half_up(self.calculator.state_tax(record.gross)?),
                )
            } else {
                (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO)
            };

            let gross = round_half_up(record.gross);
            let total_tax = se_tax + fed_tax + state_tax;
            let net = gross - total_tax;

            rows.push(TaxBreakdownRow {
                sender: record.sender.clone(),
                income_type: record.income_type.clone(),
                date: record.date,
                gross,
                se_tax,
                fed_tax,
                state_tax,
                total_tax,
                net,
            });
        }

        let totals = BreakdownTotals::from_rows(&rows);
        Ok(TaxBreakdown { rows, totals })
    }
}
