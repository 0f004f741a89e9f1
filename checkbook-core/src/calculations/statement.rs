//! Aggregates saved entries into monthly and yearly statements.
//!
//! Income line items bucket by their own check date. Expense line items
//! carry no date: each joins to the same-sender income record within its
//! entry (last one wins when a sender has several rows) and falls back to
//! the entry's save timestamp.
//!
//! Taxes due are recomputed here from the stored gross, not read from the
//! stored breakdown: a self-employed item owes the *flat* combined SE rate
//! plus federal and state tax, while every other type owes nothing. This
//! deliberately differs from the breakdown path's capped two-component SE
//! tax; see DESIGN.md.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::calculations::tax::{TaxCalculator, TaxError};
use crate::models::{
    Entry, ExpenseItem, IncomeItem, IncomeType, MonthBucket, Statement, YearBucket, YearMonth,
};

#[derive(Debug, Default)]
struct BucketSums {
    income: Decimal,
    expense: Decimal,
    tax_due: Decimal,
}

/// Builds statements over a set of saved entries.
#[derive(Debug, Clone)]
pub struct StatementBuilder<'a> {
    calculator: &'a TaxCalculator,
}

impl<'a> StatementBuilder<'a> {
    pub fn new(calculator: &'a TaxCalculator) -> Self {
        Self { calculator }
    }

    /// Flattens every entry into income and expense line items, then
    /// buckets them by calendar month and by year.
    ///
    /// `type_filter` narrows the *income* items only; expense items always
    /// come from every entry. Buckets are sorted ascending and sparse: a
    /// period appears only if it has at least one income or expense item.
    /// Yearly buckets are computed independently from the flattened items,
    /// never by re-summing the monthly buckets.
    pub fn build(
        &self,
        entries: &[Entry],
        type_filter: Option<&IncomeType>,
    ) -> Result<Statement, TaxError> {
        let income_items = self.income_items(entries, type_filter)?;
        let expense_items = expense_items(entries);

        let mut month_sums: BTreeMap<YearMonth, BucketSums> = BTreeMap::new();
        let mut month_incomes: BTreeMap<YearMonth, Vec<IncomeItem>> = BTreeMap::new();
        let mut month_expenses: BTreeMap<YearMonth, Vec<ExpenseItem>> = BTreeMap::new();
        let mut year_sums: BTreeMap<i32, BucketSums> = BTreeMap::new();

        for item in income_items {
            let month = YearMonth::from_date(item.date);
            let sums = month_sums.entry(month).or_default();
            sums.income += item.gross;
            sums.tax_due += item.taxes_due;

            let year = year_sums.entry(item.date.year()).or_default();
            year.income += item.gross;
            year.tax_due += item.taxes_due;

            month_incomes.entry(month).or_default().push(item);
        }

        for item in expense_items {
            let month = YearMonth::from_date(item.date);
            month_sums.entry(month).or_default().expense += item.amount;
            year_sums.entry(item.date.year()).or_default().expense += item.amount;

            month_expenses.entry(month).or_default().push(item);
        }

        let monthly = month_sums
            .into_iter()
            .map(|(month, sums)| MonthBucket {
                month,
                total_income: round_half_up(sums.income),
                total_expense: round_half_up(sums.expense),
                total_tax_due: round_half_up(sums.tax_due),
                incomes: month_incomes.remove(&month).unwrap_or_default(),
                expenses: month_expenses.remove(&month).unwrap_or_default(),
            })
            .collect();

        let yearly = year_sums
            .into_iter()
            .map(|(year, sums)| YearBucket {
                year,
                total_income: round_half_up(sums.income),
                total_expense: round_half_up(sums.expense),
                total_tax_due: round_half_up(sums.tax_due),
            })
            .collect();

        Ok(Statement { monthly, yearly })
    }

    fn income_items(
        &self,
        entries: &[Entry],
        type_filter: Option<&IncomeType>,
    ) -> Result<Vec<IncomeItem>, TaxError> {
        let mut items = Vec::new();
        for entry in entries {
            for row in &entry.rows {
                if let Some(filter) = type_filter {
                    if &row.income_type != filter {
                        continue;
                    }
                }

                let taxes_due = if row.income_type.is_self_employed() {
                    round_half_up(
                        self.calculator.flat_self_employment_tax(row.gross)?
                            + self.calculator.federal_tax(row.gross)?
                            + self.calculator.state_tax(row.gross)?,
                    )
                } else {
                    Decimal::ZERO
                };

                items.push(IncomeItem {
                    entry_id: entry.id,
                    date: row.date,
                    sender: row.sender.clone(),
                    income_type: row.income_type.clone(),
                    gross: row.gross,
                    taxes_due,
                });
            }
        }
        Ok(items)
    }
}

fn expense_items(entries: &[Entry]) -> Vec<ExpenseItem> {
    let mut items = Vec::new();
    for entry in entries {
        let mut date_by_sender: HashMap<&str, NaiveDate> = HashMap::new();
        for row in &entry.rows {
            date_by_sender.insert(row.sender.as_str(), row.date);
        }
        let fallback = entry.created_at.date_naive();

        for line in &entry.expenses {
            let date = match date_by_sender.get(line.sender.as_str()) {
                Some(date) => *date,
                None => {
                    warn!(
                        entry_id = entry.id,
                        sender = %line.sender,
                        "expense sender has no income record; bucketing by save date"
                    );
                    fallback
                }
            };

            items.push(ExpenseItem {
                entry_id: entry.id,
                date,
                sender: line.sender.clone(),
                name: line.name.clone(),
                amount: line.amount,
            });
        }
    }
    items
}
