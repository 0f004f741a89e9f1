use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::income::IncomeType;

/// A calendar month used as a statement bucket key.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// One income line item flattened out of a saved entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeItem {
    pub entry_id: i64,
    pub date: NaiveDate,
    pub sender: String,
    pub income_type: IncomeType,
    pub gross: Decimal,
    pub taxes_due: Decimal,
}

/// One expense line item flattened out of a saved entry.
///
/// Expenses carry no date of their own; the date is joined from the
/// same-sender income record in the same entry, falling back to the
/// entry's save timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseItem {
    pub entry_id: i64,
    pub date: NaiveDate,
    pub sender: String,
    pub name: String,
    pub amount: Decimal,
}

/// Per-month totals plus the line items that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_tax_due: Decimal,
    pub incomes: Vec<IncomeItem>,
    pub expenses: Vec<ExpenseItem>,
}

/// Per-year totals, computed independently of the monthly pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearBucket {
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub total_tax_due: Decimal,
}

/// Monthly and yearly statements over a set of saved entries.
///
/// Buckets are sorted ascending by period key and sparse: a period with no
/// contributing income or expense items does not appear at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub monthly: Vec<MonthBucket>,
    pub yearly: Vec<YearBucket>,
}
