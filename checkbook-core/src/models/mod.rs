mod breakdown;
mod entry;
mod expense;
mod income;
mod statement;
mod tax_bracket;

pub use breakdown::{BreakdownTotals, TaxBreakdown, TaxBreakdownRow};
pub use entry::{Entry, EntryError, NewEntry};
pub use expense::{AllocatedExpenseLine, ExpenseAllocation, ExpenseLine};
pub use income::{IncomeRecord, IncomeType};
pub use statement::{
    ExpenseItem, IncomeItem, MonthBucket, Statement, YearBucket, YearMonth,
};
pub use tax_bracket::FederalBracket;
