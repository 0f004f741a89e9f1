//! Pure computation behind the check reconciliation workflow: bracket tax
//! math, the per-check breakdown table, expense allocation, and the
//! monthly/yearly statement aggregation.

pub mod allocation;
pub mod breakdown;
pub mod common;
pub mod statement;
pub mod tax;

pub use allocation::{AllocationError, AllocationPolicy, ExpenseAllocator};
pub use breakdown::BreakdownBuilder;
pub use statement::StatementBuilder;
pub use tax::{TaxCalculator, TaxConfig, TaxConfigError, TaxError};
