use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One expense attributed against an income sender.
///
/// A valid line has a non-empty name and a positive amount; lines that fail
/// either check are dropped at the input boundary and never reach the
/// allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseLine {
    pub sender: String,
    pub name: String,
    pub amount: Decimal,
}

/// An [`ExpenseLine`] with the sender's net after expenses applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatedExpenseLine {
    pub sender: String,
    pub name: String,
    pub amount: Decimal,
    pub net_after: Decimal,
}

/// Result of allocating a batch of expenses against per-sender nets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseAllocation {
    pub lines: Vec<AllocatedExpenseLine>,
    pub total_expense: Decimal,
    pub total_net: Decimal,
}
