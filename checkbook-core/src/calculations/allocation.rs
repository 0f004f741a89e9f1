//! Attributes expense lines against per-sender nets.
//!
//! The historical behavior (and the default here) is a *cumulative-total*
//! subtraction: every line for a sender shows that sender's net after ALL
//! of its expenses, not a running balance after the lines seen so far.
//! Two $100 lines against a $1,000 net both show $800. A true running
//! balance is available behind [`AllocationPolicy::RunningBalance`] for
//! callers that want the sequential view.

use std::collections::HashMap;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{AllocatedExpenseLine, ExpenseAllocation, ExpenseLine};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// An expense names a sender that has no net in the income set.
    #[error("expense line references unknown sender '{0}'")]
    UnknownSender(String),
}

/// How a line's `net_after` is derived from the lines sharing its sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllocationPolicy {
    /// Subtract the sender's full expense total from every line.
    #[default]
    CumulativeTotal,
    /// Subtract only the amounts up to and including the current line.
    RunningBalance,
}

#[derive(Debug, Clone, Default)]
pub struct ExpenseAllocator {
    policy: AllocationPolicy,
}

impl ExpenseAllocator {
    pub fn new(policy: AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Computes `net_after` for every line plus batch totals.
    ///
    /// `total_net` is `sum(original nets) - total expenses`, computed
    /// independently of the per-line values. Nets may go negative; no
    /// overdraft check is enforced.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::UnknownSender`] (allocating nothing) if
    /// any line's sender is absent from `original_nets`.
    pub fn allocate(
        &self,
        expenses: &[ExpenseLine],
        original_nets: &HashMap<String, Decimal>,
    ) -> Result<ExpenseAllocation, AllocationError> {
        for line in expenses {
            if !original_nets.contains_key(&line.sender) {
                return Err(AllocationError::UnknownSender(line.sender.clone()));
            }
        }

        let mut sender_totals: HashMap<&str, Decimal> = HashMap::new();
        for line in expenses {
            *sender_totals.entry(line.sender.as_str()).or_default() += line.amount;
        }

        let mut seen_so_far: HashMap<&str, Decimal> = HashMap::new();
        let mut lines = Vec::with_capacity(expenses.len());
        let mut total_expense = Decimal::ZERO;

        for line in expenses {
            total_expense += line.amount;

            let spent = match self.policy {
                AllocationPolicy::CumulativeTotal => sender_totals[line.sender.as_str()],
                AllocationPolicy::RunningBalance => {
                    let prefix = seen_so_far.entry(line.sender.as_str()).or_default();
                    *prefix += line.amount;
                    *prefix
                }
            };

            let net_after = round_half_up(original_nets[&line.sender] - spent);
            if net_after < Decimal::ZERO {
                warn!(
                    sender = %line.sender,
                    net_after = %net_after,
                    "expenses exceed the sender's net"
                );
            }

            lines.push(AllocatedExpenseLine {
                sender: line.sender.clone(),
                name: line.name.clone(),
                amount: line.amount,
                net_after,
            });
        }

        let original_total: Decimal = original_nets.values().copied().sum();

        Ok(ExpenseAllocation {
            lines,
            total_expense: round_half_up(total_expense),
            total_net: round_half_up(original_total - total_expense),
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn line(sender: &str, name: &str, amount: Decimal) -> ExpenseLine {
        ExpenseLine {
            sender: sender.to_string(),
            name: name.to_string(),
            amount,
        }
    }

    fn nets(pairs: &[(&str, Decimal)]) -> HashMap<String, Decimal> {
        pairs
            .iter()
            .map(|(sender, net)| (sender.to_string(), *net))
            .collect()
    }

    // =========================================================================
    // cumulative-total policy (the default)
    // =========================================================================

    #[test]
    fn same_sender_lines_share_one_net_after() {
        let allocator = ExpenseAllocator::default();
        let expenses = [
            line("Acme", "Hosting", dec!(1000)),
            line("Acme", "Laptop", dec!(500)),
        ];

        let allocation = allocator
            .allocate(&expenses, &nets(&[("Acme", dec!(7070.00))]))
            .unwrap();

        assert_eq!(allocation.lines[0].net_after, dec!(5570.00));
        assert_eq!(allocation.lines[1].net_after, dec!(5570.00));
        assert_eq!(allocation.total_expense, dec!(1500.00));
    }

    #[test]
    fn senders_are_scoped_independently() {
        let allocator = ExpenseAllocator::default();
        let expenses = [
            line("Acme", "Hosting", dec!(100)),
            line("Globex", "Travel", dec!(250)),
        ];

        let allocation = allocator
            .allocate(
                &expenses,
                &nets(&[("Acme", dec!(1000.00)), ("Globex", dec!(2000.00))]),
            )
            .unwrap();

        assert_eq!(allocation.lines[0].net_after, dec!(900.00));
        assert_eq!(allocation.lines[1].net_after, dec!(1750.00));
    }

    #[test]
    fn total_net_is_original_sum_minus_expenses() {
        let allocator = ExpenseAllocator::default();
        let expenses = [
            line("Acme", "Hosting", dec!(100)),
            line("Globex", "Travel", dec!(250)),
        ];

        let allocation = allocator
            .allocate(
                &expenses,
                &nets(&[
                    ("Acme", dec!(1000.00)),
                    ("Globex", dec!(2000.00)),
                    ("Idle Co", dec!(500.00)),
                ]),
            )
            .unwrap();

        // Senders without expenses still count toward the original sum.
        assert_eq!(allocation.total_net, dec!(3150.00));
    }

    #[test]
    fn net_may_go_negative() {
        let allocator = ExpenseAllocator::default();
        let expenses = [line("Acme", "Equipment", dec!(1500))];

        let allocation = allocator
            .allocate(&expenses, &nets(&[("Acme", dec!(1000.00))]))
            .unwrap();

        assert_eq!(allocation.lines[0].net_after, dec!(-500.00));
        assert_eq!(allocation.total_net, dec!(-500.00));
    }

    #[test]
    fn empty_expense_list_passes_nets_through() {
        let allocator = ExpenseAllocator::default();

        let allocation = allocator
            .allocate(&[], &nets(&[("Acme", dec!(1000.00))]))
            .unwrap();

        assert!(allocation.lines.is_empty());
        assert_eq!(allocation.total_expense, dec!(0.00));
        assert_eq!(allocation.total_net, dec!(1000.00));
    }

    // =========================================================================
    // running-balance policy
    // =========================================================================

    #[test]
    fn running_balance_decreases_line_by_line() {
        let allocator = ExpenseAllocator::new(AllocationPolicy::RunningBalance);
        let expenses = [
            line("Acme", "Hosting", dec!(1000)),
            line("Acme", "Laptop", dec!(500)),
        ];

        let allocation = allocator
            .allocate(&expenses, &nets(&[("Acme", dec!(7070.00))]))
            .unwrap();

        assert_eq!(allocation.lines[0].net_after, dec!(6070.00));
        assert_eq!(allocation.lines[1].net_after, dec!(5570.00));
    }

    #[test]
    fn policies_agree_on_the_last_line_of_a_sender() {
        let expenses = [
            line("Acme", "Hosting", dec!(1000)),
            line("Acme", "Laptop", dec!(500)),
        ];
        let original = nets(&[("Acme", dec!(7070.00))]);

        let cumulative = ExpenseAllocator::new(AllocationPolicy::CumulativeTotal)
            .allocate(&expenses, &original)
            .unwrap();
        let running = ExpenseAllocator::new(AllocationPolicy::RunningBalance)
            .allocate(&expenses, &original)
            .unwrap();

        assert_eq!(
            cumulative.lines.last().unwrap().net_after,
            running.lines.last().unwrap().net_after
        );
        assert_eq!(cumulative.total_net, running.total_net);
    }

    // =========================================================================
    // unknown sender
    // =========================================================================

    #[test]
    fn unknown_sender_is_rejected_before_any_allocation() {
        let allocator = ExpenseAllocator::default();
        let expenses = [
            line("Acme", "Hosting", dec!(100)),
            line("Nowhere Inc", "Travel", dec!(50)),
        ];

        let result = allocator.allocate(&expenses, &nets(&[("Acme", dec!(1000.00))]));

        assert_eq!(
            result,
            Err(AllocationError::UnknownSender("Nowhere Inc".to_string()))
        );
    }
}
