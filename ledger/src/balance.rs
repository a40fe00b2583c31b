//! Balance engine
//!
//! Derives each participant's net balance from the transaction history.
//! Balances are never stored; they are recomputed from records on demand.
//!
//! # Rules
//!
//! 1. Every participant in the universe starts at zero
//! 2. Expenses credit the payer with the full amount
//! 3. Allocations debit the participant with the allocated amount
//! 4. Completed settlements credit `from` and debit `to`
//!
//! Records naming a participant outside the universe are skipped; they
//! never create a balance entry.
//!
//! # Example
//!
//! ```text
//! Expense: Alice pays $90 dinner, split Alice/Bob/Carol $30 each
//! Settlement (completed): Bob pays Alice $30
//!
//! Balances:
//!   Alice: +$90 - $30 - $30 = +$30
//!   Bob:   -$30 + $30       =   $0
//!   Carol: -$30             = -$30
//! ```

use crate::{money, types::*};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Compute the per-participant breakdown (paid, share, settled in/out)
pub fn compute_positions(
    participants: &[ParticipantId],
    expenses: &[Expense],
    allocations: &[ExpenseAllocation],
    settlements: &[Settlement],
) -> BTreeMap<ParticipantId, ParticipantPosition> {
    let mut positions: BTreeMap<ParticipantId, ParticipantPosition> = participants
        .iter()
        .map(|id| (id.clone(), ParticipantPosition::new(id.clone())))
        .collect();

    for expense in expenses {
        match positions.get_mut(&expense.payer) {
            Some(position) => position.paid += expense.amount,
            None => tracing::debug!(
                "Skipping expense {}: payer {} not in event",
                expense.id,
                expense.payer
            ),
        }
    }

    for allocation in allocations {
        match positions.get_mut(&allocation.participant) {
            Some(position) => position.share += allocation.amount,
            None => tracing::debug!(
                "Skipping allocation on expense {}: {} not in event",
                allocation.expense_id,
                allocation.participant
            ),
        }
    }

    for settlement in settlements.iter().filter(|s| s.status.affects_balance()) {
        // Each side is applied independently; a known payer still gets
        // credit when the payee is outside the universe.
        if let Some(position) = positions.get_mut(&settlement.from) {
            position.settled_out += settlement.amount;
        } else {
            tracing::debug!("Settlement {}: payer {} not in event", settlement.id, settlement.from);
        }

        if let Some(position) = positions.get_mut(&settlement.to) {
            position.settled_in += settlement.amount;
        } else {
            tracing::debug!("Settlement {}: payee {} not in event", settlement.id, settlement.to);
        }
    }

    positions
}

/// Compute net balance for every participant in the universe
pub fn compute_balances(
    participants: &[ParticipantId],
    expenses: &[Expense],
    allocations: &[ExpenseAllocation],
    settlements: &[Settlement],
) -> BalanceMap {
    compute_positions(participants, expenses, allocations, settlements)
        .into_iter()
        .map(|(id, position)| (id, position.balance()))
        .collect()
}

/// Result of the conservation check over a balance map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityReport {
    /// Sum of all balances (zero for consistent input)
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,

    /// Participants checked
    pub participant_count: usize,
}

impl IntegrityReport {
    /// Check if money is conserved within tolerance
    pub fn is_balanced(&self) -> bool {
        money::is_negligible(self.total)
    }
}

/// Check that balances sum to zero
pub fn check_integrity(balances: &BalanceMap) -> IntegrityReport {
    let report = IntegrityReport {
        total: balances.values().copied().sum(),
        participant_count: balances.len(),
    };

    if !report.is_balanced() {
        tracing::warn!(
            "Balances sum to {} across {} participants; input is inconsistent",
            report.total,
            report.participant_count
        );
    }

    report
}

/// Expense whose allocations don't add up to its amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationMismatch {
    /// Expense ID
    pub expense_id: String,

    /// Expense amount
    #[serde(with = "rust_decimal::serde::str")]
    pub expense_amount: Decimal,

    /// Sum of its allocations
    #[serde(with = "rust_decimal::serde::str")]
    pub allocated: Decimal,
}

impl AllocationMismatch {
    /// Expense amount minus allocated sum
    pub fn difference(&self) -> Decimal {
        self.expense_amount - self.allocated
    }
}

/// List expenses whose allocations don't sum to the expense amount
pub fn check_allocation_totals(
    expenses: &[Expense],
    allocations: &[ExpenseAllocation],
) -> Vec<AllocationMismatch> {
    let mut allocated: HashMap<&str, Decimal> = HashMap::new();
    for allocation in allocations {
        *allocated.entry(allocation.expense_id.as_str()).or_insert(Decimal::ZERO) +=
            allocation.amount;
    }

    let mismatches: Vec<AllocationMismatch> = expenses
        .iter()
        .filter_map(|expense| {
            let sum = allocated
                .get(expense.id.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);

            (!money::is_negligible(expense.amount - sum)).then(|| AllocationMismatch {
                expense_id: expense.id.clone(),
                expense_amount: expense.amount,
                allocated: sum,
            })
        })
        .collect();

    for mismatch in &mismatches {
        tracing::warn!(
            "Expense {} allocates {} of {}",
            mismatch.expense_id,
            mismatch.allocated,
            mismatch.expense_amount
        );
    }

    mismatches
}
