//! Core types for the settlement engine

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use splitify_ledger::{
    AllocationMismatch, BalanceMap, ParticipantId, PaymentMethod, Settlement,
};
use uuid::Uuid;

/// Proposed payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    /// Debtor (pays)
    pub from: ParticipantId,

    /// Creditor (receives)
    pub to: ParticipantId,

    /// Amount, rounded to cents
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl Transfer {
    /// Create new transfer
    pub fn new(
        from: impl Into<ParticipantId>,
        to: impl Into<ParticipantId>,
        amount: Decimal,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Balance left over after the plan (only when input totals don't cancel)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residual {
    /// Participant
    pub participant: ParticipantId,

    /// Remaining balance
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Transfer plan that zeroes every balance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Plan ID
    pub plan_id: Uuid,

    /// Transfers, in emission order
    pub transfers: Vec<Transfer>,

    /// Number of transfers emitted
    pub total_transactions: usize,

    /// Participants with a non-zero balance before the plan
    pub original_transactions: usize,

    /// Balances the plan could not settle
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unsettled: Vec<Residual>,

    /// Computed timestamp
    pub computed_at: DateTime<Utc>,
}

impl SettlementPlan {
    /// Plan with no transfers
    pub fn empty() -> Self {
        Self {
            plan_id: Uuid::new_v4(),
            transfers: vec![],
            total_transactions: 0,
            original_transactions: 0,
            unsettled: vec![],
            computed_at: Utc::now(),
        }
    }

    /// Check if nothing needs to be paid
    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }

    /// Transfers avoided relative to one payment per unsettled participant
    pub fn transactions_saved(&self) -> usize {
        self.original_transactions
            .saturating_sub(self.total_transactions)
    }

    /// Total money moved by the plan
    pub fn total_amount(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }

    /// Transfers paid or received by `participant`
    pub fn transfers_for<'a>(
        &'a self,
        participant: &'a ParticipantId,
    ) -> impl Iterator<Item = &'a Transfer> + 'a {
        self.transfers
            .iter()
            .filter(move |t| &t.from == participant || &t.to == participant)
    }

    /// Balances after every transfer has been paid
    pub fn apply_to(&self, balances: &BalanceMap) -> BalanceMap {
        let mut after = balances.clone();

        for transfer in &self.transfers {
            if let Some(balance) = after.get_mut(&transfer.from) {
                *balance += transfer.amount;
            }
            if let Some(balance) = after.get_mut(&transfer.to) {
                *balance -= transfer.amount;
            }
        }

        after
    }

    /// New `pending` settlement records, one per transfer
    pub fn to_pending_settlements(&self, payment_method: PaymentMethod) -> Vec<Settlement> {
        self.transfers
            .iter()
            .map(|t| Settlement::pending(t.from.clone(), t.to.clone(), t.amount, payment_method))
            .collect()
    }
}

/// Non-fatal diagnostic attached to a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Balances don't sum to zero
    UnbalancedLedger {
        /// Sum of all balances
        #[serde(with = "rust_decimal::serde::str")]
        total: Decimal,
    },

    /// Expense allocations don't sum to the expense amount
    AllocationMismatch(AllocationMismatch),

    /// Balance the plan left unsettled
    UnsettledResidual(Residual),
}

/// Result of one settlement run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementReport {
    /// Computed plan
    pub plan: SettlementPlan,

    /// Balances the plan was computed from
    pub balances: BalanceMap,

    /// Integrity warnings
    #[serde(default)]
    pub warnings: Vec<Warning>,
}

impl SettlementReport {
    /// Check if the run produced no warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
