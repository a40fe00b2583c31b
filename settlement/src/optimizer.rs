//! Settlement optimizer
//!
//! Turns a balance map into a short list of transfers that zeroes every
//! balance.
//!
//! # Algorithm
//!
//! Greedy largest-to-largest matching:
//!
//! 1. Split participants into creditors (owed money) and debtors (owe money),
//!    dropping negligible balances
//! 2. Sort creditors descending, debtors most negative first
//! 3. Match the current creditor with the current debtor for the smaller of
//!    the two amounts, then advance whichever side reached zero
//!
//! Each step settles at least one participant, so a plan never has more
//! transfers than there are unsettled participants. The heuristic is not
//! guaranteed minimal; finding the true minimum is NP-hard.
//!
//! Both sides move by the cent-rounded transfer amount, so balances carrying
//! fractions of a cent can leave the last counterparty with a residual above
//! one cent. It is reported in [`SettlementPlan::unsettled`].
//!
//! # Example
//!
//! ```text
//! Balances:
//!   A: +$50 (creditor)
//!   B: +$30 (creditor)
//!   C: -$80 (debtor)
//!
//! Transfers:
//!   C pays A: $50
//!   C pays B: $30
//!
//! 3 unsettled participants → 2 transfers
//! ```

use crate::types::*;
use rust_decimal::Decimal;
use splitify_ledger::{money, BalanceMap, ParticipantId};

/// Compute a settlement plan for `balances`.
///
/// Works on copies; `balances` is never modified. When creditor and debtor
/// totals don't cancel, whatever is left is reported in
/// [`SettlementPlan::unsettled`] rather than guessed away.
pub fn optimize_settlements(balances: &BalanceMap) -> SettlementPlan {
    let mut creditors = collect_side(balances, |b| b > Decimal::ZERO);
    let mut debtors = collect_side(balances, |b| b < Decimal::ZERO);
    let original_transactions = creditors.len() + debtors.len();

    creditors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    debtors.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    let mut transfers = Vec::with_capacity(original_transactions.saturating_sub(1));
    let (mut ci, mut di) = (0, 0);

    while ci < creditors.len() && di < debtors.len() {
        let (creditor, credit) = &mut creditors[ci];
        let (debtor, debt) = &mut debtors[di];

        let settle_amount = money::round_cents((*credit).min(debt.abs()));
        if money::is_negligible(settle_amount) {
            break;
        }

        transfers.push(Transfer {
            from: debtor.clone(),
            to: creditor.clone(),
            amount: settle_amount,
        });

        // The emitted (rounded) amount is what actually moves
        *credit -= settle_amount;
        *debt += settle_amount;

        if money::is_negligible(*credit) {
            ci += 1;
        }
        if money::is_negligible(*debt) {
            di += 1;
        }
    }

    let unsettled: Vec<Residual> = creditors[ci..]
        .iter()
        .chain(debtors[di..].iter())
        .filter(|(_, amount)| !money::is_negligible(*amount))
        .map(|(participant, amount)| Residual {
            participant: participant.clone(),
            amount: *amount,
        })
        .collect();

    if !unsettled.is_empty() {
        tracing::warn!(
            "Settlement plan leaves {} participants unsettled; balances do not cancel",
            unsettled.len()
        );
    }

    tracing::debug!(
        "Optimized {} unsettled participants into {} transfers",
        original_transactions,
        transfers.len()
    );

    SettlementPlan {
        total_transactions: transfers.len(),
        transfers,
        original_transactions,
        unsettled,
        ..SettlementPlan::empty()
    }
}

/// Copy out the non-negligible balances matching `side`
fn collect_side(
    balances: &BalanceMap,
    side: impl Fn(Decimal) -> bool,
) -> Vec<(ParticipantId, Decimal)> {
    balances
        .iter()
        .filter(|&(_, &balance)| side(balance) && !money::is_negligible(balance))
        .map(|(id, &balance)| (id.clone(), balance))
        .collect()
}
