//! Boundary validation for ledger input
//!
//! Records are checked here, before they reach the balance engine, so the
//! algorithms themselves never see malformed data.

use crate::{
    balance,
    config::{UnknownParticipantPolicy, ValidationConfig},
    money,
    types::*,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Records for one event, as mapped from storage by the host application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerInput {
    /// Participants of the event (the balance universe)
    pub participants: Vec<ParticipantId>,

    /// Expenses
    #[serde(default)]
    pub expenses: Vec<Expense>,

    /// Expense allocations
    #[serde(default)]
    pub allocations: Vec<ExpenseAllocation>,

    /// Settlements in any status
    #[serde(default)]
    pub settlements: Vec<Settlement>,
}

impl LedgerInput {
    /// Validate against `config`
    pub fn validate(&self, config: &ValidationConfig) -> Result<()> {
        validate_input(self, config)
    }

    /// Net balance per participant
    pub fn balances(&self) -> BalanceMap {
        balance::compute_balances(
            &self.participants,
            &self.expenses,
            &self.allocations,
            &self.settlements,
        )
    }

    /// Currency shared by every expense, if any expense exists
    pub fn currency(&self) -> Option<Currency> {
        self.expenses.first().map(|e| e.currency)
    }
}

/// Validate ledger input.
///
/// Fails on the first problem found; integrity issues that are not input
/// errors (allocations not summing to the expense) are left to
/// [`balance::check_allocation_totals`].
pub fn validate_input(input: &LedgerInput, config: &ValidationConfig) -> Result<()> {
    let mut universe = HashSet::with_capacity(input.participants.len());
    for participant in &input.participants {
        if !universe.insert(participant) {
            return Err(Error::DuplicateParticipant(participant.clone()));
        }
    }

    let check_participant = |id: &ParticipantId| -> Result<()> {
        match config.unknown_participants {
            UnknownParticipantPolicy::Reject if !universe.contains(id) => {
                Err(Error::UnknownParticipant(id.clone()))
            }
            _ => Ok(()),
        }
    };

    let mut expense_ids = HashSet::with_capacity(input.expenses.len());
    let currency = input.currency();
    for expense in &input.expenses {
        if !expense_ids.insert(expense.id.as_str()) {
            return Err(Error::DuplicateExpense(expense.id.clone()));
        }
        money::ensure_positive(expense.amount, "expense amount")?;
        check_participant(&expense.payer)?;

        if let Some(expected) = currency {
            if expense.currency != expected {
                return Err(Error::MixedCurrency {
                    expected,
                    found: expense.currency,
                });
            }
        }
    }

    for allocation in &input.allocations {
        if !expense_ids.contains(allocation.expense_id.as_str()) {
            return Err(Error::UnknownExpense(allocation.expense_id.clone()));
        }
        money::ensure_non_negative(allocation.amount, "allocation amount")?;
        check_participant(&allocation.participant)?;
    }

    for settlement in &input.settlements {
        money::ensure_positive(settlement.amount, "settlement amount")?;
        if settlement.from == settlement.to {
            return Err(Error::SelfSettlement(settlement.from.clone()));
        }
        check_participant(&settlement.from)?;
        check_participant(&settlement.to)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn trip() -> LedgerInput {
        let people: Vec<ParticipantId> = ["alice", "bob"].iter().map(|p| (*p).into()).collect();
        let expense = Expense::new("gas", "alice", dec!(40.00), Currency::USD);
        let allocations = expense.split_evenly(&people).unwrap();

        LedgerInput {
            participants: people,
            expenses: vec![expense],
            allocations,
            settlements: vec![],
        }
    }

    #[test]
    fn test_valid_input() {
        let input = trip();
        assert!(input.validate(&ValidationConfig::default()).is_ok());
        assert_eq!(input.balances()[&ParticipantId::new("alice")], dec!(20.00));
    }

    #[test]
    fn test_unknown_participant_policy() {
        let mut input = trip();
        input
            .allocations
            .push(ExpenseAllocation::new("gas", "mallory", dec!(5.00)));

        let strict = ValidationConfig::default();
        assert_eq!(
            input.validate(&strict),
            Err(Error::UnknownParticipant(ParticipantId::new("mallory")))
        );

        let lenient = ValidationConfig {
            unknown_participants: UnknownParticipantPolicy::Ignore,
            ..Default::default()
        };
        assert!(input.validate(&lenient).is_ok());
    }

    #[test]
    fn test_rejects_bad_amounts() {
        let mut input = trip();
        input.expenses[0].amount = dec!(0);
        assert!(matches!(
            input.validate(&ValidationConfig::default()),
            Err(Error::InvalidAmount(_))
        ));

        let mut input = trip();
        input.allocations[0].amount = dec!(-1.00);
        assert!(matches!(
            input.validate(&ValidationConfig::default()),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_rejects_structural_problems() {
        let config = ValidationConfig::default();

        let mut input = trip();
        input.participants.push(ParticipantId::new("bob"));
        assert_eq!(
            input.validate(&config),
            Err(Error::DuplicateParticipant(ParticipantId::new("bob")))
        );

        let mut input = trip();
        input
            .allocations
            .push(ExpenseAllocation::new("hotel", "bob", dec!(1.00)));
        assert_eq!(input.validate(&config), Err(Error::UnknownExpense("hotel".to_string())));

        let mut input = trip();
        input
            .expenses
            .push(Expense::new("museum", "bob", dec!(12.00), Currency::EUR));
        assert_eq!(
            input.validate(&config),
            Err(Error::MixedCurrency {
                expected: Currency::USD,
                found: Currency::EUR,
            })
        );

        let mut input = trip();
        input
            .settlements
            .push(Settlement::pending("bob", "bob", dec!(1.00), PaymentMethod::Cash));
        assert_eq!(
            input.validate(&config),
            Err(Error::SelfSettlement(ParticipantId::new("bob")))
        );
    }

    #[test]
    fn test_input_from_json() {
        let json = r#"{
            "participants": ["alice", "bob"],
            "expenses": [{"id": "e1", "payer": "alice", "amount": "30.00", "currency": "USD"}],
            "allocations": [
                {"expense_id": "e1", "participant": "alice", "amount": "15.00"},
                {"expense_id": "e1", "participant": "bob", "amount": "15.00"}
            ]
        }"#;

        let input: LedgerInput = serde_json::from_str(json).unwrap();
        assert!(input.settlements.is_empty());
        assert!(input.validate(&ValidationConfig::default()).is_ok());
        assert_eq!(input.balances()[&ParticipantId::new("bob")], dec!(-15.00));
    }
}
