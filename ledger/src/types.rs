//! Core types for the expense ledger
//!
//! All types are designed for:
//! - Deterministic ordering (balance maps are `BTreeMap`s)
//! - Exact arithmetic (Decimal for money, serialized as strings)
//! - Validation at the boundary, not inside the algorithms

use crate::{money, Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Net balance per participant.
///
/// Positive = the group owes this participant, negative = they owe the group.
pub type BalanceMap = BTreeMap<ParticipantId, Decimal>;

/// Participant identifier (opaque, supplied by the host application)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Create new participant ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// ISO 4217 currency code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Currency {
    /// US Dollar
    #[default]
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// Canadian Dollar
    CAD,
    /// Australian Dollar
    AUD,
    /// Japanese Yen
    JPY,
    /// Indian Rupee
    INR,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::JPY => "JPY",
            Currency::INR => "INR",
        }
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "JPY" => Ok(Currency::JPY),
            "INR" => Ok(Currency::INR),
            other => Err(Error::Other(format!("Unsupported currency: {}", other))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Money paid by one participant on behalf of the group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Expense ID (opaque)
    pub id: String,

    /// Participant who paid
    pub payer: ParticipantId,

    /// Total amount paid
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Currency
    #[serde(default)]
    pub currency: Currency,

    /// Free-form description ("Dinner", "Gas", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Expense {
    /// Create new expense
    pub fn new(
        id: impl Into<String>,
        payer: impl Into<ParticipantId>,
        amount: Decimal,
        currency: Currency,
    ) -> Self {
        Self {
            id: id.into(),
            payer: payer.into(),
            amount,
            currency,
            description: None,
        }
    }

    /// Split this expense evenly across `participants`.
    ///
    /// Leftover cents go one each to the first participants, so the
    /// allocations always sum to exactly `amount`.
    pub fn split_evenly(&self, participants: &[ParticipantId]) -> Result<Vec<ExpenseAllocation>> {
        let shares = money::split_cents(self.amount, participants.len())?;

        Ok(participants
            .iter()
            .zip(shares)
            .map(|(participant, amount)| ExpenseAllocation {
                expense_id: self.id.clone(),
                participant: participant.clone(),
                amount,
            })
            .collect())
    }
}

/// Portion of one expense assigned to one participant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseAllocation {
    /// Expense this allocation belongs to
    pub expense_id: String,

    /// Participant responsible for the portion
    pub participant: ParticipantId,

    /// Allocated amount
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

impl ExpenseAllocation {
    /// Create new allocation
    pub fn new(
        expense_id: impl Into<String>,
        participant: impl Into<ParticipantId>,
        amount: Decimal,
    ) -> Self {
        Self {
            expense_id: expense_id.into(),
            participant: participant.into(),
            amount,
        }
    }
}

/// Settlement lifecycle
///
/// ```text
/// Pending -> Requested -> Completed
///    |           |
///    +-----------+-----> Cancelled
/// ```
///
/// `Pending -> Completed` is allowed for payments marked as done directly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementStatus {
    /// Proposed, nobody has acted on it
    #[default]
    Pending,
    /// Payee asked the payer to pay
    Requested,
    /// Money changed hands
    Completed,
    /// Abandoned
    Cancelled,
}

impl SettlementStatus {
    /// Lowercase status name
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Requested => "requested",
            SettlementStatus::Completed => "completed",
            SettlementStatus::Cancelled => "cancelled",
        }
    }

    /// Only completed settlements are ledger facts
    pub fn affects_balance(&self) -> bool {
        matches!(self, SettlementStatus::Completed)
    }

    /// No further transitions possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, SettlementStatus::Completed | SettlementStatus::Cancelled)
    }

    /// Check if `next` is a legal successor
    pub fn can_transition_to(&self, next: SettlementStatus) -> bool {
        use SettlementStatus::*;

        matches!(
            (self, next),
            (Pending, Requested)
                | (Pending, Completed)
                | (Requested, Completed)
                | (Pending, Cancelled)
                | (Requested, Cancelled)
        )
    }
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a settlement is paid outside the app
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash
    #[default]
    Cash,
    /// Venmo
    Venmo,
    /// PayPal
    #[serde(rename = "paypal")]
    PayPal,
    /// Bank transfer
    BankTransfer,
    /// Anything else
    Other,
}

impl FromStr for PaymentMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "venmo" => Ok(PaymentMethod::Venmo),
            "paypal" => Ok(PaymentMethod::PayPal),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "other" => Ok(PaymentMethod::Other),
            other => Err(Error::Other(format!("Unknown payment method: {}", other))),
        }
    }
}

/// Payment from one participant to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Settlement ID
    pub id: Uuid,

    /// Payer
    pub from: ParticipantId,

    /// Payee
    pub to: ParticipantId,

    /// Amount paid
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,

    /// Lifecycle status
    #[serde(default)]
    pub status: SettlementStatus,

    /// Payment method
    #[serde(default)]
    pub payment_method: PaymentMethod,

    /// Proof-of-payment image URL (blob store)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_url: Option<String>,

    /// Created timestamp
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Settlement {
    /// Create a new pending settlement
    pub fn pending(
        from: impl Into<ParticipantId>,
        to: impl Into<ParticipantId>,
        amount: Decimal,
        payment_method: PaymentMethod,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: from.into(),
            to: to.into(),
            amount,
            status: SettlementStatus::Pending,
            payment_method,
            proof_url: None,
            created_at: Utc::now(),
        }
    }

    /// Move to `next` status, rejecting illegal transitions
    pub fn transition(&mut self, next: SettlementStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;
        Ok(())
    }

    /// Mark as paid, attaching an optional proof URL
    pub fn complete(&mut self, proof_url: Option<String>) -> Result<()> {
        self.transition(SettlementStatus::Completed)?;
        if proof_url.is_some() {
            self.proof_url = proof_url;
        }
        Ok(())
    }
}

/// Per-participant breakdown behind a balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantPosition {
    /// Participant
    pub participant: ParticipantId,

    /// Total expenses paid
    #[serde(with = "rust_decimal::serde::str")]
    pub paid: Decimal,

    /// Total allocated share
    #[serde(with = "rust_decimal::serde::str")]
    pub share: Decimal,

    /// Completed settlements sent
    #[serde(with = "rust_decimal::serde::str")]
    pub settled_out: Decimal,

    /// Completed settlements received
    #[serde(with = "rust_decimal::serde::str")]
    pub settled_in: Decimal,
}

impl ParticipantPosition {
    /// Create new zero position
    pub fn new(participant: ParticipantId) -> Self {
        Self {
            participant,
            paid: Decimal::ZERO,
            share: Decimal::ZERO,
            settled_out: Decimal::ZERO,
            settled_in: Decimal::ZERO,
        }
    }

    /// Net balance (positive = owed money, negative = owes money)
    pub fn balance(&self) -> Decimal {
        self.paid - self.share + self.settled_out - self.settled_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_participant_position() {
        let mut position = ParticipantPosition::new(ParticipantId::new("alice"));

        // Paid $90 dinner, share $30
        position.paid += dec!(90.00);
        position.share += dec!(30.00);
        assert_eq!(position.balance(), dec!(60.00));

        // Received $60 from the others
        position.settled_in += dec!(60.00);
        assert_eq!(position.balance(), Decimal::ZERO);

        // Paid Bob back $10 too much
        position.settled_out += dec!(10.00);
        assert_eq!(position.balance(), dec!(10.00));
    }

    #[test]
    fn test_status_transitions() {
        use SettlementStatus::*;

        assert!(Pending.can_transition_to(Requested));
        assert!(Pending.can_transition_to(Completed));
        assert!(Requested.can_transition_to(Completed));
        assert!(Requested.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Requested.can_transition_to(Pending));

        assert!(Completed.is_terminal());
        assert!(Completed.affects_balance());
        assert!(!Requested.affects_balance());
    }

    #[test]
    fn test_settlement_lifecycle() {
        let mut settlement = Settlement::pending("bob", "alice", dec!(25.00), PaymentMethod::Venmo);
        settlement.transition(SettlementStatus::Requested).unwrap();
        settlement
            .complete(Some("https://blobs.example/proof.png".to_string()))
            .unwrap();

        assert_eq!(settlement.status, SettlementStatus::Completed);
        assert!(settlement.proof_url.is_some());

        let err = settlement.transition(SettlementStatus::Cancelled).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidTransition {
                from: SettlementStatus::Completed,
                to: SettlementStatus::Cancelled,
            }
        );
    }

    #[test]
    fn test_split_evenly_distributes_leftover_cents() {
        let expense = Expense::new("e1", "alice", dec!(100.00), Currency::USD);
        let people: Vec<ParticipantId> = ["alice", "bob", "carol"]
            .iter()
            .map(|p| (*p).into())
            .collect();

        let allocations = expense.split_evenly(&people).unwrap();
        let amounts: Vec<Decimal> = allocations.iter().map(|a| a.amount).collect();

        assert_eq!(amounts, vec![dec!(33.34), dec!(33.33), dec!(33.33)]);
        assert_eq!(amounts.iter().sum::<Decimal>(), dec!(100.00));
        assert!(allocations.iter().all(|a| a.expense_id == "e1"));
    }

    #[test]
    fn test_settlement_json_uses_string_amounts() {
        let json = r#"{
            "id": "6f1c2b7e-3a0e-4c8b-9b1d-2f1e0c7a9d11",
            "from": "bob",
            "to": "alice",
            "amount": "12.50",
            "status": "requested",
            "payment_method": "paypal"
        }"#;

        let settlement: Settlement = serde_json::from_str(json).unwrap();
        assert_eq!(settlement.amount, dec!(12.50));
        assert_eq!(settlement.status, SettlementStatus::Requested);
        assert_eq!(settlement.payment_method, PaymentMethod::PayPal);

        let raw_float = json.replace("\"12.50\"", "12.5");
        assert!(serde_json::from_str::<Settlement>(&raw_float).is_err());
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::USD);
        assert_eq!(Currency::EUR.to_string(), "EUR");
        assert!("XYZ".parse::<Currency>().is_err());
    }
}
