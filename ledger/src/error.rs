//! Error types for the expense ledger

use crate::types::{Currency, ParticipantId, SettlementStatus};
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every variant is an input-validation failure raised at the boundary,
/// before records reach the balance engine or the optimizer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed, non-finite or out-of-range amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Record references a participant outside the event
    #[error("Unknown participant: {0}")]
    UnknownParticipant(ParticipantId),

    /// Participant listed twice in the universe
    #[error("Duplicate participant: {0}")]
    DuplicateParticipant(ParticipantId),

    /// Expense ID used twice
    #[error("Duplicate expense: {0}")]
    DuplicateExpense(String),

    /// Allocation references an expense that was not supplied
    #[error("Unknown expense: {0}")]
    UnknownExpense(String),

    /// Expenses in one run use different currencies
    #[error("Mixed currencies: expected {expected}, found {found}")]
    MixedCurrency {
        /// Currency of the first expense
        expected: Currency,
        /// Offending currency
        found: Currency,
    },

    /// Settlement paid by a participant to themselves
    #[error("Settlement from {0} to itself")]
    SelfSettlement(ParticipantId),

    /// Illegal settlement lifecycle change
    #[error("Invalid settlement transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: SettlementStatus,
        /// Requested status
        to: SettlementStatus,
    },

    /// Split requested across zero participants
    #[error("Cannot split an expense across zero participants")]
    EmptySplit,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
