//! Splitify Ledger
//!
//! Expense-sharing records and the balance engine that derives who owes whom.
//!
//! # Architecture
//!
//! - **Derived balances**: Balances are recomputed from expenses, allocations
//!   and completed settlements; they are never stored
//! - **Exact arithmetic**: All money is `Decimal`, rounded to cents only when
//!   presented or turned into a transfer
//! - **Boundary validation**: Malformed records are rejected by
//!   [`validate_input`] before any computation
//!
//! # Invariants
//!
//! - Money conservation: Σ(balances) == 0 when every expense is fully allocated
//! - Deterministic: Same records → same balances, in participant order
//! - Only `completed` settlements are ledger facts
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use splitify_ledger::{compute_balances, Currency, Expense, ParticipantId};
//!
//! let people = vec![ParticipantId::new("alice"), ParticipantId::new("bob")];
//! let lunch = Expense::new("lunch", "alice", Decimal::new(3000, 2), Currency::USD);
//! let allocations = lunch.split_evenly(&people).unwrap();
//!
//! let balances = compute_balances(&people, &[lunch], &allocations, &[]);
//! assert_eq!(balances[&ParticipantId::new("bob")], Decimal::new(-1500, 2));
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod money;
pub mod balance;
pub mod validation;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use types::{
    BalanceMap, Currency, Expense, ExpenseAllocation, ParticipantId, ParticipantPosition,
    PaymentMethod, Settlement, SettlementStatus,
};
pub use balance::{
    check_allocation_totals, check_integrity, compute_balances, compute_positions,
    AllocationMismatch, IntegrityReport,
};
pub use validation::{validate_input, LedgerInput};
pub use config::{UnknownParticipantPolicy, ValidationConfig};
pub use money::EPSILON;
