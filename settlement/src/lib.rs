//! Splitify Settlement Engine
//!
//! Turns an event's expense history into a short list of payments that
//! settles every participant.
//!
//! # Architecture
//!
//! A settlement run goes through four steps:
//!
//! 1. **Validation**: Reject malformed records at the boundary
//! 2. **Balances**: Derive net balance per participant from the ledger
//! 3. **Diagnostics**: Flag unbalanced ledgers and under-allocated expenses
//! 4. **Optimization**: Match debtors with creditors, largest first
//!
//! The plan is ephemeral; the host application persists accepted transfers
//! as new `pending` settlements.
//!
//! # Example
//!
//! ```
//! use rust_decimal::Decimal;
//! use splitify_ledger::ParticipantId;
//! use splitify_settlement::{optimize_settlements, BalanceMap};
//!
//! let balances: BalanceMap = [("A", 100), ("B", -60), ("C", -40)]
//!     .into_iter()
//!     .map(|(id, b)| (ParticipantId::new(id), Decimal::from(b)))
//!     .collect();
//!
//! let plan = optimize_settlements(&balances);
//! assert_eq!(plan.total_transactions, 2);
//! assert_eq!(plan.original_transactions, 3);
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod optimizer;
pub mod error;
pub mod config;
pub mod metrics;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use engine::SettlementEngine;
pub use optimizer::optimize_settlements;
pub use splitify_ledger::{compute_balances, BalanceMap};
