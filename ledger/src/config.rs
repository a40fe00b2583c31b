//! Validation policy for ledger input

use crate::Error;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do with records naming a participant outside the event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownParticipantPolicy {
    /// Skip the record when computing balances
    Ignore,
    /// Fail validation with `Error::UnknownParticipant`
    #[default]
    Reject,
}

impl FromStr for UnknownParticipantPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(Error::Config(format!(
                "unknown participant policy must be 'ignore' or 'reject', got '{}'",
                other
            ))),
        }
    }
}

/// Boundary validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Policy for unknown participant references
    pub unknown_participants: UnknownParticipantPolicy,

    /// Report expenses whose allocations don't add up to the expense amount
    pub check_allocation_totals: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            unknown_participants: UnknownParticipantPolicy::Reject,
            check_allocation_totals: true,
        }
    }
}
