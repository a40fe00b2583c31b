//! Money precision utilities
//!
//! Amounts are accumulated at full decimal precision and rounded to cents
//! only when a transfer is emitted or a value is presented.

use crate::{Error, Result};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Cent precision used for emitted transfers
pub const CENT_SCALE: u32 = 2;

/// Tolerance at or below which a balance or transfer is treated as zero (0.01)
pub const EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, CENT_SCALE);

/// Check if an amount is effectively zero (within [`EPSILON`], inclusive)
pub fn is_negligible(amount: Decimal) -> bool {
    amount.abs() <= EPSILON
}

/// Round to cents, half away from zero
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Convert a binary float from an untyped source, rejecting NaN and infinities
pub fn amount_from_f64(raw: f64) -> Result<Decimal> {
    if !raw.is_finite() {
        return Err(Error::InvalidAmount(format!("non-finite value {}", raw)));
    }

    Decimal::from_f64(raw)
        .ok_or_else(|| Error::InvalidAmount(format!("{} is out of range", raw)))
}

/// Require a strictly positive amount
pub fn ensure_positive(amount: Decimal, what: &str) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "{} must be positive, got {}",
            what, amount
        )));
    }
    Ok(amount)
}

/// Require a zero or positive amount
pub fn ensure_non_negative(amount: Decimal, what: &str) -> Result<Decimal> {
    if amount < Decimal::ZERO {
        return Err(Error::InvalidAmount(format!(
            "{} must not be negative, got {}",
            what, amount
        )));
    }
    Ok(amount)
}

/// Split `amount` into `parts` cent-exact shares that sum back to `amount`.
///
/// Leftover cents are handed out one each to the leading shares.
pub fn split_cents(amount: Decimal, parts: usize) -> Result<Vec<Decimal>> {
    if parts == 0 {
        return Err(Error::EmptySplit);
    }
    ensure_positive(amount, "expense amount")?;
    if amount.normalize().scale() > CENT_SCALE {
        return Err(Error::InvalidAmount(format!(
            "{} has more than {} decimal places",
            amount, CENT_SCALE
        )));
    }

    let count = Decimal::from(parts as u64);
    let base = (amount / count).round_dp_with_strategy(CENT_SCALE, RoundingStrategy::ToZero);
    let leftover_cents = ((amount - base * count) / EPSILON)
        .to_usize()
        .ok_or_else(|| Error::InvalidAmount(format!("cannot split {}", amount)))?;

    Ok((0..parts)
        .map(|i| if i < leftover_cents { base + EPSILON } else { base })
        .collect())
}
