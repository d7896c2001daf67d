use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use crate::error::{DataError, LabelTraderResult, SystemError};

/// Number of fraction digits balances are reported with.
pub const BALANCE_DECIMAL_PLACES: u32 = 2;

/// Rounds `value` to `dp` fraction digits, ties to even.
///
/// Ties are decided on the exact binary value, so `2.675` (stored just below the tie) rounds
/// down to `2.67`. Finite values beyond the range of [`Decimal`] carry no fraction digits and
/// are returned unchanged.
///
/// # Errors
/// - `DataError::InvalidInput` if `value` is NaN or infinite.
/// - `SystemError::InvariantViolation` if the rounded decimal does not fit back into an `f64`.
pub fn round_dp(value: f64, dp: u32) -> LabelTraderResult<f64> {
    if !value.is_finite() {
        return Err(DataError::InvalidInput(format!("Cannot round non-finite value: {value}")).into());
    }
    let Some(dec) = Decimal::from_f64_retain(value) else {
        return Ok(value);
    };

    let rounded = dec.round_dp_with_strategy(dp, RoundingStrategy::MidpointNearestEven);
    rounded.to_f64().ok_or_else(|| {
        SystemError::InvariantViolation(format!(
            "Rounded decimal {rounded} cannot be represented as f64"
        ))
        .into()
    })
}
