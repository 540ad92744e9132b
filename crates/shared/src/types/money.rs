//! Amount rules for money values.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount is a `rust_decimal::Decimal` with at most two fractional
//! digits, mirroring the `NUMERIC(11, 2)` storage columns.

use rust_decimal::Decimal;
use thiserror::Error;

/// Largest amount a `NUMERIC(11, 2)` column can hold.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_215_752_191, 23, 0, false, 2);

/// Number of fractional digits allowed in an amount.
pub const AMOUNT_SCALE: u32 = 2;

/// Violations of the amount rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Amount is zero or negative.
    #[error("Amount must be greater than zero")]
    NonPositive,

    /// Amount has more than two fractional digits.
    #[error("Amount cannot have more than two decimal places")]
    TooPrecise,

    /// Amount does not fit the storage column.
    #[error("Amount cannot exceed 999999999.99")]
    TooLarge,
}

/// Returns true if the amount has at most two significant fractional digits.
///
/// Trailing zeros do not count: `10.100` is accepted.
#[must_use]
pub fn has_cent_precision(amount: Decimal) -> bool {
    amount.normalize().scale() <= AMOUNT_SCALE
}

/// Validates a strictly positive money amount.
///
/// # Errors
///
/// Returns the first rule the amount breaks.
pub fn validate_amount(amount: Decimal) -> Result<(), AmountError> {
    if amount <= Decimal::ZERO {
        return Err(AmountError::NonPositive);
    }
    if !has_cent_precision(amount) {
        return Err(AmountError::TooPrecise);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_max_amount_value() {
        assert_eq!(MAX_AMOUNT, dec!(999999999.99));
    }

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(250.5))]
    #[case(dec!(10.100))]
    #[case(dec!(999999999.99))]
    fn test_valid_amounts(#[case] amount: Decimal) {
        assert_eq!(validate_amount(amount), Ok(()));
    }

    #[rstest]
    #[case(dec!(0), AmountError::NonPositive)]
    #[case(dec!(-5), AmountError::NonPositive)]
    #[case(dec!(10.001), AmountError::TooPrecise)]
    #[case(dec!(1000000000), AmountError::TooLarge)]
    fn test_invalid_amounts(#[case] amount: Decimal, #[case] expected: AmountError) {
        assert_eq!(validate_amount(amount), Err(expected));
    }
}
