//! Money helpers
//!
//! Stored discount amounts are kept in minor units. These helpers move between minor units,
//! decimal major units and `Money` values without ever going through floats.

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors raised while doing discount arithmetic.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A line item was priced in a different currency from the cart.
    #[error("currency mismatch: expected {expected}, found {found}")]
    CurrencyMismatch {
        /// Currency of the cart
        expected: String,

        /// Currency of the offending item
        found: String,
    },

    /// An amount exceeded the range that can be represented in minor units.
    #[error("amount overflowed the supported range")]
    Overflow,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A major-unit amount had more decimal places than the currency allows.
    #[error("amount {amount} has more precision than {currency} supports")]
    Precision {
        /// The offending amount
        amount: Decimal,

        /// Currency code
        currency: String,
    },

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculate `percentage` percent (points, `0..=100`) of a minor unit amount.
///
/// # Errors
///
/// Returns [`EngineError::PercentConversion`] if the calculation overflows.
pub fn percent_of_minor(percentage: Decimal, minor: i64) -> Result<i64, EngineError> {
    let minor = Decimal::from_i64(minor).ok_or(EngineError::PercentConversion)?;

    percentage
        .checked_mul(minor)
        .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
        .ok_or(EngineError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(EngineError::PercentConversion)
}

/// Convert a major-unit decimal (e.g. `12.50`) into minor units for `currency`.
///
/// # Errors
///
/// Returns [`EngineError::Precision`] if `amount` has more decimal places than the currency, or
/// [`EngineError::Overflow`] if it does not fit in an `i64`.
pub fn minor_from_decimal(amount: Decimal, currency: &Currency) -> Result<i64, EngineError> {
    let scaled = amount
        .checked_mul(scale(currency)?)
        .ok_or(EngineError::Overflow)?;

    if scaled.fract() != Decimal::ZERO {
        return Err(EngineError::Precision {
            amount,
            currency: currency.iso_alpha_code.to_string(),
        });
    }

    scaled.to_i64().ok_or(EngineError::Overflow)
}

/// Convert minor units into a major-unit decimal for `currency`.
pub fn decimal_from_minor(minor: i64, currency: &Currency) -> Decimal {
    Decimal::new(minor, currency.exponent)
}

/// Build a `Money` from an unsigned stored amount.
///
/// # Errors
///
/// Returns [`EngineError::Overflow`] if the amount does not fit in an `i64`.
pub fn money_from_stored(minor: u64, currency: &Currency) -> Result<Money<'_, Currency>, EngineError> {
    let minor = i64::try_from(minor).map_err(|_overflow| EngineError::Overflow)?;

    Ok(Money::from_minor(minor, currency))
}

fn scale(currency: &Currency) -> Result<Decimal, EngineError> {
    let factor = 10_i64
        .checked_pow(currency.exponent)
        .ok_or(EngineError::Overflow)?;

    Ok(Decimal::from(factor))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{JPY, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn percent_of_minor_calculates_correctly() -> TestResult {
        assert_eq!(percent_of_minor(Decimal::new(25, 0), 200)?, 50);
        assert_eq!(percent_of_minor(Decimal::TEN, 100_000)?, 10_000);

        Ok(())
    }

    #[test]
    fn percent_of_minor_rounds_half_away_from_zero() -> TestResult {
        // 15% of 3.30 is 0.495
        assert_eq!(percent_of_minor(Decimal::new(15, 0), 330)?, 50);

        Ok(())
    }

    #[test]
    fn percent_of_minor_overflow_returns_error() {
        let result = percent_of_minor(Decimal::MAX, i64::MAX);

        assert!(matches!(result, Err(EngineError::PercentConversion)));
    }

    #[test]
    fn minor_from_decimal_scales_by_exponent() -> TestResult {
        assert_eq!(minor_from_decimal(Decimal::new(1250, 2), USD)?, 1250);
        assert_eq!(minor_from_decimal(Decimal::new(1000, 0), JPY)?, 1000);

        Ok(())
    }

    #[test]
    fn minor_from_decimal_rejects_excess_precision() {
        let result = minor_from_decimal(Decimal::new(1005, 3), USD);

        assert!(matches!(result, Err(EngineError::Precision { .. })));
    }

    #[test]
    fn decimal_from_minor_restores_major_units() {
        assert_eq!(decimal_from_minor(1999, USD), Decimal::new(1999, 2));
    }

    #[test]
    fn money_from_stored_rejects_out_of_range() {
        assert!(matches!(
            money_from_stored(u64::MAX, USD),
            Err(EngineError::Overflow)
        ));
    }
}
