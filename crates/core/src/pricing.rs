//! Discount Pricing
//!
//! Works out what an eligible discount is worth. All arithmetic happens in minor units and the
//! result is always clamped to `[0, cart total]`.

use crate::{
    cart::Cart,
    discounts::{BuyXGetY, Discount, DiscountKind, GetsValue, OrderValue},
    evaluation::Qualification,
    money::{EngineError, percent_of_minor},
};

/// Discount amount in minor units for a discount that passed evaluation.
///
/// # Errors
///
/// Returns an [`EngineError`] if any intermediate amount overflows.
pub fn compute_amount(
    discount: &Discount,
    cart: &Cart<'_>,
    qualification: Qualification,
) -> Result<i64, EngineError> {
    let total = cart.summary().total;

    let amount = match (&discount.kind, qualification) {
        (DiscountKind::AmountOffOrder(rules), _) => match rules.value {
            OrderValue::Percentage(percentage) => percent_of_minor(percentage, total)?,
            OrderValue::FixedAmount(amount) => i64::try_from(amount).unwrap_or(i64::MAX),
        },
        (
            DiscountKind::BuyXGetY(rules),
            Qualification::BuyXGetY {
                discounted_units, ..
            },
        ) => gets_amount(rules, cart, discounted_units)?,
        (DiscountKind::BuyXGetY(_), Qualification::Order) => 0,
    };

    Ok(amount.clamp(0, total.max(0)))
}

/// Walk gets-qualifying lines in cart order, discounting up to `units` units.
fn gets_amount(rules: &BuyXGetY, cart: &Cart<'_>, units: u64) -> Result<i64, EngineError> {
    let mut remaining = units;
    let mut amount: i64 = 0;

    for item in cart.items() {
        if remaining == 0 {
            break;
        }

        if !rules.gets_items.matches(item) {
            continue;
        }

        let taken = remaining.min(u64::from(item.quantity()));
        remaining -= taken;

        let unit_price = item.unit_price().to_minor_units();
        let per_unit = match rules.gets_value {
            GetsValue::Free => unit_price,
            GetsValue::AmountOff(off) => i64::try_from(off).unwrap_or(i64::MAX).min(unit_price),
            GetsValue::Percentage(percentage) => percent_of_minor(percentage, unit_price)?,
        }
        .clamp(0, unit_price.max(0));

        let taken = i64::try_from(taken).map_err(|_overflow| EngineError::Overflow)?;

        amount = per_unit
            .checked_mul(taken)
            .and_then(|line| amount.checked_add(line))
            .ok_or(EngineError::Overflow)?;
    }

    Ok(amount)
}
