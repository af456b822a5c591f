//! Eligibility Evaluation
//!
//! Checks run in a fixed order and stop at the first failure: customer eligibility, purchase
//! threshold, usage limits, then the active window.

use std::fmt;

use jiff::civil::DateTime;
use rust_decimal::Decimal;

use crate::{
    cart::{Cart, CartSummary},
    customers::Customer,
    discounts::{
        AmountOffOrder, BuyXGetY, BuysRequirement, Discount, DiscountKind, Method,
        MinimumPurchase, UsageLimits, WindowStatus,
    },
    money::{EngineError, decimal_from_minor},
};

/// Advisory view of the usage ledger at validation time.
///
/// Recording usage is authoritative; this snapshot only lets validation give an early answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageSnapshot {
    /// Number of recorded redemptions of the discount
    pub total_uses: u64,

    /// Whether the customer has a recorded redemption
    pub used_by_customer: bool,
}

/// Everything a discount is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'c, 'a> {
    /// Cart being checked out
    pub cart: &'c Cart<'a>,

    /// Customer checking out
    pub customer: &'c Customer,

    /// Store-local wall clock time
    pub now: DateTime,
}

/// Why a discount applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualification {
    /// Order-level discount applies to the whole cart
    Order,

    /// Buy-X-get-Y threshold met
    BuyXGetY {
        /// Satisfied threshold multiples, after the per-order cap
        applications: u64,

        /// Units that receive the discount
        discounted_units: u64,
    },
}

/// Why a discount does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Customer is not targeted
    CustomerNotEligible,

    /// Cart total below the minimum amount (major units)
    MinimumAmount(Decimal),

    /// Cart quantity below the minimum
    MinimumQuantity(u32),

    /// Buys-qualifying lines total below the requirement (major units)
    BuysAmount(Decimal),

    /// Too few buys-qualifying units
    BuysQuantity(u32),

    /// Threshold met but nothing in the cart can be discounted
    NoQualifyingGetsItems,

    /// Code has been redeemed as often as allowed
    UsageLimitReached,

    /// Customer has already redeemed the code
    AlreadyUsed,

    /// Window has not started
    NotYetActive,

    /// Window has ended
    Expired,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::CustomerNotEligible => f.write_str("You are not eligible for this discount"),
            Rejection::MinimumAmount(amount) => {
                write!(f, "Minimum purchase amount of {amount} required")
            }
            Rejection::MinimumQuantity(quantity) => {
                write!(f, "Minimum purchase quantity of {quantity} items required")
            }
            Rejection::BuysAmount(amount) => {
                write!(f, "Spend at least {amount} on qualifying items to receive this discount")
            }
            Rejection::BuysQuantity(quantity) => {
                write!(f, "Buy at least {quantity} qualifying items to receive this discount")
            }
            Rejection::NoQualifyingGetsItems => {
                f.write_str("Add a qualifying item to receive this discount")
            }
            Rejection::UsageLimitReached => {
                f.write_str("This discount code has reached its usage limit")
            }
            Rejection::AlreadyUsed => f.write_str("You have already used this discount code"),
            Rejection::NotYetActive => f.write_str("This discount is not yet active"),
            Rejection::Expired => f.write_str("This discount has expired"),
        }
    }
}

/// Outcome of evaluating one discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Discount applies
    Eligible(Qualification),

    /// Discount does not apply
    Rejected(Rejection),
}

impl Evaluation {
    /// Whether the discount applies.
    pub fn is_eligible(&self) -> bool {
        matches!(self, Evaluation::Eligible(_))
    }
}

/// Evaluate a discount against a cart and customer.
///
/// Usage limits are only consulted for code discounts.
///
/// # Errors
///
/// Returns an [`EngineError`] if cart totals overflow.
pub fn evaluate(
    discount: &Discount,
    context: &EvaluationContext<'_, '_>,
    usage: &UsageSnapshot,
) -> Result<Evaluation, EngineError> {
    if !discount.eligibility.admits(context.customer) {
        return Ok(Evaluation::Rejected(Rejection::CustomerNotEligible));
    }

    let qualification = match &discount.kind {
        DiscountKind::AmountOffOrder(rules) => check_minimum_purchase(rules, context.cart),
        DiscountKind::BuyXGetY(rules) => check_buys(rules, context.cart)?,
    };

    let qualification = match qualification {
        Evaluation::Eligible(qualification) => qualification,
        rejected @ Evaluation::Rejected(_) => return Ok(rejected),
    };

    if let Method::DiscountCode { limits, .. } = &discount.method
        && let Some(rejection) = check_usage(limits, usage)
    {
        return Ok(Evaluation::Rejected(rejection));
    }

    Ok(match discount.window.status(context.now) {
        WindowStatus::NotYetActive => Evaluation::Rejected(Rejection::NotYetActive),
        WindowStatus::Expired => Evaluation::Rejected(Rejection::Expired),
        WindowStatus::Active => Evaluation::Eligible(qualification),
    })
}

fn check_minimum_purchase(
    rules: &AmountOffOrder,
    cart: &Cart<'_>,
) -> Evaluation {
    let CartSummary { total, quantity } = cart.summary();

    let rejection = match rules.minimum {
        MinimumPurchase::None => None,
        MinimumPurchase::Amount(minimum) => (i128::from(total) < i128::from(minimum))
            .then(|| Rejection::MinimumAmount(major_units(minimum, cart))),
        MinimumPurchase::Quantity(minimum) => {
            (quantity < u64::from(minimum)).then_some(Rejection::MinimumQuantity(minimum))
        }
    };

    rejection.map_or(
        Evaluation::Eligible(Qualification::Order),
        Evaluation::Rejected,
    )
}

fn check_buys(rules: &BuyXGetY, cart: &Cart<'_>) -> Result<Evaluation, EngineError> {
    let (buys_quantity, buys_amount) = cart
        .items()
        .iter()
        .filter(|item| rules.buys_items.matches(item))
        .try_fold((0_u64, 0_i64), |(quantity, amount), item| {
            Ok::<_, EngineError>((
                quantity + u64::from(item.quantity()),
                amount
                    .checked_add(item.total_minor()?)
                    .ok_or(EngineError::Overflow)?,
            ))
        })?;

    let applications = rules.applications(buys_quantity, buys_amount);

    if applications == 0 {
        let rejection = match rules.buys {
            BuysRequirement::MinimumQuantity(required) => Rejection::BuysQuantity(required),
            BuysRequirement::MinimumAmount(required) => {
                Rejection::BuysAmount(major_units(required, cart))
            }
        };

        return Ok(Evaluation::Rejected(rejection));
    }

    let available: u64 = cart
        .items()
        .iter()
        .filter(|item| rules.gets_items.matches(item))
        .map(|item| u64::from(item.quantity()))
        .sum();

    let discounted_units = applications
        .saturating_mul(u64::from(rules.gets_quantity))
        .min(available);

    if discounted_units == 0 {
        return Ok(Evaluation::Rejected(Rejection::NoQualifyingGetsItems));
    }

    Ok(Evaluation::Eligible(Qualification::BuyXGetY {
        applications,
        discounted_units,
    }))
}

fn check_usage(limits: &UsageLimits, usage: &UsageSnapshot) -> Option<Rejection> {
    if limits
        .total_uses
        .is_some_and(|limit| usage.total_uses >= u64::from(limit))
    {
        return Some(Rejection::UsageLimitReached);
    }

    if limits.once_per_customer && usage.used_by_customer {
        return Some(Rejection::AlreadyUsed);
    }

    None
}

fn major_units(minor: u64, cart: &Cart<'_>) -> Decimal {
    i64::try_from(minor).map_or(Decimal::MAX, |minor| decimal_from_minor(minor, cart.currency()))
}
