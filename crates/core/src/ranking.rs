//! Selection and Ranking
//!
//! Two entry points: [`check_eligible`] ranks the automatic discounts a cart qualifies for, and
//! [`validate_code`] checks a single code discount with a reason for every failure.

use std::fmt;

use rusty_money::{Money, iso::Currency};

use crate::{
    cart::CartSummary,
    discounts::{Discount, DiscountKind, GetsValue, OrderValue},
    evaluation::{Evaluation, EvaluationContext, Qualification, Rejection, UsageSnapshot, evaluate},
    money::EngineError,
    pricing::compute_amount,
};

/// An eligible discount with its computed amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedDiscount<'d> {
    /// The discount
    pub discount: &'d Discount,

    /// Why it applies
    pub qualification: Qualification,

    /// Discount amount in minor units
    pub amount: i64,
}

impl RankedDiscount<'_> {
    /// Units discounted by a buy-X-get-Y discount, zero for order discounts.
    pub fn discounted_units(&self) -> u64 {
        match self.qualification {
            Qualification::BuyXGetY {
                discounted_units, ..
            } => discounted_units,
            Qualification::Order => 0,
        }
    }

    /// Customer-facing summary of what the discount gives.
    pub fn message(&self, currency: &Currency) -> String {
        match &self.discount.kind {
            DiscountKind::AmountOffOrder(rules) => match rules.value {
                OrderValue::Percentage(percentage) => {
                    format!("You are eligible for {}% off!", percentage.normalize())
                }
                OrderValue::FixedAmount(_) => format!(
                    "You are eligible for {} off!",
                    Money::from_minor(self.amount, currency)
                ),
            },
            DiscountKind::BuyXGetY(rules) => {
                let units = self.discounted_units();
                let noun = if units == 1 { "item" } else { "items" };

                match rules.gets_value {
                    GetsValue::Free => format!("You are eligible for {units} free {noun}!"),
                    GetsValue::AmountOff(_) => format!(
                        "You are eligible for {} off {units} {noun}!",
                        Money::from_minor(self.amount, currency)
                    ),
                    GetsValue::Percentage(percentage) => format!(
                        "You are eligible for {}% off {units} {noun}!",
                        percentage.normalize()
                    ),
                }
            }
        }
    }
}

/// Ranked automatic discounts plus the cart totals they were computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranking<'d> {
    /// Eligible discounts, highest amount first
    pub discounts: Vec<RankedDiscount<'d>>,

    /// Cart totals
    pub summary: CartSummary,
}

/// Rank the automatic, active discounts among `discounts` that apply to the cart.
///
/// Ineligible discounts are left out silently. Ties on amount are broken by discount id so the
/// ranking is stable across calls.
///
/// # Errors
///
/// Returns an [`EngineError`] if evaluating or pricing any discount fails; a single failure
/// aborts the whole ranking.
pub fn check_eligible<'d>(
    discounts: &'d [Discount],
    context: &EvaluationContext<'_, '_>,
) -> Result<Ranking<'d>, EngineError> {
    let usage = UsageSnapshot::default();
    let mut ranked = Vec::new();

    for discount in discounts
        .iter()
        .filter(|discount| discount.is_automatic() && discount.is_active())
    {
        if let Evaluation::Eligible(qualification) = evaluate(discount, context, &usage)? {
            ranked.push(RankedDiscount {
                discount,
                qualification,
                amount: compute_amount(discount, context.cart, qualification)?,
            });
        }
    }

    ranked.sort_by(|a, b| {
        b.amount
            .cmp(&a.amount)
            .then_with(|| a.discount.id.cmp(&b.discount.id))
    });

    Ok(Ranking {
        discounts: ranked,
        summary: context.cart.summary(),
    })
}

/// Why a code was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeRejection {
    /// No active code discount matches
    InvalidCode,

    /// The discount exists but does not apply
    Ineligible(Rejection),
}

impl fmt::Display for CodeRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeRejection::InvalidCode => f.write_str("Invalid discount code"),
            CodeRejection::Ineligible(rejection) => fmt::Display::fmt(rejection, f),
        }
    }
}

/// Outcome of validating a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeValidation<'d> {
    /// Code applies
    Valid {
        /// The discount with its amount
        discount: RankedDiscount<'d>,

        /// Cart totals
        summary: CartSummary,
    },

    /// Code refused
    Invalid(CodeRejection),
}

/// Normalise a code as entered by a customer.
pub fn normalize_code(code: &str) -> &str {
    code.trim()
}

/// Validate `code` against the candidate discount the catalog found for it.
///
/// The candidate must be an active code discount whose code matches exactly after trimming.
/// Usage limits are checked from `usage`.
///
/// # Errors
///
/// Returns an [`EngineError`] if evaluating or pricing the discount fails.
pub fn validate_code<'d>(
    candidate: Option<&'d Discount>,
    code: &str,
    context: &EvaluationContext<'_, '_>,
    usage: &UsageSnapshot,
) -> Result<CodeValidation<'d>, EngineError> {
    let code = normalize_code(code);

    let Some(discount) = candidate.filter(|discount| {
        discount.is_active() && discount.code().map(normalize_code) == Some(code)
    }) else {
        return Ok(CodeValidation::Invalid(CodeRejection::InvalidCode));
    };

    Ok(match evaluate(discount, context, usage)? {
        Evaluation::Eligible(qualification) => CodeValidation::Valid {
            discount: RankedDiscount {
                discount,
                qualification,
                amount: compute_amount(discount, context.cart, qualification)?,
            },
            summary: context.cart.summary(),
        },
        Evaluation::Rejected(rejection) => {
            CodeValidation::Invalid(CodeRejection::Ineligible(rejection))
        }
    })
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use rust_decimal::Decimal;
    use rusty_money::iso::USD;
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;
    use crate::{
        cart::{Cart, LineItem},
        customers::Customer,
        discounts::{
            ActiveWindow, AmountOffOrder, Combinations, CustomerEligibility, Method,
            MinimumPurchase, Status, UsageLimits,
        },
        uuids::{CustomerId, DiscountId, StoreId},
    };

    fn discount(id: u128, method: Method, value: OrderValue) -> Discount {
        Discount {
            id: DiscountId::from_uuid(Uuid::from_u128(id)),
            store: StoreId::new(),
            method,
            status: Status::Active,
            eligibility: CustomerEligibility::AllCustomers,
            window: ActiveWindow::unbounded(),
            combinations: Combinations::default(),
            kind: DiscountKind::AmountOffOrder(AmountOffOrder {
                minimum: MinimumPurchase::None,
                value,
            }),
        }
    }

    fn automatic(id: u128, value: OrderValue) -> Discount {
        discount(
            id,
            Method::Automatic {
                title: format!("Automatic {id}"),
            },
            value,
        )
    }

    fn coded(code: &str, value: OrderValue) -> Discount {
        discount(
            1,
            Method::DiscountCode {
                code: code.to_string(),
                limits: UsageLimits::default(),
            },
            value,
        )
    }

    #[test]
    fn ranks_by_amount_then_id() -> TestResult {
        let discounts = [
            automatic(3, OrderValue::FixedAmount(3000)),
            automatic(2, OrderValue::FixedAmount(5000)),
            automatic(1, OrderValue::FixedAmount(3000)),
        ];
        let cart = Cart::new(USD, [LineItem::new(Money::from_minor(10_000, USD), 1)])?;
        let customer = Customer::new(CustomerId::new());
        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: date(2026, 1, 1).at(0, 0, 0, 0),
        };

        let ranking = check_eligible(&discounts, &context)?;
        let order: Vec<_> = ranking
            .discounts
            .iter()
            .map(|ranked| (ranked.discount.id.into_uuid().as_u128(), ranked.amount))
            .collect();

        assert_eq!(order, [(2, 5000), (1, 3000), (3, 3000)]);
        assert_eq!(ranking, check_eligible(&discounts, &context)?);

        Ok(())
    }

    #[test]
    fn check_eligible_skips_codes_and_drafts() -> TestResult {
        let mut draft = automatic(2, OrderValue::FixedAmount(100));
        draft.status = Status::Draft;

        let discounts = [coded("SAVE", OrderValue::FixedAmount(100)), draft];
        let cart = Cart::new(USD, [LineItem::new(Money::from_minor(1000, USD), 1)])?;
        let customer = Customer::new(CustomerId::new());
        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: date(2026, 1, 1).at(0, 0, 0, 0),
        };

        assert!(check_eligible(&discounts, &context)?.discounts.is_empty());

        Ok(())
    }

    #[test]
    fn percentage_message_is_normalised() -> TestResult {
        let discounts = [automatic(1, OrderValue::Percentage(Decimal::new(1000, 2)))];
        let cart = Cart::new(USD, [LineItem::new(Money::from_minor(100_000, USD), 1)])?;
        let customer = Customer::new(CustomerId::new());
        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: date(2026, 1, 1).at(0, 0, 0, 0),
        };

        let ranking = check_eligible(&discounts, &context)?;
        let first = ranking.discounts.first().ok_or("expected a discount")?;

        assert_eq!(first.amount, 10_000);
        assert_eq!(first.message(USD), "You are eligible for 10% off!");

        Ok(())
    }

    #[test]
    fn missing_or_mismatched_code_is_invalid() -> TestResult {
        let discount = coded("SAVE20", OrderValue::FixedAmount(2000));
        let cart = Cart::new(USD, [LineItem::new(Money::from_minor(1500, USD), 1)])?;
        let customer = Customer::new(CustomerId::new());
        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: date(2026, 1, 1).at(0, 0, 0, 0),
        };

        assert_eq!(
            validate_code(None, "SAVE20", &context, &UsageSnapshot::default())?,
            CodeValidation::Invalid(CodeRejection::InvalidCode)
        );
        assert_eq!(
            validate_code(Some(&discount), "save20", &context, &UsageSnapshot::default())?,
            CodeValidation::Invalid(CodeRejection::InvalidCode)
        );
        assert_eq!(CodeRejection::InvalidCode.to_string(), "Invalid discount code");

        Ok(())
    }

    #[test]
    fn valid_code_is_trimmed_and_capped() -> TestResult {
        let discount = coded("SAVE20", OrderValue::FixedAmount(2000));
        let cart = Cart::new(USD, [LineItem::new(Money::from_minor(1500, USD), 1)])?;
        let customer = Customer::new(CustomerId::new());
        let context = EvaluationContext {
            cart: &cart,
            customer: &customer,
            now: date(2026, 1, 1).at(0, 0, 0, 0),
        };

        let validation =
            validate_code(Some(&discount), "  SAVE20 ", &context, &UsageSnapshot::default())?;

        let CodeValidation::Valid { discount, summary } = validation else {
            return Err("expected a valid code".into());
        };

        assert_eq!(discount.amount, 1500);
        assert_eq!(summary.total, 1500);

        Ok(())
    }
}
