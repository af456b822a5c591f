//! Discounts Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde::Serialize;
use tessera::{
    discounts::{Combinations, DiscountFamily},
    uuids::{CustomerId, DiscountId, OrderId, StoreId, UsageId},
};

/// An eligible discount, ready to show to a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountOffer {
    pub id: DiscountId,
    pub family: DiscountFamily,
    pub method: &'static str,
    pub discount_code: Option<String>,
    pub title: Option<String>,
    pub value: OfferValue,

    /// Major units
    pub discount_amount: Decimal,

    pub message: String,
    pub combines_with: Combinations,
}

/// Family-specific value fields of an offer, amounts in major units.
#[derive(Debug, Clone, PartialEq)]
pub enum OfferValue {
    AmountOffOrder {
        value_type: &'static str,
        percentage: Option<Decimal>,
        fixed_amount: Option<Decimal>,
    },
    BuyXGetY {
        discounted_value: &'static str,
        discounted_amount: Option<Decimal>,
        discounted_percentage: Option<Decimal>,
        customer_gets_quantity: u32,
        discounted_units: u64,
    },
}

/// Ranked automatic discounts for a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct EligibilityReport {
    pub discounts: Vec<DiscountOffer>,
    pub cart_total: Decimal,
    pub total_quantity: u64,
}

/// Outcome of validating a code.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeValidationReport {
    Valid {
        discount: DiscountOffer,
        cart_total: Decimal,
        total_quantity: u64,
    },
    Rejected {
        message: String,
    },
}

/// A recorded redemption.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRecord {
    pub uuid: UsageId,
    pub store: StoreId,
    pub discount: DiscountId,
    pub customer: CustomerId,
    pub order: Option<OrderId>,

    /// Minor units
    pub discount_amount: u64,

    pub created_at: Timestamp,
}

/// Usage totals for a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub total_uses: u64,
    pub uses_count: u64,
    pub total_uses_limit: Option<u32>,
}
