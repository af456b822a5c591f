//! Discounts
//!
//! Discount definitions as the engine sees them. Definitions are created by store admin tooling
//! and are never mutated here; the engine only reads them to decide eligibility and price.

use std::fmt;

use crate::uuids::{DiscountId, StoreId};

pub mod amount_off_order;
pub mod buy_x_get_y;
pub mod eligibility;
pub mod window;

pub use amount_off_order::{AmountOffOrder, MinimumPurchase, OrderValue};
pub use buy_x_get_y::{BuyXGetY, BuysRequirement, GetsValue, ItemScope, ItemTargets};
pub use eligibility::CustomerEligibility;
pub use window::{ActiveWindow, WindowStatus};

/// A configured discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    /// Discount id
    pub id: DiscountId,

    /// Store the discount belongs to
    pub store: StoreId,

    /// How the discount is applied, with method-specific settings
    pub method: Method,

    /// Publication status
    pub status: Status,

    /// Which customers may use it
    pub eligibility: CustomerEligibility,

    /// When it is active
    pub window: ActiveWindow,

    /// Stacking flags surfaced to order assembly
    pub combinations: Combinations,

    /// Family-specific rules
    pub kind: DiscountKind,
}

impl Discount {
    /// Discount family.
    pub fn family(&self) -> DiscountFamily {
        match self.kind {
            DiscountKind::AmountOffOrder(_) => DiscountFamily::AmountOffOrder,
            DiscountKind::BuyXGetY(_) => DiscountFamily::BuyXGetY,
        }
    }

    /// Whether the discount is published.
    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }

    /// Whether the discount applies without a code.
    pub fn is_automatic(&self) -> bool {
        matches!(self.method, Method::Automatic { .. })
    }

    /// The redemption code, for code discounts.
    pub fn code(&self) -> Option<&str> {
        match &self.method {
            Method::DiscountCode { code, .. } => Some(code),
            Method::Automatic { .. } => None,
        }
    }

    /// The display title, for automatic discounts.
    pub fn title(&self) -> Option<&str> {
        match &self.method {
            Method::Automatic { title } => Some(title),
            Method::DiscountCode { .. } => None,
        }
    }
}

/// How a discount is applied.
///
/// Usage limits only exist for code discounts: automatic discounts are never redeemed by hand,
/// so there is nothing to count against them at validation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// Customer enters a code at checkout
    DiscountCode {
        /// Redemption code
        code: String,

        /// Usage limits checked during validation
        limits: UsageLimits,
    },

    /// Applied without a code
    Automatic {
        /// Title shown to the customer
        title: String,
    },
}

impl Method {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::DiscountCode { .. } => "discount-code",
            Method::Automatic { .. } => "automatic",
        }
    }
}

/// Usage limits for code discounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UsageLimits {
    /// Maximum number of redemptions across all customers
    pub total_uses: Option<u32>,

    /// Whether each customer may redeem the code only once
    pub once_per_customer: bool,
}

/// Publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Live
    Active,

    /// Saved but not live
    Draft,
}

impl Status {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Draft => "draft",
        }
    }
}

/// Which other discount classes this one can be combined with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Combinations {
    /// Combines with product discounts
    pub product_discounts: bool,

    /// Combines with order discounts
    pub order_discounts: bool,

    /// Combines with shipping discounts
    pub shipping_discounts: bool,
}

/// Family-specific discount rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscountKind {
    /// Amount off the whole order
    AmountOffOrder(AmountOffOrder),

    /// Buy some items, get others discounted
    BuyXGetY(BuyXGetY),
}

/// Discount family, used to scope catalog lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountFamily {
    /// Amount off order
    AmountOffOrder,

    /// Buy X get Y
    BuyXGetY,
}

impl DiscountFamily {
    /// Wire name of the family.
    pub fn as_str(self) -> &'static str {
        match self {
            DiscountFamily::AmountOffOrder => "amount-off-order",
            DiscountFamily::BuyXGetY => "buy-x-get-y",
        }
    }
}

impl fmt::Display for DiscountFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
