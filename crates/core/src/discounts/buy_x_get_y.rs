//! Buy X Get Y
//!
//! The customer buys items from one universe ("buys") and receives a discount on items from a
//! second, independent universe ("gets"). A single line can belong to both.

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;

use crate::{
    cart::LineItem,
    uuids::{CollectionId, ProductId},
};

/// Buy-X-get-Y rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuyXGetY {
    /// Threshold the customer must buy
    pub buys: BuysRequirement,

    /// Items that count toward the threshold
    pub buys_items: ItemTargets,

    /// Units discounted per satisfied threshold
    pub gets_quantity: u32,

    /// Items that can be discounted
    pub gets_items: ItemTargets,

    /// Discount applied to each discounted unit
    pub gets_value: GetsValue,

    /// Maximum number of times the offer applies to one order
    pub max_uses_per_order: Option<u32>,
}

impl BuyXGetY {
    /// How many times the offer applies, given the buys-qualifying quantity and amount.
    ///
    /// Returns zero when the threshold is unmet.
    pub fn applications(&self, buys_quantity: u64, buys_amount: i64) -> u64 {
        let times = match self.buys {
            BuysRequirement::MinimumQuantity(required) => {
                buys_quantity.checked_div(u64::from(required)).unwrap_or(1)
            }
            BuysRequirement::MinimumAmount(required) => {
                let amount = u64::try_from(buys_amount).unwrap_or(0);

                amount.checked_div(required).unwrap_or(1)
            }
        };

        match self.max_uses_per_order {
            Some(max) => times.min(u64::from(max)),
            None => times,
        }
    }
}

/// What the customer has to buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuysRequirement {
    /// At least this many buys-qualifying units
    MinimumQuantity(u32),

    /// Buys-qualifying lines totalling at least this many minor units
    MinimumAmount(u64),
}

impl BuysRequirement {
    /// Wire name of the requirement.
    pub fn as_str(self) -> &'static str {
        match self {
            BuysRequirement::MinimumQuantity(_) => "minimum-quantity",
            BuysRequirement::MinimumAmount(_) => "minimum-amount",
        }
    }
}

/// Discount applied to each "gets" unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetsValue {
    /// Unit is free
    Free,

    /// Minor units off each unit, capped at the unit price
    AmountOff(u64),

    /// Percentage points off each unit
    Percentage(Decimal),
}

impl GetsValue {
    /// Wire name of the discounted value.
    pub fn as_str(self) -> &'static str {
        match self {
            GetsValue::Free => "free",
            GetsValue::AmountOff(_) => "amount",
            GetsValue::Percentage(_) => "percentage",
        }
    }
}

/// How targets were configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemScope {
    /// Targets are products
    SpecificProducts,

    /// Targets are collections
    SpecificCollections,
}

impl ItemScope {
    /// Wire name of the scope.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemScope::SpecificProducts => "specific-products",
            ItemScope::SpecificCollections => "specific-collections",
        }
    }
}

/// A product-or-collection item universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemTargets {
    /// How the targets were configured
    pub scope: ItemScope,

    /// Targeted products
    pub products: FxHashSet<ProductId>,

    /// Targeted collections
    pub collections: FxHashSet<CollectionId>,
}

impl ItemTargets {
    /// Target a set of products.
    pub fn products(products: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            scope: ItemScope::SpecificProducts,
            products: products.into_iter().collect(),
            collections: FxHashSet::default(),
        }
    }

    /// Target a set of collections.
    pub fn collections(collections: impl IntoIterator<Item = CollectionId>) -> Self {
        Self {
            scope: ItemScope::SpecificCollections,
            products: FxHashSet::default(),
            collections: collections.into_iter().collect(),
        }
    }

    /// Whether `item` matches by product or by any of its collections.
    pub fn matches(&self, item: &LineItem<'_>) -> bool {
        item.product()
            .is_some_and(|product| self.products.contains(&product))
            || item
                .collections()
                .iter()
                .any(|collection| self.collections.contains(collection))
    }
}
