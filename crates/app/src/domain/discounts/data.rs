//! Discounts Data

use rust_decimal::Decimal;
use tessera::uuids::{
    CollectionId, CustomerId, DiscountId, OrderId, ProductId, StoreId, UsageId,
};

/// A cart line as received from the storefront, priced in major units.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub product: Option<ProductId>,
    pub collections: Vec<CollectionId>,
    pub price: Decimal,
    pub quantity: u32,
}

/// Who is checking out what, in which store.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub store: StoreId,
    pub customer: CustomerId,
    pub lines: Vec<CartLine>,
}

/// A redemption to record against the usage ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUsage {
    pub uuid: UsageId,
    pub store: StoreId,
    pub discount: DiscountId,
    pub customer: CustomerId,
    pub order: Option<OrderId>,

    /// Major units
    pub discount_amount: Decimal,
}
