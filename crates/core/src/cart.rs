//! Carts
//!
//! A cart is the snapshot of line items a customer is checking out with. Discounts look at the
//! whole cart for minimum purchase thresholds and at individual lines for buy-X-get-Y targeting.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{
    money::EngineError,
    uuids::{CollectionId, ProductId},
};

/// A single cart line.
#[derive(Debug, Clone)]
pub struct LineItem<'a> {
    product: Option<ProductId>,
    collections: SmallVec<[CollectionId; 2]>,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> LineItem<'a> {
    /// Create a line with no catalog references.
    pub fn new(unit_price: Money<'a, Currency>, quantity: u32) -> Self {
        Self {
            product: None,
            collections: SmallVec::new(),
            unit_price,
            quantity,
        }
    }

    /// Attach the product this line is for.
    #[must_use]
    pub fn with_product(mut self, product: ProductId) -> Self {
        self.product = Some(product);
        self
    }

    /// Attach the collections the product belongs to.
    #[must_use]
    pub fn with_collections(mut self, collections: impl IntoIterator<Item = CollectionId>) -> Self {
        self.collections = collections.into_iter().collect();
        self
    }

    /// Product id, if the caller supplied one.
    pub fn product(&self) -> Option<ProductId> {
        self.product
    }

    /// Collections the product belongs to.
    pub fn collections(&self) -> &[CollectionId] {
        &self.collections
    }

    /// Price of one unit.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Number of units on the line.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity` in minor units.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Overflow`] if the line total does not fit in an `i64`.
    pub fn total_minor(&self) -> Result<i64, EngineError> {
        self.unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or(EngineError::Overflow)
    }
}

/// Cart totals used by minimum purchase checks and reported back to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartSummary {
    /// Σ(price × quantity) in minor units
    pub total: i64,

    /// Σ(quantity)
    pub quantity: u64,
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart<'a> {
    items: Vec<LineItem<'a>>,
    currency: &'a Currency,
    summary: CartSummary,
}

impl<'a> Cart<'a> {
    /// Build a cart, checking every line is priced in `currency` and that the cart total fits in
    /// minor units.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CurrencyMismatch`] if a line is priced in another currency, or
    /// [`EngineError::Overflow`] if a line or the cart total does not fit in an `i64`.
    pub fn new(
        currency: &'a Currency,
        items: impl Into<Vec<LineItem<'a>>>,
    ) -> Result<Self, EngineError> {
        let items = items.into();

        if let Some(item) = items
            .iter()
            .find(|item| item.unit_price.currency() != currency)
        {
            return Err(EngineError::CurrencyMismatch {
                expected: currency.iso_alpha_code.to_string(),
                found: item.unit_price.currency().iso_alpha_code.to_string(),
            });
        }

        let summary = items.iter().try_fold(
            CartSummary {
                total: 0,
                quantity: 0,
            },
            |acc, item| {
                Ok::<_, EngineError>(CartSummary {
                    total: acc
                        .total
                        .checked_add(item.total_minor()?)
                        .ok_or(EngineError::Overflow)?,
                    quantity: acc.quantity + u64::from(item.quantity),
                })
            },
        )?;

        Ok(Self {
            items,
            currency,
            summary,
        })
    }

    /// Cart currency.
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Cart lines in the order the customer added them.
    pub fn items(&self) -> &[LineItem<'a>] {
        &self.items
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whole-cart totals.
    pub fn summary(&self) -> CartSummary {
        self.summary
    }

    /// Whole-cart total as money.
    pub fn subtotal(&self) -> Money<'a, Currency> {
        Money::from_minor(self.summary.total, self.currency)
    }
}
