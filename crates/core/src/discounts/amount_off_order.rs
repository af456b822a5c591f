//! Amount Off Order

use rust_decimal::Decimal;

/// Amount-off-order rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmountOffOrder {
    /// Whole-cart threshold
    pub minimum: MinimumPurchase,

    /// What the discount takes off
    pub value: OrderValue,
}

/// Whole-cart threshold, measured over every line regardless of targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinimumPurchase {
    /// No threshold
    None,

    /// Cart total must reach this many minor units
    Amount(u64),

    /// Cart must hold at least this many units
    Quantity(u32),
}

impl MinimumPurchase {
    /// Wire name of the threshold kind.
    pub fn as_str(self) -> &'static str {
        match self {
            MinimumPurchase::None => "none",
            MinimumPurchase::Amount(_) => "minimum-amount",
            MinimumPurchase::Quantity(_) => "minimum-quantity",
        }
    }
}

/// Order-level discount value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderValue {
    /// Percentage points off the cart total, `0..=100`
    Percentage(Decimal),

    /// Minor units off the cart total, capped at the total
    FixedAmount(u64),
}

impl OrderValue {
    /// Wire name of the value type.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderValue::Percentage(_) => "percentage",
            OrderValue::FixedAmount(_) => "fixed-amount",
        }
    }
}
