//! Typed Uuids

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use uuid::Uuid;

/// A UUID tagged with the kind of thing it identifies.
pub struct TypedUuid<T>(Uuid, PhantomData<T>);

impl<T> TypedUuid<T> {
    /// Generate a new time-ordered identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, PhantomData)
    }

    /// Unwrap into the raw UUID.
    #[must_use]
    pub const fn into_uuid(self) -> Uuid {
        self.0
    }
}

impl<T> Default for TypedUuid<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for TypedUuid<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedUuid<T> {}

impl<T> Debug for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedUuid<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedUuid<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedUuid<T> {}

impl<T> Hash for TypedUuid<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedUuid<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedUuid<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> From<Uuid> for TypedUuid<T> {
    fn from(value: Uuid) -> Self {
        Self::from_uuid(value)
    }
}

impl<T> From<TypedUuid<T>> for Uuid {
    fn from(value: TypedUuid<T>) -> Self {
        value.into_uuid()
    }
}

/// Marker for discount identifiers.
#[derive(Debug)]
pub struct DiscountMarker;

/// Marker for usage ledger entry identifiers.
#[derive(Debug)]
pub struct Usage;

/// Marker for store identifiers.
#[derive(Debug)]
pub struct Store;

/// Marker for customer identifiers.
#[derive(Debug)]
pub struct CustomerMarker;

/// Marker for customer segment identifiers.
#[derive(Debug)]
pub struct Segment;

/// Marker for product identifiers.
#[derive(Debug)]
pub struct Product;

/// Marker for collection identifiers.
#[derive(Debug)]
pub struct Collection;

/// Marker for order identifiers.
#[derive(Debug)]
pub struct Order;

/// Discount UUID
pub type DiscountId = TypedUuid<DiscountMarker>;

/// Usage Entry UUID
pub type UsageId = TypedUuid<Usage>;

/// Store UUID
pub type StoreId = TypedUuid<Store>;

/// Customer UUID
pub type CustomerId = TypedUuid<CustomerMarker>;

/// Customer Segment UUID
pub type SegmentId = TypedUuid<Segment>;

/// Product UUID
pub type ProductId = TypedUuid<Product>;

/// Collection UUID
pub type CollectionId = TypedUuid<Collection>;

/// Order UUID
pub type OrderId = TypedUuid<Order>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_uuids_order_by_inner_uuid() {
        let low = StoreId::from_uuid(Uuid::from_u128(1));
        let high = StoreId::from_uuid(Uuid::from_u128(2));

        assert!(low < high);
        assert_eq!(low, StoreId::from(Uuid::from_u128(1)));
    }

    #[test]
    fn display_matches_inner_uuid() {
        let uuid = Uuid::from_u128(42);

        assert_eq!(ProductId::from_uuid(uuid).to_string(), uuid.to_string());
    }
}
