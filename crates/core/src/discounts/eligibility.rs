//! Customer Eligibility

use rustc_hash::FxHashSet;

use crate::{
    customers::Customer,
    uuids::{CustomerId, SegmentId},
};

/// Which customers may use a discount.
///
/// Entry sets are unions: any matching entry grants access. An empty set grants access to nobody.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerEligibility {
    /// Everyone
    AllCustomers,

    /// Members of any of these segments
    Segments(FxHashSet<SegmentId>),

    /// Exactly these customers
    Customers(FxHashSet<CustomerId>),
}

impl CustomerEligibility {
    /// Whether `customer` may use the discount.
    pub fn admits(&self, customer: &Customer) -> bool {
        match self {
            CustomerEligibility::AllCustomers => true,
            CustomerEligibility::Segments(segments) => {
                !segments.is_disjoint(&customer.segments)
            }
            CustomerEligibility::Customers(customers) => customers.contains(&customer.id),
        }
    }

    /// Wire name of the eligibility mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerEligibility::AllCustomers => "all-customers",
            CustomerEligibility::Segments(_) => "specific-customer-segments",
            CustomerEligibility::Customers(_) => "specific-customers",
        }
    }
}
