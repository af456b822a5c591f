//! Customers

use rustc_hash::FxHashSet;

use crate::uuids::{CustomerId, SegmentId};

/// The customer a cart belongs to, with the segments they are a member of.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,

    /// Segment memberships
    pub segments: FxHashSet<SegmentId>,
}

impl Customer {
    /// A customer with no segment memberships.
    pub fn new(id: CustomerId) -> Self {
        Self {
            id,
            segments: FxHashSet::default(),
        }
    }

    /// A customer belonging to `segments`.
    pub fn with_segments(id: CustomerId, segments: impl IntoIterator<Item = SegmentId>) -> Self {
        Self {
            id,
            segments: segments.into_iter().collect(),
        }
    }
}
