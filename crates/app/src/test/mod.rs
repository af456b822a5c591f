//! Test support

mod fixtures;

pub(crate) use context::TestContext;
pub(crate) use fixtures::{DiscountFixture, ItemSide};
