pub(crate) mod discounts;
pub(crate) mod entries;
pub(crate) mod segments;
pub(crate) mod usages;
