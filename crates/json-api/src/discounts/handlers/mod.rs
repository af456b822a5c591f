//! Discount Handlers

pub(crate) mod check;
pub(crate) mod usages;
pub(crate) mod validate_code;
