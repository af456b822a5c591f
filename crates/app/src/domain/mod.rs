//! Tessera Domain Concerns

pub mod discounts;
