//! Tessera
//!
//! Tessera is the discount eligibility and pricing engine behind a storefront checkout. Given a
//! cart, a customer and the discounts configured for a store, it decides which discounts apply,
//! what each one is worth, and in which order automatic discounts should be offered.
//!
//! Everything in this crate is pure: loading definitions and recording usage belong to the
//! application layer.

pub mod cart;
pub mod customers;
pub mod discounts;
pub mod evaluation;
pub mod money;
pub mod prelude;
pub mod pricing;
pub mod ranking;
pub mod uuids;
