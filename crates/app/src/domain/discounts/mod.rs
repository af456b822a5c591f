//! Discounts

mod catalog;
pub mod data;
mod errors;
pub mod models;
mod records;
mod repositories;
mod service;

pub use catalog::{DiscountCatalog, MockDiscountCatalog, PgDiscountCatalog};
pub use errors::DiscountsServiceError;
pub use service::{CatalogDiscountsService, DiscountsService, MockDiscountsService};
