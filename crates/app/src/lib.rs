//! Discount catalog persistence, usage ledger and application services.

pub mod context;
pub mod database;
pub mod domain;
pub mod settings;

#[cfg(test)]
mod test;
