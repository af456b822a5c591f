//! Discounts service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use tessera::money::EngineError;
use thiserror::Error;

/// Constraint backing the one-use-per-customer guarantee.
pub(crate) const SINGLE_USE_CONSTRAINT: &str = "discount_usages_single_use_customer_key";

#[derive(Debug, Error)]
pub enum DiscountsServiceError {
    #[error("discount not found")]
    NotFound,

    #[error("usage already recorded")]
    AlreadyExists,

    #[error("customer has already used this discount")]
    AlreadyUsed,

    #[error("discount has reached its usage limit")]
    UsageLimitReached,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("stored discount is malformed")]
    CorruptCatalog,

    #[error("invalid cart")]
    InvalidCart(#[source] EngineError),

    #[error("discount calculation failed")]
    Engine(#[from] EngineError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for DiscountsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        let Some(database_error) = error.as_database_error() else {
            return Self::Sql(error);
        };

        if database_error.constraint() == Some(SINGLE_USE_CONSTRAINT) {
            return Self::AlreadyUsed;
        }

        match DatabaseError::kind(database_error) {
            ErrorKind::UniqueViolation => Self::AlreadyExists,
            ErrorKind::ForeignKeyViolation => Self::InvalidReference,
            ErrorKind::NotNullViolation => Self::MissingRequiredData,
            ErrorKind::CheckViolation => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
