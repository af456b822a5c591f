//! Discount Errors

use tessera::evaluation::Rejection;
use tessera_app::domain::discounts::DiscountsServiceError;
use tracing::error;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: DiscountsServiceError) -> ApiError {
    match error {
        DiscountsServiceError::InvalidCart(source) => {
            ApiError::bad_request(format!("Invalid cart: {source}"))
        }
        DiscountsServiceError::InvalidReference
        | DiscountsServiceError::MissingRequiredData
        | DiscountsServiceError::InvalidData => ApiError::bad_request("Invalid usage payload"),
        DiscountsServiceError::UsageLimitReached => {
            ApiError::conflict(Rejection::UsageLimitReached.to_string())
        }
        DiscountsServiceError::AlreadyUsed => ApiError::conflict(Rejection::AlreadyUsed.to_string()),
        DiscountsServiceError::AlreadyExists => ApiError::conflict("Usage already recorded"),
        DiscountsServiceError::NotFound => ApiError::NotFound("Discount not found".to_string()),
        DiscountsServiceError::CorruptCatalog => {
            error!("failed to load discounts: {error}");

            ApiError::Internal
        }
        DiscountsServiceError::Engine(source) => {
            error!("failed to evaluate discounts: {source}");

            ApiError::Internal
        }
        DiscountsServiceError::Sql(source) => {
            error!("failed to load discounts: {source}");

            ApiError::Internal
        }
    }
}
