//! Validate Discount Code Handlers

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use tessera::discounts::DiscountFamily;
use tessera_app::domain::discounts::models::CodeValidationReport;

use crate::{
    discounts::{
        errors::into_api_error,
        requests::{ValidateCodeRequest, parse_body},
        responses::{ValidateCodeResponse, ValidatedCodeData},
    },
    errors::ApiError,
    extensions::*,
    observability::record_evaluation,
    state::State,
};

const VALID_CODE_MESSAGE: &str = "Discount code is valid";

/// Validate Amount Off Order Discount Code
///
/// Validates a code the customer entered against their cart. A code that cannot be used is a
/// normal 400 response carrying the reason.
#[endpoint(
    tags("discounts"),
    summary = "Validate Amount Off Order Discount Code",
    responses(
        (status_code = StatusCode::OK, description = "Discount code is valid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request body or code rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn amount_off_order(
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ValidateCodeResponse>, ApiError> {
    validate(DiscountFamily::AmountOffOrder, at, req, depot).await
}

/// Validate Buy X Get Y Discount Code
///
/// Validates a code the customer entered against their cart. A code that cannot be used is a
/// normal 400 response carrying the reason.
#[endpoint(
    tags("discounts"),
    summary = "Validate Buy X Get Y Discount Code",
    responses(
        (status_code = StatusCode::OK, description = "Discount code is valid"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request body or code rejected"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn buy_x_get_y(
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ValidateCodeResponse>, ApiError> {
    validate(DiscountFamily::BuyXGetY, at, req, depot).await
}

async fn validate(
    family: DiscountFamily,
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<ValidateCodeResponse>, ApiError> {
    let result = validate_code(family, at, req, depot).await;

    let outcome = match &result {
        Ok(_) => "valid",
        Err(ApiError::Rejected { .. }) => "rejected",
        Err(ApiError::Internal) => "error",
        Err(_) => "invalid",
    };

    record_evaluation(&format!("{family}/validate-code"), outcome);

    result.map(Json)
}

async fn validate_code(
    family: DiscountFamily,
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<ValidateCodeResponse, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let request: ValidateCodeRequest = parse_body(req).await?;
    let (checkout, code) = request.into_parts()?;

    let report = state
        .discounts
        .validate_code(family, checkout, code, point_in_time)
        .await
        .map_err(into_api_error)?;

    match report {
        CodeValidationReport::Valid {
            discount,
            cart_total,
            total_quantity,
        } => Ok(ValidateCodeResponse {
            success: true,
            data: ValidatedCodeData {
                discount: discount.into(),
                cart_total,
                total_quantity,
            },
            message: VALID_CODE_MESSAGE.to_string(),
        }),
        CodeValidationReport::Rejected { message } => Err(ApiError::rejected(message)),
    }
}
