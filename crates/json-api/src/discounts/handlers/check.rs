//! Check Eligible Discounts Handlers

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};
use tessera::discounts::DiscountFamily;
use tessera_app::domain::discounts::data::Checkout;

use crate::{
    discounts::{
        errors::into_api_error,
        requests::{CheckDiscountsRequest, parse_body},
        responses::CheckDiscountsResponse,
    },
    errors::ApiError,
    extensions::*,
    observability::record_evaluation,
    state::State,
};

/// Check Amount Off Order Discounts
///
/// Ranks the store's automatic amount-off-order discounts the cart qualifies for, highest
/// discount first.
#[endpoint(
    tags("discounts"),
    summary = "Check Amount Off Order Discounts",
    responses(
        (status_code = StatusCode::OK, description = "Ranked eligible discounts"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request body"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn amount_off_order(
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CheckDiscountsResponse>, ApiError> {
    check(DiscountFamily::AmountOffOrder, at, req, depot).await
}

/// Check Buy X Get Y Discounts
///
/// Ranks the store's automatic buy-x-get-y discounts the cart qualifies for, highest discount
/// first.
#[endpoint(
    tags("discounts"),
    summary = "Check Buy X Get Y Discounts",
    responses(
        (status_code = StatusCode::OK, description = "Ranked eligible discounts"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request body"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn buy_x_get_y(
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CheckDiscountsResponse>, ApiError> {
    check(DiscountFamily::BuyXGetY, at, req, depot).await
}

async fn check(
    family: DiscountFamily,
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CheckDiscountsResponse>, ApiError> {
    let result = rank(family, at, req, depot).await;

    let outcome = match &result {
        Ok(response) if response.data.eligible_discounts.is_empty() => "none",
        Ok(_) => "eligible",
        Err(ApiError::Internal) => "error",
        Err(_) => "invalid",
    };

    record_evaluation(&format!("{family}/check"), outcome);

    result.map(Json)
}

async fn rank(
    family: DiscountFamily,
    at: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<CheckDiscountsResponse, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.into_point_in_time()?;

    let request: CheckDiscountsRequest = parse_body(req).await?;
    let checkout = Checkout::try_from(request)?;

    let report = state
        .discounts
        .check_eligible(family, checkout, point_in_time)
        .await
        .map_err(into_api_error)?;

    Ok(report.into())
}
