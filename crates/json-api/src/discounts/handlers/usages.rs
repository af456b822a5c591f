//! Record Discount Usage Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};
use tessera_app::domain::discounts::{DiscountsServiceError, data::NewUsage};

use crate::{
    discounts::{
        errors::into_api_error,
        requests::{RecordUsageRequest, parse_body},
        responses::{RecordedUsage, UsageRecordedResponse},
    },
    errors::ApiError,
    extensions::*,
    observability::record_reservation,
    state::State,
};

/// Record Discount Usage
///
/// Called once an order using a discount is finalised. The reservation is atomic: a code at its
/// usage limit, or already used by a single-use customer, is refused with 409 even if it passed
/// validation earlier.
#[endpoint(
    tags("discounts"),
    summary = "Record Discount Usage",
    responses(
        (status_code = StatusCode::CREATED, description = "Usage recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request body"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount not found"),
        (status_code = StatusCode::CONFLICT, description = "Usage limit reached or already used"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn create(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UsageRecordedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let request: RecordUsageRequest = parse_body(req).await?;
    let usage = NewUsage::try_from(request)?;

    let record = match state.discounts.record_usage(usage).await {
        Ok(record) => {
            record_reservation("recorded");
            record
        }
        Err(error) => {
            record_reservation(match &error {
                DiscountsServiceError::UsageLimitReached => "limit_reached",
                DiscountsServiceError::AlreadyUsed => "already_used",
                DiscountsServiceError::NotFound => "not_found",
                _ => "error",
            });

            return Err(into_api_error(error));
        }
    };

    let uuid = record.uuid.into_uuid();

    res.add_header(LOCATION, format!("/discounts/usages/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(UsageRecordedResponse {
        success: true,
        data: RecordedUsage { id: uuid },
    }))
}
