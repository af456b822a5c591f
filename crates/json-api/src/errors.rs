//! API error envelopes
//!
//! Input problems render as `{"success": false, "error": ...}` while expected business outcomes
//! (an ineligible cart, an exhausted code) render as `{"success": false, "message": ...}`.

use salvo::{
    Scribe,
    http::StatusCode,
    oapi::{self, Components, EndpointOutRegister, Operation, ToSchema},
    prelude::{Json, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of an input or infrastructure error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ErrorBody {
    /// Always `false`
    pub success: bool,

    /// What was wrong with the request
    pub error: String,
}

/// Body of a business rejection.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RejectionBody {
    /// Always `false`
    pub success: bool,

    /// Customer-facing reason
    pub message: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum ApiError {
    /// Missing or malformed input
    #[error("{0}")]
    BadRequest(String),

    /// An expected negative outcome
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("{0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub(crate) fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest(error.into())
    }

    pub(crate) fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Rejected {
            status: StatusCode::CONFLICT,
            message: message.into(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Rejected { status, .. } => *status,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Scribe for ApiError {
    fn render(self, res: &mut Response) {
        res.status_code(self.status());

        match self {
            Self::Rejected { message, .. } => res.render(Json(RejectionBody {
                success: false,
                message,
            })),
            other => res.render(Json(ErrorBody {
                success: false,
                error: other.to_string(),
            })),
        }
    }
}

impl EndpointOutRegister for ApiError {
    fn register(components: &mut Components, operation: &mut Operation) {
        operation.responses.insert(
            StatusCode::BAD_REQUEST.as_str(),
            oapi::Response::new("Invalid input or business rejection")
                .add_content("application/json", ErrorBody::to_schema(components)),
        );

        operation.responses.insert(
            StatusCode::INTERNAL_SERVER_ERROR.as_str(),
            oapi::Response::new("Internal server error")
                .add_content("application/json", ErrorBody::to_schema(components)),
        );
    }
}
