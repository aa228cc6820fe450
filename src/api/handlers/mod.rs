pub mod health;
pub mod locale;
pub mod login;
pub mod session;
pub mod signup;

// common functions for the handlers
use crate::{auth::AuthError, forms::SubmissionInFlight};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }
}

#[must_use]
pub const fn auth_error_status(err: &AuthError) -> StatusCode {
    match err {
        AuthError::Service { .. } => StatusCode::BAD_GATEWAY,
        AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AuthError::AccountNotCreated => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

pub fn auth_error_response(err: &AuthError) -> Response {
    let body = ErrorBody {
        error: err.to_string(),
        kind: Some(err.kind().to_string()),
    };

    (auth_error_status(err), Json(body)).into_response()
}

pub fn in_flight_response(err: SubmissionInFlight) -> Response {
    (StatusCode::CONFLICT, Json(ErrorBody::new(err.to_string()))).into_response()
}

pub fn missing_payload() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody::new("Missing payload")),
    )
        .into_response()
}
