use super::{auth_error_response, in_flight_response, missing_payload, ErrorBody};
use crate::{api::AppState, auth::UserRecord, forms::LoginPage};
use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &"***")
            .field("password", &"***")
            .finish()
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = UserRecord, content_type = "application/json"),
        (status = 400, description = "Missing payload", body = ErrorBody),
        (status = 401, description = "Invalid email or password", body = ErrorBody),
        (status = 409, description = "A login is already in progress", body = ErrorBody),
        (status = 502, description = "Authentication service error", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn login(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    debug!("request: {:?}", request);

    let password = SecretString::from(request.password);

    let result = match state
        .login
        .submit(&state.client, &request.email, password)
        .await
    {
        Ok(result) => result,
        Err(err) => return in_flight_response(err),
    };

    debug!("{}", LoginPage::render(&result).message);

    match result {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(err) => auth_error_response(&err),
    }
}
