use super::ErrorBody;
use crate::{api::AppState, auth::UserRecord};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{error, instrument};

#[utoipa::path(
    get,
    path = "/session",
    responses (
        (status = 200, description = "The user remembered by the last login or signup", body = UserRecord, content_type = "application/json"),
        (status = 204, description = "Nobody is logged in"),
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn current(state: Extension<Arc<AppState>>) -> Response {
    match state.client.current_user() {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/session",
    responses (
        (status = 204, description = "Session cleared"),
        (status = 500, description = "The session store could not be written", body = ErrorBody),
    ),
    tag = "auth"
)]
#[instrument(skip(state))]
pub async fn logout(state: Extension<Arc<AppState>>) -> Response {
    match state.client.logout() {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Failed to clear session: {}", err);

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(err.to_string())),
            )
                .into_response()
        }
    }
}
