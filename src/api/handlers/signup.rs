use super::{in_flight_response, missing_payload, ErrorBody};
use crate::{
    api::AppState,
    auth::{AuthError, SignupForm},
    forms::{FormOutcome, SignupPage},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};
use tracing::{debug, instrument};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
pub struct SignupRequest {
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    phone: Option<String>,
    password: String,
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email", &"***")
            .field("phone", &self.phone)
            .field("password", &"***")
            .finish()
    }
}

impl From<SignupRequest> for SignupForm {
    fn from(request: SignupRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            password: SecretString::from(request.password),
        }
    }
}

fn outcome_status(outcome: &FormOutcome) -> StatusCode {
    if outcome.is_success() {
        return StatusCode::CREATED;
    }

    match outcome.kind.as_deref() {
        Some(kind) if kind == AuthError::AccountNotCreated.kind() => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        Some(kind) if kind == AuthError::InvalidCredentials.kind() => StatusCode::UNAUTHORIZED,
        _ => StatusCode::BAD_GATEWAY,
    }
}

async fn submit(
    state: &AppState,
    page: &SignupPage,
    payload: Option<Json<SignupRequest>>,
) -> Response {
    let request: SignupRequest = match payload {
        Some(Json(payload)) => payload,
        None => return missing_payload(),
    };

    debug!("request ({}): {:?}", page.diagnostics().as_str(), request);

    match page.submit(&state.client, request.into()).await {
        Ok(outcome) => (outcome_status(&outcome), Json(outcome)).into_response(),
        Err(err) => in_flight_response(err),
    }
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Account created", body = FormOutcome, content_type = "application/json"),
        (status = 400, description = "Missing payload", body = ErrorBody),
        (status = 409, description = "A signup is already in progress", body = ErrorBody),
        (status = 422, description = "Account could not be created", body = FormOutcome),
        (status = 502, description = "Authentication service error", body = FormOutcome),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn signup(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    submit(&state, &state.signup, payload).await
}

#[utoipa::path(
    post,
    path = "/signup/complete",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Account created, with name and email echoed back", body = FormOutcome, content_type = "application/json"),
        (status = 400, description = "Missing payload", body = ErrorBody),
        (status = 409, description = "A signup is already in progress", body = ErrorBody),
        (status = 422, description = "Account could not be created", body = FormOutcome),
        (status = 502, description = "Authentication service error", body = FormOutcome),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn signup_complete(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    submit(&state, &state.signup_complete, payload).await
}

#[utoipa::path(
    post,
    path = "/signup/diagnostics",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Account created, with every step of the attempt", body = FormOutcome, content_type = "application/json"),
        (status = 400, description = "Missing payload", body = ErrorBody),
        (status = 409, description = "A signup is already in progress", body = ErrorBody),
        (status = 422, description = "Account could not be created", body = FormOutcome),
        (status = 502, description = "Authentication service error", body = FormOutcome),
    ),
    tag = "auth"
)]
#[instrument(skip(state, payload))]
pub async fn signup_diagnostics(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    submit(&state, &state.signup_diagnostics, payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::handlers::test_support::{can_bind_localhost, json_request, send, test_app},
        session::SESSION_KEY,
    };
    use anyhow::Result;
    use serde_json::{json, Value};
    use wiremock::{
        matchers::{body_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn form() -> Value {
        json!({
            "first_name": " Grace ",
            "last_name": "Hopper",
            "email": "Grace@Example.com",
            "phone": "  ",
            "password": "cobol"
        })
    }

    async fn register_answering(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/register_user"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    fn created() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": 7,
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": "grace@example.com",
            "phone": null,
            "created_at": "2024-01-01T00:00:00Z"
        }))
    }

    #[tokio::test]
    async fn signup_sends_normalized_form() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping signup test: cannot bind to localhost");
            return Ok(());
        }

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rest/v1/rpc/register_user"))
            .and(body_json(json!({
                "p_first_name": "Grace",
                "p_last_name": "Hopper",
                "p_email": "grace@example.com",
                "p_phone": null,
                "p_password": "cobol"
            })))
            .respond_with(created())
            .expect(1)
            .mount(&server)
            .await;

        let (app, _state, store) = test_app(&server.uri())?;
        let (status, body) = send(&app, json_request("POST", "/signup", &form())?).await?;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "Account created");
        assert!(body.get("user").is_none());
        assert!(body.get("details").is_none());
        assert!(store.get_item(SESSION_KEY)?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn complete_and_diagnostics_add_details() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping signup test: cannot bind to localhost");
            return Ok(());
        }

        let server = register_answering(created()).await;
        let (app, _state, _store) = test_app(&server.uri())?;

        let (status, complete) =
            send(&app, json_request("POST", "/signup/complete", &form())?).await?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(complete["user"]["id"], "7");
        assert_eq!(
            complete["details"],
            json!(["Name: Grace Hopper", "Email: grace@example.com"])
        );

        let (status, verbose) =
            send(&app, json_request("POST", "/signup/diagnostics", &form())?).await?;
        assert_eq!(status, StatusCode::CREATED);
        let details = verbose["details"].as_array().cloned().unwrap_or_default();
        assert!(details.len() > 2);
        Ok(())
    }

    #[tokio::test]
    async fn empty_result_is_unprocessable() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping signup test: cannot bind to localhost");
            return Ok(());
        }

        let server = register_answering(ResponseTemplate::new(200).set_body_json(json!([]))).await;
        let (app, _state, store) = test_app(&server.uri())?;

        let (status, body) =
            send(&app, json_request("POST", "/signup/complete", &form())?).await?;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["status"], "error");
        assert_eq!(body["kind"], "AccountNotCreatedError");
        assert_eq!(body["details"], json!(["Error: AccountNotCreatedError"]));
        assert!(store.get_item(SESSION_KEY)?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn service_error_without_message_uses_fallback() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping signup test: cannot bind to localhost");
            return Ok(());
        }

        let server = register_answering(ResponseTemplate::new(500)).await;
        let (app, _state, _store) = test_app(&server.uri())?;

        let (status, body) = send(&app, json_request("POST", "/signup", &form())?).await?;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["message"], "Signup failed");
        assert_eq!(body["kind"], "AuthServiceError");
        Ok(())
    }

    #[test]
    fn failed_outcome_status_follows_kind() {
        let outcome = |kind: &str| FormOutcome {
            status: crate::forms::FormStatus::Error,
            message: String::new(),
            kind: Some(kind.to_string()),
            details: Vec::new(),
            user: None,
        };

        assert_eq!(
            outcome_status(&outcome("AccountNotCreatedError")),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            outcome_status(&outcome("AuthServiceError")),
            StatusCode::BAD_GATEWAY
        );
    }
}
