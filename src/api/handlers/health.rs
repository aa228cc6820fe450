use crate::{api::AppState, GIT_COMMIT_HASH};
use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    pub name: String,
    pub version: String,
    pub commit: String,
    /// `rest` or `postgres`
    pub backend: String,
    /// `ok`, `error` or `unchecked`
    pub status: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses (
        (status = 200, description = "Service is healthy", body = Health, content_type = "application/json"),
        (status = 503, description = "The database is unreachable", body = Health, content_type = "application/json"),
    ),
    tag = "auth"
)]
// axum handler for health
#[instrument(skip(state))]
pub async fn health(state: Extension<Arc<AppState>>) -> impl IntoResponse {
    let backend = state.client.service();
    let dependency = backend.dependency_status().await;

    let body = Json(Health {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: GIT_COMMIT_HASH.to_string(),
        backend: backend.kind().to_string(),
        status: dependency.as_str().to_string(),
    });

    let short_hash = GIT_COMMIT_HASH.get(0..7).unwrap_or_default();

    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!(
        "{}:{}:{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_hash
    )) {
        headers.insert("X-App", value);
    }

    let status = if dependency.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, headers, body)
}

#[cfg(test)]
mod tests {
    use crate::api::handlers::test_support::{empty_request, send, test_app};
    use anyhow::Result;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_build_and_backend() -> Result<()> {
        let (app, _state, _store) = test_app("http://127.0.0.1:9")?;

        let response = app.clone().oneshot(empty_request("GET", "/health")?).await?;
        assert_eq!(response.status(), StatusCode::OK);
        let x_app = response
            .headers()
            .get("X-App")
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        assert!(x_app.starts_with(env!("CARGO_PKG_NAME")));
        assert!(response.headers().contains_key("x-request-id"));

        let (status, body) = send(&app, empty_request("GET", "/health")?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], env!("CARGO_PKG_NAME"));
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["backend"], "rest");
        assert_eq!(body["status"], "unchecked");
        Ok(())
    }

    #[tokio::test]
    async fn supplied_request_id_is_propagated() -> Result<()> {
        let (app, _state, _store) = test_app("http://127.0.0.1:9")?;

        let mut request = empty_request("GET", "/health")?;
        request
            .headers_mut()
            .insert("x-request-id", "req-42".parse()?);

        let response = app.oneshot(request).await?;
        assert_eq!(
            response
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok()),
            Some("req-42")
        );
        Ok(())
    }
}
