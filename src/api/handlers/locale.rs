use super::{missing_payload, ErrorBody};
use crate::{
    api::AppState,
    locale::{Language, LanguageOption},
};
use axum::{
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LocaleResponse {
    pub current: String,
    pub rtl: bool,
    pub options: Vec<LanguageOption>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SelectLocale {
    /// `en`, `ar` or `zh`; region tags such as `zh-CN` are accepted
    pub code: String,
}

fn describe(state: &AppState) -> LocaleResponse {
    let current = state.locale.current();

    LocaleResponse {
        current: current.code().to_string(),
        rtl: current.is_rtl(),
        options: state.locale.options(),
    }
}

#[utoipa::path(
    get,
    path = "/locale",
    responses (
        (status = 200, description = "Available languages and the current choice", body = LocaleResponse, content_type = "application/json"),
    ),
    tag = "locale"
)]
#[instrument(skip(state))]
pub async fn list(state: Extension<Arc<AppState>>) -> Json<LocaleResponse> {
    Json(describe(&state))
}

#[utoipa::path(
    put,
    path = "/locale",
    request_body = SelectLocale,
    responses (
        (status = 200, description = "Language changed", body = LocaleResponse, content_type = "application/json"),
        (status = 400, description = "Unknown language or missing payload", body = ErrorBody),
    ),
    tag = "locale"
)]
#[instrument(skip(state, payload))]
pub async fn select(
    state: Extension<Arc<AppState>>,
    payload: Option<Json<SelectLocale>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return missing_payload();
    };

    let Some(language) = Language::from_code(&request.code) else {
        warn!("Unknown language: {}", request.code);

        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new(format!("Unknown language: {}", request.code))),
        )
            .into_response();
    };

    state.locale.select(language);

    Json(describe(&state)).into_response()
}

#[cfg(test)]
mod tests {
    use crate::{
        api::handlers::test_support::{empty_request, json_request, send, test_app},
        session::LOCALE_KEY,
    };
    use anyhow::Result;
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn defaults_to_english() -> Result<()> {
        let (app, _state, _store) = test_app("http://127.0.0.1:9")?;

        let (status, body) = send(&app, empty_request("GET", "/locale")?).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"], "en");
        assert_eq!(body["rtl"], false);
        assert_eq!(body["options"].as_array().map(Vec::len), Some(3));
        assert_eq!(body["options"][1]["label"], "العربية");
        Ok(())
    }

    #[tokio::test]
    async fn selecting_a_language_persists_it() -> Result<()> {
        let (app, state, store) = test_app("http://127.0.0.1:9")?;

        let (status, body) =
            send(&app, json_request("PUT", "/locale", &json!({"code": "ar"}))?).await?;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"], "ar");
        assert_eq!(body["rtl"], true);
        assert_eq!(state.locale.current().code(), "ar");
        assert_eq!(store.get_item(LOCALE_KEY)?.as_deref(), Some("ar"));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_language_is_rejected() -> Result<()> {
        let (app, state, _store) = test_app("http://127.0.0.1:9")?;

        let (status, body) =
            send(&app, json_request("PUT", "/locale", &json!({"code": "fr"}))?).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unknown language: fr");
        assert_eq!(state.locale.current().code(), "en");
        Ok(())
    }
}
