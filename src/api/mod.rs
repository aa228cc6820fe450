use crate::{
    auth::{AuthClient, Backend, Diagnostics},
    forms::{LoginPage, SignupPage},
    locale::LocaleState,
    session::SessionStore,
};
use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::MatchedPath,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Json, Router,
};
use std::{net::IpAddr, sync::Arc};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::PropagateRequestIdLayer, set_header::SetRequestHeaderLayer, trace::TraceLayer,
};
use tracing::{info, info_span, Span};
use ulid::Ulid;
use utoipa_axum::router::OpenApiRouter;

pub(crate) mod handlers;
mod openapi;

pub use openapi::openapi;

/// Everything the pages need, shared by all routes.
pub struct AppState {
    pub client: AuthClient<Backend>,
    pub login: LoginPage,
    pub signup: SignupPage,
    pub signup_complete: SignupPage,
    pub signup_diagnostics: SignupPage,
    pub locale: LocaleState,
}

impl AppState {
    pub fn new(backend: Backend, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client: AuthClient::new(backend, store.clone()),
            login: LoginPage::new(),
            signup: SignupPage::new(Diagnostics::Silent),
            signup_complete: SignupPage::new(Diagnostics::User),
            signup_diagnostics: SignupPage::new(Diagnostics::Verbose),
            locale: LocaleState::load(store),
        }
    }
}

/// Build the API router with all documented routes registered.
#[must_use]
pub fn router() -> OpenApiRouter {
    openapi::api_router()
}

/// Full application: documented routes, `/openapi.json` and middleware.
pub fn app(state: Arc<AppState>) -> Router {
    let (router, doc) = router().split_for_parts();

    router
        .route("/openapi.json", get(move || async move { Json(doc) }))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(Extension(state)),
        )
}

/// Start the server and run until Ctrl-C.
/// # Errors
/// Return error if failed to bind or serve
pub async fn new(listen: IpAddr, port: u16, state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind((listen, port))
        .await
        .with_context(|| format!("Failed to bind {listen}:{port}"))?;

    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app(state).into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");
    let matched_path = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path(), MatchedPath::as_str);

    info_span!(
        "http.request",
        http.method = %request.method(),
        http.route = matched_path,
        request_id
    )
}
