//! PostgREST-style transport: `POST {base}/rest/v1/rpc/{procedure}` with the
//! named parameters as a JSON object body.

use super::{
    procedure::{AuthService, ProcedureCall},
    response::RpcResponse,
};
use crate::APP_USER_AGENT;
use anyhow::{Context, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};
use url::Url;

/// Default request timeout applied to every procedure call.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
/// Maximum number of error body characters passed on as a service message.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone)]
pub struct RestAuthService {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl RestAuthService {
    /// Build a transport for the given API base URL.
    ///
    /// # Errors
    /// Returns an error if the URL is not http(s) or the HTTP client cannot be built.
    pub fn new(base_url: &str, api_key: Option<SecretString>) -> Result<Self> {
        let url = Url::parse(base_url.trim()).context("invalid API base URL")?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("unsupported API URL scheme: {}", url.scheme());
        }

        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    #[must_use]
    pub fn endpoint(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{procedure}", self.base_url)
    }
}

impl std::fmt::Debug for RestAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestAuthService")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl AuthService for RestAuthService {
    #[instrument(skip(self, call), fields(procedure = call.name()))]
    async fn call(&self, call: ProcedureCall) -> RpcResponse {
        let url = self.endpoint(call.name());

        let mut request = self.client.post(&url).json(&call.to_json_body());

        if let Some(key) = &self.api_key {
            request = request
                .header("apikey", key.expose_secret())
                .bearer_auth(key.expose_secret());
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                error!("Error calling {}: {}", url, err);

                return RpcResponse::Error(Some(transport_message(&err)));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                error!("Error reading response from {}: {}", url, err);

                return RpcResponse::Error(Some(transport_message(&err)));
            }
        };

        if !status.is_success() {
            error!("{} - {}", url, status);

            return RpcResponse::Error(error_message(&body));
        }

        debug!("{} - {}", url, status);

        if body.trim().is_empty() {
            return RpcResponse::Empty;
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(payload) => RpcResponse::from_payload(payload),
            Err(err) => {
                error!("Error parsing response from {}: {}", url, err);

                RpcResponse::Error(None)
            }
        }
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "Request timed out. Please try again.".to_string()
    } else if err.is_connect() {
        "Unable to reach the auth service".to_string()
    } else {
        err.to_string()
    }
}

/// Pull the service message out of an error body, as sent.
fn error_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        return ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str))
            .filter(|message| !message.trim().is_empty())
            .map(ToString::to_string);
    }

    Some(body.chars().take(MAX_ERROR_CHARS).collect())
}
