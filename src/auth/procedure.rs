//! Remote procedure calls and the transport seam they go through.

use super::response::RpcResponse;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Map, Value};
use std::future::Future;

pub const VERIFY_USER_LOGIN: &str = "verify_user_login";
pub const REGISTER_USER: &str = "register_user";

/// Value of one named procedure parameter.
pub enum ParamValue {
    Text(String),
    Secret(SecretString),
    Null,
}

impl ParamValue {
    /// Borrow the value for transmission. Only transports call this.
    #[must_use]
    pub fn expose(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            Self::Secret(value) => Some(value.expose_secret()),
            Self::Null => None,
        }
    }
}

impl From<Option<String>> for ParamValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Null, Self::Text)
    }
}

impl std::fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(value) => write!(f, "{value:?}"),
            Self::Secret(_) => write!(f, "\"***\""),
            Self::Null => write!(f, "null"),
        }
    }
}

/// A named call such as `verify_user_login(p_email => .., p_password => ..)`.
#[derive(Debug)]
pub struct ProcedureCall {
    name: &'static str,
    params: Vec<(&'static str, ParamValue)>,
}

impl ProcedureCall {
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn params(&self) -> &[(&'static str, ParamValue)] {
        &self.params
    }

    /// JSON object body for RPC-over-HTTP transports. Contains secrets.
    #[must_use]
    pub fn to_json_body(&self) -> Value {
        let body: Map<String, Value> = self
            .params
            .iter()
            .map(|(key, value)| {
                let value = value
                    .expose()
                    .map_or(Value::Null, |text| Value::String(text.to_string()));
                ((*key).to_string(), value)
            })
            .collect();

        Value::Object(body)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<SecretString> for ParamValue {
    fn from(value: SecretString) -> Self {
        Self::Secret(value)
    }
}

/// Transport to the remote auth procedures.
///
/// Implementations never fail: transport faults come back as
/// [`RpcResponse::Error`] so every caller goes through the same interpretation.
pub trait AuthService: Send + Sync {
    fn call(&self, call: ProcedureCall) -> impl Future<Output = RpcResponse> + Send;
}
