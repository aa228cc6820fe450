//! Normalization of raw procedure payloads.
//!
//! Procedures answer with whatever shape the database function happens to
//! return: an object, an array of objects, `null`, or an error. This module is
//! the only place that looks at that shape; everything downstream works with
//! [`RpcResponse::into_record`].

use serde_json::Value;

/// Raw answer of one remote procedure call.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcResponse {
    /// Transport or service failure, with the service message when it sent one.
    Error(Option<String>),
    Empty,
    Single(Value),
    Many(Vec<Value>),
}

impl RpcResponse {
    /// Classify a successful payload.
    #[must_use]
    pub fn from_payload(payload: Value) -> Self {
        match payload {
            Value::Null => Self::Empty,
            Value::Array(items) if items.is_empty() => Self::Empty,
            Value::Array(items) => Self::Many(items),
            Value::Object(map) if map.is_empty() => Self::Empty,
            other => Self::Single(other),
        }
    }

    /// Collapse `Single` and `Many` into one optional record.
    ///
    /// # Errors
    /// Returns the service message when the call itself failed.
    pub fn into_record(self) -> Result<Option<Value>, Option<String>> {
        let record = match self {
            Self::Error(message) => return Err(message),
            Self::Empty => None,
            Self::Single(value) => Some(value),
            Self::Many(items) => items.into_iter().next(),
        };

        Ok(record.filter(|value| !is_blank(value)))
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
