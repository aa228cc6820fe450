//! Login and signup against the remote auth procedures.
//!
//! Both flows share one path: normalize the input, call the procedure, collapse
//! the answer to one optional record, persist it best-effort, return it.

pub mod backend;
pub mod error;
pub mod login;
pub mod postgres;
pub mod procedure;
pub mod response;
pub mod rest;
pub mod signup;
pub mod types;

pub use self::backend::{Backend, DependencyStatus};
pub use self::error::AuthError;
pub use self::procedure::{AuthService, ProcedureCall};
pub use self::response::RpcResponse;
pub use self::signup::Diagnostics;
pub use self::types::{normalize_email, Credentials, SignupForm, UserRecord};

use crate::session::{self, SessionStore};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

/// Auth client over a transport and a session store.
pub struct AuthClient<A> {
    service: A,
    store: Arc<dyn SessionStore>,
}

impl<A: AuthService> AuthClient<A> {
    pub fn new(service: A, store: Arc<dyn SessionStore>) -> Self {
        Self { service, store }
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn service(&self) -> &A {
        &self.service
    }

    /// Last persisted user, if any.
    pub fn current_user(&self) -> Option<UserRecord> {
        session::current_user(self.store())
    }

    /// Explicit session clear.
    ///
    /// # Errors
    /// Returns an error if the session entry cannot be removed.
    pub fn logout(&self) -> Result<(), session::SessionError> {
        session::clear(self.store())
    }
}

/// Turn a raw procedure answer into a user.
///
/// `fallback` is the message used when the service fails without one, `missing`
/// the error for "no record came back".
pub(crate) fn interpret(
    response: RpcResponse,
    fallback: &str,
    missing: AuthError,
) -> Result<UserRecord, AuthError> {
    let record = response
        .into_record()
        .map_err(|message| AuthError::service(message, fallback))?;

    let Some(record) = record else {
        return Err(missing);
    };

    if !record.is_object() {
        error!("Unexpected procedure payload: {}", record);

        return Err(AuthError::service(None, fallback));
    }

    if record.get("id").map_or(true, is_blank_id) {
        return Err(missing);
    }

    serde_json::from_value::<UserRecord>(record).map_err(|err| {
        error!("Failed to decode user record: {}", err);

        AuthError::service(None, fallback)
    })
}

fn is_blank_id(id: &Value) -> bool {
    match id {
        Value::Null => true,
        Value::String(id) => id.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{AuthService, ProcedureCall, RpcResponse};
    use crate::session::{SessionError, SessionStore};
    use serde_json::{json, Value};
    use std::{
        collections::VecDeque,
        io,
        sync::{Arc, Mutex},
    };
    use tracing_subscriber::fmt::MakeWriter;

    /// What a fake transport saw, with secrets exposed for assertions.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SeenCall {
        pub procedure: String,
        pub body: Value,
    }

    /// Scripted transport: answers in order, repeats the last answer.
    pub struct FakeService {
        responses: Mutex<VecDeque<RpcResponse>>,
        pub calls: Mutex<Vec<SeenCall>>,
    }

    impl FakeService {
        pub fn new(responses: Vec<RpcResponse>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn answering(payload: Value) -> Self {
            Self::new(vec![RpcResponse::from_payload(payload)])
        }

        pub fn seen(&self) -> Vec<SeenCall> {
            self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
        }
    }

    impl AuthService for FakeService {
        async fn call(&self, call: ProcedureCall) -> RpcResponse {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(SeenCall {
                    procedure: call.name().to_string(),
                    body: call.to_json_body(),
                });
            }

            let Ok(mut responses) = self.responses.lock() else {
                return RpcResponse::Error(None);
            };
            if responses.len() > 1 {
                responses.pop_front().unwrap_or(RpcResponse::Empty)
            } else {
                responses.front().cloned().unwrap_or(RpcResponse::Empty)
            }
        }
    }

    /// Store whose writes always fail; reads return what was seeded.
    pub struct ReadOnlyStore {
        pub seeded: Option<String>,
    }

    impl SessionStore for ReadOnlyStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, SessionError> {
            Ok(self.seeded.clone())
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), SessionError> {
            Err(SessionError::Unavailable("quota exceeded".to_string()))
        }

        fn remove_item(&self, _key: &str) -> Result<(), SessionError> {
            Err(SessionError::Unavailable("quota exceeded".to_string()))
        }
    }

    /// Collects formatted log lines so tests can inspect what was written.
    #[derive(Clone, Default)]
    pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        pub fn contents(&self) -> String {
            self.0
                .lock()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default()
        }

        /// A subscriber writing every level, spans included, into this buffer.
        pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
            tracing_subscriber::fmt()
                .with_max_level(tracing::Level::TRACE)
                .with_ansi(false)
                .with_writer(self.clone())
                .finish()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Ok(mut bytes) = self.0.lock() {
                bytes.extend_from_slice(buf);
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = Self;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    pub fn user_json(id: &str, email: &str) -> Value {
        json!({
            "id": id,
            "first_name": "Jane",
            "last_name": "Doe",
            "email": email,
            "phone": "+1 555 0100",
            "created_at": "2024-05-01T10:00:00.000Z"
        })
    }
}
