//! # Vestibule (signup & login client)
//!
//! `vestibule` drives the signup and login flows of a database-backed web
//! application. It does not own any user data: credential checks and account
//! creation are remote procedure calls (`verify_user_login`, `register_user`),
//! reached either through a PostgREST-style `/rest/v1/rpc` endpoint or
//! directly through Postgres.
//!
//! ## Contract
//!
//! - **Normalization:** emails are trimmed and lowercased before they leave the
//!   process. Passwords are sent unmodified and never logged.
//! - **Response shapes:** a procedure may answer with a record, a list of
//!   records, `null`, or an error. The shape is collapsed once, in
//!   [`auth::RpcResponse`], before any domain logic runs.
//! - **Failures:** `AuthServiceError` carries the service message (or a fixed
//!   fallback). `InvalidCredentialsError` never says whether the account exists.
//! - **Session:** the last authenticated user is written under `app_user` in a
//!   local key-value store. The write is best-effort and never fails a login.
//!
//! ## Surfaces
//!
//! The same forms are exposed through the CLI (`vestibule login`, `vestibule
//! signup`, ...) and through a small local HTTP server (`vestibule server`).

pub mod api;
pub mod auth;
pub mod cli;
pub mod forms;
pub mod locale;
pub mod session;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
