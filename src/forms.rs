//! Login and signup pages.
//!
//! A page owns the one-submission-at-a-time rule and turns an auth result into
//! what the user sees. Pages are shared by the CLI and the HTTP server.

use crate::auth::{AuthClient, AuthError, AuthService, Diagnostics, SignupForm, UserRecord};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::warn;
use utoipa::ToSchema;

pub const IN_FLIGHT: &str = "A submission is already in progress";

#[derive(ToSchema, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Success,
    Error,
}

/// What a page renders after a submission.
#[derive(ToSchema, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOutcome {
    pub status: FormStatus,
    pub message: String,
    /// Error kind, e.g. `InvalidCredentialsError`. Absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserRecord>,
}

impl FormOutcome {
    fn success(message: String, user: UserRecord) -> Self {
        Self {
            status: FormStatus::Success,
            message,
            kind: None,
            details: Vec::new(),
            user: Some(user),
        }
    }

    fn failure(err: &AuthError) -> Self {
        Self {
            status: FormStatus::Error,
            message: err.to_string(),
            kind: Some(err.kind().to_string()),
            details: Vec::new(),
            user: None,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == FormStatus::Success
    }
}

/// Rejected because an earlier submission on the same page has not finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{}", IN_FLIGHT)]
pub struct SubmissionInFlight;

/// Disables re-submission while a call is outstanding.
#[derive(Debug, Default)]
pub struct SubmitGuard {
    busy: AtomicBool,
}

/// Held for the duration of one submission; releases the guard on drop, also
/// when the submission future is dropped midway.
#[derive(Debug)]
pub struct Submission<'a> {
    guard: &'a SubmitGuard,
}

impl SubmitGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
        }
    }

    /// # Errors
    /// [`SubmissionInFlight`] while another submission holds the guard.
    pub fn try_begin(&self) -> Result<Submission<'_>, SubmissionInFlight> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Submission { guard: self })
            .map_err(|_| {
                warn!("{}", IN_FLIGHT);

                SubmissionInFlight
            })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for Submission<'_> {
    fn drop(&mut self) {
        self.guard.busy.store(false, Ordering::Release);
    }
}

/// The login page.
#[derive(Debug, Default)]
pub struct LoginPage {
    guard: SubmitGuard,
}

impl LoginPage {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            guard: SubmitGuard::new(),
        }
    }

    /// Submit the login form. The raw [`AuthError`] is returned so callers can
    /// map it to their own surface.
    ///
    /// # Errors
    /// [`SubmissionInFlight`] when a login on this page is still running.
    pub async fn submit<A: AuthService>(
        &self,
        client: &AuthClient<A>,
        email: &str,
        password: SecretString,
    ) -> Result<Result<UserRecord, AuthError>, SubmissionInFlight> {
        let _submission = self.guard.try_begin()?;

        Ok(client.login(email, password).await)
    }

    /// Render a login result.
    #[must_use]
    pub fn render(result: &Result<UserRecord, AuthError>) -> FormOutcome {
        match result {
            Ok(user) => FormOutcome::success(
                format!("Welcome back, {}", user.display_name()),
                user.clone(),
            ),
            Err(err) => FormOutcome::failure(err),
        }
    }
}

/// One signup page; the three routed variants only differ in `diagnostics`.
#[derive(Debug, Default)]
pub struct SignupPage {
    diagnostics: Diagnostics,
    guard: SubmitGuard,
}

impl SignupPage {
    #[must_use]
    pub const fn new(diagnostics: Diagnostics) -> Self {
        Self {
            diagnostics,
            guard: SubmitGuard::new(),
        }
    }

    #[must_use]
    pub const fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }

    /// # Errors
    /// [`SubmissionInFlight`] when a signup on this page is still running.
    pub async fn submit<A: AuthService>(
        &self,
        client: &AuthClient<A>,
        form: SignupForm,
    ) -> Result<FormOutcome, SubmissionInFlight> {
        let _submission = self.guard.try_begin()?;

        let attempt = client.signup(form, self.diagnostics).await;

        let mut outcome = match &attempt.result {
            Ok(user) => FormOutcome::success("Account created".to_string(), user.clone()),
            Err(err) => FormOutcome::failure(err),
        };

        if self.diagnostics.shows_details() {
            outcome.details = match &attempt.result {
                Ok(user) => vec![
                    format!("Name: {}", user.display_name()),
                    format!("Email: {}", user.email),
                ],
                Err(err) => vec![format!("Error: {}", err.kind())],
            };
        } else {
            outcome.user = None;
        }

        outcome.details.extend(attempt.steps);

        Ok(outcome)
    }
}
