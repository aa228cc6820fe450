use thiserror::Error;

pub const LOGIN_FAILED: &str = "Login failed";
pub const SIGNUP_FAILED: &str = "Signup failed";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const ACCOUNT_NOT_CREATED: &str = "Account could not be created";

/// Failures surfaced to the form handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Transport or service fault. The message is the service's own when it
    /// sent one.
    #[error("{message}")]
    Service { message: String },
    /// No record came back for the credentials. Deliberately the same for an
    /// unknown account and a wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,
    /// The signup procedure answered without an account.
    #[error("Account could not be created")]
    AccountNotCreated,
}

impl AuthError {
    /// Build a service error, falling back to `fallback` when the service sent
    /// no usable message.
    #[must_use]
    pub fn service(message: Option<String>, fallback: &str) -> Self {
        let message = message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());

        Self::Service { message }
    }

    /// Stable name of the error kind, as shown in diagnostics and API bodies.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Service { .. } => "AuthServiceError",
            Self::InvalidCredentials => "InvalidCredentialsError",
            Self::AccountNotCreated => "AccountNotCreatedError",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_passes_message_through() {
        let err = AuthError::service(Some("network down".to_string()), LOGIN_FAILED);
        assert_eq!(err.to_string(), "network down");
        assert_eq!(err.kind(), "AuthServiceError");
    }

    #[test]
    fn service_error_keeps_padding() {
        let err = AuthError::service(Some("  network down\n".to_string()), LOGIN_FAILED);
        assert_eq!(err.to_string(), "  network down\n");
    }

    #[test]
    fn service_error_falls_back_when_message_missing_or_blank() {
        assert_eq!(
            AuthError::service(None, LOGIN_FAILED).to_string(),
            LOGIN_FAILED
        );
        assert_eq!(
            AuthError::service(Some("  ".to_string()), SIGNUP_FAILED).to_string(),
            SIGNUP_FAILED
        );
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            INVALID_CREDENTIALS
        );
        assert_eq!(AuthError::AccountNotCreated.to_string(), ACCOUNT_NOT_CREATED);
    }
}
