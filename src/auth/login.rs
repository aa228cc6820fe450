use super::{
    error::{AuthError, LOGIN_FAILED},
    interpret,
    procedure::{AuthService, ProcedureCall, VERIFY_USER_LOGIN},
    AuthClient, Credentials, UserRecord,
};
use crate::session;
use secrecy::SecretString;
use tracing::{debug, instrument};

impl<A: AuthService> AuthClient<A> {
    /// Verify credentials with `verify_user_login` and remember the user.
    ///
    /// The email is trimmed and lowercased before it is sent; the password is
    /// passed through untouched. The session write is best-effort and never
    /// changes the outcome.
    ///
    /// # Errors
    /// [`AuthError::Service`] when the call fails, [`AuthError::InvalidCredentials`]
    /// when no user comes back.
    #[instrument(skip(self, email, password))]
    pub async fn login(&self, email: &str, password: SecretString) -> Result<UserRecord, AuthError> {
        let credentials = Credentials::new(email, password);

        debug!("Verifying credentials");

        let call = ProcedureCall::new(VERIFY_USER_LOGIN)
            .param("p_email", credentials.email)
            .param("p_password", credentials.password);

        let response = self.service.call(call).await;
        let user = interpret(response, LOGIN_FAILED, AuthError::InvalidCredentials)?;

        session::remember_user(self.store(), &user);

        debug!("Login successful for user {}", user.id);

        Ok(user)
    }
}
