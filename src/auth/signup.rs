//! Account creation through `register_user`.
//!
//! The signup pages differ only in how much they report, so the workflow takes
//! a [`Diagnostics`] level instead of having one implementation per page.

use super::{
    error::{AuthError, SIGNUP_FAILED},
    interpret,
    procedure::{AuthService, ProcedureCall, REGISTER_USER},
    AuthClient, RpcResponse, SignupForm, UserRecord,
};
use crate::session::{self, SESSION_KEY};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

/// How much a signup page reports about what happened.
#[derive(ToSchema, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Diagnostics {
    /// Outcome message only.
    #[default]
    #[serde(rename = "none")]
    Silent,
    /// Outcome message plus user-facing details.
    User,
    /// Everything above plus a console step trace.
    Verbose,
}

impl Diagnostics {
    pub const VALUES: [&'static str; 3] = ["none", "user", "verbose"];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Silent => "none",
            Self::User => "user",
            Self::Verbose => "verbose",
        }
    }

    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "none" | "simple" => Some(Self::Silent),
            "user" | "complete" => Some(Self::User),
            "verbose" | "diagnostics" => Some(Self::Verbose),
            _ => None,
        }
    }

    #[must_use]
    pub const fn shows_details(self) -> bool {
        !matches!(self, Self::Silent)
    }
}

/// Result of one signup plus the steps recorded at [`Diagnostics::Verbose`].
#[derive(Debug)]
pub struct SignupAttempt {
    pub result: Result<UserRecord, AuthError>,
    pub steps: Vec<String>,
}

struct StepTrace {
    verbose: bool,
    steps: Vec<String>,
}

impl StepTrace {
    const fn new(diagnostics: Diagnostics) -> Self {
        Self {
            verbose: matches!(diagnostics, Diagnostics::Verbose),
            steps: Vec::new(),
        }
    }

    fn step(&mut self, message: String) {
        if self.verbose {
            info!("signup: {}", message);
            self.steps.push(message);
        } else {
            debug!("signup: {}", message);
        }
    }
}

fn describe(response: &RpcResponse) -> String {
    match response {
        RpcResponse::Error(Some(message)) => format!("error ({message})"),
        RpcResponse::Error(None) => "error without message".to_string(),
        RpcResponse::Empty => "no record".to_string(),
        RpcResponse::Single(_) => "one record".to_string(),
        RpcResponse::Many(items) => format!("{} record(s)", items.len()),
    }
}

impl<A: AuthService> AuthClient<A> {
    /// Create an account with `register_user` and remember the new user.
    #[instrument(skip(self, form, diagnostics), fields(diagnostics = diagnostics.as_str()))]
    pub async fn signup(&self, form: SignupForm, diagnostics: Diagnostics) -> SignupAttempt {
        let mut trace = StepTrace::new(diagnostics);

        let form = form.normalized();
        trace.step("normalized signup form".to_string());

        let call = ProcedureCall::new(REGISTER_USER)
            .param("p_first_name", form.first_name)
            .param("p_last_name", form.last_name)
            .param("p_email", form.email)
            .param("p_phone", form.phone)
            .param("p_password", form.password);

        trace.step(format!("calling {REGISTER_USER}"));
        let response = self.service.call(call).await;
        trace.step(format!("{REGISTER_USER} answered with {}", describe(&response)));

        let result = interpret(response, SIGNUP_FAILED, AuthError::AccountNotCreated);

        match &result {
            Ok(user) => {
                trace.step(format!("account {} created", user.id));
                session::remember_user(self.store(), user);
                trace.step(format!("session write requested under {SESSION_KEY}"));
            }
            Err(err) => trace.step(format!("signup failed: {}: {}", err.kind(), err)),
        }

        SignupAttempt {
            result,
            steps: trace.steps,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::test_support::{user_json, FakeService};
    use crate::session::{current_user, MemorySessionStore};
    use secrecy::SecretString;
    use serde_json::json;
    use std::sync::Arc;

    fn form() -> SignupForm {
        SignupForm {
            first_name: " Jane ".to_string(),
            last_name: "Doe ".to_string(),
            email: " Jane@Example.COM".to_string(),
            phone: Some(" ".to_string()),
            password: SecretString::from("hunter2"),
        }
    }

    fn client(service: FakeService) -> (AuthClient<FakeService>, Arc<MemorySessionStore>) {
        let store = Arc::new(MemorySessionStore::new());
        (AuthClient::new(service, store.clone()), store)
    }

    #[test]
    fn parses_levels_and_page_names() {
        assert_eq!(Diagnostics::parse("none"), Some(Diagnostics::Silent));
        assert_eq!(Diagnostics::parse("Complete"), Some(Diagnostics::User));
        assert_eq!(Diagnostics::parse(" verbose "), Some(Diagnostics::Verbose));
        assert_eq!(Diagnostics::parse("loud"), None);
        for value in Diagnostics::VALUES {
            assert_eq!(Diagnostics::parse(value).map(Diagnostics::as_str), Some(value));
        }
    }

    #[test]
    fn serde_names_match_cli_values() -> Result<(), serde_json::Error> {
        assert_eq!(serde_json::to_value(Diagnostics::Silent)?, json!("none"));
        assert_eq!(serde_json::to_value(Diagnostics::Verbose)?, json!("verbose"));
        Ok(())
    }

    #[tokio::test]
    async fn sends_normalized_form() {
        let (client, _) = client(FakeService::answering(user_json("u-9", "jane@example.com")));

        let attempt = client.signup(form(), Diagnostics::Silent).await;

        assert!(attempt.result.is_ok());
        let seen = client.service().seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].procedure, "register_user");
        assert_eq!(
            seen[0].body,
            json!({
                "p_first_name": "Jane",
                "p_last_name": "Doe",
                "p_email": "jane@example.com",
                "p_phone": null,
                "p_password": "hunter2"
            })
        );
    }

    #[tokio::test]
    async fn success_is_remembered() {
        let (client, store) = client(FakeService::answering(json!([user_json(
            "u-9",
            "jane@example.com"
        )])));

        let attempt = client.signup(form(), Diagnostics::User).await;

        assert_eq!(
            current_user(store.as_ref()).map(|user| user.id),
            Some("u-9".to_string())
        );
        assert!(attempt.steps.is_empty());
    }

    #[tokio::test]
    async fn empty_answer_is_account_not_created() {
        let (client, store) = client(FakeService::answering(json!([])));

        let attempt = client.signup(form(), Diagnostics::Silent).await;

        assert_eq!(attempt.result, Err(AuthError::AccountNotCreated));
        assert_eq!(current_user(store.as_ref()), None);
    }

    #[tokio::test]
    async fn service_error_falls_back_to_signup_failed() {
        let (client, _) = client(FakeService::new(vec![RpcResponse::Error(None)]));

        let attempt = client.signup(form(), Diagnostics::Silent).await;

        assert_eq!(
            attempt.result.map_err(|err| err.to_string()),
            Err("Signup failed".to_string())
        );
    }

    #[tokio::test]
    async fn verbose_records_steps_without_secrets() {
        let (client, _) = client(FakeService::new(vec![RpcResponse::Error(Some(
            "duplicate key value violates unique constraint".to_string(),
        ))]));

        let attempt = client.signup(form(), Diagnostics::Verbose).await;

        assert!(attempt.result.is_err());
        assert_eq!(attempt.steps.len(), 4);
        assert!(attempt.steps[0].contains("jane@example.com"));
        assert!(attempt
            .steps
            .iter()
            .any(|step| step.contains("AuthServiceError")));
        assert!(attempt.steps.iter().all(|step| !step.contains("hunter2")));
    }

    #[tokio::test]
    async fn verbosity_does_not_change_the_outcome() {
        let mut outcomes = Vec::new();
        for level in [Diagnostics::Silent, Diagnostics::User, Diagnostics::Verbose] {
            let (client, _) = client(FakeService::answering(user_json("u-9", "jane@example.com")));
            outcomes.push(client.signup(form(), level).await.result);
        }

        assert!(outcomes.iter().all(|outcome| outcome == &outcomes[0]));
    }
}
