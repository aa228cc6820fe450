use super::{password_or_stdin, report};
use crate::{
    auth::{AuthClient, Diagnostics, SignupForm},
    cli::globals::GlobalArgs,
    forms::SignupPage,
};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: Option<SecretString>,
    pub diagnostics: Diagnostics,
}

/// Execute the signup action.
/// # Errors
/// Returns an error if the backend cannot be built or the account is not created.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Global args: {:?}", args.globals);

    let client = AuthClient::new(args.globals.backend()?, args.globals.store(false)?);

    let form = SignupForm {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        password: password_or_stdin(args.password)?,
    };

    let page = SignupPage::new(args.diagnostics);
    let outcome = page.submit(&client, form).await?;

    report(&outcome)
}
