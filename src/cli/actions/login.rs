use super::{password_or_stdin, report};
use crate::{auth::AuthClient, cli::globals::GlobalArgs, forms::LoginPage};
use anyhow::Result;
use secrecy::SecretString;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: Option<SecretString>,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the backend cannot be built or the login fails.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Global args: {:?}", args.globals);

    let client = AuthClient::new(args.globals.backend()?, args.globals.store(false)?);
    let password = password_or_stdin(args.password)?;

    let page = LoginPage::new();
    let result = page.submit(&client, &args.email, password).await?;

    report(&LoginPage::render(&result))
}
