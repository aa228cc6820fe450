pub mod locale;
pub mod login;
pub mod server;
pub mod session;
pub mod signup;

// The match over `Action` lives in `run` so this file stays a list.
mod run;

use crate::forms::FormOutcome;
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use std::io::BufRead;

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Signup(signup::Args),
    Session(session::Args),
    Locale(locale::Args),
    Server(server::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Use the given password or read one line from stdin.
fn password_or_stdin(password: Option<SecretString>) -> Result<SecretString> {
    if let Some(password) = password {
        return Ok(password);
    }

    eprint!("Password: ");

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("could not read the password from stdin")?;

    Ok(SecretString::from(
        line.trim_end_matches(['\r', '\n']).to_string(),
    ))
}

/// Print a successful outcome to stdout, or turn a failed one into an error.
fn report(outcome: &FormOutcome) -> Result<()> {
    if !outcome.is_success() {
        for detail in &outcome.details {
            eprintln!("  {detail}");
        }

        return Err(match &outcome.kind {
            Some(kind) => anyhow!("{} ({kind})", outcome.message),
            None => anyhow!("{}", outcome.message),
        });
    }

    println!("{}", outcome.message);
    for detail in &outcome.details {
        println!("  {detail}");
    }
    if let Some(user) = &outcome.user {
        println!("{}", serde_json::to_string_pretty(user)?);
    }

    Ok(())
}
