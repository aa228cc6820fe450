use crate::{cli::globals::GlobalArgs, session};
use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Show,
    Clear,
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub command: Command,
}

/// Execute the session action.
/// # Errors
/// Returns an error if the session file cannot be located or cleared.
pub fn execute(args: &Args) -> Result<()> {
    let store = args.globals.store(false)?;

    match args.command {
        Command::Show => match session::current_user(store.as_ref()) {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => println!("Not logged in"),
        },
        Command::Clear => {
            session::clear(store.as_ref()).context("could not clear the session")?;
            println!("Session cleared");
        }
    }

    Ok(())
}
