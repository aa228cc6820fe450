use crate::{
    auth::Diagnostics,
    cli::{
        actions::{locale, login, server, session, signup, Action},
        globals::GlobalArgs,
    },
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;
use std::{net::IpAddr, path::PathBuf};

fn globals(matches: &ArgMatches) -> GlobalArgs {
    GlobalArgs {
        api_url: matches.get_one::<String>("api-url").cloned(),
        api_key: matches
            .get_one::<String>("api-key")
            .map(|key| SecretString::from(key.clone())),
        dsn: matches.get_one::<String>("dsn").cloned(),
        session_path: matches.get_one::<PathBuf>("session-path").cloned(),
    }
}

fn required(matches: &ArgMatches, name: &str) -> Result<String> {
    matches
        .get_one::<String>(name)
        .cloned()
        .with_context(|| format!("missing required argument: --{name}"))
}

fn password(matches: &ArgMatches) -> Option<SecretString> {
    matches
        .get_one::<String>("password")
        .map(|password| SecretString::from(password.clone()))
}

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(login::Args {
            globals: globals(sub_m),
            email: required(sub_m, "email")?,
            password: password(sub_m),
        })),
        Some(("signup", sub_m)) => {
            let diagnostics = sub_m
                .get_one::<String>("diagnostics")
                .map_or(Some(Diagnostics::default()), |level| {
                    Diagnostics::parse(level)
                })
                .context("invalid value for --diagnostics")?;

            Ok(Action::Signup(signup::Args {
                globals: globals(sub_m),
                first_name: required(sub_m, "first-name")?,
                last_name: required(sub_m, "last-name")?,
                email: required(sub_m, "email")?,
                phone: sub_m.get_one::<String>("phone").cloned(),
                password: password(sub_m),
                diagnostics,
            }))
        }
        Some(("session", sub_m)) => {
            let (command, cmd_m) = match sub_m.subcommand() {
                Some(("show", cmd_m)) => (session::Command::Show, cmd_m),
                Some(("clear", cmd_m)) => (session::Command::Clear, cmd_m),
                _ => return Err(anyhow!("missing subcommand: show or clear")),
            };

            Ok(Action::Session(session::Args {
                globals: globals(cmd_m),
                command,
            }))
        }
        Some(("locale", sub_m)) => Ok(Action::Locale(locale::Args {
            globals: globals(sub_m),
            set: sub_m.get_one::<String>("set").cloned(),
        })),
        Some(("server", sub_m)) => Ok(Action::Server(server::Args {
            globals: globals(sub_m),
            port: sub_m.get_one::<u16>("port").copied().unwrap_or(8080),
            listen: sub_m
                .get_one::<IpAddr>("listen")
                .copied()
                .unwrap_or(IpAddr::from([127, 0, 0, 1])),
            ephemeral: sub_m.get_flag("ephemeral"),
        })),
        _ => Err(anyhow!("missing subcommand")),
    }
}
