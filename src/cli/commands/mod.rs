mod backend;
pub mod logging;

use crate::{auth::Diagnostics, locale::Language};
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};

fn login() -> Command {
    Command::new("login")
        .about("Log in and remember the user in the local session")
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email, trimmed and lowercased before it is sent")
                .env("VESTIBULE_EMAIL")
                .required(true),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .help("Password (read from stdin when omitted)")
                .env("VESTIBULE_PASSWORD")
                .hide_env_values(true),
        )
}

fn signup() -> Command {
    Command::new("signup")
        .about("Create an account")
        .arg(
            Arg::new("first-name")
                .long("first-name")
                .help("First name")
                .required(true),
        )
        .arg(
            Arg::new("last-name")
                .long("last-name")
                .help("Last name")
                .required(true),
        )
        .arg(
            Arg::new("email")
                .short('e')
                .long("email")
                .help("Account email")
                .env("VESTIBULE_EMAIL")
                .required(true),
        )
        .arg(Arg::new("phone").long("phone").help("Phone number"))
        .arg(
            Arg::new("password")
                .long("password")
                .help("Password (read from stdin when omitted)")
                .env("VESTIBULE_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new("diagnostics")
                .long("diagnostics")
                .help("How much to report: none, user details, or every step")
                .default_value(Diagnostics::Silent.as_str())
                .value_parser(Diagnostics::VALUES),
        )
}

fn session() -> Command {
    Command::new("session")
        .about("Inspect or clear the local session")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("Print the remembered user"))
        .subcommand(Command::new("clear").about("Forget the remembered user"))
}

fn locale() -> Command {
    let codes: Vec<&'static str> = Language::ALL.iter().map(|l| l.code()).collect();

    Command::new("locale")
        .about("Show or change the interface language")
        .arg(
            Arg::new("set")
                .long("set")
                .help("Language code to select")
                .value_parser(codes),
        )
}

fn server() -> Command {
    Command::new("server")
        .about("Serve the login and signup pages over HTTP")
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8080")
                .env("VESTIBULE_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new("listen")
                .short('l')
                .long("listen")
                .help("Address to bind")
                .default_value("127.0.0.1")
                .env("VESTIBULE_LISTEN")
                .value_parser(clap::value_parser!(std::net::IpAddr)),
        )
        .arg(
            Arg::new("ephemeral")
                .long("ephemeral")
                .help("Keep the session in memory instead of the session file")
                .action(ArgAction::SetTrue),
        )
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("vestibule")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(signup())
        .subcommand(session())
        .subcommand(locale())
        .subcommand(server());

    let command = backend::with_args(command);
    logging::with_args(command)
}
