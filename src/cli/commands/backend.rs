use clap::{Arg, Command};

pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("api-url")
                .long("api-url")
                .help("Base URL of the PostgREST-style API, example: https://project.tld")
                .env("VESTIBULE_API_URL")
                .global(true)
                .conflicts_with("dsn"),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .help("API key sent as `apikey` and bearer token")
                .env("VESTIBULE_API_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("dsn")
                .short('d')
                .long("dsn")
                .help("Database connection string, calls the procedures directly")
                .env("VESTIBULE_DSN")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new("session-path")
                .long("session-path")
                .help("Session file (default: <data dir>/vestibule/session.json)")
                .env("VESTIBULE_SESSION_PATH")
                .global(true)
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
}
