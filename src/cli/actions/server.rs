use crate::{
    api::{self, AppState},
    cli::globals::{redact_dsn, GlobalArgs},
};
use anyhow::Result;
use std::{net::IpAddr, sync::Arc};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub port: u16,
    pub listen: IpAddr,
    pub ephemeral: bool,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the backend cannot be built or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    debug!("Global args: {:?}", args.globals);

    let backend = args.globals.backend()?;
    let store = args.globals.store(args.ephemeral)?;

    log_startup_args(&args, backend.kind());

    let state = Arc::new(AppState::new(backend, store));

    api::new(args.listen, args.port, state).await
}

fn log_startup_args(args: &Args, backend: &str) {
    let session = if args.ephemeral {
        "memory".to_string()
    } else {
        args.globals
            .session_path()
            .map_or_else(|_| "none".to_string(), |path| path.display().to_string())
    };

    let target = match (&args.globals.api_url, &args.globals.dsn) {
        (Some(url), _) => url.clone(),
        (None, Some(dsn)) => redact_dsn(dsn),
        (None, None) => "none".to_string(),
    };

    let entries = [
        ("listen", format!("{}:{}", args.listen, args.port)),
        ("backend", backend.to_string()),
        ("target", target),
        ("api_key_set", args.globals.api_key.is_some().to_string()),
        ("session", session),
    ];

    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!(
        "{} {} - {}\n\nStartup configuration:",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        short_commit(crate::GIT_COMMIT_HASH)
    );
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}
