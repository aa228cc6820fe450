use crate::{
    cli::globals::GlobalArgs,
    locale::{Language, LocaleState},
};
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub set: Option<String>,
}

/// Execute the locale action.
/// # Errors
/// Returns an error if the session file cannot be located or the code is unknown.
pub fn execute(args: &Args) -> Result<()> {
    let state = LocaleState::load(args.globals.store(false)?);

    if let Some(code) = &args.set {
        let language =
            Language::from_code(code).ok_or_else(|| anyhow!("Unknown language: {code}"))?;
        state.select(language);
    }

    for option in state.options() {
        let marker = if option.selected { "*" } else { " " };
        println!("{marker} {} {}", option.code, option.label);
    }

    Ok(())
}
