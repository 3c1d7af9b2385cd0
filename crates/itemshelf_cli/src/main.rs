//! `itemshelf` command-line entry point.
//!
//! # Responsibility
//! - Load settings, start logging and open the database once.
//! - Run a single command through the item gateway and close storage.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use commands::Outcome;
use itemshelf_core::{init_from_settings, Database, ItemService, Settings, SqliteItemRepository};
use log::info;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("error: {message}");
            return Outcome::Failure.into();
        }
    };

    if let Err(message) = init_from_settings(&settings) {
        eprintln!("warning: file logging disabled: {message}");
    }

    let database = match Database::open(&settings.database) {
        Ok(database) => database,
        Err(err) => {
            eprintln!("error: failed to open database `{}`: {err}", settings.database.path);
            return Outcome::Failure.into();
        }
    };
    info!(
        "event=cli_start module=cli status=ok in_memory={}",
        database.is_in_memory()
    );

    let outcome = match SqliteItemRepository::try_new(database.connection()) {
        Ok(repo) => {
            let service = ItemService::with_limits(repo, settings.list_limits());
            commands::run(
                &service,
                cli.command,
                &mut std::io::stdout().lock(),
                &mut std::io::stderr().lock(),
            )
        }
        Err(err) => {
            eprintln!("error: {err}");
            Outcome::Failure
        }
    };

    if let Err(err) = database.close() {
        eprintln!("error: failed to close database: {err}");
        return Outcome::Failure.into();
    }

    outcome.into()
}

fn load_settings(cli: &Cli) -> Result<Settings, String> {
    let mut settings = match cli.config.as_deref() {
        Some(path) => Settings::from_file(path),
        None => Settings::from_env(),
    }
    .map_err(|err| err.to_string())?;

    if let Some(db) = cli.db.as_ref() {
        settings.database.path = db.clone();
        settings.validate().map_err(|err| err.to_string())?;
    }
    Ok(settings)
}
