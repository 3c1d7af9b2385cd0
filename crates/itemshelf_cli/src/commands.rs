//! Command dispatch against the item gateway.
//!
//! # Responsibility
//! - Translate parsed commands into `ItemService` calls.
//! - Render items as JSON lines and map outcomes to exit codes.
//!
//! # Invariants
//! - Not-found is reported on stderr with exit code 1, never as a crash.
//! - Nothing is written to stdout for failed commands.

use crate::cli::Command;
use itemshelf_core::{core_version, Item, ItemDraft, ItemRepository, ItemService, RepoError};
use log::warn;
use std::io::{self, Write};
use std::process::ExitCode;

/// Result class of one command, mirrored in the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    NotFound,
    Invalid,
    Failure,
}

impl Outcome {
    pub fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::NotFound => 1,
            Self::Invalid => 2,
            Self::Failure => 3,
        }
    }
}

impl From<Outcome> for ExitCode {
    fn from(value: Outcome) -> Self {
        ExitCode::from(value.code())
    }
}

/// Runs one command, writing results to `out` and diagnostics to `err`.
pub fn run<R, O, E>(service: &ItemService<R>, command: Command, out: &mut O, err: &mut E) -> Outcome
where
    R: ItemRepository,
    O: Write,
    E: Write,
{
    match execute(service, command, out, err) {
        Ok(outcome) => outcome,
        Err(CommandError::Repo(repo_err)) => {
            let outcome = classify(&repo_err);
            if outcome == Outcome::Failure {
                warn!("event=cli_command module=cli status=error error={repo_err}");
            }
            let _ = writeln!(err, "error: {repo_err}");
            outcome
        }
        Err(CommandError::Io(io_err)) => {
            let _ = writeln!(err, "error: failed to write output: {io_err}");
            Outcome::Failure
        }
    }
}

enum CommandError {
    Repo(RepoError),
    Io(io::Error),
}

impl From<RepoError> for CommandError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<io::Error> for CommandError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

fn execute<R, O, E>(
    service: &ItemService<R>,
    command: Command,
    out: &mut O,
    err: &mut E,
) -> Result<Outcome, CommandError>
where
    R: ItemRepository,
    O: Write,
    E: Write,
{
    match command {
        Command::List { skip, limit } => {
            let items = match limit {
                Some(limit) => service.list(skip, limit)?,
                None => service.list_default(skip)?,
            };
            for item in &items {
                write_item(out, item)?;
            }
            Ok(Outcome::Success)
        }
        Command::Get { id } => match service.get(&id)? {
            Some(item) => {
                write_item(out, &item)?;
                Ok(Outcome::Success)
            }
            None => not_found(err, &id),
        },
        Command::Create { name, description } => {
            let draft = ItemDraft::new(name, description).map_err(RepoError::from)?;
            let item = service.create(&draft)?;
            write_item(out, &item)?;
            writeln!(err, "Item created successfully!")?;
            Ok(Outcome::Success)
        }
        Command::Update {
            id,
            name,
            description,
        } => {
            let draft = ItemDraft::new(name, description).map_err(RepoError::from)?;
            match service.update(&id, &draft)? {
                Some(item) => {
                    write_item(out, &item)?;
                    writeln!(err, "Item updated successfully!")?;
                    Ok(Outcome::Success)
                }
                None => not_found(err, &id),
            }
        }
        Command::Delete { id } => match service.delete(&id)? {
            Some(item) => {
                write_item(out, &item)?;
                writeln!(err, "Item deleted successfully!")?;
                Ok(Outcome::Success)
            }
            None => not_found(err, &id),
        },
        Command::Version => {
            writeln!(out, "itemshelf_core version={}", core_version())?;
            Ok(Outcome::Success)
        }
    }
}

fn write_item<O: Write>(out: &mut O, item: &Item) -> Result<(), CommandError> {
    let line = serde_json::to_string(item).map_err(io::Error::from)?;
    writeln!(out, "{line}")?;
    Ok(())
}

fn not_found<E: Write>(err: &mut E, id: &str) -> Result<Outcome, CommandError> {
    writeln!(err, "item not found: {id}")?;
    Ok(Outcome::NotFound)
}

fn classify(err: &RepoError) -> Outcome {
    match err {
        RepoError::Validation(_) | RepoError::InvalidQuery(_) => Outcome::Invalid,
        RepoError::NotFound(_) => Outcome::NotFound,
        _ => Outcome::Failure,
    }
}
