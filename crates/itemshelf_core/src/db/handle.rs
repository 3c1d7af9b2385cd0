//! Process-wide database handle.
//!
//! # Responsibility
//! - Own the single connection a process uses for its lifetime.
//! - Make open and close explicit lifecycle steps.
//!
//! # Invariants
//! - A `Database` always wraps a migrated connection.
//! - Closing consumes the handle; it cannot be used afterwards.

use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use crate::config::DatabaseSettings;
use log::{error, info};
use rusqlite::Connection;

/// Path value selecting a private in-memory database.
pub const IN_MEMORY_PATH: &str = ":memory:";

/// Single connection handle shared by reference across the process.
pub struct Database {
    conn: Connection,
    path: String,
}

impl Database {
    /// Opens the configured database and applies migrations.
    pub fn open(settings: &DatabaseSettings) -> DbResult<Self> {
        let path = settings.path.trim();
        let conn = if path == IN_MEMORY_PATH {
            open_db_in_memory()?
        } else {
            open_db(path)?
        };
        Ok(Self {
            conn,
            path: path.to_string(),
        })
    }

    /// Borrows the underlying connection for repository construction.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_in_memory(&self) -> bool {
        self.path == IN_MEMORY_PATH
    }

    /// Closes the connection, flushing pending work.
    ///
    /// On failure the connection is dropped anyway and the error is returned.
    pub fn close(self) -> DbResult<()> {
        match self.conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_conn, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(DbError::Sqlite(err))
            }
        }
    }
}
