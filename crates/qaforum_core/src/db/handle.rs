//! Lazily opened, explicitly owned store handle.
//!
//! # Responsibility
//! - Open the store on first use and hand out the same connection afterwards.
//! - Surface initialization failure to the caller instead of retrying.
//!
//! # Invariants
//! - At most one connection is opened per handle.
//! - The handle is `!Sync`; concurrent callers need their own handle or a
//!   mutex around this one.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use log::debug;
use once_cell::unsync::OnceCell;
use rusqlite::Connection;
use std::path::PathBuf;

/// File name used when callers do not choose one.
pub const DEFAULT_DB_FILE_NAME: &str = "questions.db";

/// Where the handle opens its connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    /// SQLite database file, created when missing.
    File(PathBuf),
    /// Private in-memory database, dropped with the handle.
    Memory,
}

impl Default for DbLocation {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_DB_FILE_NAME))
    }
}

/// Shared connection handle passed to repositories.
#[derive(Debug)]
pub struct DbHandle {
    location: DbLocation,
    conn: OnceCell<Connection>,
}

impl DbHandle {
    /// Creates a handle without touching the store.
    pub fn new(location: DbLocation) -> Self {
        Self {
            location,
            conn: OnceCell::new(),
        }
    }

    /// Handle backed by a fresh in-memory database.
    pub fn in_memory() -> Self {
        Self::new(DbLocation::Memory)
    }

    /// Whether the first `get_connection` call already succeeded.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Returns the shared connection, opening it on first call.
    ///
    /// # Errors
    /// - `DbError::InvalidPath` for an empty file path.
    /// - `DbError::Sqlite` when open or bootstrap fails.
    ///
    /// A failure is returned as is and nothing is cached. The handle does not
    /// retry; calling again is the caller's decision.
    pub fn get_connection(&self) -> DbResult<&Connection> {
        self.conn.get_or_try_init(|| {
            debug!("event=db_handle_init module=db status=start");
            match &self.location {
                DbLocation::File(path) if path.as_os_str().is_empty() => {
                    Err(DbError::InvalidPath(path.display().to_string()))
                }
                DbLocation::File(path) => open_db(path),
                DbLocation::Memory => open_db_in_memory(),
            }
        })
    }

    /// Consumes the handle and returns its connection, if one was opened.
    pub fn into_connection(self) -> Option<Connection> {
        self.conn.into_inner()
    }
}
