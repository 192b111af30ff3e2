//! SQLite storage bootstrap for the forum store.
//!
//! # Responsibility
//! - Open and configure SQLite connections for forum entities.
//! - Own the lazily initialized, explicitly passed connection handle.
//! - Create the fixed five-table schema when it is missing.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON` and a bounded busy timeout.
//! - Entity code never runs against a connection that skipped bootstrap.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod handle;
mod open;
pub mod schema;

pub use handle::{DbHandle, DbLocation, DEFAULT_DB_FILE_NAME};
pub use open::{open_db, open_db_in_memory, BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Database path is empty or otherwise unusable.
    InvalidPath(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::InvalidPath(path) => write!(f, "invalid database path `{path}`"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::InvalidPath(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
