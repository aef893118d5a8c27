//! SQLite connection bootstrap and table creation.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections for the stores.
//! - Create the accounts/members tables when they are missing.
//!
//! # Invariants
//! - No foreign key ties members to accounts; the service keeps them
//!   consistent procedurally.
//! - Table names always come from a validated `TableNames`.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::ensure_schema;

pub type DbResult<T> = Result<T, DbError>;

/// Failure reported by the underlying store.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Failure from a non-SQLite backend, carried as text.
    Backend(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "{message}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
