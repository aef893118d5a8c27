//! Error kinds shared by stores and the account service.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Entity a store operation was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Account,
    Member,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Account => write!(f, "account"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// Caller supplied an invalid or incomplete entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    NameMissing,
    OwnerMissing,
    /// Update requested for an account without an id.
    AccountNotExisting,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameMissing => write!(f, "name is missing"),
            Self::OwnerMissing => write!(f, "owner user id is missing"),
            Self::AccountNotExisting => write!(f, "could not update a not existing account"),
        }
    }
}

impl Error for ValidationError {}

/// Error for store and service operations.
#[derive(Debug)]
pub enum RepoError {
    /// Point lookup, single-row write or role check matched nothing.
    NotFound { entity: EntityKind, key: String },
    Validation(ValidationError),
    /// Underlying store failure, labelled with the operation that issued it.
    Store {
        operation: &'static str,
        source: DbError,
    },
    /// Persisted row cannot be converted into a domain record.
    InvalidData(String),
}

impl RepoError {
    pub fn not_found(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn store(operation: &'static str, source: impl Into<DbError>) -> Self {
        Self::Store {
            operation,
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store { operation, source } => write!(f, "{operation}: {source}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store { source, .. } => Some(source),
            Self::NotFound { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
