//! Store contracts and their implementations.
//!
//! # Responsibility
//! - Define the account and member store capabilities the service depends on.
//! - Provide SQLite-backed and in-memory implementations of both.
//!
//! # Invariants
//! - Each store owns only its own table; cross-table rules live in the service.
//! - "No matching row" becomes `RepoError::NotFound`; every other backend
//!   failure becomes `RepoError::Store` labelled with the operation.
//! - Stores never retry.

pub mod account_repo;
pub mod error;
pub mod member_repo;
pub mod memory;
mod sqlite;

pub use account_repo::{AccountRepository, SqliteAccountRepository};
pub use error::{EntityKind, RepoError, RepoResult, ValidationError};
pub use member_repo::{MemberRepository, SqliteMemberRepository};
pub use memory::{MemoryAccountRepository, MemoryMemberRepository};
