//! Tenancy domain model.
//!
//! # Responsibility
//! - Define the account and membership records persisted by the stores.
//! - Provide the joined account-with-role read model.
//!
//! # Invariants
//! - Timestamps are Unix epoch seconds.
//! - Roles are free-form strings; `role` only names the conventional ones.

pub mod account;
pub mod member;
pub mod role;
