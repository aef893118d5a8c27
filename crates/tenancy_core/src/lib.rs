//! Multi-tenant accounts and memberships over a relational store.
//! This crate owns list-query construction and the account/member invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use config::{default_log_level, ConfigError, LogSettings, TableNames};
pub use logging::{init_logging, logging_status};
pub use model::account::{Account, AccountWithRole};
pub use model::member::Member;
pub use query::{conditions_to_query, Condition, ConditionQuery, Order, Param};
pub use repo::{
    AccountRepository, EntityKind, MemberRepository, MemoryAccountRepository,
    MemoryMemberRepository, RepoError, RepoResult, SqliteAccountRepository,
    SqliteMemberRepository, ValidationError,
};
pub use service::account_service::AccountService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
