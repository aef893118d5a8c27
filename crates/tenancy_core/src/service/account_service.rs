//! Account/membership use-case service.
//!
//! # Responsibility
//! - Compose the account and member stores into tenancy use-cases.
//! - Own cross-table rules: owner membership on create, member cascade on
//!   delete, role lookups and account-with-role views.
//!
//! # Invariants
//! - Never touches a connection directly; only the two store contracts.
//! - A created account gets exactly one `owner` membership, or is removed
//!   again when that membership cannot be written.
//! - Store errors are returned unchanged.
//!
//! # Known gaps
//! - Create and its compensating delete are not atomic; a concurrent reader
//!   can see an account without members in between.
//! - A failed compensating delete is only logged.
//! - If the member cascade fails after the account row is gone, the orphaned
//!   memberships stay behind.

use crate::model::account::{Account, AccountWithRole};
use crate::model::member::Member;
use crate::model::role;
use crate::query::condition::{self, Condition, Direction};
use crate::repo::account_repo::AccountRepository;
use crate::repo::error::{RepoResult, ValidationError};
use crate::repo::member_repo::MemberRepository;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Produces a fresh unique identifier.
pub type IdGenerator = fn() -> String;
/// Returns the current time as Unix epoch seconds.
pub type Clock = fn() -> i64;

/// UUID v4 in hyphenated form.
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Current Unix time in seconds; 0 if the system clock is before the epoch.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Tenancy service over an account store and a member store.
pub struct AccountService<A: AccountRepository, M: MemberRepository> {
    accounts: A,
    members: M,
    new_id: IdGenerator,
    now: Clock,
}

impl<A: AccountRepository, M: MemberRepository> AccountService<A, M> {
    pub fn new(accounts: A, members: M) -> Self {
        Self {
            accounts,
            members,
            new_id: new_uuid,
            now: unix_now,
        }
    }

    /// Replaces the identifier source used for defaulted ids.
    pub fn with_id_generator(mut self, new_id: IdGenerator) -> Self {
        self.new_id = new_id;
        self
    }

    /// Replaces the time source used for defaulted timestamps.
    pub fn with_clock(mut self, now: Clock) -> Self {
        self.now = now;
        self
    }

    pub fn accounts(&self) -> &A {
        &self.accounts
    }

    pub fn members(&self) -> &M {
        &self.members
    }

    pub fn get_account(&self, id: &str) -> RepoResult<Account> {
        self.accounts.get_by_id(id)
    }

    pub fn list_accounts(&self, conditions: &[Condition]) -> RepoResult<Vec<Account>> {
        self.accounts.get_list(conditions)
    }

    /// Creates an account and makes `owner_user_id` its owner.
    ///
    /// Defaults the id and `created_at` when unset. If the owner membership
    /// cannot be written the account row is deleted again (best effort) and
    /// the membership error is returned.
    ///
    /// # Errors
    /// - `Validation(NameMissing)` / `Validation(OwnerMissing)`, before any write.
    /// - Store errors from either insert.
    pub fn create_account(&self, mut account: Account, owner_user_id: &str) -> RepoResult<Account> {
        if account.id.is_empty() {
            account.id = (self.new_id)();
        }
        if account.created_at == 0 {
            account.created_at = (self.now)();
        }
        if account.name.is_empty() {
            return Err(ValidationError::NameMissing.into());
        }
        if owner_user_id.is_empty() {
            return Err(ValidationError::OwnerMissing.into());
        }

        self.accounts.insert(&account)?;

        let owner = Member {
            id: (self.new_id)(),
            account_id: account.id.clone(),
            user_id: owner_user_id.to_string(),
            role: role::OWNER.to_string(),
            created_at: (self.now)(),
        };
        if let Err(err) = self.members.insert(&owner) {
            match self.accounts.delete(&account.id) {
                Ok(()) => warn!(
                    "event=account_compensate module=service status=ok account_id={} cause={}",
                    account.id, err
                ),
                Err(rollback_err) => warn!(
                    "event=account_compensate module=service status=error account_id={} cause={} error={}",
                    account.id, err, rollback_err
                ),
            }
            return Err(err);
        }

        info!(
            "event=account_create module=service status=ok account_id={} owner_member_id={}",
            account.id, owner.id
        );
        Ok(account)
    }

    /// Updates name, disabled flag and update timestamp of an account.
    ///
    /// # Errors
    /// - `Validation(AccountNotExisting)` when the id is empty.
    /// - `Validation(NameMissing)` when the name is empty.
    /// - `NotFound` when no row has this id.
    pub fn update_account(&self, mut account: Account) -> RepoResult<Account> {
        if account.id.is_empty() {
            return Err(ValidationError::AccountNotExisting.into());
        }
        if account.updated_at.is_none() {
            account.updated_at = Some((self.now)());
        }
        if account.name.is_empty() {
            return Err(ValidationError::NameMissing.into());
        }
        self.accounts.update(&account)?;
        Ok(account)
    }

    /// Deletes an account, then all of its memberships.
    ///
    /// The account deletion is not rolled back if the cascade fails.
    pub fn delete_account(&self, id: &str) -> RepoResult<()> {
        self.accounts.delete(id)?;
        if let Err(err) = self.members.delete_by_account_id(id) {
            warn!(
                "event=member_cascade module=service status=error account_id={} error={}",
                id, err
            );
            return Err(err);
        }
        info!("event=account_delete module=service status=ok account_id={id}");
        Ok(())
    }

    /// Adds `user_id` to an account under `role`.
    pub fn add_member(&self, account_id: &str, user_id: &str, role: &str) -> RepoResult<Member> {
        let member = Member {
            id: (self.new_id)(),
            account_id: account_id.to_string(),
            user_id: user_id.to_string(),
            role: role.to_string(),
            created_at: (self.now)(),
        };
        self.members.insert(&member)?;
        Ok(member)
    }

    /// Replaces the role of one membership.
    pub fn change_member_role(&self, member_id: &str, role: &str) -> RepoResult<Member> {
        let mut member = self.members.get_by_id(member_id)?;
        member.role = role.to_string();
        self.members.update(&member)?;
        Ok(member)
    }

    pub fn get_member(&self, id: &str) -> RepoResult<Member> {
        self.members.get_by_id(id)
    }

    pub fn list_members(&self, conditions: &[Condition]) -> RepoResult<Vec<Member>> {
        self.members.get_list(conditions)
    }

    pub fn list_members_by_account_id(
        &self,
        account_id: &str,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Member>> {
        self.members.get_list_by_account_id(account_id, direction, limit, offset)
    }

    pub fn list_members_by_user_id(
        &self,
        user_id: &str,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Member>> {
        self.members.get_list_by_user_id(user_id, direction, limit, offset)
    }

    pub fn delete_member_by_id(&self, id: &str) -> RepoResult<()> {
        self.members.delete(id)
    }

    pub fn delete_members_by_account_id(&self, account_id: &str) -> RepoResult<()> {
        self.members.delete_by_account_id(account_id)
    }

    /// Removes every membership of a user, e.g. when the user is offboarded.
    pub fn delete_members_by_user_id(&self, user_id: &str) -> RepoResult<()> {
        self.members.delete_by_user_id(user_id)
    }

    /// Accounts the user is a member of.
    ///
    /// `conditions` shape the membership query (filters, order, paging); the
    /// result follows the order in which accounts first appear there.
    ///
    /// Accounts are then read with one `IN` query over the distinct account
    /// ids, so the store's bind-variable limit bounds the number of accounts.
    pub fn list_accounts_for_user(
        &self,
        user_id: &str,
        conditions: &[Condition],
    ) -> RepoResult<Vec<Account>> {
        let memberships = self.memberships_of(user_id, conditions)?;
        let account_ids = distinct_account_ids(&memberships);
        let mut by_id = self.accounts_by_id(&account_ids)?;

        Ok(account_ids
            .into_iter()
            .filter_map(|id| by_id.remove(id))
            .collect())
    }

    /// Accounts the user is a member of, each with the user's role there.
    ///
    /// With several memberships on one account the last one listed wins.
    /// Accounts that vanished between the two reads are dropped.
    pub fn list_accounts_with_role_for_user(
        &self,
        user_id: &str,
        conditions: &[Condition],
    ) -> RepoResult<Vec<AccountWithRole>> {
        let memberships = self.memberships_of(user_id, conditions)?;
        let account_ids = distinct_account_ids(&memberships);
        let mut by_id = self.accounts_by_id(&account_ids)?;

        let mut roles: HashMap<&str, &str> = HashMap::new();
        for member in &memberships {
            roles.insert(member.account_id.as_str(), member.role.as_str());
        }

        Ok(account_ids
            .into_iter()
            .filter_map(|id| {
                let account = by_id.remove(id)?;
                let role = roles.get(id)?;
                Some(AccountWithRole {
                    account,
                    role: (*role).to_string(),
                })
            })
            .collect())
    }

    /// Whether the user holds exactly `role` on the account.
    ///
    /// Any store error, not only `NotFound`, reads as `false`.
    pub fn has_role(&self, account_id: &str, user_id: &str, role: &str) -> bool {
        match self.members.has_role(account_id, user_id, role) {
            Ok(()) => true,
            Err(err) => {
                if !err.is_not_found() {
                    debug!(
                        "event=has_role module=service status=error account_id={} user_id={} error={}",
                        account_id, user_id, err
                    );
                }
                false
            }
        }
    }

    fn memberships_of(&self, user_id: &str, conditions: &[Condition]) -> RepoResult<Vec<Member>> {
        let mut member_conditions = conditions.to_vec();
        member_conditions.push(condition::user_id(user_id));
        self.members.get_list(&member_conditions)
    }

    /// Fetches the given accounts in one query, keyed by id.
    ///
    /// Binds one parameter per id, so the store's bind-variable limit caps
    /// how many distinct accounts a single listing can resolve (32766 on
    /// SQLite); beyond that the store error is returned.
    fn accounts_by_id(&self, account_ids: &[&str]) -> RepoResult<HashMap<String, Account>> {
        if account_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let accounts = self.accounts.get_list(&[condition::ids(account_ids)])?;
        Ok(accounts
            .into_iter()
            .map(|account| (account.id.clone(), account))
            .collect())
    }
}

fn distinct_account_ids(memberships: &[Member]) -> Vec<&str> {
    let mut seen = HashSet::new();
    memberships
        .iter()
        .map(|member| member.account_id.as_str())
        .filter(|id| seen.insert(*id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{distinct_account_ids, unix_now};
    use crate::model::member::Member;

    fn member(account_id: &str) -> Member {
        Member {
            account_id: account_id.to_string(),
            ..Member::default()
        }
    }

    #[test]
    fn distinct_account_ids_keep_first_appearance_order() {
        let memberships = vec![member("b"), member("a"), member("b"), member("c")];
        assert_eq!(distinct_account_ids(&memberships), vec!["b", "a", "c"]);
    }

    #[test]
    fn unix_now_is_after_2020() {
        assert!(unix_now() > 1_577_836_800);
    }
}
