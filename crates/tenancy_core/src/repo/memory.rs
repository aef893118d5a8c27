//! In-memory account and member stores.
//!
//! # Responsibility
//! - Satisfy the store contracts without a database, for tests and callers'
//!   own fixtures.
//! - Evaluate `Condition` values the same way the SQL clause would.
//!
//! # Invariants
//! - Rows keep insertion order unless an ORDER BY condition applies.
//! - Absent timestamps sort before present ones, as NULLs do in SQLite.
//! - Primary ids are unique; a duplicate insert is a store failure.

use super::account_repo::AccountRepository;
use super::error::{EntityKind, RepoError, RepoResult};
use super::member_repo::MemberRepository;
use crate::db::DbError;
use crate::model::account::Account;
use crate::model::member::Member;
use crate::query::{Condition, Direction, Field, Order, Param};
use std::cmp::Ordering;
use std::sync::{Mutex, MutexGuard};

/// Field access used to evaluate conditions against records.
trait Record: Clone {
    fn id(&self) -> &str;
    fn field(&self, field: Field) -> Option<Param>;
}

impl Record for Account {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: Field) -> Option<Param> {
        match field {
            Field::Id => Some(Param::Text(self.id.clone())),
            Field::Disabled => Some(Param::Bool(self.disabled)),
            Field::CreatedAt => Some(Param::Integer(self.created_at)),
            Field::UpdatedAt => self.updated_at.map(Param::Integer),
            Field::AccountId | Field::UserId | Field::Role => None,
        }
    }
}

impl Record for Member {
    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, field: Field) -> Option<Param> {
        match field {
            Field::Id => Some(Param::Text(self.id.clone())),
            Field::AccountId => Some(Param::Text(self.account_id.clone())),
            Field::UserId => Some(Param::Text(self.user_id.clone())),
            Field::Role => Some(Param::Text(self.role.clone())),
            Field::CreatedAt => Some(Param::Integer(self.created_at)),
            Field::Disabled | Field::UpdatedAt => None,
        }
    }
}

/// Thread-safe row vector shared by both stores.
struct Table<R> {
    entity: EntityKind,
    rows: Mutex<Vec<R>>,
}

impl<R: Record> Table<R> {
    fn new(entity: EntityKind) -> Self {
        Self {
            entity,
            rows: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self, operation: &'static str) -> RepoResult<MutexGuard<'_, Vec<R>>> {
        self.rows.lock().map_err(|_| {
            RepoError::store(
                operation,
                DbError::Backend(format!("{} table lock poisoned", self.entity)),
            )
        })
    }

    fn get(&self, id: &str, operation: &'static str) -> RepoResult<R> {
        self.lock(operation)?
            .iter()
            .find(|row| row.id() == id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(self.entity, id))
    }

    fn list(&self, conditions: &[Condition], operation: &'static str) -> RepoResult<Vec<R>> {
        let rows = self.lock(operation)?;
        Ok(select(&rows, conditions))
    }

    fn insert(&self, row: R, operation: &'static str) -> RepoResult<()> {
        let mut rows = self.lock(operation)?;
        if rows.iter().any(|existing| existing.id() == row.id()) {
            return Err(RepoError::store(
                operation,
                DbError::Backend(format!("duplicate {} id `{}`", self.entity, row.id())),
            ));
        }
        rows.push(row);
        Ok(())
    }

    fn modify(
        &self,
        id: &str,
        operation: &'static str,
        apply: impl FnOnce(&mut R),
    ) -> RepoResult<()> {
        let mut rows = self.lock(operation)?;
        let row = rows
            .iter_mut()
            .find(|row| row.id() == id)
            .ok_or_else(|| RepoError::not_found(self.entity, id))?;
        apply(row);
        Ok(())
    }

    /// Removes matching rows and returns how many were removed.
    fn remove(&self, operation: &'static str, keep: impl Fn(&R) -> bool) -> RepoResult<usize> {
        let mut rows = self.lock(operation)?;
        let before = rows.len();
        rows.retain(|row| keep(row));
        Ok(before - rows.len())
    }
}

/// In-memory account store.
pub struct MemoryAccountRepository {
    table: Table<Account>,
}

impl MemoryAccountRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(EntityKind::Account),
        }
    }
}

impl Default for MemoryAccountRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountRepository for MemoryAccountRepository {
    fn get_by_id(&self, id: &str) -> RepoResult<Account> {
        self.table.get(id, "get account by id")
    }

    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Account>> {
        self.table.list(conditions, "get accounts list")
    }

    fn insert(&self, account: &Account) -> RepoResult<()> {
        self.table.insert(account.clone(), "insert account")
    }

    fn update(&self, account: &Account) -> RepoResult<()> {
        self.table.modify(&account.id, "update account", |row| {
            row.name = account.name.clone();
            row.disabled = account.disabled;
            row.updated_at = account.updated_at;
        })
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        if self.table.remove("delete account", |row| row.id != id)? == 0 {
            return Err(RepoError::not_found(EntityKind::Account, id));
        }
        Ok(())
    }
}

/// In-memory member store.
pub struct MemoryMemberRepository {
    table: Table<Member>,
}

impl MemoryMemberRepository {
    pub fn new() -> Self {
        Self {
            table: Table::new(EntityKind::Member),
        }
    }
}

impl Default for MemoryMemberRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberRepository for MemoryMemberRepository {
    fn get_by_id(&self, id: &str) -> RepoResult<Member> {
        self.table.get(id, "get member by id")
    }

    fn has_role(&self, account_id: &str, user_id: &str, role: &str) -> RepoResult<()> {
        let found = self.table.lock("check member role")?.iter().any(|member| {
            member.account_id == account_id && member.user_id == user_id && member.role == role
        });
        if found {
            Ok(())
        } else {
            Err(RepoError::not_found(
                EntityKind::Member,
                format!("account={account_id} user={user_id} role={role}"),
            ))
        }
    }

    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Member>> {
        self.table.list(conditions, "get members list")
    }

    fn insert(&self, member: &Member) -> RepoResult<()> {
        self.table.insert(member.clone(), "insert member")
    }

    fn update(&self, member: &Member) -> RepoResult<()> {
        self.table.modify(&member.id, "update member", |row| {
            row.role = member.role.clone();
        })
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        if self.table.remove("delete member", |row| row.id != id)? == 0 {
            return Err(RepoError::not_found(EntityKind::Member, id));
        }
        Ok(())
    }

    fn delete_by_account_id(&self, account_id: &str) -> RepoResult<()> {
        self.table
            .remove("delete members by account id", |row| {
                row.account_id != account_id
            })?;
        Ok(())
    }

    fn delete_by_user_id(&self, user_id: &str) -> RepoResult<()> {
        self.table
            .remove("delete members by user id", |row| row.user_id != user_id)?;
        Ok(())
    }
}

fn select<R: Record>(rows: &[R], conditions: &[Condition]) -> Vec<R> {
    let mut orders: &[Order] = &[];
    let mut limit: Option<i64> = None;
    let mut offset: i64 = 0;
    for condition in conditions {
        match condition {
            Condition::OrderBy(keys) => orders = keys.as_slice(),
            Condition::Limit(value) => limit = Some(*value),
            Condition::Offset(value) => offset = *value,
            _ => {}
        }
    }

    let mut selected: Vec<R> = rows
        .iter()
        .filter(|row| conditions.iter().all(|condition| satisfies(*row, condition)))
        .cloned()
        .collect();

    if !orders.is_empty() {
        selected.sort_by(|a, b| compare(a, b, orders));
    }

    let skip = usize::try_from(offset).unwrap_or(0);
    let take = match limit {
        Some(value) if value >= 0 => usize::try_from(value).unwrap_or(usize::MAX),
        _ => usize::MAX,
    };
    selected.into_iter().skip(skip).take(take).collect()
}

fn satisfies<R: Record>(row: &R, condition: &Condition) -> bool {
    match condition {
        Condition::Equals { field, value } => row.field(*field).as_ref() == Some(value),
        Condition::InSet { field, values } => row
            .field(*field)
            .is_some_and(|current| values.contains(&current)),
        Condition::OrderBy(_) | Condition::Limit(_) | Condition::Offset(_) => true,
    }
}

fn compare<R: Record>(a: &R, b: &R, orders: &[Order]) -> Ordering {
    for order in orders {
        let ordering = a.field(order.field()).cmp(&b.field(order.field()));
        let ordering = match order.direction() {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::{MemoryAccountRepository, MemoryMemberRepository};
    use crate::model::account::Account;
    use crate::model::member::Member;
    use crate::query::condition::{disabled, ids, limit, offset, order_by, role, user_id};
    use crate::query::{Direction, Order};
    use crate::repo::{AccountRepository, MemberRepository, RepoError};

    fn account(id: &str, created_at: i64, updated_at: Option<i64>) -> Account {
        Account {
            id: id.to_string(),
            name: format!("Account {id}"),
            disabled: false,
            created_at,
            updated_at,
        }
    }

    fn member(id: &str, account_id: &str, user: &str, member_role: &str, created_at: i64) -> Member {
        Member {
            id: id.to_string(),
            account_id: account_id.to_string(),
            user_id: user.to_string(),
            role: member_role.to_string(),
            created_at,
        }
    }

    #[test]
    fn list_orders_with_absent_timestamps_first() {
        let repo = MemoryAccountRepository::new();
        repo.insert(&account("a", 30, Some(5))).unwrap();
        repo.insert(&account("b", 10, None)).unwrap();
        repo.insert(&account("c", 20, Some(1))).unwrap();

        let by_updated = repo
            .get_list(&[order_by(&[Order::UpdatedAtAsc])])
            .unwrap();
        let order: Vec<&str> = by_updated.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["b", "c", "a"]);

        let by_created_desc = repo
            .get_list(&[order_by(&[Order::CreatedAtDesc]), limit(2)])
            .unwrap();
        let order: Vec<&str> = by_created_desc.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn later_empty_order_by_clears_earlier_ordering() {
        let repo = MemoryAccountRepository::new();
        repo.insert(&account("a", 1, None)).unwrap();
        repo.insert(&account("b", 3, None)).unwrap();
        repo.insert(&account("c", 2, None)).unwrap();

        let listed = repo
            .get_list(&[order_by(&[Order::CreatedAtDesc]), order_by(&[])])
            .unwrap();
        let order: Vec<&str> = listed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn list_applies_filters_and_offset() {
        let repo = MemoryAccountRepository::new();
        let mut off = account("x", 1, None);
        off.disabled = true;
        repo.insert(&off).unwrap();
        repo.insert(&account("y", 2, None)).unwrap();
        repo.insert(&account("z", 3, None)).unwrap();

        let enabled = repo.get_list(&[disabled(false), offset(1)]).unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].id, "z");

        let picked = repo.get_list(&[ids(&["z", "x"])]).unwrap();
        let order: Vec<&str> = picked.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, vec!["x", "z"]);
    }

    #[test]
    fn duplicate_insert_is_a_store_failure() {
        let repo = MemoryAccountRepository::new();
        repo.insert(&account("dup", 1, None)).unwrap();
        let err = repo.insert(&account("dup", 2, None)).unwrap_err();
        assert!(matches!(err, RepoError::Store { operation: "insert account", .. }));
    }

    #[test]
    fn member_role_checks_and_bulk_deletes() {
        let repo = MemoryMemberRepository::new();
        repo.insert(&member("m1", "acc", "u1", "owner", 1)).unwrap();
        repo.insert(&member("m2", "acc", "u2", "guest", 2)).unwrap();
        repo.insert(&member("m3", "other", "u1", "admin", 3)).unwrap();

        assert!(repo.has_role("acc", "u1", "owner").is_ok());
        assert!(repo.has_role("acc", "u1", "guest").unwrap_err().is_not_found());

        let owners = repo.get_list(&[role("owner"), user_id("u1")]).unwrap();
        assert_eq!(owners.len(), 1);

        repo.delete_by_user_id("u1").unwrap();
        let remaining = repo.get_list_by_account_id("acc", Direction::Asc, 0, 0).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "m2");

        repo.delete_by_account_id("missing").unwrap();
        assert!(repo.delete("m1").unwrap_err().is_not_found());
    }
}
