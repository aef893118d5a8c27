//! Member store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the members table.
//! - Provide bulk deletes by account or user, used for cascade and offboarding.
//! - Answer role checks for an (account, user, role) triple.
//!
//! # Invariants
//! - Every operation issues exactly one statement.
//! - Single-row update/delete report `NotFound`; bulk deletes never do.
//! - Only `role` is mutable after insert.

use super::error::{EntityKind, RepoError, RepoResult};
use super::sqlite::build_list_query;
use crate::config::TableNames;
use crate::model::member::Member;
use crate::query::condition::{self, Condition, Direction, Order};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const MEMBER_COLUMNS: &str = "id, account_id, user_id, role, created_at";

/// Member store capability.
pub trait MemberRepository {
    fn get_by_id(&self, id: &str) -> RepoResult<Member>;
    /// Succeeds when a membership with exactly this triple exists.
    fn has_role(&self, account_id: &str, user_id: &str, role: &str) -> RepoResult<()>;
    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Member>>;
    fn insert(&self, member: &Member) -> RepoResult<()>;
    /// Replaces the role of an existing membership.
    fn update(&self, member: &Member) -> RepoResult<()>;
    fn delete(&self, id: &str) -> RepoResult<()>;
    fn delete_by_account_id(&self, account_id: &str) -> RepoResult<()>;
    fn delete_by_user_id(&self, user_id: &str) -> RepoResult<()>;

    /// Memberships of one account, sorted by creation time in `direction`.
    fn get_list_by_account_id(
        &self,
        account_id: &str,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Member>> {
        self.get_list(&[
            condition::account_id(account_id),
            condition::order_by(&[created_at_order(direction)]),
            condition::limit(limit),
            condition::offset(offset),
        ])
    }

    /// Memberships of one user, sorted by creation time in `direction`.
    fn get_list_by_user_id(
        &self,
        user_id: &str,
        direction: Direction,
        limit: i64,
        offset: i64,
    ) -> RepoResult<Vec<Member>> {
        self.get_list(&[
            condition::user_id(user_id),
            condition::order_by(&[created_at_order(direction)]),
            condition::limit(limit),
            condition::offset(offset),
        ])
    }
}

fn created_at_order(direction: Direction) -> Order {
    match direction {
        Direction::Asc => Order::CreatedAtAsc,
        Direction::Desc => Order::CreatedAtDesc,
    }
}

/// SQLite-backed member store.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
    table: String,
}

impl<'conn> SqliteMemberRepository<'conn> {
    pub fn new(conn: &'conn Connection, tables: &TableNames) -> Self {
        Self {
            conn,
            table: tables.members().to_string(),
        }
    }

    fn delete_where(&self, column: &str, value: &str, operation: &'static str) -> RepoResult<usize> {
        self.conn
            .execute(
                &format!("DELETE FROM {} WHERE {column} = ?1", self.table),
                [value],
            )
            .map_err(|err| RepoError::store(operation, err))
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn get_by_id(&self, id: &str) -> RepoResult<Member> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM {} WHERE id = ?1", self.table);
        let row = self
            .conn
            .query_row(&sql, [id], |row| Ok(parse_member_row(row)))
            .optional()
            .map_err(|err| RepoError::store("get member by id", err))?;

        match row {
            Some(parsed) => parsed,
            None => Err(RepoError::not_found(EntityKind::Member, id)),
        }
    }

    fn has_role(&self, account_id: &str, user_id: &str, role: &str) -> RepoResult<()> {
        let exists: i64 = self
            .conn
            .query_row(
                &format!(
                    "SELECT EXISTS(
                        SELECT 1 FROM {}
                        WHERE account_id = ?1 AND user_id = ?2 AND role = ?3
                    )",
                    self.table
                ),
                params![account_id, user_id, role],
                |row| row.get(0),
            )
            .map_err(|err| RepoError::store("check member role", err))?;

        if exists == 1 {
            Ok(())
        } else {
            Err(RepoError::not_found(
                EntityKind::Member,
                format!("account={account_id} user={user_id} role={role}"),
            ))
        }
    }

    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Member>> {
        const OP: &str = "get members list";
        let select = format!("SELECT {MEMBER_COLUMNS} FROM {}", self.table);
        let (sql, values) = build_list_query(&select, conditions);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| RepoError::store(OP, err))?;
        let mut rows = stmt
            .query(params_from_iter(values))
            .map_err(|err| RepoError::store(OP, err))?;

        let mut members = Vec::new();
        while let Some(row) = rows.next().map_err(|err| RepoError::store(OP, err))? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }

    fn insert(&self, member: &Member) -> RepoResult<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} ({MEMBER_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)",
                    self.table
                ),
                params![
                    member.id.as_str(),
                    member.account_id.as_str(),
                    member.user_id.as_str(),
                    member.role.as_str(),
                    member.created_at,
                ],
            )
            .map_err(|err| RepoError::store("insert member", err))?;
        Ok(())
    }

    fn update(&self, member: &Member) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                &format!("UPDATE {} SET role = ?1 WHERE id = ?2", self.table),
                params![member.role.as_str(), member.id.as_str()],
            )
            .map_err(|err| RepoError::store("update member", err))?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Member, &member.id));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        if self.delete_where("id", id, "delete member")? == 0 {
            return Err(RepoError::not_found(EntityKind::Member, id));
        }
        Ok(())
    }

    fn delete_by_account_id(&self, account_id: &str) -> RepoResult<()> {
        self.delete_where("account_id", account_id, "delete members by account id")?;
        Ok(())
    }

    fn delete_by_user_id(&self, user_id: &str) -> RepoResult<()> {
        self.delete_where("user_id", user_id, "delete members by user id")?;
        Ok(())
    }
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let read = |err: rusqlite::Error| RepoError::store("read member row", err);
    Ok(Member {
        id: row.get("id").map_err(read)?,
        account_id: row.get("account_id").map_err(read)?,
        user_id: row.get("user_id").map_err(read)?,
        role: row.get("role").map_err(read)?,
        created_at: row.get("created_at").map_err(read)?,
    })
}
