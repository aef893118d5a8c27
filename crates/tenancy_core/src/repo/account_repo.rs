//! Account store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the accounts table.
//! - Run list queries through the condition builder unchanged.
//!
//! # Invariants
//! - Every operation issues exactly one statement.
//! - Update/delete report `NotFound` from the affected-row count.
//! - `created_at` is never written by update.

use super::error::{EntityKind, RepoError, RepoResult};
use super::sqlite::{bool_to_int, build_list_query};
use crate::config::TableNames;
use crate::model::account::Account;
use crate::query::Condition;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const ACCOUNT_COLUMNS: &str = "id, name, disabled, created_at, updated_at";

/// Account store capability.
pub trait AccountRepository {
    fn get_by_id(&self, id: &str) -> RepoResult<Account>;
    /// Possibly-empty list shaped by `conditions`.
    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Account>>;
    fn insert(&self, account: &Account) -> RepoResult<()>;
    /// Full-row update of name, disabled flag and update timestamp.
    fn update(&self, account: &Account) -> RepoResult<()>;
    fn delete(&self, id: &str) -> RepoResult<()>;
}

/// SQLite-backed account store.
pub struct SqliteAccountRepository<'conn> {
    conn: &'conn Connection,
    table: String,
}

impl<'conn> SqliteAccountRepository<'conn> {
    pub fn new(conn: &'conn Connection, tables: &TableNames) -> Self {
        Self {
            conn,
            table: tables.accounts().to_string(),
        }
    }

    fn select_sql(&self) -> String {
        format!("SELECT {ACCOUNT_COLUMNS} FROM {}", self.table)
    }
}

impl AccountRepository for SqliteAccountRepository<'_> {
    fn get_by_id(&self, id: &str) -> RepoResult<Account> {
        const OP: &str = "get account by id";
        let sql = format!("{} WHERE id = ?1", self.select_sql());
        let row = self
            .conn
            .query_row(&sql, [id], |row| Ok(parse_account_row(row)))
            .optional()
            .map_err(|err| RepoError::store(OP, err))?;

        match row {
            Some(parsed) => parsed,
            None => Err(RepoError::not_found(EntityKind::Account, id)),
        }
    }

    fn get_list(&self, conditions: &[Condition]) -> RepoResult<Vec<Account>> {
        const OP: &str = "get accounts list";
        let (sql, values) = build_list_query(&self.select_sql(), conditions);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|err| RepoError::store(OP, err))?;
        let mut rows = stmt
            .query(params_from_iter(values))
            .map_err(|err| RepoError::store(OP, err))?;

        let mut accounts = Vec::new();
        while let Some(row) = rows.next().map_err(|err| RepoError::store(OP, err))? {
            accounts.push(parse_account_row(row)?);
        }
        Ok(accounts)
    }

    fn insert(&self, account: &Account) -> RepoResult<()> {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {} ({ACCOUNT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5)",
                    self.table
                ),
                params![
                    account.id.as_str(),
                    account.name.as_str(),
                    bool_to_int(account.disabled),
                    account.created_at,
                    account.updated_at,
                ],
            )
            .map_err(|err| RepoError::store("insert account", err))?;
        Ok(())
    }

    fn update(&self, account: &Account) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                &format!(
                    "UPDATE {} SET name = ?1, disabled = ?2, updated_at = ?3 WHERE id = ?4",
                    self.table
                ),
                params![
                    account.name.as_str(),
                    bool_to_int(account.disabled),
                    account.updated_at,
                    account.id.as_str(),
                ],
            )
            .map_err(|err| RepoError::store("update account", err))?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Account, &account.id));
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", self.table), [id])
            .map_err(|err| RepoError::store("delete account", err))?;

        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Account, id));
        }
        Ok(())
    }
}

fn parse_account_row(row: &Row<'_>) -> RepoResult<Account> {
    let read = |err: rusqlite::Error| RepoError::store("read account row", err);

    let disabled = match row.get::<_, i64>("disabled").map_err(read)? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid disabled value `{other}` in accounts.disabled"
            )));
        }
    };

    Ok(Account {
        id: row.get("id").map_err(read)?,
        name: row.get("name").map_err(read)?,
        disabled,
        created_at: row.get("created_at").map_err(read)?,
        updated_at: row.get("updated_at").map_err(read)?,
    })
}
