//! `CREATE TABLE IF NOT EXISTS` for the two backing tables.

use super::DbResult;
use crate::config::TableNames;
use log::{debug, error};
use rusqlite::Connection;

/// Creates the accounts and members tables if they do not exist yet.
///
/// Existing tables are left untouched; this is not a migration mechanism.
pub fn ensure_schema(conn: &Connection, tables: &TableNames) -> DbResult<()> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {accounts} (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            disabled INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER
        );
        CREATE TABLE IF NOT EXISTS {members} (
            id TEXT PRIMARY KEY,
            account_id TEXT NOT NULL,
            user_id TEXT NOT NULL,
            role TEXT NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_{members}_account_id ON {members} (account_id);
        CREATE INDEX IF NOT EXISTS idx_{members}_user_id ON {members} (user_id);",
        accounts = tables.accounts(),
        members = tables.members(),
    );

    conn.execute_batch(&sql).map_err(|err| {
        error!(
            "event=schema_ensure module=db status=error accounts_table={} members_table={} error={}",
            tables.accounts(),
            tables.members(),
            err
        );
        err
    })?;

    debug!(
        "event=schema_ensure module=db status=ok accounts_table={} members_table={}",
        tables.accounts(),
        tables.members()
    );
    Ok(())
}
