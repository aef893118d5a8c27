use tenancy_core::db::{ensure_schema, open_db, open_db_in_memory};
use tenancy_core::TableNames;
use rusqlite::Connection;

#[test]
fn ensure_schema_creates_both_tables_with_expected_columns() {
    let conn = open_db_in_memory().unwrap();
    ensure_schema(&conn, &TableNames::default()).unwrap();

    assert_eq!(
        table_columns(&conn, "accounts"),
        vec!["id", "name", "disabled", "created_at", "updated_at"]
    );
    assert_eq!(
        table_columns(&conn, "members"),
        vec!["id", "account_id", "user_id", "role", "created_at"]
    );
}

#[test]
fn ensure_schema_is_idempotent_on_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tenancy.db");
    let tables = TableNames::default();

    let first = open_db(&path).unwrap();
    ensure_schema(&first, &tables).unwrap();
    first
        .execute(
            "INSERT INTO accounts (id, name, disabled, created_at) VALUES ('a', 'Acme', 0, 1)",
            [],
        )
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    ensure_schema(&second, &tables).unwrap();
    let count: i64 = second
        .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn custom_table_names_are_used() {
    let conn = open_db_in_memory().unwrap();
    let tables = TableNames::new("tenant_accounts", "tenant_members").unwrap();
    ensure_schema(&conn, &tables).unwrap();

    assert!(!table_columns(&conn, "tenant_accounts").is_empty());
    assert!(!table_columns(&conn, "tenant_members").is_empty());
    assert!(table_columns(&conn, "accounts").is_empty());
}

fn table_columns(conn: &Connection, table: &str) -> Vec<String> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});")).unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        columns.push(row.get::<_, String>(1).unwrap());
    }
    columns
}
