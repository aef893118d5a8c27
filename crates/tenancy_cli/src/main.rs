//! CLI smoke entry point.
//!
//! # Responsibility
//! - Exercise the core crate end to end against a SQLite file.
//! - Print the newest owned accounts of one demo user.
//!
//! Usage: `tenancy_cli [DB_PATH]` (defaults to `./tenancy.db`).

use std::process::ExitCode;
use tenancy_core::db::{ensure_schema, open_db};
use tenancy_core::model::role;
use tenancy_core::query::condition::{limit, order_by, role as role_is};
use tenancy_core::{
    init_logging, Account, AccountService, LogSettings, Order, SqliteAccountRepository,
    SqliteMemberRepository, TableNames,
};

const DEMO_USER_ID: &str = "4086bf60-112b-11ea-8323-075003f81360";
const DEFAULT_DB_PATH: &str = "./tenancy.db";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(settings) = LogSettings::from_env()? {
        init_logging(&settings)?;
    }

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
    let tables = TableNames::default();
    let conn = open_db(&db_path)?;
    ensure_schema(&conn, &tables)?;

    let service = AccountService::new(
        SqliteAccountRepository::new(&conn, &tables),
        SqliteMemberRepository::new(&conn, &tables),
    );

    for _ in 0..3 {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        let name = format!("The App {}", &suffix[..5]);
        service.create_account(Account::new(name), DEMO_USER_ID)?;
    }

    let listed = service.list_accounts_with_role_for_user(
        DEMO_USER_ID,
        &[
            order_by(&[Order::CreatedAtDesc]),
            limit(3),
            role_is(role::OWNER),
        ],
    )?;

    println!("tenancy_core version={}", tenancy_core::core_version());
    println!("accounts in list: {}", listed.len());
    for item in &listed {
        println!(
            "role: {}; account: {}; created_at: {}",
            item.role, item.account.name, item.account.created_at
        );
    }
    Ok(())
}
