//! Runtime configuration for stores and logging.
//!
//! # Responsibility
//! - Carry table names, which are interpolated into SQL text.
//! - Resolve logging settings from the environment with build-mode defaults.
//!
//! # Invariants
//! - A `TableNames` value only ever holds valid SQL identifiers.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_ACCOUNTS_TABLE: &str = "accounts";
pub const DEFAULT_MEMBERS_TABLE: &str = "members";

const LOG_LEVEL_ENV: &str = "TENANCY_LOG_LEVEL";
const LOG_DIR_ENV: &str = "TENANCY_LOG_DIR";

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Table name is not a plain SQL identifier.
    InvalidTableName(String),
    /// Both tables resolve to the same name.
    DuplicateTableName(String),
    /// Log level is not one of trace|debug|info|warn|error.
    InvalidLogLevel(String),
    /// Log directory is empty or relative.
    InvalidLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTableName(name) => write!(f, "invalid table name `{name}`"),
            Self::DuplicateTableName(name) => {
                write!(f, "accounts and members tables must differ, both are `{name}`")
            }
            Self::InvalidLogLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidLogDir(dir) => {
                write!(f, "log dir must be a non-empty absolute path, got `{dir}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Names of the two backing tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableNames {
    accounts: String,
    members: String,
}

impl TableNames {
    pub fn new(
        accounts: impl Into<String>,
        members: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let accounts = validate_table_name(accounts.into())?;
        let members = validate_table_name(members.into())?;
        if accounts == members {
            return Err(ConfigError::DuplicateTableName(accounts));
        }
        Ok(Self { accounts, members })
    }

    pub fn accounts(&self) -> &str {
        &self.accounts
    }

    pub fn members(&self) -> &str {
        &self.members
    }
}

impl Default for TableNames {
    fn default() -> Self {
        Self {
            accounts: DEFAULT_ACCOUNTS_TABLE.to_string(),
            members: DEFAULT_MEMBERS_TABLE.to_string(),
        }
    }
}

fn validate_table_name(name: String) -> Result<String, ConfigError> {
    if IDENTIFIER_RE.is_match(&name) {
        Ok(name)
    } else {
        Err(ConfigError::InvalidTableName(name))
    }
}

/// File logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Normalized level: trace|debug|info|warn|error.
    pub level: &'static str,
    /// Absolute directory receiving rotated log files.
    pub log_dir: PathBuf,
}

impl LogSettings {
    pub fn new(level: &str, log_dir: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            level: normalize_level(level)?,
            log_dir: normalize_log_dir(log_dir)?,
        })
    }

    /// Reads `TENANCY_LOG_LEVEL` and `TENANCY_LOG_DIR`.
    ///
    /// Returns `Ok(None)` when no log directory is configured.
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        let Ok(log_dir) = std::env::var(LOG_DIR_ENV) else {
            return Ok(None);
        };
        let level =
            std::env::var(LOG_LEVEL_ENV).unwrap_or_else(|_| default_log_level().to_string());
        Self::new(&level, &log_dir).map(Some)
    }
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::InvalidLogLevel(other.to_string())),
    }
}

fn normalize_log_dir(log_dir: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(log_dir.trim());
    if path.as_os_str().is_empty() || !path.is_absolute() {
        return Err(ConfigError::InvalidLogDir(log_dir.to_string()));
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{normalize_level, ConfigError, LogSettings, TableNames};

    #[test]
    fn default_table_names() {
        let tables = TableNames::default();
        assert_eq!(tables.accounts(), "accounts");
        assert_eq!(tables.members(), "members");
    }

    #[test]
    fn table_names_reject_sql_fragments() {
        let err = TableNames::new("accounts; DROP TABLE x", "members").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTableName(_)));
        assert!(TableNames::new("tenant_accounts", "tenant_members").is_ok());
    }

    #[test]
    fn table_names_must_differ() {
        let err = TableNames::new("rows", "rows").unwrap_err();
        assert_eq!(err, ConfigError::DuplicateTableName("rows".to_string()));
    }

    #[test]
    fn log_settings_normalize_level_and_require_absolute_dir() {
        let settings = LogSettings::new(" WARNING ", "/var/log/tenancy").unwrap();
        assert_eq!(settings.level, "warn");

        assert!(matches!(
            LogSettings::new("info", "logs/dev"),
            Err(ConfigError::InvalidLogDir(_))
        ));
        assert!(matches!(
            LogSettings::new("loud", "/tmp"),
            Err(ConfigError::InvalidLogLevel(_))
        ));
    }

    #[test]
    fn warning_is_an_alias_for_warn() {
        assert_eq!(normalize_level("warning"), Ok("warn"));
        assert_eq!(normalize_level("warn"), Ok("warn"));
    }

    #[test]
    fn level_is_trimmed_and_case_insensitive() {
        assert_eq!(normalize_level("  Debug\n"), Ok("debug"));
        assert_eq!(normalize_level("ERROR"), Ok("error"));
        assert_eq!(
            normalize_level(" verbose "),
            Err(ConfigError::InvalidLogLevel("verbose".to_string()))
        );
    }
}
