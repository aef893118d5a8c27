//! Account domain model.
//!
//! # Invariants
//! - `id` is globally unique and never reused.
//! - `created_at` is set once and never changed by updates.
//! - `updated_at` stays `None` until the first update.

use serde::{Deserialize, Serialize};

/// Tenant/organization record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Opaque identifier. Generated by the service when left empty.
    pub id: String,
    /// Display name. Required and non-empty.
    pub name: String,
    pub disabled: bool,
    /// Unix epoch seconds. Defaulted to "now" by the service when zero.
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl Account {
    /// Creates an unsaved account with only a display name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Creates an unsaved account with a caller-provided identifier.
    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Account joined with the role a given user holds on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountWithRole {
    #[serde(flatten)]
    pub account: Account,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::Account;

    #[test]
    fn new_account_has_no_identity_or_timestamps() {
        let account = Account::new("Acme");
        assert!(account.id.is_empty());
        assert_eq!(account.name, "Acme");
        assert!(!account.disabled);
        assert_eq!(account.created_at, 0);
        assert_eq!(account.updated_at, None);
    }
}
