//! Membership domain model.

use serde::{Deserialize, Serialize};

/// Association of an external user with an account under a role.
///
/// `account_id` is a reference by value; nothing in the store enforces it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub account_id: String,
    /// Opaque identifier owned by an external user system.
    pub user_id: String,
    pub role: String,
    /// Unix epoch seconds.
    pub created_at: i64,
}
