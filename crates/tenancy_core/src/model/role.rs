//! Conventional role names.
//!
//! Stores accept any role string; these are the values the service itself
//! assigns or that callers are expected to use.

pub const OWNER: &str = "owner";
pub const ADMIN: &str = "admin";
pub const MANAGER: &str = "manager";
pub const USER: &str = "user";
pub const GUEST: &str = "guest";
