//! Dynamic list-query construction.
//!
//! # Responsibility
//! - Build WHERE / ORDER BY / LIMIT / OFFSET fragments from condition values.
//! - Normalize placeholder syntax once, at the store boundary.
//!
//! # Invariants
//! - The builder is pure and holds no state; it is safe to share freely.

pub mod condition;
mod placeholder;

pub use condition::{
    conditions_to_query, Condition, ConditionQuery, Direction, Field, Order, Param, QuerySection,
    DEFAULT_LIMIT,
};
pub use placeholder::{rebind, PlaceholderStyle};
