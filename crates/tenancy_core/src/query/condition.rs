//! Composable list-query conditions and their SQL assembly.
//!
//! # Responsibility
//! - Describe filters, ordering and pagination bounds as plain values.
//! - Merge any set of conditions into one clause plus positional params.
//!
//! # Invariants
//! - Section precedence is `WHERE < ORDER BY < LIMIT < OFFSET`; the sort is
//!   stable, so conditions of the same section keep their input order.
//! - WHERE predicates are joined with ` AND ` only.
//! - One ORDER BY / LIMIT / OFFSET slot each; the last one supplied wins.
//! - Only `?` placeholders are emitted. Stores rebind them for their driver.

use std::fmt::{Display, Formatter};

/// Row limit applied when the caller asks for zero or a negative count.
pub const DEFAULT_LIMIT: i64 = 100;

/// Query section a condition contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QuerySection {
    Where,
    OrderBy,
    Limit,
    Offset,
}

/// Column a condition can filter or order on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    AccountId,
    UserId,
    Role,
    Disabled,
    CreatedAt,
    UpdatedAt,
}

impl Field {
    /// Column name shared by both tables.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::AccountId => "account_id",
            Self::UserId => "user_id",
            Self::Role => "role",
            Self::Disabled => "disabled",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Predefined list orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    CreatedAtAsc,
    CreatedAtDesc,
    UpdatedAtAsc,
    UpdatedAtDesc,
}

impl Order {
    pub fn field(self) -> Field {
        match self {
            Self::CreatedAtAsc | Self::CreatedAtDesc => Field::CreatedAt,
            Self::UpdatedAtAsc | Self::UpdatedAtDesc => Field::UpdatedAt,
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Self::CreatedAtAsc | Self::UpdatedAtAsc => Direction::Asc,
            Self::CreatedAtDesc | Self::UpdatedAtDesc => Direction::Desc,
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field().column(), self.direction().as_sql())
    }
}

/// Driver-agnostic bind parameter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Param {
    Text(String),
    Integer(i64),
    Bool(bool),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// One composable piece of a list query.
///
/// Prefer the constructor functions in this module; they apply the limit and
/// offset normalization rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// `field = ?`
    Equals { field: Field, value: Param },
    /// `field IN (?, ?, ...)`, one placeholder per value, duplicates kept.
    InSet { field: Field, values: Vec<Param> },
    /// `ORDER BY a ASC, b DESC`
    OrderBy(Vec<Order>),
    /// `LIMIT ?`
    Limit(i64),
    /// `OFFSET ?`
    Offset(i64),
}

impl Condition {
    pub fn section(&self) -> QuerySection {
        match self {
            Self::Equals { .. } | Self::InSet { .. } => QuerySection::Where,
            Self::OrderBy(_) => QuerySection::OrderBy,
            Self::Limit(_) => QuerySection::Limit,
            Self::Offset(_) => QuerySection::Offset,
        }
    }

    /// Fragment template with `?` placeholders.
    ///
    /// Returns an empty string for an ORDER BY with no keys.
    pub fn fragment(&self) -> String {
        match self {
            Self::Equals { field, .. } => format!("{} = ?", field.column()),
            Self::InSet { values, .. } if values.is_empty() => "1 = 0".to_string(),
            Self::InSet { field, values } => {
                let placeholders = vec!["?"; values.len()].join(", ");
                format!("{} IN ({placeholders})", field.column())
            }
            Self::OrderBy(orders) if orders.is_empty() => String::new(),
            Self::OrderBy(orders) => {
                let keys = orders
                    .iter()
                    .map(Order::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("ORDER BY {keys}")
            }
            Self::Limit(_) => "LIMIT ?".to_string(),
            Self::Offset(_) => "OFFSET ?".to_string(),
        }
    }

    /// Bind parameters in placeholder order.
    pub fn params(&self) -> Vec<Param> {
        match self {
            Self::Equals { value, .. } => vec![value.clone()],
            Self::InSet { values, .. } => values.clone(),
            Self::OrderBy(_) => Vec::new(),
            Self::Limit(value) | Self::Offset(value) => vec![Param::Integer(*value)],
        }
    }
}

/// Assembled clause and its positional parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionQuery {
    /// Clause suffix, e.g. ` WHERE role = ? ORDER BY created_at DESC LIMIT ?`.
    /// Empty when no conditions were supplied.
    pub sql: String,
    pub params: Vec<Param>,
}

impl ConditionQuery {
    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }
}

/// Merges conditions into one query clause plus parameter list.
pub fn conditions_to_query(conditions: &[Condition]) -> ConditionQuery {
    if conditions.is_empty() {
        return ConditionQuery::default();
    }

    let mut sorted: Vec<&Condition> = conditions.iter().collect();
    sorted.sort_by_key(|condition| condition.section());

    let mut predicates: Vec<String> = Vec::new();
    let mut where_params: Vec<Param> = Vec::new();
    let mut order_by: Option<&Condition> = None;
    let mut limit: Option<&Condition> = None;
    let mut offset: Option<&Condition> = None;

    for condition in sorted {
        match condition.section() {
            QuerySection::Where => {
                predicates.push(condition.fragment());
                where_params.extend(condition.params());
            }
            QuerySection::OrderBy => order_by = Some(condition),
            QuerySection::Limit => limit = Some(condition),
            QuerySection::Offset => offset = Some(condition),
        }
    }

    let mut query = ConditionQuery {
        sql: String::new(),
        params: where_params,
    };
    if !predicates.is_empty() {
        query.sql.push_str(" WHERE ");
        query.sql.push_str(&predicates.join(" AND "));
    }
    for condition in [order_by, limit, offset].into_iter().flatten() {
        let fragment = condition.fragment();
        if fragment.is_empty() {
            continue;
        }
        query.sql.push(' ');
        query.sql.push_str(&fragment);
        query.params.extend(condition.params());
    }

    query
}

/// Filters rows by primary id.
pub fn id(value: impl Into<String>) -> Condition {
    equals(Field::Id, Param::Text(value.into()))
}

/// Filters rows whose id is one of `values`.
pub fn ids<S: AsRef<str>>(values: &[S]) -> Condition {
    in_set(Field::Id, values)
}

pub fn account_id(value: impl Into<String>) -> Condition {
    equals(Field::AccountId, Param::Text(value.into()))
}

pub fn account_ids<S: AsRef<str>>(values: &[S]) -> Condition {
    in_set(Field::AccountId, values)
}

pub fn user_id(value: impl Into<String>) -> Condition {
    equals(Field::UserId, Param::Text(value.into()))
}

pub fn user_ids<S: AsRef<str>>(values: &[S]) -> Condition {
    in_set(Field::UserId, values)
}

pub fn role(value: impl Into<String>) -> Condition {
    equals(Field::Role, Param::Text(value.into()))
}

pub fn disabled(value: bool) -> Condition {
    equals(Field::Disabled, Param::Bool(value))
}

/// Orders by one or more keys, comma-joined in the given order.
pub fn order_by(orders: &[Order]) -> Condition {
    Condition::OrderBy(orders.to_vec())
}

/// Caps the row count. Values `<= 0` fall back to [`DEFAULT_LIMIT`].
pub fn limit(value: i64) -> Condition {
    Condition::Limit(if value <= 0 { DEFAULT_LIMIT } else { value })
}

/// Skips rows. Negative values are floored to zero.
pub fn offset(value: i64) -> Condition {
    Condition::Offset(value.max(0))
}

fn equals(field: Field, value: Param) -> Condition {
    Condition::Equals { field, value }
}

fn in_set<S: AsRef<str>>(field: Field, values: &[S]) -> Condition {
    Condition::InSet {
        field,
        values: values
            .iter()
            .map(|value| Param::Text(value.as_ref().to_string()))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_clause() {
        let query = conditions_to_query(&[]);
        assert!(query.is_empty());
        assert!(query.params.is_empty());
    }

    #[test]
    fn sections_are_emitted_in_precedence_order() {
        let query = conditions_to_query(&[
            offset(20),
            limit(10),
            order_by(&[Order::CreatedAtDesc]),
            role("owner"),
            disabled(false),
        ]);

        assert_eq!(
            query.sql,
            " WHERE role = ? AND disabled = ? ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            query.params,
            vec![
                Param::Text("owner".to_string()),
                Param::Bool(false),
                Param::Integer(10),
                Param::Integer(20),
            ]
        );
    }

    #[test]
    fn limit_and_offset_are_normalized() {
        assert_eq!(limit(0), Condition::Limit(DEFAULT_LIMIT));
        assert_eq!(limit(-3), Condition::Limit(DEFAULT_LIMIT));
        assert_eq!(limit(5), Condition::Limit(5));
        assert_eq!(offset(-1), Condition::Offset(0));
        assert_eq!(offset(7), Condition::Offset(7));
    }

    #[test]
    fn in_set_expands_one_placeholder_per_value_without_dedup() {
        let condition = ids(&["a", "b", "a"]);
        assert_eq!(condition.fragment(), "id IN (?, ?, ?)");
        assert_eq!(
            condition.params(),
            vec![Param::from("a"), Param::from("b"), Param::from("a")]
        );
    }

    #[test]
    fn empty_in_set_matches_nothing() {
        let query = conditions_to_query(&[account_ids::<&str>(&[])]);
        assert_eq!(query.sql, " WHERE 1 = 0");
        assert!(query.params.is_empty());
    }

    #[test]
    fn multi_key_order_is_comma_joined() {
        let condition = order_by(&[Order::UpdatedAtDesc, Order::CreatedAtAsc]);
        assert_eq!(
            condition.fragment(),
            "ORDER BY updated_at DESC, created_at ASC"
        );
        assert!(condition.params().is_empty());
    }

    #[test]
    fn last_order_by_wins() {
        let query = conditions_to_query(&[
            order_by(&[Order::CreatedAtAsc]),
            order_by(&[Order::UpdatedAtDesc]),
        ]);
        assert_eq!(query.sql, " ORDER BY updated_at DESC");
    }

    #[test]
    fn repeated_limit_binds_only_the_winning_value() {
        let query = conditions_to_query(&[limit(5), limit(9)]);
        assert_eq!(query.sql, " LIMIT ?");
        assert_eq!(query.params, vec![Param::Integer(9)]);
    }

    #[test]
    fn empty_order_list_is_skipped() {
        let query = conditions_to_query(&[order_by(&[]), limit(1)]);
        assert_eq!(query.sql, " LIMIT ?");
    }
}
