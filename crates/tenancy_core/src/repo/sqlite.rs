//! SQLite glue shared by both stores.

use crate::query::{conditions_to_query, rebind, Condition, Param, PlaceholderStyle};
use rusqlite::types::Value;

/// SQLite accepts `?N` and that is what the rest of the codebase writes.
const STYLE: PlaceholderStyle = PlaceholderStyle::Numbered;

/// Builds `{select}{clause}` with numbered placeholders and SQLite values.
///
/// SQLite rejects OFFSET without LIMIT, so an unbounded `LIMIT -1` is added
/// in that case.
pub(crate) fn build_list_query(select: &str, conditions: &[Condition]) -> (String, Vec<Value>) {
    let has_offset = conditions
        .iter()
        .any(|condition| matches!(condition, Condition::Offset(_)));
    let has_limit = conditions
        .iter()
        .any(|condition| matches!(condition, Condition::Limit(_)));

    let query = if has_offset && !has_limit {
        let mut with_limit = conditions.to_vec();
        with_limit.push(Condition::Limit(-1));
        conditions_to_query(&with_limit)
    } else {
        conditions_to_query(conditions)
    };

    let sql = rebind(&format!("{select}{}", query.sql), STYLE);
    let values = query.params.iter().map(param_to_value).collect();
    (sql, values)
}

pub(crate) fn param_to_value(param: &Param) -> Value {
    match param {
        Param::Text(value) => Value::Text(value.clone()),
        Param::Integer(value) => Value::Integer(*value),
        Param::Bool(value) => Value::Integer(bool_to_int(*value)),
    }
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
