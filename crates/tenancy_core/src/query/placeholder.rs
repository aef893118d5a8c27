//! Placeholder normalization for concrete SQL drivers.

/// Positional placeholder syntax understood by a driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// Anonymous `?`, left as is.
    Question,
    /// SQLite numbered `?1, ?2, ...`.
    Numbered,
    /// Postgres `$1, $2, ...`.
    Dollar,
}

/// Rewrites every `?` outside single-quoted literals into `style`.
///
/// Numbering starts at 1 and follows textual order, which matches the order
/// parameters are produced by `conditions_to_query`.
pub fn rebind(sql: &str, style: PlaceholderStyle) -> String {
    let prefix = match style {
        PlaceholderStyle::Question => return sql.to_string(),
        PlaceholderStyle::Numbered => '?',
        PlaceholderStyle::Dollar => '$',
    };

    let mut out = String::with_capacity(sql.len() + 8);
    let mut position = 0usize;
    let mut in_literal = false;
    for ch in sql.chars() {
        match ch {
            '\'' => {
                in_literal = !in_literal;
                out.push(ch);
            }
            '?' if !in_literal => {
                position += 1;
                out.push(prefix);
                out.push_str(&position.to_string());
            }
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{rebind, PlaceholderStyle};

    #[test]
    fn numbered_style_counts_in_textual_order() {
        assert_eq!(
            rebind("a = ? AND b IN (?, ?) LIMIT ?", PlaceholderStyle::Numbered),
            "a = ?1 AND b IN (?2, ?3) LIMIT ?4"
        );
    }

    #[test]
    fn dollar_style_skips_quoted_question_marks() {
        assert_eq!(
            rebind("name = '?' AND id = ?", PlaceholderStyle::Dollar),
            "name = '?' AND id = $1"
        );
    }

    #[test]
    fn question_style_is_identity() {
        assert_eq!(rebind("id = ?", PlaceholderStyle::Question), "id = ?");
    }
}
