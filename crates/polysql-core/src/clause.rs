//! Clause compilers.
//!
//! Each compiler turns one clause list into a fragment that can be appended
//! to a statement as-is: it starts with a space and its keyword, or is empty
//! when there is nothing to emit.

use std::fmt;

use crate::dialect::Dialect;
use crate::quote::{quote_identifier, quote_literal};

/// Literal value that turns `=` and `<>` comparisons into `IS [NOT] NULL`.
pub const NULL_SENTINEL: &str = "NULL";

/// Boolean connective joining a predicate to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Connective {
    /// `AND`
    #[default]
    And,
    /// `OR`
    Or,
}

impl Connective {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

/// One condition of a WHERE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Pre-formed SQL, emitted verbatim. The caller is responsible for its
    /// safety.
    Raw(String),
    /// `column operator value`.
    Compare {
        /// Column, quoted as an identifier.
        column: String,
        /// Comparison operator; `==`, `===`, `!=` and `!==` are normalized.
        operator: String,
        /// Value, quoted as a literal. The exact string `NULL` is compared
        /// with `IS NULL` / `IS NOT NULL` instead.
        value: String,
        /// Connective to the previous predicate.
        connective: Connective,
    },
}

impl Predicate {
    /// Creates an `AND`-joined comparison.
    #[must_use]
    pub fn compare(
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::Compare {
            column: column.into(),
            operator: operator.into(),
            value: value.into(),
            connective: Connective::And,
        }
    }

    /// Creates a raw predicate.
    #[must_use]
    pub fn raw(sql: impl Into<String>) -> Self {
        Self::Raw(sql.into())
    }

    /// Replaces the connective of a comparison. Raw predicates are unchanged.
    #[must_use]
    pub fn with_connective(mut self, new: Connective) -> Self {
        if let Self::Compare { connective, .. } = &mut self {
            *connective = new;
        }
        self
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl Direction {
    /// Parses a direction case-insensitively. `desc` and `descending` are
    /// descending, everything else is ascending.
    #[must_use]
    pub fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("desc") || direction.eq_ignore_ascii_case("descending") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A sort key of an ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Column to sort on.
    pub column: String,
    /// Direction.
    pub direction: Direction,
}

impl OrderBy {
    /// Creates a sort key.
    #[must_use]
    pub fn new(column: impl Into<String>, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

fn normalize_operator(operator: &str) -> &str {
    match operator {
        "==" | "===" => "=",
        "!=" | "!==" => "<>",
        other => other,
    }
}

/// Compiles a single comparison, without connective.
#[must_use]
pub fn compile_comparison(column: &str, operator: &str, value: &str, dialect: &Dialect) -> String {
    let operator = normalize_operator(operator);
    let column = quote_identifier(column, dialect);

    match (operator, value) {
        ("=", NULL_SENTINEL) => format!("{column} IS NULL"),
        ("<>", NULL_SENTINEL) => format!("{column} IS NOT NULL"),
        _ => format!("{column} {operator} {}", quote_literal(value, dialect)),
    }
}

/// Compiles a WHERE clause.
///
/// Raw predicates are emitted verbatim. Every comparison after the first
/// emitted fragment is prefixed with its connective. Empty raw predicates and
/// comparisons without a column are skipped.
#[must_use]
pub fn compile_where(predicates: &[Predicate], dialect: &Dialect) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(predicates.len());

    for predicate in predicates {
        match predicate {
            Predicate::Raw(sql) => {
                if !sql.is_empty() {
                    parts.push(sql.clone());
                }
            }
            Predicate::Compare {
                column,
                operator,
                value,
                connective,
            } => {
                if column.is_empty() {
                    continue;
                }
                let single = compile_comparison(column, operator, value, dialect);
                if parts.is_empty() {
                    parts.push(single);
                } else {
                    parts.push(format!("{} {single}", connective.as_sql()));
                }
            }
        }
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", parts.join(" "))
    }
}

/// Compiles a GROUP BY clause.
#[must_use]
pub fn compile_group_by(columns: &[String], dialect: &Dialect) -> String {
    if columns.is_empty() {
        return String::new();
    }
    let quoted: Vec<String> = columns
        .iter()
        .map(|column| quote_identifier(column, dialect))
        .collect();
    format!(" GROUP BY {}", quoted.join(","))
}

/// Compiles an ORDER BY clause.
#[must_use]
pub fn compile_order_by(keys: &[OrderBy], dialect: &Dialect) -> String {
    if keys.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = keys
        .iter()
        .map(|key| format!("{} {}", quote_identifier(&key.column, dialect), key.direction))
        .collect();
    format!(" ORDER BY {}", rendered.join(","))
}

/// Compiles a LIMIT clause; empty unless `limit` is positive.
#[must_use]
pub fn compile_limit(limit: i64) -> String {
    if limit > 0 {
        format!(" LIMIT {limit}")
    } else {
        String::new()
    }
}

/// Compiles an OFFSET clause; empty unless `offset` is positive.
#[must_use]
pub fn compile_offset(offset: i64) -> String {
    if offset > 0 {
        format!(" OFFSET {offset}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clauses() {
        assert_eq!(compile_where(&[], &Dialect::MySql), "");
        assert_eq!(compile_group_by(&[], &Dialect::MySql), "");
        assert_eq!(compile_order_by(&[], &Dialect::MySql), "");
        assert_eq!(compile_limit(0), "");
        assert_eq!(compile_offset(0), "");
    }

    #[test]
    fn test_negative_pagination_is_omitted() {
        assert_eq!(compile_limit(-1), "");
        assert_eq!(compile_offset(-20), "");
        assert_eq!(compile_limit(10), " LIMIT 10");
        assert_eq!(compile_offset(20), " OFFSET 20");
    }

    #[test]
    fn test_operator_aliases() {
        let d = Dialect::Sqlite;
        assert_eq!(compile_comparison("a", "==", "1", &d), "\"a\" = '1'");
        assert_eq!(compile_comparison("a", "===", "1", &d), "\"a\" = '1'");
        assert_eq!(compile_comparison("a", "!=", "1", &d), "\"a\" <> '1'");
        assert_eq!(compile_comparison("a", "!==", "1", &d), "\"a\" <> '1'");
        assert_eq!(compile_comparison("a", ">=", "1", &d), "\"a\" >= '1'");
    }

    #[test]
    fn test_null_sentinel() {
        let d = Dialect::MySql;
        assert_eq!(compile_comparison("deleted_at", "=", "NULL", &d), "`deleted_at` IS NULL");
        assert_eq!(
            compile_comparison("deleted_at", "!=", "NULL", &d),
            "`deleted_at` IS NOT NULL"
        );
        // only the exact string triggers it
        assert_eq!(
            compile_comparison("deleted_at", "=", "null", &d),
            "`deleted_at` = \"null\""
        );
        assert_eq!(
            compile_comparison("deleted_at", ">", "NULL", &d),
            "`deleted_at` > \"NULL\""
        );
    }

    #[test]
    fn test_first_connective_is_never_emitted() {
        let predicates = vec![
            Predicate::compare("a", "=", "1").with_connective(Connective::Or),
            Predicate::compare("b", "=", "2"),
            Predicate::compare("c", "=", "3").with_connective(Connective::Or),
        ];
        assert_eq!(
            compile_where(&predicates, &Dialect::Sqlite),
            " WHERE \"a\" = '1' AND \"b\" = '2' OR \"c\" = '3'"
        );
    }

    #[test]
    fn test_raw_predicates_are_verbatim() {
        let predicates = vec![
            Predicate::raw("(a = 1 OR b = 2)"),
            Predicate::compare("c", "<", "3"),
        ];
        assert_eq!(
            compile_where(&predicates, &Dialect::MySql),
            " WHERE (a = 1 OR b = 2) AND `c` < \"3\""
        );
    }

    #[test]
    fn test_comparisons_without_column_are_skipped() {
        let predicates = vec![
            Predicate::compare("", "=", "1"),
            Predicate::compare("b", "=", "2").with_connective(Connective::Or),
        ];
        assert_eq!(
            compile_where(&predicates, &Dialect::Postgres),
            " WHERE \"b\" = \"2\""
        );
    }

    #[test]
    fn test_empty_raw_predicates_are_skipped() {
        assert_eq!(compile_where(&[Predicate::raw("")], &Dialect::MySql), "");

        let predicates = vec![Predicate::raw(""), Predicate::compare("id", "=", "1")];
        assert_eq!(
            compile_where(&predicates, &Dialect::MySql),
            " WHERE `id` = \"1\""
        );
    }

    #[test]
    fn test_group_by_and_order_by() {
        let d = Dialect::MySql;
        assert_eq!(
            compile_group_by(&["a".to_string(), "t.b".to_string()], &d),
            " GROUP BY `a`,`t`.`b`"
        );
        let keys = vec![
            OrderBy::new("a", Direction::parse("DESC")),
            OrderBy::new("b", Direction::parse("whatever")),
        ];
        assert_eq!(compile_order_by(&keys, &d), " ORDER BY `a` DESC,`b` ASC");
    }

    #[test]
    fn test_direction_parse() {
        assert_eq!(Direction::parse("desc"), Direction::Desc);
        assert_eq!(Direction::parse("Descending"), Direction::Desc);
        assert_eq!(Direction::parse("asc"), Direction::Asc);
        assert_eq!(Direction::parse(""), Direction::Asc);
    }
}
