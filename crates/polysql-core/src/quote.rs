//! Identifier and literal quoting.
//!
//! All caller text that ends up in a statement goes through this module.
//! Escaping only doubles the dialect's literal quote character, which is
//! enough to keep a value inside its literal but is not a general sanitizer.

use crate::dialect::Dialect;

/// Quotes an identifier, quoting each `.`-separated segment on its own.
///
/// ```rust
/// use polysql_core::{quote_identifier, Dialect};
///
/// assert_eq!(quote_identifier("users.id", &Dialect::MySql), "`users`.`id`");
/// assert_eq!(quote_identifier("users", &Dialect::Sqlite), "\"users\"");
/// ```
#[must_use]
pub fn quote_identifier(name: &str, dialect: &Dialect) -> String {
    let quote = dialect.rules().identifier_quote;
    name.split('.')
        .map(|segment| format!("{quote}{segment}{quote}"))
        .collect::<Vec<_>>()
        .join(".")
}

/// Escapes a literal value by doubling the dialect's literal quote character.
#[must_use]
pub fn escape(value: &str, dialect: &Dialect) -> String {
    let quote = dialect.rules().literal_quote;
    value.replace(quote, &format!("{quote}{quote}"))
}

/// Escapes and quotes a literal value.
///
/// ```rust
/// use polysql_core::{quote_literal, Dialect};
///
/// assert_eq!(quote_literal("it's", &Dialect::Sqlite), "'it''s'");
/// assert_eq!(quote_literal("Tom", &Dialect::MySql), "\"Tom\"");
/// ```
#[must_use]
pub fn quote_literal(value: &str, dialect: &Dialect) -> String {
    let quote = dialect.rules().literal_quote;
    format!("{quote}{}{quote}", escape(value, dialect))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_quotes_per_dialect() {
        assert_eq!(quote_identifier("users", &Dialect::MySql), "`users`");
        assert_eq!(quote_identifier("users", &Dialect::Postgres), "\"users\"");
        assert_eq!(quote_identifier("users", &Dialect::Sqlite), "\"users\"");
    }

    #[test]
    fn test_qualified_identifier() {
        assert_eq!(
            quote_identifier("public.users.id", &Dialect::Postgres),
            "\"public\".\"users\".\"id\""
        );
        assert_eq!(quote_identifier("u.name", &Dialect::MySql), "`u`.`name`");
    }

    #[test]
    fn test_literal_quotes_per_dialect() {
        assert_eq!(quote_literal("Jane", &Dialect::MySql), "\"Jane\"");
        assert_eq!(quote_literal("Jane", &Dialect::Postgres), "\"Jane\"");
        assert_eq!(quote_literal("Jane", &Dialect::Sqlite), "'Jane'");
    }

    #[test]
    fn test_escape_doubles_own_quote_only() {
        assert_eq!(escape("say \"hi\"", &Dialect::MySql), "say \"\"hi\"\"");
        assert_eq!(escape("it's", &Dialect::MySql), "it's");
        assert_eq!(escape("say \"hi\"", &Dialect::Postgres), "say \"\"hi\"\"");
        assert_eq!(escape("it's", &Dialect::Sqlite), "it''s");
        assert_eq!(escape("say \"hi\"", &Dialect::Sqlite), "say \"hi\"");
    }

    #[test]
    fn test_injection_stays_inside_literal() {
        assert_eq!(
            quote_literal("58\" OR 1=1;--", &Dialect::MySql),
            "\"58\"\" OR 1=1;--\""
        );
        assert_eq!(
            quote_literal("58' OR 1=1;--", &Dialect::Sqlite),
            "'58'' OR 1=1;--'"
        );
    }

    #[test]
    fn test_unsupported_dialect_uses_ansi_quoting() {
        let dialect = Dialect::from("mssql");
        assert_eq!(quote_identifier("users", &dialect), "\"users\"");
        assert_eq!(quote_literal("O'Brien", &dialect), "'O''Brien'");
    }
}
