//! SQL dialect support.
//!
//! Every compilation decision that differs between databases is looked up
//! once in a [`DialectRules`] table instead of being re-checked in each
//! compiler.

use std::fmt;
use std::str::FromStr;

use crate::column::ColumnType;

/// Sentinel fragment emitted in place of DDL an unsupported dialect cannot express.
pub const NOT_SUPPORTED: &str = "not supported";

/// A target SQL dialect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL and MariaDB.
    MySql,
    /// PostgreSQL.
    Postgres,
    /// SQLite.
    Sqlite,
    /// Any other driver tag. Compiles with ANSI quoting and marks DDL as
    /// [`NOT_SUPPORTED`].
    Unsupported(String),
}

impl Dialect {
    /// Returns the tag of the dialect (`mysql`, `postgres`, `sqlite`, or the
    /// unrecognized tag itself).
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::Sqlite => "sqlite",
            Self::Unsupported(name) => name,
        }
    }

    /// Returns whether this is one of the three supported dialects.
    #[must_use]
    pub const fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }

    /// Returns the dispatch table for this dialect.
    #[must_use]
    pub fn rules(&self) -> &'static DialectRules {
        match self {
            Self::MySql => &MYSQL,
            Self::Postgres => &POSTGRES,
            Self::Sqlite => &SQLITE,
            Self::Unsupported(_) => &UNSUPPORTED,
        }
    }
}

impl From<&str> for Dialect {
    fn from(tag: &str) -> Self {
        match tag {
            "mysql" => Self::MySql,
            "postgres" => Self::Postgres,
            "sqlite" => Self::Sqlite,
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl From<String> for Dialect {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl FromStr for Dialect {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a dialect renders auto-increment columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoIncrement {
    /// Appended after the type, e.g. ` AUTO_INCREMENT`.
    Suffix(&'static str),
    /// Replaces the type keyword and its length, e.g. `SERIAL`.
    TypeAlias(&'static str),
    /// The dialect has no column DDL at all.
    Unsupported,
}

/// Per-dialect lookup table for quoting and DDL generation.
#[derive(Debug)]
pub struct DialectRules {
    /// Quote character around identifiers.
    pub identifier_quote: char,
    /// Quote character around literal values.
    pub literal_quote: char,
    /// Native type keywords, indexed by [`ColumnType::index`].
    /// `None` when the dialect cannot render column definitions.
    pub type_names: Option<[&'static str; 8]>,
    /// Length applied to `string` columns when none is given.
    pub default_string_length: Option<u32>,
    /// Whether `TEXT` columns accept a `(length)` suffix.
    pub text_takes_length: bool,
    /// Auto-increment rendering.
    pub auto_increment: AutoIncrement,
}

impl DialectRules {
    /// Maps an abstract column type to the native keyword.
    ///
    /// Custom types pass through unchanged.
    #[must_use]
    pub fn type_name<'a>(&self, column_type: &'a ColumnType) -> Option<&'a str> {
        let names = self.type_names?;
        Some(match column_type.index() {
            Some(index) => names[index],
            None => column_type.name(),
        })
    }
}

static MYSQL: DialectRules = DialectRules {
    identifier_quote: '`',
    literal_quote: '"',
    type_names: Some([
        "VARCHAR", "BIGINT", "DOUBLE", "LONGTEXT", "LONGBLOB", "DATE", "DATETIME", "DECIMAL",
    ]),
    default_string_length: Some(255),
    text_takes_length: true,
    auto_increment: AutoIncrement::Suffix(" AUTO_INCREMENT"),
};

static POSTGRES: DialectRules = DialectRules {
    identifier_quote: '"',
    literal_quote: '"',
    type_names: Some([
        "TEXT", "INTEGER", "REAL", "TEXT", "BYTEA", "DATE", "TIMESTAMP", "DECIMAL",
    ]),
    default_string_length: None,
    text_takes_length: false,
    auto_increment: AutoIncrement::TypeAlias("SERIAL"),
};

static SQLITE: DialectRules = DialectRules {
    identifier_quote: '"',
    literal_quote: '\'',
    type_names: Some([
        "TEXT", "INTEGER", "REAL", "TEXT", "BLOB", "DATE", "DATETIME", "DECIMAL",
    ]),
    default_string_length: None,
    text_takes_length: true,
    auto_increment: AutoIncrement::Suffix(" AUTOINCREMENT"),
};

static UNSUPPORTED: DialectRules = DialectRules {
    identifier_quote: '"',
    literal_quote: '\'',
    type_names: None,
    default_string_length: None,
    text_takes_length: false,
    auto_increment: AutoIncrement::Unsupported,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_from_tag() {
        assert_eq!(Dialect::from("mysql"), Dialect::MySql);
        assert_eq!(Dialect::from("postgres"), Dialect::Postgres);
        assert_eq!(Dialect::from("sqlite"), Dialect::Sqlite);
        assert_eq!(
            Dialect::from("mssql"),
            Dialect::Unsupported("mssql".to_string())
        );
        assert_eq!("sqlite".parse::<Dialect>(), Ok(Dialect::Sqlite));
    }

    #[test]
    fn test_dialect_name_round_trips_unknown_tag() {
        let dialect = Dialect::from("oracle");
        assert_eq!(dialect.name(), "oracle");
        assert_eq!(dialect.to_string(), "oracle");
        assert!(!dialect.is_supported());
        assert!(Dialect::Postgres.is_supported());
    }

    #[test]
    fn test_type_name_lookup() {
        let rules = Dialect::MySql.rules();
        assert_eq!(rules.type_name(&ColumnType::String), Some("VARCHAR"));
        assert_eq!(rules.type_name(&ColumnType::Blob), Some("LONGBLOB"));

        let rules = Dialect::Postgres.rules();
        assert_eq!(rules.type_name(&ColumnType::Datetime), Some("TIMESTAMP"));
        assert_eq!(rules.type_name(&ColumnType::Blob), Some("BYTEA"));

        let rules = Dialect::Sqlite.rules();
        assert_eq!(rules.type_name(&ColumnType::Float), Some("REAL"));
        assert_eq!(
            rules.type_name(&ColumnType::Custom("JSONB".to_string())),
            Some("JSONB")
        );
    }

    #[test]
    fn test_unsupported_has_no_type_names() {
        let rules = Dialect::from("mssql").rules();
        assert_eq!(rules.type_name(&ColumnType::Integer), None);
        assert_eq!(rules.auto_increment, AutoIncrement::Unsupported);
    }
}
