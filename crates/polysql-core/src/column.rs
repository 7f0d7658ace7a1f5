//! Column definitions and their DDL rendering.
//!
//! A column is declared with a portable [`ColumnType`] and a [`ColumnOptions`]
//! record; [`compile_columns`] turns a list of them into the body of a
//! `CREATE TABLE` statement for a given dialect.

use std::fmt;
use std::str::FromStr;

use crate::dialect::{AutoIncrement, Dialect, NOT_SUPPORTED};
use crate::error::{BuildError, Result};
use crate::quote::quote_identifier;

/// Length used for `DECIMAL` columns without an explicit length.
pub const DEFAULT_DECIMAL_LENGTH: u32 = 10;
/// Scale used for `DECIMAL` columns without explicit decimals.
pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// A portable column type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Short string (`VARCHAR` on MySQL).
    String,
    /// 64-bit integer.
    Integer,
    /// Floating point number.
    Float,
    /// Long text.
    Text,
    /// Binary data.
    Blob,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
    /// Fixed precision number.
    Decimal,
    /// Any other type name, emitted unchanged.
    Custom(String),
}

impl ColumnType {
    /// Position of the type in a dialect's type keyword table.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::String => Some(0),
            Self::Integer => Some(1),
            Self::Float => Some(2),
            Self::Text => Some(3),
            Self::Blob => Some(4),
            Self::Date => Some(5),
            Self::Datetime => Some(6),
            Self::Decimal => Some(7),
            Self::Custom(_) => None,
        }
    }

    /// Returns the abstract type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Text => "text",
            Self::Blob => "blob",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Decimal => "decimal",
            Self::Custom(name) => name,
        }
    }
}

impl From<&str> for ColumnType {
    fn from(name: &str) -> Self {
        match name {
            "string" => Self::String,
            "integer" => Self::Integer,
            "float" => Self::Float,
            "text" => Self::Text,
            "blob" => Self::Blob,
            "date" => Self::Date,
            "datetime" => Self::Datetime,
            "decimal" => Self::Decimal,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl FromStr for ColumnType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Options of a column definition.
///
/// Defaults: no length, no decimals, not auto-incremented, not a primary key,
/// and `NOT NULL`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnOptions {
    /// Length (or precision for `DECIMAL`).
    pub length: Option<u32>,
    /// Digits after the decimal point for `DECIMAL`.
    pub decimals: Option<u32>,
    /// Auto-increment the column.
    pub auto: bool,
    /// Make the column the primary key.
    pub primary: bool,
    /// Allow `NULL` values.
    pub nullable: bool,
}

impl ColumnOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the length.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Sets the number of decimals.
    #[must_use]
    pub const fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    /// Marks the column as auto-incremented.
    #[must_use]
    pub const fn auto(mut self) -> Self {
        self.auto = true;
        self
    }

    /// Marks the column as the primary key.
    #[must_use]
    pub const fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Allows `NULL` values.
    #[must_use]
    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Builds options from loosely typed key/value pairs.
    ///
    /// Recognized keys are `length`, `decimals`, `auto`, `primary` and
    /// `nullable`. Flags take `yes` or `no`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidOption`] for an unknown key, a
    /// non-numeric length or decimals, or a flag that is neither `yes` nor
    /// `no`.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "length" => options.length = Some(parse_number(key, value)?),
                "decimals" => options.decimals = Some(parse_number(key, value)?),
                "auto" => options.auto = parse_flag(key, value)?,
                "primary" => options.primary = parse_flag(key, value)?,
                "nullable" => options.nullable = parse_flag(key, value)?,
                _ => return Err(invalid(key, value)),
            }
        }
        Ok(options)
    }
}

fn invalid(key: &str, value: &str) -> BuildError {
    BuildError::InvalidOption {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}

/// A column of a table being created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name.
    pub name: String,
    /// Abstract type.
    pub column_type: ColumnType,
    /// Options.
    pub options: ColumnOptions,
}

impl ColumnDefinition {
    /// Creates a new column definition.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: ColumnType, options: ColumnOptions) -> Self {
        Self {
            name: name.into(),
            column_type,
            options,
        }
    }
}

/// Renders one column definition.
///
/// Returns [`NOT_SUPPORTED`] when the dialect has no DDL rules.
#[must_use]
pub fn compile_column(column: &ColumnDefinition, dialect: &Dialect) -> String {
    let rules = dialect.rules();
    let Some(type_name) = rules.type_name(&column.column_type) else {
        return NOT_SUPPORTED.to_string();
    };
    let options = &column.options;

    let mut sql = quote_identifier(&column.name, dialect);
    sql.push(' ');

    match rules.auto_increment {
        // SERIAL is a type of its own and takes no length
        AutoIncrement::TypeAlias(alias) if options.auto => sql.push_str(alias),
        _ => {
            sql.push_str(type_name);
            if type_name == "DECIMAL" {
                let length = options.length.unwrap_or(DEFAULT_DECIMAL_LENGTH);
                let decimals = options.decimals.unwrap_or(DEFAULT_DECIMAL_PLACES);
                sql.push_str(&format!("({length},{decimals})"));
            } else {
                let length = match column.column_type {
                    ColumnType::String => options.length.or(rules.default_string_length),
                    _ => options.length,
                };
                let takes_length = type_name != "TEXT" || rules.text_takes_length;
                if let (Some(length), true) = (length, takes_length) {
                    sql.push_str(&format!("({length})"));
                }
            }
        }
    }

    if let AutoIncrement::Suffix(keyword) = rules.auto_increment {
        if options.auto {
            sql.push_str(keyword);
        }
    }

    if options.primary {
        sql.push_str(" PRIMARY KEY");
    }

    if !options.nullable {
        sql.push_str(" NOT NULL");
    }

    sql
}

/// Renders column definitions, comma separated, in declaration order.
#[must_use]
pub fn compile_columns(columns: &[ColumnDefinition], dialect: &Dialect) -> String {
    columns
        .iter()
        .map(|column| compile_column(column, dialect))
        .collect::<Vec<_>>()
        .join(", ")
}
