//! JSON statement descriptions.
//!
//! A description names the statement kind and carries the builder settings
//! it needs, for example:
//!
//! ```json
//! {
//!   "statement": "select",
//!   "table": "users",
//!   "fields": ["id", "first_name"],
//!   "where": [{"column": "first_name", "operator": "!=", "value": "Jane"}],
//!   "order_by": [{"column": "first_name", "direction": "asc"}],
//!   "limit": 10
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use polysql_core::{BuildError, Builder, ColumnOptions, Dialect};
use serde::Deserialize;

/// Terminal call to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    Create,
    CreateIfNotExists,
    Drop,
    Select,
    Insert,
    Update,
    Delete,
}

/// A column definition for `create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    /// Loosely typed options, e.g. `{"primary": "yes", "length": "40"}`.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

/// A view target for `create` and `drop`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ViewDescription {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub sql: String,
}

/// One WHERE predicate.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WhereDescription {
    Raw {
        raw: String,
    },
    Compare {
        column: String,
        #[serde(default = "default_operator")]
        operator: String,
        value: String,
        /// Join to the previous predicate with OR instead of AND.
        #[serde(default)]
        or: bool,
    },
}

fn default_operator() -> String {
    String::from("=")
}

/// One ORDER BY key.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderKey {
    pub column: String,
    #[serde(default)]
    pub direction: String,
}

/// A complete statement description.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatementDescription {
    pub statement: StatementKind,
    #[serde(default)]
    pub table: Option<String>,
    #[serde(default)]
    pub view: Option<ViewDescription>,
    #[serde(default)]
    pub columns: Vec<ColumnDescription>,
    /// SELECT projections; empty selects `*`.
    #[serde(default)]
    pub fields: Vec<String>,
    /// INSERT values or UPDATE assignments.
    #[serde(default)]
    pub values: BTreeMap<String, String>,
    #[serde(default, rename = "where")]
    pub predicates: Vec<WhereDescription>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub order_by: Vec<OrderKey>,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

impl StatementDescription {
    /// Parses a description from JSON text.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Reads and parses a description file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("Invalid statement in {}", path.display()))
    }

    /// Returns whether the statement produces rows.
    pub fn returns_rows(&self) -> bool {
        self.statement == StatementKind::Select
    }

    /// Configures a builder for `dialect` from this description.
    pub fn builder(&self, dialect: Dialect) -> Result<Builder, BuildError> {
        let mut builder = Builder::new(dialect)
            .limit(self.limit)
            .offset(self.offset);

        if let Some(table) = &self.table {
            builder = builder.table(table);
        }
        if let Some(view) = &self.view {
            builder = builder
                .view(&view.name)
                .view_columns(&view.columns)
                .view_sql(&view.sql);
        }
        for column in &self.columns {
            let options = ColumnOptions::from_pairs(&column.options)?;
            builder = builder.column(&column.name, column.column_type.as_str(), options);
        }
        for predicate in &self.predicates {
            builder = match predicate {
                WhereDescription::Raw { raw } => builder.where_raw(raw),
                WhereDescription::Compare {
                    column,
                    operator,
                    value,
                    or: true,
                } => builder.or_where(column, operator, value),
                WhereDescription::Compare {
                    column,
                    operator,
                    value,
                    or: false,
                } => builder.and_where(column, operator, value),
            };
        }
        for column in &self.group_by {
            builder = builder.group_by(column);
        }
        for key in &self.order_by {
            builder = builder.order_by(&key.column, &key.direction);
        }

        Ok(builder)
    }

    /// Compiles the described statement for `dialect`.
    pub fn compile(&self, dialect: Dialect) -> Result<String, BuildError> {
        let builder = self.builder(dialect)?;
        match self.statement {
            StatementKind::Create => builder.create(),
            StatementKind::CreateIfNotExists => builder.create_if_not_exists(),
            StatementKind::Drop => builder.drop(),
            StatementKind::Select => builder.select(self.fields.iter().map(String::as_str)),
            StatementKind::Insert => builder.insert(&self.values),
            StatementKind::Update => builder.update(&self.values),
            StatementKind::Delete => builder.delete(),
        }
    }
}
