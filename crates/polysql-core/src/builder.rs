//! Statement builder.
//!
//! [`Builder`] accumulates the parts of one statement through chained,
//! value-returning calls and renders it on a terminal call. Terminal calls
//! borrow the builder, so compiling twice yields the same string.
//!
//! # Example
//!
//! ```rust
//! use polysql_core::{Builder, Dialect};
//!
//! let sql = Builder::new(Dialect::MySql)
//!     .table("users")
//!     .and_where("first_name", "!=", "Jane")
//!     .order_by("first_name", "asc")
//!     .limit(10)
//!     .offset(20)
//!     .group_by("passport")
//!     .select(["id", "first_name"])
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "SELECT `id`, `first_name` FROM `users` WHERE `first_name` <> \"Jane\" \
//!      GROUP BY `passport` ORDER BY `first_name` ASC LIMIT 10 OFFSET 20;"
//! );
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::clause::{
    compile_group_by, compile_limit, compile_offset, compile_order_by, compile_where, Connective,
    Direction, OrderBy, Predicate,
};
use crate::column::{compile_columns, ColumnDefinition, ColumnOptions, ColumnType};
use crate::dialect::Dialect;
use crate::error::{BuildError, Result};
use crate::quote::{quote_identifier, quote_literal};

/// An entry of a SELECT column list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// A column name, quoted as an identifier.
    Column(String),
    /// An expression emitted verbatim, such as `*` or `MIN(created_at)`.
    Raw(String),
}

impl Projection {
    /// Creates a verbatim projection.
    #[must_use]
    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Raw(expr.into())
    }

    fn compile(&self, dialect: &Dialect) -> String {
        match self {
            Self::Column(name) => quote_identifier(name, dialect),
            Self::Raw(expr) => expr.clone(),
        }
    }
}

impl From<&str> for Projection {
    fn from(name: &str) -> Self {
        if name == "*" {
            Self::Raw(name.to_string())
        } else {
            Self::Column(name.to_string())
        }
    }
}

impl From<String> for Projection {
    fn from(name: String) -> Self {
        if name == "*" {
            Self::Raw(name)
        } else {
            Self::Column(name)
        }
    }
}

impl From<&String> for Projection {
    fn from(name: &String) -> Self {
        Self::from(name.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct View {
    name: String,
    columns: Vec<String>,
    sql: String,
}

/// Accumulates the parts of one statement for a fixed dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Builder {
    dialect: Dialect,
    table: Option<String>,
    columns: Vec<ColumnDefinition>,
    predicates: Vec<Predicate>,
    group_by: Vec<String>,
    order_by: Vec<OrderBy>,
    limit: i64,
    offset: i64,
    view: Option<View>,
}

impl Builder {
    /// Creates an empty builder for a dialect.
    #[must_use]
    pub fn new(dialect: impl Into<Dialect>) -> Self {
        Self {
            dialect: dialect.into(),
            table: None,
            columns: vec![],
            predicates: vec![],
            group_by: vec![],
            order_by: vec![],
            limit: 0,
            offset: 0,
            view: None,
        }
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Sets the target table.
    #[must_use]
    pub fn table(mut self, name: impl Into<String>) -> Self {
        self.table = Some(name.into());
        self
    }

    /// Declares a column for CREATE TABLE.
    #[must_use]
    pub fn column(
        mut self,
        name: impl Into<String>,
        column_type: impl Into<ColumnType>,
        options: ColumnOptions,
    ) -> Self {
        self.columns
            .push(ColumnDefinition::new(name, column_type.into(), options));
        self
    }

    /// Appends a WHERE predicate.
    #[must_use]
    pub fn where_clause(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Appends a raw WHERE fragment, emitted verbatim.
    #[must_use]
    pub fn where_raw(self, sql: impl Into<String>) -> Self {
        self.where_clause(Predicate::raw(sql))
    }

    /// Appends an `AND`-joined comparison.
    #[must_use]
    pub fn and_where(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.where_clause(Predicate::compare(column, operator, value))
    }

    /// Appends an `OR`-joined comparison.
    #[must_use]
    pub fn or_where(
        self,
        column: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.where_clause(Predicate::compare(column, operator, value).with_connective(Connective::Or))
    }

    /// Appends a sort key. `direction` is parsed with [`Direction::parse`].
    #[must_use]
    pub fn order_by(mut self, column: impl Into<String>, direction: &str) -> Self {
        self.order_by
            .push(OrderBy::new(column, Direction::parse(direction)));
        self
    }

    /// Appends a GROUP BY column.
    #[must_use]
    pub fn group_by(mut self, column: impl Into<String>) -> Self {
        self.group_by.push(column.into());
        self
    }

    /// Sets the LIMIT. Values below one are not emitted.
    #[must_use]
    pub const fn limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Sets the OFFSET. Values below one are not emitted.
    #[must_use]
    pub const fn offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Targets a view instead of a table for `create`, `create_if_not_exists`
    /// and `drop`.
    #[must_use]
    pub fn view(mut self, name: impl Into<String>) -> Self {
        self.view.get_or_insert_with(View::default).name = name.into();
        self
    }

    /// Sets the column names of the view.
    #[must_use]
    pub fn view_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.view.get_or_insert_with(View::default).columns =
            columns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the SELECT statement defining the view, used verbatim.
    #[must_use]
    pub fn view_sql(mut self, sql: impl Into<String>) -> Self {
        self.view.get_or_insert_with(View::default).sql = sql.into();
        self
    }

    /// Compiles `CREATE TABLE` (or `CREATE VIEW` when a view is configured).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when neither a table nor a view
    /// was set.
    pub fn create(&self) -> Result<String> {
        self.compile_create(false)
    }

    /// Compiles `CREATE TABLE IF NOT EXISTS` (or `CREATE VIEW IF NOT EXISTS`).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when neither a table nor a view
    /// was set.
    pub fn create_if_not_exists(&self) -> Result<String> {
        self.compile_create(true)
    }

    /// Compiles `DROP TABLE` (or `DROP VIEW`).
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when neither a table nor a view
    /// was set.
    pub fn drop(&self) -> Result<String> {
        let sql = if let Some(view) = self.named_view() {
            format!("DROP VIEW {};", self.quote(&view.name))
        } else {
            format!("DROP TABLE {};", self.quoted_table("DROP")?)
        };
        Ok(self.emit(sql))
    }

    /// Compiles `SELECT`. An empty column list selects `*`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table was set.
    pub fn select<I, P>(&self, columns: I) -> Result<String>
    where
        I: IntoIterator<Item = P>,
        P: Into<Projection>,
    {
        let table = self.quoted_table("SELECT")?;
        let columns: Vec<String> = columns
            .into_iter()
            .map(|column| column.into().compile(&self.dialect))
            .collect();
        let columns = if columns.is_empty() {
            String::from("*")
        } else {
            columns.join(", ")
        };

        let sql = format!(
            "SELECT {columns} FROM {table}{}{}{}{}{};",
            compile_where(&self.predicates, &self.dialect),
            compile_group_by(&self.group_by, &self.dialect),
            compile_order_by(&self.order_by, &self.dialect),
            compile_limit(self.limit),
            compile_offset(self.offset),
        );
        Ok(self.emit(sql))
    }

    /// Compiles `SELECT *`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table was set.
    pub fn select_all(&self) -> Result<String> {
        self.select(Vec::<Projection>::new())
    }

    /// Compiles `INSERT`. Columns are emitted in lexicographic order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table was set.
    pub fn insert<I, K, V>(&self, values: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.quoted_table("INSERT")?;
        let values = sorted(values);

        let names: Vec<String> = values.keys().map(|name| self.quote(name)).collect();
        let literals: Vec<String> = values
            .values()
            .map(|value| quote_literal(value, &self.dialect))
            .collect();

        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({}){}{};",
            names.join(", "),
            literals.join(", "),
            compile_limit(self.limit),
            compile_offset(self.offset),
        );
        Ok(self.emit(sql))
    }

    /// Compiles `UPDATE`. Assignments are emitted in lexicographic column
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table was set.
    pub fn update<I, K, V>(&self, values: I) -> Result<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let table = self.quoted_table("UPDATE")?;
        let assignments: Vec<String> = sorted(values)
            .iter()
            .map(|(name, value)| {
                format!("{}={}", self.quote(name), quote_literal(value, &self.dialect))
            })
            .collect();

        let sql = format!(
            "UPDATE {table} SET {}{}{}{}{}{};",
            assignments.join(", "),
            compile_where(&self.predicates, &self.dialect),
            compile_group_by(&self.group_by, &self.dialect),
            compile_order_by(&self.order_by, &self.dialect),
            compile_limit(self.limit),
            compile_offset(self.offset),
        );
        Ok(self.emit(sql))
    }

    /// Compiles `DELETE`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::MissingTable`] when no table was set.
    pub fn delete(&self) -> Result<String> {
        let table = self.quoted_table("DELETE")?;
        let sql = format!(
            "DELETE FROM {table}{}{}{}{};",
            compile_where(&self.predicates, &self.dialect),
            compile_order_by(&self.order_by, &self.dialect),
            compile_limit(self.limit),
            compile_offset(self.offset),
        );
        Ok(self.emit(sql))
    }

    fn compile_create(&self, if_not_exists: bool) -> Result<String> {
        let guard = if if_not_exists { "IF NOT EXISTS " } else { "" };

        let sql = if let Some(view) = self.named_view() {
            let mut sql = format!("CREATE VIEW {guard}{}", self.quote(&view.name));
            if !view.columns.is_empty() {
                let columns: Vec<String> = view.columns.iter().map(|c| self.quote(c)).collect();
                sql.push_str(&format!(" ({})", columns.join(", ")));
            }
            sql.push_str(" AS ");
            sql.push_str(view.sql.trim().trim_end_matches(';'));
            sql.push(';');
            sql
        } else {
            let table = self.quoted_table("CREATE")?;
            format!(
                "CREATE TABLE {guard}{table}({});",
                compile_columns(&self.columns, &self.dialect)
            )
        };
        Ok(self.emit(sql))
    }

    fn named_view(&self) -> Option<&View> {
        self.view.as_ref().filter(|view| !view.name.is_empty())
    }

    fn quoted_table(&self, statement: &'static str) -> Result<String> {
        match self.table.as_deref() {
            Some(table) if !table.is_empty() => Ok(self.quote(table)),
            _ => Err(BuildError::MissingTable { statement }),
        }
    }

    fn quote(&self, identifier: &str) -> String {
        quote_identifier(identifier, &self.dialect)
    }

    fn emit(&self, sql: String) -> String {
        debug!(dialect = %self.dialect, statement = %sql, "Compiled statement");
        sql
    }
}

fn sorted<I, K, V>(values: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    values
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect()
}
