//! # polysql-core
//!
//! A multi-dialect SQL statement compiler.
//!
//! This crate provides:
//! - Dialect dispatch tables for MySQL, PostgreSQL and SQLite
//! - Identifier and literal quoting with quote-doubling escapes
//! - Column type mapping for `CREATE TABLE`
//! - WHERE, GROUP BY, ORDER BY and LIMIT/OFFSET clause compilers
//! - A chained [`Builder`] assembling complete statements
//!
//! The compiler never executes anything: every function is a pure
//! transformation from configuration to a statement string. Values are
//! inlined as escaped literals, not bound as parameters.
//!
//! ## Example
//!
//! ```rust
//! use polysql_core::{Builder, ColumnOptions, ColumnType, Dialect};
//!
//! let sql = Builder::new(Dialect::MySql)
//!     .table("users")
//!     .column("id", ColumnType::String, ColumnOptions::new().primary().length(40))
//!     .column("deleted_at", ColumnType::Datetime, ColumnOptions::new().nullable())
//!     .create()
//!     .unwrap();
//!
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE `users`(`id` VARCHAR(40) PRIMARY KEY NOT NULL, `deleted_at` DATETIME);"
//! );
//! ```
//!
//! ## Escaping
//!
//! ```rust
//! use polysql_core::{Builder, Dialect};
//!
//! let sql = Builder::new(Dialect::Sqlite)
//!     .table("users")
//!     .and_where("id", "=", "58' OR 1=1;--")
//!     .select_all()
//!     .unwrap();
//!
//! assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"id\" = '58'' OR 1=1;--';");
//! ```

pub mod builder;
pub mod clause;
pub mod column;
pub mod dialect;
pub mod error;
pub mod quote;

pub use builder::{Builder, Projection};
pub use clause::{Connective, Direction, OrderBy, Predicate};
pub use column::{ColumnDefinition, ColumnOptions, ColumnType};
pub use dialect::{Dialect, NOT_SUPPORTED};
pub use error::BuildError;
pub use quote::{escape, quote_identifier, quote_literal};
