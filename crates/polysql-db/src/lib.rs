//! # polysql-db
//!
//! Executes statements compiled by `polysql-core` against a live database.
//!
//! A [`Database`] owns an `sqlx` [`AnyPool`](sqlx::AnyPool) and the dialect
//! its statements are compiled for. It adds a single transaction slot, an
//! optional statement log with durations, and helpers that scan result rows
//! into maps.
//!
//! ## Example
//!
//! ```rust,no_run
//! use polysql_db::Database;
//!
//! # async fn run() -> polysql_db::Result<()> {
//! let mut db = Database::connect("sqlite:app.db").await?;
//! let sql = db.builder().table("users").and_where("id", "=", "1").select_all()?;
//! let rows = db.select_to_map_string(&sql).await?;
//! println!("{rows:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod database;
pub mod driver;
pub mod error;
pub mod log;
pub mod scan;

pub use config::DatabaseConfig;
pub use database::Database;
pub use driver::{database_driver_name, dialect_from_url};
pub use error::{DbError, Result};
pub use log::{SqlLog, SqlLogEntry};
