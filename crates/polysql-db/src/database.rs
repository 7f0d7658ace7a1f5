//! Database wrapper executing compiled statements.

use std::collections::BTreeMap;
use std::time::Instant;

use futures::future::BoxFuture;
use polysql_core::{Builder, Dialect};
use serde_json::Value;
use sqlx::any::{AnyPoolOptions, AnyRow};
use sqlx::{Any, AnyPool, Transaction};
use tracing::{debug, info, warn};

use crate::config::DatabaseConfig;
use crate::driver::{database_driver_name, dialect_from_url};
use crate::error::{DbError, Result};
use crate::log::{SqlLog, SqlLogEntry};
use crate::scan::{map_to_strings, row_to_map};

/// A connection pool paired with the dialect its statements are compiled for.
///
/// Holds at most one open transaction. While it is open every statement is
/// routed through it; otherwise statements go to the pool.
pub struct Database {
    pool: AnyPool,
    dialect: Dialect,
    tx: Option<Transaction<'static, Any>>,
    sql_log: SqlLog,
    debug: bool,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("dialect", &self.dialect)
            .field("in_transaction", &self.tx.is_some())
            .field("sql_log", &self.sql_log)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Wraps an existing pool.
    pub fn new(pool: AnyPool, dialect: impl Into<Dialect>) -> Self {
        Self {
            pool,
            dialect: dialect.into(),
            tx: None,
            sql_log: SqlLog::default(),
            debug: false,
        }
    }

    /// Opens a pool for a URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Open`] if the pool cannot be opened.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::from_config(DatabaseConfig::new(url)).await
    }

    /// Opens a pool as configured.
    ///
    /// The dialect is the configured one if set, otherwise it is derived
    /// from the URL scheme.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Open`] if the pool cannot be opened.
    pub async fn from_config(config: DatabaseConfig) -> Result<Self> {
        sqlx::any::install_default_drivers();

        let dialect = config.dialect.as_deref().map_or_else(
            || dialect_from_url(&config.url),
            |tag| Dialect::from(database_driver_name(tag)),
        );

        let pool = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(DbError::Open)?;

        info!(dialect = %dialect, max_connections = config.max_connections, "Opened database");

        let mut database = Self::new(pool, dialect);
        database.enable_sql_log(config.sql_log);
        database.enable_debug(config.debug);
        Ok(database)
    }

    /// Returns the dialect statements are compiled for.
    #[must_use]
    pub const fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Returns a statement builder for this database's dialect.
    #[must_use]
    pub fn builder(&self) -> Builder {
        Builder::new(self.dialect.clone())
    }

    /// Returns the normalized name of the connected backend.
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be acquired.
    pub async fn driver_name(&self) -> Result<String> {
        let conn = self.pool.acquire().await?;
        Ok(database_driver_name(conn.backend_name()))
    }

    /// Turns INFO-level statement echo on or off.
    pub fn enable_debug(&mut self, enabled: bool) {
        self.debug = enabled;
    }

    /// Turns the statement log on or off.
    pub fn enable_sql_log(&mut self, enabled: bool) {
        self.sql_log.enable(enabled);
    }

    /// Returns the recorded statements, oldest first.
    #[must_use]
    pub fn sql_log(&self) -> &[SqlLogEntry] {
        self.sql_log.entries()
    }

    /// Returns the number of recorded statements.
    #[must_use]
    pub fn sql_log_len(&self) -> usize {
        self.sql_log.len()
    }

    /// Removes all recorded statements.
    pub fn clear_sql_log(&mut self) {
        self.sql_log.clear();
    }

    /// Keeps only the `leave_last` most recent statements.
    pub fn shrink_sql_log(&mut self, leave_last: usize) {
        self.sql_log.shrink(leave_last);
    }

    /// Returns whether a transaction is open.
    #[must_use]
    pub const fn in_transaction(&self) -> bool {
        self.tx.is_some()
    }

    /// Opens a transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::TransactionInProgress`] if one is already open, or
    /// [`DbError::Begin`] if the driver refuses.
    pub async fn begin_transaction(&mut self) -> Result<()> {
        if self.tx.is_some() {
            return Err(DbError::TransactionInProgress);
        }
        let tx = self.pool.begin().await.map_err(DbError::Begin)?;
        self.tx = Some(tx);
        debug!("Began transaction");
        Ok(())
    }

    /// Commits the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NoTransaction`] if none is open, or
    /// [`DbError::Commit`] if the driver refuses. The slot is cleared either way.
    pub async fn commit_transaction(&mut self) -> Result<()> {
        let tx = self.tx.take().ok_or(DbError::NoTransaction)?;
        tx.commit().await.map_err(DbError::Commit)?;
        debug!("Committed transaction");
        Ok(())
    }

    /// Rolls back the open transaction.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::NoTransaction`] if none is open, or
    /// [`DbError::Rollback`] if the driver refuses.
    pub async fn rollback_transaction(&mut self) -> Result<()> {
        let tx = self.tx.take().ok_or(DbError::NoTransaction)?;
        tx.rollback().await.map_err(DbError::Rollback)?;
        debug!("Rolled back transaction");
        Ok(())
    }

    /// Runs `f` inside a new transaction.
    ///
    /// Commits if `f` succeeds. Rolls back and returns the error of `f` if it
    /// fails; a failing rollback is logged and does not replace that error.
    /// If `f` already closed the transaction itself, nothing more is done.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::TransactionInProgress`] if a transaction is already
    /// open, the error of `f`, or the commit error.
    pub async fn exec_in_transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        T: Send,
        F: for<'a> FnOnce(&'a mut Self) -> BoxFuture<'a, Result<T>>,
    {
        self.begin_transaction().await?;

        match f(self).await {
            Ok(value) => {
                if self.tx.is_some() {
                    self.commit_transaction().await?;
                }
                Ok(value)
            }
            Err(e) => {
                if self.tx.is_some() {
                    if let Err(rollback) = self.rollback_transaction().await {
                        warn!(error = %rollback, "Rollback after failed transaction body failed");
                    }
                }
                Err(e)
            }
        }
    }

    /// Executes a statement and returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns the driver error if execution fails.
    pub async fn exec(&mut self, sql: &str) -> Result<u64> {
        self.echo(sql);
        let started = Instant::now();

        let result = match self.tx.as_mut() {
            Some(tx) => sqlx::query(sql).execute(&mut **tx).await,
            None => sqlx::query(sql).execute(&self.pool).await,
        };

        self.sql_log.record(sql, started.elapsed());
        Ok(result?.rows_affected())
    }

    /// Executes a query and returns its rows.
    ///
    /// # Errors
    ///
    /// Returns the driver error if execution fails.
    pub async fn query(&mut self, sql: &str) -> Result<Vec<AnyRow>> {
        self.echo(sql);
        let started = Instant::now();

        let result = match self.tx.as_mut() {
            Some(tx) => sqlx::query(sql).fetch_all(&mut **tx).await,
            None => sqlx::query(sql).fetch_all(&self.pool).await,
        };

        self.sql_log.record(sql, started.elapsed());
        Ok(result?)
    }

    /// Executes a query and returns each row as a map of JSON values.
    ///
    /// # Errors
    ///
    /// Returns the driver error if execution fails.
    pub async fn select_to_map_any(&mut self, sql: &str) -> Result<Vec<BTreeMap<String, Value>>> {
        let rows = self.query(sql).await?;
        Ok(rows.iter().map(row_to_map).collect())
    }

    /// Executes a query and returns each row as a map of strings. `NULL`
    /// becomes the empty string.
    ///
    /// # Errors
    ///
    /// Returns the driver error if execution fails.
    pub async fn select_to_map_string(
        &mut self,
        sql: &str,
    ) -> Result<Vec<BTreeMap<String, String>>> {
        let rows = self.select_to_map_any(sql).await?;
        Ok(rows.iter().map(map_to_strings).collect())
    }

    /// Rolls back any open transaction and closes the pool.
    pub async fn close(mut self) {
        if let Some(tx) = self.tx.take() {
            if let Err(e) = tx.rollback().await {
                warn!(error = %e, "Rollback on close failed");
            }
        }
        self.pool.close().await;
    }

    fn echo(&self, sql: &str) {
        if self.debug {
            info!(sql, in_transaction = self.tx.is_some(), "Executing statement");
        } else {
            debug!(sql, in_transaction = self.tx.is_some(), "Executing statement");
        }
    }
}
