//! Connection configuration.

use serde::Deserialize;

/// Connection URL used when none is configured.
pub const DEFAULT_URL: &str = "sqlite::memory:";

/// Pool size used when none is configured.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuration of a [`Database`](crate::Database).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite::memory:` or `postgres://localhost/app`.
    pub url: String,
    /// Dialect tag overriding the one derived from the URL scheme.
    pub dialect: Option<String>,
    /// Maximum pool size.
    pub max_connections: u32,
    /// Record executed statements in the statement log.
    pub sql_log: bool,
    /// Log every statement at INFO level.
    pub debug: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::from(DEFAULT_URL),
            dialect: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            sql_log: false,
            debug: false,
        }
    }
}

impl DatabaseConfig {
    /// Creates a configuration for a URL with default settings.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Overrides the dialect tag.
    #[must_use]
    pub fn dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    /// Sets the maximum pool size.
    #[must_use]
    pub const fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Enables the statement log.
    #[must_use]
    pub const fn sql_log(mut self, enabled: bool) -> Self {
        self.sql_log = enabled;
        self
    }

    /// Enables statement echo at INFO level.
    #[must_use]
    pub const fn debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, 5);
        assert!(!config.sql_log);
        assert!(config.dialect.is_none());
    }

    #[test]
    fn test_builder_setters() {
        let config = DatabaseConfig::new("postgres://localhost/app")
            .dialect("postgres")
            .max_connections(2)
            .sql_log(true)
            .debug(true);
        assert_eq!(config.url, "postgres://localhost/app");
        assert_eq!(config.dialect.as_deref(), Some("postgres"));
        assert_eq!(config.max_connections, 2);
        assert!(config.sql_log);
        assert!(config.debug);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DatabaseConfig =
            serde_json::from_str(r#"{"url": "sqlite:app.db", "sql_log": true}"#).unwrap();
        assert_eq!(config.url, "sqlite:app.db");
        assert!(config.sql_log);
        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
    }
}
