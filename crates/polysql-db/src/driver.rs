//! Driver name normalization.

use polysql_core::Dialect;

/// Normalizes a driver or backend name to a dialect tag.
///
/// Matching is by case-insensitive substring: `mysql`, `postgres` (also
/// `pq`), `sqlite` and `mssql`. Any other name is returned unchanged.
///
/// ```rust
/// use polysql_db::driver::database_driver_name;
///
/// assert_eq!(database_driver_name("PostgreSQL"), "postgres");
/// assert_eq!(database_driver_name("sqlite3"), "sqlite");
/// assert_eq!(database_driver_name("oracle"), "oracle");
/// ```
#[must_use]
pub fn database_driver_name(name: &str) -> String {
    let lower = name.to_lowercase();

    let normalized = if lower.contains("mysql") {
        "mysql"
    } else if lower.contains("postgres") || lower.contains("pq") {
        "postgres"
    } else if lower.contains("sqlite") {
        "sqlite"
    } else if lower.contains("mssql") {
        "mssql"
    } else {
        return name.to_string();
    };

    normalized.to_string()
}

/// Derives the dialect from the scheme of a connection URL.
#[must_use]
pub fn dialect_from_url(url: &str) -> Dialect {
    let scheme = url.split_once(':').map_or(url, |(scheme, _)| scheme);
    Dialect::from(database_driver_name(scheme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_names() {
        assert_eq!(database_driver_name("MySQL"), "mysql");
        assert_eq!(database_driver_name("*mysql.MySQLDriver"), "mysql");
        assert_eq!(database_driver_name("PostgreSQL"), "postgres");
        assert_eq!(database_driver_name("*pq.Driver"), "postgres");
        assert_eq!(database_driver_name("SQLite"), "sqlite");
        assert_eq!(database_driver_name("sqlite3"), "sqlite");
        assert_eq!(database_driver_name("mssql"), "mssql");
    }

    #[test]
    fn test_unknown_driver_passes_through() {
        assert_eq!(database_driver_name("Oracle"), "Oracle");
        assert_eq!(database_driver_name(""), "");
    }

    #[test]
    fn test_dialect_from_url() {
        assert_eq!(dialect_from_url("sqlite::memory:"), Dialect::Sqlite);
        assert_eq!(dialect_from_url("sqlite3:test.db"), Dialect::Sqlite);
        assert_eq!(
            dialect_from_url("postgres://user@localhost/app"),
            Dialect::Postgres
        );
        assert_eq!(
            dialect_from_url("postgresql://user@localhost/app"),
            Dialect::Postgres
        );
        assert_eq!(dialect_from_url("mysql://root@localhost/app"), Dialect::MySql);
        assert_eq!(
            dialect_from_url("oracle://db"),
            Dialect::Unsupported("oracle".to_string())
        );
    }
}
