//! Statement log.
//!
//! Keeps the statements executed through a [`Database`](crate::Database)
//! together with how long they took, in execution order.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// One executed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLogEntry {
    /// The statement text.
    pub sql: String,
    /// Time spent executing it.
    pub duration: Duration,
    /// When execution finished.
    pub executed_at: DateTime<Utc>,
}

/// Ordered log of executed statements. Records nothing until enabled.
#[derive(Debug, Clone, Default)]
pub struct SqlLog {
    enabled: bool,
    entries: Vec<SqlLogEntry>,
}

impl SqlLog {
    /// Creates a log.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: Vec::new(),
        }
    }

    /// Turns recording on or off. Existing entries are kept.
    pub fn enable(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Returns whether recording is on.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Records a statement if the log is enabled.
    pub fn record(&mut self, sql: &str, duration: Duration) {
        if !self.enabled {
            return;
        }
        self.entries.push(SqlLogEntry {
            sql: sql.to_string(),
            duration,
            executed_at: Utc::now(),
        });
    }

    /// Returns the recorded entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[SqlLogEntry] {
        &self.entries
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keeps only the `leave_last` most recent entries.
    pub fn shrink(&mut self, leave_last: usize) {
        if self.entries.len() > leave_last {
            let excess = self.entries.len() - leave_last;
            self.entries.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(n: usize) -> SqlLog {
        let mut log = SqlLog::new(true);
        for i in 0..n {
            log.record(&format!("SELECT {i};"), Duration::from_millis(1));
        }
        log
    }

    #[test]
    fn test_disabled_log_records_nothing() {
        let mut log = SqlLog::default();
        log.record("SELECT 1;", Duration::ZERO);
        assert!(log.is_empty());

        log.enable(true);
        log.record("SELECT 1;", Duration::ZERO);
        assert_eq!(log.len(), 1);
        assert_eq!(log.entries()[0].sql, "SELECT 1;");
    }

    #[test]
    fn test_shrink_keeps_most_recent() {
        let mut log = filled(5);
        log.shrink(2);
        let sql: Vec<&str> = log.entries().iter().map(|e| e.sql.as_str()).collect();
        assert_eq!(sql, vec!["SELECT 3;", "SELECT 4;"]);

        log.shrink(10);
        assert_eq!(log.len(), 2);

        log.shrink(0);
        assert!(log.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut log = filled(3);
        log.clear();
        assert!(log.is_empty());
        assert!(log.is_enabled());
    }
}
