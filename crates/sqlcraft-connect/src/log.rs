//! Per-connection statement log.

use std::collections::HashMap;
use std::sync::RwLock;

use sqlcraft_core::Statement;

/// One logged statement.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Parameterized SQL text as compiled.
    pub sql: String,
    /// The statement with bindings substituted, for inspection only.
    pub rendered: String,
}

/// An append-only statement log keyed by connection name.
///
/// Entries also go out as `tracing` events, so the log doubles as a
/// debugging buffer in tests and a structured event source in
/// production.
#[derive(Debug, Default)]
pub struct QueryLog {
    inner: RwLock<HashMap<String, Vec<LogEntry>>>,
}

impl QueryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `statement` under `connection`.
    pub fn add(&self, connection: &str, statement: &Statement) {
        let entry = LogEntry {
            sql: statement.sql.clone(),
            rendered: statement.debug(),
        };
        tracing::debug!(connection, sql = %entry.sql, "statement compiled");
        let mut map = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        map.entry(connection.to_string()).or_default().push(entry);
    }

    /// Returns the entries logged for `connection`, oldest first.
    #[must_use]
    pub fn entries(&self, connection: &str) -> Vec<LogEntry> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(connection)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of entries logged for `connection`.
    #[must_use]
    pub fn count(&self, connection: &str) -> usize {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(connection)
            .map_or(0, Vec::len)
    }

    /// Drops all entries for `connection`.
    pub fn clear(&self, connection: &str) {
        self.inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(connection);
    }
}
