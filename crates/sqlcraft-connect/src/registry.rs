//! Named connection registry.

use std::collections::HashMap;
use std::sync::RwLock;

use sqlcraft_core::Dialect;

use crate::config::ConnectConfig;
use crate::dsn::dsn;
use crate::error::{ConnectError, Result};

#[derive(Debug, Clone)]
struct Registered {
    config: ConnectConfig,
    dialect: Dialect,
    dsn: String,
}

/// A process-wide map of named connection configurations.
///
/// Registration validates the driver name and DSN keys up front, so
/// lookups after startup cannot fail on malformed config. Writes happen
/// at startup; lookups are concurrent reads.
#[derive(Debug, Default)]
pub struct Registry {
    inner: RwLock<HashMap<String, Registered>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `config` and registers it under `name`, replacing any
    /// previous entry with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::MissingConfigKey`] or an unsupported
    /// driver error; nothing is registered in that case.
    pub fn register(&self, name: &str, config: ConnectConfig) -> Result<()> {
        let dialect = config.dialect()?;
        let dsn = dsn(&config)?;
        tracing::info!(connection = name, driver = %dialect, "registered connection");
        let mut map = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        map.insert(
            name.to_string(),
            Registered {
                config,
                dialect,
                dsn,
            },
        );
        Ok(())
    }

    /// Returns the dialect of the named connection; this is what the
    /// compilers take as their dialect input.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::UnknownConnection`] for an unregistered
    /// name.
    pub fn dialect(&self, name: &str) -> Result<Dialect> {
        self.get(name).map(|r| r.dialect)
    }

    /// Returns the DSN of the named connection.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::UnknownConnection`] for an unregistered
    /// name.
    pub fn dsn(&self, name: &str) -> Result<String> {
        self.get(name).map(|r| r.dsn)
    }

    /// Returns a copy of the named configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError::UnknownConnection`] for an unregistered
    /// name.
    pub fn config(&self, name: &str) -> Result<ConnectConfig> {
        self.get(name).map(|r| r.config)
    }

    /// Whether a connection is registered under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered connection names, unordered.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn get(&self, name: &str) -> Result<Registered> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| ConnectError::UnknownConnection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mysql_config() -> ConnectConfig {
        ConnectConfig {
            driver: String::from("mysql"),
            database: Some(String::from("app")),
            ..ConnectConfig::default()
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new();
        registry.register("default", mysql_config()).unwrap();

        assert_eq!(registry.dialect("default").unwrap(), Dialect::Mysql);
        assert_eq!(
            registry.dsn("default").unwrap(),
            "mysql:host=localhost;port=3306;dbname=app;charset=utf8mb4"
        );
        assert!(registry.contains("default"));
    }

    #[test]
    fn test_unknown_connection() {
        let registry = Registry::new();
        let err = registry.dialect("missing").unwrap_err();
        assert!(matches!(err, ConnectError::UnknownConnection(name) if name == "missing"));
    }

    #[test]
    fn test_invalid_config_registers_nothing() {
        let registry = Registry::new();
        let bad = ConnectConfig {
            driver: String::from("mysql"),
            ..ConnectConfig::default()
        };
        assert!(registry.register("bad", bad).is_err());
        assert!(!registry.contains("bad"));
    }

    #[test]
    fn test_reregistration_replaces() {
        let registry = Registry::new();
        registry.register("db", mysql_config()).unwrap();

        let mut pg = mysql_config();
        pg.driver = String::from("pgsql");
        registry.register("db", pg).unwrap();
        assert_eq!(registry.dialect("db").unwrap(), Dialect::Pgsql);
        assert_eq!(registry.names(), vec![String::from("db")]);
    }

    #[test]
    fn test_concurrent_reads() {
        let registry = std::sync::Arc::new(Registry::new());
        registry.register("default", mysql_config()).unwrap();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = std::sync::Arc::clone(&registry);
                std::thread::spawn(move || registry.dialect("default").unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Dialect::Mysql);
        }
    }
}
