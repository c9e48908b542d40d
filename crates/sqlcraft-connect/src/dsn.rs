//! Per-driver DSN construction.
//!
//! Each driver validates its required keys and fills documented
//! defaults for the rest. Credentials never appear in the DSN; they are
//! passed to the driver separately by the execution layer.

use sqlcraft_core::Dialect;

use crate::config::ConnectConfig;
use crate::error::{ConnectError, Result};

fn required<'a>(value: Option<&'a str>, key: &'static str, driver: &str) -> Result<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConnectError::MissingConfigKey {
            key,
            driver: driver.to_string(),
        }),
    }
}

/// Builds the PDO-style DSN string for `config`.
///
/// # Errors
///
/// Returns [`ConnectError::MissingConfigKey`] when a driver-required
/// key is absent and [`sqlcraft_core::Error::UnsupportedDriver`] for an
/// unknown driver name.
pub fn dsn(config: &ConnectConfig) -> Result<String> {
    let dialect = config.dialect()?;
    let host = config.host.as_deref().unwrap_or("localhost");

    Ok(match dialect {
        Dialect::Mysql => {
            let database = required(config.database.as_deref(), "database", &config.driver)?;
            let port = config.port.unwrap_or(3306);
            let charset = config.charset.as_deref().unwrap_or("utf8mb4");
            format!("mysql:host={host};port={port};dbname={database};charset={charset}")
        }
        Dialect::Pgsql => {
            let database = required(config.database.as_deref(), "database", &config.driver)?;
            let port = config.port.unwrap_or(5432);
            format!("pgsql:host={host};port={port};dbname={database}")
        }
        Dialect::Sqlite => {
            let path = required(config.path.as_deref(), "path", &config.driver)?;
            format!("sqlite:{path}")
        }
        Dialect::Sqlsrv => {
            let database = required(config.database.as_deref(), "database", &config.driver)?;
            let port = config.port.unwrap_or(1433);
            format!("sqlsrv:Server={host},{port};Database={database}")
        }
        Dialect::Oci => {
            let explicit_host = required(config.host.as_deref(), "host", &config.driver)?;
            let database = required(config.database.as_deref(), "database", &config.driver)?;
            let port = config.port.unwrap_or(1521);
            let charset = config.charset.as_deref().unwrap_or("AL32UTF8");
            format!("oci:dbname=//{explicit_host}:{port}/{database};charset={charset}")
        }
        Dialect::Firebird => {
            let database = required(config.database.as_deref(), "database", &config.driver)?;
            let charset = config.charset.as_deref().unwrap_or("UTF8");
            format!("firebird:dbname={host}.{database};charset={charset}")
        }
    })
}
