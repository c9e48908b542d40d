//! Connection configuration.

use serde::{Deserialize, Serialize};
use sqlcraft_core::Dialect;

use crate::error::Result;

/// Declarative connection settings, typically deserialized from an
/// application config file. Which keys are required depends on the
/// driver; [`crate::dsn`] enforces that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectConfig {
    /// Driver name, e.g. `mysql`, `pgsql`, `sqlite`.
    pub driver: String,
    /// Database host; defaults per driver when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// TCP port; defaults per driver when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Database name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Login user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Login password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Connection charset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charset: Option<String>,
    /// Database file path (SQLite only); `:memory:` is accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ConnectConfig {
    /// Resolves the configured driver name to a [`Dialect`].
    ///
    /// # Errors
    ///
    /// Returns [`sqlcraft_core::Error::UnsupportedDriver`] for an
    /// unrecognized name.
    pub fn dialect(&self) -> Result<Dialect> {
        Ok(Dialect::from_name(&self.driver)?)
    }
}
