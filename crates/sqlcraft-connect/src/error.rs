//! Error types for the connection surface.

/// Errors raised while resolving connection configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// A required configuration key is missing for the driver.
    #[error("[{key}] key not found in config for driver [{driver}]")]
    MissingConfigKey {
        /// The missing key.
        key: &'static str,
        /// The driver requiring it.
        driver: String,
    },

    /// No connection registered under the given name.
    #[error("Unknown connection: [{0}]")]
    UnknownConnection(String),

    /// A compiler-core error, usually an unsupported driver name.
    #[error(transparent)]
    Core(#[from] sqlcraft_core::Error),
}

/// Result type for connection operations.
pub type Result<T> = std::result::Result<T, ConnectError>;
