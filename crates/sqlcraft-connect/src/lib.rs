//! # sqlcraft-connect
//!
//! Connection configuration for the `sqlcraft` compiler stack: named
//! connection registry, per-driver DSN construction and a statement
//! log. No live database I/O happens here; the registry hands the
//! compilers a resolved [`sqlcraft_core::Dialect`] and the execution
//! layer a DSN.
//!
//! ```rust
//! use sqlcraft_connect::{ConnectConfig, Registry};
//! use sqlcraft_core::{Dialect, QueryBuilder};
//!
//! let registry = Registry::new();
//! registry.register(
//!     "default",
//!     ConnectConfig {
//!         driver: "pgsql".into(),
//!         database: Some("app".into()),
//!         ..ConnectConfig::default()
//!     },
//! )?;
//!
//! let dialect = registry.dialect("default")?;
//! let mut query = QueryBuilder::new(dialect);
//! let statement = query.table("users")?.where_("id", "=", 1)?.first()?;
//! # Ok::<(), sqlcraft_connect::ConnectError>(())
//! ```

pub mod config;
pub mod dsn;
pub mod error;
pub mod log;
pub mod registry;

pub use config::ConnectConfig;
pub use dsn::dsn;
pub use error::{ConnectError, Result};
pub use log::{LogEntry, QueryLog};
pub use registry::Registry;
