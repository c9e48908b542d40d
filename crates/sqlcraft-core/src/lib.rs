//! # sqlcraft-core
//!
//! A driver-agnostic SQL compiler: schema blueprints to DDL, query
//! builder state to parameterized DML, for MySQL/MariaDB, PostgreSQL,
//! SQLite, SQL Server, Oracle and Firebird.
//!
//! This crate provides:
//! - A dialect descriptor table covering quoting, boolean literals,
//!   auto-increment keywords, type names and pagination styles
//! - A write-once schema [`Blueprint`] compiled into CREATE/ALTER batches
//! - A resettable [`QueryBuilder`] compiled into SQL text plus an
//!   ordered bindings array
//!
//! Nothing here talks to a database; the compiled [`Statement`] pair is
//! handed to whatever driver the caller executes with.
//!
//! ## Building a table
//!
//! ```rust
//! use sqlcraft_core::{Blueprint, Dialect};
//!
//! let mut table = Blueprint::new("users", Dialect::Mysql)?;
//! table.column("id")?.int().auto();
//! table.column("email")?.varchar().unique();
//! let statements = table.create()?;
//!
//! assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS `users`"));
//! # Ok::<(), sqlcraft_core::Error>(())
//! ```
//!
//! ## SQL injection prevention
//!
//! Identifiers pass a strict grammar before quoting, and values are
//! always parameterized:
//!
//! ```rust
//! use sqlcraft_core::{Dialect, QueryBuilder};
//!
//! let user_input = "'; DROP TABLE users; --";
//! let mut query = QueryBuilder::new(Dialect::Pgsql);
//! let statement = query
//!     .table("users")?
//!     .where_("name", "=", user_input)?
//!     .get()?;
//!
//! assert_eq!(statement.sql, "SELECT * FROM \"users\" WHERE \"name\" = ?");
//! assert_eq!(statement.bindings.len(), 1);
//! # Ok::<(), sqlcraft_core::Error>(())
//! ```

pub mod dialect;
pub mod error;
pub mod query;
pub mod quote;
pub mod schema;
pub mod value;

pub use dialect::{Dialect, PaginationStyle};
pub use error::{Error, Result};
pub use query::{QueryBuilder, Row, Statement};
pub use schema::{
    describe_table, drop_table, rename_table, truncate_table, Blueprint, ColumnDef, ColumnKind,
    ForeignKeyAction, Length,
};
pub use value::{debug_sql, IntoValue, Value};
