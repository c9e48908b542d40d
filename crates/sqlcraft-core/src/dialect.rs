//! Dialect descriptors.
//!
//! Every supported database is described by one [`Dialect`] value: its
//! identifier-quote pair, boolean literal formatting, auto-increment
//! keyword, pagination clause style, and native-type availability.
//! Dialect support is data plus a handful of lookup functions, never
//! string-built dispatch.

use crate::error::{Error, Result};

/// One target database's SQL syntax and type-naming rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// MySQL / MariaDB.
    Mysql,
    /// PostgreSQL.
    Pgsql,
    /// SQLite.
    Sqlite,
    /// Microsoft SQL Server.
    Sqlsrv,
    /// Oracle.
    Oci,
    /// Firebird.
    Firebird,
}

/// How a dialect expresses LIMIT/OFFSET-style pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationStyle {
    /// `LIMIT n [OFFSET m]`.
    LimitOffset,
    /// `SELECT TOP n`, or `OFFSET ... ROWS FETCH NEXT ... ROWS ONLY` with an offset.
    Top,
    /// `FETCH FIRST n ROWS ONLY`, or `OFFSET ... ROWS FETCH NEXT ...` with an offset.
    OffsetFetch,
    /// `ROWS start TO end`.
    RowsRange,
}

impl Dialect {
    /// All supported dialects, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Mysql,
        Self::Pgsql,
        Self::Sqlite,
        Self::Sqlsrv,
        Self::Oci,
        Self::Firebird,
    ];

    /// Resolves a dialect from a driver name.
    ///
    /// Accepts the canonical lowercase names (`mysql`, `pgsql`, `sqlite`,
    /// `sqlsrv`, `oci`, `firebird`) plus the aliases the connection layer
    /// hands out (`mariadb`, `postgres`, `postgresql`, `mssql`, `oracle`,
    /// `ibase`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDriver`] for any other name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(Self::Mysql),
            "pgsql" | "postgres" | "postgresql" => Ok(Self::Pgsql),
            "sqlite" => Ok(Self::Sqlite),
            "sqlsrv" | "mssql" => Ok(Self::Sqlsrv),
            "oci" | "oracle" => Ok(Self::Oci),
            "firebird" | "ibase" => Ok(Self::Firebird),
            other => Err(Error::UnsupportedDriver(other.to_string())),
        }
    }

    /// Returns the canonical lowercase driver name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Pgsql => "pgsql",
            Self::Sqlite => "sqlite",
            Self::Sqlsrv => "sqlsrv",
            Self::Oci => "oci",
            Self::Firebird => "firebird",
        }
    }

    /// Returns the opening and closing identifier quote characters.
    #[must_use]
    pub const fn quote_pair(self) -> (char, char) {
        match self {
            Self::Mysql => ('`', '`'),
            Self::Sqlsrv => ('[', ']'),
            Self::Pgsql | Self::Sqlite | Self::Oci | Self::Firebird => ('"', '"'),
        }
    }

    /// Returns the literal used for a boolean default value.
    #[must_use]
    pub const fn boolean_literal(self, value: bool) -> &'static str {
        match self {
            Self::Pgsql => {
                if value {
                    "TRUE"
                } else {
                    "FALSE"
                }
            }
            _ => {
                if value {
                    "1"
                } else {
                    "0"
                }
            }
        }
    }

    /// Returns the auto-increment keyword, or `""` when the increment is
    /// implied by the type (SQLite's INTEGER PRIMARY KEY rowid alias).
    #[must_use]
    pub const fn auto_increment_keyword(self) -> &'static str {
        match self {
            Self::Mysql => "AUTO_INCREMENT",
            Self::Pgsql => "GENERATED ALWAYS AS IDENTITY",
            Self::Sqlite => "",
            Self::Sqlsrv => "IDENTITY(1,1)",
            Self::Oci | Self::Firebird => "GENERATED BY DEFAULT AS IDENTITY",
        }
    }

    /// Returns the pagination clause style.
    #[must_use]
    pub const fn pagination(self) -> PaginationStyle {
        match self {
            Self::Mysql | Self::Pgsql | Self::Sqlite => PaginationStyle::LimitOffset,
            Self::Sqlsrv => PaginationStyle::Top,
            Self::Oci => PaginationStyle::OffsetFetch,
            Self::Firebird => PaginationStyle::RowsRange,
        }
    }

    /// Whether the dialect has a native ENUM column type.
    #[must_use]
    pub const fn has_native_enum(self) -> bool {
        matches!(self, Self::Mysql)
    }

    /// Whether the dialect has a native SET column type.
    #[must_use]
    pub const fn has_native_set(self) -> bool {
        matches!(self, Self::Mysql)
    }

    /// Whether the dialect has a native BOOLEAN column type.
    #[must_use]
    pub const fn has_native_boolean(self) -> bool {
        matches!(self, Self::Mysql | Self::Pgsql | Self::Firebird)
    }

    /// Whether the dialect has a native JSON column type.
    #[must_use]
    pub const fn has_native_json(self) -> bool {
        matches!(self, Self::Mysql | Self::Pgsql)
    }

    /// Whether `CREATE INDEX` accepts `IF NOT EXISTS`.
    #[must_use]
    pub const fn supports_index_if_not_exists(self) -> bool {
        matches!(self, Self::Mysql | Self::Pgsql | Self::Sqlite)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
