//! Error types for the compiler core.

/// Errors raised by the schema and query compilers.
///
/// Every variant is a deterministic input-shape problem surfaced
/// synchronously at the point of misuse; none are transient and none
/// are retried by this crate. Translating driver-level failures
/// (constraint violations, connectivity) is the execution layer's job.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Dialect name not recognized by the registry.
    #[error("Unsupported database driver: [{0}]")]
    UnsupportedDriver(String),

    /// Identifier fails the identifier grammar.
    #[error("Invalid identifier [{0}]. Only letters, digits, underscores and one optional dot are allowed.")]
    InvalidIdentifier(String),

    /// A column was compiled without a type having been set.
    #[error("Column [{0}] has no type defined")]
    MissingColumnType(String),

    /// A blueprint was compiled with zero columns.
    #[error("No columns defined for table [{0}]")]
    EmptyTable(String),

    /// More than one column in a table is marked PRIMARY KEY.
    #[error("Only one PRIMARY KEY is allowed per table [{table}]; second found on column [{column}]")]
    DuplicatePrimaryKey {
        /// Table being compiled.
        table: String,
        /// The offending second primary column.
        column: String,
    },

    /// A blueprint was mutated or compiled after it was locked.
    #[error("Blueprint for table [{0}] is locked; no further mutation allowed")]
    BlueprintLocked(String),

    /// ENUM/SET declared with an empty value list.
    #[error("ENUM/SET on column [{0}] requires at least one value")]
    EmptyEnumValues(String),

    /// A default value is incompatible with the column's type.
    #[error("Invalid default for column [{column}]: {reason}")]
    InvalidDefault {
        /// Column carrying the default.
        column: String,
        /// Why the default is rejected.
        reason: String,
    },

    /// The requested DDL operation has no equivalent on the dialect.
    #[error("Operation [{operation}] is not supported on driver [{driver}]")]
    UnsupportedOperation {
        /// The DDL operation name.
        operation: &'static str,
        /// The dialect lacking it.
        driver: &'static str,
    },

    /// A WHERE/HAVING operator outside the allowed set.
    #[error("Invalid operator: [{0}]")]
    InvalidOperator(String),

    /// A join type outside LEFT/RIGHT/INNER.
    #[error("Invalid join type: [{0}]")]
    InvalidJoinType(String),

    /// An ORDER BY direction outside ASC/DESC.
    #[error("Invalid order direction: [{0}]")]
    InvalidDirection(String),

    /// A query was built before a table name was set.
    #[error("Table name not set on query builder")]
    MissingTable,

    /// A mutating statement was compiled with no WHERE fragment.
    #[error("No WHERE clause provided for {0} operation")]
    MissingWhereClause(&'static str),

    /// An insert was attempted with zero rows.
    #[error("Cannot insert empty rows")]
    EmptyInsert,

    /// A multi-row insert where a row's columns differ from the first row's.
    #[error("All insert rows must have identical columns; row {row} differs")]
    InconsistentInsertColumns {
        /// Zero-based index of the mismatching row.
        row: usize,
    },

    /// `page()` called before `limit()`.
    #[error("Pagination page requires a limit to be set first")]
    PageRequiresLimit,

    /// Offset pagination on a dialect that requires ORDER BY for it.
    #[error("Offset pagination on [{0}] requires an ORDER BY clause")]
    PaginationRequiresOrder(&'static str),
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, Error>;
