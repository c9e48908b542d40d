//! Schema blueprints and the DDL grammar.
//!
//! A [`Blueprint`] is a write-once model of one table: columns are
//! accumulated through fluent [`ColumnDef`] calls, then compiled into a
//! statement batch for the blueprint's dialect. Compiling locks the
//! blueprint; any further mutation or recompilation is an error.

pub mod column;
mod ddl;
mod types;

pub use column::{ColumnDef, ColumnKind, ForeignKeyAction, ForeignKeyRef, Length};
pub use ddl::{describe_table, drop_table, rename_table, truncate_table};

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::quote::validate;

/// An in-memory model of one table's schema.
#[derive(Debug, Clone)]
pub struct Blueprint {
    pub(crate) table: String,
    pub(crate) dialect: Dialect,
    pub(crate) columns: Vec<ColumnDef>,
    pub(crate) engine: Option<String>,
    pub(crate) charset: Option<String>,
    pub(crate) collation: Option<String>,
    locked: bool,
}

impl Blueprint {
    /// Creates an empty blueprint for `table` targeting `dialect`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed table name.
    pub fn new(table: impl Into<String>, dialect: Dialect) -> Result<Self> {
        let table = table.into();
        validate(&table)?;
        Ok(Self {
            table,
            dialect,
            columns: Vec::new(),
            engine: None,
            charset: None,
            collation: None,
            locked: false,
        })
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Starts a new column definition and returns it for fluent calls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlueprintLocked`] after compilation and
    /// [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn column(&mut self, name: impl Into<String>) -> Result<&mut ColumnDef> {
        self.check_unlocked()?;
        let name = name.into();
        validate(&name)?;
        self.columns.push(ColumnDef::new(name));
        let last = self.columns.len() - 1;
        Ok(&mut self.columns[last])
    }

    /// Sets the storage engine (MySQL only; ignored elsewhere).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlueprintLocked`] after compilation.
    pub fn engine(&mut self, engine: impl Into<String>) -> Result<&mut Self> {
        self.check_unlocked()?;
        self.engine = Some(engine.into());
        Ok(self)
    }

    /// Sets the default charset (MySQL only; ignored elsewhere).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlueprintLocked`] after compilation.
    pub fn charset(&mut self, charset: impl Into<String>) -> Result<&mut Self> {
        self.check_unlocked()?;
        self.charset = Some(charset.into());
        Ok(self)
    }

    /// Sets the collation (MySQL only; ignored elsewhere).
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlueprintLocked`] after compilation.
    pub fn collate(&mut self, collation: impl Into<String>) -> Result<&mut Self> {
        self.check_unlocked()?;
        self.collation = Some(collation.into());
        Ok(self)
    }

    /// Compiles the blueprint into a CREATE TABLE batch and locks it.
    ///
    /// The batch is the `CREATE TABLE IF NOT EXISTS` statement followed
    /// by `CREATE [UNIQUE] INDEX` statements in column-declaration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlueprintLocked`] on a second compilation,
    /// [`Error::EmptyTable`] with zero columns,
    /// [`Error::MissingColumnType`] for an untyped column and
    /// [`Error::DuplicatePrimaryKey`] when two columns end up primary.
    pub fn create(&mut self) -> Result<Vec<String>> {
        self.check_unlocked()?;
        self.locked = true;
        ddl::compile_create(self)
    }

    /// Compiles the blueprint into an ALTER TABLE ADD batch and locks
    /// it. Every column becomes its own statement, as SQLite requires.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Blueprint::create`], except that a
    /// duplicate primary key is not checked against the existing table.
    pub fn add_columns(&mut self) -> Result<Vec<String>> {
        self.check_unlocked()?;
        self.locked = true;
        ddl::compile_add_columns(self)
    }

    fn check_unlocked(&self) -> Result<()> {
        if self.locked {
            Err(Error::BlueprintLocked(self.table.clone()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mysql_create_scenario() {
        let mut table = Blueprint::new("t", Dialect::Mysql).unwrap();
        table.column("id").unwrap().int().auto();
        table.column("email").unwrap().varchar().unique().null();
        let statements = table.create().unwrap();
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE IF NOT EXISTS `t` (`id` INT NOT NULL AUTO_INCREMENT PRIMARY KEY, \
                 `email` VARCHAR(255) NOT NULL);",
                "CREATE UNIQUE INDEX IF NOT EXISTS `uindex_email` ON `t` (`email`);",
            ]
        );
    }

    #[test]
    fn test_auto_primary_appears_once_without_default_on_all_dialects() {
        for dialect in Dialect::ALL {
            let mut table = Blueprint::new("t", dialect).unwrap();
            table.column("id").unwrap().int().auto();
            table.column("name").unwrap().varchar().length(100);
            let statements = table.create().unwrap();
            let create = &statements[0];
            assert_eq!(create.matches("PRIMARY KEY").count(), 1, "{dialect}: {create}");
            // The identity keyword on oci/firebird contains the word
            // DEFAULT; scrub it before asserting no default clause.
            let scrubbed = create.replace("GENERATED BY DEFAULT AS IDENTITY", "");
            assert!(!scrubbed.contains("DEFAULT"), "{dialect}: {create}");
        }
    }

    #[test]
    fn test_create_locks_blueprint() {
        let mut table = Blueprint::new("t", Dialect::Sqlite).unwrap();
        table.column("id").unwrap().int().auto();
        table.create().unwrap();

        assert!(matches!(table.create(), Err(Error::BlueprintLocked(_))));
        assert!(matches!(table.column("late"), Err(Error::BlueprintLocked(_))));
        assert!(matches!(table.engine("InnoDB"), Err(Error::BlueprintLocked(_))));
    }

    #[test]
    fn test_empty_table_rejected() {
        let mut table = Blueprint::new("t", Dialect::Mysql).unwrap();
        assert!(matches!(table.create(), Err(Error::EmptyTable(name)) if name == "t"));
    }

    #[test]
    fn test_untyped_column_rejected() {
        let mut table = Blueprint::new("t", Dialect::Mysql).unwrap();
        table.column("mystery").unwrap();
        assert!(matches!(
            table.create(),
            Err(Error::MissingColumnType(name)) if name == "mystery"
        ));
    }

    #[test]
    fn test_duplicate_primary_key_rejected_at_compile() {
        let mut table = Blueprint::new("t", Dialect::Pgsql).unwrap();
        table.column("id").unwrap().int().auto();
        table.column("uuid").unwrap().varchar().primary();
        let err = table.create().unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicatePrimaryKey { table, column } if table == "t" && column == "uuid"
        ));
    }

    #[test]
    fn test_mysql_table_options() {
        let mut table = Blueprint::new("t", Dialect::Mysql).unwrap();
        table.column("id").unwrap().int().auto();
        table
            .engine("InnoDB")
            .unwrap()
            .charset("utf8mb4")
            .unwrap()
            .collate("utf8mb4_unicode_ci")
            .unwrap();
        let statements = table.create().unwrap();
        assert!(statements[0]
            .ends_with("ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci;"));
    }

    #[test]
    fn test_table_options_ignored_off_mysql() {
        let mut table = Blueprint::new("t", Dialect::Pgsql).unwrap();
        table.column("id").unwrap().int().auto();
        table.engine("InnoDB").unwrap();
        let statements = table.create().unwrap();
        assert!(!statements[0].contains("ENGINE"));
    }

    #[test]
    fn test_enum_side_constraint_lands_in_table_body() {
        let mut table = Blueprint::new("t", Dialect::Sqlsrv).unwrap();
        table.column("status").unwrap().enumeration(&["on", "off"]).null();
        let statements = table.create().unwrap();
        assert_eq!(
            statements[0],
            "CREATE TABLE IF NOT EXISTS [t] ([status] NVARCHAR(MAX) NULL, \
             CONSTRAINT chk_status CHECK ([status] IN ('on','off')));"
        );
    }

    #[test]
    fn test_index_statement_without_if_not_exists_on_firebird() {
        let mut table = Blueprint::new("t", Dialect::Firebird).unwrap();
        table.column("code").unwrap().varchar().index().null();
        let statements = table.create().unwrap();
        assert_eq!(statements[1], "CREATE INDEX \"index_code\" ON \"t\" (\"code\");");
    }

    #[test]
    fn test_add_columns_one_statement_each() {
        let mut table = Blueprint::new("t", Dialect::Sqlite).unwrap();
        table.column("a").unwrap().int().null();
        table.column("b").unwrap().varchar().length(50).null();
        let statements = table.add_columns().unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE \"t\" ADD \"a\" INTEGER NULL;",
                "ALTER TABLE \"t\" ADD \"b\" VARCHAR(50) NULL;",
            ]
        );
    }

    #[test]
    fn test_add_columns_appends_side_constraints() {
        let mut table = Blueprint::new("t", Dialect::Oci).unwrap();
        table.column("status").unwrap().enumeration(&["a"]).null();
        let statements = table.add_columns().unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(
            statements[1],
            "ALTER TABLE \"t\" ADD CONSTRAINT chk_status CHECK (\"status\" IN ('a'));"
        );
    }

    #[test]
    fn test_invalid_table_name_rejected_at_construction() {
        assert!(matches!(
            Blueprint::new("t; DROP", Dialect::Mysql),
            Err(Error::InvalidIdentifier(_))
        ));
    }
}
