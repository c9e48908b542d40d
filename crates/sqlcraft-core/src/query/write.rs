//! INSERT/UPDATE/DELETE compilation.
//!
//! The mutators validate their guards before touching any state, so a
//! failed call leaves the builder exactly as it was. UPDATE, DELETE and
//! the increment pair refuse to compile without a WHERE fragment.

use crate::error::{Error, Result};
use crate::query::{QueryBuilder, Statement};
use crate::quote::quote;
use crate::value::Value;

/// Rows per INSERT statement; larger inputs split into multiple
/// statements.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Column carrying the deletion timestamp in soft-delete mode.
const DELETED_AT: &str = "deleted_at";

/// One insert row as ordered column/value pairs.
pub type Row<'a> = Vec<(&'a str, Value)>;

impl QueryBuilder {
    /// Compiles a multi-row INSERT, one statement per chunk of 1000
    /// rows, and resets the builder.
    ///
    /// Every row must carry the same column names in the same order as
    /// the first row; the check runs before any statement is produced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInsert`] for zero rows,
    /// [`Error::InconsistentInsertColumns`] on a key-sequence mismatch,
    /// [`Error::MissingTable`] and [`Error::InvalidIdentifier`].
    pub fn insert(&mut self, rows: &[Row<'_>]) -> Result<Vec<Statement>> {
        let table = self.table_sql()?.to_string();

        let first = rows.first().ok_or(Error::EmptyInsert)?;
        for (index, row) in rows.iter().enumerate().skip(1) {
            let matches = row.len() == first.len()
                && row.iter().zip(first).all(|((a, _), (b, _))| a == b);
            if !matches {
                return Err(Error::InconsistentInsertColumns { row: index });
            }
        }

        let columns = first
            .iter()
            .map(|(name, _)| quote(name, self.dialect))
            .collect::<Result<Vec<_>>>()?
            .join(", ");
        let row_placeholders = format!("({})", vec!["?"; first.len()].join(", "));

        let mut statements = Vec::with_capacity(rows.len().div_ceil(INSERT_CHUNK_SIZE));
        for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
            let values = vec![row_placeholders.as_str(); chunk.len()].join(", ");
            let bindings = chunk
                .iter()
                .flat_map(|row| row.iter().map(|(_, value)| value.clone()))
                .collect();
            statements.push(Statement {
                sql: format!("INSERT INTO {table} ({columns}) VALUES {values}"),
                bindings,
            });
        }
        tracing::debug!(
            dialect = %self.dialect,
            rows = rows.len(),
            statements = statements.len(),
            "compiled insert"
        );
        self.reset();
        Ok(statements)
    }

    /// Compiles a single-row INSERT and resets the builder.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`QueryBuilder::insert`].
    pub fn insert_one(&mut self, row: Row<'_>) -> Result<Statement> {
        let mut statements = self.insert(&[row])?;
        // One row always yields exactly one chunk.
        Ok(statements.remove(0))
    }

    fn mutation(&mut self, operation: &'static str, sql_head: String, head_bindings: Vec<Value>) -> Statement {
        let mut sql = sql_head;
        sql.push_str(" WHERE ");
        sql.push_str(&self.wheres.join(" "));

        let mut bindings = head_bindings;
        bindings.extend(self.where_bindings.iter().cloned());

        tracing::debug!(dialect = %self.dialect, operation, sql = %sql, "compiled mutation");
        self.reset();
        Statement { sql, bindings }
    }

    fn require_where(&self, operation: &'static str) -> Result<()> {
        if self.wheres.is_empty() {
            Err(Error::MissingWhereClause(operation))
        } else {
            Ok(())
        }
    }

    /// Compiles an UPDATE of the given column/value pairs and resets
    /// the builder. SET bindings precede WHERE bindings, matching
    /// placeholder order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment
    /// and [`Error::EmptyInsert`] for an empty pair list; the builder
    /// state is untouched in either case.
    pub fn update(&mut self, pairs: Vec<(&str, Value)>) -> Result<Statement> {
        self.require_where("update")?;
        let table = self.table_sql()?.to_string();
        if pairs.is_empty() {
            return Err(Error::EmptyInsert);
        }

        let mut assignments = Vec::with_capacity(pairs.len());
        let mut bindings = Vec::with_capacity(pairs.len());
        for (column, value) in pairs {
            let quoted = quote(column, self.dialect)?;
            assignments.push(format!("{quoted} = ?"));
            bindings.push(value);
        }

        let head = format!("UPDATE {table} SET {}", assignments.join(", "));
        Ok(self.mutation("update", head, bindings))
    }

    /// Enables or disables soft-delete mode for the current table.
    ///
    /// With the mode on, [`QueryBuilder::delete`] compiles to an UPDATE
    /// that stamps the `deleted_at` column instead of removing rows.
    /// The mode survives compilation and clears when the table changes.
    pub fn soft(&mut self, enabled: bool) -> &mut Self {
        self.soft_delete = enabled;
        self
    }

    /// Adds an AND-joined predicate matching only soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Propagates the identifier check on the `deleted_at` column.
    pub fn only_trashed(&mut self) -> Result<&mut Self> {
        self.where_not_null(DELETED_AT)
    }

    /// Adds an AND-joined predicate excluding soft-deleted rows.
    ///
    /// # Errors
    ///
    /// Propagates the identifier check on the `deleted_at` column.
    pub fn without_trashed(&mut self) -> Result<&mut Self> {
        self.where_null(DELETED_AT)
    }

    /// Compiles a DELETE and resets the builder. In soft-delete mode
    /// this compiles `UPDATE ... SET deleted_at = CURRENT_TIMESTAMP`
    /// instead, leaving the rows in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment;
    /// the builder state is untouched in that case.
    pub fn delete(&mut self) -> Result<Statement> {
        self.require_where("delete")?;
        let table = self.table_sql()?.to_string();
        let head = if self.soft_delete {
            let quoted = quote(DELETED_AT, self.dialect)?;
            format!("UPDATE {table} SET {quoted} = CURRENT_TIMESTAMP")
        } else {
            format!("DELETE FROM {table}")
        };
        Ok(self.mutation("delete", head, Vec::new()))
    }

    /// Compiles an UPDATE that clears the `deleted_at` stamp, undoing a
    /// soft delete, and resets the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment;
    /// the builder state is untouched in that case.
    pub fn restore(&mut self) -> Result<Statement> {
        self.require_where("restore")?;
        let table = self.table_sql()?.to_string();
        let quoted = quote(DELETED_AT, self.dialect)?;
        let head = format!("UPDATE {table} SET {quoted} = NULL");
        Ok(self.mutation("restore", head, Vec::new()))
    }

    /// Compiles `SET column = column + ?` and resets the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment.
    pub fn increment(&mut self, column: &str, amount: i64) -> Result<Statement> {
        self.step("increment", column, '+', amount)
    }

    /// Compiles `SET column = column - ?` and resets the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment.
    pub fn decrement(&mut self, column: &str, amount: i64) -> Result<Statement> {
        self.step("decrement", column, '-', amount)
    }

    fn step(
        &mut self,
        operation: &'static str,
        column: &str,
        sign: char,
        amount: i64,
    ) -> Result<Statement> {
        self.require_where(operation)?;
        let table = self.table_sql()?.to_string();
        let quoted = quote(column, self.dialect)?;
        let head = format!("UPDATE {table} SET {quoted} = {quoted} {sign} ?");
        Ok(self.mutation(operation, head, vec![Value::Int(amount)]))
    }
}
