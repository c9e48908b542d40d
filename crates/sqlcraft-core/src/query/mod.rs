//! Query builder state and the DML grammar.
//!
//! A [`QueryBuilder`] accumulates SELECT/UPDATE/DELETE state through
//! fluent calls. Identifiers and operators are validated at call time,
//! WHERE fragments get their AND/OR prefix decided at insertion, and
//! bindings are appended in placeholder order. Compilation itself is
//! pure: [`QueryBuilder::build`] never mutates state.

mod build;
mod write;

pub use build::Statement;
pub use write::Row;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::quote::quote;
use crate::value::{IntoValue, Value};

/// The closed set of comparison operators accepted by WHERE and HAVING.
const OPERATORS: [&str; 9] = ["=", "!=", "<>", "<", "<=", ">", ">=", "LIKE", "NOT LIKE"];

fn validate_operator(op: &str) -> Result<String> {
    let canonical = op.trim().to_ascii_uppercase();
    if OPERATORS.contains(&canonical.as_str()) {
        Ok(canonical)
    } else {
        Err(Error::InvalidOperator(op.to_string()))
    }
}

/// A parameterized SQL accumulator bound to one dialect.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    pub(crate) dialect: Dialect,
    pub(crate) table: Option<String>,
    pub(crate) columns: Vec<String>,
    pub(crate) distinct: bool,
    pub(crate) joins: Vec<String>,
    pub(crate) wheres: Vec<String>,
    pub(crate) groups: Vec<String>,
    pub(crate) havings: Vec<String>,
    pub(crate) orders: Vec<String>,
    pub(crate) limit: Option<u64>,
    pub(crate) page: Option<u64>,
    pub(crate) where_bindings: Vec<Value>,
    pub(crate) having_bindings: Vec<Value>,
    pub(crate) soft_delete: bool,
}

impl QueryBuilder {
    /// Creates an empty builder for `dialect`.
    #[must_use]
    pub const fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            table: None,
            columns: Vec::new(),
            distinct: false,
            joins: Vec::new(),
            wheres: Vec::new(),
            groups: Vec::new(),
            havings: Vec::new(),
            orders: Vec::new(),
            limit: None,
            page: None,
            where_bindings: Vec::new(),
            having_bindings: Vec::new(),
            soft_delete: false,
        }
    }

    /// Returns the target dialect.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Resets all accumulated state, then sets the table. Soft-delete
    /// mode is cleared too; it belongs to the table being targeted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed table name.
    pub fn table(&mut self, name: &str) -> Result<&mut Self> {
        let quoted = quote(name, self.dialect)?;
        self.reset();
        self.soft_delete = false;
        self.table = Some(quoted);
        Ok(self)
    }

    /// Clears accumulated state, keeping the dialect and table.
    pub(crate) fn reset(&mut self) {
        self.columns.clear();
        self.distinct = false;
        self.joins.clear();
        self.wheres.clear();
        self.groups.clear();
        self.havings.clear();
        self.orders.clear();
        self.limit = None;
        self.page = None;
        self.where_bindings.clear();
        self.having_bindings.clear();
    }

    /// Sets the projection to the given columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn select(&mut self, columns: &[&str]) -> Result<&mut Self> {
        for column in columns {
            let quoted = quote(column, self.dialect)?;
            self.columns.push(quoted);
        }
        Ok(self)
    }

    /// Adds a raw projection fragment, for `*` and aggregates.
    ///
    /// The fragment bypasses identifier validation; never feed it
    /// caller-supplied input.
    pub fn select_raw(&mut self, fragment: &str) -> &mut Self {
        self.columns.push(fragment.to_string());
        self
    }

    /// Makes the projection DISTINCT.
    pub fn distinct(&mut self) -> &mut Self {
        self.distinct = true;
        self
    }

    /// Adds a JOIN clause. `kind` must be LEFT, RIGHT or INNER.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidJoinType`] for any other kind,
    /// [`Error::InvalidOperator`] for an operator outside the closed
    /// set and [`Error::InvalidIdentifier`] for malformed names.
    pub fn join(
        &mut self,
        table: &str,
        first: &str,
        op: &str,
        second: &str,
        kind: &str,
    ) -> Result<&mut Self> {
        let join_kind = match kind.trim().to_ascii_uppercase().as_str() {
            "LEFT" => "LEFT",
            "RIGHT" => "RIGHT",
            "INNER" => "INNER",
            _ => return Err(Error::InvalidJoinType(kind.to_string())),
        };
        let op = validate_operator(op)?;
        let table = quote(table, self.dialect)?;
        let first = quote(first, self.dialect)?;
        let second = quote(second, self.dialect)?;
        self.joins
            .push(format!("{join_kind} JOIN {table} ON {first} {op} {second}"));
        Ok(self)
    }

    fn push_where(&mut self, conjunction: &str, fragment: String) {
        if self.wheres.is_empty() {
            self.wheres.push(fragment);
        } else {
            self.wheres.push(format!("{conjunction} {fragment}"));
        }
    }

    fn where_fragment<V: IntoValue>(
        &mut self,
        conjunction: &str,
        column: &str,
        op: &str,
        value: V,
    ) -> Result<&mut Self> {
        let op = validate_operator(op)?;
        let column = quote(column, self.dialect)?;
        self.push_where(conjunction, format!("{column} {op} ?"));
        self.where_bindings.push(value.into_value());
        Ok(self)
    }

    /// Adds an AND-joined comparison predicate; the binding is appended
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidIdentifier`].
    pub fn where_<V: IntoValue>(&mut self, column: &str, op: &str, value: V) -> Result<&mut Self> {
        self.where_fragment("AND", column, op, value)
    }

    /// Adds an OR-joined comparison predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidIdentifier`].
    pub fn or_where<V: IntoValue>(
        &mut self,
        column: &str,
        op: &str,
        value: V,
    ) -> Result<&mut Self> {
        self.where_fragment("OR", column, op, value)
    }

    fn in_fragment<V: IntoValue>(
        &mut self,
        conjunction: &str,
        column: &str,
        values: Vec<V>,
        negated: bool,
    ) -> Result<&mut Self> {
        let column = quote(column, self.dialect)?;
        // Empty lists compile to a constant predicate: IN () matches no
        // row, NOT IN () matches every row.
        if values.is_empty() {
            self.push_where(conjunction, String::from(if negated { "1 = 1" } else { "1 = 0" }));
            return Ok(self);
        }
        let placeholders = vec!["?"; values.len()].join(", ");
        let keyword = if negated { "NOT IN" } else { "IN" };
        self.push_where(conjunction, format!("{column} {keyword} ({placeholders})"));
        self.where_bindings
            .extend(values.into_iter().map(IntoValue::into_value));
        Ok(self)
    }

    /// Adds an AND-joined `IN` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn where_in<V: IntoValue>(&mut self, column: &str, values: Vec<V>) -> Result<&mut Self> {
        self.in_fragment("AND", column, values, false)
    }

    /// Adds an OR-joined `IN` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn or_where_in<V: IntoValue>(&mut self, column: &str, values: Vec<V>) -> Result<&mut Self> {
        self.in_fragment("OR", column, values, false)
    }

    /// Adds an AND-joined `NOT IN` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn where_not_in<V: IntoValue>(
        &mut self,
        column: &str,
        values: Vec<V>,
    ) -> Result<&mut Self> {
        self.in_fragment("AND", column, values, true)
    }

    /// Adds an OR-joined `NOT IN` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn or_where_not_in<V: IntoValue>(
        &mut self,
        column: &str,
        values: Vec<V>,
    ) -> Result<&mut Self> {
        self.in_fragment("OR", column, values, true)
    }

    fn null_fragment(&mut self, conjunction: &str, column: &str, negated: bool) -> Result<&mut Self> {
        let column = quote(column, self.dialect)?;
        let keyword = if negated { "IS NOT NULL" } else { "IS NULL" };
        self.push_where(conjunction, format!("{column} {keyword}"));
        Ok(self)
    }

    /// Adds an AND-joined `IS NULL` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn where_null(&mut self, column: &str) -> Result<&mut Self> {
        self.null_fragment("AND", column, false)
    }

    /// Adds an OR-joined `IS NULL` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn or_where_null(&mut self, column: &str) -> Result<&mut Self> {
        self.null_fragment("OR", column, false)
    }

    /// Adds an AND-joined `IS NOT NULL` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn where_not_null(&mut self, column: &str) -> Result<&mut Self> {
        self.null_fragment("AND", column, true)
    }

    /// Adds an OR-joined `IS NOT NULL` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn or_where_not_null(&mut self, column: &str) -> Result<&mut Self> {
        self.null_fragment("OR", column, true)
    }

    fn between_fragment<V: IntoValue>(
        &mut self,
        conjunction: &str,
        column: &str,
        low: V,
        high: V,
    ) -> Result<&mut Self> {
        let column = quote(column, self.dialect)?;
        self.push_where(conjunction, format!("{column} BETWEEN ? AND ?"));
        self.where_bindings.push(low.into_value());
        self.where_bindings.push(high.into_value());
        Ok(self)
    }

    /// Adds an AND-joined `BETWEEN` predicate; both bindings append in
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn where_between<V: IntoValue>(
        &mut self,
        column: &str,
        low: V,
        high: V,
    ) -> Result<&mut Self> {
        self.between_fragment("AND", column, low, high)
    }

    /// Adds an OR-joined `BETWEEN` predicate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn or_where_between<V: IntoValue>(
        &mut self,
        column: &str,
        low: V,
        high: V,
    ) -> Result<&mut Self> {
        self.between_fragment("OR", column, low, high)
    }

    fn group_fragment<F>(&mut self, conjunction: &str, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let mut nested = Self::new(self.dialect);
        f(&mut nested)?;
        if nested.wheres.is_empty() {
            return Ok(self);
        }
        let fragment = format!("({})", nested.wheres.join(" "));
        self.push_where(conjunction, fragment);
        self.where_bindings.append(&mut nested.where_bindings);
        Ok(self)
    }

    /// Adds an AND-joined parenthesized group built by `f` on a nested
    /// builder; the nested bindings merge immediately.
    ///
    /// # Errors
    ///
    /// Propagates any error `f` returns.
    pub fn where_group<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.group_fragment("AND", f)
    }

    /// Adds an OR-joined parenthesized group.
    ///
    /// # Errors
    ///
    /// Propagates any error `f` returns.
    pub fn or_where_group<F>(&mut self, f: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.group_fragment("OR", f)
    }

    /// Appends GROUP BY columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn group_by(&mut self, columns: &[&str]) -> Result<&mut Self> {
        for column in columns {
            let quoted = quote(column, self.dialect)?;
            self.groups.push(quoted);
        }
        Ok(self)
    }

    /// Adds an AND-joined HAVING predicate; its binding lands after all
    /// WHERE bindings, matching placeholder order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOperator`] or [`Error::InvalidIdentifier`].
    pub fn having<V: IntoValue>(&mut self, column: &str, op: &str, value: V) -> Result<&mut Self> {
        let op = validate_operator(op)?;
        let column = quote(column, self.dialect)?;
        let fragment = format!("{column} {op} ?");
        if self.havings.is_empty() {
            self.havings.push(fragment);
        } else {
            self.havings.push(format!("AND {fragment}"));
        }
        self.having_bindings.push(value.into_value());
        Ok(self)
    }

    /// Appends an ORDER BY entry. `direction` must be ASC or DESC.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDirection`] for any other direction and
    /// [`Error::InvalidIdentifier`] for a malformed column name.
    pub fn order(&mut self, column: &str, direction: &str) -> Result<&mut Self> {
        let direction = match direction.trim().to_ascii_uppercase().as_str() {
            "ASC" => "ASC",
            "DESC" => "DESC",
            _ => return Err(Error::InvalidDirection(direction.to_string())),
        };
        let column = quote(column, self.dialect)?;
        self.orders.push(format!("{column} {direction}"));
        Ok(self)
    }

    /// Caps the result set at `limit` rows.
    pub fn limit(&mut self, limit: u64) -> &mut Self {
        self.limit = Some(limit);
        self
    }

    /// Selects a 1-based result page; requires a prior [`QueryBuilder::limit`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::PageRequiresLimit`] when no limit is set.
    pub fn page(&mut self, page: u64) -> Result<&mut Self> {
        if self.limit.is_none() {
            return Err(Error::PageRequiresLimit);
        }
        self.page = Some(page.max(1));
        Ok(self)
    }

    /// Combined WHERE and HAVING bindings in placeholder order.
    pub(crate) fn bindings(&self) -> Vec<Value> {
        let mut bindings =
            Vec::with_capacity(self.where_bindings.len() + self.having_bindings.len());
        bindings.extend(self.where_bindings.iter().cloned());
        bindings.extend(self.having_bindings.iter().cloned());
        bindings
    }
}
