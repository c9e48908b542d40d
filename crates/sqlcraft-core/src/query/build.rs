//! SELECT compilation and the execution-shaped statement compilers.

use crate::dialect::PaginationStyle;
use crate::error::{Error, Result};
use crate::query::QueryBuilder;
use crate::quote::quote;
use crate::value::{debug_sql, Value};

/// A compiled statement: SQL text plus its bindings in placeholder
/// order. This pair is what the execution layer hands to a driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    /// Parameterized SQL text.
    pub sql: String,
    /// Bound values, one per `?` placeholder.
    pub bindings: Vec<Value>,
}

impl Statement {
    /// Renders the statement with bindings substituted inline, for
    /// logging only. The result is never safe to execute.
    #[must_use]
    pub fn debug(&self) -> String {
        debug_sql(&self.sql, &self.bindings)
    }
}

impl QueryBuilder {
    fn projection(&self) -> String {
        if self.columns.is_empty() {
            String::from("*")
        } else {
            self.columns.join(", ")
        }
    }

    pub(crate) fn table_sql(&self) -> Result<&str> {
        self.table.as_deref().ok_or(Error::MissingTable)
    }

    fn select_sql(&self, projection: &str) -> Result<String> {
        let table = self.table_sql()?;

        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(projection);
        sql.push_str(" FROM ");
        sql.push_str(table);

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }
        if !self.wheres.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.wheres.join(" "));
        }
        if !self.groups.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.groups.join(", "));
        }
        if !self.havings.is_empty() {
            sql.push_str(" HAVING ");
            sql.push_str(&self.havings.join(" "));
        }
        if !self.orders.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.orders.join(", "));
        }

        self.paginate(sql)
    }

    /// Applies the dialect's pagination clause. The offset exists as
    /// soon as a page was set, even page 1 with offset zero.
    fn paginate(&self, mut sql: String) -> Result<String> {
        let Some(limit) = self.limit else {
            return Ok(sql);
        };
        // page() clamps to >= 1; saturate so pathological page/limit
        // combinations cannot overflow.
        let offset = self.page.map(|page| (page - 1).saturating_mul(limit));

        match self.dialect.pagination() {
            PaginationStyle::LimitOffset => {
                sql.push_str(&format!(" LIMIT {limit}"));
                if let Some(offset) = offset {
                    sql.push_str(&format!(" OFFSET {offset}"));
                }
            }
            PaginationStyle::Top => match offset {
                None => {
                    // TOP goes after DISTINCT: SELECT DISTINCT TOP n ...
                    if let Some(rest) = sql.strip_prefix("SELECT DISTINCT ") {
                        sql = format!("SELECT DISTINCT TOP {limit} {rest}");
                    } else if let Some(rest) = sql.strip_prefix("SELECT ") {
                        sql = format!("SELECT TOP {limit} {rest}");
                    }
                }
                Some(offset) => {
                    self.require_order()?;
                    sql.push_str(&format!(
                        " OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
                    ));
                }
            },
            PaginationStyle::OffsetFetch => match offset {
                None => sql.push_str(&format!(" FETCH FIRST {limit} ROWS ONLY")),
                Some(offset) => {
                    self.require_order()?;
                    sql.push_str(&format!(
                        " OFFSET {offset} ROWS FETCH NEXT {limit} ROWS ONLY"
                    ));
                }
            },
            PaginationStyle::RowsRange => {
                let start = offset.unwrap_or(0).saturating_add(1);
                let end = start.saturating_add(limit).saturating_sub(1);
                sql.push_str(&format!(" ROWS {start} TO {end}"));
            }
        }
        Ok(sql)
    }

    fn require_order(&self) -> Result<()> {
        if self.orders.is_empty() {
            Err(Error::PaginationRequiresOrder(self.dialect.name()))
        } else {
            Ok(())
        }
    }

    /// Compiles the accumulated state into SELECT text without mutating
    /// it; calling twice yields identical output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTable`] with no table set and
    /// [`Error::PaginationRequiresOrder`] for offset pagination without
    /// ORDER BY on SQL Server and Oracle.
    pub fn build(&self) -> Result<String> {
        self.select_sql(&self.projection())
    }

    fn finish(&mut self, sql: String) -> Statement {
        let statement = Statement {
            sql,
            bindings: self.bindings(),
        };
        tracing::debug!(dialect = %self.dialect, sql = %statement.sql, "compiled statement");
        self.reset();
        statement
    }

    /// Compiles a SELECT [`Statement`] and resets the builder.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`QueryBuilder::build`].
    pub fn get(&mut self) -> Result<Statement> {
        let sql = self.build()?;
        Ok(self.finish(sql))
    }

    /// Compiles a single-row SELECT: applies `limit(1)` and resets the
    /// builder. Requires at least one WHERE fragment, so a stray
    /// `first()` can never become a full-table scan of an arbitrary row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingWhereClause`] with no WHERE fragment,
    /// plus the [`QueryBuilder::build`] failure modes.
    pub fn first(&mut self) -> Result<Statement> {
        if self.wheres.is_empty() {
            return Err(Error::MissingWhereClause("first"));
        }
        self.limit = Some(1);
        self.page = None;
        let sql = self.build()?;
        Ok(self.finish(sql))
    }

    /// Compiles a COUNT of the current projection as `count` and resets
    /// the builder.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`QueryBuilder::build`].
    pub fn count(&mut self) -> Result<Statement> {
        let projection = format!("COUNT({}) AS count", self.projection());
        let sql = self.select_sql(&projection)?;
        Ok(self.finish(sql))
    }

    /// Compiles the same statement as [`QueryBuilder::count`]; the
    /// caller decides existence from the returned count.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`QueryBuilder::build`].
    pub fn exists(&mut self) -> Result<Statement> {
        self.count()
    }

    /// Compiles a single-column SELECT and resets the builder.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidIdentifier`] for a malformed column
    /// name, plus the [`QueryBuilder::build`] failure modes.
    pub fn pluck(&mut self, column: &str) -> Result<Statement> {
        let projection = quote(column, self.dialect)?;
        let sql = self.select_sql(&projection)?;
        Ok(self.finish(sql))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;

    fn builder(dialect: Dialect) -> QueryBuilder {
        let mut q = QueryBuilder::new(dialect);
        q.table("t").unwrap();
        q
    }

    #[test]
    fn test_build_default_projection() {
        let q = builder(Dialect::Mysql);
        assert_eq!(q.build().unwrap(), "SELECT * FROM `t`");
    }

    #[test]
    fn test_build_requires_table() {
        let q = QueryBuilder::new(Dialect::Mysql);
        assert!(matches!(q.build(), Err(Error::MissingTable)));
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut q = builder(Dialect::Pgsql);
        q.select(&["a", "b"]).unwrap();
        q.where_("a", ">", 5_i64).unwrap();
        q.order("a", "desc").unwrap();
        q.limit(3);
        let first = q.build().unwrap();
        let second = q.build().unwrap();
        assert_eq!(first, second);
        assert_eq!(q.bindings(), q.bindings());
    }

    #[test]
    fn test_placeholders_match_bindings() {
        let mut q = builder(Dialect::Mysql);
        q.where_("a", "=", 1_i64).unwrap();
        q.where_in("b", vec![2_i64, 3, 4]).unwrap();
        q.where_between("c", 5_i64, 6_i64).unwrap();
        q.having("n", ">", 7_i64).unwrap();
        q.group_by(&["n"]).unwrap();
        let statement = q.get().unwrap();
        assert_eq!(
            statement.sql.matches('?').count(),
            statement.bindings.len()
        );
        assert_eq!(statement.bindings.len(), 7);
    }

    #[test]
    fn test_full_select_clause_order() {
        let mut q = builder(Dialect::Mysql);
        q.select(&["t.a"]).unwrap();
        q.distinct();
        q.join("u", "t.id", "=", "u.t_id", "INNER").unwrap();
        q.where_("t.a", "!=", 0_i64).unwrap();
        q.group_by(&["t.a"]).unwrap();
        q.having("t.a", ">", 1_i64).unwrap();
        q.order("t.a", "ASC").unwrap();
        q.limit(10);
        assert_eq!(
            q.build().unwrap(),
            "SELECT DISTINCT `t`.`a` FROM `t` INNER JOIN `u` ON `t`.`id` = `u`.`t_id` \
             WHERE `t`.`a` != ? GROUP BY `t`.`a` HAVING `t`.`a` > ? ORDER BY `t`.`a` ASC LIMIT 10"
        );
    }

    #[test]
    fn test_limit_offset_pagination() {
        let mut q = builder(Dialect::Mysql);
        q.limit(10);
        q.page(3).unwrap();
        assert_eq!(q.build().unwrap(), "SELECT * FROM `t` LIMIT 10 OFFSET 20");
    }

    #[test]
    fn test_page_one_still_emits_offset_zero() {
        let mut q = builder(Dialect::Pgsql);
        q.limit(10);
        q.page(1).unwrap();
        assert_eq!(q.build().unwrap(), "SELECT * FROM \"t\" LIMIT 10 OFFSET 0");
    }

    #[test]
    fn test_sqlsrv_top_rewrite_without_page() {
        let mut q = builder(Dialect::Sqlsrv);
        q.limit(10);
        assert_eq!(q.build().unwrap(), "SELECT TOP 10 * FROM [t]");
    }

    #[test]
    fn test_sqlsrv_top_goes_after_distinct() {
        let mut q = builder(Dialect::Sqlsrv);
        q.select(&["region"]).unwrap();
        q.distinct();
        q.limit(10);
        assert_eq!(
            q.build().unwrap(),
            "SELECT DISTINCT TOP 10 [region] FROM [t]"
        );
    }

    #[test]
    fn test_pathological_page_and_limit_saturate() {
        let mut q = builder(Dialect::Mysql);
        q.limit(u64::MAX);
        q.page(u64::MAX).unwrap();
        let sql = q.build().unwrap();
        assert!(sql.contains(&format!("OFFSET {}", u64::MAX)));

        let mut q = builder(Dialect::Firebird);
        q.limit(u64::MAX);
        q.page(2).unwrap();
        assert!(q.build().unwrap().ends_with(&format!("TO {}", u64::MAX)));
    }

    #[test]
    fn test_sqlsrv_offset_requires_order() {
        let mut q = builder(Dialect::Sqlsrv);
        q.limit(10);
        q.page(2).unwrap();
        let err = q.build().unwrap_err();
        assert!(matches!(err, Error::PaginationRequiresOrder("sqlsrv")));

        q.order("id", "ASC").unwrap();
        assert_eq!(
            q.build().unwrap(),
            "SELECT * FROM [t] ORDER BY [id] ASC OFFSET 10 ROWS FETCH NEXT 10 ROWS ONLY"
        );
    }

    #[test]
    fn test_oci_fetch_first_without_page() {
        let mut q = builder(Dialect::Oci);
        q.limit(5);
        assert_eq!(q.build().unwrap(), "SELECT * FROM \"t\" FETCH FIRST 5 ROWS ONLY");
    }

    #[test]
    fn test_oci_offset_requires_order() {
        let mut q = builder(Dialect::Oci);
        q.limit(5);
        q.page(2).unwrap();
        assert!(matches!(
            q.build(),
            Err(Error::PaginationRequiresOrder("oci"))
        ));

        q.order("id", "DESC").unwrap();
        assert_eq!(
            q.build().unwrap(),
            "SELECT * FROM \"t\" ORDER BY \"id\" DESC OFFSET 5 ROWS FETCH NEXT 5 ROWS ONLY"
        );
    }

    #[test]
    fn test_firebird_rows_range() {
        let mut q = builder(Dialect::Firebird);
        q.limit(10);
        assert_eq!(q.build().unwrap(), "SELECT * FROM \"t\" ROWS 1 TO 10");

        q.page(2).unwrap();
        assert_eq!(q.build().unwrap(), "SELECT * FROM \"t\" ROWS 11 TO 20");
    }

    #[test]
    fn test_get_resets_but_keeps_table() {
        let mut q = builder(Dialect::Mysql);
        q.where_("a", "=", 1_i64).unwrap();
        q.get().unwrap();
        assert_eq!(q.build().unwrap(), "SELECT * FROM `t`");
    }

    #[test]
    fn test_first_requires_where() {
        let mut q = builder(Dialect::Mysql);
        let err = q.first().unwrap_err();
        assert!(matches!(err, Error::MissingWhereClause("first")));

        q.where_("id", "=", 1_i64).unwrap();
        let statement = q.first().unwrap();
        assert_eq!(statement.sql, "SELECT * FROM `t` WHERE `id` = ? LIMIT 1");
        assert_eq!(statement.bindings, vec![Value::Int(1)]);
    }

    #[test]
    fn test_count_wraps_projection() {
        let mut q = builder(Dialect::Mysql);
        let statement = q.count().unwrap();
        assert_eq!(statement.sql, "SELECT COUNT(*) AS count FROM `t`");

        q.select(&["id"]).unwrap();
        let statement = q.count().unwrap();
        assert_eq!(statement.sql, "SELECT COUNT(`id`) AS count FROM `t`");
    }

    #[test]
    fn test_exists_compiles_like_count() {
        let mut a = builder(Dialect::Pgsql);
        a.where_("x", "=", 1_i64).unwrap();
        let mut b = builder(Dialect::Pgsql);
        b.where_("x", "=", 1_i64).unwrap();
        assert_eq!(a.exists().unwrap(), b.count().unwrap());
    }

    #[test]
    fn test_pluck_single_column() {
        let mut q = builder(Dialect::Mysql);
        q.where_not_null("email").unwrap();
        let statement = q.pluck("email").unwrap();
        assert_eq!(
            statement.sql,
            "SELECT `email` FROM `t` WHERE `email` IS NOT NULL"
        );
    }

    #[test]
    fn test_statement_debug_substitution() {
        let statement = Statement {
            sql: String::from("SELECT * FROM t WHERE a = ? AND b = ?"),
            bindings: vec![Value::Int(3), Value::Text("x".into())],
        };
        assert_eq!(statement.debug(), "SELECT * FROM t WHERE a = 3 AND b = 'x'");
    }
}
