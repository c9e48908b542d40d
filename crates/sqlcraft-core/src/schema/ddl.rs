//! DDL compilation: column assembly, CREATE TABLE / ALTER TABLE ADD,
//! and the table-level maintenance statements.
//!
//! Column clauses are assembled in one fixed order across dialects:
//! name, type, unsigned slot, DEFAULT, NULL/NOT NULL, auto-increment
//! keyword, PRIMARY KEY, CHECK. Invariants are evaluated against the
//! column's final state, never against call order.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::quote::quote;
use crate::schema::column::{ColumnDef, ColumnKind, ForeignKeyRef};
use crate::schema::types::type_sql;
use crate::schema::Blueprint;
use crate::value::Value;

/// One compiled column plus the table-level fragments it contributes.
#[derive(Debug)]
pub(crate) struct CompiledColumn {
    pub sql: String,
    pub table_check: Option<String>,
    pub foreign_key: Option<String>,
    pub unique: bool,
    pub index: bool,
}

/// Compiles one column clause for `dialect`.
pub(crate) fn column_sql(column: &ColumnDef, dialect: Dialect) -> Result<CompiledColumn> {
    let resolved = type_sql(column, dialect)?;
    let quoted = quote(&column.name, dialect)?;

    let mut parts: Vec<String> = Vec::with_capacity(8);
    parts.push(quoted.clone());
    parts.push(match resolved.length {
        Some(length) => format!("{}({length})", resolved.sql),
        None => resolved.sql.clone(),
    });
    if let Some(check) = resolved.inline_check {
        parts.push(check);
    }

    if column.unsigned {
        if dialect == Dialect::Mysql {
            parts.push(String::from("UNSIGNED"));
        } else {
            parts.push(format!("CHECK ({quoted} >= 0)"));
        }
    }

    // Primary, unique and auto-increment columns never carry a static
    // default, nor do spatial columns. An explicit NULL default makes
    // the column nullable without emitting a DEFAULT clause.
    let kind_is_spatial = column.kind.as_ref().is_some_and(ColumnKind::is_spatial);
    let default_allowed = !column.auto && !column.unique && !column.primary && !kind_is_spatial;
    let mut nullable = column.nullable;
    if default_allowed {
        match &column.default {
            Some(Value::Null) => nullable = true,
            Some(default) => {
                if matches!(column.kind, Some(ColumnKind::Boolean))
                    && !matches!(default, Value::Bool(_))
                {
                    return Err(Error::InvalidDefault {
                        column: column.name.clone(),
                        reason: String::from("boolean columns take a boolean default"),
                    });
                }
                parts.push(format!(
                    "DEFAULT {}",
                    default_literal(default, resolved.pgsql_set, &column.name, dialect)?
                ));
            }
            None => {}
        }
    }

    // PRIMARY KEY, UNIQUE and auto-increment all force NOT NULL at the
    // final state, whatever order the calls arrived in.
    if column.primary || column.unique || column.auto {
        nullable = false;
    }
    parts.push(String::from(if nullable { "NULL" } else { "NOT NULL" }));

    if column.auto {
        let keyword = dialect.auto_increment_keyword();
        if !keyword.is_empty() {
            parts.push(String::from(keyword));
        }
    }
    if column.primary {
        parts.push(String::from("PRIMARY KEY"));
    }
    if let Some(expression) = &column.check {
        parts.push(format!("CHECK ({expression})"));
    }

    let foreign_key = column
        .references
        .as_ref()
        .map(|fk| foreign_key_sql(&column.name, fk, dialect))
        .transpose()?;

    Ok(CompiledColumn {
        sql: parts.join(" "),
        table_check: resolved.table_check,
        foreign_key,
        unique: column.unique,
        index: column.index,
    })
}

fn default_literal(
    value: &Value,
    pgsql_set: bool,
    column: &str,
    dialect: Dialect,
) -> Result<String> {
    if pgsql_set {
        // TEXT[] columns take an array literal; only text defaults make
        // sense there.
        return match value {
            Value::Text(s) => Ok(format!("ARRAY['{}']", s.replace('\'', "''"))),
            other => Err(Error::InvalidDefault {
                column: column.to_string(),
                reason: format!("SET columns take a text default, got {other:?}"),
            }),
        };
    }
    match value {
        Value::Bool(b) => Ok(String::from(dialect.boolean_literal(*b))),
        Value::Blob(_) => Err(Error::InvalidDefault {
            column: column.to_string(),
            reason: String::from("binary defaults are not representable"),
        }),
        other => Ok(other.to_default_sql()),
    }
}

fn foreign_key_sql(column: &str, fk: &ForeignKeyRef, dialect: Dialect) -> Result<String> {
    let col = quote(column, dialect)?;
    let table = quote(&fk.table, dialect)?;
    let target = quote(&fk.column, dialect)?;
    let mut sql = format!("CONSTRAINT fk_{column} FOREIGN KEY ({col}) REFERENCES {table} ({target})");
    if let Some(action) = fk.on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_sql());
    }
    if let Some(action) = fk.on_update {
        sql.push_str(" ON UPDATE ");
        sql.push_str(action.as_sql());
    }
    Ok(sql)
}

fn index_statement(table: &str, column: &str, unique: bool, dialect: Dialect) -> Result<String> {
    let qualified_table = quote(table, dialect)?;
    let qualified_column = quote(column, dialect)?;
    let prefix = if unique { "uindex" } else { "index" };
    let name = quote(&format!("{prefix}_{column}"), dialect)?;
    let keyword = if unique { "CREATE UNIQUE INDEX" } else { "CREATE INDEX" };
    let if_not_exists = if dialect.supports_index_if_not_exists() {
        "IF NOT EXISTS "
    } else {
        ""
    };
    Ok(format!(
        "{keyword} {if_not_exists}{name} ON {qualified_table} ({qualified_column});"
    ))
}

/// Checks the one-primary-key-per-table invariant at the final state.
fn check_single_primary(blueprint: &Blueprint) -> Result<()> {
    let mut seen = false;
    for column in &blueprint.columns {
        if column.is_primary() {
            if seen {
                return Err(Error::DuplicatePrimaryKey {
                    table: blueprint.table.clone(),
                    column: column.name().to_string(),
                });
            }
            seen = true;
        }
    }
    Ok(())
}

/// Compiles a full CREATE TABLE batch: the table statement followed by
/// index statements in column-declaration order.
pub(crate) fn compile_create(blueprint: &Blueprint) -> Result<Vec<String>> {
    if blueprint.columns.is_empty() {
        return Err(Error::EmptyTable(blueprint.table.clone()));
    }
    check_single_primary(blueprint)?;

    let dialect = blueprint.dialect;
    let table = quote(&blueprint.table, dialect)?;

    let mut body: Vec<String> = Vec::with_capacity(blueprint.columns.len());
    let mut constraints: Vec<String> = Vec::new();
    let mut indexes: Vec<String> = Vec::new();

    for column in &blueprint.columns {
        let compiled = column_sql(column, dialect)?;
        body.push(compiled.sql);
        if let Some(check) = compiled.table_check {
            constraints.push(check);
        }
        if let Some(fk) = compiled.foreign_key {
            constraints.push(fk);
        }
        if compiled.unique {
            indexes.push(index_statement(&blueprint.table, column.name(), true, dialect)?);
        }
        if compiled.index {
            indexes.push(index_statement(&blueprint.table, column.name(), false, dialect)?);
        }
    }
    body.extend(constraints);

    let mut create = format!("CREATE TABLE IF NOT EXISTS {table} ({})", body.join(", "));
    if dialect == Dialect::Mysql {
        if let Some(engine) = &blueprint.engine {
            create.push_str(&format!(" ENGINE={engine}"));
        }
        if let Some(charset) = &blueprint.charset {
            create.push_str(&format!(" DEFAULT CHARSET={charset}"));
        }
        if let Some(collation) = &blueprint.collation {
            create.push_str(&format!(" COLLATE={collation}"));
        }
    }
    create.push(';');

    let mut statements = Vec::with_capacity(1 + indexes.len());
    statements.push(create);
    statements.extend(indexes);
    tracing::debug!(
        table = %blueprint.table,
        dialect = %dialect,
        statements = statements.len(),
        "compiled create table"
    );
    Ok(statements)
}

/// Compiles an ALTER TABLE ADD batch, one statement per column so the
/// output also works on SQLite.
pub(crate) fn compile_add_columns(blueprint: &Blueprint) -> Result<Vec<String>> {
    if blueprint.columns.is_empty() {
        return Err(Error::EmptyTable(blueprint.table.clone()));
    }

    let dialect = blueprint.dialect;
    let table = quote(&blueprint.table, dialect)?;

    let mut statements: Vec<String> = Vec::new();
    let mut tail: Vec<String> = Vec::new();

    for column in &blueprint.columns {
        let compiled = column_sql(column, dialect)?;
        statements.push(format!("ALTER TABLE {table} ADD {};", compiled.sql));
        if let Some(check) = compiled.table_check {
            tail.push(format!("ALTER TABLE {table} ADD {check};"));
        }
        if let Some(fk) = compiled.foreign_key {
            tail.push(format!("ALTER TABLE {table} ADD {fk};"));
        }
        if compiled.unique {
            tail.push(index_statement(&blueprint.table, column.name(), true, dialect)?);
        }
        if compiled.index {
            tail.push(index_statement(&blueprint.table, column.name(), false, dialect)?);
        }
    }
    statements.extend(tail);
    tracing::debug!(
        table = %blueprint.table,
        dialect = %dialect,
        statements = statements.len(),
        "compiled add columns"
    );
    Ok(statements)
}

/// Compiles a DROP TABLE statement with the dialect's existence guard.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] for a malformed table name.
pub fn drop_table(table: &str, dialect: Dialect) -> Result<String> {
    let quoted = quote(table, dialect)?;
    Ok(match dialect {
        Dialect::Mysql | Dialect::Pgsql | Dialect::Sqlite => {
            format!("DROP TABLE IF EXISTS {quoted};")
        }
        Dialect::Sqlsrv => format!("IF OBJECT_ID('{table}', 'U') IS NOT NULL DROP TABLE {quoted};"),
        Dialect::Oci | Dialect::Firebird => format!("DROP TABLE {quoted};"),
    })
}

/// Compiles a table rename.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOperation`] on Firebird, which has no
/// table rename, and [`Error::InvalidIdentifier`] for malformed names.
pub fn rename_table(from: &str, to: &str, dialect: Dialect) -> Result<String> {
    let quoted_from = quote(from, dialect)?;
    let quoted_to = quote(to, dialect)?;
    match dialect {
        Dialect::Mysql => Ok(format!("RENAME TABLE {quoted_from} TO {quoted_to};")),
        Dialect::Pgsql | Dialect::Sqlite => {
            Ok(format!("ALTER TABLE {quoted_from} RENAME TO {quoted_to};"))
        }
        Dialect::Sqlsrv => Ok(format!("EXEC sp_rename '{from}', '{to}';")),
        Dialect::Oci => Ok(format!("RENAME {quoted_from} TO {quoted_to};")),
        Dialect::Firebird => Err(Error::UnsupportedOperation {
            operation: "rename_table",
            driver: Dialect::Firebird.name(),
        }),
    }
}

/// Compiles a truncate, degrading to DELETE FROM where the dialect has
/// no TRUNCATE.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] for a malformed table name.
pub fn truncate_table(table: &str, dialect: Dialect) -> Result<String> {
    let quoted = quote(table, dialect)?;
    Ok(match dialect {
        Dialect::Sqlite | Dialect::Firebird => format!("DELETE FROM {quoted};"),
        _ => format!("TRUNCATE TABLE {quoted};"),
    })
}

/// Compiles the dialect's column-listing command for a table.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] for a malformed table name.
pub fn describe_table(table: &str, dialect: Dialect) -> Result<String> {
    let quoted = quote(table, dialect)?;
    Ok(match dialect {
        Dialect::Mysql | Dialect::Oci => format!("DESCRIBE {quoted};"),
        Dialect::Pgsql => format!("\\d {table}"),
        Dialect::Sqlite => format!("PRAGMA table_info({quoted});"),
        Dialect::Sqlsrv => format!("EXEC sp_columns {table};"),
        Dialect::Firebird => format!("SHOW TABLE {table};"),
    })
}
