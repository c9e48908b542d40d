//! Per-dialect column type resolution.
//!
//! The entire type matrix lives here as one lookup: a [`ColumnKind`]
//! plus a [`Dialect`] resolves to the native type name, the effective
//! length, and any CHECK emulation the dialect needs for ENUM, SET or
//! unsigned columns.

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::quote::quote;
use crate::schema::column::{ColumnDef, ColumnKind, Length};

/// A resolved column type for one dialect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TypeSql {
    /// Native type name, including the value list for native ENUM/SET.
    pub sql: String,
    /// Effective length to render as `(len)`, already merged with the
    /// column's explicit length.
    pub length: Option<Length>,
    /// CHECK fragment emitted inline right after the type.
    pub inline_check: Option<String>,
    /// CHECK fragment emitted as a table-level constraint.
    pub table_check: Option<String>,
    /// PostgreSQL SET columns are TEXT[] and need array default syntax.
    pub pgsql_set: bool,
}

impl TypeSql {
    fn plain(sql: &str) -> Self {
        Self {
            sql: sql.to_string(),
            length: None,
            inline_check: None,
            table_check: None,
            pgsql_set: false,
        }
    }

    fn sized(sql: &str, length: Length) -> Self {
        Self {
            length: Some(length),
            ..Self::plain(sql)
        }
    }
}

/// Doubles single quotes and joins ENUM/SET values as `'a','b'`.
fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(",")
}

/// Resolves `column`'s type for `dialect`.
///
/// # Errors
///
/// Returns [`Error::MissingColumnType`] when no type was set and
/// [`Error::EmptyEnumValues`] for an ENUM/SET with no values.
pub(crate) fn type_sql(column: &ColumnDef, dialect: Dialect) -> Result<TypeSql> {
    let kind = column
        .kind
        .as_ref()
        .ok_or_else(|| Error::MissingColumnType(column.name.clone()))?;

    let mut resolved = resolve(kind, &column.name, dialect)?;

    // Explicit lengths win over the matrix default, but only where the
    // resolved type takes a length at all.
    if resolved.length.is_some() {
        if let Some(explicit) = column.length {
            resolved.length = Some(explicit);
        }
    }

    Ok(resolved)
}

#[allow(clippy::too_many_lines)]
fn resolve(kind: &ColumnKind, name: &str, dialect: Dialect) -> Result<TypeSql> {
    use Dialect::{Firebird, Mysql, Oci, Pgsql, Sqlite, Sqlsrv};

    Ok(match kind {
        ColumnKind::Int => match dialect {
            Mysql | Sqlsrv => TypeSql::plain("INT"),
            Pgsql | Sqlite | Firebird => TypeSql::plain("INTEGER"),
            Oci => TypeSql::plain("NUMBER"),
        },
        ColumnKind::TinyInt => match dialect {
            Mysql => TypeSql::plain("TINYINT"),
            Pgsql | Sqlsrv | Firebird => TypeSql::plain("SMALLINT"),
            Sqlite => TypeSql::plain("INTEGER"),
            Oci => TypeSql::plain("NUMBER"),
        },
        ColumnKind::SmallInt => match dialect {
            Mysql | Pgsql | Sqlsrv | Firebird => TypeSql::plain("SMALLINT"),
            Sqlite => TypeSql::plain("INTEGER"),
            Oci => TypeSql::plain("NUMBER"),
        },
        ColumnKind::MediumInt => match dialect {
            Mysql => TypeSql::plain("MEDIUMINT"),
            Pgsql | Sqlite => TypeSql::plain("INTEGER"),
            Sqlsrv => TypeSql::plain("INT"),
            Oci => TypeSql::plain("NUMBER"),
            Firebird => TypeSql::plain("BIGINT"),
        },
        ColumnKind::BigInt => match dialect {
            Mysql | Pgsql | Sqlsrv | Firebird => TypeSql::plain("BIGINT"),
            Sqlite => TypeSql::plain("INTEGER"),
            Oci => TypeSql::plain("NUMBER"),
        },
        ColumnKind::Char => TypeSql::sized("CHAR", Length::Fixed(255)),
        ColumnKind::Varchar => match dialect {
            Oci => TypeSql::sized("VARCHAR2", Length::Fixed(255)),
            _ => TypeSql::sized("VARCHAR", Length::Fixed(255)),
        },
        ColumnKind::Text => match dialect {
            Mysql | Pgsql | Sqlite => TypeSql::plain("TEXT"),
            Sqlsrv => TypeSql::sized("VARCHAR", Length::Max),
            Oci => TypeSql::plain("CLOB"),
            Firebird => TypeSql::plain("BLOB SUB_TYPE TEXT"),
        },
        ColumnKind::MediumText => match dialect {
            Mysql => TypeSql::plain("MEDIUMTEXT"),
            Pgsql | Sqlite => TypeSql::plain("TEXT"),
            Sqlsrv => TypeSql::sized("VARCHAR", Length::Max),
            Oci => TypeSql::plain("CLOB"),
            Firebird => TypeSql::plain("BLOB SUB_TYPE TEXT"),
        },
        ColumnKind::LongText => match dialect {
            Mysql => TypeSql::plain("LONGTEXT"),
            Pgsql | Sqlite => TypeSql::plain("TEXT"),
            Sqlsrv => TypeSql::sized("VARCHAR", Length::Max),
            Oci => TypeSql::plain("CLOB"),
            Firebird => TypeSql::plain("BLOB SUB_TYPE TEXT"),
        },
        ColumnKind::Decimal => match dialect {
            Sqlite => TypeSql::plain("NUMERIC"),
            Oci => TypeSql::sized("NUMBER", Length::Scale(8, 2)),
            _ => TypeSql::sized("DECIMAL", Length::Scale(8, 2)),
        },
        ColumnKind::Float => match dialect {
            Mysql | Firebird => TypeSql::plain("FLOAT"),
            Pgsql | Sqlite | Sqlsrv => TypeSql::plain("REAL"),
            Oci => TypeSql::plain("BINARY_FLOAT"),
        },
        ColumnKind::Double => match dialect {
            Mysql => TypeSql::plain("DOUBLE"),
            Pgsql | Firebird => TypeSql::plain("DOUBLE PRECISION"),
            Sqlite => TypeSql::plain("REAL"),
            Sqlsrv => TypeSql::plain("FLOAT"),
            Oci => TypeSql::plain("BINARY_DOUBLE"),
        },
        ColumnKind::Date => TypeSql::plain("DATE"),
        ColumnKind::DateTime => match dialect {
            Mysql | Sqlite => TypeSql::plain("DATETIME"),
            Pgsql | Oci | Firebird => TypeSql::plain("TIMESTAMP"),
            Sqlsrv => TypeSql::plain("DATETIME2"),
        },
        ColumnKind::Timestamp => match dialect {
            Sqlsrv => TypeSql::plain("DATETIME2"),
            _ => TypeSql::plain("TIMESTAMP"),
        },
        ColumnKind::Time => match dialect {
            Oci => TypeSql::plain("TIMESTAMP"),
            _ => TypeSql::plain("TIME"),
        },
        ColumnKind::Year => match dialect {
            Mysql => TypeSql::plain("YEAR"),
            Pgsql | Sqlsrv | Firebird => TypeSql::plain("SMALLINT"),
            Sqlite => TypeSql::plain("INTEGER"),
            Oci => TypeSql::plain("NUMBER"),
        },
        ColumnKind::Boolean => match dialect {
            Mysql | Pgsql | Firebird => TypeSql::plain("BOOLEAN"),
            Sqlite => TypeSql::plain("INTEGER"),
            Sqlsrv => TypeSql::plain("BIT"),
            Oci => TypeSql::sized("NUMBER", Length::Fixed(1)),
        },
        ColumnKind::Json => match dialect {
            Mysql => TypeSql::plain("JSON"),
            Pgsql => TypeSql::plain("JSONB"),
            Sqlite => TypeSql::plain("TEXT"),
            Sqlsrv => TypeSql::sized("NVARCHAR", Length::Max),
            Oci => TypeSql::plain("CLOB"),
            Firebird => TypeSql::plain("BLOB SUB_TYPE TEXT"),
        },
        ColumnKind::Blob | ColumnKind::LongBlob => match (kind, dialect) {
            (_, Pgsql) => TypeSql::plain("BYTEA"),
            (_, Sqlsrv) => TypeSql::sized("VARBINARY", Length::Max),
            (ColumnKind::LongBlob, Mysql) => TypeSql::plain("LONGBLOB"),
            _ => TypeSql::plain("BLOB"),
        },
        ColumnKind::Enum(values) => enum_sql(values, name, dialect)?,
        ColumnKind::Set(values) => set_sql(values, name, dialect)?,
        ColumnKind::Geometry
        | ColumnKind::Point
        | ColumnKind::LineString
        | ColumnKind::Polygon
        | ColumnKind::MultiPoint
        | ColumnKind::MultiLineString
        | ColumnKind::MultiPolygon => spatial_sql(kind, dialect),
    })
}

fn enum_sql(values: &[String], name: &str, dialect: Dialect) -> Result<TypeSql> {
    if values.is_empty() {
        return Err(Error::EmptyEnumValues(name.to_string()));
    }
    let list = quoted_list(values);
    let col = quote(name, dialect)?;

    Ok(match dialect {
        Dialect::Mysql => TypeSql::plain(&format!("ENUM({list})")),
        Dialect::Pgsql => TypeSql {
            inline_check: Some(format!("CONSTRAINT chk_{name} CHECK ({col} IN ({list}))")),
            ..TypeSql::plain("TEXT")
        },
        Dialect::Sqlite => TypeSql {
            inline_check: Some(format!("CHECK ({col} IN ({list}))")),
            ..TypeSql::plain("TEXT")
        },
        Dialect::Sqlsrv => TypeSql {
            table_check: Some(format!("CONSTRAINT chk_{name} CHECK ({col} IN ({list}))")),
            ..TypeSql::sized("NVARCHAR", Length::Max)
        },
        Dialect::Oci => TypeSql {
            table_check: Some(format!("CONSTRAINT chk_{name} CHECK ({col} IN ({list}))")),
            ..TypeSql::sized("VARCHAR2", Length::Fixed(255))
        },
        Dialect::Firebird => TypeSql {
            table_check: Some(format!("CHECK ({col} IN ({list}))")),
            ..TypeSql::sized("VARCHAR", Length::Fixed(255))
        },
    })
}

fn set_sql(values: &[String], name: &str, dialect: Dialect) -> Result<TypeSql> {
    if values.is_empty() {
        return Err(Error::EmptyEnumValues(name.to_string()));
    }
    let list = quoted_list(values);
    let col = quote(name, dialect)?;

    Ok(match dialect {
        Dialect::Mysql => TypeSql::plain(&format!("SET({list})")),
        Dialect::Pgsql => TypeSql {
            inline_check: Some(format!(
                "CONSTRAINT chk_{name} CHECK ({col} <@ ARRAY[{list}])"
            )),
            pgsql_set: true,
            ..TypeSql::plain("TEXT[]")
        },
        Dialect::Sqlite => {
            let alternatives = values
                .iter()
                .map(|v| format!("{col} = '{}'", v.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(" OR ");
            TypeSql {
                inline_check: Some(format!("CHECK ({alternatives})")),
                ..TypeSql::plain("TEXT")
            }
        }
        Dialect::Sqlsrv => {
            let alternatives = values
                .iter()
                .map(|v| format!("{col} LIKE '%{}%'", v.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(" OR ");
            TypeSql {
                table_check: Some(format!("CONSTRAINT chk_{name} CHECK ({alternatives})")),
                ..TypeSql::sized("NVARCHAR", Length::Max)
            }
        }
        Dialect::Oci => {
            let pattern = values
                .iter()
                .map(|v| v.replace('\'', "''"))
                .collect::<Vec<_>>()
                .join("|");
            TypeSql {
                table_check: Some(format!(
                    "CONSTRAINT chk_{name} CHECK (REGEXP_LIKE({col}, '({pattern})'))"
                )),
                ..TypeSql::sized("VARCHAR2", Length::Fixed(255))
            }
        }
        Dialect::Firebird => {
            let alternatives = values
                .iter()
                .map(|v| format!("{col} CONTAINING '{}'", v.replace('\'', "''")))
                .collect::<Vec<_>>()
                .join(" OR ");
            TypeSql {
                table_check: Some(format!("CHECK ({alternatives})")),
                ..TypeSql::sized("VARCHAR", Length::Fixed(255))
            }
        }
    })
}

fn spatial_sql(kind: &ColumnKind, dialect: Dialect) -> TypeSql {
    match dialect {
        Dialect::Mysql => TypeSql::plain(match kind {
            ColumnKind::Point => "POINT",
            ColumnKind::LineString => "LINESTRING",
            ColumnKind::Polygon => "POLYGON",
            ColumnKind::MultiPoint => "MULTIPOINT",
            ColumnKind::MultiLineString => "MULTILINESTRING",
            ColumnKind::MultiPolygon => "MULTIPOLYGON",
            _ => "GEOMETRY",
        }),
        Dialect::Pgsql | Dialect::Sqlsrv => TypeSql::plain("GEOMETRY"),
        Dialect::Sqlite | Dialect::Firebird => TypeSql::plain("BLOB"),
        Dialect::Oci => TypeSql::plain("SDO_GEOMETRY"),
    }
}
