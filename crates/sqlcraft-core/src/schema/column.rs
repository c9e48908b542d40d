//! Column definitions for schema blueprints.
//!
//! A [`ColumnDef`] accumulates one column's compiled intent through
//! fluent calls; the DDL grammar evaluates the invariants against the
//! final state, not call order, so `unique().null()` still compiles to
//! NOT NULL.

use crate::value::{IntoValue, Value};

/// The closed set of base column types.
///
/// Per-dialect type names are resolved from these tags by a data table;
/// invalid kinds are a compile-time concern, never a runtime lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnKind {
    /// INT family.
    Int,
    /// TINYINT family.
    TinyInt,
    /// SMALLINT family.
    SmallInt,
    /// MEDIUMINT family.
    MediumInt,
    /// BIGINT family.
    BigInt,
    /// Fixed-length character string.
    Char,
    /// Variable-length character string.
    Varchar,
    /// Unbounded text.
    Text,
    /// Medium unbounded text.
    MediumText,
    /// Long unbounded text.
    LongText,
    /// Fixed-point decimal.
    Decimal,
    /// Single-precision float.
    Float,
    /// Double-precision float.
    Double,
    /// Calendar date.
    Date,
    /// Date and time of day.
    DateTime,
    /// Timestamp.
    Timestamp,
    /// Time of day.
    Time,
    /// Year.
    Year,
    /// Boolean.
    Boolean,
    /// JSON document.
    Json,
    /// Binary blob.
    Blob,
    /// Long binary blob.
    LongBlob,
    /// Enumeration over a fixed value list.
    Enum(Vec<String>),
    /// Set over a fixed value list.
    Set(Vec<String>),
    /// Spatial geometry.
    Geometry,
    /// Spatial point.
    Point,
    /// Spatial line string.
    LineString,
    /// Spatial polygon.
    Polygon,
    /// Spatial multi-point.
    MultiPoint,
    /// Spatial multi-line-string.
    MultiLineString,
    /// Spatial multi-polygon.
    MultiPolygon,
}

impl ColumnKind {
    /// Whether this is a spatial type; spatial columns never carry a
    /// static default.
    #[must_use]
    pub const fn is_spatial(&self) -> bool {
        matches!(
            self,
            Self::Geometry
                | Self::Point
                | Self::LineString
                | Self::Polygon
                | Self::MultiPoint
                | Self::MultiLineString
                | Self::MultiPolygon
        )
    }
}

/// A column length, precision/scale pair, or the dialect's unbounded
/// sentinel (`MAX` on SQL Server).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    /// A fixed character or digit count.
    Fixed(u32),
    /// The dialect's unbounded sentinel.
    Max,
    /// Precision and scale for decimal types.
    Scale(u16, u16),
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Max => f.write_str("MAX"),
            Self::Scale(p, s) => write!(f, "{p},{s}"),
        }
    }
}

/// Foreign key referential action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyAction {
    /// No action.
    NoAction,
    /// Restrict deletion/update.
    Restrict,
    /// Cascade the operation.
    Cascade,
    /// Set to NULL.
    SetNull,
    /// Set to default value.
    SetDefault,
}

impl ForeignKeyAction {
    /// Returns the SQL representation of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A reference to a column in another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// The referenced table name.
    pub table: String,
    /// The referenced column name.
    pub column: String,
    /// Action on delete.
    pub on_delete: Option<ForeignKeyAction>,
    /// Action on update.
    pub on_update: Option<ForeignKeyAction>,
}

/// One column's compiled intent inside a blueprint.
///
/// The default value is a tagged `Option`: `None` means "no default"
/// and is distinct from `Some(Value::Null)`, an explicit SQL NULL
/// default (which makes the column nullable as a side effect).
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub(crate) name: String,
    pub(crate) kind: Option<ColumnKind>,
    pub(crate) length: Option<Length>,
    pub(crate) nullable: bool,
    pub(crate) default: Option<Value>,
    pub(crate) unsigned: bool,
    pub(crate) auto: bool,
    pub(crate) primary: bool,
    pub(crate) unique: bool,
    pub(crate) index: bool,
    pub(crate) check: Option<String>,
    pub(crate) references: Option<ForeignKeyRef>,
}

impl ColumnDef {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            length: None,
            nullable: false,
            default: None,
            unsigned: false,
            auto: false,
            primary: false,
            unique: false,
            index: false,
            check: None,
            references: None,
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the column is a primary key (directly or via `auto`).
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.primary
    }

    // ---- integer types -----------------------------------------------

    /// INT column.
    pub fn int(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Int);
        self
    }

    /// TINYINT column.
    pub fn tinyint(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::TinyInt);
        self
    }

    /// SMALLINT column.
    pub fn smallint(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::SmallInt);
        self
    }

    /// MEDIUMINT column.
    pub fn mediumint(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::MediumInt);
        self
    }

    /// BIGINT column.
    pub fn bigint(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::BigInt);
        self
    }

    // ---- string types ------------------------------------------------

    /// CHAR column; length defaults to 255.
    pub fn char(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Char);
        self
    }

    /// VARCHAR column; length defaults to 255.
    pub fn varchar(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Varchar);
        self
    }

    /// TEXT column.
    pub fn text(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Text);
        self
    }

    /// MEDIUMTEXT column.
    pub fn mediumtext(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::MediumText);
        self
    }

    /// LONGTEXT column.
    pub fn longtext(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::LongText);
        self
    }

    // ---- numeric types -------------------------------------------------

    /// DECIMAL column with precision and scale; defaults to (8,2).
    pub fn decimal(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Decimal);
        self
    }

    /// FLOAT column.
    pub fn float(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Float);
        self
    }

    /// DOUBLE column.
    pub fn double(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Double);
        self
    }

    // ---- temporal types ------------------------------------------------

    /// DATE column.
    pub fn date(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Date);
        self
    }

    /// DATETIME column.
    pub fn datetime(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::DateTime);
        self
    }

    /// TIMESTAMP column.
    pub fn timestamp(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Timestamp);
        self
    }

    /// TIME column.
    pub fn time(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Time);
        self
    }

    /// YEAR column.
    pub fn year(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Year);
        self
    }

    // ---- boolean / json / binary ----------------------------------------

    /// BOOLEAN column (emulated where the dialect has no native type).
    pub fn boolean(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Boolean);
        self
    }

    /// JSON column (emulated where the dialect has no native type).
    pub fn json(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Json);
        self
    }

    /// BLOB column.
    pub fn blob(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Blob);
        self
    }

    /// LONGBLOB column.
    pub fn longblob(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::LongBlob);
        self
    }

    // ---- enum / set ------------------------------------------------------

    /// ENUM column over `values`; emulated with a CHECK constraint on
    /// dialects without a native ENUM type.
    pub fn enumeration(&mut self, values: &[&str]) -> &mut Self {
        self.kind = Some(ColumnKind::Enum(
            values.iter().map(|v| (*v).to_string()).collect(),
        ));
        self
    }

    /// SET column over `values`; emulated with a CHECK constraint on
    /// dialects without a native SET type.
    pub fn set(&mut self, values: &[&str]) -> &mut Self {
        self.kind = Some(ColumnKind::Set(
            values.iter().map(|v| (*v).to_string()).collect(),
        ));
        self
    }

    // ---- spatial types ---------------------------------------------------

    /// GEOMETRY column.
    pub fn geometry(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Geometry);
        self
    }

    /// POINT column.
    pub fn point(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Point);
        self
    }

    /// LINESTRING column.
    pub fn linestring(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::LineString);
        self
    }

    /// POLYGON column.
    pub fn polygon(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::Polygon);
        self
    }

    /// MULTIPOINT column.
    pub fn multipoint(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::MultiPoint);
        self
    }

    /// MULTILINESTRING column.
    pub fn multilinestring(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::MultiLineString);
        self
    }

    /// MULTIPOLYGON column.
    pub fn multipolygon(&mut self) -> &mut Self {
        self.kind = Some(ColumnKind::MultiPolygon);
        self
    }

    // ---- attributes --------------------------------------------------------

    /// Sets an explicit length.
    pub fn length(&mut self, length: u32) -> &mut Self {
        self.length = Some(Length::Fixed(length));
        self
    }

    /// Sets precision and scale for decimal columns.
    pub fn precision(&mut self, precision: u16, scale: u16) -> &mut Self {
        self.length = Some(Length::Scale(precision, scale));
        self
    }

    /// Marks the column nullable. Overridden at compile time when the
    /// column ends up primary, unique, or auto-increment.
    pub fn null(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    /// Marks the column auto-increment, which implies PRIMARY KEY,
    /// NOT NULL, and no static default.
    pub fn auto(&mut self) -> &mut Self {
        self.auto = true;
        self.primary = true;
        self.nullable = false;
        self.default = None;
        self
    }

    /// Sets a default value. Suppressed at compile time on auto-increment,
    /// unique, and spatial columns.
    pub fn default<V: IntoValue>(&mut self, value: V) -> &mut Self {
        self.default = Some(value.into_value());
        self
    }

    /// Sets an explicit SQL NULL default, which also makes the column
    /// nullable.
    pub fn default_null(&mut self) -> &mut Self {
        self.default = Some(Value::Null);
        self
    }

    /// Marks the integer column unsigned (a CHECK constraint on
    /// dialects without the keyword).
    pub fn unsigned(&mut self) -> &mut Self {
        self.unsigned = true;
        self
    }

    /// Marks the column PRIMARY KEY; implies NOT NULL and no default.
    pub fn primary(&mut self) -> &mut Self {
        self.primary = true;
        self.nullable = false;
        self.default = None;
        self
    }

    /// Marks the column UNIQUE, realized as a CREATE UNIQUE INDEX
    /// statement; implies NOT NULL and no default.
    pub fn unique(&mut self) -> &mut Self {
        self.unique = true;
        self.nullable = false;
        self.default = None;
        self
    }

    /// Requests a plain index on the column.
    pub fn index(&mut self) -> &mut Self {
        self.index = true;
        self
    }

    /// Adds a free-form CHECK expression.
    pub fn check(&mut self, expression: impl Into<String>) -> &mut Self {
        self.check = Some(expression.into());
        self
    }

    /// Adds a foreign key reference.
    pub fn references(&mut self, table: impl Into<String>, column: impl Into<String>) -> &mut Self {
        self.references = Some(ForeignKeyRef {
            table: table.into(),
            column: column.into(),
            on_delete: None,
            on_update: None,
        });
        self
    }

    /// Sets the ON DELETE action of the foreign key reference.
    pub fn on_delete(&mut self, action: ForeignKeyAction) -> &mut Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_delete = Some(action);
        }
        self
    }

    /// Sets the ON UPDATE action of the foreign key reference.
    pub fn on_update(&mut self, action: ForeignKeyAction) -> &mut Self {
        if let Some(fk) = self.references.as_mut() {
            fk.on_update = Some(action);
        }
        self
    }
}
