//! SQL values and parameter handling.
//!
//! Values bound to `?` placeholders are carried out-of-band in a
//! [`Value`] array; they are never interpolated into statement text
//! except by the explicitly non-executable [`debug_sql`] rendering.

/// A value supplied for a `?` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// NULL value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// Text value.
    Text(String),
    /// Binary blob value.
    Blob(Vec<u8>),
}

impl Value {
    /// Renders the value inline for human inspection.
    ///
    /// Numeric values stay unquoted, text is single-quoted with
    /// backslash escaping, blobs render as hex literals. This output is
    /// strictly for logging and must never be executed.
    #[must_use]
    pub fn to_debug_sql(&self) -> String {
        match self {
            Self::Null => String::from("NULL"),
            Self::Bool(b) => String::from(if *b { "1" } else { "0" }),
            Self::Int(n) => n.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Text(s) => format!("'{}'", escape_text(s)),
            Self::Blob(b) => {
                let hex: String = b.iter().map(|byte| format!("{byte:02X}")).collect();
                format!("X'{hex}'")
            }
        }
    }

    /// Renders the value as a DDL default literal.
    ///
    /// Unlike [`Value::to_debug_sql`] this path only ever receives
    /// schema-definition-time literals, so single quotes are doubled
    /// the SQL way rather than backslash-escaped.
    #[must_use]
    pub fn to_default_sql(&self) -> String {
        match self {
            Self::Text(s) => format!("'{}'", s.replace('\'', "''")),
            other => other.to_debug_sql(),
        }
    }
}

/// Backslash-escapes quotes, backslashes and NUL bytes in text.
fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            other => out.push(other),
        }
    }
    out
}

/// Substitutes bindings into `sql` in placeholder order for human
/// inspection or logging.
///
/// The result must never be the value actually executed against a
/// database; execution always takes the parameterized pair.
#[must_use]
pub fn debug_sql(sql: &str, bindings: &[Value]) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut values = bindings.iter();
    for c in sql.chars() {
        if c == '?' {
            match values.next() {
                Some(value) => out.push_str(&value.to_debug_sql()),
                None => out.push('?'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Trait for types convertible to a bound [`Value`].
pub trait IntoValue {
    /// Converts the value into a [`Value`].
    fn into_value(self) -> Value;
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Bool(self)
    }
}

impl IntoValue for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }
}

impl IntoValue for i32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for i16 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for u32 {
    fn into_value(self) -> Value {
        Value::Int(i64::from(self))
    }
}

impl IntoValue for f64 {
    fn into_value(self) -> Value {
        Value::Float(self)
    }
}

impl IntoValue for f32 {
    fn into_value(self) -> Value {
        Value::Float(f64::from(self))
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::Text(self)
    }
}

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::Text(String::from(self))
    }
}

impl IntoValue for Vec<u8> {
    fn into_value(self) -> Value {
        Value::Blob(self)
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        self.map_or(Value::Null, IntoValue::into_value)
    }
}
