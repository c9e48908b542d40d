//! Identifier validation and quoting.
//!
//! This is the single SQL-injection choke point for every identifier
//! that reaches generated SQL: names are validated against a strict
//! grammar before any quoting happens, never sanitized after the fact.

use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::error::{Error, Result};

/// Identifier grammar: letters, digits, underscores, one optional dot
/// for `schema.table` / `table.column` qualification.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .expect("identifier grammar is a valid regex")
});

/// Validates `name` against the identifier grammar and quotes it for
/// the dialect, wrapping each dot segment independently.
///
/// MySQL/MariaDB use backticks, SQL Server uses brackets, all others
/// use ANSI double quotes. Any embedded closing-quote character inside
/// a segment is doubled, even though validation already excludes it.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] when `name` fails the grammar.
pub fn quote(name: &str, dialect: Dialect) -> Result<String> {
    if !IDENTIFIER.is_match(name) {
        return Err(Error::InvalidIdentifier(name.to_string()));
    }

    Ok(name
        .split('.')
        .map(|segment| wrap_segment(segment, dialect))
        .collect::<Vec<_>>()
        .join("."))
}

/// Wraps one dot-free segment in the dialect's quote pair.
fn wrap_segment(segment: &str, dialect: Dialect) -> String {
    let (open, close) = dialect.quote_pair();
    let escaped = segment.replace(close, &format!("{close}{close}"));
    format!("{open}{escaped}{close}")
}

/// Checks a name against the identifier grammar without quoting it.
///
/// # Errors
///
/// Returns [`Error::InvalidIdentifier`] when `name` fails the grammar.
pub fn validate(name: &str) -> Result<()> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unquote(quoted: &str, dialect: Dialect) -> String {
        let (open, close) = dialect.quote_pair();
        quoted
            .split('.')
            .map(|seg| {
                seg.trim_start_matches(open)
                    .trim_end_matches(close)
                    .replace(&format!("{close}{close}"), &close.to_string())
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    #[test]
    fn test_quote_per_dialect() {
        assert_eq!(quote("users", Dialect::Mysql).unwrap(), "`users`");
        assert_eq!(quote("users", Dialect::Sqlsrv).unwrap(), "[users]");
        assert_eq!(quote("users", Dialect::Pgsql).unwrap(), "\"users\"");
        assert_eq!(quote("users", Dialect::Sqlite).unwrap(), "\"users\"");
        assert_eq!(quote("users", Dialect::Oci).unwrap(), "\"users\"");
        assert_eq!(quote("users", Dialect::Firebird).unwrap(), "\"users\"");
    }

    #[test]
    fn test_quote_qualified_name() {
        assert_eq!(quote("users.id", Dialect::Mysql).unwrap(), "`users`.`id`");
        assert_eq!(quote("dbo.users", Dialect::Sqlsrv).unwrap(), "[dbo].[users]");
    }

    #[test]
    fn test_rejects_injection_shapes() {
        for bad in [
            "users; DROP TABLE users",
            "users`",
            "users\"",
            "users--",
            "us ers",
            "1users",
            "a.b.c",
            "",
            ".users",
            "users.",
        ] {
            let err = quote(bad, Dialect::Mysql).unwrap_err();
            assert!(matches!(err, Error::InvalidIdentifier(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_unquote_then_requote_round_trips() {
        for dialect in Dialect::ALL {
            for name in ["users", "users.id", "_private", "t2"] {
                let quoted = quote(name, dialect).unwrap();
                let unquoted = unquote(&quoted, dialect);
                assert_eq!(unquoted, name);
                assert_eq!(quote(&unquoted, dialect).unwrap(), quoted);
            }
        }
    }

    #[test]
    fn test_validate_matches_quote() {
        assert!(validate("order_items").is_ok());
        assert!(validate("order items").is_err());
    }
}
