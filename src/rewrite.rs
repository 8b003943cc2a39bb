//! SQL text rewriting for named-placeholder drivers.
//!
//! The generated code binds parameters by name (`:p1`), so a colon in the
//! original text would be read as a placeholder. Every literal `:` is
//! escaped as `\\:`, and for engines with positional placeholders each
//! `$N` becomes `:pN`.
//!
//! ```text
//! SELECT * FROM t WHERE a = $1 AND b::text = $2
//! SELECT * FROM t WHERE a = :p1 AND b\\:\\:text = :p2
//! ```

use nom::{
    IResult,
    character::complete::{char, digit1, satisfy},
    combinator::{not, peek},
    sequence::{preceded, terminated},
};

use crate::dialect::Dialect;

/// Escape sequence written in place of a literal colon.
pub const COLON_ESCAPE: &str = "\\\\:";

/// Rewrite `sql` for the target placeholder convention.
pub fn rewrite_sql(sql: &str, dialect: Dialect) -> String {
    let positional = dialect.positional_placeholders();
    let mut out = String::with_capacity(sql.len() + 8);
    let mut prev: Option<char> = None;
    let mut rest = sql;

    while let Some(c) = rest.chars().next() {
        if c == ':' {
            out.push_str(COLON_ESCAPE);
        } else if c == '$' && positional && !prev.is_some_and(is_word_char) {
            if let Ok((remaining, number)) = placeholder(rest) {
                out.push_str(":p");
                out.push_str(number);
                prev = number.chars().last();
                rest = remaining;
                continue;
            }
            out.push(c);
        } else {
            out.push(c);
        }
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }

    out
}

/// Parse `$N` not followed by another word character, yielding `N`.
fn placeholder(input: &str) -> IResult<&str, &str> {
    terminated(
        preceded(char('$'), digit1),
        peek(not(satisfy(is_word_char))),
    )(input)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_positional_to_named() {
        let sql = "SELECT * FROM bar WHERE id = $1 AND name = $2";
        assert_eq!(
            rewrite_sql(sql, Dialect::Postgres),
            "SELECT * FROM bar WHERE id = :p1 AND name = :p2"
        );
    }

    #[test]
    fn test_colons_escaped_once() {
        let sql = "SELECT id::text FROM t WHERE a = $1";
        assert_eq!(
            rewrite_sql(sql, Dialect::Postgres),
            "SELECT id\\\\:\\\\:text FROM t WHERE a = :p1"
        );
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(rewrite_sql("a$1", Dialect::Postgres), "a$1");
        assert_eq!(rewrite_sql("$1a", Dialect::Postgres), "$1a");
        assert_eq!(rewrite_sql("($12)", Dialect::Postgres), "(:p12)");
        assert_eq!(rewrite_sql("$1,$2", Dialect::Postgres), ":p1,:p2");
        assert_eq!(rewrite_sql("$", Dialect::Postgres), "$");
        assert_eq!(rewrite_sql("$$", Dialect::Postgres), "$$");
    }

    #[test]
    fn test_other_dialects_keep_placeholders() {
        let sql = "SELECT * FROM t WHERE a = ? AND b = '$1' AND c = ':x'";
        assert_eq!(
            rewrite_sql(sql, Dialect::Sqlite),
            "SELECT * FROM t WHERE a = ? AND b = '$1' AND c = '\\\\:x'"
        );
        assert_eq!(rewrite_sql("$1", Dialect::MySQL), "$1");
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(
            rewrite_sql("SELECT 'héllo' WHERE x = $1", Dialect::Postgres),
            "SELECT 'héllo' WHERE x = :p1"
        );
    }
}
