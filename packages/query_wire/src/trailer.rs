//! Trailer-line parsing.
//!
//! Every response ends with exactly one trailer of the form
//! `error id=<digits> msg=<token>[ <extra...>]`. The parser is a plain
//! split over the literal markers; the grammar is fixed and well known, so
//! no pattern engine is involved.

use crate::escape::unescape;

/// The exact trailer the server sends for a successful command.
pub const SUCCESS_TRAILER: &str = "error id=0 msg=ok";

const TRAILER_PREFIX: &str = "error id=";
const MSG_MARKER: &str = " msg=";

/// A server-reported command failure, parsed from a trailer line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{msg} ({id})")]
pub struct QueryError {
    /// Numeric error identifier; 0 is the success sentinel.
    pub id: u32,
    /// Unescaped message token.
    pub msg: String,
    /// Any free text following the message token, e.g. `failed_permid=4`.
    pub extra: Option<String>,
}

/// Parse a line as a trailer. Returns `None` for anything that does not
/// match the trailer shape, in which case the line is response body.
pub fn parse_trailer(line: &str) -> Option<QueryError> {
    let rest = line.strip_prefix(TRAILER_PREFIX)?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return None;
    }
    let id: u32 = rest[..digits_end].parse().ok()?;

    let rest = rest[digits_end..].strip_prefix(MSG_MARKER)?;
    let (token, extra) = match rest.find(' ') {
        Some(idx) => (&rest[..idx], rest[idx..].trim()),
        None => (rest, ""),
    };
    if token.is_empty() {
        return None;
    }

    Some(QueryError {
        id,
        msg: unescape(token),
        extra: (!extra.is_empty()).then(|| extra.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_error_with_extra_text() {
        let err = parse_trailer("error id=42 msg=invalid_argument extra=foo").unwrap();
        assert_eq!(err.id, 42);
        assert_eq!(err.msg, "invalid_argument");
        assert_eq!(err.extra.as_deref(), Some("extra=foo"));
    }

    #[test]
    fn unescapes_message_token() {
        let err = parse_trailer(r"error id=2568 msg=insufficient\sclient\spermissions failed_permid=4")
            .unwrap();
        assert_eq!(err.id, 2568);
        assert_eq!(err.msg, "insufficient client permissions");
        assert_eq!(err.extra.as_deref(), Some("failed_permid=4"));
    }

    #[test]
    fn success_literal_parses_as_id_zero() {
        let err = parse_trailer(SUCCESS_TRAILER).unwrap();
        assert_eq!(err.id, 0);
        assert_eq!(err.msg, "ok");
        assert_eq!(err.extra, None);
    }

    #[test]
    fn rejects_non_trailer_lines() {
        assert_eq!(parse_trailer("clid=1 client_nickname=one"), None);
        assert_eq!(parse_trailer("error id=x msg=ok"), None);
        assert_eq!(parse_trailer("error id=5"), None);
        assert_eq!(parse_trailer("error id=5 msg="), None);
        assert_eq!(parse_trailer(" error id=5 msg=ok"), None);
    }

    #[test]
    fn displays_message_and_id() {
        let err = parse_trailer("error id=512 msg=command\\snot\\sfound").unwrap();
        assert_eq!(err.to_string(), "command not found (512)");
    }
}
