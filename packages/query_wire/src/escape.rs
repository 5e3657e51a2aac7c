//! The protocol escape table.
//!
//! Values inside commands, responses, and notifications never contain raw
//! spaces, pipes, or control characters; each travels as a two-character
//! backslash escape instead.

/// Escape a raw value for inclusion in a command line.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '/' => out.push_str(r"\/"),
            ' ' => out.push_str(r"\s"),
            '|' => out.push_str(r"\p"),
            '\x07' => out.push_str(r"\a"),
            '\x08' => out.push_str(r"\b"),
            '\x0c' => out.push_str(r"\f"),
            '\n' => out.push_str(r"\n"),
            '\r' => out.push_str(r"\r"),
            '\t' => out.push_str(r"\t"),
            '\x0b' => out.push_str(r"\v"),
            _ => out.push(c),
        }
    }
    out
}

/// Reverse [`escape`]. Escape pairs outside the table pass through
/// unchanged rather than failing the whole value.
pub fn unescape(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len());
    let mut chars = encoded.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('s') => out.push(' '),
            Some('p') => out.push('|'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\x0b'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_full_table() {
        assert_eq!(escape("a b"), r"a\sb");
        assert_eq!(escape("a|b"), r"a\pb");
        assert_eq!(escape("a/b"), r"a\/b");
        assert_eq!(escape("a\\b"), r"a\\b");
        assert_eq!(escape("a\nb\rc\td"), r"a\nb\rc\td");
        assert_eq!(escape("\x07\x08\x0b\x0c"), r"\a\b\v\f");
    }

    #[test]
    fn unescape_reverses_escape() {
        let raw = "name with spaces | and / \\ and\ttabs\n";
        assert_eq!(unescape(&escape(raw)), raw);
    }

    #[test]
    fn unknown_escape_pairs_pass_through() {
        assert_eq!(unescape(r"a\qb"), r"a\qb");
        assert_eq!(unescape(r"trailing\"), "trailing\\");
    }

    #[test]
    fn plain_text_is_untouched() {
        assert_eq!(escape("serveradmin"), "serveradmin");
        assert_eq!(unescape("serveradmin"), "serveradmin");
    }
}
