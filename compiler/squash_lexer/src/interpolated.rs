//! Interpolated string scanning.
//!
//! `$"..."`, `$@"..."` and `@$"..."` literals can nest arbitrary expressions
//! (including other string literals) inside `{...}` holes, which no regular
//! expression can match. The raw lexer matches the opening prefix and hands
//! the remainder to [`scan_interpolated`].

/// Length of the literal body after its opening prefix, closing quote
/// included. `None` if the literal is unterminated.
pub(crate) fn scan_interpolated(rest: &str, verbatim: bool) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if verbatim && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => return Some(i + 1),
            b'\\' if !verbatim => i += 2,
            b'\n' | b'\r' if !verbatim => return None,
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'{' => i = scan_hole(rest, i + 1)?,
            _ => i += 1,
        }
    }
    None
}

/// Scan an interpolation hole starting just after its `{`. Returns the
/// index just past the matching `}`.
fn scan_hole(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'{' | b'(' | b'[' => {
                depth += 1;
                i += 1;
            }
            b'}' if depth == 0 => return Some(i + 1),
            b'}' | b')' | b']' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'"' => i += 1 + scan_quoted(&src[i + 1..], b'"')?,
            b'\'' => i += 1 + scan_quoted(&src[i + 1..], b'\'')?,
            b'$' | b'@' => match prefix(&src[i..]) {
                Some((len, nested_verbatim)) => {
                    i += len + scan_interpolated(&src[i + len..], nested_verbatim)?;
                }
                None if src[i..].starts_with("@\"") => {
                    i += 2 + scan_verbatim(&src[i + 2..])?;
                }
                None => i += 1,
            },
            _ => i += 1,
        }
    }
    None
}

/// Opening prefix of an interpolated literal: its length and whether it
/// is verbatim.
pub(crate) fn prefix(s: &str) -> Option<(usize, bool)> {
    if s.starts_with("$\"") {
        Some((2, false))
    } else if s.starts_with("$@\"") || s.starts_with("@$\"") {
        Some((3, true))
    } else {
        None
    }
}

/// Escaped single-line literal body up to its closing `quote`.
fn scan_quoted(rest: &str, quote: u8) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' | b'\r' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

fn scan_verbatim(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' if bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}
