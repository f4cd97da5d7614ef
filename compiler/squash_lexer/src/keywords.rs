//! Reserved keyword lookup.
//!
//! Only reserved words lex as [`TokenKind::Keyword`]. Contextual keywords
//! (`var`, `partial`, `where`, `get`, `nameof`, ...) stay identifiers; the
//! outline parser recognizes them by text where it cares.
//!
//! The lookup buckets by length first: every reserved word is 2-10 ASCII
//! lowercase characters.
//!
//! [`TokenKind::Keyword`]: squash_ir::TokenKind::Keyword

/// Check whether `text` is a reserved keyword.
#[inline]
pub(crate) fn is_reserved(text: &str) -> bool {
    let bytes = text.as_bytes();
    if !(2..=10).contains(&bytes.len()) || !bytes[0].is_ascii_lowercase() {
        return false;
    }
    match bytes.len() {
        2 => matches!(text, "as" | "do" | "if" | "in" | "is"),
        3 => matches!(
            text,
            "for" | "int" | "new" | "out" | "ref" | "try"
        ),
        4 => matches!(
            text,
            "base"
                | "bool"
                | "byte"
                | "case"
                | "char"
                | "else"
                | "enum"
                | "goto"
                | "lock"
                | "long"
                | "null"
                | "this"
                | "true"
                | "uint"
                | "void"
        ),
        5 => matches!(
            text,
            "break"
                | "catch"
                | "class"
                | "const"
                | "event"
                | "false"
                | "fixed"
                | "float"
                | "sbyte"
                | "short"
                | "throw"
                | "ulong"
                | "using"
                | "while"
        ),
        6 => matches!(
            text,
            "double"
                | "extern"
                | "object"
                | "params"
                | "public"
                | "return"
                | "sealed"
                | "sizeof"
                | "static"
                | "string"
                | "struct"
                | "switch"
                | "typeof"
                | "unsafe"
                | "ushort"
        ),
        7 => matches!(
            text,
            "checked" | "decimal" | "default" | "finally" | "foreach" | "private" | "virtual"
        ),
        8 => matches!(
            text,
            "abstract"
                | "continue"
                | "delegate"
                | "explicit"
                | "implicit"
                | "internal"
                | "operator"
                | "override"
                | "readonly"
                | "volatile"
        ),
        9 => matches!(text, "interface" | "namespace" | "protected" | "unchecked"),
        10 => matches!(text, "stackalloc"),
        _ => false,
    }
}
