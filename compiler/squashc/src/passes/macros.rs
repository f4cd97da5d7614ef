//! `$NAME$` placeholder substitution.
//!
//! Placeholders are replaced inside string literals of
//! [`RegionFlags::MACRO_EXPAND`] regions, escaped for the kind of literal
//! they land in. Unknown names are left alone.

use std::collections::BTreeMap;

use squash_ir::{RegionFlags, TokenKind};
use tracing::debug;

use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext, ProcessorDescriptor, Stage};

use super::RegionAnnotator;

pub struct MacroSubstitution {
    descriptor: ProcessorDescriptor,
}

impl MacroSubstitution {
    pub const NAME: &'static str = "macros";

    pub fn new() -> Self {
        MacroSubstitution {
            descriptor: ProcessorDescriptor::new(Self::NAME, Stage::Postprocess)
                .after(RegionAnnotator::NAME),
        }
    }
}

impl Default for MacroSubstitution {
    fn default() -> Self {
        MacroSubstitution::new()
    }
}

impl DocumentProcessor for MacroSubstitution {
    fn descriptor(&self) -> &ProcessorDescriptor {
        &self.descriptor
    }

    fn process(&self, document: Document, ctx: &ProcessContext<'_>) -> Result<Document, PackError> {
        let macros = &ctx.config.macros;
        if macros.is_empty() {
            return Ok(document);
        }
        document.map_tree(|mut tree| {
            let mut expanded = 0;
            for token in tree.tokens_mut() {
                if !token.region.contains(RegionFlags::MACRO_EXPAND) || !token.kind.is_string() {
                    continue;
                }
                let escape = escaper(token.kind, &token.text);
                if let Some(text) = expand_placeholders(&token.text, macros, escape) {
                    token.text = text.into();
                    expanded += 1;
                }
            }
            debug!(expanded, "substituted macros");
            Ok(tree)
        })
    }
}

/// Replace every `$NAME$` whose name is in `macros`, passing values
/// through `escape`. Returns `None` when nothing was replaced.
pub fn expand_placeholders(
    text: &str,
    macros: &BTreeMap<String, String>,
    escape: fn(&str) -> String,
) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    let mut replaced = false;
    while let Some(start) = rest.find('$') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..name_len];
        let closed = after[name_len..].starts_with('$');
        match macros.get(name) {
            Some(value) if closed && !name.is_empty() => {
                out.push_str(&escape(value));
                rest = &after[name_len + 1..];
                replaced = true;
            }
            _ => {
                out.push('$');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    replaced.then_some(out)
}

/// Escaping for a value placed inside a literal spelled `text`.
fn escaper(kind: TokenKind, text: &str) -> fn(&str) -> String {
    let verbatim = text.starts_with('@') || text.starts_with("$@");
    match (kind, verbatim) {
        (TokenKind::InterpolatedString, true) => |v| escape_braces(&v.replace('"', "\"\"")),
        (TokenKind::InterpolatedString, false) => |v| escape_braces(&escape_regular(v)),
        (_, true) => |v| v.replace('"', "\"\""),
        (_, false) => escape_regular,
    }
}

fn escape_regular(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

fn escape_braces(value: &str) -> String {
    value.replace('{', "{{").replace('}', "}}")
}
