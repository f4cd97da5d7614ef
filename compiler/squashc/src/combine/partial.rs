//! Merging split type declarations.

use std::mem;
use std::ops::Range;

use rustc_hash::FxHashMap;
use squash_ir::{Decl, DeclKind, Modifiers, Span, Token, TokenKind, Trivia};
use tracing::trace;

use super::flatten::{directive_carry, prepend};

/// Fold every `partial` type into the first declaration of the same kind
/// and name in `decls`, then do the same inside each type.
pub(crate) fn merge_partials(decls: &mut Vec<Decl>) -> usize {
    let mut merged = 0;
    let mut out: Vec<Decl> = Vec::with_capacity(decls.len());
    let mut first_of: FxHashMap<(DeclKind, String), usize> = FxHashMap::default();

    for decl in decls.drain(..) {
        if decl.kind.is_type() && decl.has(Modifiers::PARTIAL) {
            let key = (decl.kind, decl.name.clone());
            if let Some(&at) = first_of.get(&key) {
                trace!(name = %decl.name, "merging partial declaration");
                absorb(&mut out[at], decl);
                merged += 1;
                continue;
            }
            first_of.insert(key, out.len());
        }
        out.push(decl);
    }

    for decl in &mut out {
        if decl.kind.is_type() {
            merged += merge_partials(&mut decl.members);
        }
    }
    *decls = out;
    merged
}

/// Append `later`'s members to `first`. Base lists are unioned: a first
/// half without bases takes `later`'s header, otherwise the bases it is
/// missing are spliced onto the end of its own list.
fn absorb(first: &mut Decl, mut later: Decl) {
    if first.bases.is_empty() && !later.bases.is_empty() {
        mem::swap(&mut first.open, &mut later.open);
        first.bases = mem::take(&mut later.bases);
        first.name_token = later.name_token;
        first.modifiers = later.modifiers;
    } else if !later.bases.is_empty() {
        union_bases(first, &later);
    }

    let header_carry: Vec<_> = later.open.iter().flat_map(directive_carry).collect();
    let mut tail_carry: Vec<_> = later.close.iter().flat_map(directive_carry).collect();

    let mut members = mem::take(&mut later.members);
    match members.first_mut().and_then(Decl::first_token_mut) {
        Some(token) => prepend(token, header_carry),
        None => tail_carry.splice(0..0, header_carry).for_each(drop),
    }
    first.members.append(&mut members);
    if let Some(token) = first.close.first_mut() {
        prepend(token, tail_carry);
    }
    first.protected |= later.protected;
}

fn union_bases(first: &mut Decl, later: &Decl) {
    let (Some(ours), Some(theirs)) = (base_list(first), base_list(later)) else {
        return;
    };
    let listed: Vec<String> = split_bases(&first.open[ours.clone()])
        .map(spelling)
        .collect();

    let mut spliced: Vec<Token> = Vec::new();
    for base in split_bases(&later.open[theirs]) {
        if base.is_empty() || listed.contains(&spelling(base)) {
            continue;
        }
        let mut comma = Token::new(TokenKind::Comma, ",", Span::DUMMY);
        comma.trailing.push(Trivia::space());
        spliced.push(comma);
        let from = spliced.len();
        spliced.extend(base.iter().cloned());
        if let Some(token) = spliced.get_mut(from) {
            token.leading.clear();
        }
        if let Some(token) = spliced.last_mut() {
            token.trailing.clear();
        }
    }
    if spliced.is_empty() {
        return;
    }

    // The trivia between the old list and `where`/`{` moves to the new end.
    if let Some(last) = ours.end.checked_sub(1).filter(|&at| at >= ours.start) {
        let gap = mem::take(&mut first.open[last].trailing);
        if let Some(token) = spliced.last_mut() {
            token.trailing = gap;
        }
    }
    trace!(name = %first.name, tokens = spliced.len(), "extending base list");
    first.open.splice(ours.end..ours.end, spliced);
    for base in &later.bases {
        if !first.bases.contains(base) {
            first.bases.push(base.clone());
        }
    }
}

/// Tokens of the base list in a type header: after the `:` that follows
/// the name, up to the `where` clause or the body's `{`.
fn base_list(decl: &Decl) -> Option<Range<usize>> {
    let tokens = &decl.open;
    let mut at = decl.name_token? + 1;
    let mut depth = 0usize;
    let mut start = None;
    while let Some(token) = tokens.get(at) {
        match token.kind {
            TokenKind::Lt | TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::Gt | TokenKind::RParen | TokenKind::RBracket => {
                depth = depth.saturating_sub(1);
            }
            TokenKind::Colon if depth == 0 && start.is_none() => start = Some(at + 1),
            TokenKind::LBrace if depth == 0 => break,
            _ if depth == 0 && token.is_word("where") => break,
            _ => {}
        }
        at += 1;
    }
    start.map(|start| start..at)
}

/// Split a base list at its top-level commas.
fn split_bases(tokens: &[Token]) -> impl Iterator<Item = &[Token]> {
    let mut depth = 0usize;
    tokens.split(move |token| {
        match token.kind {
            TokenKind::Lt | TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::Gt | TokenKind::RParen | TokenKind::RBracket => {
                depth = depth.saturating_sub(1);
            }
            _ => {}
        }
        depth == 0 && token.kind == TokenKind::Comma
    })
}

fn spelling(tokens: &[Token]) -> String {
    tokens.iter().map(|token| &*token.text).collect()
}
