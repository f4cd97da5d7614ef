//! Concatenating trees without their namespaces.

use std::mem;

use rustc_hash::FxHashSet;
use squash_ir::{Decl, DeclKind, SyntaxTree, Token, Trivia, TriviaKind, UsingDirective};
use tracing::trace;

/// Accumulates documents into one namespace-free tree.
///
/// Directive lines attached to tokens that are dropped here (namespace
/// headers and braces, duplicate usings, end of file) are carried to the
/// next kept token so `#if` blocks stay balanced.
#[derive(Default)]
pub(crate) struct Merger {
    usings: Vec<UsingDirective>,
    seen: FxHashSet<String>,
    items: Vec<Decl>,
    carry: Vec<Trivia>,
}

impl Merger {
    pub(crate) fn add(&mut self, tree: SyntaxTree) {
        let SyntaxTree { usings, items, eof } = tree;
        self.add_usings(usings);
        self.add_items(items);
        self.carry_from(&eof);
    }

    pub(crate) fn finish(self) -> SyntaxTree {
        let mut eof = Token::eof(0);
        prepend(&mut eof, self.carry);
        SyntaxTree::new(self.usings, self.items, eof)
    }

    fn add_usings(&mut self, usings: Vec<UsingDirective>) {
        for mut using in usings {
            if self.seen.insert(using.target.clone()) {
                if let Some(first) = using.tokens.first_mut() {
                    prepend(first, mem::take(&mut self.carry));
                }
                self.usings.push(using);
            } else {
                trace!(target = %using.target, "dropping duplicate using");
                for token in &using.tokens {
                    self.carry_from(token);
                }
            }
        }
    }

    fn add_items(&mut self, items: Vec<Decl>) {
        for item in items {
            if item.kind == DeclKind::Namespace {
                self.unwrap(item);
            } else {
                self.push_item(item);
            }
        }
    }

    fn unwrap(&mut self, mut namespace: Decl) {
        trace!(name = %namespace.name, "unwrapping namespace");
        for token in &namespace.open {
            self.carry_from(token);
        }

        let mut members = mem::take(&mut namespace.members);
        let mut usings = mem::take(&mut namespace.usings);
        let outer = namespace.first_token().map_or("", indentation);
        let inner = members
            .first()
            .and_then(Decl::first_token)
            .or_else(|| usings.first().and_then(|u| u.tokens.first()))
            .map_or("", indentation);
        let unit = inner.strip_prefix(outer).unwrap_or("").to_owned();
        if !unit.is_empty() {
            for using in &mut usings {
                dedent(using.tokens.iter_mut(), &unit);
            }
            for member in &mut members {
                dedent(member.tokens_mut(), &unit);
            }
        }

        self.add_usings(usings);
        self.add_items(members);
        for token in &namespace.close {
            self.carry_from(token);
        }
    }

    fn push_item(&mut self, mut item: Decl) {
        if let Some(first) = item.first_token_mut() {
            prepend(first, mem::take(&mut self.carry));
        }
        self.items.push(item);
    }

    fn carry_from(&mut self, token: &Token) {
        self.carry.extend(directive_carry(token));
    }
}

/// Directive lines of a token that is about to be dropped, each wrapped in
/// newlines so it lands on a line of its own.
pub(crate) fn directive_carry(token: &Token) -> Vec<Trivia> {
    token
        .trivia()
        .filter(|p| p.kind == TriviaKind::Directive)
        .flat_map(|p| [Trivia::newline(), p.clone(), Trivia::newline()])
        .collect()
}

/// Put `carry` in front of `token`'s leading trivia.
pub(crate) fn prepend(token: &mut Token, carry: Vec<Trivia>) {
    if carry.is_empty() {
        return;
    }
    let mut leading: Vec<Trivia> = carry;
    leading.extend(token.leading.drain(..));
    token.leading = leading.into_iter().collect();
}

/// Whitespace in front of `token` on its own line, or `""` when the token
/// does not start a line.
fn indentation(token: &Token) -> &str {
    let pieces = &token.leading;
    match pieces.last() {
        Some(last) if last.kind == TriviaKind::Whitespace => {
            let starts_line = pieces.len() == 1
                || pieces
                    .get(pieces.len() - 2)
                    .is_some_and(|p| p.kind == TriviaKind::Newline);
            if starts_line {
                &last.text[..]
            } else {
                ""
            }
        }
        _ => "",
    }
}

/// Strip one `unit` of indentation from every line start in `tokens`.
fn dedent<'a>(tokens: impl IntoIterator<Item = &'a mut Token>, unit: &str) {
    let mut line_start = true;
    for token in tokens {
        for piece in token.leading.iter_mut() {
            line_start = dedent_piece(piece, unit, line_start);
        }
        if !token.text.is_empty() {
            line_start = false;
        }
        for piece in token.trailing.iter_mut() {
            line_start = dedent_piece(piece, unit, line_start);
        }
        token.leading.retain(|p| !p.text.is_empty());
        token.trailing.retain(|p| !p.text.is_empty());
    }
}

fn dedent_piece(piece: &mut Trivia, unit: &str, line_start: bool) -> bool {
    match piece.kind {
        TriviaKind::Newline => true,
        TriviaKind::Whitespace if line_start => {
            if let Some(rest) = piece.text.strip_prefix(unit) {
                piece.text = rest.into();
            }
            false
        }
        _ => false,
    }
}
