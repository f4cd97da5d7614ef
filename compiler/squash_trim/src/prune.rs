//! Deletion walk.
//!
//! Consumes the tree in the same pre-order the index numbered it in, so the
//! walk's running counter is the current declaration's id.

use squash_ir::{Decl, MemberLayout, SyntaxTree, Token, TokenKind, Trivia, TriviaKind, TriviaList};

use crate::closure::Retention;

pub(crate) struct Pruner<'s> {
    state: &'s [Option<Retention>],
    /// Qualified names by id; `None` for field statements.
    names: &'s [Option<String>],
    next: usize,
    /// Directive lines from removed tokens, waiting for the next kept
    /// token.
    carry: TriviaList,
    removed: Vec<String>,
}

impl<'s> Pruner<'s> {
    pub fn new(state: &'s [Option<Retention>], names: &'s [Option<String>]) -> Self {
        Pruner {
            state,
            names,
            next: 0,
            carry: TriviaList::new(),
            removed: Vec::new(),
        }
    }

    /// Rebuild `tree` without unretained declarations. Returns the new tree
    /// and the qualified names removed.
    pub fn prune_tree(mut self, tree: SyntaxTree) -> (SyntaxTree, Vec<String>) {
        let SyntaxTree {
            usings,
            items,
            mut eof,
        } = tree;
        let items = self.prune_list(items, MemberLayout::Block);
        self.flush_into(&mut eof);
        (SyntaxTree::new(usings, items, eof), self.removed)
    }

    fn prune_list(&mut self, decls: Vec<Decl>, layout: MemberLayout) -> Vec<Decl> {
        let mut out: Vec<Decl> = Vec::with_capacity(decls.len());
        for decl in decls {
            let Some(mut decl) = self.prune(decl) else {
                continue;
            };
            if layout == MemberLayout::Separated && out.is_empty() {
                self.drop_leading_comma(&mut decl);
            }
            if let Some(first) = decl.first_token_mut() {
                self.flush_into(first);
            }
            out.push(decl);
        }
        out
    }

    fn prune(&mut self, mut decl: Decl) -> Option<Decl> {
        let id = self.next;
        self.next += 1;
        if self.state.get(id).copied().flatten().is_none() {
            self.next += decl.count() - 1;
            self.record(id..self.next);
            self.orphan(&decl);
            return None;
        }

        let members = std::mem::take(&mut decl.members);
        decl.members = self.prune_list(members, decl.layout);
        if let Some(close) = decl.close.first_mut() {
            self.flush_into(close);
        }
        Some(decl)
    }

    fn record(&mut self, ids: std::ops::Range<usize>) {
        let names = self.names.get(ids).unwrap_or_default();
        self.removed.extend(names.iter().flatten().cloned());
    }

    /// A variable that became first in its field statement loses its comma.
    fn drop_leading_comma(&mut self, decl: &mut Decl) {
        if !decl.open.first().is_some_and(|t| t.is(TokenKind::Comma)) {
            return;
        }
        let comma = decl.open.remove(0);
        self.orphan_token(&comma);
        decl.name_token = decl.name_token.map(|i| i.saturating_sub(1));
        decl.initializer = decl
            .initializer
            .take()
            .map(|r| r.start.saturating_sub(1)..r.end.saturating_sub(1));
    }

    fn orphan(&mut self, decl: &Decl) {
        for token in decl.tokens() {
            self.orphan_token(token);
        }
    }

    /// Keep directive lines of a removed token so `#region` pairs stay
    /// balanced.
    fn orphan_token(&mut self, token: &Token) {
        for piece in token.trivia() {
            if piece.kind == TriviaKind::Directive {
                self.carry.push(Trivia::newline());
                self.carry.push(piece.clone());
                self.carry.push(Trivia::newline());
            }
        }
    }

    fn flush_into(&mut self, token: &mut Token) {
        if self.carry.is_empty() {
            return;
        }
        let mut leading = std::mem::take(&mut self.carry);
        leading.extend(token.leading.drain(..));
        token.leading = leading;
    }
}
