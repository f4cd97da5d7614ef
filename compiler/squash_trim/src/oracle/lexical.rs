//! Name-matching oracle.
//!
//! Every identifier in a declaration's own tokens is matched against every
//! declaration with that simple name. Scoping, overload resolution and
//! local shadowing are ignored, so the edges over-approximate the real
//! reference graph.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use squash_ir::{Decl, DeclId, DeclIndex, DeclKind, Modifiers, SyntaxTree, Token, TokenKind, UsingDirective};

use super::{SemanticOracle, Usage, UsageKind};

/// Conservative oracle working from tokens alone.
#[derive(Clone, Debug)]
pub struct LexicalOracle {
    entry_container: Option<String>,
}

impl Default for LexicalOracle {
    fn default() -> Self {
        LexicalOracle {
            entry_container: Some("Program".to_owned()),
        }
    }
}

impl LexicalOracle {
    /// Oracle treating `Program` as the entry container.
    pub fn new() -> Self {
        LexicalOracle::default()
    }

    pub fn with_entry_container(mut self, name: Option<String>) -> Self {
        self.entry_container = name;
        self
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Section {
    Body,
    /// Between `:` and the body of a type header.
    Bases,
    /// Inside `where` clauses.
    Constraints,
}

impl SemanticOracle for LexicalOracle {
    fn usages(&self, index: &DeclIndex<'_>, id: DeclId) -> Vec<Usage> {
        let decl = index.decl(id);
        if decl.kind == DeclKind::Namespace {
            return Vec::new();
        }
        let tokens: Vec<&Token> = decl.open.iter().chain(&decl.close).collect();
        let mut out = Vec::new();

        let mut section = Section::Body;
        let mut in_header = decl.kind.is_type();
        let mut opaque_end: Option<usize> = None;
        // Open generic argument lists: closing index and whether the owner
        // has a `new()` constraint.
        let mut generics: SmallVec<[(usize, bool); 4]> = SmallVec::new();

        for (i, token) in tokens.iter().enumerate() {
            while generics.last().is_some_and(|&(end, _)| i > end) {
                generics.pop();
            }
            if opaque_end.is_some_and(|end| i > end) {
                opaque_end = None;
            }
            let prev = i.checked_sub(1).map(|p| tokens[p]);

            if token.is_word("typeof") || token.is_word("nameof") {
                if opaque_end.is_none() && tokens.get(i + 1).is_some_and(|t| t.is(TokenKind::LParen)) {
                    opaque_end = matching_paren(&tokens, i + 1);
                }
                continue;
            }
            if token.is_word("where") {
                section = Section::Constraints;
                continue;
            }
            match token.kind {
                TokenKind::Colon if in_header && section == Section::Body => {
                    section = Section::Bases;
                }
                TokenKind::LBrace | TokenKind::Semicolon | TokenKind::FatArrow => {
                    in_header = false;
                    section = Section::Body;
                }
                TokenKind::Lt => {
                    if let Some(owner) = prev.filter(|p| p.kind.is_word()) {
                        if let Some(end) = generic_close(&tokens, i) {
                            generics.push((end, requires_new(index, &owner.text)));
                        }
                    }
                }
                TokenKind::Ident if decl.name_token != Some(i) => {
                    let kind = if opaque_end.is_some() {
                        UsageKind::Opaque
                    } else if prev.is_some_and(|p| p.is_word("new")) {
                        UsageKind::Instantiation
                    } else {
                        match section {
                            Section::Constraints => UsageKind::Constraint,
                            Section::Bases if generics.is_empty() => UsageKind::BaseType,
                            _ if generics.last().is_some_and(|&(_, new)| new) => {
                                UsageKind::NewConstrainedArgument
                            }
                            _ => UsageKind::Reference,
                        }
                    };
                    link(index, id, &token.text, kind, &mut out);
                    if prev.is_some_and(|p| matches!(p.kind, TokenKind::LBracket | TokenKind::Comma)) {
                        link(index, id, &format!("{}Attribute", token.text), kind, &mut out);
                    }
                }
                _ => {}
            }
        }

        if self.is_override_or_implementation(index, id) {
            for &target in index.lookup(&decl.name) {
                if target != id && !index.is_within(target, id) {
                    out.push(Usage::new(target, UsageKind::Reference));
                }
            }
        }
        if decl.kind == DeclKind::Constructor {
            chained_constructors(index, id, decl, &tokens, &mut out);
        }
        out
    }

    fn is_entry_container(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        let decl = index.decl(id);
        matches!(decl.kind, DeclKind::Class | DeclKind::Struct)
            && self.entry_container.as_deref() == Some(decl.name.as_str())
    }

    /// Explicit overrides and interface implementations, plus public
    /// members that may implicitly implement an interface: one declared
    /// in the program with a member of the same name, or an external base
    /// named like an interface (`IFoo`).
    fn is_override_or_implementation(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        let decl = index.decl(id);
        if decl.has(Modifiers::OVERRIDE) || decl.has(Modifiers::EXPLICIT_IMPL) {
            return true;
        }
        if !decl.has(Modifiers::PUBLIC) {
            return false;
        }
        let owner = match decl.kind {
            DeclKind::Method | DeclKind::Property | DeclKind::Indexer | DeclKind::Event => {
                index.parent(id)
            }
            DeclKind::Variable if decl.has(Modifiers::EVENT) => {
                index.parent(id).and_then(|field| index.parent(field))
            }
            _ => None,
        };
        let Some(owner) = owner else {
            return false;
        };
        let owner = index.decl(owner);
        if !owner.kind.is_type() {
            return false;
        }
        let mut visited = FxHashSet::default();
        owner
            .bases
            .iter()
            .any(|base| interface_declares(index, base, &decl.name, &mut visited))
    }

    fn is_extension_method(&self, index: &DeclIndex<'_>, id: DeclId) -> bool {
        index.decl(id).has(Modifiers::EXTENSION)
    }

    /// Non-static, non-alias usings of namespaces the sources declared
    /// but the merged document no longer does.
    fn unresolved_imports(&self, merged: &SyntaxTree, sources: &[&SyntaxTree]) -> Vec<String> {
        let mut local = FxHashSet::default();
        for source in sources {
            namespaces(&source.items, "", &mut local);
        }
        if local.is_empty() {
            return Vec::new();
        }
        let mut remaining = FxHashSet::default();
        namespaces(&merged.items, "", &mut remaining);

        let mut usings = Vec::new();
        collect_usings(&merged.usings, &merged.items, &mut usings);
        let mut out: Vec<String> = Vec::new();
        for using in usings {
            let target = &using.target;
            if target.starts_with("static ") || target.contains('=') {
                continue;
            }
            if declares(&local, target) && !declares(&remaining, target) && !out.contains(target) {
                out.push(target.clone());
            }
        }
        out
    }
}

fn link(index: &DeclIndex<'_>, from: DeclId, name: &str, kind: UsageKind, out: &mut Vec<Usage>) {
    for &target in index.lookup(name) {
        if target == from {
            continue;
        }
        let kind = match kind {
            UsageKind::BaseType if index.decl(target).kind == DeclKind::Interface => {
                UsageKind::Interface
            }
            kind => kind,
        };
        out.push(Usage::new(target, kind));
    }
}

/// Index of the `)` matching the `(` at `open`.
fn matching_paren(tokens: &[&Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the `>` closing a type argument list opened at `lt`.
fn generic_close(tokens: &[&Token], lt: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(lt) {
        match token.kind {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i);
                }
            }
            TokenKind::Ident
            | TokenKind::Keyword
            | TokenKind::Dot
            | TokenKind::ColonColon
            | TokenKind::Comma
            | TokenKind::Question
            | TokenKind::LBracket
            | TokenKind::RBracket => {}
            _ => return None,
        }
    }
    None
}

/// Whether any declaration named `owner` constrains a type parameter with
/// `new()`.
fn requires_new(index: &DeclIndex<'_>, owner: &str) -> bool {
    index
        .lookup(owner)
        .iter()
        .any(|&id| has_new_constraint(index.decl(id)))
}

fn has_new_constraint(decl: &Decl) -> bool {
    let tokens = &decl.open;
    let Some(start) = tokens.iter().position(|t| t.is_word("where")) else {
        return false;
    };
    let clause = &tokens[start..];
    for (i, token) in clause.iter().enumerate() {
        if matches!(token.kind, TokenKind::LBrace | TokenKind::FatArrow | TokenKind::Semicolon) {
            return false;
        }
        if token.is_word("new")
            && clause.get(i + 1).is_some_and(|t| t.is(TokenKind::LParen))
            && clause.get(i + 2).is_some_and(|t| t.is(TokenKind::RParen))
        {
            return true;
        }
    }
    false
}

/// `: this(...)` reaches sibling constructors, `: base(...)` the
/// constructors of the base types.
fn chained_constructors(
    index: &DeclIndex<'_>,
    id: DeclId,
    decl: &Decl,
    tokens: &[&Token],
    out: &mut Vec<Usage>,
) {
    let Some(name) = decl.name_token else {
        return;
    };
    let Some(close) = matching_paren(tokens, name + 1) else {
        return;
    };
    if !tokens.get(close + 1).is_some_and(|t| t.is(TokenKind::Colon)) {
        return;
    }
    let Some(owner) = index.parent(id) else {
        return;
    };
    let constructors = move |ty: DeclId| {
        index.children(ty).iter().copied().filter(move |&c| {
            let decl = index.decl(c);
            decl.kind == DeclKind::Constructor && !decl.has(Modifiers::STATIC)
        })
    };
    match tokens.get(close + 2) {
        Some(t) if t.is_word("this") => {
            out.extend(
                constructors(owner)
                    .filter(|&c| c != id)
                    .map(|c| Usage::new(c, UsageKind::Reference)),
            );
        }
        Some(t) if t.is_word("base") => {
            for base in &index.decl(owner).bases {
                for &ty in index.lookup(base) {
                    if index.decl(ty).kind.is_type() {
                        out.extend(constructors(ty).map(|c| Usage::new(c, UsageKind::Reference)));
                    }
                }
            }
        }
        _ => {}
    }
}

/// Whether `base`, or an interface it extends, declares `member`.
fn interface_declares(
    index: &DeclIndex<'_>,
    base: &str,
    member: &str,
    visited: &mut FxHashSet<String>,
) -> bool {
    if !visited.insert(base.to_owned()) {
        return false;
    }
    let types: SmallVec<[DeclId; 2]> = index
        .lookup(base)
        .iter()
        .copied()
        .filter(|&id| index.decl(id).kind.is_type())
        .collect();
    if types.is_empty() {
        return looks_like_interface(base);
    }
    types.into_iter().any(|id| {
        let decl = index.decl(id);
        decl.kind == DeclKind::Interface
            && (decl.members.iter().any(|m| m.name == member)
                || decl
                    .bases
                    .iter()
                    .any(|b| interface_declares(index, b, member, visited)))
    })
}

/// `IFoo` naming convention.
fn looks_like_interface(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
}

fn namespaces(decls: &[Decl], prefix: &str, out: &mut FxHashSet<String>) {
    for decl in decls {
        if decl.kind != DeclKind::Namespace {
            continue;
        }
        let name = if prefix.is_empty() {
            decl.name.clone()
        } else {
            format!("{prefix}.{}", decl.name)
        };
        namespaces(&decl.members, &name, out);
        out.insert(name);
    }
}

fn collect_usings<'t>(usings: &'t [UsingDirective], decls: &'t [Decl], out: &mut Vec<&'t UsingDirective>) {
    out.extend(usings);
    for decl in decls {
        if decl.kind == DeclKind::Namespace {
            collect_usings(&decl.usings, &decl.members, out);
        }
    }
}

/// Whether `namespace` or a namespace nested in it is in `set`.
fn declares(set: &FxHashSet<String>, namespace: &str) -> bool {
    set.iter().any(|name| {
        name.strip_prefix(namespace)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}
