use super::*;
use crate::{Span, Trivia};
use pretty_assertions::assert_eq;

fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(kind, text, Span::DUMMY)
}

fn spaced(kind: TokenKind, text: &str) -> Token {
    let mut token = tok(kind, text);
    token.trailing.push(Trivia::space());
    token
}

fn using(parts: &[(TokenKind, &str)]) -> UsingDirective {
    let mut tokens = vec![spaced(TokenKind::Keyword, "using")];
    tokens.extend(parts.iter().map(|&(kind, text)| tok(kind, text)));
    tokens.push(tok(TokenKind::Semicolon, ";"));
    UsingDirective::new(tokens)
}

fn field(names: &[&str]) -> Decl {
    let mut decl = Decl::new(DeclKind::Field, "");
    decl.layout = MemberLayout::Separated;
    decl.open = vec![spaced(TokenKind::Keyword, "int")];
    for (i, name) in names.iter().enumerate() {
        let mut var = Decl::new(DeclKind::Variable, *name);
        if i > 0 {
            var.open.push(tok(TokenKind::Comma, ","));
        }
        var.name_token = Some(var.open.len());
        var.open.push(tok(TokenKind::Ident, name));
        decl.members.push(var);
    }
    decl.close = vec![tok(TokenKind::Semicolon, ";")];
    decl
}

#[test]
fn using_target_normalizes_trivia() {
    let plain = using(&[
        (TokenKind::Ident, "System"),
        (TokenKind::Dot, "."),
        (TokenKind::Ident, "Text"),
    ]);
    assert_eq!(plain.target, "System.Text");
    assert_eq!(plain.namespace(), "System.Text");

    let stat = using(&[
        (TokenKind::Keyword, "static"),
        (TokenKind::Ident, "System"),
        (TokenKind::Dot, "."),
        (TokenKind::Ident, "Math"),
    ]);
    assert_eq!(stat.target, "static System.Math");
    assert_eq!(stat.namespace(), "System.Math");

    let alias = using(&[
        (TokenKind::Ident, "V"),
        (TokenKind::Eq, "="),
        (TokenKind::Ident, "VRageMath"),
    ]);
    assert_eq!(alias.target, "V=VRageMath");
    assert_eq!(alias.namespace(), "VRageMath");
}

#[test]
fn field_renders_separated_members() {
    let decl = field(&["a", "b", "c"]);
    assert_eq!(decl.render(), "int a,b,c;");
    assert_eq!(decl.count(), 4);
}

#[test]
fn tree_render_includes_eof_trivia() {
    let mut eof = Token::eof(0);
    eof.leading.push(Trivia::newline());
    let tree = SyntaxTree::new(
        vec![using(&[(TokenKind::Ident, "System")])],
        vec![field(&["x"])],
        eof,
    );
    assert_eq!(tree.render(), "using System;int x;\n");
    assert_eq!(tree.decl_count(), 2);
}

#[test]
fn tokens_mut_matches_tokens() {
    let mut tree = SyntaxTree::new(Vec::new(), vec![field(&["a", "b"])], Token::eof(0));
    let before: Vec<String> = tree.tokens().map(|t| t.text.to_string()).collect();
    let count = tree.tokens_mut().len();
    assert_eq!(count, before.len());

    let replaced: Vec<Token> = tree
        .tokens()
        .map(|t| {
            let mut t = t.clone();
            t.trailing.clear();
            t
        })
        .collect();
    assert!(tree.replace_tokens(replaced));
    assert_eq!(tree.render(), "inta,b;");
}

#[test]
fn decl_tokens_mut_walks_members() {
    let mut decl = field(&["a", "b"]);
    let expected: Vec<String> = decl.tokens().map(|t| t.text.to_string()).collect();
    for token in decl.tokens_mut() {
        if token.kind == TokenKind::Ident {
            token.text = token.text.to_uppercase().into();
        }
    }
    let renamed: Vec<String> = decl.tokens().map(|t| t.text.to_string()).collect();
    assert_eq!(expected, ["int", "a", ",", "b", ";"]);
    assert_eq!(renamed, ["int", "A", ",", "B", ";"]);
}

#[test]
fn replace_tokens_rejects_wrong_count() {
    let mut tree = SyntaxTree::new(Vec::new(), vec![field(&["a"])], Token::eof(0));
    assert!(!tree.replace_tokens(std::iter::empty()));
}

#[test]
fn initializer_range_slices_open() {
    let mut var = Decl::new(DeclKind::Variable, "x");
    var.open = vec![
        tok(TokenKind::Ident, "x"),
        tok(TokenKind::Eq, "="),
        tok(TokenKind::Int, "1"),
    ];
    var.initializer = Some(2..3);
    let texts: Vec<&str> = var.initializer_tokens().iter().map(|t| &*t.text).collect();
    assert_eq!(texts, ["1"]);

    var.initializer = Some(2..9);
    assert!(var.initializer_tokens().is_empty());
}

#[test]
fn modifier_keywords() {
    assert_eq!(Modifiers::from_keyword("override"), Some(Modifiers::OVERRIDE));
    assert_eq!(Modifiers::from_keyword("partial"), Some(Modifiers::PARTIAL));
    assert_eq!(Modifiers::from_keyword("class"), None);
}

#[test]
fn kind_predicates() {
    assert!(DeclKind::Enum.is_type());
    assert!(DeclKind::Field.is_container());
    assert!(!DeclKind::Method.is_container());
    assert_eq!(DeclKind::EnumMember.as_str(), "enum member");
}

#[test]
fn first_token_falls_back_to_close() {
    let mut decl = field(&["a"]);
    decl.open.clear();
    decl.members.clear();
    let first = decl.first_token_mut().unwrap();
    assert!(first.is(TokenKind::Semicolon));
    first.leading.push(Trivia::newline());
    assert_eq!(decl.render(), "\n;");
}
