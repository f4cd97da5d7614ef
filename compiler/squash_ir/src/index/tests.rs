use super::*;
use crate::{DeclKind, Token};
use pretty_assertions::assert_eq;

fn decl(kind: DeclKind, name: &str, members: Vec<Decl>) -> Decl {
    let mut decl = Decl::new(kind, name);
    decl.members = members;
    decl
}

/// ```text
/// namespace App {
///   class Program { int count; void Main(); class Helper { void Main(); } }
/// }
/// class Other { }
/// ```
fn sample() -> SyntaxTree {
    let field = decl(
        DeclKind::Field,
        "",
        vec![decl(DeclKind::Variable, "count", Vec::new())],
    );
    let helper = decl(
        DeclKind::Class,
        "Helper",
        vec![decl(DeclKind::Method, "Main", Vec::new())],
    );
    let program = decl(
        DeclKind::Class,
        "Program",
        vec![field, decl(DeclKind::Method, "Main", Vec::new()), helper],
    );
    let ns = decl(DeclKind::Namespace, "App", vec![program]);
    let other = decl(DeclKind::Class, "Other", Vec::new());
    SyntaxTree::new(Vec::new(), vec![ns, other], Token::eof(0))
}

fn names(index: &DeclIndex<'_>, ids: impl IntoIterator<Item = DeclId>) -> Vec<String> {
    ids.into_iter()
        .map(|id| index.qualified_name(id).to_owned())
        .collect()
}

#[test]
fn preorder_numbering() {
    let tree = sample();
    let index = DeclIndex::new(&tree);
    assert_eq!(index.len(), 8);
    assert_eq!(
        names(&index, index.ids()),
        [
            "App",
            "App.Program",
            "App.Program",
            "App.Program.count",
            "App.Program.Main",
            "App.Program.Helper",
            "App.Program.Helper.Main",
            "Other",
        ]
    );
    assert_eq!(index.roots(), [DeclId::from_raw(0), DeclId::from_raw(7)]);
}

#[test]
fn parents_children_and_descendants() {
    let tree = sample();
    let index = DeclIndex::new(&tree);
    let program = DeclId::from_raw(1);
    let helper = DeclId::from_raw(5);
    assert_eq!(index.parent(program), Some(DeclId::from_raw(0)));
    assert_eq!(index.children(program).len(), 3);
    assert_eq!(index.descendants(program).count(), 5);
    assert!(index.is_within(DeclId::from_raw(6), program));
    assert!(!index.is_within(DeclId::from_raw(7), program));
    assert_eq!(
        index.ancestors(DeclId::from_raw(6)).collect::<Vec<_>>(),
        [helper, program, DeclId::from_raw(0)]
    );
    assert_eq!(index.enclosing_type(DeclId::from_raw(3)), Some(program));
}

#[test]
fn resolve_prefers_exact_then_suffix() {
    let tree = sample();
    let index = DeclIndex::new(&tree);

    assert_eq!(
        names(&index, index.resolve("App.Program.Main")),
        ["App.Program.Main"]
    );
    assert_eq!(
        names(&index, index.resolve("Program.Main")),
        ["App.Program.Main"]
    );
    assert_eq!(
        names(&index, index.resolve("Main")),
        ["App.Program.Main", "App.Program.Helper.Main"]
    );
    assert!(index.resolve("gram.Main").is_empty());
    assert!(index.resolve("Missing").is_empty());
    assert!(index.resolve("  ").is_empty());
}

#[test]
fn unnamed_field_statements_are_not_indexed_by_name() {
    let tree = sample();
    let index = DeclIndex::new(&tree);
    assert!(index.lookup("").is_empty());
    assert_eq!(index.lookup("count").len(), 1);
}
