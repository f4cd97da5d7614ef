use pretty_assertions::assert_eq;

use super::*;

fn err(source: &str) -> MalformedConditionalError {
    parse_blocks(source).unwrap_err()
}

#[test]
fn text_runs_are_grouped() {
    let nodes = parse_blocks("a\nb\n#if X\nc\n#endif\nd").unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0], Node::Text("a\nb\n"));
    assert_eq!(nodes[2], Node::Text("d"));
    let Node::Conditional(conditional) = &nodes[1] else {
        panic!("expected a conditional, got {:?}", nodes[1]);
    };
    assert_eq!(conditional.line, 3);
    assert_eq!(conditional.then, vec![Node::Text("c\n")]);
    assert_eq!(conditional.otherwise, None);
}

#[test]
fn elif_fills_else_slot() {
    let nodes = parse_blocks("#if A\na\n#elif B\nb\n#else\nz\n#endif\n").unwrap();
    let [Node::Conditional(first)] = nodes.as_slice() else {
        panic!("expected one conditional, got {nodes:?}");
    };
    let Some(Else::If(second)) = &first.otherwise else {
        panic!("expected #elif in else slot");
    };
    assert_eq!(second.line, 3);
    assert_eq!(second.then, vec![Node::Text("b\n")]);
    assert_eq!(second.otherwise, Some(Else::Block(vec![Node::Text("z\n")])));
}

#[test]
fn inactive_text_is_kept_in_tree() {
    let nodes = parse_blocks("#if NEVER\nsecret();\n#endif\n").unwrap();
    let [Node::Conditional(conditional)] = nodes.as_slice() else {
        panic!("expected one conditional, got {nodes:?}");
    };
    assert_eq!(conditional.then, vec![Node::Text("secret();\n")]);
}

#[test]
fn non_conditional_directives_are_text() {
    let nodes = parse_blocks("#region squash preserve\n#define X\n#endregion\n").unwrap();
    assert_eq!(
        nodes,
        vec![Node::Text("#region squash preserve\n#define X\n#endregion\n")]
    );
}

#[test]
fn directive_names_need_a_word_boundary() {
    let nodes = parse_blocks("#iffy\n#endifx\n").unwrap();
    assert_eq!(nodes, vec![Node::Text("#iffy\n#endifx\n")]);
}

#[test]
fn unopened_directives() {
    assert_eq!(
        err("a\n#else\n"),
        MalformedConditionalError::new(ConditionalErrorKind::Unopened("else"), 2)
    );
    assert_eq!(
        err("#elif X\n"),
        MalformedConditionalError::new(ConditionalErrorKind::Unopened("elif"), 1)
    );
    assert_eq!(
        err("#if X\n#endif\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::Unopened("endif"), 3)
    );
}

#[test]
fn else_ordering_errors() {
    assert_eq!(
        err("#if X\n#else\n#elif Y\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::ElifAfterElse, 3)
    );
    assert_eq!(
        err("#if X\n#else\n#else\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::DuplicateElse, 3)
    );
}

#[test]
fn missing_endif_reports_opening_line() {
    assert_eq!(
        err("x\n#if A\n#if B\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::MissingEndif, 2)
    );
}

#[test]
fn bad_condition_reports_its_line() {
    assert_eq!(
        err("\n\n#if (A\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::UnbalancedParens, 3)
    );
    assert_eq!(
        err("#if\n#endif\n"),
        MalformedConditionalError::new(ConditionalErrorKind::EmptyExpression, 1)
    );
}

#[test]
fn error_display_includes_line() {
    assert_eq!(
        err("#endif").to_string(),
        "line 1: `#endif` without a matching `#if`"
    );
}
