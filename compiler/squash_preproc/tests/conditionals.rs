//! Conditional evaluation over whole scripts.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use squash_preproc::{evaluate, MacroSet};

#[test]
fn only_the_active_if_branch_survives() {
    let source = "\
public Program()
{
#if X
    Echo(\"x is on\");
#else
    Echo(\"x is off\");
#endif
}
";
    let active: MacroSet = ["X"].into_iter().collect();
    assert_eq!(
        evaluate(source, &active).unwrap(),
        "public Program()\n{\n    Echo(\"x is on\");\n}\n"
    );
}

#[test]
fn malformed_nesting_is_reported() {
    let err = evaluate("#if X\nclass A {}\n", &MacroSet::new()).unwrap_err();
    assert_eq!(err.line, 1);
}

/// A generated conditional block and the text it must reduce to.
#[derive(Clone, Debug)]
struct Case {
    source: String,
    expected: String,
}

fn symbol() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("A"), Just("B"), Just("C")]
}

fn body_line() -> impl Strategy<Value = String> {
    "[a-z]{1,8}\\(\\);".prop_map(|s| format!("    {s}\n"))
}

fn cases(active: &'static [&'static str]) -> impl Strategy<Value = Case> {
    let leaf = body_line().prop_map(|line| Case {
        source: line.clone(),
        expected: line,
    });
    leaf.prop_recursive(3, 24, 4, move |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(|parts| Case {
                source: parts.iter().map(|c| c.source.as_str()).collect(),
                expected: parts.iter().map(|c| c.expected.as_str()).collect(),
            }),
            (symbol(), any::<bool>(), inner.clone(), inner).prop_map(
                move |(sym, negate, then, otherwise)| {
                    let on = active.contains(&sym) != negate;
                    let bang = if negate { "!" } else { "" };
                    Case {
                        source: format!(
                            "#if {bang}{sym}\n{}#else\n{}#endif\n",
                            then.source, otherwise.source
                        ),
                        expected: if on { then.expected } else { otherwise.expected },
                    }
                }
            ),
        ]
    })
}

const ACTIVE: &[&str] = &["A", "C"];

proptest! {
    #[test]
    fn nested_blocks_reduce_to_selected_text(case in cases(ACTIVE)) {
        let active: MacroSet = ACTIVE.iter().copied().collect();
        prop_assert_eq!(evaluate(&case.source, &active).unwrap(), case.expected);
    }

    #[test]
    fn directive_free_text_passes_through(text in "[a-z{}();\\r\\n /]{0,200}") {
        prop_assert_eq!(evaluate(&text, &MacroSet::new()).unwrap(), text);
    }
}
