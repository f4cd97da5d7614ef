//! Soundness and minimality of trimming on generated call graphs.

use std::collections::BTreeSet;

use proptest::prelude::*;
use squash_parse::parse_source;
use squash_trim::{trim, LexicalOracle, TrimOptions};

/// A generated program: methods `M0..Mn` each calling some methods and
/// reading some fields `F0..Fk`; `Main` calls into the graph.
#[derive(Clone, Debug)]
struct Program {
    calls: Vec<Vec<usize>>,
    reads: Vec<Vec<usize>>,
    fields: usize,
    main_calls: Vec<usize>,
}

impl Program {
    fn source(&self) -> String {
        let mut out = String::from("class Program\n{\n");
        for f in 0..self.fields {
            out.push_str(&format!("    static int F{f} = {f} * 2;\n"));
        }
        out.push_str("    void Main()\n    {\n");
        for m in &self.main_calls {
            out.push_str(&format!("        M{m}();\n"));
        }
        out.push_str("    }\n");
        for (i, (calls, reads)) in self.calls.iter().zip(&self.reads).enumerate() {
            out.push_str(&format!("    int M{i}()\n    {{\n        int x = 0;\n"));
            for c in calls {
                out.push_str(&format!("        x += M{c}();\n"));
            }
            for r in reads {
                out.push_str(&format!("        x += F{r};\n"));
            }
            out.push_str("        return x;\n    }\n");
        }
        out.push_str("}\n");
        out
    }

    /// Names reachable from `Main`.
    fn reachable(&self) -> BTreeSet<String> {
        let mut seen = BTreeSet::new();
        let mut stack: Vec<usize> = self.main_calls.clone();
        let mut out = BTreeSet::new();
        while let Some(m) = stack.pop() {
            if !seen.insert(m) {
                continue;
            }
            out.insert(format!("Program.M{m}"));
            for r in &self.reads[m] {
                out.insert(format!("Program.F{r}"));
            }
            stack.extend(&self.calls[m]);
        }
        out
    }

    fn all(&self) -> BTreeSet<String> {
        (0..self.calls.len())
            .map(|m| format!("Program.M{m}"))
            .chain((0..self.fields).map(|f| format!("Program.F{f}")))
            .collect()
    }
}

fn program() -> impl Strategy<Value = Program> {
    (1usize..8, 0usize..5).prop_flat_map(|(methods, fields)| {
        let calls = prop::collection::vec(prop::collection::vec(0..methods, 0..3), methods);
        let reads = if fields == 0 {
            Just(vec![Vec::new(); methods]).boxed()
        } else {
            prop::collection::vec(prop::collection::vec(0..fields, 0..3), methods).boxed()
        };
        let main_calls = prop::collection::vec(0..methods, 0..3);
        (calls, reads, main_calls).prop_map(move |(calls, reads, main_calls)| Program {
            calls,
            reads,
            fields,
            main_calls,
        })
    })
}

proptest! {
    #[test]
    fn removes_exactly_the_unreachable(program in program()) {
        let tree = parse_source(&program.source()).unwrap();
        let options = TrimOptions {
            entry_points: vec!["Program.Main".to_owned()],
            ..TrimOptions::default()
        };
        let trimmed = trim(tree, &LexicalOracle::new(), &options);

        let removed: BTreeSet<String> = trimmed.report.removed.iter().cloned().collect();
        let reachable = program.reachable();
        let expected: BTreeSet<String> = program.all().difference(&reachable).cloned().collect();

        // Soundness: nothing reachable is removed.
        prop_assert!(removed.is_disjoint(&reachable), "removed {:?}", removed);
        // Minimality: every unreachable literal-initialized field and
        // uncalled method is removed.
        prop_assert_eq!(removed, expected);

        // The trimmed program still parses.
        let rendered = trimmed.tree.render();
        prop_assert!(parse_source(&rendered).is_ok(), "{}", rendered);
    }
}
