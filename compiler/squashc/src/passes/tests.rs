use std::collections::BTreeMap;

use squash_ir::{Decl, RegionFlags, SyntaxTree, Token};

use super::*;
use crate::cancel::CancellationToken;
use crate::config::{MinifyLevel, PackConfig};
use crate::document::Document;
use crate::error::PackError;
use crate::processor::{DocumentProcessor, ProcessContext};

fn run(
    processor: &dyn DocumentProcessor,
    document: Document,
    config: &PackConfig,
) -> Result<Document, PackError> {
    let symbols = config.macro_set();
    let cancel = CancellationToken::new();
    let ctx = ProcessContext {
        config,
        symbols: &symbols,
        cancel: &cancel,
        readme: None,
        thumbnail: None,
    };
    processor.process(document, &ctx)
}

fn tree_of(source: &str) -> SyntaxTree {
    squash_parse::parse_source(source).unwrap_or_else(|err| panic!("{err}"))
}

fn run_tree(processor: &dyn DocumentProcessor, source: &str, config: &PackConfig) -> SyntaxTree {
    let document = Document::from_tree("test.cs", tree_of(source));
    match run(processor, document, config) {
        Ok(doc) => doc.tree().cloned().unwrap_or_else(SyntaxTree::empty),
        Err(err) => panic!("{err}"),
    }
}

fn first_flags(decl: &Decl) -> RegionFlags {
    decl.first_token().map(|t| t.region).unwrap_or_default()
}

mod conditional_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn inactive_branches_are_removed() {
        let config = PackConfig::default().define("DEBUG");
        let doc = Document::new("a.cs", "#if DEBUG\nint a;\n#else\nint b;\n#endif\n");
        let out = run(&ConditionalCompilation::new(), doc, &config);
        assert_eq!(out.ok().and_then(|d| d.text().map(str::to_owned)).as_deref(), Some("int a;\n"));
    }

    #[test]
    fn malformed_blocks_name_the_document() {
        let doc = Document::new("broken.cs", "#if A\nint a;\n");
        let err = run(&ConditionalCompilation::new(), doc, &PackConfig::default());
        match err {
            Err(PackError::Structural { document, source }) => {
                assert_eq!(document, "broken.cs");
                assert_eq!(source.line, 1);
            }
            other => panic!("expected a structural error, got {other:?}"),
        }
    }
}

mod region_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preserve_region_flags_its_tokens() {
        let mut tree = tree_of(
            "class A\n{\n#region squash preserve\n    int a;\n#endregion\n    int b;\n}\n",
        );
        let flagged = annotate_regions(&mut tree);
        assert_eq!(flagged, 3);
        let class = &tree.items[0];
        assert_eq!(first_flags(&class.members[0]), RegionFlags::PRESERVE);
        assert_eq!(first_flags(&class.members[1]), RegionFlags::empty());
        assert!(class.members[0].tokens().all(Token::is_preserved));
    }

    #[test]
    fn regions_nest() {
        let mut tree = tree_of(concat!(
            "class A\n{\n",
            "#region squash preserve\n",
            "    int a;\n",
            "#region squash macros\n",
            "    string s = \"$X$\";\n",
            "#endregion\n",
            "#region notes\n",
            "    int b;\n",
            "#endregion\n",
            "#endregion\n",
            "    int c;\n",
            "}\n",
        ));
        annotate_regions(&mut tree);
        let flags: Vec<RegionFlags> = tree.items[0].members.iter().map(first_flags).collect();
        assert_eq!(
            flags,
            vec![
                RegionFlags::PRESERVE,
                RegionFlags::PRESERVE | RegionFlags::MACRO_EXPAND,
                RegionFlags::PRESERVE,
                RegionFlags::empty(),
            ]
        );
    }

    #[test]
    fn stray_endregion_is_ignored() {
        let mut tree = tree_of("class A\n{\n#endregion\n    int a;\n}\n");
        assert_eq!(annotate_regions(&mut tree), 0);
    }

    #[test]
    fn region_keywords_ignore_case() {
        let mut tree = tree_of("#region Squash Preserve\nclass A { }\n#endregion\n");
        annotate_regions(&mut tree);
        assert!(tree.items[0].tokens().all(Token::is_preserved));
        assert!(!tree.eof.is_preserved());
    }
}

mod protect_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROGRAM: &str = concat!(
        "class Program\n{\n",
        "    void Main() { }\n",
        "    void Helper() { }\n",
        "#region squash preserve\n",
        "    void Kept() { }\n",
        "#endregion\n",
        "}\n",
        "class Other { }\n",
    );

    #[test]
    fn entry_points_and_preserved_decls_are_protected() {
        let mut tree = tree_of(PROGRAM);
        annotate_regions(&mut tree);
        let names = ["Program.Main".to_owned(), "Other".to_owned()];
        let marked = protect(&mut tree, &names);
        assert_eq!(marked, 3);

        let program = &tree.items[0];
        let protected: Vec<(&str, bool)> = program
            .members
            .iter()
            .map(|m| (m.name.as_str(), m.protected))
            .collect();
        assert_eq!(
            protected,
            [("Main", true), ("Helper", false), ("Kept", true)]
        );
        assert!(!program.protected);
        assert!(tree.items[1].protected);
    }

    #[test]
    fn processor_reads_the_configuration() {
        let config = PackConfig {
            entry_points: vec!["Program.Helper".to_owned()],
            ..PackConfig::default()
        };
        let tree = run_tree(&ProtectionAnnotator::new(), PROGRAM, &config);
        let helper = &tree.items[0].members[1];
        assert_eq!(helper.name, "Helper");
        assert!(helper.protected);
        assert!(!tree.items[0].members[0].protected);
    }
}

mod macro_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn macros(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn plain(value: &str) -> String {
        value.to_owned()
    }

    #[test]
    fn known_placeholders_are_replaced() {
        let values = macros(&[("NAME", "Squash"), ("V", "2")]);
        assert_eq!(
            expand_placeholders("$NAME$ v$V$ costs $5", &values, plain).as_deref(),
            Some("Squash v2 costs $5")
        );
    }

    #[test]
    fn unknown_or_unclosed_placeholders_stay() {
        let values = macros(&[("NAME", "x")]);
        assert_eq!(expand_placeholders("$OTHER$ $NAME", &values, plain), None);
        assert_eq!(expand_placeholders("$$", &values, plain), None);
        assert_eq!(
            expand_placeholders("$$NAME$", &values, plain).as_deref(),
            Some("$x")
        );
    }

    #[test]
    fn values_are_escaped_for_their_literal() {
        let config = PackConfig::default().with_macro("V", "a\"b\\{c}");
        let source = concat!(
            "class A\n{\n",
            "#region squash macros\n",
            "    string s = \"$V$\";\n",
            "    string v = @\"$V$\";\n",
            "    string i = $\"$V$\";\n",
            "#endregion\n",
            "    string o = \"$V$\";\n",
            "}\n",
        );
        let mut tree = tree_of(source);
        annotate_regions(&mut tree);
        let document = Document::from_tree("a.cs", tree);
        let out = match run(&MacroSubstitution::new(), document, &config) {
            Ok(doc) => doc.tree().map(SyntaxTree::render).unwrap_or_default(),
            Err(err) => panic!("{err}"),
        };
        let expected = concat!(
            "class A\n{\n",
            "#region squash macros\n",
            "    string s = \"a\\\"b\\\\{c}\";\n",
            "    string v = @\"a\"\"b\\{c}\";\n",
            "    string i = $\"a\\\"b\\\\{{c}}\";\n",
            "#endregion\n",
            "    string o = \"$V$\";\n",
            "}\n",
        );
        assert_eq!(out, expected);
    }
}

mod gating_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use squash_compact::CompactMode;

    #[test]
    fn trim_runs_from_trim_dead_code() {
        let trim = TrimProcessor::new();
        let active: Vec<bool> = MinifyLevel::ALL.iter().map(|&l| trim.is_active(l)).collect();
        assert_eq!(active, [false, false, false, true, true]);
    }

    #[test]
    fn compact_mode_per_level() {
        let modes: Vec<Option<CompactMode>> =
            MinifyLevel::ALL.iter().map(|&l| CompactProcessor::mode(l)).collect();
        assert_eq!(
            modes,
            [
                None,
                Some(CompactMode::StripComments),
                Some(CompactMode::Full),
                Some(CompactMode::Full),
                Some(CompactMode::Full),
            ]
        );
    }

    #[test]
    fn built_in_constraints() {
        assert_eq!(ProtectionAnnotator::new().descriptor().runs_after, ["regions"]);
        assert_eq!(TrimProcessor::new().descriptor().runs_after, ["protect", "macros"]);
        assert_eq!(CompactProcessor::new().descriptor().runs_after, ["trim"]);
    }
}

mod trim_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unused_members_are_removed_and_reported() {
        let config = PackConfig::default().with_level(MinifyLevel::TrimDeadCode);
        let document = Document::from_tree(
            "a.cs",
            tree_of("class Program\n{\n    void Main() { }\n    void Unused() { }\n}\n"),
        );
        let out = match run(&TrimProcessor::new(), document, &config) {
            Ok(doc) => doc,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(
            out.tree().map(SyntaxTree::render).as_deref(),
            Some("class Program\n{\n    void Main() { }\n}\n")
        );
        let report = out.trim_report.unwrap_or_default();
        assert_eq!(report.removed, ["Program.Unused"]);
        // `Program.Save` from the default entry points does not exist.
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].origin, "trim");
    }

    #[test]
    fn protected_flag_keeps_a_member() {
        let config = PackConfig {
            level: MinifyLevel::TrimDeadCode,
            entry_points: vec!["Program.Main".to_owned()],
            ..PackConfig::default()
        };
        let mut tree = tree_of("class Program\n{\n    void Main() { }\n    void Kept() { }\n}\n");
        tree.items[0].members[1].protected = true;
        let out = run(&TrimProcessor::new(), Document::from_tree("a.cs", tree), &config);
        let members = out
            .ok()
            .and_then(|d| d.tree().map(|t| t.items[0].members.len()));
        assert_eq!(members, Some(2));
    }
}
