use squash_ir::{render_tokens, RegionFlags, Span, Token, TokenKind};

use super::*;

fn compact_text(source: &str, mode: CompactMode) -> String {
    let tokens = squash_lexer::lex(source);
    match compact_tokens(&tokens, mode) {
        Ok(out) => render_tokens(&out),
        Err(err) => panic!("compaction failed: {err}"),
    }
}

/// Lex `source` and flag the tokens at `preserved` indices.
fn lex_preserving(source: &str, preserved: std::ops::Range<usize>) -> Vec<Token> {
    let mut tokens = squash_lexer::lex(source);
    for token in &mut tokens[preserved] {
        token.region |= RegionFlags::PRESERVE;
    }
    tokens
}

fn render(tokens: &[Token], mode: CompactMode) -> String {
    match compact_tokens(tokens, mode) {
        Ok(out) => render_tokens(&out),
        Err(err) => panic!("compaction failed: {err}"),
    }
}

mod full_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn separate_plus_tokens_stay_separate() {
        assert_eq!(compact_text("a + + b", CompactMode::Full), "a+ +b");
    }

    #[test]
    fn words_keep_one_space() {
        assert_eq!(compact_text("int   x = 1 ;", CompactMode::Full), "int x=1;");
    }

    #[test]
    fn comments_vanish() {
        assert_eq!(
            compact_text("a /* c */ + b // tail\n", CompactMode::Full),
            "a+b"
        );
    }

    #[test]
    fn member_access_on_integer_keeps_space() {
        assert_eq!(
            compact_text("x = 1 .ToString();", CompactMode::Full),
            "x=1 .ToString();"
        );
    }

    #[test]
    fn directives_keep_their_own_lines() {
        assert_eq!(
            compact_text("int a;\n#if X\nint b;\n#endif\n", CompactMode::Full),
            "int a;\n#if X\nint b;\n#endif\n"
        );
        assert_eq!(
            compact_text("#pragma warning disable\nclass A { }\n", CompactMode::Full),
            "#pragma warning disable\nclass A{}"
        );
    }

    #[test]
    fn region_directives_are_dropped() {
        assert_eq!(
            compact_text("#region stuff\nint a;\n#endregion\n", CompactMode::Full),
            "int a;"
        );
    }

    #[test]
    fn whole_tree() {
        let source = "using System;\nnamespace N\n{\n    class A\n    {\n        int x = 1;\n    }\n}\n";
        let tree = match squash_parse::parse_source(source) {
            Ok(tree) => tree,
            Err(err) => panic!("parse failed: {err}"),
        };
        let decls = tree.decl_count();
        let compacted = match compact(tree, CompactMode::Full) {
            Ok(tree) => tree,
            Err(err) => panic!("compaction failed: {err}"),
        };
        assert_eq!(compacted.decl_count(), decls);
        assert_eq!(
            compacted.render(),
            "using System;namespace N{class A{int x=1;}}"
        );
    }

    #[test]
    fn output_is_stable() {
        let once = compact_text("var s = a - -b + @\"x\" ;\n// done\n", CompactMode::Full);
        assert_eq!(once, "var s=a- -b+@\"x\";");
        assert_eq!(compact_text(&once, CompactMode::Full), once);
    }
}

mod strip_comments_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn comment_only_lines_disappear() {
        let source = "class A\n{\n    // note\n    int x; // trailing\n    /* block */ int y;\n}\n";
        assert_eq!(
            compact_text(source, CompactMode::StripComments),
            "class A\n{\n    int x;\n int y;\n}\n"
        );
    }

    #[test]
    fn glued_comment_leaves_a_space() {
        assert_eq!(compact_text("a/*c*/b", CompactMode::StripComments), "a b");
        assert_eq!(compact_text("a/*c*/+b", CompactMode::StripComments), "a+b");
    }

    #[test]
    fn whitespace_is_untouched() {
        let source = "int  a =  1;\n\n\nint b;\n";
        assert_eq!(compact_text(source, CompactMode::StripComments), source);
    }

    #[test]
    fn region_lines_are_dropped() {
        assert_eq!(
            compact_text(
                "#region squash preserve\nint a;\n#endregion\nint b;\n",
                CompactMode::StripComments
            ),
            "int a;\nint b;\n"
        );
    }
}

mod preserve_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn preserved_run_keeps_its_trivia() {
        // tokens: int a = 1 ; | int b = 2 ; | int c = 3 ;
        let tokens = lex_preserving(
            "int a = 1;\nint  b =  2; // keep\nint c = 3;\n",
            5..10,
        );
        assert_eq!(
            render(&tokens, CompactMode::Full),
            "int a=1;\nint  b =  2; // keep\nint c=3;"
        );
    }

    #[test]
    fn entering_mid_line_breaks_the_line() {
        let tokens = lex_preserving("return x;", 1..2);
        assert_eq!(render(&tokens, CompactMode::Full), "return\nx;");
    }

    #[test]
    fn boundary_collision_still_spaced() {
        let mut a = Token::new(TokenKind::Ident, "a", Span::new(0, 1));
        a.region = RegionFlags::PRESERVE;
        let b = Token::new(TokenKind::Ident, "b", Span::new(1, 2));
        let tokens = vec![a, b, Token::eof(2)];
        assert_eq!(render(&tokens, CompactMode::Full), "a b");
    }

    #[test]
    fn region_flags_survive() {
        let tokens = lex_preserving("int a; int b;", 3..6);
        let out = match compact_tokens(&tokens, CompactMode::Full) {
            Ok(out) => out,
            Err(err) => panic!("compaction failed: {err}"),
        };
        let flags: Vec<bool> = out.iter().map(Token::is_preserved).collect();
        assert_eq!(
            flags,
            vec![false, false, false, true, true, true, false]
        );
    }

    #[test]
    fn preserved_comment_gets_its_line_back() {
        // A preserved token whose line comment no longer ends the line.
        let mut tokens = lex_preserving("a // c\n", 0..1);
        if let Some(first) = tokens.first_mut() {
            first.trailing.pop();
        }
        tokens.insert(1, Token::new(TokenKind::Ident, "b", Span::new(7, 8)));
        assert_eq!(render(&tokens, CompactMode::Full), "a // c\nb");
    }
}

mod error_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_token_is_an_invariant_violation() {
        let tokens = squash_lexer::lex("a ` b");
        let err = compact_tokens(&tokens, CompactMode::Full);
        assert!(matches!(
            err,
            Err(CompactError::MissingCollisionEntry {
                left: TokenKind::Ident,
                right: TokenKind::Unknown,
                ..
            })
        ));
    }

    #[test]
    fn empty_stream() {
        assert_eq!(compact_tokens(&[], CompactMode::Full), Ok(Vec::new()));
        assert_eq!(compact_text("", CompactMode::Full), "");
    }
}
