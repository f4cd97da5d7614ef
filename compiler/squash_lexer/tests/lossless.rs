//! Property tests: lexing never loses or reorders input bytes.

use proptest::prelude::*;
use squash_ir::{render_tokens, TokenKind};
use squash_lexer::lex;

/// Source-like text: words, numbers, operators, strings, comments and
/// directives mixed with arbitrary whitespace.
fn source_like() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z_][a-zA-Z0-9_]{0,6}",
        "[0-9]{1,4}(\\.[0-9]{1,3})?[fdmLU]?",
        "[-+*/%=<>!&|^?:.,;(){}\\[\\]~]{1,3}",
        "\"[a-z {}]{0,6}\"",
        "@\"[a-z\"]{0,6}\"",
        "\\$\"[a-z]{0,3}(\\{[a-z]{1,3}\\})?\"",
        "'[a-z]'",
        "//[a-z ]{0,8}\n",
        "/\\*[a-z \n]{0,8}\\*/",
        "\n#(if|region|endregion|pragma) [a-zA-Z ]{0,8}\n",
        "[ \t\r\n]{1,3}",
        "[\u{00C0}-\u{00FF}\u{0600}-\u{0620}`]{1,2}",
    ];
    prop::collection::vec(piece, 0..40).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn render_reproduces_source(source in source_like()) {
        let tokens = lex(&source);
        prop_assert_eq!(render_tokens(&tokens), source);
    }

    #[test]
    fn arbitrary_text_is_lossless(source in "\\PC{0,64}") {
        prop_assert_eq!(render_tokens(&lex(&source)), source);
    }

    #[test]
    fn exactly_one_trailing_eof(source in source_like()) {
        let tokens = lex(&source);
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn trailing_trivia_has_at_most_one_newline(source in source_like()) {
        for token in lex(&source) {
            let newlines = token
                .trailing
                .iter()
                .filter(|t| t.kind == squash_ir::TriviaKind::Newline)
                .count();
            prop_assert!(newlines <= 1);
        }
    }
}
