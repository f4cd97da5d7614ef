use super::*;
use pretty_assertions::assert_eq;
use squash_ir::render_tokens;

fn kinds(source: &str) -> Vec<(TokenKind, String)> {
    relex(source)
        .into_iter()
        .map(|(kind, text)| (kind, text.to_string()))
        .collect()
}

fn k(kind: TokenKind, text: &str) -> (TokenKind, String) {
    (kind, text.to_owned())
}

#[test]
fn words_and_keywords() {
    assert_eq!(
        kinds("public partial class Foo : @class"),
        [
            k(TokenKind::Keyword, "public"),
            k(TokenKind::Ident, "partial"),
            k(TokenKind::Keyword, "class"),
            k(TokenKind::Ident, "Foo"),
            k(TokenKind::Colon, ":"),
            k(TokenKind::Ident, "@class"),
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("1 0xFFu 0b1010 1.5f .5 1e3 2d 10UL 1.ToString()"),
        [
            k(TokenKind::Int, "1"),
            k(TokenKind::Int, "0xFFu"),
            k(TokenKind::Int, "0b1010"),
            k(TokenKind::Real, "1.5f"),
            k(TokenKind::Real, ".5"),
            k(TokenKind::Real, "1e3"),
            k(TokenKind::Real, "2d"),
            k(TokenKind::Int, "10UL"),
            k(TokenKind::Int, "1"),
            k(TokenKind::Dot, "."),
            k(TokenKind::Ident, "ToString"),
            k(TokenKind::LParen, "("),
            k(TokenKind::RParen, ")"),
        ]
    );
}

#[test]
fn string_forms() {
    assert_eq!(
        kinds(r#""a\"b" @"c""d" $"{x}" $@"{y}" 'z' '\''"#),
        [
            k(TokenKind::String, r#""a\"b""#),
            k(TokenKind::VerbatimString, r#"@"c""d""#),
            k(TokenKind::InterpolatedString, r#"$"{x}""#),
            k(TokenKind::InterpolatedString, r#"$@"{y}""#),
            k(TokenKind::Char, "'z'"),
            k(TokenKind::Char, r"'\''"),
        ]
    );
}

#[test]
fn longest_operator_wins() {
    assert_eq!(
        kinds("a ??= b << c <<= d -> e => f"),
        [
            k(TokenKind::Ident, "a"),
            k(TokenKind::QuestionQuestionEq, "??="),
            k(TokenKind::Ident, "b"),
            k(TokenKind::Shl, "<<"),
            k(TokenKind::Ident, "c"),
            k(TokenKind::ShlEq, "<<="),
            k(TokenKind::Ident, "d"),
            k(TokenKind::Arrow, "->"),
            k(TokenKind::Ident, "e"),
            k(TokenKind::FatArrow, "=>"),
            k(TokenKind::Ident, "f"),
        ]
    );
}

#[test]
fn closing_generics_are_single_gt() {
    let tokens = kinds("List<List<int>>");
    assert_eq!(tokens[tokens.len() - 1], k(TokenKind::Gt, ">"));
    assert_eq!(tokens[tokens.len() - 2], k(TokenKind::Gt, ">"));
}

#[test]
fn trailing_trivia_stops_after_newline() {
    let tokens = lex("a; // note\n  // lead\n  b");
    let semi = &tokens[1];
    assert_eq!(semi.kind, TokenKind::Semicolon);
    let trailing: Vec<&str> = semi.trailing.iter().map(|t| &*t.text).collect();
    assert_eq!(trailing, [" ", "// note", "\n"]);

    let b = &tokens[2];
    let leading: Vec<TriviaKind> = b.leading.iter().map(|t| t.kind).collect();
    assert_eq!(
        leading,
        [
            TriviaKind::Whitespace,
            TriviaKind::LineComment,
            TriviaKind::Newline,
            TriviaKind::Whitespace,
        ]
    );
}

#[test]
fn directives_are_line_trivia() {
    let tokens = lex("#region squash preserve\nint x;\n#endregion\n");
    let int = &tokens[0];
    assert_eq!(int.leading[0].kind, TriviaKind::Directive);
    assert_eq!(int.leading[0].directive_argument(), Some("squash preserve"));

    let eof = tokens.last().map(|t| t.kind);
    assert_eq!(eof, Some(TokenKind::Eof));
    let eof_trivia: Vec<&str> = tokens[tokens.len() - 1]
        .leading
        .iter()
        .map(|t| &*t.text)
        .collect();
    assert_eq!(eof_trivia, ["#endregion", "\n"]);
}

#[test]
fn crlf_is_one_newline() {
    let tokens = lex("a\r\nb");
    assert_eq!(tokens[0].trailing[0].text.as_ref(), "\r\n");
    assert_eq!(tokens[0].trailing[0].kind, TriviaKind::Newline);
}

#[test]
fn block_comments_span_lines() {
    let tokens = lex("a /* x\n * y */ b");
    assert_eq!(tokens[0].trailing[1].kind, TriviaKind::BlockComment);
    assert_eq!(tokens[1].text.as_ref(), "b");
}

#[test]
fn block_comment_forms() {
    for comment in ["/***/", "/* a * b */", "/** doc */", "/*\n * one\n * two\n */", "/**/"] {
        let source = format!("a {comment} b");
        assert_eq!(
            kinds(&source),
            [k(TokenKind::Ident, "a"), k(TokenKind::Ident, "b")],
            "{comment:?}"
        );
        let tokens = lex(&source);
        assert_eq!(tokens[0].trailing[1].kind, TriviaKind::BlockComment);
        assert_eq!(tokens[0].trailing[1].text.as_ref(), comment);
    }
}

#[test]
fn first_close_ends_a_block_comment() {
    assert_eq!(
        kinds("a /* x */ * / b"),
        [
            k(TokenKind::Ident, "a"),
            k(TokenKind::Star, "*"),
            k(TokenKind::Slash, "/"),
            k(TokenKind::Ident, "b"),
        ]
    );
}

#[test]
fn unterminated_block_comment_is_unknown() {
    let tokens = lex("a /* open");
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert!(tokens[1].text.starts_with("/*"));
    assert_eq!(render_tokens(&tokens), "a /* open");
}

#[test]
fn unknown_bytes_are_glued() {
    let tokens = lex("a ``\u{00A7} b");
    assert_eq!(tokens[1].kind, TokenKind::Unknown);
    assert_eq!(tokens[1].text.as_ref(), "``\u{00A7}");
    assert_eq!(tokens[2].text.as_ref(), "b");
}

#[test]
fn empty_source_is_just_eof() {
    let tokens = lex("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn render_is_lossless() {
    let source = "using System;\r\n\n// c\nclass A { int x = $\"{1}\"; } /* tail */\n\n";
    assert_eq!(render_tokens(&lex(source)), source);
}

#[test]
fn spans_cover_text() {
    let source = "int  value = 42;";
    for token in lex(source) {
        let range = token.span.start as usize..token.span.end as usize;
        assert_eq!(&source[range], token.text.as_ref());
    }
}
