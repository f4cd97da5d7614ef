//! Raw Token Definition
//!
//! The `RawToken` enum is the logos-derived tokenizer output before trivia
//! attachment. Trivia are ordinary raw tokens here; [`crate::lex`] sorts
//! them into leading and trailing lists.

use logos::{Lexer, Logos};
use squash_ir::{TokenKind, TriviaKind};

use crate::interpolated::scan_interpolated;

/// Raw token from logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RawToken {
    // Trivia
    #[regex(r"[ \t\x0B\x0C\x{FEFF}]+")]
    #[token("\r")]
    Whitespace,
    #[regex(r"\r?\n")]
    Newline,
    #[regex(r"//[^\r\n]*")]
    LineComment,
    #[token("/*", lex_block_comment)]
    BlockComment,
    #[regex(r"#[^\r\n]*")]
    Directive,

    // Identifier or keyword; `@` escapes a keyword
    #[regex(r"@?[\p{L}_][\p{L}\p{N}_]*")]
    Word,

    // Literals
    #[regex(r"0[xX][0-9a-fA-F_]+([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"0[bB][01_]+([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"[0-9][0-9_]*([uU][lL]?|[lL][uU]?)?")]
    Int,
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[fFdDmM]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[fFdDmM]")]
    Real,
    #[regex(r"'([^'\\\r\n]|\\[^\r\n])+'")]
    Char,
    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    String,
    #[regex(r#"@"([^"]|"")*""#)]
    VerbatimString,
    #[token("$\"", lex_interpolated)]
    #[token("$@\"", lex_interpolated)]
    #[token("@$\"", lex_interpolated)]
    InterpolatedString,

    // Delimiters
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Punctuation
    #[token(".")]
    Dot,
    #[token("..")]
    DotDot,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(";")]
    Semicolon,
    #[token("?")]
    Question,
    #[token("??")]
    QuestionQuestion,
    #[token("??=")]
    QuestionQuestionEq,

    // Operators
    #[token("+")]
    Plus,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEq,
    #[token("-")]
    Minus,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEq,
    #[token("->")]
    Arrow,
    #[token("*")]
    Star,
    #[token("*=")]
    StarEq,
    #[token("/")]
    Slash,
    #[token("/=")]
    SlashEq,
    #[token("%")]
    Percent,
    #[token("%=")]
    PercentEq,
    #[token("&")]
    Amp,
    #[token("&&")]
    AmpAmp,
    #[token("&=")]
    AmpEq,
    #[token("|")]
    Pipe,
    #[token("||")]
    PipePipe,
    #[token("|=")]
    PipeEq,
    #[token("^")]
    Caret,
    #[token("^=")]
    CaretEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("=>")]
    FatArrow,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token("<<")]
    Shl,
    #[token("<<=")]
    ShlEq,
    // No `>>`: generic argument lists close with consecutive `>` tokens.
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
}

fn lex_interpolated(lex: &mut Lexer<RawToken>) -> bool {
    let verbatim = lex.slice().contains('@');
    match scan_interpolated(lex.remainder(), verbatim) {
        Some(len) => {
            lex.bump(len);
            true
        }
        None => false,
    }
}

/// Block comments do not nest; the first `*/` closes. An unterminated
/// comment is left to the error path.
fn lex_block_comment(lex: &mut Lexer<RawToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => false,
    }
}

/// A raw token sorted into trivia or significant token.
pub(crate) enum Piece {
    Trivia(TriviaKind),
    Token(TokenKind),
}

impl RawToken {
    pub(crate) fn classify(self, slice: &str) -> Piece {
        let kind = match self {
            RawToken::Whitespace => return Piece::Trivia(TriviaKind::Whitespace),
            RawToken::Newline => return Piece::Trivia(TriviaKind::Newline),
            RawToken::LineComment => return Piece::Trivia(TriviaKind::LineComment),
            RawToken::BlockComment => return Piece::Trivia(TriviaKind::BlockComment),
            RawToken::Directive => return Piece::Trivia(TriviaKind::Directive),

            RawToken::Word if crate::keywords::is_reserved(slice) => TokenKind::Keyword,
            RawToken::Word => TokenKind::Ident,

            RawToken::Int => TokenKind::Int,
            RawToken::Real => TokenKind::Real,
            RawToken::Char => TokenKind::Char,
            RawToken::String => TokenKind::String,
            RawToken::VerbatimString => TokenKind::VerbatimString,
            RawToken::InterpolatedString => TokenKind::InterpolatedString,

            RawToken::LBrace => TokenKind::LBrace,
            RawToken::RBrace => TokenKind::RBrace,
            RawToken::LParen => TokenKind::LParen,
            RawToken::RParen => TokenKind::RParen,
            RawToken::LBracket => TokenKind::LBracket,
            RawToken::RBracket => TokenKind::RBracket,

            RawToken::Dot => TokenKind::Dot,
            RawToken::DotDot => TokenKind::DotDot,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Colon => TokenKind::Colon,
            RawToken::ColonColon => TokenKind::ColonColon,
            RawToken::Semicolon => TokenKind::Semicolon,
            RawToken::Question => TokenKind::Question,
            RawToken::QuestionQuestion => TokenKind::QuestionQuestion,
            RawToken::QuestionQuestionEq => TokenKind::QuestionQuestionEq,

            RawToken::Plus => TokenKind::Plus,
            RawToken::PlusPlus => TokenKind::PlusPlus,
            RawToken::PlusEq => TokenKind::PlusEq,
            RawToken::Minus => TokenKind::Minus,
            RawToken::MinusMinus => TokenKind::MinusMinus,
            RawToken::MinusEq => TokenKind::MinusEq,
            RawToken::Arrow => TokenKind::Arrow,
            RawToken::Star => TokenKind::Star,
            RawToken::StarEq => TokenKind::StarEq,
            RawToken::Slash => TokenKind::Slash,
            RawToken::SlashEq => TokenKind::SlashEq,
            RawToken::Percent => TokenKind::Percent,
            RawToken::PercentEq => TokenKind::PercentEq,
            RawToken::Amp => TokenKind::Amp,
            RawToken::AmpAmp => TokenKind::AmpAmp,
            RawToken::AmpEq => TokenKind::AmpEq,
            RawToken::Pipe => TokenKind::Pipe,
            RawToken::PipePipe => TokenKind::PipePipe,
            RawToken::PipeEq => TokenKind::PipeEq,
            RawToken::Caret => TokenKind::Caret,
            RawToken::CaretEq => TokenKind::CaretEq,
            RawToken::Bang => TokenKind::Bang,
            RawToken::BangEq => TokenKind::BangEq,
            RawToken::Tilde => TokenKind::Tilde,
            RawToken::Eq => TokenKind::Eq,
            RawToken::EqEq => TokenKind::EqEq,
            RawToken::FatArrow => TokenKind::FatArrow,
            RawToken::Lt => TokenKind::Lt,
            RawToken::LtEq => TokenKind::LtEq,
            RawToken::Shl => TokenKind::Shl,
            RawToken::ShlEq => TokenKind::ShlEq,
            RawToken::Gt => TokenKind::Gt,
            RawToken::GtEq => TokenKind::GtEq,
        };
        Piece::Token(kind)
    }
}
