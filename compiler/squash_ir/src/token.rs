//! Token types for the script dialect.
//!
//! A [`Token`] is one significant lexical unit together with the trivia
//! (whitespace, comments, directive lines) around it and the region flags
//! it inherited from enclosing `#region` annotations. Rendering every token
//! of a document in order (leading trivia, text, trailing trivia) reproduces
//! the document byte for byte.

use std::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use smallvec::SmallVec;

use crate::Span;

/// Token kinds.
///
/// Fieldless so that kind pairs can key the compactor's collision table.
/// Keywords share one kind; the token text tells them apart.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Words
    Ident,
    Keyword,

    // Literals
    Int,
    Real,
    Char,
    String,
    VerbatimString,
    InterpolatedString,

    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,

    // Punctuation
    Dot,
    DotDot,
    Comma,
    Colon,
    ColonColon,
    Semicolon,
    Question,
    QuestionQuestion,
    QuestionQuestionEq,

    // Operators
    Plus,
    PlusPlus,
    PlusEq,
    Minus,
    MinusMinus,
    MinusEq,
    Arrow,
    Star,
    StarEq,
    Slash,
    SlashEq,
    Percent,
    PercentEq,
    Amp,
    AmpAmp,
    AmpEq,
    Pipe,
    PipePipe,
    PipeEq,
    Caret,
    CaretEq,
    Bang,
    BangEq,
    Tilde,
    Eq,
    EqEq,
    FatArrow,
    Lt,
    LtEq,
    Shl,
    ShlEq,
    Gt,
    GtEq,

    // Special
    /// Byte sequence the lexer could not classify.
    Unknown,
    /// End of document; carries the document's final trivia.
    Eof,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 58] = [
        TokenKind::Ident,
        TokenKind::Keyword,
        TokenKind::Int,
        TokenKind::Real,
        TokenKind::Char,
        TokenKind::String,
        TokenKind::VerbatimString,
        TokenKind::InterpolatedString,
        TokenKind::LBrace,
        TokenKind::RBrace,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LBracket,
        TokenKind::RBracket,
        TokenKind::Dot,
        TokenKind::DotDot,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::ColonColon,
        TokenKind::Semicolon,
        TokenKind::Question,
        TokenKind::QuestionQuestion,
        TokenKind::QuestionQuestionEq,
        TokenKind::Plus,
        TokenKind::PlusPlus,
        TokenKind::PlusEq,
        TokenKind::Minus,
        TokenKind::MinusMinus,
        TokenKind::MinusEq,
        TokenKind::Arrow,
        TokenKind::Star,
        TokenKind::StarEq,
        TokenKind::Slash,
        TokenKind::SlashEq,
        TokenKind::Percent,
        TokenKind::PercentEq,
        TokenKind::Amp,
        TokenKind::AmpAmp,
        TokenKind::AmpEq,
        TokenKind::Pipe,
        TokenKind::PipePipe,
        TokenKind::PipeEq,
        TokenKind::Caret,
        TokenKind::CaretEq,
        TokenKind::Bang,
        TokenKind::BangEq,
        TokenKind::Tilde,
        TokenKind::Eq,
        TokenKind::EqEq,
        TokenKind::FatArrow,
        TokenKind::Lt,
        TokenKind::LtEq,
        TokenKind::Shl,
        TokenKind::ShlEq,
        TokenKind::Gt,
        TokenKind::GtEq,
        TokenKind::Unknown,
        TokenKind::Eof,
    ];

    /// Number of kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Fixed spelling for punctuation and operator kinds.
    ///
    /// Returns `None` for kinds whose text varies (words, literals) and for
    /// the special kinds.
    pub const fn lexeme(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Dot => ".",
            TokenKind::DotDot => "..",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::ColonColon => "::",
            TokenKind::Semicolon => ";",
            TokenKind::Question => "?",
            TokenKind::QuestionQuestion => "??",
            TokenKind::QuestionQuestionEq => "??=",
            TokenKind::Plus => "+",
            TokenKind::PlusPlus => "++",
            TokenKind::PlusEq => "+=",
            TokenKind::Minus => "-",
            TokenKind::MinusMinus => "--",
            TokenKind::MinusEq => "-=",
            TokenKind::Arrow => "->",
            TokenKind::Star => "*",
            TokenKind::StarEq => "*=",
            TokenKind::Slash => "/",
            TokenKind::SlashEq => "/=",
            TokenKind::Percent => "%",
            TokenKind::PercentEq => "%=",
            TokenKind::Amp => "&",
            TokenKind::AmpAmp => "&&",
            TokenKind::AmpEq => "&=",
            TokenKind::Pipe => "|",
            TokenKind::PipePipe => "||",
            TokenKind::PipeEq => "|=",
            TokenKind::Caret => "^",
            TokenKind::CaretEq => "^=",
            TokenKind::Bang => "!",
            TokenKind::BangEq => "!=",
            TokenKind::Tilde => "~",
            TokenKind::Eq => "=",
            TokenKind::EqEq => "==",
            TokenKind::FatArrow => "=>",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Shl => "<<",
            TokenKind::ShlEq => "<<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            _ => return None,
        };
        Some(text)
    }

    /// Identifier or keyword.
    #[inline]
    pub const fn is_word(self) -> bool {
        matches!(self, TokenKind::Ident | TokenKind::Keyword)
    }

    /// Integer or real literal.
    #[inline]
    pub const fn is_number(self) -> bool {
        matches!(self, TokenKind::Int | TokenKind::Real)
    }

    /// Any literal.
    #[inline]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Int
                | TokenKind::Real
                | TokenKind::Char
                | TokenKind::String
                | TokenKind::VerbatimString
                | TokenKind::InterpolatedString
        )
    }

    /// String-like literal.
    #[inline]
    pub const fn is_string(self) -> bool {
        matches!(
            self,
            TokenKind::String | TokenKind::VerbatimString | TokenKind::InterpolatedString
        )
    }

    /// Punctuation or operator with a fixed spelling.
    #[inline]
    pub const fn is_punct(self) -> bool {
        self.lexeme().is_some()
    }

    /// Assignment-family operator (`=`, `+=`, `??=`, ...).
    pub const fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Eq
                | TokenKind::PlusEq
                | TokenKind::MinusEq
                | TokenKind::StarEq
                | TokenKind::SlashEq
                | TokenKind::PercentEq
                | TokenKind::AmpEq
                | TokenKind::PipeEq
                | TokenKind::CaretEq
                | TokenKind::ShlEq
                | TokenKind::QuestionQuestionEq
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lexeme() {
            Some(text) => write!(f, "`{text}`"),
            None => write!(f, "{self:?}"),
        }
    }
}

/// Trivia kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TriviaKind {
    /// Spaces, tabs, lone carriage returns.
    Whitespace,
    /// `\n` or `\r\n`.
    Newline,
    /// `// ...` up to (not including) the newline.
    LineComment,
    /// `/* ... */`, possibly spanning lines.
    BlockComment,
    /// A whole `#...` directive line, without its newline.
    Directive,
}

/// One piece of trivia.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub text: Arc<str>,
}

impl Trivia {
    pub fn new(kind: TriviaKind, text: impl Into<Arc<str>>) -> Self {
        Trivia {
            kind,
            text: text.into(),
        }
    }

    /// A single space.
    pub fn space() -> Self {
        Trivia::new(TriviaKind::Whitespace, " ")
    }

    /// A `\n` newline.
    pub fn newline() -> Self {
        Trivia::new(TriviaKind::Newline, "\n")
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TriviaKind::LineComment | TriviaKind::BlockComment)
    }

    /// Directive keyword, e.g. `region` for `#region squash preserve`.
    pub fn directive_name(&self) -> Option<&str> {
        if self.kind != TriviaKind::Directive {
            return None;
        }
        let rest = self.text.trim_start().strip_prefix('#')?.trim_start();
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        Some(&rest[..end])
    }

    /// Text of a directive after its keyword, trimmed.
    pub fn directive_argument(&self) -> Option<&str> {
        let name = self.directive_name()?;
        let rest = self.text.trim_start().strip_prefix('#')?.trim_start();
        Some(rest[name.len()..].trim())
    }
}

/// Trivia attached to one side of a token. Most tokens carry zero to two
/// pieces (indentation, a newline).
pub type TriviaList = SmallVec<[Trivia; 2]>;

bitflags! {
    /// Region annotations inherited from enclosing `#region` directives.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct RegionFlags: u8 {
        /// Keep trivia verbatim and protect the declarations inside.
        const PRESERVE = 1 << 0;
        /// Expand `$NAME$` placeholders inside string literals.
        const MACRO_EXPAND = 1 << 1;
    }
}

/// A significant token with its trivia.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Arc<str>,
    pub leading: TriviaList,
    pub trailing: TriviaList,
    pub region: RegionFlags,
    pub span: Span,
}

impl Token {
    /// Token with no trivia and no region.
    pub fn new(kind: TokenKind, text: impl Into<Arc<str>>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            leading: TriviaList::new(),
            trailing: TriviaList::new(),
            region: RegionFlags::empty(),
            span,
        }
    }

    /// Synthesized token with a fixed spelling (`,`, `;`, ...).
    pub fn synthesized(kind: TokenKind) -> Self {
        Token::new(kind, kind.lexeme().unwrap_or_default(), Span::DUMMY)
    }

    /// End-of-document token.
    pub fn eof(pos: u32) -> Self {
        Token::new(TokenKind::Eof, "", Span::point(pos))
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Check for a keyword or contextual keyword with the given spelling.
    #[inline]
    pub fn is_word(&self, word: &str) -> bool {
        self.kind.is_word() && &*self.text == word
    }

    #[inline]
    pub fn is_preserved(&self) -> bool {
        self.region.contains(RegionFlags::PRESERVE)
    }

    /// All trivia around the token, leading first.
    pub fn trivia(&self) -> impl Iterator<Item = &Trivia> {
        self.leading.iter().chain(self.trailing.iter())
    }

    /// Append the full text (trivia included) to `out`.
    pub fn render_into(&self, out: &mut String) {
        for piece in &self.leading {
            out.push_str(&piece.text);
        }
        out.push_str(&self.text);
        for piece in &self.trailing {
            out.push_str(&piece.text);
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) @ {}", self.kind, &*self.text, self.span)
    }
}

/// Render tokens back to text.
pub fn render_tokens<'a>(tokens: impl IntoIterator<Item = &'a Token>) -> String {
    let mut out = String::new();
    for token in tokens {
        token.render_into(&mut out);
    }
    out
}
