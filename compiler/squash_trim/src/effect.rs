//! Side-effect rule for initializers.
//!
//! An initializer is effect-free only when every token is a literal, one
//! of `null`/`true`/`false`/`default`, a parenthesis or a non-assigning
//! operator. Identifiers, calls, `new`, assignments, increments and lambdas
//! all count as effects. Interpolated strings with holes can call code and
//! count too.

use squash_ir::{Decl, Token, TokenKind};

/// Whether evaluating `tokens` could have an observable effect.
pub fn has_side_effect(tokens: &[Token]) -> bool {
    tokens.iter().any(|token| !is_inert(token))
}

/// Whether a declaration's initializer may have effects. Declarations
/// without an initializer have none.
pub fn initializer_has_side_effect(decl: &Decl) -> bool {
    has_side_effect(decl.initializer_tokens())
}

fn is_inert(token: &Token) -> bool {
    match token.kind {
        TokenKind::Int
        | TokenKind::Real
        | TokenKind::Char
        | TokenKind::String
        | TokenKind::VerbatimString => true,
        TokenKind::InterpolatedString => !token.text.contains('{'),
        TokenKind::Keyword => matches!(&*token.text, "null" | "true" | "false" | "default"),
        TokenKind::LParen
        | TokenKind::RParen
        | TokenKind::Plus
        | TokenKind::Minus
        | TokenKind::Star
        | TokenKind::Slash
        | TokenKind::Percent
        | TokenKind::Amp
        | TokenKind::AmpAmp
        | TokenKind::Pipe
        | TokenKind::PipePipe
        | TokenKind::Caret
        | TokenKind::Bang
        | TokenKind::Tilde
        | TokenKind::EqEq
        | TokenKind::BangEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq
        | TokenKind::Shl
        | TokenKind::Question
        | TokenKind::Colon
        | TokenKind::QuestionQuestion => true,
        _ => false,
    }
}
