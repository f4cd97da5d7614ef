//! Conditional directive errors.

use thiserror::Error;

/// Why a conditional block is malformed.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConditionalErrorKind {
    #[error("`#{0}` without a matching `#if`")]
    Unopened(&'static str),

    #[error("`#elif` after `#else`")]
    ElifAfterElse,

    #[error("duplicate `#else`")]
    DuplicateElse,

    #[error("`#if` is never closed by `#endif`")]
    MissingEndif,

    #[error("empty condition")]
    EmptyExpression,

    #[error("unbalanced parentheses in condition")]
    UnbalancedParens,

    #[error("operator `{0}` is missing an operand")]
    DanglingOperator(&'static str),

    #[error("expected an operator before `{0}`")]
    MissingOperator(String),

    #[error("unexpected character `{0}` in condition")]
    UnexpectedChar(char),
}

/// Malformed `#if` nesting or condition, with the 1-based line it was
/// found on.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
#[error("line {line}: {kind}")]
pub struct MalformedConditionalError {
    pub kind: ConditionalErrorKind,
    pub line: usize,
}

impl MalformedConditionalError {
    pub fn new(kind: ConditionalErrorKind, line: usize) -> Self {
        MalformedConditionalError { kind, line }
    }
}
