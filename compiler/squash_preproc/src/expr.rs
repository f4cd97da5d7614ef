//! `#if` conditions.
//!
//! A condition is tokenized, converted to postfix with the shunting-yard
//! algorithm and evaluated by a stack machine. Precedence, highest first:
//! `!`, `&&`, `||`. Parentheses group.

use crate::error::ConditionalErrorKind;
use crate::MacroSet;

/// One postfix instruction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Op {
    /// Push whether the symbol is defined.
    Symbol(String),
    /// Push a `true`/`false` literal.
    Literal(bool),
    Not,
    And,
    Or,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Lexeme {
    Operand(Op),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

impl Lexeme {
    fn precedence(&self) -> u8 {
        match self {
            Lexeme::Not => 3,
            Lexeme::And => 2,
            Lexeme::Or => 1,
            _ => 0,
        }
    }

    fn spelling(&self) -> &'static str {
        match self {
            Lexeme::Not => "!",
            Lexeme::And => "&&",
            Lexeme::Or => "||",
            Lexeme::LParen => "(",
            Lexeme::RParen => ")",
            Lexeme::Operand(_) => "operand",
        }
    }

    fn into_op(self) -> Option<Op> {
        match self {
            Lexeme::Operand(op) => Some(op),
            Lexeme::Not => Some(Op::Not),
            Lexeme::And => Some(Op::And),
            Lexeme::Or => Some(Op::Or),
            Lexeme::LParen | Lexeme::RParen => None,
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Lexeme>, ConditionalErrorKind> {
    let mut out = Vec::new();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        let lexeme = match c {
            c if c.is_whitespace() => continue,
            '/' if text[i..].starts_with("//") => break,
            '(' => Lexeme::LParen,
            ')' => Lexeme::RParen,
            '!' => Lexeme::Not,
            '&' if chars.next_if(|&(_, n)| n == '&').is_some() => Lexeme::And,
            '|' if chars.next_if(|&(_, n)| n == '|').is_some() => Lexeme::Or,
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i + c.len_utf8();
                while let Some((j, n)) = chars.next_if(|&(_, n)| n.is_alphanumeric() || n == '_') {
                    end = j + n.len_utf8();
                }
                let op = match &text[i..end] {
                    "true" => Op::Literal(true),
                    "false" => Op::Literal(false),
                    name => Op::Symbol(name.to_owned()),
                };
                Lexeme::Operand(op)
            }
            c => return Err(ConditionalErrorKind::UnexpectedChar(c)),
        };
        out.push(lexeme);
    }
    Ok(out)
}

/// A condition in postfix form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Condition {
    postfix: Vec<Op>,
}

impl Condition {
    /// Parse the text after `#if` or `#elif`. A trailing `//` comment is
    /// ignored.
    pub fn parse(text: &str) -> Result<Condition, ConditionalErrorKind> {
        let lexemes = tokenize(text)?;
        if lexemes.is_empty() {
            return Err(ConditionalErrorKind::EmptyExpression);
        }

        let mut postfix = Vec::with_capacity(lexemes.len());
        let mut operators: Vec<Lexeme> = Vec::new();
        // Whether the next lexeme must start an operand.
        let mut want_operand = true;

        for lexeme in lexemes {
            match lexeme {
                Lexeme::Operand(op) => {
                    if !want_operand {
                        return Err(ConditionalErrorKind::MissingOperator(describe(&op)));
                    }
                    postfix.push(op);
                    want_operand = false;
                }
                Lexeme::Not | Lexeme::LParen => {
                    if !want_operand {
                        return Err(ConditionalErrorKind::MissingOperator(
                            lexeme.spelling().to_owned(),
                        ));
                    }
                    operators.push(lexeme);
                }
                Lexeme::And | Lexeme::Or => {
                    if want_operand {
                        return Err(ConditionalErrorKind::DanglingOperator(lexeme.spelling()));
                    }
                    while let Some(top) = operators.last() {
                        if *top == Lexeme::LParen || top.precedence() < lexeme.precedence() {
                            break;
                        }
                        if let Some(op) = operators.pop().and_then(Lexeme::into_op) {
                            postfix.push(op);
                        }
                    }
                    operators.push(lexeme);
                    want_operand = true;
                }
                Lexeme::RParen => {
                    if want_operand {
                        return Err(match operators.last() {
                            Some(Lexeme::LParen) | None => ConditionalErrorKind::EmptyExpression,
                            Some(top) => ConditionalErrorKind::DanglingOperator(top.spelling()),
                        });
                    }
                    loop {
                        match operators.pop() {
                            Some(Lexeme::LParen) => break,
                            Some(top) => postfix.extend(top.into_op()),
                            None => return Err(ConditionalErrorKind::UnbalancedParens),
                        }
                    }
                }
            }
        }

        if want_operand {
            return Err(match operators.last() {
                Some(top) if *top != Lexeme::LParen => {
                    ConditionalErrorKind::DanglingOperator(top.spelling())
                }
                _ => ConditionalErrorKind::UnbalancedParens,
            });
        }
        while let Some(top) = operators.pop() {
            match top.into_op() {
                Some(op) => postfix.push(op),
                None => return Err(ConditionalErrorKind::UnbalancedParens),
            }
        }
        Ok(Condition { postfix })
    }

    pub fn postfix(&self) -> &[Op] {
        &self.postfix
    }

    /// Run the stack machine against the active symbols.
    pub fn evaluate(&self, active: &MacroSet) -> bool {
        let mut stack: Vec<bool> = Vec::with_capacity(self.postfix.len());
        for op in &self.postfix {
            let value = match op {
                Op::Symbol(name) => active.contains(name),
                Op::Literal(value) => *value,
                Op::Not => !stack.pop().unwrap_or(false),
                Op::And => {
                    let rhs = stack.pop().unwrap_or(false);
                    let lhs = stack.pop().unwrap_or(false);
                    lhs && rhs
                }
                Op::Or => {
                    let rhs = stack.pop().unwrap_or(false);
                    let lhs = stack.pop().unwrap_or(false);
                    lhs || rhs
                }
            };
            stack.push(value);
        }
        stack.pop().unwrap_or(false)
    }
}

fn describe(op: &Op) -> String {
    match op {
        Op::Symbol(name) => name.clone(),
        Op::Literal(value) => value.to_string(),
        Op::Not => "!".to_owned(),
        Op::And => "&&".to_owned(),
        Op::Or => "||".to_owned(),
    }
}
