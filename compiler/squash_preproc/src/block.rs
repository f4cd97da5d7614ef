//! Conditional block tree.
//!
//! Lines are either opaque text or one of the four conditional directives.
//! Directive nesting is mirrored by [`Conditional`] nodes; `#elif` and
//! `#else` fill the else slot of the conditional they continue.

use crate::error::{ConditionalErrorKind, MalformedConditionalError};
use crate::expr::Condition;

/// A node of the block tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node<'s> {
    /// Consecutive non-directive lines, terminators included.
    Text(&'s str),
    Conditional(Conditional<'s>),
}

/// `#if`/`#elif` with its branch and the else slot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conditional<'s> {
    pub condition: Condition,
    /// 1-based line of the directive.
    pub line: usize,
    pub then: Vec<Node<'s>>,
    pub otherwise: Option<Else<'s>>,
}

/// Else slot of a conditional.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Else<'s> {
    /// `#elif`.
    If(Box<Conditional<'s>>),
    /// `#else`.
    Block(Vec<Node<'s>>),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Directive<'s> {
    If(&'s str),
    Elif(&'s str),
    Else,
    Endif,
}

impl Directive<'_> {
    fn name(self) -> &'static str {
        match self {
            Directive::If(_) => "if",
            Directive::Elif(_) => "elif",
            Directive::Else => "else",
            Directive::Endif => "endif",
        }
    }
}

/// Classify a line as a conditional directive.
fn directive(line: &str) -> Option<Directive<'_>> {
    let rest = line.trim_start().strip_prefix('#')?.trim_start();
    let end = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let argument = rest[end..].trim_end_matches(['\r', '\n']);
    match &rest[..end] {
        "if" => Some(Directive::If(argument)),
        "elif" => Some(Directive::Elif(argument)),
        "else" => Some(Directive::Else),
        "endif" => Some(Directive::Endif),
        _ => None,
    }
}

/// An arm collected while its conditional is still open.
struct Arm<'s> {
    /// `None` for `#else`.
    condition: Option<(Condition, usize)>,
    body: Vec<Node<'s>>,
}

struct Frame<'s> {
    line: usize,
    arms: Vec<Arm<'s>>,
}

impl<'s> Frame<'s> {
    fn has_else(&self) -> bool {
        self.arms.last().is_some_and(|arm| arm.condition.is_none())
    }

    /// Fold the arms into a conditional, last arm innermost.
    fn close(self) -> Option<Conditional<'s>> {
        let mut otherwise = None;
        for arm in self.arms.into_iter().rev() {
            otherwise = Some(match arm.condition {
                None => Else::Block(arm.body),
                Some((condition, line)) => Else::If(Box::new(Conditional {
                    condition,
                    line,
                    then: arm.body,
                    otherwise: otherwise.take(),
                })),
            });
        }
        match otherwise {
            Some(Else::If(conditional)) => Some(*conditional),
            _ => None,
        }
    }
}

/// Parse `source` into a block tree.
pub fn parse_blocks(source: &str) -> Result<Vec<Node<'_>>, MalformedConditionalError> {
    let mut root: Vec<Node<'_>> = Vec::new();
    let mut stack: Vec<Frame<'_>> = Vec::new();
    // Byte offset where the pending text run starts, if any.
    let mut text_start: Option<usize> = None;
    let mut offset = 0;

    for (i, line) in source.split_inclusive('\n').enumerate() {
        let number = i + 1;
        let line_start = offset;
        offset += line.len();

        let Some(directive) = directive(line) else {
            text_start.get_or_insert(line_start);
            continue;
        };
        if let Some(start) = text_start.take() {
            body(&mut root, &mut stack).push(Node::Text(&source[start..line_start]));
        }

        let error = |kind| MalformedConditionalError::new(kind, number);
        match directive {
            Directive::If(text) => {
                let condition = Condition::parse(text).map_err(error)?;
                stack.push(Frame {
                    line: number,
                    arms: vec![Arm {
                        condition: Some((condition, number)),
                        body: Vec::new(),
                    }],
                });
            }
            Directive::Elif(text) => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| error(ConditionalErrorKind::Unopened(directive.name())))?;
                if frame.has_else() {
                    return Err(error(ConditionalErrorKind::ElifAfterElse));
                }
                let condition = Condition::parse(text).map_err(error)?;
                frame.arms.push(Arm {
                    condition: Some((condition, number)),
                    body: Vec::new(),
                });
            }
            Directive::Else => {
                let frame = stack
                    .last_mut()
                    .ok_or_else(|| error(ConditionalErrorKind::Unopened(directive.name())))?;
                if frame.has_else() {
                    return Err(error(ConditionalErrorKind::DuplicateElse));
                }
                frame.arms.push(Arm {
                    condition: None,
                    body: Vec::new(),
                });
            }
            Directive::Endif => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| error(ConditionalErrorKind::Unopened(directive.name())))?;
                if let Some(conditional) = frame.close() {
                    body(&mut root, &mut stack).push(Node::Conditional(conditional));
                }
            }
        }
    }

    if let Some(frame) = stack.last() {
        return Err(MalformedConditionalError::new(
            ConditionalErrorKind::MissingEndif,
            frame.line,
        ));
    }
    if let Some(start) = text_start {
        root.push(Node::Text(&source[start..]));
    }
    Ok(root)
}

/// Body that new nodes go into: the last arm of the innermost open
/// conditional, or the document root.
fn body<'a, 's>(root: &'a mut Vec<Node<'s>>, stack: &'a mut [Frame<'s>]) -> &'a mut Vec<Node<'s>> {
    match stack.last_mut().and_then(|frame| frame.arms.last_mut()) {
        Some(arm) => &mut arm.body,
        None => root,
    }
}

#[cfg(test)]
mod tests;
