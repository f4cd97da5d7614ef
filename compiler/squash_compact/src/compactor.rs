//! Single forward scan over a token stream.
//!
//! The scan looks at one gap at a time: the trailing trivia of the previous
//! token plus the leading trivia of the next one. Each side of the gap is
//! rewritten according to who owns it (a preserved token keeps its trivia)
//! and the mode, then the collision table decides whether the two texts
//! may touch. The rebuilt gap is split back at its first newline, the way
//! the lexer attaches trivia, so the output has exactly one token per input
//! token.

use squash_ir::{Token, Trivia, TriviaKind, TriviaList};

use crate::collision::lookup_separator;
use crate::{CompactError, CompactMode};

pub(crate) struct Compactor {
    mode: CompactMode,
    /// Nothing but whitespace has been written since the last newline.
    line_start: bool,
    /// Spaces synthesized to keep colliding tokens apart.
    separators: usize,
}

impl Compactor {
    pub(crate) fn new(mode: CompactMode) -> Self {
        Compactor {
            mode,
            line_start: true,
            separators: 0,
        }
    }

    pub(crate) fn separators(&self) -> usize {
        self.separators
    }

    pub(crate) fn run(&mut self, tokens: &[Token]) -> Result<Vec<Token>, CompactError> {
        let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
        for i in 0..=tokens.len() {
            let prev = i.checked_sub(1).and_then(|p| tokens.get(p));
            let cur = tokens.get(i);
            let gap = self.gap(prev, cur)?;

            match (out.last_mut(), cur) {
                (Some(last), Some(cur)) => {
                    let (trailing, leading) = split_gap(gap);
                    last.trailing = trailing;
                    out.push(rebuilt(cur, leading));
                }
                (None, Some(cur)) => out.push(rebuilt(cur, gap.into_iter().collect())),
                (Some(last), None) => last.trailing = gap.into_iter().collect(),
                (None, None) => {}
            }

            if cur.is_some_and(|t| !t.text.is_empty()) {
                self.line_start = false;
            }
        }
        Ok(out)
    }

    /// Rebuild the trivia between `prev` and `cur`.
    fn gap(&mut self, prev: Option<&Token>, cur: Option<&Token>) -> Result<Vec<Trivia>, CompactError> {
        let mut out = Vec::new();
        if let Some(prev) = prev {
            self.segment(&prev.trailing, prev.is_preserved(), &mut out);
        }
        let Some(cur) = cur else {
            return Ok(out);
        };

        let entering_preserved = cur.is_preserved() && !prev.is_some_and(Token::is_preserved);
        if entering_preserved && !self.line_start {
            self.emit(Trivia::newline(), &mut out);
        }
        self.segment(&cur.leading, cur.is_preserved(), &mut out);

        if !cur.text.is_empty() && out.last().is_some_and(ends_line) {
            self.emit(Trivia::newline(), &mut out);
        }

        if let Some(prev) = prev {
            let separator =
                lookup_separator(prev.kind, cur.kind).ok_or(CompactError::MissingCollisionEntry {
                    left: prev.kind,
                    right: cur.kind,
                    span: cur.span,
                })?;
            if out.is_empty() && separator.needs_space() {
                self.separators += 1;
                self.emit(Trivia::space(), &mut out);
            }
        }
        Ok(out)
    }

    /// Rewrite the trivia on one side of a gap.
    fn segment(&mut self, pieces: &[Trivia], preserved: bool, out: &mut Vec<Trivia>) {
        if preserved {
            self.strip(pieces, is_region_directive, out);
            return;
        }
        match self.mode {
            CompactMode::StripComments => {
                self.strip(pieces, |p| p.is_comment() || is_region_directive(p), out);
            }
            CompactMode::Full => self.keep_directives(pieces, out),
        }
    }

    /// Drop `removable` pieces together with the whitespace in front of
    /// them. A line that held only removed pieces disappears along with its
    /// newline.
    fn strip(&mut self, pieces: &[Trivia], removable: fn(&Trivia) -> bool, out: &mut Vec<Trivia>) {
        let mut line: Vec<Trivia> = Vec::new();
        let mut from_line_start = self.line_start;
        let mut removed = false;

        for piece in pieces {
            if removable(piece) {
                while line.last().is_some_and(|p| p.kind == TriviaKind::Whitespace) {
                    line.pop();
                }
                removed = true;
                continue;
            }
            line.push(piece.clone());
            if piece.kind != TriviaKind::Newline {
                continue;
            }
            let blank = removed
                && from_line_start
                && line
                    .iter()
                    .all(|p| matches!(p.kind, TriviaKind::Whitespace | TriviaKind::Newline));
            if blank {
                line.clear();
            } else {
                for piece in line.drain(..) {
                    self.emit(piece, out);
                }
            }
            from_line_start = true;
            removed = false;
        }
        for piece in line {
            self.emit(piece, out);
        }
    }

    /// Keep directive lines, each on a line of its own; drop the rest.
    fn keep_directives(&mut self, pieces: &[Trivia], out: &mut Vec<Trivia>) {
        let directives = pieces
            .iter()
            .filter(|p| p.kind == TriviaKind::Directive && !is_region_directive(p));
        for directive in directives {
            if !self.line_start {
                self.emit(Trivia::newline(), out);
            }
            self.emit(directive.clone(), out);
            self.emit(Trivia::newline(), out);
        }
    }

    fn emit(&mut self, piece: Trivia, out: &mut Vec<Trivia>) {
        self.line_start = match piece.kind {
            TriviaKind::Newline => true,
            TriviaKind::Whitespace => self.line_start,
            TriviaKind::LineComment | TriviaKind::BlockComment | TriviaKind::Directive => false,
        };
        out.push(piece);
    }
}

/// `#region` and `#endregion` lines. Their content was consumed by the
/// region annotator and they never reach the output.
fn is_region_directive(piece: &Trivia) -> bool {
    matches!(piece.directive_name(), Some("region" | "endregion"))
}

/// Pieces that run to the end of their line.
fn ends_line(piece: &Trivia) -> bool {
    matches!(piece.kind, TriviaKind::LineComment | TriviaKind::Directive)
}

/// Split a gap the way the lexer does: trailing trivia runs through the
/// first newline, the rest leads the next token.
fn split_gap(gap: Vec<Trivia>) -> (TriviaList, TriviaList) {
    let at = gap
        .iter()
        .position(|p| p.kind == TriviaKind::Newline)
        .map_or(gap.len(), |i| i + 1);
    let mut trailing: TriviaList = gap.into_iter().collect();
    let leading = trailing.drain(at..).collect();
    (trailing, leading)
}

fn rebuilt(token: &Token, leading: TriviaList) -> Token {
    Token {
        kind: token.kind,
        text: token.text.clone(),
        leading,
        trailing: TriviaList::new(),
        region: token.region,
        span: token.span,
    }
}
