//! Declaration grammar.
//!
//! Split by declaration family:
//! - this module: scope bodies, using directives, attributes and modifiers
//! - `ty`: namespaces, classes, structs, interfaces, enums, delegates
//! - `member`: methods, constructors, operators, properties, indexers,
//!   events and fields

mod member;
mod ty;

use squash_ir::{Decl, Modifiers, SyntaxTree, Token, TokenKind, UsingDirective};

use crate::cursor::unknown;
use crate::{Parser, SyntaxError, SyntaxErrorKind};

/// Contents of one scope body.
#[derive(Default)]
pub(crate) struct Body {
    pub usings: Vec<UsingDirective>,
    pub decls: Vec<Decl>,
    /// Empty statements seen before any using or declaration.
    pub stray: Vec<Token>,
}

/// Where a declaration starts and the modifiers in front of it.
#[derive(Copy, Clone)]
pub(crate) struct Prefix {
    pub start: usize,
    pub modifiers: Modifiers,
}

impl Parser<'_> {
    pub(crate) fn parse_document(&mut self) -> Result<SyntaxTree, SyntaxError> {
        let body = self.parse_body(true)?;
        if let Some(token) = body.stray.first() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::Stray(token.text.to_string()),
                token.span,
            ));
        }
        if !self.check(TokenKind::Eof) {
            return Err(SyntaxError::new(
                SyntaxErrorKind::Stray(self.current().text.to_string()),
                self.current_span(),
            ));
        }
        Ok(SyntaxTree::new(body.usings, body.decls, self.current().clone()))
    }

    /// Parse declarations up to a closing `}` (not consumed) or end of file.
    pub(crate) fn parse_body(&mut self, allow_usings: bool) -> Result<Body, SyntaxError> {
        let mut body = Body::default();
        loop {
            match self.current_kind() {
                TokenKind::Eof | TokenKind::RBrace => return Ok(body),
                TokenKind::Unknown => return Err(unknown(self.current())),
                TokenKind::Semicolon => {
                    let token = self.advance().clone();
                    if let Some(last) = body.decls.last_mut() {
                        last.close.push(token);
                    } else if let Some(last) = body.usings.last_mut() {
                        last.tokens.push(token);
                    } else {
                        body.stray.push(token);
                    }
                }
                _ if self.check_word("using") && self.peek_kind(1) != TokenKind::LParen => {
                    if !allow_usings || !body.decls.is_empty() {
                        return Err(self.cursor.error_expected("declaration"));
                    }
                    body.usings.push(self.parse_using()?);
                }
                _ => body.decls.push(self.parse_decl()?),
            }
        }
    }

    fn parse_using(&mut self) -> Result<UsingDirective, SyntaxError> {
        let start = self.position();
        self.advance();
        while !self.check(TokenKind::Semicolon) {
            match self.current_kind() {
                TokenKind::Eof | TokenKind::LBrace | TokenKind::RBrace => {
                    return Err(self.cursor.error_expected("`;` after using directive"));
                }
                TokenKind::Unknown => return Err(unknown(self.current())),
                _ => {
                    self.advance();
                }
            }
        }
        self.advance();
        Ok(UsingDirective::new(self.slice(start, self.position())))
    }

    fn parse_decl(&mut self) -> Result<Decl, SyntaxError> {
        let start = self.position();
        self.skip_attributes()?;
        let prefix = Prefix {
            start,
            modifiers: self.parse_modifiers(),
        };
        let token = self.current();
        if token.kind != TokenKind::Keyword {
            return self.parse_member(prefix);
        }
        match &*token.text {
            "namespace" => self.parse_namespace(prefix),
            "class" => self.parse_type(prefix, squash_ir::DeclKind::Class),
            "struct" => self.parse_type(prefix, squash_ir::DeclKind::Struct),
            "interface" => self.parse_type(prefix, squash_ir::DeclKind::Interface),
            "enum" => self.parse_enum(prefix),
            "delegate" => self.parse_delegate(prefix),
            "event" => self.parse_event(prefix),
            _ => self.parse_member(prefix),
        }
    }

    /// Step over `[...]` attribute lists.
    pub(crate) fn skip_attributes(&mut self) -> Result<(), SyntaxError> {
        while self.check(TokenKind::LBracket) {
            self.cursor.skip_balanced()?;
        }
        Ok(())
    }

    /// Consume modifier words.
    ///
    /// Contextual modifiers (`partial`, `async`) only count when another
    /// word follows, so `partial` can still name a member.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let token = self.current();
            let Some(flag) = Modifiers::from_keyword(&token.text) else {
                return modifiers;
            };
            let is_modifier = match token.kind {
                TokenKind::Keyword => true,
                TokenKind::Ident => self.peek_kind(1).is_word(),
                _ => false,
            };
            if !is_modifier {
                return modifiers;
            }
            modifiers |= flag;
            self.advance();
        }
    }

    /// Step over a type reference; returns its simple name (the last
    /// segment before any generic arguments). Tuple types have no name.
    pub(crate) fn skip_type(&mut self) -> Result<String, SyntaxError> {
        let mut name = String::new();
        if self.check(TokenKind::LParen) {
            self.cursor.skip_balanced()?;
        } else {
            name = self.cursor.expect_word("type")?.text.to_string();
            loop {
                if self.check(TokenKind::Lt) {
                    match self.cursor.generic_end(self.position()) {
                        Some(end) => self.cursor.set_position(end),
                        None => break,
                    }
                } else if matches!(self.current_kind(), TokenKind::Dot | TokenKind::ColonColon)
                    && self.peek_kind(1).is_word()
                {
                    self.advance();
                    name = self.advance().text.to_string();
                } else {
                    break;
                }
            }
        }
        loop {
            match self.current_kind() {
                TokenKind::Question | TokenKind::Star => {
                    self.advance();
                }
                TokenKind::LBracket
                    if matches!(self.peek_kind(1), TokenKind::RBracket | TokenKind::Comma) =>
                {
                    self.cursor.skip_balanced()?;
                }
                _ => return Ok(name),
            }
        }
    }

    /// Consume a `{ ... }` scope body into `decl`: `open` runs from `start`
    /// through the `{`, `close` holds the `}` and an optional `;`.
    pub(crate) fn finish_container(
        &mut self,
        decl: &mut Decl,
        start: usize,
        allow_usings: bool,
    ) -> Result<(), SyntaxError> {
        self.expect(TokenKind::LBrace, "`{`")?;
        let mut open = self.slice(start, self.position());
        let body = self.parse_body(allow_usings)?;
        open.extend(body.stray);
        decl.open = open;
        decl.usings = body.usings;
        decl.members = body.decls;

        let close_start = self.position();
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat(TokenKind::Semicolon);
        decl.close = self.slice(close_start, self.position());
        Ok(())
    }

    /// Parse a parameter list starting at `(` or `[`. Returns the
    /// parameter count and whether the first parameter is `this T`.
    pub(crate) fn parse_parameters(&mut self) -> Result<(usize, bool), SyntaxError> {
        let close = match self.current_kind() {
            TokenKind::LBracket => TokenKind::RBracket,
            _ => TokenKind::RParen,
        };
        if !matches!(self.current_kind(), TokenKind::LParen | TokenKind::LBracket) {
            return Err(self.cursor.error_expected("parameter list"));
        }
        self.advance();
        if self.eat(close) {
            return Ok((0, false));
        }
        let extension = self.check_word("this");
        let mut count = 1;
        loop {
            self.cursor.skip_expression(&[TokenKind::Comma, close])?;
            if self.eat(TokenKind::Comma) {
                count += 1;
            } else {
                self.expect(close, "end of parameter list")?;
                return Ok((count, extension));
            }
        }
    }

    /// Step over whatever follows a parameter list: constructor
    /// initializers and `where` clauses, then a block body, an expression
    /// body or `;`.
    pub(crate) fn finish_callable(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.current_kind() {
                TokenKind::LBrace => return self.cursor.skip_balanced(),
                TokenKind::FatArrow => {
                    self.advance();
                    self.cursor.skip_expression(&[TokenKind::Semicolon])?;
                    self.advance();
                    return Ok(());
                }
                TokenKind::Semicolon => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket => self.cursor.skip_balanced()?,
                TokenKind::Eof | TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                    return Err(self.cursor.error_expected("body"));
                }
                TokenKind::Unknown => return Err(unknown(self.current())),
                _ => {
                    self.advance();
                }
            }
        }
    }
}
