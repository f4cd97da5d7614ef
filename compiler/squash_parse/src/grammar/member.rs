//! Member declarations.

use squash_ir::{Decl, DeclKind, MemberLayout, Modifiers, TokenKind};

use super::Prefix;
use crate::{Parser, SyntaxError};

impl Parser<'_> {
    pub(crate) fn parse_member(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        match self.current_kind() {
            TokenKind::Tilde => return self.parse_destructor(prefix),
            TokenKind::Keyword if self.check_word("implicit") || self.check_word("explicit") => {
                return self.parse_conversion(prefix);
            }
            TokenKind::Ident if self.peek_kind(1) == TokenKind::LParen => {
                let name_at = self.position();
                let name = self.advance().text.to_string();
                return self.finish_method(prefix, DeclKind::Constructor, name, name_at);
            }
            _ => {}
        }

        self.skip_type()?;

        if self.check_word("operator") {
            return self.parse_operator(prefix);
        }
        if self.check_word("this") && self.peek_kind(1) == TokenKind::LBracket {
            return self.parse_indexer(prefix, prefix.modifiers);
        }

        let (name_at, name, explicit) = self.member_name()?;
        let mut modifiers = prefix.modifiers;
        if explicit {
            modifiers |= Modifiers::EXPLICIT_IMPL;
        }
        if name == "this" && self.check(TokenKind::LBracket) {
            self.cursor.set_position(name_at);
            return self.parse_indexer(prefix, modifiers);
        }
        let prefix = Prefix {
            start: prefix.start,
            modifiers,
        };

        match self.current_kind() {
            TokenKind::Lt => {
                match self.cursor.generic_end(self.position()) {
                    Some(end) => self.cursor.set_position(end),
                    None => return Err(self.cursor.error_expected("type parameters")),
                }
                self.finish_method(prefix, DeclKind::Method, name, name_at)
            }
            TokenKind::LParen => self.finish_method(prefix, DeclKind::Method, name, name_at),
            TokenKind::LBrace | TokenKind::FatArrow => self.finish_property(prefix, name, name_at),
            TokenKind::Eq | TokenKind::Comma | TokenKind::Semicolon | TokenKind::LBracket
                if !explicit =>
            {
                self.parse_field(prefix, name_at)
            }
            _ => Err(self.cursor.error_expected("member body")),
        }
    }

    /// Member name, possibly qualified by an interface for explicit
    /// implementations (`IFoo<T>.Bar`). Returns the position and text of
    /// the last segment.
    fn member_name(&mut self) -> Result<(usize, String, bool), SyntaxError> {
        let mut name_at = self.position();
        let mut name = self.cursor.expect_word("member name")?.text.to_string();
        let mut explicit = false;
        loop {
            if self.check(TokenKind::Lt) {
                let after = self
                    .cursor
                    .generic_end(self.position())
                    .filter(|&end| self.cursor.token_at(end).is(TokenKind::Dot));
                match after {
                    Some(end) => self.cursor.set_position(end),
                    None => break,
                }
            }
            if self.check(TokenKind::Dot) && self.peek_kind(1).is_word() {
                self.advance();
                explicit = true;
                name_at = self.position();
                name = self.advance().text.to_string();
            } else {
                break;
            }
        }
        Ok((name_at, name, explicit))
    }

    fn finish_method(
        &mut self,
        prefix: Prefix,
        kind: DeclKind,
        name: String,
        name_at: usize,
    ) -> Result<Decl, SyntaxError> {
        let (parameters, extension) = self.parse_parameters()?;
        self.finish_callable()?;

        let mut decl = Decl::new(kind, name);
        decl.modifiers = prefix.modifiers;
        if extension && kind == DeclKind::Method {
            decl.modifiers |= Modifiers::EXTENSION;
        }
        decl.name_token = Some(name_at - prefix.start);
        decl.parameters = Some(parameters);
        decl.open = self.slice(prefix.start, self.position());
        Ok(decl)
    }

    fn parse_destructor(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        self.advance();
        let name_at = self.position();
        let name = format!("~{}", self.cursor.expect_word("type name")?.text);
        self.finish_method(prefix, DeclKind::Destructor, name, name_at)
    }

    /// `implicit operator T(...)` / `explicit operator T(...)`.
    fn parse_conversion(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        let direction = self.advance().text.to_string();
        let name_at = self.position();
        if !self.check_word("operator") {
            return Err(self.cursor.error_expected("`operator`"));
        }
        self.advance();
        let target = self.skip_type()?;
        let name = format!("{direction} operator {target}");
        self.finish_method(prefix, DeclKind::Operator, name, name_at)
    }

    /// `T operator +(...)`; the cursor is on `operator`.
    fn parse_operator(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        let name_at = self.position();
        self.advance();
        let mut name = String::from("operator");
        while !self.check(TokenKind::LParen) {
            if matches!(self.current_kind(), TokenKind::Eof | TokenKind::LBrace | TokenKind::Semicolon) {
                return Err(self.cursor.error_expected("operator parameter list"));
            }
            name.push_str(&self.advance().text);
        }
        self.finish_method(prefix, DeclKind::Operator, name, name_at)
    }

    /// `T this[...] { ... }`; the cursor is on `this`.
    fn parse_indexer(&mut self, prefix: Prefix, modifiers: Modifiers) -> Result<Decl, SyntaxError> {
        let name_at = self.position();
        self.advance();
        let (parameters, _) = self.parse_parameters()?;
        match self.current_kind() {
            TokenKind::LBrace => self.cursor.skip_balanced()?,
            TokenKind::FatArrow => {
                self.advance();
                self.cursor.skip_expression(&[TokenKind::Semicolon])?;
                self.advance();
            }
            _ => return Err(self.cursor.error_expected("indexer body")),
        }
        let mut decl = Decl::new(DeclKind::Indexer, "this");
        decl.modifiers = modifiers;
        decl.name_token = Some(name_at - prefix.start);
        decl.parameters = Some(parameters);
        decl.open = self.slice(prefix.start, self.position());
        Ok(decl)
    }

    /// Accessor block with optional `= initializer;`, or `=> expression;`.
    fn finish_property(
        &mut self,
        prefix: Prefix,
        name: String,
        name_at: usize,
    ) -> Result<Decl, SyntaxError> {
        let mut decl = Decl::new(DeclKind::Property, name);
        decl.modifiers = prefix.modifiers;
        decl.name_token = Some(name_at - prefix.start);

        if self.eat(TokenKind::FatArrow) {
            self.cursor.skip_expression(&[TokenKind::Semicolon])?;
            self.advance();
        } else {
            self.cursor.skip_balanced()?;
            if self.eat(TokenKind::Eq) {
                let init = self.position();
                self.cursor.skip_expression(&[TokenKind::Semicolon])?;
                decl.initializer = Some(init - prefix.start..self.position() - prefix.start);
                self.advance();
            }
        }
        decl.open = self.slice(prefix.start, self.position());
        Ok(decl)
    }

    /// `event T Name { add ... remove ... }` or a field-like event.
    pub(crate) fn parse_event(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        self.advance();
        self.skip_type()?;
        let (name_at, name, explicit) = self.member_name()?;
        let mut modifiers = prefix.modifiers | Modifiers::EVENT;
        if explicit {
            modifiers |= Modifiers::EXPLICIT_IMPL;
        }
        let prefix = Prefix {
            start: prefix.start,
            modifiers,
        };
        if !self.check(TokenKind::LBrace) {
            return self.parse_field(prefix, name_at);
        }
        self.cursor.skip_balanced()?;
        let mut decl = Decl::new(DeclKind::Event, name);
        decl.modifiers = modifiers;
        decl.name_token = Some(name_at - prefix.start);
        decl.open = self.slice(prefix.start, self.position());
        Ok(decl)
    }

    /// Field statement whose first variable name is at `first`. Every
    /// variable after the first owns its leading comma.
    fn parse_field(&mut self, prefix: Prefix, first: usize) -> Result<Decl, SyntaxError> {
        self.cursor.set_position(first);
        let mut field = Decl::new(DeclKind::Field, "");
        field.modifiers = prefix.modifiers;
        field.layout = MemberLayout::Separated;
        field.open = self.slice(prefix.start, first);

        loop {
            let start = self.position();
            if !field.members.is_empty() {
                self.expect(TokenKind::Comma, "`,`")?;
            }
            let name_at = self.position();
            let name = self.cursor.expect_word("variable name")?.text.to_string();
            if self.check(TokenKind::LBracket) {
                self.cursor.skip_balanced()?;
            }
            let mut variable = Decl::new(DeclKind::Variable, name);
            variable.modifiers = prefix.modifiers;
            variable.name_token = Some(name_at - start);
            if self.eat(TokenKind::Eq) {
                let init = self.position();
                self.cursor
                    .skip_expression(&[TokenKind::Comma, TokenKind::Semicolon])?;
                variable.initializer = Some(init - start..self.position() - start);
            }
            variable.open = self.slice(start, self.position());
            field.members.push(variable);
            if !self.check(TokenKind::Comma) {
                break;
            }
        }

        let close_start = self.position();
        self.expect(TokenKind::Semicolon, "`;`")?;
        field.close = self.slice(close_start, self.position());
        Ok(field)
    }
}
