//! Namespaces and type declarations.

use squash_ir::{Decl, DeclKind, MemberLayout, TokenKind};

use super::Prefix;
use crate::{Parser, SyntaxError};

impl Parser<'_> {
    /// `namespace A.B { ... }` or file-scoped `namespace A.B;`.
    pub(crate) fn parse_namespace(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        self.advance();
        let name_at = self.position();
        let mut name = self.cursor.expect_word("namespace name")?.text.to_string();
        while self.check(TokenKind::Dot) && self.peek_kind(1).is_word() {
            self.advance();
            name.push('.');
            name.push_str(&self.advance().text);
        }

        let mut decl = Decl::new(DeclKind::Namespace, name);
        decl.modifiers = prefix.modifiers;
        decl.name_token = Some(name_at - prefix.start);

        if self.eat(TokenKind::Semicolon) {
            let mut open = self.slice(prefix.start, self.position());
            let body = self.parse_body(true)?;
            if !self.check(TokenKind::Eof) {
                return Err(self.cursor.error_expected("end of file"));
            }
            open.extend(body.stray);
            decl.open = open;
            decl.usings = body.usings;
            decl.members = body.decls;
            return Ok(decl);
        }
        self.finish_container(&mut decl, prefix.start, true)?;
        Ok(decl)
    }

    /// Class, struct or interface.
    pub(crate) fn parse_type(&mut self, prefix: Prefix, kind: DeclKind) -> Result<Decl, SyntaxError> {
        self.advance();
        let mut decl = self.type_header(prefix, kind)?;
        if self.eat(TokenKind::Colon) {
            loop {
                let base = self.skip_type()?;
                if !base.is_empty() {
                    decl.bases.push(base);
                }
                if !self.eat(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.skip_constraints()?;
        self.finish_container(&mut decl, prefix.start, false)?;
        Ok(decl)
    }

    /// Name and generic parameters of a type declaration.
    fn type_header(&mut self, prefix: Prefix, kind: DeclKind) -> Result<Decl, SyntaxError> {
        let name_at = self.position();
        let name = self.cursor.expect_word("type name")?.text.to_string();
        if self.check(TokenKind::Lt) {
            match self.cursor.generic_end(self.position()) {
                Some(end) => self.cursor.set_position(end),
                None => return Err(self.cursor.error_expected("type parameters")),
            }
        }
        let mut decl = Decl::new(kind, name);
        decl.modifiers = prefix.modifiers;
        decl.name_token = Some(name_at - prefix.start);
        Ok(decl)
    }

    /// Step over `where T : ...` clauses up to the body.
    pub(crate) fn skip_constraints(&mut self) -> Result<(), SyntaxError> {
        while self.check_word("where") {
            self.advance();
            loop {
                match self.current_kind() {
                    TokenKind::LBrace | TokenKind::Semicolon | TokenKind::FatArrow => {
                        return Ok(());
                    }
                    TokenKind::LParen => self.cursor.skip_balanced()?,
                    TokenKind::Eof => return Err(self.cursor.error_expected("`{`")),
                    _ if self.check_word("where") => break,
                    _ => {
                        self.advance();
                    }
                }
            }
        }
        Ok(())
    }

    /// `enum Name : type { A, B = 2, }`.
    pub(crate) fn parse_enum(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        self.advance();
        let mut decl = self.type_header(prefix, DeclKind::Enum)?;
        decl.layout = MemberLayout::Separated;
        if self.eat(TokenKind::Colon) {
            self.skip_type()?;
        }
        self.expect(TokenKind::LBrace, "`{`")?;
        decl.open = self.slice(prefix.start, self.position());

        while !self.check(TokenKind::RBrace) {
            let start = self.position();
            if !decl.members.is_empty() {
                if self.check(TokenKind::Comma) && self.peek_kind(1) == TokenKind::RBrace {
                    break;
                }
                self.expect(TokenKind::Comma, "`,` between enum members")?;
            }
            self.skip_attributes()?;
            let name_at = self.position();
            let name = self.cursor.expect_word("enum member name")?.text.to_string();
            let mut member = Decl::new(DeclKind::EnumMember, name);
            member.name_token = Some(name_at - start);
            if self.eat(TokenKind::Eq) {
                let init = self.position();
                self.cursor
                    .skip_expression(&[TokenKind::Comma, TokenKind::RBrace])?;
                member.initializer = Some(init - start..self.position() - start);
            }
            member.open = self.slice(start, self.position());
            decl.members.push(member);
        }

        let close_start = self.position();
        self.eat(TokenKind::Comma);
        self.expect(TokenKind::RBrace, "`}`")?;
        self.eat(TokenKind::Semicolon);
        decl.close = self.slice(close_start, self.position());
        Ok(decl)
    }

    /// `delegate R Name<T>(params);`.
    pub(crate) fn parse_delegate(&mut self, prefix: Prefix) -> Result<Decl, SyntaxError> {
        self.advance();
        self.skip_type()?;
        let name_at = self.position();
        let name = self.cursor.expect_word("delegate name")?.text.to_string();
        if self.check(TokenKind::Lt) {
            match self.cursor.generic_end(self.position()) {
                Some(end) => self.cursor.set_position(end),
                None => return Err(self.cursor.error_expected("type parameters")),
            }
        }
        let (parameters, _) = self.parse_parameters()?;
        self.skip_constraints()?;
        self.expect(TokenKind::Semicolon, "`;`")?;

        let mut decl = Decl::new(DeclKind::Delegate, name);
        decl.modifiers = prefix.modifiers;
        decl.name_token = Some(name_at - prefix.start);
        decl.parameters = Some(parameters);
        decl.open = self.slice(prefix.start, self.position());
        Ok(decl)
    }
}
