//! Declaration tree.
//!
//! A [`SyntaxTree`] owns every token of a document. Tokens are partitioned
//! between using directives, declarations and the end-of-file token, so the
//! tree renders back to exactly the text it was parsed from. Passes that
//! rewrite a tree take it by value and hand back a new one.

use std::ops::Range;

use bitflags::bitflags;

use crate::token::{render_tokens, Token, TokenKind};

bitflags! {
    /// Declaration modifiers.
    #[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PRIVATE = 1 << 1;
        const PROTECTED = 1 << 2;
        const INTERNAL = 1 << 3;
        const STATIC = 1 << 4;
        const ABSTRACT = 1 << 5;
        const VIRTUAL = 1 << 6;
        const OVERRIDE = 1 << 7;
        const SEALED = 1 << 8;
        const PARTIAL = 1 << 9;
        const CONST = 1 << 10;
        const READONLY = 1 << 11;
        /// Field-like event (`event Action Changed;`).
        const EVENT = 1 << 12;
        /// Method whose first parameter is `this T`.
        const EXTENSION = 1 << 13;
        /// Explicit interface implementation (`void IFoo.Bar()`).
        const EXPLICIT_IMPL = 1 << 14;
        /// Hiding member (`new void Foo()`).
        const NEW = 1 << 15;
        const EXTERN = 1 << 16;
        const UNSAFE = 1 << 17;
        const VOLATILE = 1 << 18;
        const ASYNC = 1 << 19;
    }
}

impl Modifiers {
    /// Modifier named by a keyword, if any.
    pub fn from_keyword(word: &str) -> Option<Modifiers> {
        let flag = match word {
            "public" => Modifiers::PUBLIC,
            "private" => Modifiers::PRIVATE,
            "protected" => Modifiers::PROTECTED,
            "internal" => Modifiers::INTERNAL,
            "static" => Modifiers::STATIC,
            "abstract" => Modifiers::ABSTRACT,
            "virtual" => Modifiers::VIRTUAL,
            "override" => Modifiers::OVERRIDE,
            "sealed" => Modifiers::SEALED,
            "partial" => Modifiers::PARTIAL,
            "const" => Modifiers::CONST,
            "readonly" => Modifiers::READONLY,
            "new" => Modifiers::NEW,
            "extern" => Modifiers::EXTERN,
            "unsafe" => Modifiers::UNSAFE,
            "volatile" => Modifiers::VOLATILE,
            "async" => Modifiers::ASYNC,
            _ => return None,
        };
        Some(flag)
    }
}

/// Declaration kind tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DeclKind {
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Method,
    Constructor,
    Destructor,
    Operator,
    Indexer,
    Property,
    Event,
    /// Field statement; its members are the declared [`DeclKind::Variable`]s.
    Field,
    Variable,
    EnumMember,
}

impl DeclKind {
    /// Class, struct, interface or enum.
    #[inline]
    pub fn is_type(self) -> bool {
        matches!(
            self,
            DeclKind::Class | DeclKind::Struct | DeclKind::Interface | DeclKind::Enum
        )
    }

    /// Kinds whose `members` are declarations in their own right.
    #[inline]
    pub fn is_container(self) -> bool {
        self.is_type() || matches!(self, DeclKind::Namespace | DeclKind::Field)
    }

    /// Lowercase name used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Namespace => "namespace",
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Interface => "interface",
            DeclKind::Enum => "enum",
            DeclKind::Delegate => "delegate",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Destructor => "destructor",
            DeclKind::Operator => "operator",
            DeclKind::Indexer => "indexer",
            DeclKind::Property => "property",
            DeclKind::Event => "event",
            DeclKind::Field => "field",
            DeclKind::Variable => "variable",
            DeclKind::EnumMember => "enum member",
        }
    }
}

/// How a container's members are delimited.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum MemberLayout {
    /// Members follow each other inside braces.
    #[default]
    Block,
    /// Members are comma-separated; every member after the first starts
    /// with its comma token.
    Separated,
}

/// A `using ...;` directive.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct UsingDirective {
    /// Significant text between `using` and `;` with trivia dropped;
    /// adjacent words are separated by one space.
    ///
    /// Two directives with equal targets import the same thing.
    pub target: String,
    pub tokens: Vec<Token>,
}

impl UsingDirective {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut target = String::new();
        let mut prev_word = false;
        for token in tokens
            .iter()
            .skip(1)
            .take_while(|t| !t.is(TokenKind::Semicolon))
        {
            let word = token.kind.is_word();
            if word && prev_word {
                target.push(' ');
            }
            target.push_str(&token.text);
            prev_word = word;
        }
        UsingDirective { target, tokens }
    }

    /// Imported namespace or type, without `static` and alias prefixes.
    pub fn namespace(&self) -> &str {
        let target = self.target.strip_prefix("static ").unwrap_or(&self.target);
        match target.split_once('=') {
            Some((_, rhs)) => rhs,
            None => target,
        }
    }
}

/// A declaration node.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Decl {
    pub kind: DeclKind,
    /// Simple name. Empty for field statements.
    pub name: String,
    pub modifiers: Modifiers,
    /// Tokens before the members: attributes, modifiers, header and the
    /// opening brace. Leaf declarations keep all their tokens here.
    pub open: Vec<Token>,
    pub members: Vec<Decl>,
    /// Closing brace (and trailing `;` or separator) of a container.
    pub close: Vec<Token>,
    /// Names listed after `:` in a type header.
    pub bases: Vec<String>,
    /// Using directives inside a namespace body.
    pub usings: Vec<UsingDirective>,
    /// Index of the name token in `open`.
    pub name_token: Option<usize>,
    /// Initializer expression, as a token range in `open`.
    pub initializer: Option<Range<usize>>,
    /// Parameter count of methods, constructors, operators, delegates and
    /// indexers.
    pub parameters: Option<usize>,
    pub layout: MemberLayout,
    /// Set by the protection annotator; the trimmer never removes it.
    pub protected: bool,
}

impl Decl {
    pub fn new(kind: DeclKind, name: impl Into<String>) -> Self {
        Decl {
            kind,
            name: name.into(),
            modifiers: Modifiers::empty(),
            open: Vec::new(),
            members: Vec::new(),
            close: Vec::new(),
            bases: Vec::new(),
            usings: Vec::new(),
            name_token: None,
            initializer: None,
            parameters: None,
            layout: MemberLayout::Block,
            protected: false,
        }
    }

    #[inline]
    pub fn has(&self, modifier: Modifiers) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Initializer tokens, if any.
    pub fn initializer_tokens(&self) -> &[Token] {
        match &self.initializer {
            Some(range) => self.open.get(range.clone()).unwrap_or(&[]),
            None => &[],
        }
    }

    /// Every token of the declaration in source order.
    pub fn tokens(&self) -> Box<dyn Iterator<Item = &Token> + '_> {
        Box::new(
            self.open
                .iter()
                .chain(self.usings.iter().flat_map(|u| u.tokens.iter()))
                .chain(self.members.iter().flat_map(|m| m.tokens()))
                .chain(self.close.iter()),
        )
    }

    /// Mutable references to every token in source order.
    pub fn tokens_mut(&mut self) -> Vec<&mut Token> {
        let mut out = Vec::new();
        self.collect_tokens_mut(&mut out);
        out
    }

    fn collect_tokens_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Token>) {
        out.extend(self.open.iter_mut());
        for using in &mut self.usings {
            out.extend(using.tokens.iter_mut());
        }
        for member in &mut self.members {
            member.collect_tokens_mut(out);
        }
        out.extend(self.close.iter_mut());
    }

    /// First significant token, used for region checks.
    pub fn first_token(&self) -> Option<&Token> {
        self.open.first().or_else(|| self.close.first())
    }

    pub fn first_token_mut(&mut self) -> Option<&mut Token> {
        match self.open.first_mut() {
            Some(token) => Some(token),
            None => self.close.first_mut(),
        }
    }

    /// Number of declarations in this subtree, including itself.
    pub fn count(&self) -> usize {
        1 + self.members.iter().map(Decl::count).sum::<usize>()
    }

    pub fn render(&self) -> String {
        render_tokens(self.tokens())
    }
}

/// A parsed document.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SyntaxTree {
    pub usings: Vec<UsingDirective>,
    pub items: Vec<Decl>,
    /// End-of-file token carrying the final trivia.
    pub eof: Token,
}

impl SyntaxTree {
    pub fn new(usings: Vec<UsingDirective>, items: Vec<Decl>, eof: Token) -> Self {
        SyntaxTree { usings, items, eof }
    }

    /// Tree with no tokens besides end of file.
    pub fn empty() -> Self {
        SyntaxTree::new(Vec::new(), Vec::new(), Token::eof(0))
    }

    /// Every token in render order, end of file last.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.usings
            .iter()
            .flat_map(|u| u.tokens.iter())
            .chain(self.items.iter().flat_map(|d| d.tokens()))
            .chain(std::iter::once(&self.eof))
    }

    /// Mutable references to every token in render order.
    ///
    /// Order and count match [`SyntaxTree::tokens`].
    pub fn tokens_mut(&mut self) -> Vec<&mut Token> {
        let mut out = Vec::new();
        for using in &mut self.usings {
            out.extend(using.tokens.iter_mut());
        }
        for item in &mut self.items {
            item.collect_tokens_mut(&mut out);
        }
        out.push(&mut self.eof);
        out
    }

    /// Replace every token, in render order.
    ///
    /// Returns `false` (leaving the tree partially written) if `tokens`
    /// yields a different number of tokens than the tree holds.
    pub fn replace_tokens(&mut self, tokens: impl IntoIterator<Item = Token>) -> bool {
        let mut slots = self.tokens_mut().into_iter();
        let mut tokens = tokens.into_iter();
        loop {
            match (slots.next(), tokens.next()) {
                (Some(slot), Some(token)) => *slot = token,
                (None, None) => return true,
                _ => return false,
            }
        }
    }

    /// Number of declarations in the tree.
    pub fn decl_count(&self) -> usize {
        self.items.iter().map(Decl::count).sum()
    }

    pub fn render(&self) -> String {
        render_tokens(self.tokens())
    }
}

#[cfg(test)]
mod tests;
