//! Documents flowing through the pipeline.
//!
//! A document starts as source text, is parsed once preprocessing is done,
//! and from then on carries a [`SyntaxTree`]. Passes take a document by
//! value and hand back a new one.

use squash_ir::SyntaxTree;
use squash_trim::TrimReport;

use crate::error::PackError;
use crate::report::Diagnostic;

#[derive(Clone, Debug)]
pub enum Content {
    Text(String),
    Tree(SyntaxTree),
}

#[derive(Clone, Debug)]
pub struct Document {
    pub name: String,
    /// Position in the combined output. Unweighted documents weigh 0.
    pub weight: Option<i32>,
    pub content: Content,
    /// Soft findings collected along the way.
    pub diagnostics: Vec<Diagnostic>,
    pub trim_report: Option<TrimReport>,
}

impl Document {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Document::with_content(name, Content::Text(text.into()))
    }

    pub fn from_tree(name: impl Into<String>, tree: SyntaxTree) -> Self {
        Document::with_content(name, Content::Tree(tree))
    }

    fn with_content(name: impl Into<String>, content: Content) -> Self {
        Document {
            name: name.into(),
            weight: None,
            content,
            diagnostics: Vec::new(),
            trim_report: None,
        }
    }

    #[must_use]
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Tree(_) => None,
        }
    }

    pub fn tree(&self) -> Option<&SyntaxTree> {
        match &self.content {
            Content::Tree(tree) => Some(tree),
            Content::Text(_) => None,
        }
    }

    /// Size of the document as it would be written out.
    pub fn len(&self) -> usize {
        match &self.content {
            Content::Text(text) => text.len(),
            Content::Tree(tree) => tree.tokens().map(token_len).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse text content. A document that already holds a tree is
    /// returned unchanged.
    pub fn parse(self) -> Result<Document, PackError> {
        match self.content {
            Content::Tree(_) => Ok(self),
            Content::Text(text) => {
                let tree = squash_parse::parse_source(&text).map_err(|source| PackError::Syntax {
                    document: self.name.clone(),
                    source,
                })?;
                Ok(Document {
                    content: Content::Tree(tree),
                    ..self
                })
            }
        }
    }

    /// Rewrite text content.
    pub fn map_text<F>(self, f: F) -> Result<Document, PackError>
    where
        F: FnOnce(String) -> Result<String, PackError>,
    {
        match self.content {
            Content::Text(text) => Ok(Document {
                content: Content::Text(f(text)?),
                ..self
            }),
            Content::Tree(_) => Err(PackError::InternalInvariant(format!(
                "`{}` was parsed before a text pass ran",
                self.name
            ))),
        }
    }

    /// Rewrite tree content.
    pub fn map_tree<F>(self, f: F) -> Result<Document, PackError>
    where
        F: FnOnce(SyntaxTree) -> Result<SyntaxTree, PackError>,
    {
        match self.content {
            Content::Tree(tree) => Ok(Document {
                content: Content::Tree(f(tree)?),
                ..self
            }),
            Content::Text(_) => Err(PackError::InternalInvariant(format!(
                "`{}` reached a tree pass unparsed",
                self.name
            ))),
        }
    }

    pub fn into_tree(self) -> Result<(SyntaxTree, DocumentNotes), PackError> {
        match self.content {
            Content::Tree(tree) => Ok((
                tree,
                DocumentNotes {
                    name: self.name,
                    weight: self.weight,
                    diagnostics: self.diagnostics,
                },
            )),
            Content::Text(_) => Err(PackError::InternalInvariant(format!(
                "`{}` reached the combiner unparsed",
                self.name
            ))),
        }
    }
}

/// Everything but the content of a document.
#[derive(Clone, Debug)]
pub struct DocumentNotes {
    pub name: String,
    pub weight: Option<i32>,
    pub diagnostics: Vec<Diagnostic>,
}

fn token_len(token: &squash_ir::Token) -> usize {
    token.trivia().map(|t| t.text.len()).sum::<usize>() + token.text.len()
}
