//! Conditional-compilation evaluator.
//!
//! Resolves `#if`/`#elif`/`#else`/`#endif` blocks in script text against a
//! set of active macro symbols. Only directive lines are tokenized; every
//! other line is opaque text that is either copied through unchanged (line
//! endings included) or dropped with its inactive branch. The directive
//! lines themselves never reach the output.
//!
//! ```text
//! #if DEBUG && !RELEASE      condition -> postfix: DEBUG RELEASE ! &&
//!     Log("debug");
//! #else
//!     Log("release");
//! #endif
//! ```

mod block;
mod error;
mod expr;

pub use block::{parse_blocks, Conditional, Else, Node};
pub use error::{ConditionalErrorKind, MalformedConditionalError};
pub use expr::{Condition, Op};

use rustc_hash::FxHashSet;
use tracing::debug;

/// Active macro symbols.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MacroSet {
    symbols: FxHashSet<String>,
}

impl MacroSet {
    pub fn new() -> Self {
        MacroSet::default()
    }

    pub fn define(&mut self, symbol: impl Into<String>) {
        self.symbols.insert(symbol.into());
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MacroSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        MacroSet {
            symbols: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Resolve every conditional block in `source`.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len(), symbols = active.len()))]
pub fn evaluate(source: &str, active: &MacroSet) -> Result<String, MalformedConditionalError> {
    let nodes = parse_blocks(source)?;
    let mut out = String::with_capacity(source.len());
    let mut taken = 0usize;
    emit(&nodes, active, &mut out, &mut taken);
    debug!(branches = taken, kept = out.len(), "resolved conditionals");
    Ok(out)
}

fn emit(nodes: &[Node<'_>], active: &MacroSet, out: &mut String, taken: &mut usize) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Conditional(conditional) => {
                if let Some(branch) = select(conditional, active) {
                    *taken += 1;
                    emit(branch, active, out, taken);
                }
            }
        }
    }
}

/// Branch of an `#if`/`#elif` chain that is active, if any.
fn select<'n, 's>(conditional: &'n Conditional<'s>, active: &MacroSet) -> Option<&'n [Node<'s>]> {
    let mut current = conditional;
    loop {
        if current.condition.evaluate(active) {
            return Some(current.then.as_slice());
        }
        match &current.otherwise {
            Some(Else::If(next)) => current = next.as_ref(),
            Some(Else::Block(nodes)) => return Some(nodes.as_slice()),
            None => return None,
        }
    }
}
