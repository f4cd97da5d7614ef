//! Flat index over a declaration tree.
//!
//! Declarations are numbered in pre-order (parents before children, siblings
//! in source order). Parents are stored by id, not by reference, so the index
//! is a plain borrow of the tree it was built from.

use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::decl::{Decl, SyntaxTree};

/// Pre-order declaration id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        DeclId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

struct Node<'t> {
    decl: &'t Decl,
    parent: Option<DeclId>,
    children: Vec<DeclId>,
    qualified: String,
    /// Id one past the last descendant.
    subtree_end: u32,
}

/// Pre-order index of every declaration in a [`SyntaxTree`].
pub struct DeclIndex<'t> {
    nodes: Vec<Node<'t>>,
    roots: Vec<DeclId>,
    by_name: FxHashMap<&'t str, SmallVec<[DeclId; 2]>>,
}

impl<'t> DeclIndex<'t> {
    pub fn new(tree: &'t SyntaxTree) -> Self {
        let mut index = DeclIndex {
            nodes: Vec::with_capacity(tree.decl_count()),
            roots: Vec::with_capacity(tree.items.len()),
            by_name: FxHashMap::default(),
        };
        for item in &tree.items {
            let id = index.push(item, None);
            index.roots.push(id);
        }
        index
    }

    fn push(&mut self, decl: &'t Decl, parent: Option<DeclId>) -> DeclId {
        let id = DeclId(u32::try_from(self.nodes.len()).unwrap_or(u32::MAX));
        let qualified = match parent {
            Some(parent) if !self.nodes[parent.index()].qualified.is_empty() => {
                let prefix = &self.nodes[parent.index()].qualified;
                if decl.name.is_empty() {
                    prefix.clone()
                } else {
                    format!("{prefix}.{}", decl.name)
                }
            }
            _ => decl.name.clone(),
        };
        self.nodes.push(Node {
            decl,
            parent,
            children: Vec::with_capacity(decl.members.len()),
            qualified,
            subtree_end: id.0 + 1,
        });
        if !decl.name.is_empty() {
            self.by_name.entry(decl.name.as_str()).or_default().push(id);
        }
        for member in &decl.members {
            let child = self.push(member, Some(id));
            self.nodes[id.index()].children.push(child);
        }
        let end = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        self.nodes[id.index()].subtree_end = end;
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = DeclId> {
        (0..self.nodes.len()).map(|i| DeclId(u32::try_from(i).unwrap_or(u32::MAX)))
    }

    /// Top-level declarations.
    pub fn roots(&self) -> &[DeclId] {
        &self.roots
    }

    #[inline]
    pub fn decl(&self, id: DeclId) -> &'t Decl {
        self.nodes[id.index()].decl
    }

    #[inline]
    pub fn parent(&self, id: DeclId) -> Option<DeclId> {
        self.nodes[id.index()].parent
    }

    #[inline]
    pub fn children(&self, id: DeclId) -> &[DeclId] {
        &self.nodes[id.index()].children
    }

    /// Enclosing declarations, innermost first.
    pub fn ancestors(&self, id: DeclId) -> impl Iterator<Item = DeclId> + '_ {
        std::iter::successors(self.parent(id), |&p| self.parent(p))
    }

    /// Strict descendants in pre-order.
    pub fn descendants(&self, id: DeclId) -> impl Iterator<Item = DeclId> {
        (id.0 + 1..self.nodes[id.index()].subtree_end).map(DeclId)
    }

    /// Check whether `id` lies inside `ancestor`'s subtree (or is it).
    pub fn is_within(&self, id: DeclId, ancestor: DeclId) -> bool {
        id.0 >= ancestor.0 && id.0 < self.nodes[ancestor.index()].subtree_end
    }

    /// Nearest enclosing type declaration.
    pub fn enclosing_type(&self, id: DeclId) -> Option<DeclId> {
        self.ancestors(id).find(|&a| self.decl(a).kind.is_type())
    }

    /// Dotted path of named enclosing declarations, e.g. `Program.Main`.
    ///
    /// Field statements carry no name and do not contribute a segment.
    pub fn qualified_name(&self, id: DeclId) -> &str {
        &self.nodes[id.index()].qualified
    }

    /// Declarations with the given simple name.
    pub fn lookup(&self, name: &str) -> &[DeclId] {
        self.by_name.get(name).map_or(&[], |ids| ids.as_slice())
    }

    /// Resolve a configured name.
    ///
    /// An exact qualified match wins; otherwise every declaration whose
    /// qualified name ends in `.{path}` matches. A bare name matches by
    /// simple name.
    pub fn resolve(&self, path: &str) -> Vec<DeclId> {
        let path = path.trim();
        if path.is_empty() {
            return Vec::new();
        }
        let simple = path.rsplit('.').next().unwrap_or(path);
        let candidates = self.lookup(simple);
        let exact: Vec<DeclId> = candidates
            .iter()
            .copied()
            .filter(|&id| self.qualified_name(id) == path)
            .collect();
        if !exact.is_empty() {
            return exact;
        }
        candidates
            .iter()
            .copied()
            .filter(|&id| {
                let qualified = self.qualified_name(id);
                qualified
                    .strip_suffix(path)
                    .is_some_and(|prefix| prefix.is_empty() || prefix.ends_with('.'))
            })
            .collect()
    }
}

impl fmt::Debug for DeclIndex<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.ids().map(|id| {
                let decl = self.decl(id);
                (id, format!("{} {}", decl.kind.as_str(), self.qualified_name(id)))
            }))
            .finish()
    }
}

#[cfg(test)]
mod tests;
