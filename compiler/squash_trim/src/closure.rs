//! Worklist closure over usage edges.

use squash_ir::{DeclId, DeclIndex};
use tracing::trace;

use crate::rules;
use crate::{SemanticOracle, TrimLevel};

/// Why a declaration is kept.
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) enum Retention {
    /// Only because a descendant is kept.
    Structural,
    /// Root, edge target or rule contribution.
    Direct,
}

#[derive(Copy, Clone, Debug)]
enum Task {
    /// First retention: ancestors, edges and member rules.
    Expand(DeclId),
    /// Promotion from structural to direct retention.
    Promote(DeclId),
}

pub(crate) struct Closure<'a, 't> {
    index: &'a DeclIndex<'t>,
    oracle: &'a dyn SemanticOracle,
    level: TrimLevel,
    state: Vec<Option<Retention>>,
    tasks: Vec<Task>,
    edges: usize,
}

impl<'a, 't> Closure<'a, 't> {
    pub fn new(index: &'a DeclIndex<'t>, oracle: &'a dyn SemanticOracle, level: TrimLevel) -> Self {
        Closure {
            index,
            oracle,
            level,
            state: vec![None; index.len()],
            tasks: Vec::new(),
            edges: 0,
        }
    }

    pub fn retain(&mut self, id: DeclId, retention: Retention) {
        let slot = &mut self.state[id.index()];
        match *slot {
            None => {
                *slot = Some(retention);
                self.tasks.push(Task::Expand(id));
            }
            Some(Retention::Structural) if retention == Retention::Direct => {
                *slot = Some(Retention::Direct);
                self.tasks.push(Task::Promote(id));
            }
            Some(_) => {}
        }
    }

    fn retain_all(&mut self, ids: impl IntoIterator<Item = DeclId>) {
        for id in ids {
            self.retain(id, Retention::Direct);
        }
    }

    /// Process tasks until the retained set stops growing.
    pub fn run(&mut self) {
        while let Some(task) = self.tasks.pop() {
            match task {
                Task::Expand(id) => self.expand(id),
                Task::Promote(id) => self.promote(id),
            }
        }
    }

    fn expand(&mut self, id: DeclId) {
        let index = self.index;
        trace!(decl = index.qualified_name(id), "retain");

        let ancestors: Vec<DeclId> = index.ancestors(id).collect();
        for ancestor in ancestors {
            self.retain(ancestor, Retention::Structural);
        }

        for usage in self.oracle.usages(index, id) {
            self.edges += 1;
            self.retain(usage.target, Retention::Direct);
            self.retain_all(rules::edge_roots(index, usage));
        }

        self.retain_all(rules::member_roots(index, self.oracle, self.level, id));

        if self.state[id.index()] == Some(Retention::Direct) {
            self.promote(id);
        }
    }

    fn promote(&mut self, id: DeclId) {
        self.retain_all(rules::referenced_roots(self.index, self.oracle, id));
    }

    pub fn edges(&self) -> usize {
        self.edges
    }

    pub fn into_state(self) -> Vec<Option<Retention>> {
        self.state
    }
}
