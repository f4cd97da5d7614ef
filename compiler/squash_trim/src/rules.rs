//! Extra-root contributions.
//!
//! Each rule is a pure function from a retained declaration (or a followed
//! edge) to further declarations that must be retained with it. The
//! closure calls them and never special-cases a kind itself.

use smallvec::SmallVec;
use squash_ir::{DeclId, DeclIndex, DeclKind, Modifiers};

use crate::effect::initializer_has_side_effect;
use crate::{SemanticOracle, TrimLevel, Usage, UsageKind};

pub(crate) type Roots = SmallVec<[DeclId; 4]>;

/// Members kept whenever their type is kept, however it was reached.
pub(crate) fn member_roots(
    index: &DeclIndex<'_>,
    oracle: &dyn SemanticOracle,
    level: TrimLevel,
    id: DeclId,
) -> Roots {
    let decl = index.decl(id);
    let mut roots = Roots::new();
    match decl.kind {
        DeclKind::Enum | DeclKind::Interface => {
            roots.extend(index.descendants(id).filter(|&d| index.enclosing_type(d) == Some(id)));
        }
        DeclKind::Class | DeclKind::Struct => {
            for &child in index.children(id) {
                let member = index.decl(child);
                let keep = match member.kind {
                    DeclKind::Operator | DeclKind::Destructor | DeclKind::Indexer => true,
                    DeclKind::Constructor => member.has(Modifiers::STATIC),
                    DeclKind::Property => initializer_has_side_effect(member),
                    DeclKind::Field => {
                        roots.extend(index.children(child).iter().copied().filter(|&v| {
                            initializer_has_side_effect(index.decl(v))
                                || oracle.is_override_or_implementation(index, v)
                        }));
                        false
                    }
                    _ => false,
                };
                if keep || oracle.is_override_or_implementation(index, child) {
                    roots.push(child);
                }
            }
        }
        _ => {}
    }
    if level == TrimLevel::Types && decl.kind.is_type() {
        roots.extend(
            index
                .descendants(id)
                .filter(|&d| !index.decl(d).kind.is_type() && index.enclosing_type(d) == Some(id)),
        );
    }
    roots
}

/// Members kept once the type itself is referenced: extension methods of
/// a static container.
pub(crate) fn referenced_roots(index: &DeclIndex<'_>, oracle: &dyn SemanticOracle, id: DeclId) -> Roots {
    let decl = index.decl(id);
    if !decl.kind.is_type() || !decl.has(Modifiers::STATIC) {
        return Roots::new();
    }
    index
        .children(id)
        .iter()
        .copied()
        .filter(|&m| oracle.is_extension_method(index, m))
        .collect()
}

/// Declarations an edge keeps besides its target.
pub(crate) fn edge_roots(index: &DeclIndex<'_>, usage: Usage) -> Roots {
    match usage.kind {
        UsageKind::BaseType | UsageKind::NewConstrainedArgument => {
            parameterless_constructors(index, usage.target)
        }
        UsageKind::Opaque => index.descendants(usage.target).collect(),
        UsageKind::Reference
        | UsageKind::Instantiation
        | UsageKind::Interface
        | UsageKind::Constraint => Roots::new(),
    }
}

/// The runtime constructs the entry container.
pub(crate) fn entry_roots(index: &DeclIndex<'_>, id: DeclId) -> Roots {
    index
        .children(id)
        .iter()
        .copied()
        .filter(|&c| index.decl(c).kind == DeclKind::Constructor)
        .collect()
}

fn parameterless_constructors(index: &DeclIndex<'_>, ty: DeclId) -> Roots {
    index
        .children(ty)
        .iter()
        .copied()
        .filter(|&c| {
            let decl = index.decl(c);
            decl.kind == DeclKind::Constructor
                && !decl.has(Modifiers::STATIC)
                && decl.parameters == Some(0)
        })
        .collect()
}
