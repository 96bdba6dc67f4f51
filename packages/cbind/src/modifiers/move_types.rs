//! Relocates named type declarations from a configuration header's subtree into the
//! main header, for the best-effort internal/backend conversion mode where a type's
//! "real" definition is declared in a config header but its generated binding belongs
//! with the main output.

use crate::dom::{Dom, NodeId, NodeKind};
use indexmap::IndexSet;

/// Moves each top-level `ClassStructUnion`/`Typedef`/`EnumElement` named in `names`
/// out of any header under `dom.root()` other than `main_header` and into
/// `main_header`, preserving relative order.
pub fn relocate(dom: &mut Dom, main_header: NodeId, names: &IndexSet<String>) {
    let other_headers: Vec<NodeId> = dom
        .get(dom.root())
        .children()
        .iter()
        .copied()
        .filter(|&id| id != main_header && matches!(dom.get(id).kind, NodeKind::HeaderFile { .. }))
        .collect();

    for header in other_headers {
        let matches: Vec<NodeId> = dom
            .get(header)
            .children()
            .iter()
            .copied()
            .filter(|&c| type_name_of(dom, c).is_some_and(|n| names.contains(&n)))
            .collect();
        for id in matches {
            let insert_at = dom.get(main_header).children().len();
            dom.reparent_at(main_header, insert_at, id);
        }
    }
}

fn type_name_of(dom: &Dom, id: NodeId) -> Option<String> {
    match &dom.get(id).kind {
        NodeKind::ClassStructUnion { name, .. } => Some(name.clone()),
        NodeKind::Typedef { name, .. } => Some(name.clone()),
        NodeKind::EnumElement { name, .. } => Some(name.clone()),
        _ => None,
    }
}
