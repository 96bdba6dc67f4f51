//! Flags declarations that are implementation detail rather than public API, so the
//! JSON emitter can report them as internal without removing them outright (unlike
//! [`prune`](super::prune), which deletes declarations entirely).

use crate::dom::{Dom, NodeKind};

const INTERNAL_PREFIX: &str = "_Internal";

/// Marks `FunctionDeclaration`/`FieldDeclaration` nodes whose name starts with
/// `_Internal` as internal. Mirrors the check [`parser::function_like`] already
/// applies to fields at parse time, generalized to functions and re-applied here so a
/// caller-supplied rename pass running before this modifier cannot slip a declaration
/// past the check.
pub fn mark_internal_members(dom: &mut Dom) {
    for id in dom.collect_preorder(dom.root()) {
        match &mut dom.get_mut(id).kind {
            NodeKind::FunctionDeclaration { name, is_internal, .. } => {
                if name.starts_with(INTERNAL_PREFIX) {
                    *is_internal = true;
                }
            }
            NodeKind::FieldDeclaration { names, is_internal, .. } => {
                if names.first().is_some_and(|n| n.starts_with(INTERNAL_PREFIX)) {
                    *is_internal = true;
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn marks_internal_prefixed_function() {
        let (mut dom, root) = parse_header_file("void _InternalFoo();\nvoid Bar();\n", "t.h").unwrap();
        mark_internal_members(&mut dom);
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::FunctionDeclaration { is_internal, .. } => assert!(is_internal),
            other => panic!("unexpected {other:?}"),
        }
        match &dom.get(children[1]).kind {
            NodeKind::FunctionDeclaration { is_internal, .. } => assert!(!is_internal),
            other => panic!("unexpected {other:?}"),
        }
    }
}
