//! Marks structs the caller has declared safe to pass by value (as opposed to the
//! default of converting every struct parameter to a pointer — see
//! [`references::convert_by_value_struct_args_to_pointers`](super::references::convert_by_value_struct_args_to_pointers)).
//! The mark itself (`is_by_value_marked`) doesn't change anything by itself; it's
//! metadata the JSON emitter reports and a precondition the by-value argument
//! conversion reads through its own `by_value_structs` set, kept as two separate steps
//! because the original tool resolves the exemption list from several independent
//! sources before tagging the DOM with the result.

use crate::dom::{Dom, NodeKind};
use indexmap::IndexSet;

pub fn mark_by_value_structs(dom: &mut Dom, names: &IndexSet<String>) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::ClassStructUnion { name, is_by_value_marked, .. } = &mut dom.get_mut(id).kind {
            if names.contains(name.as_str()) {
                *is_by_value_marked = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn marks_only_the_named_structs() {
        let (mut dom, root) =
            parse_header_file("struct ImVec2 { float x; };\nstruct ImVec4 { float x; };\n", "t.h").unwrap();
        let mut names = IndexSet::new();
        names.insert("ImVec2".to_string());
        mark_by_value_structs(&mut dom, &names);

        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::ClassStructUnion { is_by_value_marked, .. } => assert!(is_by_value_marked),
            other => panic!("unexpected {other:?}"),
        }
        match &dom.get(children[1]).kind {
            NodeKind::ClassStructUnion { is_by_value_marked, .. } => assert!(!is_by_value_marked),
            other => panic!("unexpected {other:?}"),
        }
    }
}
