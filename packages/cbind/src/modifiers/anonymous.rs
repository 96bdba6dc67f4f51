//! Synthesizes stable names for anonymous structs/unions based on their enclosing
//! context, e.g. an unnamed union nested in `struct ImGuiStorage` becomes
//! `ImGuiStorage_anonymous0`.

use crate::dom::{Dom, NodeId, NodeKind};

pub fn assign_names(dom: &mut Dom) {
    for id in dom.collect_preorder(dom.root()) {
        assign_in_scope(dom, id);
    }
}

fn assign_in_scope(dom: &mut Dom, parent: NodeId) {
    let enclosing_name = enclosing_name(dom, parent);
    let mut next_index = 0u32;
    for child in dom.get(parent).children().to_vec() {
        let is_anonymous = matches!(
            &dom.get(child).kind,
            NodeKind::ClassStructUnion { is_anonymous: true, .. }
        );
        if !is_anonymous {
            continue;
        }
        let synthesized = format!("{enclosing_name}_anonymous{next_index}");
        next_index += 1;
        if let NodeKind::ClassStructUnion { name, is_anonymous, .. } = &mut dom.get_mut(child).kind {
            *name = synthesized;
            *is_anonymous = false;
        }
    }
}

fn enclosing_name(dom: &Dom, id: NodeId) -> String {
    match &dom.get(id).kind {
        NodeKind::ClassStructUnion { name, .. } => name.clone(),
        NodeKind::Namespace { name } => name.clone(),
        _ => "Anonymous".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn names_an_anonymous_union_after_its_enclosing_struct() {
        let (mut dom, root) = parse_header_file(
            "struct ImGuiStorage { union { int i; float f; }; };\n",
            "t.h",
        )
        .unwrap();
        assign_names(&mut dom);
        let outer = dom.get(root).children()[0];
        let inner = dom.get(outer).children()[0];
        match &dom.get(inner).kind {
            NodeKind::ClassStructUnion { name, is_anonymous, .. } => {
                assert_eq!(name, "ImGuiStorage_anonymous0");
                assert!(!is_anonymous);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
