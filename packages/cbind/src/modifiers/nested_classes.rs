//! Promotes each nested class/struct/union to its enclosing scope, renaming it
//! `Outer_Inner` so the flattened name stays unique and traceable to where it was
//! declared.

use crate::dom::{Dom, NodeId, NodeKind};

pub fn flatten(dom: &mut Dom) {
    loop {
        let target = dom.collect_preorder(dom.root()).into_iter().find_map(|id| {
            let outer_name = match &dom.get(id).kind {
                NodeKind::ClassStructUnion { name, .. } if !name.is_empty() => name.clone(),
                _ => return None,
            };
            dom.get(id)
                .children()
                .iter()
                .copied()
                .find(|&c| matches!(dom.get(c).kind, NodeKind::ClassStructUnion { .. }))
                .map(|inner| (id, inner, outer_name))
        });
        let Some((outer, inner, outer_name)) = target else { return };

        if let NodeKind::ClassStructUnion { name, .. } = &mut dom.get_mut(inner).kind {
            *name = format!("{outer_name}_{name}");
        }
        rename_owning_class_refs(dom, inner, &format!("{outer_name}_"));

        let grandparent = dom.get(outer).parent().expect("nested class's outer must have a parent");
        let insert_at = dom.get(grandparent).children().iter().position(|&c| c == outer).unwrap() + 1;
        dom.reparent_at(grandparent, insert_at, inner);
    }
}

/// After renaming the nested class itself, its own member functions' `owning_class`
/// must track the new flattened name so later passes (disambiguation,
/// class-function flattening) see the same identifier the emitter will print.
fn rename_owning_class_refs(dom: &mut Dom, class: NodeId, prefix: &str) {
    let new_name = match &dom.get(class).kind {
        NodeKind::ClassStructUnion { name, .. } => name.clone(),
        _ => return,
    };
    let old_name = new_name.strip_prefix(prefix).unwrap_or(&new_name).to_string();
    for child in dom.get(class).children().to_vec() {
        if let NodeKind::FunctionDeclaration { owning_class, .. } = &mut dom.get_mut(child).kind {
            if owning_class.as_deref() == Some(old_name.as_str()) {
                *owning_class = Some(new_name.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn promotes_a_nested_struct_and_renames_it() {
        let (mut dom, root) =
            parse_header_file("struct Outer { struct Inner { int x; }; };\n", "t.h").unwrap();
        flatten(&mut dom);
        assert_eq!(dom.get(root).children().len(), 2);
        match &dom.get(dom.get(root).children()[1]).kind {
            NodeKind::ClassStructUnion { name, .. } => assert_eq!(name, "Outer_Inner"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
