//! Emits a forward declaration for any struct referenced (by pointer, most commonly)
//! before its own definition appears in the same header, since C requires a type to
//! be at least declared before use.

use crate::dom::{Dom, NodeId, NodeKind, Type};
use indexmap::IndexSet;

/// Scans `header`'s direct children in order, recording each named struct's
/// definition position, and inserts a `typedef struct Name Name;` forward declaration
/// at the front of the header for every struct referenced (as a type anywhere in an
/// earlier declaration) before its own definition.
pub fn forward_declare_structs(dom: &mut Dom, header: NodeId) {
    let top_level = dom.get(header).children().to_vec();
    let mut definition_index = std::collections::HashMap::new();
    for (idx, &id) in top_level.iter().enumerate() {
        if let NodeKind::ClassStructUnion { name, is_forward_declaration: false, .. } = &dom.get(id).kind {
            definition_index.entry(name.clone()).or_insert(idx);
        }
    }

    let mut needed = IndexSet::new();
    for (idx, &id) in top_level.iter().enumerate() {
        visit_types(dom, id, &mut |ty: &Type| {
            if let Some(&def_idx) = definition_index.get(&ty.base_name) {
                if def_idx > idx {
                    needed.insert(ty.base_name.clone());
                }
            }
        });
    }
    if needed.is_empty() {
        return;
    }

    let insert_at = top_level
        .iter()
        .position(|&id| matches!(dom.get(id).kind, NodeKind::ClassStructUnion { .. } | NodeKind::FunctionDeclaration { .. } | NodeKind::Typedef { .. }))
        .unwrap_or(top_level.len());
    for (offset, name) in needed.iter().enumerate() {
        dom.insert_child(header, insert_at + offset, NodeKind::Code { text: format!("typedef struct {name} {name};") });
    }
}

fn visit_types(dom: &Dom, id: NodeId, f: &mut impl FnMut(&Type)) {
    match &dom.get(id).kind {
        NodeKind::FunctionDeclaration { return_type, .. } => f(return_type),
        NodeKind::FieldDeclaration { field_type, .. } => f(field_type),
        NodeKind::Typedef { aliased_type, .. } => f(aliased_type),
        NodeKind::TypeNode { type_value } => f(type_value),
        _ => {}
    }
    for child in dom.get(id).children() {
        match &dom.get(*child).kind {
            NodeKind::FunctionParameter { param_type, .. } => f(param_type),
            _ => visit_types(dom, *child, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn forward_declares_a_struct_referenced_before_its_definition() {
        let (mut dom, root) = parse_header_file("void Use(S* s);\nstruct S { int x; };\n", "t.h").unwrap();
        forward_declare_structs(&mut dom, root);
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::Code { text } => assert_eq!(text, "typedef struct S S;"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
