//! Flattens member functions into free functions, since C has no notion of a method.
//! An ordinary member `S::Bar()` becomes the free function `S_Bar(S* self)`; a
//! constructor becomes `S_S(...)` returning nothing extra (callers are expected to
//! have already allocated the struct) and a destructor becomes `S_destroy(S* self)`.
//! Must run before disambiguation, since disambiguation only ever looks at one flat
//! namespace of free functions.

use crate::dom::{Accessibility, Dom, MemberFunctionKind, NodeId, NodeKind, PointerKind, Type};

/// Promotes every member `FunctionDeclaration` out of its enclosing
/// `ClassStructUnion` to become a sibling of that class, renamed and (for ordinary
/// methods) given a leading `self` pointer parameter.
pub fn flatten(dom: &mut Dom) {
    for class_id in dom.collect_preorder(dom.root()) {
        let class_name = match &dom.get(class_id).kind {
            NodeKind::ClassStructUnion { name, .. } if !name.is_empty() => name.clone(),
            _ => continue,
        };
        let Some(parent) = dom.get(class_id).parent() else { continue };

        let member_fns: Vec<NodeId> = dom
            .get(class_id)
            .children()
            .iter()
            .copied()
            .filter(|&c| matches!(&dom.get(c).kind, NodeKind::FunctionDeclaration { is_member: true, .. }))
            .collect();

        let mut insert_at = dom.get(parent).children().iter().position(|&c| c == class_id).unwrap() + 1;
        for func_id in member_fns {
            flatten_one(dom, func_id, &class_name);
            dom.reparent_at(parent, insert_at, func_id);
            insert_at += 1;
        }
    }
}

fn flatten_one(dom: &mut Dom, func_id: NodeId, class_name: &str) {
    let member_kind = match &dom.get(func_id).kind {
        NodeKind::FunctionDeclaration { member_kind, .. } => *member_kind,
        _ => None,
    };
    let needs_self = !matches!(member_kind, Some(MemberFunctionKind::Constructor));

    if needs_self {
        let self_type = Type { base_name: class_name.to_string(), pointer_chain: vec![PointerKind::Pointer], ..Default::default() };
        dom.insert_child(
            func_id,
            0,
            NodeKind::FunctionParameter { param_type: self_type, name: "self".to_string(), default_value: None, is_varargs: false },
        );
    }

    if let NodeKind::FunctionDeclaration { name, is_member, owning_class, accessibility, .. } = &mut dom.get_mut(func_id).kind {
        *name = match member_kind {
            Some(MemberFunctionKind::Constructor) => class_name.to_string(),
            Some(MemberFunctionKind::Destructor) => format!("{class_name}_destroy"),
            _ => format!("{class_name}_{name}"),
        };
        *is_member = false;
        *owning_class = None;
        *accessibility = Accessibility::Public;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn flattens_an_ordinary_member_with_a_self_parameter() {
        let (mut dom, root) = parse_header_file("struct S { void Bar(); };\n", "t.h").unwrap();
        flatten(&mut dom);
        let children = dom.get(root).children().to_vec();
        assert_eq!(children.len(), 2);
        match &dom.get(children[1]).kind {
            NodeKind::FunctionDeclaration { name, is_member, .. } => {
                assert_eq!(name, "S_Bar");
                assert!(!is_member);
            }
            other => panic!("unexpected {other:?}"),
        }
        let params = dom.get(children[1]).children().to_vec();
        assert_eq!(params.len(), 1);
        match &dom.get(params[0]).kind {
            NodeKind::FunctionParameter { name, param_type, .. } => {
                assert_eq!(name, "self");
                assert!(param_type.is_pointer());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn flattens_a_constructor_without_a_self_parameter() {
        let (mut dom, root) = parse_header_file("struct S { S(); };\n", "t.h").unwrap();
        flatten(&mut dom);
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[1]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "S"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(dom.get(children[1]).children().is_empty());
    }
}
