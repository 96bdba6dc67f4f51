//! Reference-to-pointer conversion (unconditional, since C has no references) and the
//! optional by-value-struct-to-pointer conversion used for languages whose FFI layer
//! cannot pass aggregates by value ergonomically.

use super::collect_struct_names;
use crate::dom::{Dom, NodeId, PointerKind, Qualifier, Type};
use indexmap::IndexSet;

/// Rewrites every `T&` (return type, parameter, or field type) found anywhere in the
/// DOM to `T*`, setting `was_reference` so the C++ bridge knows to dereference at the
/// call site even though `is_reference` is now false.
pub fn convert_references_to_pointers(dom: &mut Dom) {
    for_each_type_mut(dom, |ty| {
        if ty.is_reference {
            ty.is_reference = false;
            ty.was_reference = true;
            ty.pointer_chain.push(PointerKind::Pointer);
        }
    });
}

/// Rewrites every `FunctionParameter` whose type names a known struct (and is not
/// already a pointer/reference, and is not in `by_value_structs`) from `T` to
/// `const T*`, setting `was_value_struct` so the C++ bridge constructs a `T` from the
/// pointer before forwarding.
pub fn convert_by_value_struct_args_to_pointers(dom: &mut Dom, by_value_structs: &IndexSet<String>) {
    let struct_names = collect_struct_names(dom);
    let functions: Vec<NodeId> = dom
        .collect_preorder(dom.root())
        .into_iter()
        .filter(|&id| matches!(dom.get(id).kind, crate::dom::NodeKind::FunctionDeclaration { .. }))
        .collect();
    for func in functions {
        for param in dom.get(func).children().to_vec() {
            let Some(ty) = param_type_mut(dom, param) else { continue };
            if ty.is_pointer() || ty.is_reference || ty.was_reference {
                continue;
            }
            if !struct_names.contains(&ty.base_name) || by_value_structs.contains(&ty.base_name) {
                continue;
            }
            if !ty.qualifiers.contains(&Qualifier::Const) {
                ty.qualifiers.push(Qualifier::Const);
            }
            ty.pointer_chain.push(PointerKind::Pointer);
            ty.was_value_struct = true;
        }
    }
}

fn param_type_mut(dom: &mut Dom, param: NodeId) -> Option<&mut Type> {
    match &mut dom.get_mut(param).kind {
        crate::dom::NodeKind::FunctionParameter { param_type, .. } => Some(param_type),
        _ => None,
    }
}

/// Applies `f` to every `Type` reachable from the DOM: function return types,
/// parameter types, field types, typedef aliases, and (recursively) their template
/// arguments and function-pointer signatures.
fn for_each_type_mut(dom: &mut Dom, mut f: impl FnMut(&mut Type)) {
    for id in dom.collect_preorder(dom.root()) {
        match &mut dom.get_mut(id).kind {
            crate::dom::NodeKind::FunctionDeclaration { return_type, .. } => visit_type(return_type, &mut f),
            crate::dom::NodeKind::FunctionParameter { param_type, .. } => visit_type(param_type, &mut f),
            crate::dom::NodeKind::FieldDeclaration { field_type, .. } => visit_type(field_type, &mut f),
            crate::dom::NodeKind::Typedef { aliased_type, .. } => visit_type(aliased_type, &mut f),
            crate::dom::NodeKind::TypeNode { type_value } => visit_type(type_value, &mut f),
            _ => {}
        }
    }
}

fn visit_type(ty: &mut Type, f: &mut impl FnMut(&mut Type)) {
    f(ty);
    for arg in &mut ty.template_args {
        visit_type(arg, f);
    }
    if let Some(sig) = &mut ty.function_pointer {
        visit_type(&mut sig.return_type, f);
        for p in &mut sig.parameter_types {
            visit_type(p, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn converts_a_reference_return_type_to_a_pointer() {
        let (mut dom, root) = parse_header_file("ImVec2& GetPos();\n", "t.h").unwrap();
        convert_references_to_pointers(&mut dom);
        let func = dom.get(root).children()[0];
        match &dom.get(func).kind {
            crate::dom::NodeKind::FunctionDeclaration { return_type, .. } => {
                assert!(!return_type.is_reference);
                assert!(return_type.was_reference);
                assert!(return_type.is_pointer());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn converts_a_by_value_struct_parameter_to_a_const_pointer() {
        let (mut dom, root) =
            parse_header_file("struct ImVec2 { float x; float y; };\nvoid Foo(ImVec2 v);\n", "t.h").unwrap();
        convert_by_value_struct_args_to_pointers(&mut dom, &IndexSet::new());
        let func = dom.get(root).children()[1];
        let param = dom.get(func).children()[0];
        match &dom.get(param).kind {
            crate::dom::NodeKind::FunctionParameter { param_type, .. } => {
                assert!(param_type.was_value_struct);
                assert!(param_type.is_pointer());
                assert!(param_type.qualifiers.contains(&Qualifier::Const));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn leaves_by_value_struct_parameters_in_the_exemption_set_alone() {
        let (mut dom, root) =
            parse_header_file("struct ImVec2 { float x; float y; };\nvoid Foo(ImVec2 v);\n", "t.h").unwrap();
        let mut exempt = IndexSet::new();
        exempt.insert("ImVec2".to_string());
        convert_by_value_struct_args_to_pointers(&mut dom, &exempt);
        let func = dom.get(root).children()[1];
        let param = dom.get(func).children()[0];
        match &dom.get(param).kind {
            crate::dom::NodeKind::FunctionParameter { param_type, .. } => assert!(!param_type.is_pointer()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
