//! Targeted removals by fully qualified name: structs, all functions of a class,
//! specific functions, operators, heap new/delete, static/extern fields, nested
//! typedefs, `constexpr` functions, enum forward declarations, and named typedefs.
//! Each is a small, independent tree rewrite sharing the
//! [`fully_qualified_name`](super::fully_qualified_name) helper so a caller-supplied
//! target list means the same thing across all of them.

use super::fully_qualified_name;
use crate::dom::{Dom, NodeId, NodeKind};

/// Removes every `ClassStructUnion` (at any depth) whose name is in `names`.
pub fn remove_structs(dom: &mut Dom, names: &[&str]) {
    remove_where(dom, |dom, id| match &dom.get(id).kind {
        NodeKind::ClassStructUnion { name, .. } => names.contains(&name.as_str()),
        _ => false,
    });
}

/// Removes every member function whose owning class is in `class_names`.
pub fn remove_all_functions_from_classes(dom: &mut Dom, class_names: &[&str]) {
    remove_where(dom, |dom, id| match &dom.get(id).kind {
        NodeKind::FunctionDeclaration { owning_class: Some(class), .. } => {
            class_names.contains(&class.as_str())
        }
        _ => false,
    });
}

/// Removes functions whose fully qualified name (`Class::Method` or, for a namespaced
/// free function, `Namespace::Name`) is in `names`.
pub fn remove_functions(dom: &mut Dom, names: &[&str]) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::FunctionDeclaration { .. })
            && names.contains(&fully_qualified_name(dom, id).as_str())
    });
}

/// Removes every operator overload (`operator==`, `operator[]`, ...) except
/// `operator new`/`operator delete`, which [`remove_heap_constructors_and_destructors`]
/// handles specifically.
pub fn remove_operators(dom: &mut Dom) {
    remove_where(dom, |dom, id| match &dom.get(id).kind {
        NodeKind::FunctionDeclaration { is_operator: true, name, .. } => {
            !name.starts_with("operatornew") && !name.starts_with("operatordelete")
        }
        _ => false,
    });
}

/// Removes `operator new`/`operator delete` (and their array forms) — C has no
/// equivalent and nothing in the DOM can sensibly bridge them.
pub fn remove_heap_constructors_and_destructors(dom: &mut Dom) {
    const HEAP_OPERATORS: &[&str] =
        &["operatornew", "operatordelete", "operatornew[]", "operatordelete[]"];
    remove_where(dom, |dom, id| match &dom.get(id).kind {
        NodeKind::FunctionDeclaration { name, .. } => HEAP_OPERATORS.contains(&name.as_str()),
        _ => false,
    });
}

pub fn remove_static_fields(dom: &mut Dom) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::FieldDeclaration { is_static: true, .. })
    });
}

pub fn remove_extern_fields(dom: &mut Dom) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::FieldDeclaration { is_extern: true, .. })
    });
}

/// Removes `typedef`s nested inside a struct/class/union body — C typedefs have no
/// notion of class-scoping, so these would need to be hoisted and renamed to mean
/// anything in the output; the original tool simply drops them.
pub fn remove_nested_typedefs(dom: &mut Dom) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::Typedef { .. })
            && dom
                .get(id)
                .parent()
                .is_some_and(|p| matches!(&dom.get(p).kind, NodeKind::ClassStructUnion { .. }))
    });
}

pub fn remove_constexpr(dom: &mut Dom) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::FunctionDeclaration { is_constexpr: true, .. })
    });
}

/// Removes `EnumElement` nodes with no entries — the result of a bare `enum Name;`
/// forward declaration, which C cannot express (C enums must be defined where used).
pub fn remove_enum_forward_declarations(dom: &mut Dom) {
    remove_where(dom, |dom, id| {
        matches!(&dom.get(id).kind, NodeKind::EnumElement { .. }) && dom.get(id).children().is_empty()
    });
}

pub fn remove_typedefs(dom: &mut Dom, names: &[&str]) {
    remove_where(dom, |dom, id| match &dom.get(id).kind {
        NodeKind::Typedef { name, .. } => names.contains(&name.as_str()),
        _ => false,
    });
}

/// Finds every node matching `predicate` and removes it from its parent. Collected up
/// front (rather than removed while walking) since removal invalidates sibling
/// indices the preorder walk has already queued.
fn remove_where(dom: &mut Dom, predicate: impl Fn(&Dom, NodeId) -> bool) {
    let matches: Vec<NodeId> = dom
        .collect_preorder(dom.root())
        .into_iter()
        .filter(|&id| predicate(dom, id))
        .collect();
    for id in matches {
        if let Some(parent) = dom.get(id).parent() {
            dom.remove_child(parent, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn remove_structs_drops_named_structs_anywhere() {
        let (mut dom, root) = parse_header_file("struct ImGuiOnceUponAFrame { int x; };\n", "t.h").unwrap();
        remove_structs(&mut dom, &["ImGuiOnceUponAFrame"]);
        assert!(dom.get(root).children().is_empty());
    }

    #[test]
    fn remove_functions_matches_by_qualified_name() {
        let (mut dom, root) =
            parse_header_file("namespace ImGui { void Value(int x); }\n", "t.h").unwrap();
        remove_functions(&mut dom, &["ImGui::Value"]);
        let ns = dom.get(root).children()[0];
        assert!(dom.get(ns).children().is_empty());
    }

    #[test]
    fn remove_operators_keeps_heap_new_and_delete() {
        let (mut dom, root) = parse_header_file(
            "struct S { void operator==(int x); void* operator new(int x); };\n",
            "t.h",
        )
        .unwrap();
        remove_operators(&mut dom);
        let s = dom.get(root).children()[0];
        assert_eq!(dom.get(s).children().len(), 1);
    }

    #[test]
    fn remove_enum_forward_declarations_drops_empty_enums() {
        let (mut dom, root) = parse_header_file("enum Foo;\nenum Bar { A, B };\n", "t.h").unwrap();
        remove_enum_forward_declarations(&mut dom);
        assert_eq!(dom.get(root).children().len(), 1);
    }
}
