//! Flattens namespaces into a flat prefix on every identifier they contain, and
//! (the companion `add_prefix_to_loose_functions` pass) prefixes free functions that
//! were never namespaced in the first place, so the two sets don't produce a C API
//! with an inconsistent naming scheme.

use crate::dom::{Dom, NodeId, NodeKind};
use indexmap::IndexMap;

/// Given `{namespace name: prefix}`, strips every matching `Namespace` node (promoting
/// its children into the enclosing scope) and prepends the configured prefix to every
/// function and type declared directly inside it.
pub fn flatten(dom: &mut Dom, prefixes: &IndexMap<String, String>) {
    loop {
        let target = dom
            .collect_preorder(dom.root())
            .into_iter()
            .find_map(|id| match &dom.get(id).kind {
                NodeKind::Namespace { name } if prefixes.contains_key(name) => {
                    Some((id, prefixes[name].clone()))
                }
                _ => None,
            });
        let Some((ns, prefix)) = target else { return };
        let parent = dom.get(ns).parent().expect("namespace node must have a parent");

        for child in dom.get(ns).children().to_vec() {
            apply_prefix(dom, child, &prefix);
        }

        let insert_at = dom.get(parent).children().iter().position(|&c| c == ns).unwrap();
        let moved = dom.get(ns).children().to_vec();
        dom.remove_child(parent, ns);
        for (offset, child) in moved.into_iter().enumerate() {
            dom.reparent_at(parent, insert_at + offset, child);
        }
    }
}

/// Prepends `prefix` to every free function directly in `HeaderFile` scope (i.e. not a
/// member function and not inside a still-present `Namespace`) that hasn't already
/// been flattened out of one.
pub fn add_prefix_to_loose_functions(dom: &mut Dom, prefix: &str) {
    for header in dom.collect_preorder(dom.root()) {
        if !matches!(dom.get(header).kind, NodeKind::HeaderFile { .. }) {
            continue;
        }
        for child in dom.get(header).children().to_vec() {
            if let NodeKind::FunctionDeclaration { is_member: false, .. } = &dom.get(child).kind {
                rename_function(dom, child, |name| format!("{prefix}{name}"));
            }
        }
    }
}

fn apply_prefix(dom: &mut Dom, id: NodeId, prefix: &str) {
    match &mut dom.get_mut(id).kind {
        NodeKind::FunctionDeclaration { name, .. } => *name = format!("{prefix}{name}"),
        NodeKind::ClassStructUnion { name, .. } if !name.is_empty() => *name = format!("{prefix}{name}"),
        NodeKind::EnumElement { name, .. } => *name = format!("{prefix}{name}"),
        NodeKind::Typedef { name, .. } => *name = format!("{prefix}{name}"),
        _ => {}
    }
}

fn rename_function(dom: &mut Dom, id: NodeId, rename: impl FnOnce(&str) -> String) {
    if let NodeKind::FunctionDeclaration { name, .. } = &mut dom.get_mut(id).kind {
        *name = rename(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn flattens_a_namespace_and_prefixes_its_functions() {
        let (mut dom, root) = parse_header_file("namespace ImGui { void Foo(int x); }\n", "t.h").unwrap();
        let mut prefixes = IndexMap::new();
        prefixes.insert("ImGui".to_string(), "ImGui_".to_string());
        flatten(&mut dom, &prefixes);
        assert_eq!(dom.get(root).children().len(), 1);
        match &dom.get(dom.get(root).children()[0]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "ImGui_Foo"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn prefixes_loose_functions_not_inside_any_namespace() {
        let (mut dom, root) = parse_header_file("void Foo(int x);\n", "t.h").unwrap();
        add_prefix_to_loose_functions(&mut dom, "c");
        match &dom.get(dom.get(root).children()[0]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "cFoo"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
