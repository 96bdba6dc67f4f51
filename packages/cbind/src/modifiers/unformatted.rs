//! Generates a non-formatting companion for each `printf`-style function, for callers
//! that already have a finished string and don't want to route it through a format
//! string just to pass it through unchanged.

use super::{clone_subtree, fully_qualified_name};
use crate::dom::{Dom, NodeKind, PointerKind, Type};
use indexmap::IndexSet;

/// For every function whose last two declared parameters are `(const char* fmt, ...)`,
/// adds an `Unformatted`-suffixed companion taking `(const char* text, const char*
/// text_end)` instead, skipping names in `ignore`.
pub fn add_unformatted_functions(dom: &mut Dom, ignore: &IndexSet<String>) {
    for func_id in dom.collect_preorder(dom.root()) {
        let (name, is_variadic) = match &dom.get(func_id).kind {
            NodeKind::FunctionDeclaration { name, is_variadic, .. } => (name.clone(), *is_variadic),
            _ => continue,
        };
        if !is_variadic || ignore.contains(&fully_qualified_name(dom, func_id)) {
            continue;
        }
        let params = dom.get(func_id).children().to_vec();
        let has_fmt_tail = params.len() >= 2
            && matches!(&dom.get(params[params.len() - 2]).kind, NodeKind::FunctionParameter { name, .. } if name == "fmt");
        if !has_fmt_tail {
            continue;
        }

        let parent = dom.get(func_id).parent().expect("function must have a parent scope");
        let insert_at = dom.get(parent).children().iter().position(|&c| c == func_id).unwrap() + 1;
        let clone_id = clone_subtree(dom, parent, func_id);
        dom.reparent_at(parent, insert_at, clone_id);

        let clone_params = dom.get(clone_id).children().to_vec();
        for &p in &clone_params[clone_params.len() - 2..] {
            dom.remove_child(clone_id, p);
        }
        let const_char_ptr =
            || Type { base_name: "char".to_string(), qualifiers: vec![crate::dom::Qualifier::Const], pointer_chain: vec![PointerKind::Pointer], ..Default::default() };
        dom.append_child(
            clone_id,
            NodeKind::FunctionParameter { param_type: const_char_ptr(), name: "text".to_string(), default_value: None, is_varargs: false },
        );
        dom.append_child(
            clone_id,
            NodeKind::FunctionParameter { param_type: const_char_ptr(), name: "text_end".to_string(), default_value: None, is_varargs: false },
        );
        if let NodeKind::FunctionDeclaration { name, is_variadic, .. } = &mut dom.get_mut(clone_id).kind {
            name.push_str("Unformatted");
            *is_variadic = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn adds_an_unformatted_companion() {
        let (mut dom, root) = parse_header_file("void Text(const char* fmt, ...);\n", "t.h").unwrap();
        add_unformatted_functions(&mut dom, &IndexSet::new());
        let children = dom.get(root).children().to_vec();
        assert_eq!(children.len(), 2);
        match &dom.get(children[1]).kind {
            NodeKind::FunctionDeclaration { name, is_variadic, .. } => {
                assert_eq!(name, "TextUnformatted");
                assert!(!is_variadic);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dom.get(children[1]).children().len(), 2);
    }
}
