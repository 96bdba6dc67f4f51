//! Generates call-site-friendly companions for variadic (`...`) functions, for
//! binding targets that cannot express C varargs at all: a `va_list` companion that
//! replaces `...` with a single `va_list` parameter, and (optionally) a run of
//! "exploded" companions that replace `...` with 0..N-1 concrete trailing parameters.

use super::clone_subtree;
use crate::dom::{Dom, NodeId, NodeKind, PointerKind, Type};
use indexmap::IndexMap;

/// For every variadic function, adds a `va_list`-based companion suffixed `V` (or the
/// per-function override in `custom_suffixes`, keyed by the function's current name).
pub fn add_va_list_functions(dom: &mut Dom, custom_suffixes: &IndexMap<String, String>) {
    for func_id in dom.collect_preorder(dom.root()) {
        let (name, is_variadic) = match &dom.get(func_id).kind {
            NodeKind::FunctionDeclaration { name, is_variadic, .. } => (name.clone(), *is_variadic),
            _ => continue,
        };
        if !is_variadic {
            continue;
        }
        let suffix = custom_suffixes.get(&name).cloned().unwrap_or_else(|| "V".to_string());
        let parent = dom.get(func_id).parent().expect("function must have a parent scope");
        let insert_at = dom.get(parent).children().iter().position(|&c| c == func_id).unwrap() + 1;

        let clone_id = clone_subtree(dom, parent, func_id);
        dom.reparent_at(parent, insert_at, clone_id);
        if let Some(varargs_param) = dom
            .get(clone_id)
            .children()
            .iter()
            .copied()
            .find(|&c| matches!(&dom.get(c).kind, NodeKind::FunctionParameter { is_varargs: true, .. }))
        {
            if let NodeKind::FunctionParameter { param_type, name, is_varargs, .. } = &mut dom.get_mut(varargs_param).kind {
                *param_type = Type::named("va_list");
                *name = "args".to_string();
                *is_varargs = false;
            }
        }
        if let NodeKind::FunctionDeclaration { name, is_variadic, .. } = &mut dom.get_mut(clone_id).kind {
            name.push_str(&suffix);
            *is_variadic = false;
        }
    }
}

/// For every variadic function, adds `max_args` companions named `{Name}{n}` (n from
/// 0 to `max_args - 1`) replacing `...` with `n` explicit `void*` trailing arguments —
/// an opaque placeholder, since a variadic signature carries no per-call argument
/// typing to recover.
pub fn add_exploded_variadic_functions(dom: &mut Dom, max_args: u32) {
    for func_id in dom.collect_preorder(dom.root()) {
        let (name, is_variadic) = match &dom.get(func_id).kind {
            NodeKind::FunctionDeclaration { name, is_variadic, .. } => (name.clone(), *is_variadic),
            _ => continue,
        };
        if !is_variadic {
            continue;
        }
        let parent = dom.get(func_id).parent().expect("function must have a parent scope");
        let mut insert_at = dom.get(parent).children().iter().position(|&c| c == func_id).unwrap() + 1;

        for n in 0..max_args {
            let clone_id = clone_subtree(dom, parent, func_id);
            dom.reparent_at(parent, insert_at, clone_id);
            insert_at += 1;
            explode_one(dom, clone_id, &name, n);
        }
    }
}

fn explode_one(dom: &mut Dom, func_id: NodeId, base_name: &str, n: u32) {
    let varargs_param =
        dom.get(func_id).children().iter().copied().find(|&c| matches!(&dom.get(c).kind, NodeKind::FunctionParameter { is_varargs: true, .. }));
    if let Some(varargs_param) = varargs_param {
        dom.remove_child(func_id, varargs_param);
    }
    for i in 0..n {
        dom.append_child(
            func_id,
            NodeKind::FunctionParameter {
                param_type: Type { base_name: "void".to_string(), pointer_chain: vec![PointerKind::Pointer], ..Default::default() },
                name: format!("arg{i}"),
                default_value: None,
                is_varargs: false,
            },
        );
    }
    if let NodeKind::FunctionDeclaration { name, is_variadic, .. } = &mut dom.get_mut(func_id).kind {
        *name = format!("{base_name}{n}");
        *is_variadic = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn adds_a_va_list_companion() {
        let (mut dom, root) = parse_header_file("void Text(const char* fmt, ...);\n", "t.h").unwrap();
        add_va_list_functions(&mut dom, &IndexMap::new());
        let children = dom.get(root).children().to_vec();
        assert_eq!(children.len(), 2);
        match &dom.get(children[1]).kind {
            NodeKind::FunctionDeclaration { name, is_variadic, .. } => {
                assert_eq!(name, "TextV");
                assert!(!is_variadic);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn explodes_variadic_function_into_numbered_companions() {
        let (mut dom, root) = parse_header_file("void Text(const char* fmt, ...);\n", "t.h").unwrap();
        add_exploded_variadic_functions(&mut dom, 3);
        let children = dom.get(root).children().to_vec();
        assert_eq!(children.len(), 4);
        match &dom.get(children[3]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "Text2"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dom.get(children[3]).children().len(), 3);
    }
}
