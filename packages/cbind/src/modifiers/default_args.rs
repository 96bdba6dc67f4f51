//! Generates a pair of C declarations for every function with defaulted trailing
//! parameters, since C has no default-argument syntax: a bare-named companion that
//! drops the trailing defaulted parameters (forwarding their default values in the
//! bridge), and an `Ex`-suffixed companion that keeps the full parameter list. When
//! dropping the trailing defaults would leave nothing to distinguish the two (a
//! single, wholly-defaulted trailing parameter of a non-trivial type/name), at least
//! one parameter is always kept in the bare companion, which then has the same
//! signature as the `Ex` one and is suppressed, leaving a single bare-named
//! declaration. A trailing defaulted parameter of a caller-designated trivial type or
//! name is exempt from that "keep at least one" rule, so it doesn't by itself
//! suppress the wrapper pair. Must run before disambiguation so the generated
//! companions participate in overload resolution.

use super::{clone_subtree, fully_qualified_name};
use crate::dom::{Dom, NodeId, NodeKind};
use indexmap::IndexSet;

pub fn generate_default_argument_functions(
    dom: &mut Dom,
    ignore: &IndexSet<String>,
    ignore_prefixes: &IndexSet<String>,
    trivial_argument_types: &IndexSet<String>,
    trivial_argument_names: &IndexSet<String>,
) {
    for func_id in dom.collect_preorder(dom.root()) {
        if !matches!(dom.get(func_id).kind, NodeKind::FunctionDeclaration { .. }) {
            continue;
        }
        let name = fully_qualified_name(dom, func_id);
        if ignore.contains(&name) {
            continue;
        }
        if ignore_prefixes.iter().any(|prefix| name.starts_with(prefix.as_str())) {
            continue;
        }
        generate_for(dom, func_id, trivial_argument_types, trivial_argument_names);
    }
}

fn generate_for(dom: &mut Dom, func_id: NodeId, trivial_argument_types: &IndexSet<String>, trivial_argument_names: &IndexSet<String>) {
    let params = dom.get(func_id).children().to_vec();
    let total = params.len();
    let required_count = params
        .iter()
        .position(|&p| matches!(&dom.get(p).kind, NodeKind::FunctionParameter { default_value: Some(_), .. }))
        .unwrap_or(total);
    if required_count == total {
        return;
    }
    // Normally at least one parameter is force-kept in the bare companion so a
    // wholly-defaulted function still gets a meaningful bare declaration instead of
    // one with an empty parameter list. A trivial-typed/named first-defaulted
    // parameter is exempt: it's not worth force-keeping just to distinguish the two
    // signatures, so the bare companion may drop it too.
    let first_default_is_trivial = match &dom.get(params[required_count]).kind {
        NodeKind::FunctionParameter { param_type, name, .. } => {
            trivial_argument_types.contains(&param_type.base_name) || trivial_argument_names.contains(name)
        }
        _ => false,
    };
    let forced_minimum = if first_default_is_trivial { 0 } else { 1 };
    let effective_required = required_count.max(forced_minimum.min(total));

    let parent = dom.get(func_id).parent().expect("function must have a parent scope");
    let insert_at = dom.get(parent).children().iter().position(|&c| c == func_id).unwrap() + 1;

    let full_id = clone_subtree(dom, parent, func_id);
    dom.reparent_at(parent, insert_at, full_id);
    if let NodeKind::FunctionDeclaration { name, is_default_helper, .. } = &mut dom.get_mut(full_id).kind {
        name.push_str("Ex");
        *is_default_helper = false;
    }

    if effective_required == total {
        // Dropping the trailing defaults wouldn't remove any parameter; the bare
        // companion and the `Ex` companion would be identical, so keep only the
        // original (already-bare-named) declaration and discard the `Ex` clone.
        dom.remove_child(parent, full_id);
        return;
    }

    for extra in params[effective_required..].iter().rev() {
        dom.remove_child(func_id, *extra);
    }
    if let NodeKind::FunctionDeclaration { is_default_helper, .. } = &mut dom.get_mut(func_id).kind {
        *is_default_helper = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    fn generate(dom: &mut crate::dom::Dom) {
        generate_default_argument_functions(dom, &IndexSet::new(), &IndexSet::new(), &IndexSet::new(), &IndexSet::new());
    }

    #[test]
    fn single_defaulted_parameter_suppresses_the_wrapper() {
        let (mut dom, root) = parse_header_file("namespace N { void Foo(int x = 5); }\n", "t.h").unwrap();
        let ns = dom.get(root).children()[0];
        generate(&mut dom);
        let funcs = dom.get(ns).children().to_vec();
        assert_eq!(funcs.len(), 1);
        match &dom.get(funcs[0]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "Foo"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn two_defaulted_parameters_produce_both_variants() {
        let (mut dom, root) = parse_header_file("namespace N { void Foo(int x, int y = 5); }\n", "t.h").unwrap();
        let ns = dom.get(root).children()[0];
        generate(&mut dom);
        let funcs = dom.get(ns).children().to_vec();
        assert_eq!(funcs.len(), 2);
        let names: Vec<_> = funcs
            .iter()
            .map(|&id| match &dom.get(id).kind {
                NodeKind::FunctionDeclaration { name, .. } => name.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["Foo", "FooEx"]);
        assert_eq!(dom.get(funcs[0]).children().len(), 1);
        assert_eq!(dom.get(funcs[1]).children().len(), 2);
    }

    #[test]
    fn a_trivial_typed_sole_default_does_not_suppress_the_wrapper() {
        let (mut dom, root) = parse_header_file("namespace N { void Foo(ImGuiCond cond = 0); }\n", "t.h").unwrap();
        let ns = dom.get(root).children()[0];
        let mut trivial_types = IndexSet::new();
        trivial_types.insert("ImGuiCond".to_string());
        generate_default_argument_functions(&mut dom, &IndexSet::new(), &IndexSet::new(), &trivial_types, &IndexSet::new());
        let funcs = dom.get(ns).children().to_vec();
        assert_eq!(funcs.len(), 2);
        assert_eq!(dom.get(funcs[0]).children().len(), 0);
        assert_eq!(dom.get(funcs[1]).children().len(), 1);
    }

    #[test]
    fn a_trivial_named_sole_default_does_not_suppress_the_wrapper() {
        let (mut dom, root) = parse_header_file("namespace N { void Foo(int flags = 0); }\n", "t.h").unwrap();
        let ns = dom.get(root).children()[0];
        let mut trivial_names = IndexSet::new();
        trivial_names.insert("flags".to_string());
        generate_default_argument_functions(&mut dom, &IndexSet::new(), &IndexSet::new(), &IndexSet::new(), &trivial_names);
        let funcs = dom.get(ns).children().to_vec();
        assert_eq!(funcs.len(), 2);
    }

    #[test]
    fn a_function_prefix_is_skipped_like_an_exact_ignore() {
        let (mut dom, root) = parse_header_file("void ImGuiStorage_Foo(int x = 5);\n", "t.h").unwrap();
        let mut prefixes = IndexSet::new();
        prefixes.insert("ImGuiStorage_".to_string());
        generate_default_argument_functions(&mut dom, &IndexSet::new(), &prefixes, &IndexSet::new(), &IndexSet::new());
        let funcs = dom.get(root).children().to_vec();
        assert_eq!(funcs.len(), 1);
        match &dom.get(funcs[0]).kind {
            NodeKind::FunctionDeclaration { is_default_helper, .. } => assert!(!is_default_helper),
            other => panic!("unexpected {other:?}"),
        }
    }
}
