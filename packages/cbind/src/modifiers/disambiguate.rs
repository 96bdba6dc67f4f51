//! Resolves overloaded free functions (same name, different parameters) into unique C
//! identifiers, since C has no overload resolution. Must run after template
//! flattening (so parameter types are concrete) and after class-function flattening
//! (so every overload set lives in one flat namespace) and after default-argument
//! generation (so the generated wrapper/`Ex` pair participates in its own set).

use super::fully_qualified_name;
use crate::dom::{Dom, NodeId, NodeKind, Type};
use indexmap::{IndexMap, IndexSet};

/// Appends a suffix derived from each differing parameter's type to every member of a
/// clashing overload set, skipping sets named in `ignore`. Ordinarily a member whose
/// parameters don't differ from the others by type at any position — two overloads
/// that clash purely by parameter count, with no position where every member has a
/// distinct type — gets no suffix at all and keeps its bare name as the implicit
/// "primary" overload. A set named in `rename_everything` opts out of that: every
/// member is forced to carry a suffix, falling back to the parameter count itself for
/// a member the type-based pass would otherwise leave bare.
pub fn disambiguate_functions(
    dom: &mut Dom,
    type_suffixes: &IndexMap<String, String>,
    ignore: &IndexSet<String>,
    rename_everything: &IndexSet<String>,
) {
    for scope in dom.collect_preorder(dom.root()) {
        let siblings = dom.get(scope).children().to_vec();
        let mut by_name: IndexMap<String, Vec<NodeId>> = IndexMap::new();
        for &id in &siblings {
            if let NodeKind::FunctionDeclaration { name, .. } = &dom.get(id).kind {
                by_name.entry(name.clone()).or_default().push(id);
            }
        }
        for (_, group) in by_name {
            if group.len() < 2 {
                continue;
            }
            if group.iter().any(|&id| ignore.contains(&fully_qualified_name(dom, id))) {
                continue;
            }
            let force_every_member = group.iter().any(|&id| rename_everything.contains(&fully_qualified_name(dom, id)));
            disambiguate_group(dom, &group, type_suffixes, force_every_member);
        }
    }
}

fn disambiguate_group(dom: &mut Dom, group: &[NodeId], type_suffixes: &IndexMap<String, String>, force_every_member: bool) {
    let param_types: Vec<Vec<Type>> = group.iter().map(|&id| function_param_types(dom, id)).collect();
    let max_arity = param_types.iter().map(Vec::len).max().unwrap_or(0);

    let mut differing = vec![false; max_arity];
    for idx in 0..max_arity {
        let first = param_types[0].get(idx).map(Type::render);
        if param_types.iter().any(|p| p.get(idx).map(Type::render) != first) {
            differing[idx] = true;
        }
    }

    for (&func_id, params) in group.iter().zip(param_types.iter()) {
        let mut suffix = String::new();
        for (idx, is_diff) in differing.iter().enumerate() {
            if !is_diff {
                continue;
            }
            if let Some(ty) = params.get(idx) {
                suffix.push_str(&suffix_for_type(ty, type_suffixes));
            }
        }
        if suffix.is_empty() {
            if !force_every_member {
                continue;
            }
            // Purely a parameter-count clash at this position: fall back to the
            // count itself so this member still gets a unique name.
            suffix = params.len().to_string();
        }
        if let NodeKind::FunctionDeclaration { name, .. } = &mut dom.get_mut(func_id).kind {
            name.push('_');
            name.push_str(&suffix);
        }
    }
}

fn function_param_types(dom: &Dom, func_id: NodeId) -> Vec<Type> {
    dom.get(func_id)
        .children()
        .iter()
        .filter_map(|&id| match &dom.get(id).kind {
            NodeKind::FunctionParameter { param_type, .. } => Some(param_type.clone()),
            _ => None,
        })
        .collect()
}

/// Maps a parameter type to a disambiguating suffix: an explicit remap entry first,
/// falling back to the type's own base name with an initial capital.
fn suffix_for_type(ty: &Type, remap: &IndexMap<String, String>) -> String {
    let rendered = ty.render();
    if let Some(mapped) = remap.get(&rendered) {
        return mapped.clone();
    }
    let mut chars = ty.base_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn suffixes_every_member_of_a_clashing_overload_set() {
        let (mut dom, root) = parse_header_file("void Baz(const char* s);\nvoid Baz(int x);\n", "t.h").unwrap();
        let mut remap = IndexMap::new();
        remap.insert("const char*".to_string(), "Str".to_string());
        disambiguate_functions(&mut dom, &remap, &IndexSet::new(), &IndexSet::new());
        let children = dom.get(root).children().to_vec();
        let names: Vec<_> = children
            .iter()
            .map(|&id| match &dom.get(id).kind {
                NodeKind::FunctionDeclaration { name, .. } => name.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["Baz_Str", "Baz_Int"]);
    }

    #[test]
    fn rename_everything_forces_a_suffix_even_on_a_pure_arity_clash() {
        let (mut dom, root) = parse_header_file("void Baz(int x);\nvoid Baz(int x, int y);\n", "t.h").unwrap();
        let mut rename_everything = IndexSet::new();
        rename_everything.insert("Baz".to_string());
        disambiguate_functions(&mut dom, &IndexMap::new(), &IndexSet::new(), &rename_everything);
        let children = dom.get(root).children().to_vec();
        let names: Vec<_> = children
            .iter()
            .map(|&id| match &dom.get(id).kind {
                NodeKind::FunctionDeclaration { name, .. } => name.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(names, vec!["Baz_1", "Baz_Int"]);
    }

    #[test]
    fn ignore_set_suppresses_disambiguation() {
        let (mut dom, root) = parse_header_file("void Baz(const char* s);\nvoid Baz(int x);\n", "t.h").unwrap();
        let mut ignore = IndexSet::new();
        ignore.insert("Baz".to_string());
        disambiguate_functions(&mut dom, &IndexMap::new(), &ignore, &IndexSet::new());
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::FunctionDeclaration { name, .. } => assert_eq!(name, "Baz"),
            _ => unreachable!(),
        }
    }
}
