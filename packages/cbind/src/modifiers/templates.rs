//! Flattens `template<...> struct Name { ... };` declarations into concrete
//! instantiations (`Name<int>` becomes a plain `Name_int` struct), iterated to a
//! fixpoint since an instantiated member can itself reference an as-yet-uninstantiated
//! template. A `custom_type_fudge` map lets the caller pre-canonicalize awkward
//! pointer-to-const forms a straight substitution would otherwise leave untouched
//! (e.g. `const T**` where the intended meaning is `T* const*`).

use super::clone_subtree;
use crate::dom::{Dom, NodeId, NodeKind, Type};
use crate::error::ModifierError;
use crate::lexer::{tokenize, TokenCursor};
use crate::parser::parse_type;
use indexmap::IndexMap;

const MAX_ITERATIONS: u32 = 16;

/// Repeatedly finds template instantiations still referencing a `TemplateDeclaration`
/// by name and replaces each with a concrete struct, generating the struct the first
/// time a given instantiation is seen and just rewriting later occurrences to point at
/// it. Returns [`ModifierError::TemplateFlattenLimitExceeded`] if the rewrite hasn't
/// converged after [`MAX_ITERATIONS`] passes, which only happens for a template whose
/// body keeps referencing a new instantiation of itself.
pub fn flatten(dom: &mut Dom, custom_type_fudge: &IndexMap<String, String>) -> Result<(), ModifierError> {
    for iteration in 0.. {
        if iteration >= MAX_ITERATIONS {
            return Err(ModifierError::TemplateFlattenLimitExceeded {
                modifier: "templates",
                iterations: iteration,
            });
        }
        if !flatten_one_pass(dom, custom_type_fudge) {
            return Ok(());
        }
    }
    unreachable!()
}

/// Registry of template declarations still present in the DOM, keyed by the name of
/// the struct/class they template.
struct Template {
    decl_id: NodeId,
    body_id: NodeId,
    parameters: Vec<String>,
}

fn collect_templates(dom: &Dom) -> IndexMap<String, Template> {
    let mut out = IndexMap::new();
    for id in dom.collect_preorder(dom.root()) {
        let NodeKind::TemplateDeclaration { parameters } = &dom.get(id).kind else { continue };
        let Some(&body_id) = dom.get(id).children().first() else { continue };
        let name = match &dom.get(body_id).kind {
            NodeKind::ClassStructUnion { name, .. } => name.clone(),
            _ => continue,
        };
        out.insert(name, Template { decl_id: id, body_id, parameters: parameters.clone() });
    }
    out
}

/// One rewrite pass: find the first `Type` usage that instantiates a known template
/// with fully concrete arguments, materialize (or reuse) its flattened struct, and
/// rewrite the usage site to name it directly. Returns whether anything changed, so the
/// caller can iterate to a fixpoint.
fn flatten_one_pass(dom: &mut Dom, custom_type_fudge: &IndexMap<String, String>) -> bool {
    let templates = collect_templates(dom);
    if templates.is_empty() {
        return false;
    }
    let existing_structs = super::collect_struct_names(dom);

    let target = dom.collect_preorder(dom.root()).into_iter().find_map(|id| {
        find_instantiation(dom, id, &templates).map(|flat_name| (id, flat_name))
    });
    let Some((type_owner, flat_name)) = target else { return false };

    if !existing_structs.contains(&flat_name) {
        instantiate(dom, &templates, &flat_name, custom_type_fudge);
    }
    rewrite_usage(dom, type_owner, &flat_name);
    true
}

/// Looks for a `Type` on `id` (return type, parameter type, or field type — template
/// instantiations don't nest inside other template arguments in practice here, so a
/// shallow check at each of these three sites is enough) that names a known template
/// with every argument already concrete (not itself an unresolved instantiation).
fn find_instantiation(dom: &Dom, id: NodeId, templates: &IndexMap<String, Template>) -> Option<String> {
    let ty = match &dom.get(id).kind {
        NodeKind::FunctionDeclaration { return_type, .. } => return_type,
        NodeKind::FunctionParameter { param_type, .. } => param_type,
        NodeKind::FieldDeclaration { field_type, .. } => field_type,
        NodeKind::Typedef { aliased_type, .. } => aliased_type,
        NodeKind::TypeNode { type_value } => type_value,
        _ => return None,
    };
    if !ty.is_template_instantiation() || !templates.contains_key(&ty.base_name) {
        return None;
    }
    if ty.template_args.iter().any(Type::is_template_instantiation) {
        return None;
    }
    Some(ty.flattened_instantiation_name())
}

/// Materializes the concrete struct for `flat_name`, substituting each template
/// parameter with its argument throughout a fresh copy of the template body.
fn instantiate(
    dom: &mut Dom,
    templates: &IndexMap<String, Template>,
    flat_name: &str,
    custom_type_fudge: &IndexMap<String, String>,
) {
    let base_name = base_template_name(flat_name, templates);
    let Some(template) = templates.get(&base_name) else { return };
    let args = parse_instantiation_args(flat_name, &base_name);

    let parent = dom.get(template.decl_id).parent().expect("template declaration must have a parent");
    let insert_at = dom.get(parent).children().iter().position(|&c| c == template.decl_id).unwrap() + 1;
    let new_id = clone_subtree(dom, parent, template.body_id);

    if let NodeKind::ClassStructUnion { name, .. } = &mut dom.get_mut(new_id).kind {
        *name = flat_name.to_string();
    }
    for (param, arg) in template.parameters.iter().zip(args.iter()) {
        substitute_param(dom, new_id, param, arg);
    }
    apply_fudges(dom, new_id, custom_type_fudge);

    let current_index = dom.get(parent).children().iter().position(|&c| c == new_id).unwrap();
    if current_index != insert_at {
        dom.reparent_at(parent, insert_at, new_id);
    }
}

/// `ImVector_int` with a registered template `ImVector` yields `"ImVector"`; needed
/// because a flattened name can't simply be split on the first underscore (the
/// template name itself may contain one).
fn base_template_name(flat_name: &str, templates: &IndexMap<String, Template>) -> String {
    templates
        .keys()
        .filter(|name| flat_name.starts_with(name.as_str()))
        .max_by_key(|name| name.len())
        .cloned()
        .unwrap_or_default()
}

/// Recovers the per-argument type names from a flattened instantiation name. Each
/// argument was itself flattened to a plain identifier by the time it reached here (no
/// nested instantiation survives [`find_instantiation`]'s concreteness check), so a
/// bare `Type::named` round-trips it faithfully enough for substitution.
fn parse_instantiation_args(flat_name: &str, base_name: &str) -> Vec<Type> {
    flat_name
        .strip_prefix(base_name)
        .unwrap_or("")
        .split('_')
        .filter(|s| !s.is_empty())
        .map(Type::named)
        .collect()
}

fn substitute_param(dom: &mut Dom, root: NodeId, param: &str, arg: &Type) {
    for id in dom.collect_preorder(root) {
        match &mut dom.get_mut(id).kind {
            NodeKind::FunctionDeclaration { return_type, .. } => substitute_type(return_type, param, arg),
            NodeKind::FunctionParameter { param_type, .. } => substitute_type(param_type, param, arg),
            NodeKind::FieldDeclaration { field_type, .. } => substitute_type(field_type, param, arg),
            NodeKind::Typedef { aliased_type, .. } => substitute_type(aliased_type, param, arg),
            NodeKind::TypeNode { type_value } => substitute_type(type_value, param, arg),
            _ => {}
        }
    }
}

/// Replaces a bare reference to `param` with `arg`, composing pointer chains and
/// qualifiers the usage site added on top of the parameter (`T*` with `T = int` is
/// `int*`, not a loss of the usage's own pointer). Recurses into template arguments and
/// function-pointer signatures for indirect uses.
fn substitute_type(ty: &mut Type, param: &str, arg: &Type) {
    if ty.base_name == param && ty.template_args.is_empty() && ty.function_pointer.is_none() {
        let extra_pointers = std::mem::take(&mut ty.pointer_chain);
        let extra_qualifiers = std::mem::take(&mut ty.qualifiers);
        let extra_reference = ty.is_reference;
        *ty = arg.clone();
        ty.pointer_chain.extend(extra_pointers);
        for q in extra_qualifiers {
            if !ty.qualifiers.contains(&q) {
                ty.qualifiers.push(q);
            }
        }
        ty.is_reference = ty.is_reference || extra_reference;
        return;
    }
    for nested in &mut ty.template_args {
        substitute_type(nested, param, arg);
    }
    if let Some(sig) = &mut ty.function_pointer {
        substitute_type(&mut sig.return_type, param, arg);
        for p in &mut sig.parameter_types {
            substitute_type(p, param, arg);
        }
    }
}

/// After substitution, rewrites any type whose rendered text matches a
/// `custom_type_fudge` key to the parsed form of its mapped value.
fn apply_fudges(dom: &mut Dom, root: NodeId, fudges: &IndexMap<String, String>) {
    if fudges.is_empty() {
        return;
    }
    for id in dom.collect_preorder(root) {
        match &mut dom.get_mut(id).kind {
            NodeKind::FunctionDeclaration { return_type, .. } => fudge_type(return_type, fudges),
            NodeKind::FunctionParameter { param_type, .. } => fudge_type(param_type, fudges),
            NodeKind::FieldDeclaration { field_type, .. } => fudge_type(field_type, fudges),
            NodeKind::Typedef { aliased_type, .. } => fudge_type(aliased_type, fudges),
            NodeKind::TypeNode { type_value } => fudge_type(type_value, fudges),
            _ => {}
        }
    }
}

fn fudge_type(ty: &mut Type, fudges: &IndexMap<String, String>) {
    if let Some(replacement) = fudges.get(&ty.render()) {
        if let Some(parsed) = parse_fudge_value(replacement) {
            *ty = parsed;
            return;
        }
    }
    for nested in &mut ty.template_args {
        fudge_type(nested, fudges);
    }
    if let Some(sig) = &mut ty.function_pointer {
        fudge_type(&mut sig.return_type, fudges);
        for p in &mut sig.parameter_types {
            fudge_type(p, fudges);
        }
    }
}

fn parse_fudge_value(text: &str) -> Option<Type> {
    let tokens = tokenize(text).ok()?;
    let mut cursor = TokenCursor::new(&tokens);
    parse_type(&mut cursor).ok()
}

/// Points the usage site directly at the flattened struct name, clearing the
/// (now-resolved) template arguments.
fn rewrite_usage(dom: &mut Dom, id: NodeId, flat_name: &str) {
    let ty = match &mut dom.get_mut(id).kind {
        NodeKind::FunctionDeclaration { return_type, .. } => return_type,
        NodeKind::FunctionParameter { param_type, .. } => param_type,
        NodeKind::FieldDeclaration { field_type, .. } => field_type,
        NodeKind::Typedef { aliased_type, .. } => aliased_type,
        NodeKind::TypeNode { type_value } => type_value,
        _ => return,
    };
    ty.base_name = flat_name.to_string();
    ty.template_args.clear();
}
