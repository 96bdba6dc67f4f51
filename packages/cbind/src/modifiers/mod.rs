//! The ~50-step rewrite pipeline that normalizes a parsed DOM into something
//! expressible in plain C. Every modifier is a free function taking `&mut Dom` plus
//! whatever slice of [`PipelineConfig`](crate::config::PipelineConfig) it needs, run
//! in the fixed order [`driver::run`](crate::driver::run) invokes them in — reordering
//! changes output, since later modifiers rely on postconditions earlier ones
//! establish (template flattening before disambiguation, enum values before
//! flag-marking, and so on).

pub mod anonymous;
pub mod api_macro;
pub mod bodies;
pub mod by_value;
pub mod class_functions;
pub mod comments;
pub mod conditionals;
pub mod cosmetic;
pub mod default_args;
pub mod disambiguate;
pub mod enums;
pub mod extern_c;
pub mod forward_decl;
pub mod includes;
pub mod internal;
pub mod manual;
pub mod metadata;
pub mod move_types;
pub mod namespaces;
pub mod nested_classes;
pub mod prune;
pub mod references;
pub mod rename;
pub mod templates;
pub mod unformatted;
pub mod variadic;

use crate::dom::{Dom, NodeId, NodeKind};
use indexmap::IndexSet;

/// Shared helper used by most modifiers: the fully qualified name of a declaration is
/// its owning class (if any) followed by `::` and its own name, otherwise just its
/// own name. Kept here rather than duplicated per modifier since `prune`, `rename`,
/// and `disambiguate` all need the same notion of "the name a caller-supplied target
/// list refers to."
pub(crate) fn qualified_name(owning_class: Option<&str>, name: &str) -> String {
    match owning_class {
        Some(class) => format!("{class}::{name}"),
        None => name.to_string(),
    }
}

/// The fully qualified name of any named node, built by walking up through enclosing
/// `Namespace`/`ClassStructUnion` ancestors and joining with `::` — e.g. a `Value`
/// function nested in `namespace ImGui { ... }` resolves to `ImGui::Value`, matching
/// the target names the original tool's removal lists use (`"ImGui::Value"`).
pub(crate) fn fully_qualified_name(dom: &Dom, id: NodeId) -> String {
    let own_name = node_name(dom, id).unwrap_or_default();
    let mut segments = vec![own_name];
    let mut current = dom.get(id).parent();
    while let Some(parent) = current {
        if let Some(name) = node_name(dom, parent) {
            if !name.is_empty() {
                segments.push(name);
            }
        }
        current = dom.get(parent).parent();
    }
    segments.reverse();
    segments.join("::")
}

fn node_name(dom: &Dom, id: NodeId) -> Option<String> {
    match &dom.get(id).kind {
        NodeKind::Namespace { name } => Some(name.clone()),
        NodeKind::ClassStructUnion { name, .. } => Some(name.clone()),
        NodeKind::FunctionDeclaration { name, .. } => Some(name.clone()),
        _ => None,
    }
}

/// The set of every named (non-anonymous) struct/class/union name in the DOM, used by
/// modifiers that need to tell a struct type apart from a built-in scalar without a
/// caller-supplied list (e.g. by-value-to-pointer conversion).
pub(crate) fn collect_struct_names(dom: &Dom) -> IndexSet<String> {
    dom.collect_preorder(dom.root())
        .into_iter()
        .filter_map(|id| match &dom.get(id).kind {
            NodeKind::ClassStructUnion { name, is_anonymous: false, .. } if !name.is_empty() => Some(name.clone()),
            _ => None,
        })
        .collect()
}

/// Deep-clones `source` (and every descendant, in order) as a new child of `parent`.
/// Used by modifiers that stamp out a fresh copy of a declaration rather than rewrite
/// one in place — template instantiation, and (elsewhere) default-argument/variadic
/// wrapper generation starting from the original declaration's shape.
pub(crate) fn clone_subtree(dom: &mut Dom, parent: NodeId, source: NodeId) -> NodeId {
    let kind = dom.get(source).kind.clone();
    let common = dom.get(source).common.clone();
    let new_id = dom.append_child(parent, kind);
    dom.get_mut(new_id).common = common;
    for child in dom.get(source).children().to_vec() {
        clone_subtree(dom, new_id, child);
    }
    new_id
}
