//! Walks the fully-transformed DOM to produce the three output artifacts: a plain C
//! header, a C++ bridging implementation, and a JSON metadata document. Every emitter
//! only reads the tree — rewriting belongs to [`modifiers`](crate::modifiers).

pub mod c_header;
pub mod cpp_impl;
pub mod json_meta;

use crate::dom::{Dom, MemberFunctionKind, NodeId, NodeKind, PointerKind, Type};
use crate::error::EmitError;

/// The first `HeaderFile` child of the set root. The driver always grafts the main
/// header in first, ahead of any configuration headers, so "first" is an unambiguous
/// way for the C/C++ emitters (which only ever write the main output) to find it
/// without threading an extra `NodeId` through every call.
pub(crate) fn main_header(dom: &Dom) -> Result<NodeId, EmitError> {
    dom.get(dom.root())
        .children()
        .iter()
        .copied()
        .find(|&id| matches!(dom.get(id).kind, NodeKind::HeaderFile { .. }))
        .ok_or(EmitError::MissingDestFilename)
}

/// Every `HeaderFile` under the set root, main header first.
pub(crate) fn all_headers(dom: &Dom) -> Vec<NodeId> {
    dom.get(dom.root())
        .children()
        .iter()
        .copied()
        .filter(|&id| matches!(dom.get(id).kind, NodeKind::HeaderFile { .. }))
        .collect()
}

/// The return type an emitter should render for a function, special-casing a
/// flattened constructor: [`class_functions::flatten`](crate::modifiers::class_functions::flatten)
/// leaves `return_type` as the parser's `void` placeholder (a C++ constructor has no
/// return type) but the generated C binding constructs a new instance on the heap and
/// returns it by pointer, so both emitters need `ClassName*` instead of the stored
/// placeholder.
pub(crate) fn effective_return_type(kind: &NodeKind) -> Type {
    match kind {
        NodeKind::FunctionDeclaration { member_kind: Some(MemberFunctionKind::Constructor), original_name, .. } => {
            Type { base_name: original_name.clone(), pointer_chain: vec![PointerKind::Pointer], ..Default::default() }
        }
        NodeKind::FunctionDeclaration { return_type, .. } => return_type.clone(),
        _ => Type::default(),
    }
}

/// The conditional context of `id`: every `PreprocessorConditional` ancestor's guard
/// expression, outermost first, negation folded into a leading `!`. Computed by
/// walking parents rather than reading `NodeCommon::conditional_context` directly,
/// since only an unresolved conditional (one naming a macro no modifier was told an
/// assumed value for) survives to be an ancestor of anything by emission time.
pub(crate) fn conditional_context_strings(dom: &Dom, id: NodeId) -> Vec<String> {
    let mut frames = Vec::new();
    let mut current = dom.get(id).parent();
    while let Some(parent) = current {
        if let NodeKind::PreprocessorConditional { expression, negated, .. } = &dom.get(parent).kind {
            frames.push(if *negated { format!("!{expression}") } else { expression.clone() });
        }
        current = dom.get(parent).parent();
    }
    frames.reverse();
    frames
}
