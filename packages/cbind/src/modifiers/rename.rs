//! Name-changing passes that don't fit the more specific modifiers: disambiguating a
//! single overload by a distinguishing argument name (for cases the general
//! type-suffix algorithm in [`disambiguate`](super::disambiguate) can't separate), a
//! trailing comment attached to one named function, and a flat old-name -> new-name
//! rename table applied as a final touch-up after disambiguation.

use super::fully_qualified_name;
use crate::dom::{Dom, NodeKind};
use crate::error::ModifierError;
use indexmap::IndexMap;

/// Renames the one function named `function_name` whose parameter list includes a
/// parameter named `distinguishing_arg_name` to `new_name`. Errors if no function
/// matches, or more than one does.
pub fn rename_function_by_signature(
    dom: &mut Dom,
    function_name: &str,
    distinguishing_arg_name: &str,
    new_name: &str,
) -> Result<(), ModifierError> {
    let candidates: Vec<_> = dom
        .collect_preorder(dom.root())
        .into_iter()
        .filter(|&id| {
            let NodeKind::FunctionDeclaration { name, .. } = &dom.get(id).kind else { return false };
            name == function_name
                && dom.get(id).children().iter().any(|&p| {
                    matches!(&dom.get(p).kind, NodeKind::FunctionParameter { name, .. } if name == distinguishing_arg_name)
                })
        })
        .collect();

    match candidates.as_slice() {
        [] => Err(ModifierError::TargetNotFound { modifier: "rename_function_by_signature", target: function_name.to_string() }),
        [id] => {
            if let NodeKind::FunctionDeclaration { name, .. } = &mut dom.get_mut(*id).kind {
                *name = new_name.to_string();
            }
            Ok(())
        }
        _ => Err(ModifierError::AmbiguousMatch {
            modifier: "rename_function_by_signature",
            target: function_name.to_string(),
            count: candidates.len(),
        }),
    }
}

/// A flat old-name -> new-name rename pass over every `FunctionDeclaration`, applied
/// after disambiguation for touch-ups that don't fit a general rule.
pub fn rename_by_map(dom: &mut Dom, renames: &IndexMap<String, String>) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::FunctionDeclaration { name, .. } = &mut dom.get_mut(id).kind {
            if let Some(new_name) = renames.get(name.as_str()) {
                *name = new_name.clone();
            }
        }
    }
}

/// Attaches `note` as a trailing comment on the one function whose fully qualified
/// name is `qualified_name`.
pub fn add_function_comment(dom: &mut Dom, qualified_target: &str, note: &str) -> Result<(), ModifierError> {
    let target = dom
        .collect_preorder(dom.root())
        .into_iter()
        .find(|&id| matches!(dom.get(id).kind, NodeKind::FunctionDeclaration { .. }) && fully_qualified_name(dom, id) == qualified_target);
    match target {
        Some(id) => {
            dom.get_mut(id).common.trailing_comments.push(note.to_string());
            Ok(())
        }
        None => Err(ModifierError::TargetNotFound { modifier: "add_function_comment", target: qualified_target.to_string() }),
    }
}
