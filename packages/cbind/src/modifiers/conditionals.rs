//! Resolves `PreprocessorConditional` nodes guarded by a specific macro at an assumed
//! truth value, promoting the chosen branch's children into the parent scope and
//! discarding the rest of the `#if`/`#elif`/`#else` chain.

use crate::dom::{Dom, NodeId, NodeKind};

/// For every run of sibling `PreprocessorConditional` nodes whose first branch tests
/// `macro_name` (`#if macro_name`, `#ifdef macro_name`, or their negated forms),
/// promotes the one branch matching `assumed_value` into `parent`'s scope (in place of
/// the run) and discards the rest.
pub fn flatten(dom: &mut Dom, macro_name: &str, assumed_value: bool) {
    for id in dom.collect_preorder(dom.root()) {
        flatten_runs_in(dom, id, macro_name, assumed_value);
    }
}

fn flatten_runs_in(dom: &mut Dom, parent: NodeId, macro_name: &str, assumed_value: bool) {
    loop {
        let children = dom.get(parent).children().to_vec();
        let Some(start) = children.iter().position(|&c| guards(dom, c, macro_name)) else { return };

        let mut run = vec![children[start]];
        for &candidate in &children[start + 1..] {
            if !is_conditional(dom, candidate) {
                break;
            }
            let expr = expression_of(dom, candidate);
            if expr.is_empty() || expr == macro_name {
                run.push(candidate);
            } else {
                break;
            }
        }

        let chosen = run
            .iter()
            .copied()
            .find(|&c| branch_truth(dom, c) == Some(assumed_value))
            .or_else(|| run.iter().copied().find(|&c| expression_of(dom, c).is_empty()));

        let insert_at = start;
        let promoted = chosen.map(|c| dom.get(c).children().to_vec()).unwrap_or_default();
        for &c in &run {
            dom.remove_child(parent, c);
        }
        for (offset, child) in promoted.into_iter().enumerate() {
            dom.reparent_at(parent, insert_at + offset, child);
        }
    }
}

fn is_conditional(dom: &Dom, id: NodeId) -> bool {
    matches!(dom.get(id).kind, NodeKind::PreprocessorConditional { .. })
}

fn expression_of(dom: &Dom, id: NodeId) -> String {
    match &dom.get(id).kind {
        NodeKind::PreprocessorConditional { expression, .. } => expression.clone(),
        _ => String::new(),
    }
}

fn guards(dom: &Dom, id: NodeId, macro_name: &str) -> bool {
    matches!(&dom.get(id).kind, NodeKind::PreprocessorConditional { expression, .. } if expression == macro_name)
}

/// `Some(true)` if this branch is active when the guarded macro is truthy, `Some(false)`
/// if its guard is negated, `None` for the bare `#else` branch (no expression of its
/// own to evaluate).
fn branch_truth(dom: &Dom, id: NodeId) -> Option<bool> {
    match &dom.get(id).kind {
        NodeKind::PreprocessorConditional { expression, negated, .. } if !expression.is_empty() => {
            Some(!negated)
        }
        _ => None,
    }
}
