//! Structural cleanup passes that run last, after every semantic transformation: they
//! only remove now-pointless nodes (an emptied-out conditional, a run of blank lines
//! with nowhere useful to be) rather than rename or restructure declarations. Column
//! alignment of enum values, function names, struct fields, and comments is a
//! rendering concern handled by the C header emitter itself rather than a DOM
//! mutation, since alignment depends on the text each declaration renders to, not on
//! anything the tree structure alone can express.

use crate::dom::{Dom, NodeId, NodeKind};

/// Removes any `PreprocessorConditional` left with no children, e.g. one whose sole
/// content was pruned by an earlier modifier.
pub fn remove_empty_conditionals(dom: &mut Dom) {
    let empties: Vec<(NodeId, NodeId)> = dom
        .collect_preorder(dom.root())
        .into_iter()
        .filter(|&id| matches!(dom.get(id).kind, NodeKind::PreprocessorConditional { .. }) && dom.get(id).children().is_empty())
        .filter_map(|id| dom.get(id).parent().map(|p| (p, id)))
        .collect();
    for (parent, id) in empties {
        dom.remove_child(parent, id);
    }
}

/// Collapses consecutive `BlankLines` siblings into one, summing their counts.
pub fn merge_blank_lines(dom: &mut Dom) {
    for scope in dom.collect_preorder(dom.root()) {
        let children = dom.get(scope).children().to_vec();
        let mut run_start: Option<usize> = None;
        let mut to_remove = Vec::new();
        let mut total = 0u32;
        for (idx, &id) in children.iter().enumerate() {
            if let NodeKind::BlankLines { count } = dom.get(id).kind {
                if run_start.is_none() {
                    run_start = Some(idx);
                    total = count;
                } else {
                    total += count;
                    to_remove.push(id);
                }
            } else if let Some(start) = run_start.take() {
                if let NodeKind::BlankLines { count } = &mut dom.get_mut(children[start]).kind {
                    *count = total;
                }
            }
        }
        if let Some(start) = run_start {
            if let NodeKind::BlankLines { count } = &mut dom.get_mut(children[start]).kind {
                *count = total;
            }
        }
        for id in to_remove {
            dom.remove_child(scope, id);
        }
    }
}

/// Drops a leading or trailing `BlankLines` node in every scope; a blank-line run only
/// matters between two declarations.
pub fn trim_blank_lines(dom: &mut Dom) {
    for scope in dom.collect_preorder(dom.root()) {
        let children = dom.get(scope).children().to_vec();
        if let Some(&first) = children.first() {
            if matches!(dom.get(first).kind, NodeKind::BlankLines { .. }) {
                dom.remove_child(scope, first);
            }
        }
        let children = dom.get(scope).children().to_vec();
        if let Some(&last) = children.last() {
            if matches!(dom.get(last).kind, NodeKind::BlankLines { .. }) {
                dom.remove_child(scope, last);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn removes_an_emptied_conditional() {
        let (mut dom, root) = parse_header_file("#if A\n#endif\nvoid Foo();\n", "t.h").unwrap();
        remove_empty_conditionals(&mut dom);
        assert_eq!(dom.get(root).children().len(), 1);
    }

    #[test]
    fn merges_consecutive_blank_line_runs() {
        let (mut dom, root) = parse_header_file("void A();\n\n\nvoid B();\n", "t.h").unwrap();
        merge_blank_lines(&mut dom);
        let blanks: Vec<_> = dom
            .get(root)
            .children()
            .iter()
            .filter(|&&id| matches!(dom.get(id).kind, NodeKind::BlankLines { .. }))
            .collect();
        assert!(blanks.len() <= 1);
    }
}
