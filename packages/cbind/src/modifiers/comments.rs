//! Converts floating `Comment` nodes (harvested verbatim by the parser between two
//! declarations) into attached leading/trailing comments on `NodeCommon`, and removes
//! the now-redundant floating nodes. `BlankLines` siblings are left untouched; the
//! `cosmetic` modifiers deal with those.

use crate::dom::{Dom, NodeId, NodeKind};

pub fn attach_preceding(dom: &mut Dom) {
    for id in dom.collect_preorder(dom.root()) {
        attach_in_scope(dom, id);
    }
}

fn attach_in_scope(dom: &mut Dom, parent: NodeId) {
    let children = dom.get(parent).children().to_vec();
    let mut pending_leading: Vec<String> = Vec::new();
    let mut last_decl: Option<NodeId> = None;
    let mut to_remove = Vec::new();

    for child in children {
        match &dom.get(child).kind {
            NodeKind::Comment { text, is_preceding, .. } => {
                let text = text.clone();
                if *is_preceding || last_decl.is_none() {
                    pending_leading.push(text);
                } else {
                    dom.get_mut(last_decl.unwrap()).common.trailing_comments.push(text);
                }
                to_remove.push(child);
            }
            NodeKind::BlankLines { .. } => {}
            _ => {
                if !pending_leading.is_empty() {
                    dom.get_mut(child).common.leading_comments.extend(pending_leading.drain(..));
                }
                last_decl = Some(child);
            }
        }
    }

    for child in to_remove {
        dom.remove_child(parent, child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn attaches_a_leading_comment_on_its_own_line() {
        let (mut dom, root) = parse_header_file("// does a thing\nvoid Foo();\n", "t.h").unwrap();
        attach_preceding(&mut dom);
        let func = dom.get(root).children()[0];
        assert_eq!(dom.get(func).common.leading_comments, vec!["does a thing".to_string()]);
    }

    #[test]
    fn attaches_a_trailing_same_line_comment_to_the_previous_declaration() {
        let (mut dom, root) = parse_header_file("void Foo(); // ok\nvoid Bar();\n", "t.h").unwrap();
        attach_preceding(&mut dom);
        let foo = dom.get(root).children()[0];
        assert_eq!(dom.get(foo).common.trailing_comments, vec!["ok".to_string()]);
    }

    #[test]
    fn removes_the_floating_comment_node_after_attaching() {
        let (mut dom, root) = parse_header_file("// hi\nvoid Foo();\n", "t.h").unwrap();
        attach_preceding(&mut dom);
        assert_eq!(dom.get(root).children().len(), 1);
    }
}
