//! Wraps a header's declarations in `extern "C"` guards conditioned on
//! `__cplusplus`, so the generated header compiles as both C and C++. Applied to the
//! main output header specifically, never to configuration headers, which a C++
//! translation unit may include directly without wanting them re-exported as C
//! linkage.

use crate::dom::{Dom, NodeId, NodeKind};

pub fn wrap(dom: &mut Dom, header: NodeId) {
    let len = dom.get(header).children().len();
    dom.insert_child(header, 0, NodeKind::Code { text: "#ifdef __cplusplus\nextern \"C\" {\n#endif".to_string() });
    dom.append_child(header, NodeKind::Code { text: "#ifdef __cplusplus\n}\n#endif".to_string() });
    debug_assert_eq!(dom.get(header).children().len(), len + 2);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn wraps_the_headers_declarations() {
        let (mut dom, root) = parse_header_file("void Foo();\n", "t.h").unwrap();
        wrap(&mut dom, root);
        let children = dom.get(root).children().to_vec();
        assert_eq!(children.len(), 3);
        match &dom.get(children[0]).kind {
            NodeKind::Code { text } => assert!(text.contains("extern \"C\"")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
