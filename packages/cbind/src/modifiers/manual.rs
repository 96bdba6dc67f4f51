//! Injects hand-written function declarations that have no corresponding C++ entry
//! point to derive a bridge from — helper constructors for flattened template
//! instantiations, mainly. Each is given as a small, caller-controlled signature
//! string rather than full C++ grammar, so it is parsed with a lightweight
//! split-on-punctuation routine instead of the real lexer/parser.

use crate::config::ManualFunction;
use crate::dom::{Accessibility, Dom, NodeId, NodeKind, Type};

/// Appends one `FunctionDeclaration` per [`ManualFunction`] to `header`, tagged
/// `is_manual`, wrapped in a `PreprocessorConditional` when a guard is given.
pub fn apply(dom: &mut Dom, header: NodeId, functions: &[ManualFunction]) {
    for manual in functions {
        let (return_type, name, params) = parse_signature(&manual.signature);
        let target = match &manual.guard {
            Some(expr) => dom.append_child(header, NodeKind::PreprocessorConditional { expression: expr.clone(), negated: false, has_else_branch: false }),
            None => header,
        };
        let func_id = dom.append_child(
            target,
            NodeKind::FunctionDeclaration {
                return_type,
                name: name.clone(),
                is_member: false,
                member_kind: None,
                is_operator: false,
                is_constexpr: false,
                is_variadic: false,
                owning_class: None,
                original_name: name,
                accessibility: Accessibility::Public,
                is_internal: false,
                is_manual: true,
                is_default_helper: false,
            },
        );
        if let Some(comment) = &manual.comment {
            dom.get_mut(func_id).common.leading_comments.push(comment.clone());
        }
        for (param_type, param_name) in params {
            dom.append_child(func_id, NodeKind::FunctionParameter { param_type, name: param_name, default_value: None, is_varargs: false });
        }
    }
}

fn parse_signature(signature: &str) -> (Type, String, Vec<(Type, String)>) {
    let signature = signature.trim().trim_end_matches(';').trim();
    let open = signature.find('(').unwrap_or(signature.len());
    let (head, rest) = signature.split_at(open);
    let params_str = rest.trim_start_matches('(').trim_end_matches(')');

    let head = head.trim();
    let split_at = head.rfind(|c: char| c.is_whitespace() || c == '*').map(|i| i + 1).unwrap_or(0);
    let (ret_text, name) = head.split_at(split_at);
    let return_type = parse_type_text(ret_text.trim_end());

    let mut params = Vec::new();
    if !params_str.trim().is_empty() && params_str.trim() != "void" {
        for chunk in split_top_level_commas(params_str) {
            let chunk = chunk.trim();
            let split_at = chunk.rfind(|c: char| c.is_whitespace() || c == '*').map(|i| i + 1).unwrap_or(0);
            let (ptype, pname) = chunk.split_at(split_at);
            params.push((parse_type_text(ptype.trim_end()), pname.trim().to_string()));
        }
    }
    (return_type, name.trim().to_string(), params)
}

fn parse_type_text(text: &str) -> Type {
    let stars = text.chars().rev().take_while(|&c| c == '*').count();
    let base = text.trim_end_matches('*').trim();
    let (is_const, base) = match base.strip_prefix("const ") {
        Some(rest) => (true, rest.trim()),
        None => (false, base),
    };
    let mut ty = Type::named(base);
    if is_const {
        ty.qualifiers.push(crate::dom::Qualifier::Const);
    }
    for _ in 0..stars {
        ty.pointer_chain.push(crate::dom::PointerKind::Pointer);
    }
    ty
}

fn split_top_level_commas(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut current = String::new();
    for c in s.chars() {
        match c {
            '(' | '<' => depth += 1,
            ')' | '>' => depth -= 1,
            ',' if depth == 0 => {
                out.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;

    #[test]
    fn injects_a_manual_function_with_parameters() {
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let header = dom.append_child(root, NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let functions =
            vec![ManualFunction {
                signature: "ImVector_int* ImVector_int_create(int size)".to_string(),
                comment: Some("makes one".to_string()),
                guard: None,
                body: None,
            }];
        apply(&mut dom, header, &functions);
        let func_id = dom.get(header).children()[0];
        match &dom.get(func_id).kind {
            NodeKind::FunctionDeclaration { name, is_manual, return_type, .. } => {
                assert_eq!(name, "ImVector_int_create");
                assert!(is_manual);
                assert!(return_type.is_pointer());
            }
            other => panic!("unexpected {other:?}"),
        }
        let params = dom.get(func_id).children().to_vec();
        assert_eq!(params.len(), 1);
        match &dom.get(params[0]).kind {
            NodeKind::FunctionParameter { name, .. } => assert_eq!(name, "size"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wraps_a_guarded_manual_function_in_a_conditional() {
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let header = dom.append_child(root, NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let functions =
            vec![ManualFunction {
                signature: "void ImStr_Helper(void)".to_string(),
                comment: None,
                guard: Some("IMGUI_HAS_IMSTR".to_string()),
                body: None,
            }];
        apply(&mut dom, header, &functions);
        match &dom.get(dom.get(header).children()[0]).kind {
            NodeKind::PreprocessorConditional { expression, .. } => assert_eq!(expression, "IMGUI_HAS_IMSTR"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
