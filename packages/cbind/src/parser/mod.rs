mod class_like;
mod comments;
mod directives;
mod enum_like;
mod function_like;
mod types;

pub use types::{parse_declarator, parse_type};

use crate::dom::{Accessibility, Dom, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{tokenize, TokenCursor, TokenKind};

/// Parses a full header's source text into a standalone `HeaderFile` node (not yet
/// attached to any `HeaderFileSet`; the driver adds it as a child of the set root).
pub fn parse_header_file(source: &str, original_file_name: &str) -> Result<(Dom, NodeId), ParseError> {
    let tokens = tokenize(source)?;
    let mut dom = Dom::new();
    let root = dom.set_root(NodeKind::HeaderFile { original_file_name: original_file_name.to_string() });
    let mut cursor = TokenCursor::new(&tokens);
    parse_scope(&mut cursor, &mut dom, root)?;
    dom.validate_hierarchy()
        .map_err(|_| ParseError::UnknownDeclarationShape { position: cursor.position() })?;
    Ok((dom, root))
}

/// Parses declarations in `parent`'s scope (a `HeaderFile`, `Namespace`,
/// `PreprocessorConditional`, or `TemplateDeclaration` body) until end of input, a
/// closing `}`, or a conditional terminator (`#else`/`#elif`/`#endif`) that belongs to
/// an enclosing conditional rather than this scope.
fn parse_scope(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    loop {
        let trivia = cursor.take_trivia();
        comments::harvest_trivia(dom, parent, &trivia);

        let token = cursor.peek(0);
        if token.kind == TokenKind::Eof || token.text == "}" {
            break;
        }
        if token.kind == TokenKind::PreprocessorDirective {
            match directives::directive_keyword(&token.text) {
                "else" | "elif" | "endif" => break,
                _ => {}
            }
        }
        let start_position = token.position;
        let before = dom.get(parent).children().len();
        parse_one_declaration(cursor, dom, parent)?;
        for &child in &dom.get(parent).children()[before..] {
            if dom.get(child).common.source_position.is_none() {
                dom.get_mut(child).common.source_position = Some(start_position);
            }
        }
    }
    Ok(())
}

/// Parses exactly one declaration (of any shape the grammar recognizes) into `parent`.
/// Shared between the scope loop and a `template<...>` heading's single following
/// declaration.
fn parse_one_declaration(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    let token = cursor.peek(0);
    if token.kind == TokenKind::PreprocessorDirective {
        match directives::directive_keyword(&token.text) {
            "include" => {
                directives::parse_include(cursor, dom, parent)?;
            }
            "pragma" => {
                directives::parse_pragma(cursor, dom, parent)?;
            }
            "define" => {
                directives::parse_define(cursor, dom, parent)?;
            }
            "if" | "ifdef" | "ifndef" => {
                parse_conditional(cursor, dom, parent)?;
            }
            _ => {
                // An unrecognized directive (e.g. `#error`) is preserved verbatim.
                let text = cursor.bump().text.clone();
                dom.append_child(parent, NodeKind::Code { text });
            }
        }
        return Ok(());
    }

    match token.text.as_str() {
        ";" => {
            cursor.bump();
        }
        "namespace" => {
            parse_namespace(cursor, dom, parent)?;
        }
        "class" | "struct" | "union" => {
            class_like::parse_class_like(cursor, dom, parent)?;
        }
        "enum" => {
            enum_like::parse_enum(cursor, dom, parent)?;
        }
        "typedef" => {
            directives::parse_typedef(cursor, dom, parent)?;
        }
        "template" => {
            parse_template(cursor, dom, parent)?;
        }
        _ => {
            parse_fallback_declaration(cursor, dom, parent)?;
        }
    }
    Ok(())
}

fn parse_namespace(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    expect_keyword(cursor, "namespace")?;
    let name = expect_identifier(cursor)?;
    let node = dom.append_child(parent, NodeKind::Namespace { name });
    expect_punctuator(cursor, "{")?;
    parse_scope(cursor, dom, node)?;
    expect_punctuator(cursor, "}")?;
    Ok(())
}

/// A `#if`/`#ifdef`/`#ifndef` block, with any `#elif`/`#else` branches represented as
/// additional sibling `PreprocessorConditional` nodes appended immediately after the
/// first — each one independently gated, which is what lets the `conditionals::flatten`
/// modifier evaluate and promote/discard them one at a time.
fn parse_conditional(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    loop {
        let header = cursor.bump().clone();
        let keyword = directives::directive_keyword(&header.text);
        if keyword == "else" {
            let node = dom.append_child(
                parent,
                NodeKind::PreprocessorConditional { expression: String::new(), negated: false, has_else_branch: false },
            );
            parse_scope(cursor, dom, node)?;
            expect_directive(cursor, "endif")?;
            return Ok(());
        }

        let (expression, negated) = directives::parse_conditional_header(&header.text);
        let node = dom.append_child(parent, NodeKind::PreprocessorConditional { expression, negated, has_else_branch: false });
        parse_scope(cursor, dom, node)?;

        let next = cursor.peek(0);
        let next_keyword = if next.kind == TokenKind::PreprocessorDirective {
            directives::directive_keyword(&next.text)
        } else {
            ""
        };
        match next_keyword {
            "elif" | "else" => {
                if let NodeKind::PreprocessorConditional { has_else_branch, .. } = &mut dom.get_mut(node).kind {
                    *has_else_branch = true;
                }
                continue;
            }
            "endif" => {
                cursor.bump();
                return Ok(());
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    position: next.position,
                    found: next.text.clone(),
                    expected: "'#elif', '#else', or '#endif'".to_string(),
                })
            }
        }
    }
}

fn parse_template(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    let parameters = directives::parse_template_parameters(cursor)?;
    let node = dom.append_child(parent, NodeKind::TemplateDeclaration { parameters });
    parse_one_declaration(cursor, dom, node)
}

/// The catch-all for declaration shapes the grammar handles directly: a function,
/// field, or (if neither parses cleanly) a raw token run up to the next top-level
/// `;`, preserved as a `Code` node so unrecognized constructs are not silently lost.
fn parse_fallback_declaration(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<(), ParseError> {
    let checkpoint = cursor.checkpoint();
    match function_like::parse_function_or_field(cursor, dom, parent, None, Accessibility::Public) {
        Ok(_) => Ok(()),
        Err(_) => {
            cursor.rewind(checkpoint);
            let text = consume_until_semicolon(cursor);
            dom.append_child(parent, NodeKind::Code { text });
            Ok(())
        }
    }
}

fn consume_until_semicolon(cursor: &mut TokenCursor) -> String {
    let mut depth = 0i32;
    let mut parts = Vec::new();
    loop {
        let token = cursor.peek(0);
        if token.kind == TokenKind::Eof {
            break;
        }
        match token.text.as_str() {
            "{" | "(" | "[" => depth += 1,
            "}" | ")" | "]" => depth -= 1,
            _ => {}
        }
        let text = cursor.bump().text.clone();
        let stop = text == ";" && depth == 0;
        parts.push(text);
        if stop {
            break;
        }
    }
    parts.join(" ")
}

fn expect_keyword(cursor: &mut TokenCursor, keyword: &str) -> Result<(), ParseError> {
    let token = cursor.bump();
    if token.text == keyword {
        Ok(())
    } else {
        Err(ParseError::UnexpectedToken {
            position: token.position,
            found: token.text.clone(),
            expected: format!("'{keyword}'"),
        })
    }
}

fn expect_directive(cursor: &mut TokenCursor, keyword: &str) -> Result<(), ParseError> {
    let token = cursor.bump();
    if directives::directive_keyword(&token.text) == keyword {
        Ok(())
    } else {
        Err(ParseError::UnexpectedToken {
            position: token.position,
            found: token.text.clone(),
            expected: format!("'#{keyword}'"),
        })
    }
}

fn expect_identifier(cursor: &mut TokenCursor) -> Result<String, ParseError> {
    let token = cursor.bump();
    if token.kind == TokenKind::Identifier {
        Ok(token.text.clone())
    } else {
        Err(ParseError::UnexpectedToken {
            position: token.position,
            found: token.text.clone(),
            expected: "identifier".to_string(),
        })
    }
}

fn expect_punctuator(cursor: &mut TokenCursor, text: &str) -> Result<(), ParseError> {
    let token = cursor.bump();
    if token.text == text {
        Ok(())
    } else {
        Err(ParseError::UnexpectedToken {
            position: token.position,
            found: token.text.clone(),
            expected: format!("'{text}'"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_includes_and_a_namespaced_function() {
        let source = "#include \"imgui.h\"\nnamespace ImGui {\nvoid Foo(int x);\n}\n";
        let (dom, root) = parse_header_file(source, "t.h").unwrap();
        assert_eq!(dom.get(root).children().len(), 2);
        dom.validate_hierarchy().unwrap();
    }

    #[test]
    fn parses_a_simple_conditional_block() {
        let source = "#ifdef IMGUI_HAS_IMSTR\nstruct ImStr { const char* Begin; };\n#endif\n";
        let (dom, root) = parse_header_file(source, "t.h").unwrap();
        let cond = dom.get(root).children()[0];
        match &dom.get(cond).kind {
            NodeKind::PreprocessorConditional { expression, negated, .. } => {
                assert_eq!(expression, "IMGUI_HAS_IMSTR");
                assert!(!negated);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dom.get(cond).children().len(), 1);
    }

    #[test]
    fn parses_an_if_else_block_as_two_sibling_conditionals() {
        let source = "#if FOO\nvoid A();\n#else\nvoid B();\n#endif\n";
        let (dom, root) = parse_header_file(source, "t.h").unwrap();
        assert_eq!(dom.get(root).children().len(), 2);
    }

    #[test]
    fn falls_back_to_a_code_node_for_unrecognized_constructs() {
        let source = "static_assert(sizeof(int) == 4, \"oops\");\n";
        let (dom, root) = parse_header_file(source, "t.h").unwrap();
        match &dom.get(root).children().iter().map(|&c| dom.get(c).kind.clone()).collect::<Vec<_>>()[0] {
            NodeKind::Code { .. } => {}
            other => panic!("expected Code fallback, got {other:?}"),
        }
    }

    #[test]
    fn parses_a_template_struct_declaration() {
        let source = "template<class T> struct ImVector { T* Data; int Size; };\n";
        let (dom, root) = parse_header_file(source, "t.h").unwrap();
        let template_node = dom.get(root).children()[0];
        match &dom.get(template_node).kind {
            NodeKind::TemplateDeclaration { parameters } => assert_eq!(parameters, &vec!["T".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(dom.get(template_node).children().len(), 1);
    }
}
