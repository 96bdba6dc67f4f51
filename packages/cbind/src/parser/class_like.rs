use super::comments::harvest_trivia;
use super::function_like::parse_function_or_field;
use crate::dom::{Accessibility, ClassKind, Dom, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{TokenCursor, TokenKind};

/// Parses a `class`/`struct`/`union` declaration: keyword, optional name (absent for
/// an anonymous struct/union, which the `anonymous::assign_names` modifier later
/// names), optional base-class list, then either a `;` (forward declaration) or a
/// braced body of nested declarations.
pub fn parse_class_like(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    let kind = match cursor.bump().text.as_str() {
        "class" => ClassKind::Class,
        "struct" => ClassKind::Struct,
        "union" => ClassKind::Union,
        other => {
            return Err(ParseError::UnexpectedToken {
                position: cursor.position(),
                found: other.to_string(),
                expected: "'class', 'struct', or 'union'".to_string(),
            })
        }
    };

    let is_anonymous = cursor.peek(0).kind != TokenKind::Identifier;
    let name = if is_anonymous { String::new() } else { cursor.bump().text.clone() };

    let mut base_list = Vec::new();
    if cursor.peek(0).text == ":" {
        cursor.bump();
        loop {
            match cursor.peek(0).text.as_str() {
                "public" | "private" | "protected" => {
                    cursor.bump();
                }
                _ => {}
            }
            base_list.push(expect_identifier(cursor)?);
            if cursor.peek(0).text == "," {
                cursor.bump();
                continue;
            }
            break;
        }
    }

    if cursor.peek(0).text == ";" {
        cursor.bump();
        return Ok(dom.append_child(
            parent,
            NodeKind::ClassStructUnion {
                name,
                kind,
                is_anonymous,
                is_by_value_marked: false,
                base_list,
                is_forward_declaration: true,
            },
        ));
    }

    let class_node = dom.append_child(
        parent,
        NodeKind::ClassStructUnion {
            name: name.clone(),
            kind,
            is_anonymous,
            is_by_value_marked: false,
            base_list,
            is_forward_declaration: false,
        },
    );

    expect_punctuator(cursor, "{")?;
    let mut accessibility = if kind == ClassKind::Class { Accessibility::Private } else { Accessibility::Public };
    let owning_class_name = if is_anonymous { None } else { Some(name.as_str()) };
    loop {
        let trivia = cursor.take_trivia();
        harvest_trivia(dom, class_node, &trivia);
        if cursor.peek(0).text == "}" {
            break;
        }
        match cursor.peek(0).text.as_str() {
            "public" if cursor.peek(1).text == ":" => {
                accessibility = Accessibility::Public;
                cursor.bump();
                cursor.bump();
            }
            "private" if cursor.peek(1).text == ":" => {
                accessibility = Accessibility::Private;
                cursor.bump();
                cursor.bump();
            }
            "protected" if cursor.peek(1).text == ":" => {
                accessibility = Accessibility::Protected;
                cursor.bump();
                cursor.bump();
            }
            "struct" | "class" | "union" => {
                parse_class_like(cursor, dom, class_node)?;
            }
            "enum" => {
                super::enum_like::parse_enum(cursor, dom, class_node)?;
            }
            "typedef" => {
                super::directives::parse_typedef(cursor, dom, class_node)?;
            }
            _ => {
                parse_function_or_field(cursor, dom, class_node, owning_class_name, accessibility)?;
            }
        }
    }
    expect_punctuator(cursor, "}")?;
    expect_punctuator(cursor, ";")?;
    Ok(class_node)
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
    use crate::lexer::tokenize;

    #[test]
    fn parses_a_struct_with_a_field_and_a_member_function() {
        let tokens = tokenize("struct S { int Value; void Bar(); };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_class_like(&mut cursor, &mut dom, root).unwrap();
        assert_eq!(dom.get(id).children().len(), 2);
    }

    #[test]
    fn parses_a_forward_declaration() {
        let tokens = tokenize("struct S;").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_class_like(&mut cursor, &mut dom, root).unwrap();
        match &dom.get(id).kind {
            NodeKind::ClassStructUnion { is_forward_declaration, .. } => assert!(is_forward_declaration),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parses_a_base_class_list() {
        let tokens = tokenize("struct Derived : public Base { };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_class_like(&mut cursor, &mut dom, root).unwrap();
        match &dom.get(id).kind {
            NodeKind::ClassStructUnion { base_list, .. } => assert_eq!(base_list, &vec!["Base".to_string()]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn defaults_class_members_to_private_accessibility() {
        let tokens = tokenize("class C { void Bar(); };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_class_like(&mut cursor, &mut dom, root).unwrap();
        let func = dom.get(id).children()[0];
        match &dom.get(func).kind {
            NodeKind::FunctionDeclaration { accessibility, .. } => assert_eq!(*accessibility, Accessibility::Private),
            other => panic!("unexpected {other:?}"),
        }
    }
}
