use super::types::parse_type;
use crate::dom::{Dom, EnumValue, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{TokenCursor, TokenKind};

/// Parses an `enum Name { ... };` or scoped `enum class Name : UnderlyingType { ... };`
/// declaration into an `EnumElement` node with one `EnumEntry` child per entry. Values
/// are kept as-written (`Literal`/`Expression`, or absent); the `enums::calculate_values`
/// modifier resolves every entry to a concrete integer afterward.
pub fn parse_enum(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    expect_keyword(cursor, "enum")?;
    if cursor.peek(0).text == "class" || cursor.peek(0).text == "struct" {
        cursor.bump();
    }
    let name = expect_identifier(cursor)?;

    let underlying_type = if cursor.peek(0).text == ":" {
        cursor.bump();
        Some(parse_type(cursor)?)
    } else {
        None
    };

    let is_flag_enum = name.ends_with("Flags") || name.ends_with("Flags_");
    let enum_node = dom.append_child(
        parent,
        NodeKind::EnumElement { name: name.clone(), is_flag_enum, underlying_type },
    );

    if cursor.peek(0).text == ";" {
        cursor.bump();
        return Ok(enum_node);
    }

    expect_punctuator(cursor, "{")?;
    while cursor.peek(0).text != "}" {
        let entry_name = expect_identifier(cursor)?;
        let value = if cursor.peek(0).text == "=" {
            cursor.bump();
            Some(parse_enum_value_expression(cursor)?)
        } else {
            None
        };
        let is_count = entry_name.ends_with("_COUNT");
        let is_internal = entry_name.ends_with('_') && !is_count;
        dom.append_child(enum_node, NodeKind::EnumEntry { name: entry_name, value, is_internal, is_count });
        if cursor.peek(0).text == "," {
            cursor.bump();
        } else {
            break;
        }
    }
    expect_punctuator(cursor, "}")?;
    expect_punctuator(cursor, ";")?;
    Ok(enum_node)
}

/// An entry's initializer is either a plain integer literal or an expression over
/// sibling entries (`Flag_A | Flag_B`, `1 << 3`) that the `enums::calculate_values`
/// modifier evaluates once every referenced entry is itself resolved. Captured as raw
/// text rather than parsed into an expression tree since no other part of the system
/// needs general expression evaluation.
fn parse_enum_value_expression(cursor: &mut TokenCursor) -> Result<EnumValue, ParseError> {
    let mut parts = Vec::new();
    loop {
        let token = cursor.peek(0);
        if token.text == "," || token.text == "}" || token.kind == TokenKind::Eof {
            break;
        }
        parts.push(token.text.clone());
        cursor.bump();
    }
    if parts.len() == 1 {
        if let Ok(n) = parts[0].parse::<i64>() {
            return Ok(EnumValue::Literal(n));
        }
    }
    Ok(EnumValue::Expression(parts.join(" ")))
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
    fn parses_enum_entries_with_and_without_values() {
        let tokens = tokenize("enum E { A, B = 5, C };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_enum(&mut cursor, &mut dom, root).unwrap();
        assert_eq!(dom.get(id).children().len(), 3);
        let entries: Vec<_> = dom
            .get(id)
            .children()
            .iter()
            .map(|&c| dom.get(c).kind.clone())
            .collect();
        match &entries[1] {
            NodeKind::EnumEntry { value, .. } => assert_eq!(*value, Some(EnumValue::Literal(5))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn marks_flags_enum_by_name_suffix() {
        let tokens = tokenize("enum ImGuiWindowFlags_ { ImGuiWindowFlags_None = 0 };").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let id = parse_enum(&mut cursor, &mut dom, root).unwrap();
        match &dom.get(id).kind {
            NodeKind::EnumElement { is_flag_enum, .. } => assert!(is_flag_enum),
            other => panic!("unexpected {other:?}"),
        }
    }
}
