use crate::dom::{FunctionPointerSignature, PointerKind, Qualifier, Type};
use crate::error::ParseError;
use crate::lexer::TokenCursor;

/// Parses a type-id: optional cv-qualifiers, a (possibly scoped) base name, optional
/// recursive template arguments, more cv-qualifiers, then a pointer/reference chain.
/// Array dimensions and function-pointer declarator shapes are not part of a bare
/// type-id in C++ grammar and are parsed separately by
/// [`parse_declarator_tail`] once a declarator name is in hand.
pub fn parse_type(cursor: &mut TokenCursor) -> Result<Type, ParseError> {
    let mut qualifiers = Vec::new();
    consume_qualifiers(cursor, &mut qualifiers);

    let mut base_name = expect_identifier(cursor)?;
    while cursor.peek(0).text == "::" {
        cursor.bump();
        base_name.push_str("::");
        base_name.push_str(&expect_identifier(cursor)?);
    }

    let mut template_args = Vec::new();
    if cursor.peek(0).text == "<" {
        cursor.bump();
        if cursor.peek(0).text != ">" {
            loop {
                template_args.push(parse_type(cursor)?);
                if cursor.peek(0).text == "," {
                    cursor.bump();
                    continue;
                }
                break;
            }
        }
        expect_punctuator(cursor, ">")?;
    }

    consume_qualifiers(cursor, &mut qualifiers);

    let mut pointer_chain = Vec::new();
    let mut is_reference = false;
    loop {
        match cursor.peek(0).text.as_str() {
            "*" => {
                cursor.bump();
                if cursor.peek(0).text == "const" {
                    cursor.bump();
                    pointer_chain.push(PointerKind::ConstPointer);
                } else {
                    pointer_chain.push(PointerKind::Pointer);
                }
            }
            "&" | "&&" => {
                cursor.bump();
                is_reference = true;
                break;
            }
            _ => break,
        }
    }

    Ok(Type {
        base_name,
        qualifiers,
        pointer_chain,
        is_reference,
        was_reference: false,
        array_dims: Vec::new(),
        template_args,
        function_pointer: None,
    })
}

fn consume_qualifiers(cursor: &mut TokenCursor, qualifiers: &mut Vec<Qualifier>) {
    loop {
        match cursor.peek(0).text.as_str() {
            "const" => {
                qualifiers.push(Qualifier::Const);
                cursor.bump();
            }
            "volatile" => {
                qualifiers.push(Qualifier::Volatile);
                cursor.bump();
            }
            _ => break,
        }
    }
}

/// A declarator is the `name` (plus array dims, or a function-pointer shape) that
/// follows a type-id in a field, parameter, or typedef declaration. Returns the bound
/// name and, if present, the array dimensions; `base_type` is mutated in place to
/// become a function-pointer type when the declarator has that shape.
pub fn parse_declarator(cursor: &mut TokenCursor, base_type: &mut Type) -> Result<(String, Vec<Option<u64>>), ParseError> {
    if cursor.peek(0).text == "(" && cursor.peek(1).text == "*" {
        return parse_function_pointer_declarator(cursor, base_type);
    }

    let name = expect_identifier(cursor)?;
    let mut array_dims = Vec::new();
    while cursor.peek(0).text == "[" {
        cursor.bump();
        if cursor.peek(0).text == "]" {
            array_dims.push(None);
        } else {
            let dim_token = cursor.bump();
            let dim = dim_token.text.parse::<u64>().ok();
            array_dims.push(dim);
        }
        expect_punctuator(cursor, "]")?;
    }
    Ok((name, array_dims))
}

/// Parses the `(*Name)(ArgType, ArgType)` tail of a function-pointer declarator,
/// folding it into `base_type` (which held the return type up to this point) as a
/// [`FunctionPointerSignature`].
fn parse_function_pointer_declarator(
    cursor: &mut TokenCursor,
    base_type: &mut Type,
) -> Result<(String, Vec<Option<u64>>), ParseError> {
    expect_punctuator(cursor, "(")?;
    expect_punctuator(cursor, "*")?;
    let name = expect_identifier(cursor)?;
    expect_punctuator(cursor, ")")?;
    expect_punctuator(cursor, "(")?;

    let mut parameter_types = Vec::new();
    if cursor.peek(0).text != ")" {
        loop {
            parameter_types.push(parse_type(cursor)?);
            // a bare parameter name after the type (uncommon in function-pointer
            // typedefs but harmless to skip) is discarded.
            if cursor.peek(0).kind == crate::lexer::TokenKind::Identifier {
                cursor.bump();
            }
            if cursor.peek(0).text == "," {
                cursor.bump();
                continue;
            }
            break;
        }
    }
    expect_punctuator(cursor, ")")?;

    let return_type = std::mem::replace(base_type, Type::named(String::new()));
    base_type.function_pointer = Some(Box::new(FunctionPointerSignature { return_type, parameter_types }));
    Ok((name, Vec::new()))
}

fn expect_identifier(cursor: &mut TokenCursor) -> Result<String, ParseError> {
    let token = cursor.bump();
    if token.kind == crate::lexer::TokenKind::Identifier {
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
    fn parses_a_simple_pointer_to_const_char() {
        let tokens = tokenize("const char* name").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let ty = parse_type(&mut cursor).unwrap();
        assert_eq!(ty.base_name, "char");
        assert_eq!(ty.qualifiers, vec![Qualifier::Const]);
        assert_eq!(ty.pointer_chain, vec![PointerKind::Pointer]);
    }

    #[test]
    fn parses_a_template_instantiation() {
        let tokens = tokenize("ImVector<int> values").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let ty = parse_type(&mut cursor).unwrap();
        assert_eq!(ty.base_name, "ImVector");
        assert_eq!(ty.template_args.len(), 1);
        assert_eq!(ty.template_args[0].base_name, "int");
    }

    #[test]
    fn parses_a_reference_type() {
        let tokens = tokenize("ImVec2& out").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let ty = parse_type(&mut cursor).unwrap();
        assert!(ty.is_reference);
    }

    #[test]
    fn parses_a_function_pointer_declarator() {
        let tokens = tokenize("void (*callback)(int, void* data)").unwrap();
        let mut cursor = TokenCursor::new(&tokens);
        let mut base = parse_type(&mut cursor).unwrap();
        let (name, dims) = parse_declarator(&mut cursor, &mut base).unwrap();
        assert_eq!(name, "callback");
        assert!(dims.is_empty());
        let sig = base.function_pointer.unwrap();
        assert_eq!(sig.return_type.base_name, "void");
        assert_eq!(sig.parameter_types.len(), 2);
    }
}
