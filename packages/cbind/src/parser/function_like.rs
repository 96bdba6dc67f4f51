use super::types::{parse_declarator, parse_type};
use crate::dom::{Accessibility, Dom, MemberFunctionKind, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{TokenCursor, TokenKind};

#[derive(Default)]
struct Specifiers {
    is_static: bool,
    is_extern: bool,
    is_constexpr: bool,
}

fn consume_specifiers(cursor: &mut TokenCursor) -> Specifiers {
    let mut specifiers = Specifiers::default();
    loop {
        match cursor.peek(0).text.as_str() {
            "static" => {
                specifiers.is_static = true;
                cursor.bump();
            }
            "extern" => {
                specifiers.is_extern = true;
                cursor.bump();
            }
            "constexpr" => {
                specifiers.is_constexpr = true;
                cursor.bump();
            }
            "virtual" | "inline" | "friend" | "explicit" => {
                cursor.bump();
            }
            text if text.ends_with("_API") => {
                // An export-visibility macro (e.g. `IMGUI_API`). Not part of the
                // type; the `api_macro` modifier re-adds the configured macro at
                // emission time, so it is simply discarded here.
                cursor.bump();
            }
            _ => break,
        }
    }
    specifiers
}

/// Parses either a function declaration or a field declaration appearing in the given
/// scope, dispatching on whether the declarator is followed by `(` (a function) or by
/// `;`/`[`/`:`/`,` (a field). `owning_class` is `Some` inside a class/struct/union body
/// so constructor/destructor shapes and member-function status can be recognized.
pub fn parse_function_or_field(
    cursor: &mut TokenCursor,
    dom: &mut Dom,
    parent: NodeId,
    owning_class: Option<&str>,
    accessibility: Accessibility,
) -> Result<NodeId, ParseError> {
    let specifiers = consume_specifiers(cursor);

    if let Some(class_name) = owning_class {
        if cursor.peek(0).text == "~" && cursor.peek(1).text == class_name {
            cursor.bump();
            cursor.bump();
            return parse_function_tail(
                cursor,
                dom,
                parent,
                format!("~{class_name}"),
                format!("~{class_name}"),
                crate::dom::Type::named("void"),
                Some(MemberFunctionKind::Destructor),
                owning_class,
                accessibility,
                &specifiers,
            );
        }
        if cursor.peek(0).text == class_name && cursor.peek(1).text == "(" {
            let name = cursor.bump().text.clone();
            return parse_function_tail(
                cursor,
                dom,
                parent,
                name.clone(),
                name,
                crate::dom::Type::named("void"),
                Some(MemberFunctionKind::Constructor),
                owning_class,
                accessibility,
                &specifiers,
            );
        }
    }

    let mut return_type = parse_type(cursor)?;

    let (is_operator, name) = if cursor.peek(0).text == "operator" {
        cursor.bump();
        let symbol = cursor.bump().text.clone();
        (true, format!("operator{symbol}"))
    } else {
        (false, expect_identifier(cursor)?)
    };

    if cursor.peek(0).text == "(" {
        let original_name = name.clone();
        return parse_function_tail(
            cursor,
            dom,
            parent,
            name,
            original_name,
            return_type,
            if owning_class.is_some() { Some(MemberFunctionKind::Ordinary) } else { None },
            owning_class,
            accessibility,
            &specifiers,
        )
        .map(|id| {
            if let NodeKind::FunctionDeclaration { is_operator: op, .. } = &mut dom.get_mut(id).kind {
                *op = is_operator;
            }
            id
        });
    }

    let mut dims = Vec::new();
    while cursor.peek(0).text == "[" {
        cursor.bump();
        if cursor.peek(0).text == "]" {
            dims.push(None);
        } else {
            dims.push(cursor.bump().text.parse::<u64>().ok());
        }
        expect_punctuator(cursor, "]")?;
    }
    return_type.array_dims = dims;
    let mut names = vec![name];
    let mut bitfield_width = None;
    if cursor.peek(0).text == ":" {
        cursor.bump();
        bitfield_width = cursor.bump().text.parse::<u32>().ok();
    }
    while cursor.peek(0).text == "," {
        cursor.bump();
        let (n, _) = parse_declarator(cursor, &mut return_type)?;
        names.push(n);
    }
    expect_punctuator(cursor, ";")?;

    let is_internal = names.first().is_some_and(|n| n.starts_with("_Internal"));
    Ok(dom.append_child(
        parent,
        NodeKind::FieldDeclaration {
            field_type: return_type,
            names,
            bitfield_width,
            is_static: specifiers.is_static,
            is_extern: specifiers.is_extern,
            is_internal,
        },
    ))
}

#[allow(clippy::too_many_arguments)]
fn parse_function_tail(
    cursor: &mut TokenCursor,
    dom: &mut Dom,
    parent: NodeId,
    name: String,
    original_name: String,
    return_type: crate::dom::Type,
    member_kind: Option<MemberFunctionKind>,
    owning_class: Option<&str>,
    accessibility: Accessibility,
    specifiers: &Specifiers,
) -> Result<NodeId, ParseError> {
    expect_punctuator(cursor, "(")?;
    let func = dom.append_child(
        parent,
        NodeKind::FunctionDeclaration {
            return_type,
            name,
            is_member: owning_class.is_some(),
            member_kind,
            is_operator: false,
            is_constexpr: specifiers.is_constexpr,
            is_variadic: false,
            owning_class: owning_class.map(str::to_string),
            original_name,
            accessibility,
            is_internal: false,
            is_manual: false,
            is_default_helper: false,
        },
    );

    let mut is_variadic = false;
    if cursor.peek(0).text != ")" {
        loop {
            if cursor.peek(0).text == "..." {
                cursor.bump();
                is_variadic = true;
                dom.append_child(
                    func,
                    NodeKind::FunctionParameter {
                        param_type: crate::dom::Type::named("..."),
                        name: String::new(),
                        default_value: None,
                        is_varargs: true,
                    },
                );
                break;
            }
            let mut param_type = parse_type(cursor)?;
            let name = if cursor.peek(0).kind == TokenKind::Identifier {
                parse_declarator(cursor, &mut param_type)?.0
            } else {
                String::new()
            };
            let default_value = if cursor.peek(0).text == "=" {
                cursor.bump();
                Some(capture_raw_until(cursor, &[",", ")"]))
            } else {
                None
            };
            dom.append_child(
                func,
                NodeKind::FunctionParameter { param_type, name, default_value, is_varargs: false },
            );
            if cursor.peek(0).text == "," {
                cursor.bump();
                continue;
            }
            break;
        }
    }
    expect_punctuator(cursor, ")")?;
    if let NodeKind::FunctionDeclaration { is_variadic: v, .. } = &mut dom.get_mut(func).kind {
        *v = is_variadic;
    }

    // trailing member-function qualifiers and pure/default/delete markers.
    loop {
        match cursor.peek(0).text.as_str() {
            "const" | "noexcept" | "override" | "final" => {
                cursor.bump();
            }
            _ => break,
        }
    }
    if cursor.peek(0).text == "=" {
        cursor.bump();
        // `= 0`, `= default`, `= delete`
        cursor.bump();
    }

    match cursor.peek(0).text.as_str() {
        "{" => skip_balanced_braces(cursor)?,
        ";" => {
            cursor.bump();
        }
        _ => {
            let token = cursor.peek(0);
            return Err(ParseError::UnexpectedToken {
                position: token.position,
                found: token.text.clone(),
                expected: "';' or function body".to_string(),
            });
        }
    }
    Ok(func)
}

fn skip_balanced_braces(cursor: &mut TokenCursor) -> Result<(), ParseError> {
    let start = cursor.position();
    expect_punctuator(cursor, "{")?;
    let mut depth = 1u32;
    loop {
        match cursor.peek(0).kind {
            TokenKind::Eof => return Err(ParseError::UnbalancedBraces { position: start }),
            _ => {}
        }
        let text = cursor.peek(0).text.clone();
        cursor.bump();
        if text == "{" {
            depth += 1;
        } else if text == "}" {
            depth -= 1;
            if depth == 0 {
                break;
            }
        }
    }
    Ok(())
}

/// Collects raw token text from the current position up to (but not including) the
/// next token whose text is in `stop` at bracket depth zero. Used to preserve an
/// unevaluated default-argument expression verbatim.
fn capture_raw_until(cursor: &mut TokenCursor, stop: &[&str]) -> String {
    let mut depth = 0i32;
    let mut parts = Vec::new();
    loop {
        let token = cursor.peek(0);
        if token.kind == TokenKind::Eof {
            break;
        }
        if depth == 0 && stop.contains(&token.text.as_str()) {
            break;
        }
        match token.text.as_str() {
            "(" | "[" | "{" => depth += 1,
            ")" | "]" | "}" => depth -= 1,
            _ => {}
        }
        parts.push(token.text.clone());
        cursor.bump();
    }
    parts.join(" ")
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
