use super::types::parse_type;
use crate::dom::{Dom, NodeId, NodeKind};
use crate::error::ParseError;
use crate::lexer::{TokenCursor, TokenKind};

/// `#include "path"` or `#include <path>`. The whole directive was lexed as one
/// `PreprocessorDirective` token; this just picks the quoted/angled path back out of
/// its text.
pub fn parse_include(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    let token = cursor.bump();
    let text = token.text.trim_start_matches('#').trim();
    let rest = text.strip_prefix("include").unwrap_or(text).trim();
    let (path, is_system) = if let Some(inner) = rest.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        (inner.to_string(), true)
    } else if let Some(inner) = rest.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        (inner.to_string(), false)
    } else {
        (rest.to_string(), false)
    };
    Ok(dom.append_child(parent, NodeKind::Include { path, is_system }))
}

pub fn parse_pragma(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    let token = cursor.bump();
    let text = token.text.trim_start_matches('#').trim();
    let rest = text.strip_prefix("pragma").unwrap_or(text).trim().to_string();
    Ok(dom.append_child(parent, NodeKind::Pragma { text: rest }))
}

/// `#define NAME value` or `#define NAME(args) value`. Both the object-like and
/// function-like forms arrive as one directive token; this splits the macro name
/// (and, for the function-like form, its parameter list) from the replacement text.
pub fn parse_define(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    let token = cursor.bump();
    let text = token.text.trim_start_matches('#').trim();
    let rest = text.strip_prefix("define").unwrap_or(text).trim_start();

    let name_end = rest
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = rest[..name_end].to_string();
    let after_name = &rest[name_end..];

    let (is_function_like, parameters, value) = if after_name.starts_with('(') {
        let close = after_name.find(')').unwrap_or(after_name.len());
        let params: Vec<String> = after_name[1..close]
            .split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        (true, params, after_name[close + 1..].trim().to_string())
    } else {
        (false, Vec::new(), after_name.trim().to_string())
    };

    Ok(dom.append_child(
        parent,
        NodeKind::Define { name, value, is_function_like, parameters, excluded_from_metadata: false },
    ))
}

/// A `#if`/`#ifdef`/`#ifndef` header line. Returns the condition expression text and
/// whether it is negated (`#ifndef`, or `#if !X`); the matching `#else`/`#elif`
/// (if any) and `#endif` are consumed by the caller's scope loop, which recognizes
/// them by directive keyword rather than here.
pub fn parse_conditional_header(token_text: &str) -> (String, bool) {
    let text = token_text.trim_start_matches('#').trim();
    if let Some(rest) = text.strip_prefix("ifndef") {
        (rest.trim().to_string(), true)
    } else if let Some(rest) = text.strip_prefix("ifdef") {
        (rest.trim().to_string(), false)
    } else if let Some(rest) = text.strip_prefix("elif") {
        (rest.trim().to_string(), false)
    } else {
        let rest = text.strip_prefix("if").unwrap_or(text).trim();
        if let Some(negated) = rest.strip_prefix('!') {
            (negated.trim().to_string(), true)
        } else {
            (rest.to_string(), false)
        }
    }
}

pub fn directive_keyword(token_text: &str) -> &str {
    let text = token_text.trim_start_matches('#').trim_start();
    text.split(|c: char| c.is_whitespace() || c == '(').next().unwrap_or("")
}

/// `typedef AliasedType Name;`, including the function-pointer-typedef shape
/// `typedef ReturnType (*Name)(ArgTypes);`.
pub fn parse_typedef(cursor: &mut TokenCursor, dom: &mut Dom, parent: NodeId) -> Result<NodeId, ParseError> {
    expect_keyword(cursor, "typedef")?;
    let mut aliased_type = parse_type(cursor)?;
    let (name, dims) = super::types::parse_declarator(cursor, &mut aliased_type)?;
    aliased_type.array_dims = dims;
    expect_punctuator(cursor, ";")?;
    Ok(dom.append_child(parent, NodeKind::Typedef { name, aliased_type }))
}

/// `template<class T, ...>` heading a templated struct/function declaration. The
/// declaration that follows becomes this node's single child; `templates::flatten`
/// later synthesizes concrete instantiations from it and discards the template node
/// itself once every use site has been concretized.
pub fn parse_template_parameters(cursor: &mut TokenCursor) -> Result<Vec<String>, ParseError> {
    expect_keyword(cursor, "template")?;
    expect_punctuator(cursor, "<")?;
    let mut parameters = Vec::new();
    loop {
        match cursor.peek(0).text.as_str() {
            "class" | "typename" => {
                cursor.bump();
            }
            _ => {}
        }
        parameters.push(expect_identifier(cursor)?);
        if cursor.peek(0).text == "," {
            cursor.bump();
            continue;
        }
        break;
    }
    expect_punctuator(cursor, ">")?;
    Ok(parameters)
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
