//! Enum post-processing: deriving entry values from the "previous + 1" rule (or an
//! explicit expression), then tagging internal/count/flag entries so the emitter knows
//! how to render them. Value calculation must run before flag-marking since the flag
//! emitter path (hex vs. decimal) depends on already-resolved values.

use crate::dom::{Dom, EnumValue, NodeId, NodeKind};
use std::collections::HashMap;

/// Resolves every `EnumEntry.value` under an `EnumElement` to an explicit
/// [`EnumValue`], starting at 0 and incrementing from the previous entry unless an
/// entry already carries a literal or expression of its own. A named-reference or
/// `<<`/`|` expression over entries already resolved in the same enum (e.g.
/// `Flag_A | Flag_B`, `1 << N`) is evaluated down to a literal; an expression this
/// evaluator can't reduce (an operator it doesn't know, a reference outside the
/// enum) is left as-is for the emitter to print verbatim.
pub fn calculate_values(dom: &mut Dom) {
    for enum_id in dom.collect_preorder(dom.root()) {
        if !matches!(dom.get(enum_id).kind, NodeKind::EnumElement { .. }) {
            continue;
        }
        calculate_values_in(dom, enum_id);
    }
}

fn calculate_values_in(dom: &mut Dom, enum_id: NodeId) {
    let mut running: i64 = 0;
    let mut resolved: HashMap<String, i64> = HashMap::new();
    for entry_id in dom.get(enum_id).children().to_vec() {
        let NodeKind::EnumEntry { name, value, .. } = &mut dom.get_mut(entry_id).kind else { continue };
        let entry_name = name.clone();
        match value.take() {
            Some(EnumValue::Literal(n)) => {
                *value = Some(EnumValue::Literal(n));
                resolved.insert(entry_name, n);
                running = n + 1;
            }
            Some(EnumValue::Expression(e)) => {
                *value = Some(match evaluate_expression(&e, &resolved) {
                    Some(n) => {
                        resolved.insert(entry_name, n);
                        running = n + 1;
                        EnumValue::Literal(n)
                    }
                    None => {
                        // An unresolved expression breaks the "previous + 1" chain for
                        // every entry after it; the emitter prints the expression text
                        // verbatim.
                        running = running.wrapping_add(1);
                        EnumValue::Expression(e)
                    }
                });
            }
            None => {
                *value = Some(EnumValue::Literal(running));
                resolved.insert(entry_name, running);
                running += 1;
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
enum Tok {
    Ident(String),
    Num(i64),
    Pipe,
    Shl,
    LParen,
    RParen,
}

fn tokenize(expr: &str) -> Option<Vec<Tok>> {
    let bytes = expr.as_bytes();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c == '|' {
            toks.push(Tok::Pipe);
            i += 1;
            continue;
        }
        if c == '(' {
            toks.push(Tok::LParen);
            i += 1;
            continue;
        }
        if c == ')' {
            toks.push(Tok::RParen);
            i += 1;
            continue;
        }
        if c == '<' && bytes.get(i + 1) == Some(&b'<') {
            toks.push(Tok::Shl);
            i += 2;
            continue;
        }
        if c.is_ascii_digit() {
            let start = i;
            if c == '0' && bytes.get(i + 1).map(|b| *b as char) == Some('x') {
                i += 2;
                while i < bytes.len() && (bytes[i] as char).is_ascii_hexdigit() {
                    i += 1;
                }
                let n = i64::from_str_radix(&expr[start + 2..i], 16).ok()?;
                while i < bytes.len() && matches!(bytes[i] as char, 'u' | 'U' | 'l' | 'L') {
                    i += 1;
                }
                toks.push(Tok::Num(n));
                continue;
            }
            while i < bytes.len() && (bytes[i] as char).is_ascii_digit() {
                i += 1;
            }
            let n: i64 = expr[start..i].parse().ok()?;
            while i < bytes.len() && matches!(bytes[i] as char, 'u' | 'U' | 'l' | 'L') {
                i += 1;
            }
            toks.push(Tok::Num(n));
            continue;
        }
        if c.is_alphabetic() || c == '_' {
            let start = i;
            while i < bytes.len() && ((bytes[i] as char).is_alphanumeric() || bytes[i] as char == '_') {
                i += 1;
            }
            toks.push(Tok::Ident(expr[start..i].to_string()));
            continue;
        }
        return None;
    }
    Some(toks)
}

struct ExprParser<'a> {
    toks: &'a [Tok],
    pos: usize,
    resolved: &'a HashMap<String, i64>,
}

impl ExprParser<'_> {
    fn parse_or(&mut self) -> Option<i64> {
        let mut v = self.parse_shift()?;
        while matches!(self.toks.get(self.pos), Some(Tok::Pipe)) {
            self.pos += 1;
            v |= self.parse_shift()?;
        }
        Some(v)
    }

    fn parse_shift(&mut self) -> Option<i64> {
        let mut v = self.parse_primary()?;
        while matches!(self.toks.get(self.pos), Some(Tok::Shl)) {
            self.pos += 1;
            v <<= self.parse_primary()?;
        }
        Some(v)
    }

    fn parse_primary(&mut self) -> Option<i64> {
        match self.toks.get(self.pos)?.clone() {
            Tok::Num(n) => {
                self.pos += 1;
                Some(n)
            }
            Tok::Ident(name) => {
                self.pos += 1;
                self.resolved.get(&name).copied()
            }
            Tok::LParen => {
                self.pos += 1;
                let v = self.parse_or()?;
                match self.toks.get(self.pos) {
                    Some(Tok::RParen) => {
                        self.pos += 1;
                        Some(v)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

/// Evaluates a named-reference / `<<`/`|` expression against `resolved` (the enum
/// entries computed so far, in declaration order). Returns `None` if the expression
/// uses an operator this evaluator doesn't know or references a name not yet resolved
/// (forward or cross-enum references aren't supported).
fn evaluate_expression(expr: &str, resolved: &HashMap<String, i64>) -> Option<i64> {
    let toks = tokenize(expr)?;
    if toks.is_empty() {
        return None;
    }
    let mut parser = ExprParser { toks: &toks, pos: 0, resolved };
    let value = parser.parse_or()?;
    if parser.pos == parser.toks.len() {
        Some(value)
    } else {
        None
    }
}

/// Re-tags `is_internal`/`is_count` from caller-supplied suffix lists, overriding
/// whatever the parser guessed from the default `_`/`_COUNT` convention.
pub fn mark_special_values(dom: &mut Dom, internal_suffixes: &[&str], count_suffixes: &[&str]) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::EnumEntry { name, is_internal, is_count, .. } = &mut dom.get_mut(id).kind {
            *is_count = count_suffixes.iter().any(|s| name.ends_with(s));
            *is_internal = !*is_count && internal_suffixes.iter().any(|s| name.ends_with(s));
        }
    }
}

/// Marks an `EnumElement` as a flag enum (values rendered in hex, implying bitwise
/// combination) when its name ends with one of `suffixes`, overriding the parser's
/// eager `Flags`/`Flags_` guess with the caller's own convention.
pub fn mark_flags_enums(dom: &mut Dom, suffixes: &[&str]) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::EnumElement { name, is_flag_enum, .. } = &mut dom.get_mut(id).kind {
            *is_flag_enum = suffixes.iter().any(|s| name.ends_with(s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn calculates_previous_plus_one_and_respects_explicit_values() {
        let (mut dom, root) = parse_header_file("enum E { A, B = 5, C };\n", "t.h").unwrap();
        calculate_values(&mut dom);
        let enum_id = dom.get(root).children()[0];
        let entries = dom.get(enum_id).children().to_vec();
        let values: Vec<_> = entries
            .iter()
            .map(|&id| match &dom.get(id).kind {
                NodeKind::EnumEntry { value, .. } => value.clone().unwrap(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![EnumValue::Literal(0), EnumValue::Literal(5), EnumValue::Literal(6)]);
    }

    #[test]
    fn resolves_named_references_and_shift_or_expressions() {
        let (mut dom, root) = parse_header_file(
            "enum Flags_ { Flags_A = 1 << 0, Flags_B = 1 << 1, Flags_AB = Flags_A | Flags_B };\n",
            "t.h",
        )
        .unwrap();
        calculate_values(&mut dom);
        let enum_id = dom.get(root).children()[0];
        let entries = dom.get(enum_id).children().to_vec();
        let values: Vec<_> = entries
            .iter()
            .map(|&id| match &dom.get(id).kind {
                NodeKind::EnumEntry { value, .. } => value.clone().unwrap(),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![EnumValue::Literal(1), EnumValue::Literal(2), EnumValue::Literal(3)]);
    }

    #[test]
    fn leaves_a_reference_to_an_unknown_name_as_an_unresolved_expression() {
        let (mut dom, root) = parse_header_file("enum E { A = SomeOtherConstant };\n", "t.h").unwrap();
        calculate_values(&mut dom);
        let enum_id = dom.get(root).children()[0];
        let entry = dom.get(enum_id).children()[0];
        match &dom.get(entry).kind {
            NodeKind::EnumEntry { value, .. } => assert_eq!(value, &Some(EnumValue::Expression("SomeOtherConstant".to_string()))),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn marks_flags_enums_by_configured_suffix() {
        let (mut dom, root) = parse_header_file("enum ImGuiWindowFlags_ { A };\nenum E { B };\n", "t.h").unwrap();
        mark_flags_enums(&mut dom, &["Flags_", "Flags"]);
        let children = dom.get(root).children().to_vec();
        match &dom.get(children[0]).kind {
            NodeKind::EnumElement { is_flag_enum, .. } => assert!(is_flag_enum),
            other => panic!("unexpected {other:?}"),
        }
        match &dom.get(children[1]).kind {
            NodeKind::EnumElement { is_flag_enum, .. } => assert!(!is_flag_enum),
            other => panic!("unexpected {other:?}"),
        }
    }
}
