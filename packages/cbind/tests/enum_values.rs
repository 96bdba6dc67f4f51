//! Covers enum value derivation: the "previous + 1" rule, explicit literals, and
//! named-reference / shift-and-or expression evaluation, end to end through the JSON
//! metadata emitter.

use cbind::config::EmitConfig;
use cbind::modifiers::enums;
use cbind::parser::parse_header_file;

#[test]
fn explicit_literals_interrupt_and_resume_the_previous_plus_one_count() {
    let (mut dom, _root) = parse_header_file("enum E { A, B = 5, C };\n", "t.h").unwrap();
    enums::calculate_values(&mut dom);

    let meta = cbind::emit::json_meta::to_value(&dom, &EmitConfig::default()).unwrap();
    let entries = meta["enums"][0]["entries"].as_array().unwrap();
    assert_eq!(entries[0]["name"], "A");
    assert_eq!(entries[0]["value"], 0);
    assert_eq!(entries[1]["name"], "B");
    assert_eq!(entries[1]["value"], 5);
    assert_eq!(entries[2]["name"], "C");
    assert_eq!(entries[2]["value"], 6);
}

#[test]
fn shift_and_or_expressions_over_named_references_resolve_to_literals() {
    let source = "enum Flags_ {\n\
                  Flags_A = 1 << 0,\n\
                  Flags_B = 1 << 1,\n\
                  Flags_AB = Flags_A | Flags_B\n\
                  };\n";
    let (mut dom, _root) = parse_header_file(source, "t.h").unwrap();
    enums::calculate_values(&mut dom);

    let meta = cbind::emit::json_meta::to_value(&dom, &EmitConfig::default()).unwrap();
    let entries = meta["enums"][0]["entries"].as_array().unwrap();
    assert_eq!(entries[0]["value"], 1);
    assert!(entries[0]["expression"].is_null());
    assert_eq!(entries[1]["value"], 2);
    assert_eq!(entries[2]["name"], "Flags_AB");
    assert_eq!(entries[2]["value"], 3);
    assert!(entries[2]["expression"].is_null());
}

#[test]
fn a_reference_to_an_unresolvable_name_is_reported_as_an_unresolved_expression() {
    let (mut dom, _root) = parse_header_file("enum E { A = SomeOtherConstant };\n", "t.h").unwrap();
    enums::calculate_values(&mut dom);

    let meta = cbind::emit::json_meta::to_value(&dom, &EmitConfig::default()).unwrap();
    let entries = meta["enums"][0]["entries"].as_array().unwrap();
    assert_eq!(entries[0]["expression"], "SomeOtherConstant");
}
