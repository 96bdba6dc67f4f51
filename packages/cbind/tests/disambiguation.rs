//! Covers overload disambiguation end to end: a clashing overload set gets a
//! type-derived suffix per member, through to the emitted C header prototypes.

use cbind::config::EmitConfig;
use cbind::emit::c_header;
use cbind::modifiers::disambiguate;
use cbind::parser::parse_header_file;
use indexmap::{IndexMap, IndexSet};

#[test]
fn overloads_differing_by_one_parameter_type_get_distinct_suffixes() {
    let source = "void Foo(const char* s);\nvoid Foo(int id);\n";
    let (mut dom, _root) = parse_header_file(source, "t.h").unwrap();

    let mut type_suffixes = IndexMap::new();
    type_suffixes.insert("const char*".to_string(), "Str".to_string());
    type_suffixes.insert("int".to_string(), "ID".to_string());
    disambiguate::disambiguate_functions(&mut dom, &type_suffixes, &IndexSet::new(), &IndexSet::new());

    let mut out = Vec::new();
    c_header::write(&dom, &mut out, &EmitConfig::default()).unwrap();
    let header = String::from_utf8(out).unwrap();
    assert!(header.contains("Foo_Str"));
    assert!(header.contains("Foo_ID"));
    assert!(!header.contains("Foo(const char"));
}

#[test]
fn a_pure_arity_clash_leaves_the_shorter_overload_bare_by_default() {
    let source = "void Baz(int x);\nvoid Baz(int x, int y);\n";
    let (mut dom, _root) = parse_header_file(source, "t.h").unwrap();
    disambiguate::disambiguate_functions(&mut dom, &IndexMap::new(), &IndexSet::new(), &IndexSet::new());

    let mut out = Vec::new();
    c_header::write(&dom, &mut out, &EmitConfig::default()).unwrap();
    let header = String::from_utf8(out).unwrap();
    assert!(header.contains("Baz(int x)"));
    assert!(header.contains("Baz_Int(int x, int y)"));
}

#[test]
fn an_ignored_overload_set_is_left_untouched() {
    let source = "void Baz(const char* s);\nvoid Baz(int x);\n";
    let (mut dom, _root) = parse_header_file(source, "t.h").unwrap();
    let mut ignore = IndexSet::new();
    ignore.insert("Baz".to_string());
    disambiguate::disambiguate_functions(&mut dom, &IndexMap::new(), &ignore, &IndexSet::new());

    let mut out = Vec::new();
    c_header::write(&dom, &mut out, &EmitConfig::default()).unwrap();
    let header = String::from_utf8(out).unwrap();
    assert!(header.contains("Baz(const char* s)"));
    assert!(header.contains("Baz(int x)"));
}
