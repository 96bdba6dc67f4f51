//! Covers the template-instantiation scenario: one `template<...> struct` referenced
//! at two distinct concrete types must produce two distinct concrete structs, each
//! with its own substituted field types, rather than collapsing to one.

use cbind::config::EmitConfig;
use cbind::dom::NodeKind;
use cbind::emit::c_header;
use cbind::modifiers::templates;
use cbind::parser::parse_header_file;
use indexmap::IndexMap;

#[test]
fn two_distinct_instantiations_of_one_template_produce_two_concrete_structs() {
    let source = "template<typename T> struct V { T* data; int size; };\n\
                  V<int> MakeIntVector();\n\
                  V<float> MakeFloatVector();\n";
    let (mut dom, root) = parse_header_file(source, "t.h").unwrap();
    templates::flatten(&mut dom, &IndexMap::new()).unwrap();

    let struct_names: Vec<String> = dom
        .collect_preorder(root)
        .into_iter()
        .filter_map(|id| match &dom.get(id).kind {
            NodeKind::ClassStructUnion { name, .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(struct_names, vec!["V_int", "V_float"]);

    let int_struct = dom
        .collect_preorder(root)
        .into_iter()
        .find(|&id| matches!(&dom.get(id).kind, NodeKind::ClassStructUnion { name, .. } if name == "V_int"))
        .unwrap();
    let float_struct = dom
        .collect_preorder(root)
        .into_iter()
        .find(|&id| matches!(&dom.get(id).kind, NodeKind::ClassStructUnion { name, .. } if name == "V_float"))
        .unwrap();

    for (struct_id, expected_base) in [(int_struct, "int"), (float_struct, "float")] {
        let data_field = dom.get(struct_id).children()[0];
        match &dom.get(data_field).kind {
            NodeKind::FieldDeclaration { field_type, .. } => {
                assert_eq!(field_type.base_name, expected_base);
                assert!(field_type.is_pointer());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    let mut out = Vec::new();
    c_header::write(&dom, &mut out, &EmitConfig::default()).unwrap();
    let header = String::from_utf8(out).unwrap();
    assert!(header.contains("V_int"));
    assert!(header.contains("V_float"));
    assert!(header.contains("MakeIntVector"));
    assert!(header.contains("MakeFloatVector"));
    assert!(!header.contains("template"));
}

#[test]
fn repeated_uses_of_the_same_instantiation_still_produce_only_one_struct() {
    let source = "template<typename T> struct V { T* data; };\n\
                  V<int> MakeVector();\n\
                  void TakeVector(V<int> v);\n";
    let (mut dom, root) = parse_header_file(source, "t.h").unwrap();
    templates::flatten(&mut dom, &IndexMap::new()).unwrap();

    let struct_count = dom
        .collect_preorder(root)
        .into_iter()
        .filter(|&id| matches!(dom.get(id).kind, NodeKind::ClassStructUnion { .. }))
        .count();
    assert_eq!(struct_count, 1);
}
