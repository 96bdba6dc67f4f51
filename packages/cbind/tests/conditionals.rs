//! Covers preprocessor-conditional flattening at an assumed truth value, including
//! the boundary case of a discarded branch's surrounding empty conditional shell.

use cbind::config::{EmitConfig, PipelineConfig};
use cbind::driver::{convert, HeaderSource};
use indexmap::IndexMap;

#[test]
fn an_enabled_flag_keeps_its_branch_and_drops_the_guard() {
    let source = "#if IMGUI_HAS_IMSTR\nstruct ImStr { const char* begin; const char* end; };\n#endif\nvoid Bar(void);\n";
    let mut conditional_flags = IndexMap::new();
    conditional_flags.insert("IMGUI_HAS_IMSTR".to_string(), true);
    let pipeline = PipelineConfig { conditional_flags, ..Default::default() };
    let emit = EmitConfig { output_base_name: "mylib".to_string(), original_header_include: "mylib.h".to_string(), ..Default::default() };

    let output = convert(HeaderSource { file_name: "mylib.h", source }, &[], &pipeline, emit).unwrap();

    assert!(output.header.contains("struct ImStr"));
    assert!(output.header.contains("Bar"));
    assert!(!output.header.contains("#if"));
    assert!(!output.header.contains("#endif"));

    let struct_meta = output.metadata["structs"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["name"] == "ImStr")
        .unwrap();
    assert!(struct_meta["conditionals"].as_array().unwrap().is_empty());
}

#[test]
fn a_disabled_flag_removes_the_guarded_declaration_and_its_empty_shell() {
    let source = "#if IMGUI_HAS_IMSTR\nstruct ImStr { const char* begin; };\n#endif\nvoid Bar(void);\n";
    let mut conditional_flags = IndexMap::new();
    conditional_flags.insert("IMGUI_HAS_IMSTR".to_string(), false);
    let pipeline = PipelineConfig { conditional_flags, ..Default::default() };
    let emit = EmitConfig { output_base_name: "mylib".to_string(), original_header_include: "mylib.h".to_string(), ..Default::default() };

    let output = convert(HeaderSource { file_name: "mylib.h", source }, &[], &pipeline, emit).unwrap();

    assert!(!output.header.contains("ImStr"));
    assert!(!output.header.contains("#if"));
    assert!(!output.header.contains("#endif"));
    assert!(output.header.contains("Bar"));
    assert!(output.metadata["structs"].as_array().unwrap().iter().all(|s| s["name"] != "ImStr"));
}
