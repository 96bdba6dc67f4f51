use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn converts_a_header_and_writes_all_three_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let output_base = dir.path().join("ctinylib");

    Command::cargo_bin("cbind")
        .unwrap()
        .arg(fixture("tinylib.h"))
        .arg("-o")
        .arg(&output_base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Done"));

    let header = fs::read_to_string(output_base.with_extension("h")).unwrap();
    assert!(header.contains("ImGui_SetLabel"));
    assert!(header.contains("Point_Length"));

    let implementation = fs::read_to_string(output_base.with_extension("cpp")).unwrap();
    assert!(implementation.contains("#include \"tinylib.h\""));

    let metadata_text = fs::read_to_string(output_base.with_extension("json")).unwrap();
    let metadata: serde_json::Value = serde_json::from_str(&metadata_text).unwrap();
    assert!(metadata.get("functions").is_some());
}

#[test]
fn missing_source_file_exits_with_parameter_error_code() {
    let dir = tempfile::tempdir().unwrap();
    let output_base = dir.path().join("out");

    Command::cargo_bin("cbind")
        .unwrap()
        .arg(fixture("does-not-exist.h"))
        .arg("-o")
        .arg(&output_base)
        .assert()
        .code(2);
}

#[test]
fn imconfig_next_to_source_is_picked_up_automatically() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("imconfig.h"), "#define TINYLIB_CUSTOM_DEFINE 1\n").unwrap();
    fs::copy(fixture("tinylib.h"), dir.path().join("tinylib.h")).unwrap();

    let output_base = dir.path().join("ctinylib");

    Command::cargo_bin("cbind").unwrap().arg(dir.path().join("tinylib.h")).arg("-o").arg(&output_base).assert().success();

    let metadata_text = fs::read_to_string(output_base.with_extension("json")).unwrap();
    assert!(metadata_text.contains("TINYLIB_CUSTOM_DEFINE"));
}

#[test]
fn nopassingstructsbyvalue_converts_struct_arguments_to_pointers() {
    let dir = tempfile::tempdir().unwrap();
    let output_base = dir.path().join("ctinylib");

    Command::cargo_bin("cbind")
        .unwrap()
        .arg(fixture("tinylib.h"))
        .arg("-o")
        .arg(&output_base)
        .arg("--nopassingstructsbyvalue")
        .assert()
        .success();

    let header = fs::read_to_string(output_base.with_extension("h")).unwrap();
    assert!(header.contains("const Point*"));
}
