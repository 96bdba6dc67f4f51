//! Orchestrates the whole pipeline: parse every source header into a shared
//! `HeaderFileSet`, run the fixed-order modifier pipeline against it, then invoke the
//! three emitters. This is the one place the fixed ordering the modules individually
//! document (templates before disambiguation, enum values before flag-marking, and so
//! on) is actually assembled into a single sequence.

use crate::config::{EmitConfig, PipelineConfig};
use crate::dom::{Dom, NodeId};
use crate::emit::{c_header, cpp_impl, json_meta};
use crate::error::BindgenError;
use crate::modifiers::*;
use crate::parser::parse_header_file;

/// Suffixes applied when tagging special enum entries; not exposed as configuration
/// since every known consumer of this tool uses the same convention.
const ENUM_INTERNAL_SUFFIXES: &[&str] = &["_"];
const ENUM_COUNT_SUFFIXES: &[&str] = &["_COUNT"];
const ENUM_FLAGS_SUFFIXES: &[&str] = &["Flags_", "Flags"];

/// One input header: its original file name (used for `#include` resolution and
/// reported in diagnostics) and its full source text.
pub struct HeaderSource<'a> {
    pub file_name: &'a str,
    pub source: &'a str,
}

/// The three artifacts a conversion produces, returned together so a caller (the CLI
/// shell, or a test) can decide what to do with each without re-running the pipeline.
pub struct ConversionOutput {
    pub header: String,
    pub implementation: String,
    pub metadata: serde_json::Value,
}

/// Parses `main_header` plus every entry in `config_headers` into one `HeaderFileSet`,
/// runs the full modifier pipeline configured by `pipeline`, then renders all three
/// output artifacts using `emit`. `emit`'s `api_macro`, `using_namespaces`, and
/// `manual_bodies` fields are overwritten from `pipeline` before rendering, so a caller
/// only needs to set the emitter-only fields (`output_base_name`,
/// `imgui_include_dir`, `original_header_include`, `wrap_extern_c`) themselves.
pub fn convert(
    main_header: HeaderSource,
    config_headers: &[HeaderSource],
    pipeline: &PipelineConfig,
    mut emit: EmitConfig,
) -> Result<ConversionOutput, BindgenError> {
    let mut dom = Dom::new();
    let set_root = dom.set_root(crate::dom::NodeKind::HeaderFileSet);

    let (main_file_dom, main_file_root) = parse_header_file(main_header.source, main_header.file_name)?;
    let main_header_id = dom.graft(set_root, &main_file_dom, main_file_root);

    for header in config_headers {
        let (file_dom, file_root) = parse_header_file(header.source, header.file_name)?;
        dom.graft(set_root, &file_dom, file_root);
    }

    dom.save_unmodified_clones();
    dom.validate_hierarchy().map_err(|e| BindgenError::InvalidDom(e.to_string()))?;

    run_pipeline(&mut dom, main_header_id, pipeline, &emit)?;

    dom.validate_hierarchy().map_err(|e| BindgenError::InvalidDom(e.to_string()))?;

    emit.api_macro = pipeline.api_macro.clone();
    emit.using_namespaces = pipeline.namespace_prefixes.keys().cloned().collect();
    emit.manual_bodies = pipeline
        .manual_functions
        .iter()
        .filter_map(|m| {
            let name = manual_function_name(&m.signature);
            m.body.clone().map(|body| (name, body))
        })
        .collect();

    let mut header_bytes = Vec::new();
    c_header::write(&dom, &mut header_bytes, &emit)?;
    let header = String::from_utf8_lossy(&header_bytes).into_owned();

    let mut impl_bytes = Vec::new();
    cpp_impl::write(&dom, &mut impl_bytes, &emit)?;
    let implementation = String::from_utf8_lossy(&impl_bytes).into_owned();

    let metadata = json_meta::to_value(&dom, &emit)?;

    Ok(ConversionOutput { header, implementation, metadata })
}

/// Pulls the declared name out of a manual function's signature text (e.g.
/// `"ImVector_int ImVector_int_create(void)"` -> `"ImVector_int_create"`), matching
/// the small split-on-punctuation routine [`manual::apply`] itself uses to parse the
/// same text, since [`EmitConfig::manual_bodies`] is keyed by name rather than by
/// signature.
fn manual_function_name(signature: &str) -> String {
    signature
        .split(|c: char| c == '(')
        .next()
        .unwrap_or(signature)
        .split_whitespace()
        .last()
        .unwrap_or(signature)
        .trim_start_matches('*')
        .to_string()
}

fn run_pipeline(dom: &mut Dom, main_header: NodeId, config: &PipelineConfig, emit: &EmitConfig) -> Result<(), BindgenError> {
    let add_includes: Vec<(&str, bool)> = config.add_includes.iter().map(|(p, sys)| (p.as_str(), *sys)).collect();
    includes::add_includes(dom, &add_includes);
    let remove_includes: Vec<&str> = config.remove_includes.iter().map(String::as_str).collect();
    includes::remove_includes(dom, &remove_includes);
    let change_includes: Vec<(&str, &str)> = config.change_includes.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
    includes::change_includes(dom, &change_includes);
    let forward_declarations: Vec<&str> = config.forward_declarations.iter().map(String::as_str).collect();
    includes::add_forward_declarations(dom, &forward_declarations);

    if let Some((old, new)) = &config.api_macro_rename {
        api_macro::rename_macro(dom, old, new);
    }

    if !config.move_types.is_empty() {
        move_types::relocate(dom, main_header, &config.move_types);
    }

    comments::attach_preceding(dom);
    bodies::remove_function_bodies(dom);
    anonymous::assign_names(dom);

    let remove_struct_names: Vec<&str> = config.remove_struct_names.iter().map(String::as_str).collect();
    prune::remove_structs(dom, &remove_struct_names);
    let remove_function_owner_classes: Vec<&str> = config.remove_function_owner_classes.iter().map(String::as_str).collect();
    prune::remove_all_functions_from_classes(dom, &remove_function_owner_classes);
    let remove_function_names: Vec<&str> = config.remove_function_names.iter().map(String::as_str).collect();
    prune::remove_functions(dom, &remove_function_names);
    let remove_typedef_names: Vec<&str> = config.remove_typedef_names.iter().map(String::as_str).collect();
    prune::remove_typedefs(dom, &remove_typedef_names);
    prune::remove_operators(dom);
    prune::remove_heap_constructors_and_destructors(dom);
    prune::remove_static_fields(dom);
    prune::remove_extern_fields(dom);
    prune::remove_nested_typedefs(dom);
    prune::remove_constexpr(dom);
    prune::remove_enum_forward_declarations(dom);

    by_value::mark_by_value_structs(dom, &config.by_value_structs);
    references::convert_references_to_pointers(dom);
    if !config.pass_structs_by_value {
        references::convert_by_value_struct_args_to_pointers(dom, &config.by_value_structs);
    }

    for (macro_name, assumed_value) in &config.conditional_flags {
        conditionals::flatten(dom, macro_name, *assumed_value);
    }

    nested_classes::flatten(dom);
    namespaces::flatten(dom, &config.namespace_prefixes);
    if let Some(prefix) = &config.loose_function_prefix {
        namespaces::add_prefix_to_loose_functions(dom, prefix);
    }

    templates::flatten(dom, &config.custom_type_fudge)?;
    class_functions::flatten(dom);
    internal::mark_internal_members(dom);

    enums::calculate_values(dom);
    enums::mark_special_values(dom, ENUM_INTERNAL_SUFFIXES, ENUM_COUNT_SUFFIXES);
    enums::mark_flags_enums(dom, ENUM_FLAGS_SUFFIXES);

    for (function_name, distinguishing_arg_name, new_name) in &config.rename_by_signature {
        rename::rename_function_by_signature(dom, function_name, distinguishing_arg_name, new_name)?;
    }

    if config.generate_default_arg_functions {
        default_args::generate_default_argument_functions(
            dom,
            &config.default_arg_ignore,
            &config.default_arg_ignore_prefixes,
            &config.trivial_argument_types,
            &config.trivial_argument_names,
        );
    }

    disambiguate::disambiguate_functions(
        dom,
        &config.disambiguate_type_suffixes,
        &config.disambiguate_ignore,
        &config.disambiguate_rename_everything,
    );

    variadic::add_va_list_functions(dom, &config.custom_varargs_list_suffixes);
    if config.generate_exploded_varargs_functions {
        variadic::add_exploded_variadic_functions(dom, config.exploded_varargs_max_args);
    }
    if config.generate_unformatted_functions {
        unformatted::add_unformatted_functions(dom, &config.unformatted_ignore);
    }

    rename::rename_by_map(dom, &config.rename_map);
    for (target, note) in &config.function_comments {
        rename::add_function_comment(dom, target, note)?;
    }

    if !config.manual_functions.is_empty() {
        manual::apply(dom, main_header, &config.manual_functions);
    }

    metadata::exclude_defines_from_metadata(dom, &config.excluded_metadata_defines);

    if !config.is_backend_header {
        forward_decl::forward_declare_structs(dom, main_header);
        if emit.wrap_extern_c {
            extern_c::wrap(dom, main_header);
        }
    }

    cosmetic::remove_empty_conditionals(dom);
    cosmetic::merge_blank_lines(dom);
    cosmetic::trim_blank_lines(dom);

    Ok(())
}
