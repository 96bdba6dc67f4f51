//! The thin shell around [`cbind`]: argument parsing, reading the source/config
//! headers from disk, expanding the static template snippets, writing the three
//! output files, and printing progress messages — everything spec.md §1 calls an
//! "external collaborator" rather than part of the core. The core itself
//! ([`cbind::driver::convert`]) never touches the filesystem.

pub mod defaults;
pub mod templates;

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use cbind::driver::HeaderSource;
use cbind::BindgenError;
use defaults::DefaultsInput;
use templates::TemplateExpansions;

/// Mirrors spec.md §6's command-line surface.
#[derive(Parser, Debug)]
#[command(
    name = "cbind",
    about = "Convert a C++ header for an immediate-mode GUI library into a C header, a C++ bridge, and JSON metadata.",
    after_help = "Result code 0 is returned on success, 1 on conversion failure and 2 on parameter errors."
)]
pub struct Options {
    /// Path to the source header file to process (generally `imgui.h`).
    pub src: PathBuf,
    /// Path to output files (generally `cimgui`), without extension — `<output>.h`,
    /// `<output>.cpp` and `<output>.json` are written.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Path to the implementation template directory.
    #[arg(short, long)]
    pub templatedir: Option<PathBuf>,
    /// Convert by-value struct arguments to pointers (for other language bindings).
    #[arg(long)]
    pub nopassingstructsbyvalue: bool,
    /// Do not generate function variants with implied default values.
    #[arg(long)]
    pub nogeneratedefaultargfunctions: bool,
    /// Generate variants of variadic functions with an explicit argument list.
    #[arg(long)]
    pub generateexplodedvarargsfunctions: bool,
    /// Generate unformatted variants of format-string-supporting functions.
    #[arg(long)]
    pub generateunformattedfunctions: bool,
    /// Indicates that the header being processed is a backend header (experimental).
    #[arg(long)]
    pub backend: bool,
    /// Path to ImGui headers to use in emitted include files, with a trailing slash.
    #[arg(long, default_value = "")]
    pub imgui_include_dir: String,
    /// Path to an additional header to read configuration defines from (repeatable).
    #[arg(long)]
    pub config_include: Vec<PathBuf>,
}

/// Top-level error for the CLI shell: either a conversion failure from the core
/// (exit code 1) or a parameter/template problem (exit code 2), matching spec.md §6.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Conversion(#[from] BindgenError),
    #[error("{0:#}")]
    Parameter(anyhow::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Conversion(_) => 1,
            CliError::Parameter(_) => 2,
        }
    }
}

/// Runs one conversion according to `options`, printing progress to `progress` the
/// same way the original script prints to stdout, and returns the three rendered
/// artifacts without writing them (the caller — [`write_outputs`] normally — decides
/// where they land). Kept separate from `write_outputs` so tests can assert on the
/// rendered text without touching a temp directory.
pub fn run(options: &Options, mut progress: impl FnMut(&str)) -> Result<cbind::ConversionOutput, CliError> {
    let src_path = fs::canonicalize(&options.src).map_err(|e| CliError::Parameter(anyhow::anyhow!("{}: {e}", options.src.display())))?;

    let mut config_include_files = Vec::new();
    if let Some(dir) = src_path.parent() {
        let imconfig = dir.join("imconfig.h");
        if imconfig.is_file() {
            config_include_files.push(imconfig);
        }
    }
    for path in &options.config_include {
        config_include_files.push(fs::canonicalize(path).map_err(|e| CliError::Parameter(anyhow::anyhow!("{}: {e}", path.display())))?);
    }

    progress(&format!("Parsing {}", src_path.display()));
    let main_source = fs::read_to_string(&src_path).map_err(|e| CliError::Parameter(anyhow::Error::new(e).context(format!("reading {}", src_path.display()))))?;
    let main_file_name = src_path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();

    let mut config_sources = Vec::new();
    for path in &config_include_files {
        progress(&format!("Parsing {}", path.display()));
        let text = fs::read_to_string(path).map_err(|e| CliError::Parameter(anyhow::Error::new(e).context(format!("reading {}", path.display()))))?;
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();
        config_sources.push((name, text));
    }

    let dest_base = options.output.file_name().and_then(|n| n.to_str()).unwrap_or("").to_string();
    let is_internal = dest_base.ends_with("_internal");

    let pipeline = defaults::default_pipeline_config(&DefaultsInput {
        is_backend: options.backend,
        is_internal,
        pass_structs_by_value: !options.nopassingstructsbyvalue,
        generate_default_arg_functions: !options.nogeneratedefaultargfunctions,
        generate_exploded_varargs_functions: options.generateexplodedvarargsfunctions,
        generate_unformatted_functions: options.generateunformattedfunctions,
    });

    let original_header_include = format!("{}{}", options.imgui_include_dir, main_file_name);
    let emit = defaults::default_emit_config(&dest_base, &original_header_include, &options.imgui_include_dir, !options.backend);

    progress("Storing unmodified DOM");
    progress("Applying modifiers");

    let main = HeaderSource { file_name: &main_file_name, source: &main_source };
    let config_headers: Vec<HeaderSource> = config_sources.iter().map(|(name, text)| HeaderSource { file_name: name, source: text }).collect();

    let output = cbind::driver::convert(main, &config_headers, &pipeline, emit)?;

    progress(&format!("Writing output to {}[.h/.cpp/.json]", options.output.display()));
    Ok(output)
}

/// Writes the three artifacts `run` produced to `<output>.h`/`.cpp`/`.json`, each
/// preceded by the expanded template snippets, strictly in that order (spec.md §5:
/// on a write failure partway through, none of the three is considered valid).
pub fn write_outputs(options: &Options, template_dir: &Path, output: &cbind::ConversionOutput) -> Result<(), CliError> {
    let dest_base_no_ext = options.output.to_string_lossy().into_owned();
    let src_base = options.src.file_stem().and_then(|n| n.to_str()).unwrap_or("").to_string();
    let output_header_name = format!("{}.h", options.output.file_name().and_then(|n| n.to_str()).unwrap_or(""));
    let output_header_name_no_internal = output_header_name.strip_suffix("_internal.h").map(|s| format!("{s}.h")).unwrap_or(output_header_name.clone());

    let expansions = TemplateExpansions {
        imgui_include_dir: &options.imgui_include_dir,
        output_header_name: &output_header_name,
        output_header_name_no_internal: &output_header_name_no_internal,
    };

    let header_prefix = templates::expand_header_templates(template_dir, &src_base, ".h", &expansions);
    let impl_prefix = templates::expand_header_templates(template_dir, &src_base, ".cpp", &expansions);

    fs::write(format!("{dest_base_no_ext}.h"), header_prefix + &output.header)
        .map_err(|e| CliError::Parameter(anyhow::Error::new(e).context("writing .h output")))?;
    fs::write(format!("{dest_base_no_ext}.cpp"), impl_prefix + &output.implementation)
        .map_err(|e| CliError::Parameter(anyhow::Error::new(e).context("writing .cpp output")))?;
    let json_text = serde_json::to_string_pretty(&output.metadata).context("serializing metadata").map_err(CliError::Parameter)?;
    fs::write(format!("{dest_base_no_ext}.json"), json_text).map_err(|e| CliError::Parameter(anyhow::Error::new(e).context("writing .json output")))?;

    Ok(())
}

/// Resolves the template directory to use: the `--templatedir` the caller passed, or
/// the directory bundled alongside this binary's source (`templates/` next to
/// `Cargo.toml`), matching the original's fallback to a default next to the script.
pub fn resolve_template_dir(options: &Options) -> PathBuf {
    options.templatedir.clone().unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates"))
}
