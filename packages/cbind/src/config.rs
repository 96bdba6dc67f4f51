//! Caller-supplied options threaded through the modifier pipeline and the emitters.
//!
//! The original tool accumulated these as loose keyword arguments and ad-hoc
//! dictionaries; here they are collected into two plain structs so every modifier's
//! free function takes `&PipelineConfig` rather than guessing which subset of a grab
//! bag it needs.

use indexmap::{IndexMap, IndexSet};

/// A hand-written function declaration injected by the `manual` modifier — one that
/// has no corresponding C++ declaration to derive a bridge from.
#[derive(Debug, Clone)]
pub struct ManualFunction {
    /// The full C declaration text, e.g. `"ImVector_int ImVector_int_create(void)"`.
    pub signature: String,
    pub comment: Option<String>,
    /// A preprocessor expression this declaration should be guarded by, if any.
    pub guard: Option<String>,
    /// The hand-written C++ implementation body, braces included. No mechanical
    /// bridge can be derived for a manual function, so the caller supplies this
    /// verbatim for the C++ implementation emitter; `None` emits a stub comment
    /// instead of inventing a body.
    pub body: Option<String>,
}

/// Options for every modifier in the pipeline. Populated once by the CLI shell (or by
/// a test) and passed by shared reference to each modifier in turn; no modifier
/// mutates it.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// System/local includes to add to every main header, e.g. `[("stdbool.h", true),
    /// ("stdint.h", true)]`.
    pub add_includes: Vec<(String, bool)>,
    /// Include paths to drop outright because C has no use for them.
    pub remove_includes: IndexSet<String>,
    /// Include path rewrites, e.g. `"imgui.h" -> "cimgui.h"` when producing a
    /// back-end header.
    pub change_includes: IndexMap<String, String>,
    /// Raw passthrough forward declarations to inject at the top of every header,
    /// e.g. `"struct ImDrawData;"` for a back-end header referencing a type the main
    /// output owns.
    pub forward_declarations: Vec<String>,
    /// Fully qualified struct names to remove outright.
    pub remove_struct_names: IndexSet<String>,
    /// Class names whose member functions should all be removed.
    pub remove_function_owner_classes: IndexSet<String>,
    /// Fully qualified function names to remove outright.
    pub remove_function_names: IndexSet<String>,
    /// Typedef names to remove outright.
    pub remove_typedef_names: IndexSet<String>,
    /// `(function name, distinguishing parameter name, new name)` triples resolved by
    /// [`modifiers::rename::rename_function_by_signature`](crate::modifiers::rename::rename_function_by_signature)
    /// before the general disambiguation pass runs, for an overload pair the
    /// type-suffix algorithm can't tell apart (e.g. two parameters of the same type
    /// with different argument names).
    pub rename_by_signature: Vec<(String, String, String)>,
    /// `{namespace name: prefix}` for namespace flattening.
    pub namespace_prefixes: IndexMap<String, String>,
    /// Prefix applied to functions that are neither namespaced nor members.
    pub loose_function_prefix: Option<String>,
    /// Fully qualified struct names that should never be converted to pointer
    /// parameters even when `pass_structs_by_value` is false.
    pub by_value_structs: IndexSet<String>,
    /// Pre-canonicalized forms for awkward template-argument pointer shapes, e.g.
    /// `"const T**"` -> `"T* const*"`.
    pub custom_type_fudge: IndexMap<String, String>,
    /// Macro name -> assumed truth value, used by conditional flattening.
    pub conditional_flags: IndexMap<String, bool>,
    /// Inverse of `--nopassingstructsbyvalue`: when false, non-by-value-marked struct
    /// parameters are rewritten to `const T*`.
    pub pass_structs_by_value: bool,
    /// Inverse of `--nogeneratedefaultargfunctions`.
    pub generate_default_arg_functions: bool,
    pub generate_exploded_varargs_functions: bool,
    /// Number of exploded-arity companions to generate per variadic function when
    /// [`generate_exploded_varargs_functions`](Self::generate_exploded_varargs_functions)
    /// is set.
    pub exploded_varargs_max_args: u32,
    pub generate_unformatted_functions: bool,
    /// Fully qualified variadic function names to skip when generating the
    /// unformatted companion.
    pub unformatted_ignore: IndexSet<String>,
    /// Fully qualified function names to skip during default-argument wrapper
    /// generation even though they have defaulted trailing parameters.
    pub default_arg_ignore: IndexSet<String>,
    /// Function name prefixes (e.g. `"ImGuiStorage_"`) to skip during default-argument
    /// wrapper generation, matched against the fully qualified name the same way
    /// `default_arg_ignore` matches exact names.
    pub default_arg_ignore_prefixes: IndexSet<String>,
    pub by_value_struct_for_return: IndexSet<String>,
    /// Defaulted-parameter type names treated as non-user-facing, e.g. `ImGuiCond`. A
    /// trailing defaulted parameter of one of these types doesn't by itself force the
    /// bare companion to keep it, so the wrapper pair is generated where it otherwise
    /// would have been collapsed to a single declaration.
    pub trivial_argument_types: IndexSet<String>,
    /// Defaulted-parameter names treated as non-user-facing, e.g. `flags`. Same effect
    /// as `trivial_argument_types`, matched against the parameter's name instead.
    pub trivial_argument_names: IndexSet<String>,
    /// Parameter type -> suffix used by disambiguation, e.g. `"const char*" -> "Str"`.
    pub disambiguate_type_suffixes: IndexMap<String, String>,
    /// Fully qualified overload-set names exempt from disambiguation because the
    /// apparent clash is actually resolved by preprocessor conditionals.
    pub disambiguate_ignore: IndexSet<String>,
    /// Overload-set names where every member must carry a suffix, with no bare form
    /// kept for the "primary" overload.
    pub disambiguate_rename_everything: IndexSet<String>,
    /// Per-function override of the suffix used for the `va_list` companion of a
    /// variadic function, keyed by the function's (pre-disambiguation) name. Default
    /// suffix absent an override is `"V"`.
    pub custom_varargs_list_suffixes: IndexMap<String, String>,
    /// The export macro prepended to every function declaration (`CIMGUI_API` in the
    /// original).
    pub api_macro: String,
    /// An old-macro-name -> new-macro-name rewrite applied to any occurrence of the
    /// old macro found in the source (`IMGUI_API` -> `CIMGUI_API` in the original).
    pub api_macro_rename: Option<(String, String)>,
    pub manual_functions: Vec<ManualFunction>,
    /// Fully qualified function name -> trailing comment note to attach.
    pub function_comments: IndexMap<String, String>,
    /// A flat old-name -> new-name rename pass, applied after disambiguation.
    pub rename_map: IndexMap<String, String>,
    /// Fully qualified `#define` names to omit from JSON metadata.
    pub excluded_metadata_defines: IndexSet<String>,
    /// Whether the header being processed is a back-end/internal header rather than
    /// the main API header; several passes are best-effort in this mode.
    pub is_backend_header: bool,
    /// Type names to relocate from a configuration header's DOM into the main
    /// header's DOM.
    pub move_types: IndexSet<String>,
}

/// Options consumed by the three emitters.
#[derive(Debug, Clone, Default)]
pub struct EmitConfig {
    /// Output base name without extension, e.g. `"cimgui"`.
    pub output_base_name: String,
    /// Prefix inserted into emitted `#include` paths for the original C++ header.
    pub imgui_include_dir: Option<String>,
    /// Path (relative to `imgui_include_dir`) of the original C++ header the
    /// implementation file must `#include`.
    pub original_header_include: String,
    /// Whether to wrap the C header's declarations in `extern "C"` guards.
    pub wrap_extern_c: bool,
    /// The export macro prepended to every emitted function declaration, mirrored
    /// from [`PipelineConfig::api_macro`] by the driver so the emitters don't need
    /// the pipeline config just to print a prototype.
    pub api_macro: String,
    /// `using namespace N;` directives the C++ implementation file opens with, so
    /// bridge bodies can call an original namespaced entry point by its bare name.
    /// Mirrored from [`PipelineConfig::namespace_prefixes`]'s keys by the driver.
    pub using_namespaces: Vec<String>,
    /// Function name -> hand-written body, mirrored from the `manual` modifier's
    /// input so the C++ implementation emitter can print a manual function's body
    /// without the pipeline config in scope.
    pub manual_bodies: IndexMap<String, String>,
}
