//! Renders the finished `HeaderFileSet` (main header plus every configuration header,
//! so a `#define` that only lives in `imconfig.h` is still reported) as a single JSON
//! document: one array each for defines, enums, typedefs, structs, and functions.
//! Every entry reports both its post-transformation name and (via
//! [`NodeCommon::unmodified_name`](crate::dom::NodeCommon)) its pre-transformation
//! name, so a downstream binding generator can reconcile a renamed/flattened/
//! disambiguated declaration with the identifier a user's existing code might still
//! reference.

use super::conditional_context_strings;
use crate::config::EmitConfig;
use crate::dom::{ClassKind, Dom, EnumValue, NodeId, NodeKind, Type};
use crate::error::EmitError;
use crate::position::Position;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Serialize, Default)]
pub struct Comments {
    pub preceding: Vec<String>,
    pub trailing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl From<Position> for Location {
    fn from(position: Position) -> Self {
        Self { line: position.line, column: position.column }
    }
}

/// A `Type` split into the semantic pieces a binding generator needs rather than one
/// rendered string: base name, const/volatile, pointer depth, the reference-converted
/// flag the emitter needs to know to dereference at the bridge, array dimensions, and
/// (recursively) template arguments.
#[derive(Debug, Clone, Serialize)]
pub struct TypeMeta {
    pub base_name: String,
    pub is_const: bool,
    pub is_volatile: bool,
    pub pointer_depth: usize,
    pub was_reference: bool,
    pub was_value_struct: bool,
    pub array_dims: Vec<Option<u64>>,
    pub template_args: Vec<TypeMeta>,
    pub is_function_pointer: bool,
    /// The same rendering the C emitters use, included so a consumer that doesn't
    /// want to reassemble the split-out pieces can just use this directly.
    pub rendered: String,
}

impl From<&Type> for TypeMeta {
    fn from(ty: &Type) -> Self {
        Self {
            base_name: ty.base_name.clone(),
            is_const: ty.qualifiers.contains(&crate::dom::Qualifier::Const),
            is_volatile: ty.qualifiers.contains(&crate::dom::Qualifier::Volatile),
            pointer_depth: ty.pointer_chain.len(),
            was_reference: ty.was_reference,
            was_value_struct: ty.was_value_struct,
            array_dims: ty.array_dims.clone(),
            template_args: ty.template_args.iter().map(TypeMeta::from).collect(),
            is_function_pointer: ty.function_pointer.is_some(),
            rendered: ty.render(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DefineMeta {
    pub name: String,
    pub original_name: Option<String>,
    pub value: String,
    pub is_function_like: bool,
    pub parameters: Vec<String>,
    pub comments: Comments,
    pub conditionals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumEntryMeta {
    pub name: String,
    pub original_name: Option<String>,
    pub value: i64,
    /// The unresolved expression text instead of `value`, for an entry whose value
    /// could not be reduced to a literal by [`modifiers::enums::calculate_values`].
    pub expression: Option<String>,
    pub is_internal: bool,
    pub is_count: bool,
    pub comments: Comments,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnumMeta {
    pub name: String,
    pub original_name: Option<String>,
    pub is_flags: bool,
    pub entries: Vec<EnumEntryMeta>,
    pub comments: Comments,
    pub conditionals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TypedefMeta {
    pub name: String,
    pub original_name: Option<String>,
    pub aliased_type: TypeMeta,
    pub comments: Comments,
    pub conditionals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldMeta {
    pub names: Vec<String>,
    pub field_type: TypeMeta,
    pub bitfield_width: Option<u32>,
    pub is_static: bool,
    pub is_extern: bool,
    pub is_internal: bool,
    pub comments: Comments,
}

#[derive(Debug, Clone, Serialize)]
pub struct StructMeta {
    pub name: String,
    pub original_name: Option<String>,
    pub kind: String,
    pub is_forward_declaration: bool,
    pub is_by_value: bool,
    pub fields: Vec<FieldMeta>,
    pub comments: Comments,
    pub conditionals: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArgMeta {
    pub name: String,
    #[serde(rename = "type")]
    pub arg_type: TypeMeta,
    pub default_value: Option<String>,
    pub is_varargs: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionMeta {
    pub name: String,
    pub original_name: String,
    pub return_type: TypeMeta,
    pub args: Vec<ArgMeta>,
    pub is_variadic: bool,
    pub is_member: bool,
    pub owning_class: Option<String>,
    pub is_internal: bool,
    pub is_manual: bool,
    pub is_default_helper: bool,
    pub comments: Comments,
    pub conditionals: Vec<String>,
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct Metadata {
    pub defines: Vec<DefineMeta>,
    pub enums: Vec<EnumMeta>,
    pub typedefs: Vec<TypedefMeta>,
    pub structs: Vec<StructMeta>,
    pub functions: Vec<FunctionMeta>,
}

fn comments_of(dom: &Dom, id: NodeId) -> Comments {
    let node = dom.get(id);
    Comments { preceding: node.common.leading_comments.clone(), trailing: node.common.trailing_comments.clone() }
}

/// Builds the full metadata document from every `HeaderFile` under the set root
/// (`dom.root()` may itself already be a lone `HeaderFile`, in which case this is
/// just that one file's declarations).
pub fn build(dom: &Dom, config: &EmitConfig) -> Metadata {
    let mut meta = Metadata::default();
    for id in dom.collect_preorder(dom.root()) {
        match &dom.get(id).kind {
            NodeKind::Define { name, value, is_function_like, parameters, excluded_from_metadata } => {
                if *excluded_from_metadata {
                    continue;
                }
                meta.defines.push(DefineMeta {
                    name: name.clone(),
                    original_name: dom.get(id).common.unmodified_name.clone(),
                    value: value.clone(),
                    is_function_like: *is_function_like,
                    parameters: parameters.clone(),
                    comments: comments_of(dom, id),
                    conditionals: conditional_context_strings(dom, id),
                });
            }
            NodeKind::EnumElement { name, is_flag_enum, .. } => {
                // `calculate_values` (modifiers::enums) has already run by the time
                // metadata is built, so every entry is `Some`; an `Expression` here is
                // one it genuinely could not reduce to a literal (an operator it
                // doesn't evaluate, or a reference outside this enum). `running` falls
                // back to the same previous-plus-one count the modifier itself used
                // for such entries, rather than fabricating an unrelated number.
                let mut running = 0i64;
                let entries = dom
                    .get(id)
                    .children()
                    .iter()
                    .filter_map(|&entry_id| match &dom.get(entry_id).kind {
                        NodeKind::EnumEntry { name, value, is_internal, is_count } => {
                            let (value, expression) = match value {
                                Some(EnumValue::Literal(n)) => {
                                    running = n + 1;
                                    (*n, None)
                                }
                                Some(EnumValue::Expression(e)) => {
                                    let fallback = running;
                                    running = running.wrapping_add(1);
                                    (fallback, Some(e.clone()))
                                }
                                None => {
                                    let fallback = running;
                                    running += 1;
                                    (fallback, None)
                                }
                            };
                            Some(EnumEntryMeta {
                                name: name.clone(),
                                original_name: dom.get(entry_id).common.unmodified_name.clone(),
                                value,
                                expression,
                                is_internal: *is_internal,
                                is_count: *is_count,
                                comments: comments_of(dom, entry_id),
                            })
                        }
                        _ => None,
                    })
                    .collect();
                meta.enums.push(EnumMeta {
                    name: name.clone(),
                    original_name: dom.get(id).common.unmodified_name.clone(),
                    is_flags: *is_flag_enum,
                    entries,
                    comments: comments_of(dom, id),
                    conditionals: conditional_context_strings(dom, id),
                });
            }
            NodeKind::Typedef { name, aliased_type } => {
                meta.typedefs.push(TypedefMeta {
                    name: name.clone(),
                    original_name: dom.get(id).common.unmodified_name.clone(),
                    aliased_type: TypeMeta::from(aliased_type),
                    comments: comments_of(dom, id),
                    conditionals: conditional_context_strings(dom, id),
                });
            }
            NodeKind::ClassStructUnion { name, kind, is_forward_declaration, is_by_value_marked, .. } => {
                let fields = dom
                    .get(id)
                    .children()
                    .iter()
                    .filter_map(|&field_id| match &dom.get(field_id).kind {
                        NodeKind::FieldDeclaration { field_type, names, bitfield_width, is_static, is_extern, is_internal } => {
                            Some(FieldMeta {
                                names: names.clone(),
                                field_type: TypeMeta::from(field_type),
                                bitfield_width: *bitfield_width,
                                is_static: *is_static,
                                is_extern: *is_extern,
                                is_internal: *is_internal,
                                comments: comments_of(dom, field_id),
                            })
                        }
                        _ => None,
                    })
                    .collect();
                meta.structs.push(StructMeta {
                    name: name.clone(),
                    original_name: dom.get(id).common.unmodified_name.clone(),
                    kind: class_kind_name(*kind).to_string(),
                    is_forward_declaration: *is_forward_declaration,
                    is_by_value: *is_by_value_marked,
                    fields,
                    comments: comments_of(dom, id),
                    conditionals: conditional_context_strings(dom, id),
                });
            }
            NodeKind::FunctionDeclaration {
                return_type,
                name,
                is_variadic,
                is_member,
                owning_class,
                original_name,
                is_internal,
                is_manual,
                is_default_helper,
                ..
            } => {
                let args = dom
                    .get(id)
                    .children()
                    .iter()
                    .filter_map(|&param_id| match &dom.get(param_id).kind {
                        NodeKind::FunctionParameter { param_type, name, default_value, is_varargs } => Some(ArgMeta {
                            name: name.clone(),
                            arg_type: TypeMeta::from(param_type),
                            default_value: default_value.clone(),
                            is_varargs: *is_varargs,
                        }),
                        _ => None,
                    })
                    .collect();
                meta.functions.push(FunctionMeta {
                    name: name.clone(),
                    original_name: original_name.clone(),
                    return_type: TypeMeta::from(&super::effective_return_type(&dom.get(id).kind)),
                    args,
                    is_variadic: *is_variadic,
                    is_member: *is_member,
                    owning_class: owning_class.clone(),
                    is_internal: *is_internal,
                    is_manual: *is_manual,
                    is_default_helper: *is_default_helper,
                    comments: comments_of(dom, id),
                    conditionals: conditional_context_strings(dom, id),
                    location: dom.get(id).common.source_position.map(Location::from),
                });
            }
            _ => {}
        }
    }
    let _ = config;
    meta
}

fn class_kind_name(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Class => "class",
        ClassKind::Struct => "struct",
        ClassKind::Union => "union",
    }
}

pub fn to_value(dom: &Dom, config: &EmitConfig) -> Result<serde_json::Value, EmitError> {
    Ok(serde_json::to_value(build(dom, config))?)
}

pub fn write(dom: &Dom, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    let value = to_value(dom, config)?;
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Accessibility, PointerKind};
    use crate::parser::parse_header_file;

    #[test]
    fn reports_enum_entries_with_explicit_values() {
        let (mut dom, _) = parse_header_file("enum E { A, B = 5, C };\n", "t.h").unwrap();
        crate::modifiers::enums::calculate_values(&mut dom);
        let meta = build(&dom, &EmitConfig::default());
        assert_eq!(meta.enums.len(), 1);
        let values: Vec<i64> = meta.enums[0].entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![0, 5, 6]);
    }

    #[test]
    fn excluded_defines_are_omitted() {
        let (mut dom, _) = parse_header_file("#define A 1\n#define B 2\n", "t.h").unwrap();
        let mut names = indexmap::IndexSet::new();
        names.insert("A".to_string());
        crate::modifiers::metadata::exclude_defines_from_metadata(&mut dom, &names);
        let meta = build(&dom, &EmitConfig::default());
        assert_eq!(meta.defines.len(), 1);
        assert_eq!(meta.defines[0].name, "B");
    }

    #[test]
    fn reports_a_function_with_its_original_name_and_pointer_args() {
        let mut dom = crate::dom::Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let header = dom.append_child(root, NodeKind::HeaderFile { original_file_name: "t.h".into() });
        let func = dom.append_child(
            header,
            NodeKind::FunctionDeclaration {
                return_type: crate::dom::Type::named("void"),
                name: "S_Bar".into(),
                is_member: false,
                member_kind: None,
                is_operator: false,
                is_constexpr: false,
                is_variadic: false,
                owning_class: None,
                original_name: "Bar".into(),
                accessibility: Accessibility::Public,
                is_internal: false,
                is_manual: false,
                is_default_helper: false,
            },
        );
        dom.get_mut(func).common.unmodified_name = Some("Bar".to_string());
        dom.append_child(
            func,
            NodeKind::FunctionParameter {
                param_type: crate::dom::Type { base_name: "S".into(), pointer_chain: vec![PointerKind::Pointer], ..Default::default() },
                name: "self".into(),
                default_value: None,
                is_varargs: false,
            },
        );
        let meta = build(&dom, &EmitConfig::default());
        assert_eq!(meta.functions.len(), 1);
        assert_eq!(meta.functions[0].original_name, "Bar");
        assert_eq!(meta.functions[0].args[0].arg_type.pointer_depth, 1);
    }
}
