//! Renders the finished main header as plain C: `#include`s, forward declarations,
//! `#define`s, typedefs, structs, enums, and function prototypes, each preceded by its
//! attached comment, functions prefixed with the configured export macro, the whole
//! thing wrapped in `extern "C"` by the [`extern_c`](crate::modifiers::extern_c)
//! modifier rather than by this emitter. Declarations are written in the order they
//! appear in the DOM — the modifier pipeline is what puts includes first, forward
//! declarations right after, and so on — so this module does no regrouping of its own.

use super::{effective_return_type, main_header};
use crate::config::EmitConfig;
use crate::dom::{ClassKind, Dom, EnumValue, NodeId, NodeKind};
use crate::error::EmitError;
use std::io::Write;

pub fn write(dom: &Dom, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    let header = main_header(dom)?;
    render_siblings(dom, header, out, config)
}

fn render_siblings(dom: &Dom, parent: NodeId, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    for &child in dom.get(parent).children() {
        render_node(dom, child, out, config)?;
    }
    Ok(())
}

fn render_node(dom: &Dom, id: NodeId, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    let node = dom.get(id);
    for comment in &node.common.leading_comments {
        writeln!(out, "// {comment}")?;
    }

    match &node.kind {
        NodeKind::HeaderFile { .. } | NodeKind::HeaderFileSet | NodeKind::Namespace { .. } => {
            render_siblings(dom, id, out, config)?;
        }
        NodeKind::Include { path, is_system } => {
            if *is_system {
                writeln!(out, "#include <{path}>")?;
            } else {
                writeln!(out, "#include \"{path}\"")?;
            }
        }
        NodeKind::Pragma { text } => writeln!(out, "#pragma {text}")?,
        NodeKind::Define { name, value, is_function_like, parameters, .. } => {
            if *is_function_like {
                writeln!(out, "#define {name}({}) {value}", parameters.join(", "))?;
            } else if value.is_empty() {
                writeln!(out, "#define {name}")?;
            } else {
                writeln!(out, "#define {name} {value}")?;
            }
        }
        NodeKind::PreprocessorConditional { expression, negated, .. } => {
            if *negated {
                writeln!(out, "#if !{expression}")?;
            } else {
                writeln!(out, "#if {expression}")?;
            }
            render_siblings(dom, id, out, config)?;
            writeln!(out, "#endif")?;
        }
        NodeKind::ClassStructUnion { name, kind, is_forward_declaration, .. } => {
            let keyword = struct_keyword(*kind);
            if *is_forward_declaration {
                writeln!(out, "typedef {keyword} {name} {name};")?;
            } else {
                writeln!(out, "typedef {keyword} {name}")?;
                writeln!(out, "{{")?;
                for &field in dom.get(id).children() {
                    render_field(dom, field, out)?;
                }
                writeln!(out, "}} {name};")?;
            }
        }
        NodeKind::EnumElement { name, is_flag_enum, underlying_type } => {
            match underlying_type {
                Some(ty) => writeln!(out, "typedef enum {name} : {}", ty.render())?,
                None => writeln!(out, "typedef enum {name}")?,
            }
            writeln!(out, "{{")?;
            let entries = dom.get(id).children().to_vec();
            for (idx, &entry) in entries.iter().enumerate() {
                let comma = if idx + 1 < entries.len() { "," } else { "" };
                render_enum_entry(dom, entry, *is_flag_enum, comma, out)?;
            }
            writeln!(out, "}} {name};")?;
        }
        NodeKind::FieldDeclaration { .. } => render_field(dom, id, out)?,
        NodeKind::FunctionDeclaration { name, is_variadic, .. } => {
            let ret = effective_return_type(&node.kind);
            let params = render_params(dom, id, *is_variadic);
            let macro_prefix = if config.api_macro.is_empty() { String::new() } else { format!("{} ", config.api_macro) };
            writeln!(out, "{macro_prefix}{} {name}({params});", ret.render())?;
        }
        NodeKind::Typedef { name, aliased_type } => {
            writeln!(out, "typedef {};", aliased_type.render_declarator(name))?;
        }
        NodeKind::TemplateDeclaration { .. } | NodeKind::TypeNode { .. } | NodeKind::FunctionParameter { .. } => {
            // Templates are fully flattened before emission; a surviving one (or a
            // bare type/parameter node reached directly, which shouldn't happen at
            // this level) has nothing sensible to print.
        }
        NodeKind::Comment { text, .. } => writeln!(out, "// {text}")?,
        NodeKind::BlankLines { count } => {
            for _ in 0..*count {
                writeln!(out)?;
            }
        }
        NodeKind::Code { text } => writeln!(out, "{text}")?,
    }

    for comment in &node.common.trailing_comments {
        writeln!(out, " // {comment}")?;
    }
    Ok(())
}

fn struct_keyword(kind: ClassKind) -> &'static str {
    match kind {
        ClassKind::Struct => "struct",
        ClassKind::Class => "struct",
        ClassKind::Union => "union",
    }
}

fn render_field(dom: &Dom, id: NodeId, out: &mut dyn Write) -> Result<(), EmitError> {
    let NodeKind::FieldDeclaration { field_type, names, bitfield_width, is_static, is_extern, .. } = &dom.get(id).kind else {
        return Ok(());
    };
    let prefix = if *is_static { "static " } else if *is_extern { "extern " } else { "" };
    for comment in &dom.get(id).common.leading_comments {
        writeln!(out, "    // {comment}")?;
    }
    for name in names {
        let decl = field_type.render_declarator(name);
        match bitfield_width {
            Some(width) => writeln!(out, "    {prefix}{decl} : {width};")?,
            None => writeln!(out, "    {prefix}{decl};")?,
        }
    }
    Ok(())
}

fn render_enum_entry(dom: &Dom, id: NodeId, is_flag_enum: bool, comma: &str, out: &mut dyn Write) -> Result<(), EmitError> {
    let NodeKind::EnumEntry { name, value, .. } = &dom.get(id).kind else { return Ok(()) };
    let rendered = match value {
        Some(EnumValue::Literal(n)) if is_flag_enum => format!("0x{:08X}", *n as u32),
        Some(EnumValue::Literal(n)) => n.to_string(),
        Some(EnumValue::Expression(e)) => e.clone(),
        None => "0".to_string(),
    };
    writeln!(out, "    {name} = {rendered}{comma}")?;
    Ok(())
}

fn render_params(dom: &Dom, func_id: NodeId, is_variadic: bool) -> String {
    let params = dom.get(func_id).children().to_vec();
    if params.is_empty() && !is_variadic {
        return "void".to_string();
    }
    params
        .iter()
        .map(|&p| match &dom.get(p).kind {
            NodeKind::FunctionParameter { is_varargs: true, .. } => "...".to_string(),
            NodeKind::FunctionParameter { param_type, name, .. } => param_type.render_declarator(name),
            _ => String::new(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Accessibility, PointerKind, Type};

    fn single_header_dom() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let root = dom.set_root(NodeKind::HeaderFileSet);
        let header = dom.append_child(root, NodeKind::HeaderFile { original_file_name: "t.h".into() });
        (dom, root, header)
    }

    #[test]
    fn renders_a_struct_and_member_bridge() {
        let (mut dom, _root, header) = single_header_dom();
        dom.append_child(
            header,
            NodeKind::ClassStructUnion {
                name: "S".into(),
                kind: ClassKind::Struct,
                is_anonymous: false,
                is_by_value_marked: false,
                base_list: vec![],
                is_forward_declaration: true,
            },
        );
        let func = dom.append_child(
            header,
            NodeKind::FunctionDeclaration {
                return_type: Type::named("void"),
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
        dom.append_child(
            func,
            NodeKind::FunctionParameter {
                param_type: Type { base_name: "S".into(), pointer_chain: vec![PointerKind::Pointer], ..Default::default() },
                name: "self".into(),
                default_value: None,
                is_varargs: false,
            },
        );

        let mut buf = Vec::new();
        let config = EmitConfig { api_macro: "CIMGUI_API".into(), ..Default::default() };
        write(&dom, &mut buf, &config).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("typedef struct S S;"));
        assert!(text.contains("CIMGUI_API void S_Bar(S* self);"));
    }

    #[test]
    fn renders_a_hex_flag_enum_and_a_decimal_enum() {
        let (mut dom, _root, header) = single_header_dom();
        let flags = dom.append_child(
            header,
            NodeKind::EnumElement { name: "FooFlags_".into(), is_flag_enum: true, underlying_type: None },
        );
        dom.append_child(flags, NodeKind::EnumEntry { name: "FooFlags_None".into(), value: Some(EnumValue::Literal(0)), is_internal: false, is_count: false });
        dom.append_child(flags, NodeKind::EnumEntry { name: "FooFlags_A".into(), value: Some(EnumValue::Literal(1)), is_internal: false, is_count: false });

        let mut buf = Vec::new();
        write(&dom, &mut buf, &EmitConfig::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("FooFlags_A = 0x00000001"));
    }

    #[test]
    fn renders_void_for_an_empty_non_variadic_parameter_list() {
        let (mut dom, _root, header) = single_header_dom();
        dom.append_child(
            header,
            NodeKind::FunctionDeclaration {
                return_type: Type::named("void"),
                name: "Foo".into(),
                is_member: false,
                member_kind: None,
                is_operator: false,
                is_constexpr: false,
                is_variadic: false,
                owning_class: None,
                original_name: "Foo".into(),
                accessibility: Accessibility::Public,
                is_internal: false,
                is_manual: false,
                is_default_helper: false,
            },
        );
        let mut buf = Vec::new();
        write(&dom, &mut buf, &EmitConfig::default()).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("void Foo(void);"));
    }
}
