//! Renders the C++ bridge implementation: one function body per declaration in the
//! main header, each forwarding to the original C++ entry point it was derived from.
//! A member function calls through its leading `self` parameter; a constructor heap
//! allocates with `new` and returns the pointer; a destructor calls `delete self`; a
//! free or namespaced function is called by its bare name under the `using namespace`
//! directives this file opens with. A function tagged `is_manual` has no original
//! entry point to forward to, so its body comes verbatim from
//! [`EmitConfig::manual_bodies`] instead of being derived here.

use super::{effective_return_type, all_headers};
use crate::config::EmitConfig;
use crate::dom::{Dom, MemberFunctionKind, NodeId, NodeKind};
use crate::error::EmitError;
use std::io::Write;

pub fn write(dom: &Dom, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    write_includes(out, config)?;
    for ns in &config.using_namespaces {
        writeln!(out, "using namespace {ns};")?;
    }
    if !config.using_namespaces.is_empty() {
        writeln!(out)?;
    }

    for header in all_headers(dom) {
        render_siblings(dom, header, out, config)?;
    }
    Ok(())
}

fn write_includes(out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    match &config.imgui_include_dir {
        Some(dir) => writeln!(out, "#include \"{dir}/{}\"", config.original_header_include)?,
        None => writeln!(out, "#include \"{}\"", config.original_header_include)?,
    }
    writeln!(out, "#include \"{}.h\"", config.output_base_name)?;
    writeln!(out)?;
    Ok(())
}

fn render_siblings(dom: &Dom, parent: NodeId, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    for &child in dom.get(parent).children() {
        render_node(dom, child, out, config)?;
    }
    Ok(())
}

fn render_node(dom: &Dom, id: NodeId, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    match &dom.get(id).kind {
        NodeKind::HeaderFile { .. } | NodeKind::Namespace { .. } | NodeKind::PreprocessorConditional { .. } => {
            render_siblings(dom, id, out, config)?;
        }
        NodeKind::FunctionDeclaration { is_manual, .. } if *is_manual => render_manual(dom, id, out, config)?,
        NodeKind::FunctionDeclaration { .. } => render_bridge(dom, id, out)?,
        _ => {}
    }
    Ok(())
}

fn render_manual(dom: &Dom, id: NodeId, out: &mut dyn Write, config: &EmitConfig) -> Result<(), EmitError> {
    let NodeKind::FunctionDeclaration { name, .. } = &dom.get(id).kind else { return Ok(()) };
    let prototype = prototype_text(dom, id);
    match config.manual_bodies.get(name) {
        Some(body) => {
            writeln!(out, "{prototype}")?;
            writeln!(out, "{body}")?;
        }
        None => {
            writeln!(out, "{prototype}")?;
            writeln!(out, "{{")?;
            writeln!(out, "    // no hand-written body supplied for {name}")?;
            writeln!(out, "}}")?;
        }
    }
    writeln!(out)?;
    Ok(())
}

fn render_bridge(dom: &Dom, id: NodeId, out: &mut dyn Write) -> Result<(), EmitError> {
    let NodeKind::FunctionDeclaration { member_kind, owning_class, original_name, is_variadic, .. } = &dom.get(id).kind else {
        return Ok(());
    };

    let prototype = prototype_text(dom, id);
    writeln!(out, "{prototype}")?;
    writeln!(out, "{{")?;

    let params: Vec<NodeId> = dom.get(id).children().to_vec();
    // Constructors take no `self` (they produce the instance); every other member
    // function keeps the leading `self` parameter class_functions::flatten gave it.
    let takes_self = owning_class.is_some() && !matches!(member_kind, Some(MemberFunctionKind::Constructor));

    let (self_param, rest): (Option<NodeId>, &[NodeId]) = if takes_self && !params.is_empty() {
        (Some(params[0]), &params[1..])
    } else {
        (None, &params[..])
    };

    let call_args: Vec<String> = rest
        .iter()
        .map(|&p| match &dom.get(p).kind {
            NodeKind::FunctionParameter { name, param_type, is_varargs, .. } => {
                if *is_varargs {
                    "args".to_string()
                } else if param_type.was_reference {
                    format!("*{name}")
                } else if param_type.was_value_struct {
                    format!("*{name}")
                } else {
                    name.clone()
                }
            }
            _ => String::new(),
        })
        .collect();
    let call_args = if *is_variadic {
        let mut v = call_args;
        v.push("args".to_string());
        v.join(", ")
    } else {
        call_args.join(", ")
    };

    match member_kind {
        Some(MemberFunctionKind::Constructor) => {
            let class_name = original_name;
            writeln!(out, "    return new {class_name}({call_args});")?;
        }
        Some(MemberFunctionKind::Destructor) => {
            if let Some(self_id) = self_param {
                let NodeKind::FunctionParameter { name: self_name, .. } = &dom.get(self_id).kind else { unreachable!() };
                writeln!(out, "    delete {self_name};")?;
            }
        }
        Some(MemberFunctionKind::Ordinary) => {
            let self_name = match self_param {
                Some(self_id) => match &dom.get(self_id).kind {
                    NodeKind::FunctionParameter { name, .. } => name.clone(),
                    _ => "self".to_string(),
                },
                None => "self".to_string(),
            };
            let ret = effective_return_type(&dom.get(id).kind);
            let call = format!("{self_name}->{original_name}({call_args})");
            if ret.render() == "void" {
                writeln!(out, "    {call};")?;
            } else {
                writeln!(out, "    return {call};")?;
            }
        }
        None => {
            let ret = effective_return_type(&dom.get(id).kind);
            let call = format!("{original_name}({call_args})");
            if ret.render() == "void" {
                writeln!(out, "    {call};")?;
            } else {
                writeln!(out, "    return {call};")?;
            }
        }
    }
    writeln!(out, "}}")?;
    writeln!(out)?;
    Ok(())
}

fn prototype_text(dom: &Dom, id: NodeId) -> String {
    let NodeKind::FunctionDeclaration { name, is_variadic, .. } = &dom.get(id).kind else { return String::new() };
    let ret = effective_return_type(&dom.get(id).kind);
    let params = dom.get(id).children().to_vec();
    let mut rendered: Vec<String> = params
        .iter()
        .filter_map(|&p| match &dom.get(p).kind {
            NodeKind::FunctionParameter { is_varargs: true, .. } => None,
            NodeKind::FunctionParameter { param_type, name, .. } => Some(param_type.render_declarator(name)),
            _ => None,
        })
        .collect();
    if *is_variadic {
        rendered.push("...".to_string());
    }
    let params_text = if rendered.is_empty() { "void".to_string() } else { rendered.join(", ") };
    format!("{} {name}({params_text})", ret.render())
}
