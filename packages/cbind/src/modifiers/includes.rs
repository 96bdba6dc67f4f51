//! Adding/removing/rewriting `#include` directives, and injecting the raw forward
//! declarations an emitter must treat as an in-library type (e.g. the `ImDrawData`
//! forward declaration a back-end header needs so the generator knows it is a
//! reference/pointer-bearing library type rather than an opaque unknown one).

use crate::dom::{Dom, NodeId, NodeKind};

/// Adds one `Include` node per path for every `HeaderFile` in the set, inserted after
/// any includes already present (so repeated calls accumulate in call order).
pub fn add_includes(dom: &mut Dom, paths: &[(&str, bool)]) {
    for header in header_files(dom) {
        let insert_at = dom
            .get(header)
            .children()
            .iter()
            .position(|&c| !matches!(dom.get(c).kind, NodeKind::Include { .. }))
            .unwrap_or(dom.get(header).children().len());
        let mut at = insert_at;
        for &(path, is_system) in paths {
            dom.insert_child(header, at, NodeKind::Include { path: path.to_string(), is_system });
            at += 1;
        }
    }
}

/// Removes every `Include` node whose path is in `paths`, from every `HeaderFile`.
pub fn remove_includes(dom: &mut Dom, paths: &[&str]) {
    for header in header_files(dom) {
        for child in dom.get(header).children().to_vec() {
            if let NodeKind::Include { path, .. } = &dom.get(child).kind {
                if paths.contains(&path.as_str()) {
                    dom.remove_child(header, child);
                }
            }
        }
    }
}

/// Rewrites `Include` paths found in `renames` (old path -> new path) in place,
/// e.g. `"imgui.h"` -> `"cimgui.h"` when generating a back-end.
pub fn change_includes(dom: &mut Dom, renames: &[(&str, &str)]) {
    for id in dom.collect_preorder(dom.root()) {
        if let NodeKind::Include { path, .. } = &dom.get(id).kind {
            if let Some(&(_, new)) = renames.iter().find(|(old, _)| old == path) {
                let new = new.to_string();
                if let NodeKind::Include { path, .. } = &mut dom.get_mut(id).kind {
                    *path = new;
                }
            }
        }
    }
}

/// Injects raw passthrough declarations (e.g. `"struct ImDrawData;"`) at the top of
/// every `HeaderFile`, after its includes. These are not reparsed; they are emitted
/// verbatim by every writer that walks `Code` nodes.
pub fn add_forward_declarations(dom: &mut Dom, declarations: &[&str]) {
    for header in header_files(dom) {
        let insert_at = dom
            .get(header)
            .children()
            .iter()
            .position(|&c| !matches!(dom.get(c).kind, NodeKind::Include { .. }))
            .unwrap_or(dom.get(header).children().len());
        let mut at = insert_at;
        for &text in declarations {
            dom.insert_child(header, at, NodeKind::Code { text: text.to_string() });
            at += 1;
        }
    }
}

fn header_files(dom: &Dom) -> Vec<NodeId> {
    dom.collect_preorder(dom.root())
        .into_iter()
        .filter(|&id| matches!(dom.get(id).kind, NodeKind::HeaderFile { .. }))
        .collect()
}
