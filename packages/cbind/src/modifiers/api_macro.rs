//! The export macro every emitted function declaration is prefixed with (`CIMGUI_API`
//! in the original tool) is applied uniformly by the C header emitter from
//! [`EmitConfig::api_macro`](crate::config::EmitConfig) rather than stored per
//! function, since every function gets the same macro. The one DOM-level concern left
//! to a modifier is rewriting any literal occurrence of an old macro name the source
//! itself defined or referenced (e.g. a `#define IMGUI_API` the caller is replacing
//! with their own).

use crate::dom::{Dom, NodeKind};

/// Replaces whole-word occurrences of `old` with `new` in every `Define` name/value
/// and raw `Code` node, so a source-level reference to the macro being replaced
/// tracks the rename.
pub fn rename_macro(dom: &mut Dom, old: &str, new: &str) {
    for id in dom.collect_preorder(dom.root()) {
        match &mut dom.get_mut(id).kind {
            NodeKind::Define { name, value, .. } => {
                if name == old {
                    *name = new.to_string();
                }
                *value = replace_whole_word(value, old, new);
            }
            NodeKind::Code { text } => {
                *text = replace_whole_word(text, old, new);
            }
            _ => {}
        }
    }
}

fn replace_whole_word(haystack: &str, old: &str, new: &str) -> String {
    let mut result = String::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(pos) = rest.find(old) {
        let before_ok = rest[..pos].chars().next_back().map_or(true, |c| !c.is_alphanumeric() && c != '_');
        let after = &rest[pos + old.len()..];
        let after_ok = after.chars().next().map_or(true, |c| !c.is_alphanumeric() && c != '_');
        result.push_str(&rest[..pos]);
        if before_ok && after_ok {
            result.push_str(new);
        } else {
            result.push_str(old);
        }
        rest = after;
    }
    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_header_file;

    #[test]
    fn renames_a_whole_word_macro_reference() {
        let (mut dom, root) = parse_header_file("#define IMGUI_API extern\n", "t.h").unwrap();
        rename_macro(&mut dom, "IMGUI_API", "CIMGUI_API");
        match &dom.get(dom.get(root).children()[0]).kind {
            NodeKind::Define { name, .. } => assert_eq!(name, "CIMGUI_API"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
