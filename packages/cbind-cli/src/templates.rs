//! Expands the static header/implementation template snippets inserted verbatim
//! ahead of the generated content, matching the original's `insert_header_templates`:
//! a file-wide "common" template followed by a template specific to the source file
//! being processed, each with a handful of literal tokens substituted. A template
//! file that doesn't exist on disk is simply skipped (both are optional supplements
//! around the generated body, not a hard requirement).

use std::fs;
use std::path::Path;

/// The three tokens the original substitutes verbatim before writing a template out.
pub struct TemplateExpansions<'a> {
    pub imgui_include_dir: &'a str,
    pub output_header_name: &'a str,
    pub output_header_name_no_internal: &'a str,
}

impl TemplateExpansions<'_> {
    fn apply(&self, text: &str) -> String {
        text.replace("%IMGUI_INCLUDE_DIR%", self.imgui_include_dir)
            .replace("%OUTPUT_HEADER_NAME_NO_INTERNAL%", self.output_header_name_no_internal)
            .replace("%OUTPUT_HEADER_NAME%", self.output_header_name)
    }
}

/// Reads `template_dir/common-header-template<ext>` followed by
/// `template_dir/<src_base><ext>-header-template<ext>`... no: followed by
/// `template_dir/<src_base>-header-template<ext>`, concatenating both (expanded) onto
/// one string. Either file being absent contributes nothing rather than erroring.
pub fn expand_header_templates(template_dir: &Path, src_base: &str, ext: &str, expansions: &TemplateExpansions) -> String {
    let mut out = String::new();
    let common = template_dir.join(format!("common-header-template{ext}"));
    if let Ok(text) = fs::read_to_string(&common) {
        out.push_str(&expansions.apply(&text));
    }
    let specific = template_dir.join(format!("{src_base}-header-template{ext}"));
    if let Ok(text) = fs::read_to_string(&specific) {
        out.push_str(&expansions.apply(&text));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_template_files_contribute_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let expansions =
            TemplateExpansions { imgui_include_dir: "", output_header_name: "cimgui.h", output_header_name_no_internal: "cimgui.h" };
        let out = expand_header_templates(dir.path(), "imgui", ".h", &expansions);
        assert_eq!(out, "");
    }

    #[test]
    fn substitutes_all_three_tokens_and_concatenates_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut common = fs::File::create(dir.path().join("common-header-template.h")).unwrap();
        write!(common, "// common, include dir: %IMGUI_INCLUDE_DIR%\n").unwrap();
        let mut specific = fs::File::create(dir.path().join("imgui-header-template.h")).unwrap();
        write!(specific, "// {}, {}\n", "%OUTPUT_HEADER_NAME%", "%OUTPUT_HEADER_NAME_NO_INTERNAL%").unwrap();

        let expansions = TemplateExpansions {
            imgui_include_dir: "imgui/",
            output_header_name: "cimgui_internal.h",
            output_header_name_no_internal: "cimgui.h",
        };
        let out = expand_header_templates(dir.path(), "imgui", ".h", &expansions);
        assert_eq!(out, "// common, include dir: imgui/\n// cimgui_internal.h, cimgui.h\n");
    }
}
