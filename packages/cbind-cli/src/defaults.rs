//! The hard-coded Dear ImGui-shaped configuration the original script built up as a
//! long sequence of `mod_*.apply(...)` calls with literal argument lists. `cbind`
//! itself is not ImGui-specific (every one of these lists is a caller-supplied
//! `PipelineConfig` field), so this module is where that specificity actually lives:
//! one function assembling the config the upstream project has always shipped with,
//! plus the handful of `--backend`/internal-header branches the original's
//! `convert_header` took.

use cbind::config::ManualFunction;
use cbind::{EmitConfig, PipelineConfig};
use indexmap::{IndexMap, IndexSet};

fn set(items: &[&str]) -> IndexSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn map(items: &[(&str, &str)]) -> IndexMap<String, String> {
    items.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Builds the [`PipelineConfig`] the original `convert_header` assembled inline,
/// parameterised by the handful of things that actually vary per invocation:
/// whether this is a backend header, whether it's the (experimental)
/// `imgui_internal.h` case, and the four boolean flags the CLI exposes.
pub struct DefaultsInput {
    pub is_backend: bool,
    pub is_internal: bool,
    pub pass_structs_by_value: bool,
    pub generate_default_arg_functions: bool,
    pub generate_exploded_varargs_functions: bool,
    pub generate_unformatted_functions: bool,
}

pub fn default_pipeline_config(input: &DefaultsInput) -> PipelineConfig {
    let mut config = PipelineConfig {
        pass_structs_by_value: input.pass_structs_by_value,
        generate_default_arg_functions: input.generate_default_arg_functions,
        generate_exploded_varargs_functions: input.generate_exploded_varargs_functions,
        exploded_varargs_max_args: 7,
        generate_unformatted_functions: input.generate_unformatted_functions,
        is_backend_header: input.is_backend,
        api_macro: "CIMGUI_API".to_string(),
        api_macro_rename: Some(("IMGUI_API".to_string(), "CIMGUI_API".to_string())),
        ..Default::default()
    };

    if !input.is_backend {
        config.add_includes.push(("stdbool.h".to_string(), true));
        config.add_includes.push(("stdint.h".to_string(), true));
        config.remove_includes = set(&["float.h", "string.h"]);
    }

    if input.is_backend {
        config.change_includes = map(&[("imgui.h", "cimgui.h")]);
        config.forward_declarations = vec!["struct ImDrawData;".to_string()];
    }

    config.remove_struct_names = set(&[
        "ImGuiOnceUponAFrame",
        "ImNewDummy",
        "ImNewWrapper",
        "ImBitArray",
        "ImBitVector",
        "ImSpanAllocator",
        "ImChunkStream",
        "ImGuiTextIndex",
    ]);
    config.remove_function_owner_classes = set(&["ImVector", "ImSpan", "ImPool"]);
    config.remove_function_names = set(&[
        "ImGui::Value",
        "ImQsort",
        "ImVec2ih::ImVec2ih",
        "ImGui::ScaleRatioFromValueT",
        "ImGui::ScaleValueFromRatioT",
        "ImGui::DragBehaviorT",
        "ImGui::SliderBehaviorT",
        "ImGui::RoundScalarWithFormatT",
        "ImGui::CheckboxFlagsT",
    ]);
    config.remove_typedef_names = set(&["ImBitArrayForNamedKeys"]);

    config.loose_function_prefix = Some("c".to_string());

    if !input.is_backend {
        config.manual_functions = vec![
            ManualFunction {
                signature: "void ImVector_Construct(void* vector)".to_string(),
                comment: Some(
                    "Construct a zero-size ImVector<> (of any type). This is primarily useful \
                     when calling ImFontGlyphRangesBuilder_BuildRanges()"
                        .to_string(),
                ),
                guard: None,
                body: Some("{ IM_PLACEMENT_NEW(vector) ImVector<char>(); }".to_string()),
            },
            ManualFunction {
                signature: "void ImVector_Destruct(void* vector)".to_string(),
                comment: Some(
                    "Destruct an ImVector<> (of any type). Important: Frees the vector memory \
                     but does not call destructors on contained objects (if they have them)"
                        .to_string(),
                ),
                guard: None,
                body: Some("{ ((ImVector<char>*)vector)->clear(); }".to_string()),
            },
            ManualFunction {
                signature: "ImStr ImStr_FromCharStr(const char* b)".to_string(),
                comment: Some(
                    "Build an ImStr from a regular const char* (no data is copied, so you need \
                     to make sure the original char* isn't altered as long as you are using the \
                     ImStr)."
                        .to_string(),
                ),
                guard: Some("defined(IMGUI_HAS_IMSTR)".to_string()),
                body: Some("{ return ImStr(b); }".to_string()),
            },
        ];
    }

    config.function_comments = map(&[(
        "ImFontGlyphRangesBuilder::BuildRanges",
        "(ImVector_Construct()/ImVector_Destruct() can be used to safely construct out_ranges)",
    )]);

    config.conditional_flags = [("IM_VEC2_CLASS_EXTRA".to_string(), false), ("IM_VEC4_CLASS_EXTRA".to_string(), false)]
        .into_iter()
        .collect();
    config.namespace_prefixes = [("ImGui".to_string(), "ImGui_".to_string())].into_iter().collect();
    config.custom_type_fudge = map(&[("const ImFont**", "ImFont* const*")]);

    config.by_value_structs = set(&["ImVec2", "ImVec4", "ImColor", "ImStr", "ImRect", "ImGuiListClipperRange"]);

    config.rename_by_signature = vec![
        ("ImGui_Combo".to_string(), "old_callback".to_string(), "ImGui_ComboObsolete".to_string()),
        ("ImGui_ListBox".to_string(), "old_callback".to_string(), "ImGui_ListBoxObsolete".to_string()),
    ];

    config.default_arg_ignore = set(&[
        "ImGui_CreateContext",
        "ImGui_DestroyContext",
        "ImGui_ShowDemoWindow",
        "ImGui_ShowMetricsWindow",
        "ImGui_ShowDebugLogWindow",
        "ImGui_ShowStackToolWindow",
        "ImGui_ShowAboutWindow",
        "ImGui_ShowStyleEditor",
        "ImGui_StyleColorsDark",
        "ImGui_StyleColorsLight",
        "ImGui_StyleColorsClassic",
        "ImGui_Begin",
        "ImGui_BeginChild",
        "ImGui_BeginChildID",
        "ImGui_SetNextWindowSizeConstraints",
        "ImGui_SetScrollHereX",
        "ImGui_SetScrollHereY",
        "ImGui_SetScrollFromPosX",
        "ImGui_SetScrollFromPosY",
        "ImGui_PushTextWrapPos",
        "ImGui_ProgressBar",
        "ImGui_ColorPicker4",
        "ImGui_TreePushPtr",
        "ImGui_BeginListBox",
        "ImGui_ListBox",
        "ImGui_MenuItemBoolPtr",
        "ImGui_BeginPopupModal",
        "ImGui_OpenPopupOnItemClick",
        "ImGui_TableGetColumnName",
        "ImGui_TableGetColumnFlags",
        "ImGui_TableSetBgColor",
        "ImGui_GetColumnWidth",
        "ImGui_GetColumnOffset",
        "ImGui_BeginTabItem",
        "ImGui_LogToTTY",
        "ImGui_LogToFile",
        "ImGui_LogToClipboard",
        "ImGui_BeginDisabled",
        "ImGui_IsMousePosValid",
        "ImGui_IsMouseDragging",
        "ImGui_GetMouseDragDelta",
        "ImGui_CaptureKeyboardFromApp",
        "ImGui_CaptureMouseFromApp",
        "ImGui_LoadIniSettingsFromDisk",
        "ImGui_LoadIniSettingsFromMemory",
        "ImGui_SaveIniSettingsToMemory",
        "ImGui_SetAllocatorFunctions",
        "ImGuiIO_SetKeyEventNativeDataEx",
        "ImGuiTextFilter_Draw",
        "ImGuiTextFilter_PassFilter",
        "ImGuiTextBuffer_append",
        "ImGuiInputTextCallbackData_InsertChars",
        "ImColor_SetHSV",
        "ImColor_HSV",
        "ImGuiListClipper_Begin",
        "ImDrawList_AddCircleFilled",
        "ImDrawList_AddBezierCubic",
        "ImDrawList_AddBezierQuadratic",
        "ImDrawList_PathStroke",
        "ImDrawList_PathArcTo",
        "ImDrawList_PathBezierCubicCurveTo",
        "ImDrawList_PathBezierQuadraticCurveTo",
        "ImDrawList_PathRect",
        "ImDrawList_AddBezierCurve",
        "ImDrawList_PathBezierCurveTo",
        "ImDrawList_PushClipRect",
        "ImFontGlyphRangesBuilder_AddText",
        "ImFont_AddRemapChar",
        "ImFont_RenderText",
        "ImGui_ImageButtonImTextureID",
        "ImGui_ListBoxHeaderInt",
        "ImGui_ListBoxHeader",
        "ImGui_OpenPopupContextItem",
    ]);
    config.default_arg_ignore_prefixes = set(&["ImGuiStorage_", "ImFontAtlas_"]);
    config.trivial_argument_types = set(&["ImGuiCond"]);
    config.trivial_argument_names = set(&["flags", "popup_flags"]);

    if input.is_internal {
        config.rename_map = map(&[
            ("ImGui_BeginMenuEx", "ImGui_BeginMenuWithIcon"),
            ("ImGui_MenuItemEx", "ImGui_MenuItemWithIcon"),
            ("ImGui_BeginTableEx", "ImGui_BeginTableWithID"),
            ("ImGui_ButtonEx", "ImGui_ButtonWithFlags"),
            ("ImGui_ImageButtonEx", "ImGui_ImageButtonWithFlags"),
            ("ImGui_InputTextEx", "ImGui_InputTextWithHintAndSize"),
        ]);
    } else {
        // `ImGui_GetColorU32`/`ImGui_IsRectVisible` grow ambiguous only once
        // disambiguation runs on the full (non-internal) function set.
        config
            .rename_map
            .extend(map(&[
                ("ImGui_GetColorU32", "ImGui_GetColorU32ImVec4"),
                ("ImGui_GetColorU32ImGuiCol", "ImGui_GetColorU32"),
                ("ImGui_GetColorU32ImGuiColEx", "ImGui_GetColorU32Ex"),
                ("ImGui_IsRectVisible", "ImGui_IsRectVisibleBySize"),
                ("ImGui_IsRectVisibleImVec2", "ImGui_IsRectVisible"),
            ]));
    }

    config.disambiguate_type_suffixes = map(&[
        ("const char*", "Str"),
        ("char*", "Str"),
        ("unsigned int", "Uint"),
        ("unsigned int*", "UintPtr"),
        ("ImGuiID", "ID"),
        ("const void*", "Ptr"),
        ("void*", "Ptr"),
    ]);
    config.disambiguate_ignore = set(&["cImFileOpen", "cImFileClose", "cImFileGetSize", "cImFileRead", "cImFileWrite"]);
    config.disambiguate_rename_everything = set(&["ImGui_CheckboxFlags"]);

    config.custom_varargs_list_suffixes = map(&[("appendf", "v")]);
    if input.generate_unformatted_functions {
        config.unformatted_ignore = set(&["ImGui_Text", "ImGuiTextBuffer_appendf"]);
    }

    if input.is_internal {
        config.move_types = set(&[
            "ImVector_const_charPtr",
            "ImVector_ImGuiColorMod",
            "ImVector_ImGuiContextHook",
            "ImVector_ImGuiDockNodeSettings",
            "ImVector_ImGuiDockRequest",
            "ImVector_ImGuiGroupData",
            "ImVector_ImGuiID",
            "ImVector_ImGuiInputEvent",
            "ImVector_ImGuiItemFlags",
            "ImVector_ImGuiKeyRoutingData",
            "ImVector_ImGuiListClipperData",
            "ImVector_ImGuiListClipperRange",
            "ImVector_ImGuiNavTreeNodeData",
            "ImVector_ImGuiOldColumnData",
            "ImVector_ImGuiOldColumns",
            "ImVector_ImGuiPopupData",
            "ImVector_ImGuiPtrOrIndex",
            "ImVector_ImGuiSettingsHandler",
            "ImVector_ImGuiShrinkWidthItem",
            "ImVector_ImGuiStackLevelInfo",
            "ImVector_ImGuiStyleMod",
            "ImVector_ImGuiTabBar",
            "ImVector_ImGuiTabItem",
            "ImVector_ImGuiTable",
            "ImVector_ImGuiTableColumnSortSpecs",
            "ImVector_ImGuiTableInstanceData",
            "ImVector_ImGuiTableTempData",
            "ImVector_ImGuiViewportPPtr",
            "ImVector_ImGuiWindowPtr",
            "ImVector_ImGuiWindowStackData",
            "ImVector_unsigned_char",
            "ImPool_ImGuiTable",
            "ImPool_ImGuiTabBar",
        ]);
    }

    config.excluded_metadata_defines = set(&[
        "IMGUI_IMPL_API",
        "IM_COL32_WHITE",
        "IM_COL32_BLACK",
        "IM_COL32_BLACK_TRANS",
        "ImDrawCallback_ResetRenderState",
    ]);

    config
}

/// Builds the [`EmitConfig`] fields that are emitter-only (not mirrored from
/// [`PipelineConfig`] by `cbind::driver::convert`).
pub fn default_emit_config(output_base_name: &str, original_header_include: &str, imgui_include_dir: &str, wrap_extern_c: bool) -> EmitConfig {
    EmitConfig {
        output_base_name: output_base_name.to_string(),
        imgui_include_dir: if imgui_include_dir.is_empty() { None } else { Some(imgui_include_dir.to_string()) },
        original_header_include: original_header_include.to_string(),
        wrap_extern_c,
        ..Default::default()
    }
}
