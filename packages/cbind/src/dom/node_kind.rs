use super::types::Type;

/// The kind-specific payload of a node. Cross-cutting attributes shared by every kind
/// (comments, conditional context, dest filename, unmodified-clone snapshot) live on
/// [`NodeCommon`](super::NodeCommon) instead, so this enum only carries the fields a
/// given declaration shape actually has.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// The root of a multi-file conversion: one main header plus zero or more
    /// configuration headers, emitted together so a `JSON` pass can see every
    /// `#define` regardless of which file declared it.
    HeaderFileSet,
    HeaderFile {
        original_file_name: String,
    },
    Include {
        path: String,
        is_system: bool,
    },
    PreprocessorConditional {
        expression: String,
        negated: bool,
        /// Populated only while the conditional has not yet been flattened; the
        /// flatten-conditionals modifier consumes and clears this by promoting one
        /// branch's children into the parent.
        has_else_branch: bool,
    },
    Define {
        name: String,
        value: String,
        is_function_like: bool,
        parameters: Vec<String>,
        /// Set by the exclude-defines-from-metadata modifier.
        excluded_from_metadata: bool,
    },
    Pragma {
        text: String,
    },
    Namespace {
        name: String,
    },
    ClassStructUnion {
        name: String,
        kind: ClassKind,
        is_anonymous: bool,
        is_by_value_marked: bool,
        base_list: Vec<String>,
        is_forward_declaration: bool,
    },
    EnumElement {
        name: String,
        is_flag_enum: bool,
        underlying_type: Option<Type>,
    },
    EnumEntry {
        name: String,
        /// `None` until the calculate-enum-values modifier runs; every entry is
        /// explicit afterward.
        value: Option<EnumValue>,
        is_internal: bool,
        is_count: bool,
    },
    FieldDeclaration {
        field_type: Type,
        names: Vec<String>,
        bitfield_width: Option<u32>,
        is_static: bool,
        is_extern: bool,
        is_internal: bool,
    },
    FunctionDeclaration {
        return_type: Type,
        name: String,
        /// Parameters are themselves `FunctionParameter` child nodes; this field is
        /// only a convenience count kept in sync by the dom mutation primitives.
        is_member: bool,
        member_kind: Option<MemberFunctionKind>,
        is_operator: bool,
        is_constexpr: bool,
        is_variadic: bool,
        /// Fully-qualified name of the owning class/struct, if `is_member`.
        owning_class: Option<String>,
        original_name: String,
        accessibility: Accessibility,
        is_internal: bool,
        is_manual: bool,
        is_default_helper: bool,
    },
    FunctionParameter {
        param_type: Type,
        name: String,
        /// The raw token text of the default value expression, if any, kept
        /// unevaluated since the parser does not do expression evaluation.
        default_value: Option<String>,
        is_varargs: bool,
    },
    Typedef {
        name: String,
        aliased_type: Type,
    },
    TemplateDeclaration {
        parameters: Vec<String>,
    },
    /// A type appearing as its own node, e.g. as the child of a `Typedef`. Most
    /// `Type` usages instead live inline on the owning node (see
    /// [`FieldDeclaration::field_type`]); this variant exists for the cases listed in
    /// the data model where a type must be addressable as its own tree position.
    TypeNode {
        type_value: Type,
    },
    Comment {
        text: String,
        is_preceding: bool,
        /// The name of the declaration this floating comment is attached to, before
        /// the attach-preceding-comments modifier converts it into a `NodeCommon`
        /// leading/trailing comment and removes this node.
        is_attached_to: Option<String>,
    },
    BlankLines {
        count: u32,
    },
    /// A raw passthrough for constructs the parser did not specifically recognize.
    Code {
        text: String,
    },
}

impl NodeKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::HeaderFileSet => "HeaderFileSet",
            NodeKind::HeaderFile { .. } => "HeaderFile",
            NodeKind::Include { .. } => "Include",
            NodeKind::PreprocessorConditional { .. } => "PreprocessorConditional",
            NodeKind::Define { .. } => "Define",
            NodeKind::Pragma { .. } => "Pragma",
            NodeKind::Namespace { .. } => "Namespace",
            NodeKind::ClassStructUnion { .. } => "ClassStructUnion",
            NodeKind::EnumElement { .. } => "EnumElement",
            NodeKind::EnumEntry { .. } => "EnumEntry",
            NodeKind::FieldDeclaration { .. } => "FieldDeclaration",
            NodeKind::FunctionDeclaration { .. } => "FunctionDeclaration",
            NodeKind::FunctionParameter { .. } => "FunctionParameter",
            NodeKind::Typedef { .. } => "Typedef",
            NodeKind::TemplateDeclaration { .. } => "TemplateDeclaration",
            NodeKind::TypeNode { .. } => "Type",
            NodeKind::Comment { .. } => "Comment",
            NodeKind::BlankLines { .. } => "BlankLines",
            NodeKind::Code { .. } => "Code",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Struct,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFunctionKind {
    Constructor,
    Destructor,
    Ordinary,
}

/// An enum entry's resolved value: either a plain integer (the common case after
/// calculate-enum-values runs) or an expression over sibling entries that could not
/// be reduced to a literal (e.g. `Flag_A | Flag_B` before both operands are known).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnumValue {
    Literal(i64),
    Expression(String),
}
