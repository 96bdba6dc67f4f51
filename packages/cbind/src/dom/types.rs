/// The canonical representation of a C++ type, as produced by the parser's type
/// sub-parser and rewritten in place by modifiers (reference-to-pointer conversion,
/// template flattening, custom-type-fudge remapping).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Type {
    /// The unqualified base name, e.g. `int`, `ImVector`, `MyClass`.
    pub base_name: String,
    pub qualifiers: Vec<Qualifier>,
    /// Innermost first: `T**` is `[Pointer, Pointer]`, `T* const*` is
    /// `[Pointer, ConstPointer]`.
    pub pointer_chain: Vec<PointerKind>,
    pub is_reference: bool,
    /// Set by the reference-to-pointer modifier so emitters know to dereference at
    /// the bridge even though `is_reference` has since been cleared.
    pub was_reference: bool,
    /// Set by the by-value-struct-to-pointer modifier: this was a plain `T` struct
    /// parameter rewritten to `const T*`. The C++ bridge constructs a `T` from the
    /// pointer before forwarding, the mirror image of `was_reference`.
    pub was_value_struct: bool,
    /// Non-empty for array types, outermost dimension first. `None` entries are
    /// unsized (`T[]`).
    pub array_dims: Vec<Option<u64>>,
    /// Recursive template arguments, e.g. `ImVector<int>` has one `Type` argument.
    pub template_args: Vec<Type>,
    /// Present when this type is a function pointer; `base_name` is then ignored.
    pub function_pointer: Option<Box<FunctionPointerSignature>>,
}

impl Type {
    pub fn named(base_name: impl Into<String>) -> Self {
        Self { base_name: base_name.into(), ..Default::default() }
    }

    pub fn is_pointer(&self) -> bool {
        !self.pointer_chain.is_empty()
    }

    pub fn is_template_instantiation(&self) -> bool {
        !self.template_args.is_empty()
    }

    /// The flattened name a template instantiation should use once concretized, e.g.
    /// `ImVector<int>` becomes `ImVector_int`. Only meaningful once every template
    /// argument has itself been flattened to a concrete, non-template type.
    pub fn flattened_instantiation_name(&self) -> String {
        let mut name = self.base_name.clone();
        for arg in &self.template_args {
            name.push('_');
            name.push_str(&arg.base_name);
        }
        name
    }

    /// A canonical textual rendering of this type, e.g. `"const T**"` or
    /// `"ImVector<int>"`. Used both to match `custom_type_fudge` keys and (by the
    /// emitters) as the basis for the type portion of a C declaration.
    pub fn render(&self) -> String {
        let mut s = String::new();
        if self.qualifiers.contains(&Qualifier::Const) {
            s.push_str("const ");
        }
        if self.qualifiers.contains(&Qualifier::Volatile) {
            s.push_str("volatile ");
        }
        if let Some(sig) = &self.function_pointer {
            s.push_str(&sig.return_type.render());
            s.push_str(" (*)(");
            s.push_str(&sig.parameter_types.iter().map(Type::render).collect::<Vec<_>>().join(", "));
            s.push(')');
            return s;
        }
        s.push_str(&self.base_name);
        if !self.template_args.is_empty() {
            s.push('<');
            s.push_str(&self.template_args.iter().map(Type::render).collect::<Vec<_>>().join(", "));
            s.push('>');
        }
        for kind in &self.pointer_chain {
            match kind {
                PointerKind::Pointer => s.push('*'),
                PointerKind::ConstPointer => s.push_str("* const"),
            }
        }
        if self.is_reference {
            s.push('&');
        }
        s
    }

    /// Renders this type as a C declarator for a variable/parameter named `name`,
    /// handling the function-pointer declarator shape (`Ret (*name)(Args)`) and array
    /// dimensions, which don't fit the simple `"type name"` form [`render`] alone
    /// produces.
    pub fn render_declarator(&self, name: &str) -> String {
        if let Some(sig) = &self.function_pointer {
            let params = sig.parameter_types.iter().map(Type::render).collect::<Vec<_>>().join(", ");
            return format!("{} (*{})({})", sig.return_type.render(), name, params);
        }
        let mut decl = if name.is_empty() { self.render() } else { format!("{} {name}", self.render()) };
        for dim in &self.array_dims {
            match dim {
                Some(n) => decl.push_str(&format!("[{n}]")),
                None => decl.push_str("[]"),
            }
        }
        decl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qualifier {
    Const,
    Volatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Pointer,
    ConstPointer,
}

/// The signature of a function-pointer type, e.g. the `T` in
/// `void (*T)(int, const char*)`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FunctionPointerSignature {
    pub return_type: Type,
    pub parameter_types: Vec<Type>,
}
